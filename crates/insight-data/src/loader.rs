//! CSV loading glue for the two input tables.
//!
//! Reads `stations.csv` and `reviews.csv` into typed rows for the analytics
//! core. Station ids are trimmed on both sides of the join key, review dates
//! must be `YYYY-MM-DD`, and absent or invalid ratings become missing values
//! rather than errors. Rows that cannot be parsed at all are skipped with a
//! warning, in keeping with the tolerant-ingest policy: the only fatal
//! loading failures are unreadable files.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use insight_core::error::{InsightError, Result};
use insight_core::models::{Review, Station};

// ── Raw CSV rows ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawStation {
    station_id: String,
    name: String,
    address: String,
    borough: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    review_id: String,
    station_id: String,
    review_date: String,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    review_text: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the stations reference table from `path`.
pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let mut reader = open_csv(path)?;

    let mut stations = Vec::new();
    for record in reader.deserialize::<RawStation>() {
        let raw = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed station row in {}: {}", path.display(), e);
                continue;
            }
        };
        stations.push(Station {
            station_id: raw.station_id.trim().to_string(),
            name: raw.name,
            address: raw.address,
            borough: raw.borough,
            lat: raw.lat,
            lon: raw.lon,
        });
    }

    debug!("Loaded {} stations from {}", stations.len(), path.display());
    Ok(stations)
}

/// Load the reviews table from `path`.
///
/// Ratings outside 1–5, non-numeric ratings and blank cells all become
/// `None`; missing text becomes the empty string.
pub fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let mut reader = open_csv(path)?;

    let mut reviews = Vec::new();
    for record in reader.deserialize::<RawReview>() {
        let raw = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed review row in {}: {}", path.display(), e);
                continue;
            }
        };

        let review_date = match NaiveDate::parse_from_str(raw.review_date.trim(), "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                warn!(
                    "Skipping review {} with unparseable date {:?}",
                    raw.review_id, raw.review_date
                );
                continue;
            }
        };

        reviews.push(Review {
            review_id: raw.review_id.trim().to_string(),
            station_id: raw.station_id.trim().to_string(),
            review_date,
            rating: coerce_rating(raw.rating.as_deref()),
            review_text: raw.review_text.unwrap_or_default(),
        });
    }

    debug!("Loaded {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}

/// Load both tables from a directory containing `stations.csv` and
/// `reviews.csv`.
pub fn load_dataset(dir: &Path) -> Result<(Vec<Station>, Vec<Review>)> {
    let stations = load_stations(&dir.join("stations.csv"))?;
    let reviews = load_reviews(&dir.join("reviews.csv"))?;
    Ok((stations, reviews))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|source| InsightError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

/// Coerce a raw rating cell into a valid 1–5 star value, or `None`.
///
/// Accepts integral values in float spelling ("4.0") since exported tables
/// often carry them that way.
fn coerce_rating(raw: Option<&str>) -> Option<u8> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    if value.fract() != 0.0 {
        return None;
    }
    let stars = value as i64;
    if (1..=5).contains(&stars) {
        Some(stars as u8)
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
