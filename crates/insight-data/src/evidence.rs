//! Theme-driven retrieval: ranked station mention counts, rating-filtered
//! theme histograms, and the ordered evidence samples shown next to every
//! aggregate claim.

use std::collections::HashMap;

use insight_core::formatting::truncate_text;
use insight_core::models::{EnrichedReview, Station};

use crate::metrics::top_themes;

/// Longest snippet text shown in an evidence line.
const SNIPPET_MAX_CHARS: usize = 160;

// ── StationIndex ──────────────────────────────────────────────────────────────

/// Lookup from station id to its reference row, for joining station
/// metadata onto review-keyed results.
pub struct StationIndex<'a> {
    by_id: HashMap<&'a str, &'a Station>,
}

impl<'a> StationIndex<'a> {
    pub fn new(stations: &'a [Station]) -> Self {
        Self {
            by_id: stations
                .iter()
                .map(|s| (s.station_id.as_str(), s))
                .collect(),
        }
    }

    pub fn get(&self, station_id: &str) -> Option<&'a Station> {
        self.by_id.get(station_id).copied()
    }

    /// Station name, falling back to the raw id for orphan reviews.
    pub fn display_name(&self, station_id: &str) -> String {
        self.get(station_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| station_id.to_string())
    }

    /// Borough, empty for orphan reviews.
    pub fn borough(&self, station_id: &str) -> &str {
        self.get(station_id).map(|s| s.borough.as_str()).unwrap_or("")
    }
}

// ── ThemeMention ──────────────────────────────────────────────────────────────

/// Per-station mention count for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeMention {
    pub station_id: String,
    pub name: String,
    pub borough: String,
    pub mentions: u32,
}

/// Rank stations by how many reviews in `reviews` mention `theme`.
///
/// Returns the ranked mention counts (descending, stable on ties, stations
/// below `min_mentions` excluded, capped at `top_n`) together with every
/// matching review row for evidence selection. An empty result is a valid
/// no-match outcome, not an error.
pub fn stations_by_theme<'a>(
    theme: &str,
    reviews: &'a [EnrichedReview],
    index: &StationIndex,
    min_mentions: u32,
    top_n: usize,
) -> (Vec<ThemeMention>, Vec<&'a EnrichedReview>) {
    let matching: Vec<&EnrichedReview> =
        reviews.iter().filter(|r| r.has_theme(theme)).collect();

    // Count per station, preserving first-seen order for stable ties.
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for review in &matching {
        let id = review.review.station_id.as_str();
        if !counts.contains_key(id) {
            order.push(id);
        }
        *counts.entry(id).or_insert(0) += 1;
    }

    let mut mentions: Vec<ThemeMention> = order
        .into_iter()
        .map(|id| ThemeMention {
            station_id: id.to_string(),
            name: index.display_name(id),
            borough: index.borough(id).to_string(),
            mentions: counts[id],
        })
        .filter(|m| m.mentions >= min_mentions)
        .collect();
    mentions.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    mentions.truncate(top_n);

    (mentions, matching)
}

/// Theme histogram over only the reviews at exactly `rating` stars.
///
/// Count-descending; an empty histogram is a valid outcome when no themes
/// were detected in any matching review.
pub fn top_reasons_for_rating(reviews: &[EnrichedReview], rating: u8) -> Vec<(String, usize)> {
    let matching: Vec<EnrichedReview> = reviews
        .iter()
        .filter(|r| r.review.rating == Some(rating))
        .cloned()
        .collect();
    top_themes(&matching, usize::MAX)
}

/// Pick the `n` most tellable evidence rows from `matching`.
///
/// Ordering policy: negative-labelled rows first (negative < neutral <
/// positive), then ascending rating with missing ratings last, then
/// descending review date. The most negative, lowest-rated, most recent
/// evidence surfaces first.
pub fn pick_evidence<'a>(matching: &[&'a EnrichedReview], n: usize) -> Vec<&'a EnrichedReview> {
    let mut ordered = matching.to_vec();
    ordered.sort_by(|a, b| {
        a.sentiment_label
            .evidence_rank()
            .cmp(&b.sentiment_label.evidence_rank())
            .then_with(|| {
                a.review
                    .rating
                    .unwrap_or(u8::MAX)
                    .cmp(&b.review.rating.unwrap_or(u8::MAX))
            })
            .then_with(|| b.review.review_date.cmp(&a.review.review_date))
    });
    ordered.truncate(n);
    ordered
}

/// Render one evidence line: station name, borough, star rating, date and
/// the quoted review text truncated at 160 characters.
pub fn format_snippet(review: &EnrichedReview, index: &StationIndex) -> String {
    let rating = review
        .review
        .rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    let text = truncate_text(&review.review.review_text, SNIPPET_MAX_CHARS);
    format!(
        "{} ({}) — ⭐{} — {} — “{}”",
        index.display_name(&review.review.station_id),
        index.borough(&review.review.station_id),
        rating,
        review.review.review_date,
        text
    )
}

// ── StationHighlights ─────────────────────────────────────────────────────────

/// Drill-down material for a single station: its dominant themes and the
/// freshest high- and low-rated reviews.
#[derive(Debug)]
pub struct StationHighlights<'a> {
    pub top_themes: Vec<(String, usize)>,
    /// Most recent reviews rated 4–5, newest first.
    pub recent_positive: Vec<&'a EnrichedReview>,
    /// Most recent reviews rated 1–2, newest first.
    pub recent_negative: Vec<&'a EnrichedReview>,
}

/// Collect highlight material for `station_id` from `reviews`.
pub fn station_highlights<'a>(
    station_id: &str,
    reviews: &'a [EnrichedReview],
    n: usize,
) -> StationHighlights<'a> {
    let station_reviews: Vec<&EnrichedReview> = reviews
        .iter()
        .filter(|r| r.review.station_id == station_id)
        .collect();

    let owned: Vec<EnrichedReview> = station_reviews.iter().map(|r| (*r).clone()).collect();
    let themes = top_themes(&owned, 5);

    let mut positive: Vec<&EnrichedReview> = station_reviews
        .iter()
        .copied()
        .filter(|r| r.review.rating.is_some_and(|stars| stars >= 4))
        .collect();
    positive.sort_by(|a, b| b.review.review_date.cmp(&a.review.review_date));
    positive.truncate(n);

    let mut negative: Vec<&EnrichedReview> = station_reviews
        .iter()
        .copied()
        .filter(|r| r.review.rating.is_some_and(|stars| stars <= 2))
        .collect();
    negative.sort_by(|a, b| b.review.review_date.cmp(&a.review.review_date));
    negative.truncate(n);

    StationHighlights {
        top_themes: themes,
        recent_positive: positive,
        recent_negative: negative,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
