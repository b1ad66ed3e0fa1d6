//! Station-level and fleet-wide aggregation over a review subset.

use std::collections::HashMap;

use insight_core::formatting::{format_avg_rating, format_pct};
use insight_core::models::{EnrichedReview, OverallSummary, SentimentLabel, Station, StationMetrics};

// ── SentimentTally ────────────────────────────────────────────────────────────

/// Counts and rating sums accumulated while grouping reviews.
#[derive(Debug, Clone, Default)]
struct SentimentTally {
    review_count: u32,
    rating_sum: f64,
    rated_count: u32,
    pos_count: u32,
    neu_count: u32,
    neg_count: u32,
}

impl SentimentTally {
    /// Add a single review's counts to the running totals.
    fn add(&mut self, review: &EnrichedReview) {
        self.review_count += 1;
        if let Some(rating) = review.review.rating {
            self.rating_sum += f64::from(rating);
            self.rated_count += 1;
        }
        match review.sentiment_label {
            SentimentLabel::Positive => self.pos_count += 1,
            SentimentLabel::Neutral => self.neu_count += 1,
            SentimentLabel::Negative => self.neg_count += 1,
        }
    }

    /// Mean of non-missing ratings, `0.0` when none contributed.
    fn avg_rating(&self) -> f64 {
        if self.rated_count == 0 {
            0.0
        } else {
            self.rating_sum / f64::from(self.rated_count)
        }
    }

    /// Share of negative-labelled reviews, `0.0` for an empty group.
    fn neg_pct(&self) -> f64 {
        if self.review_count == 0 {
            0.0
        } else {
            f64::from(self.neg_count) / f64::from(self.review_count)
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Compute one [`StationMetrics`] row per station over `reviews`.
///
/// Left-join semantics: every station appears in the output, in input
/// order; stations without matching reviews get zero-valued metrics.
/// Reviews whose `station_id` resolves to no station contribute nothing.
/// An empty subset is not an error and yields all-zero rows.
pub fn station_metrics(stations: &[Station], reviews: &[EnrichedReview]) -> Vec<StationMetrics> {
    let mut groups: HashMap<&str, SentimentTally> = HashMap::new();
    for review in reviews {
        groups
            .entry(review.review.station_id.as_str())
            .or_default()
            .add(review);
    }

    stations
        .iter()
        .map(|station| {
            let tally = groups
                .get(station.station_id.as_str())
                .cloned()
                .unwrap_or_default();
            let avg_rating = tally.avg_rating();
            let neg_pct = tally.neg_pct();
            StationMetrics {
                station_id: station.station_id.clone(),
                name: station.name.clone(),
                borough: station.borough.clone(),
                review_count: tally.review_count,
                avg_rating,
                pos_count: tally.pos_count,
                neu_count: tally.neu_count,
                neg_count: tally.neg_count,
                neg_pct,
                avg_rating_display: format_avg_rating(avg_rating),
                review_count_display: tally.review_count.to_string(),
                neg_pct_display: format_pct(neg_pct),
            }
        })
        .collect()
}

/// Compute the fleet-wide [`OverallSummary`] over `reviews`.
///
/// An empty subset yields the all-zero summary, not an error.
pub fn overall_summary(reviews: &[EnrichedReview]) -> OverallSummary {
    let mut tally = SentimentTally::default();
    for review in reviews {
        tally.add(review);
    }

    let avg_rating = tally.avg_rating();
    let neg_pct = tally.neg_pct();
    OverallSummary {
        review_count: tally.review_count,
        avg_rating,
        pos_count: tally.pos_count,
        neu_count: tally.neu_count,
        neg_count: tally.neg_count,
        neg_pct,
        avg_rating_display: format_avg_rating(avg_rating),
        review_count_display: tally.review_count.to_string(),
        neg_pct_display: format_pct(neg_pct),
    }
}

/// Theme histogram over `reviews`, count-descending, capped at `n`.
///
/// The sort is stable: themes with equal counts keep first-occurrence order.
pub fn top_themes(reviews: &[EnrichedReview], n: usize) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for review in reviews {
        for theme in &review.themes {
            if !counts.contains_key(theme.as_str()) {
                order.push(theme.clone());
            }
            *counts.entry(theme.as_str()).or_insert(0) += 1;
        }
    }

    let mut histogram: Vec<(String, usize)> = order
        .into_iter()
        .map(|theme| {
            let count = counts[theme.as_str()];
            (theme, count)
        })
        .collect();
    histogram.sort_by(|a, b| b.1.cmp(&a.1));
    histogram.truncate(n);
    histogram
}

// ── Tests ─────────────────────────────────────────────────────────────────────
