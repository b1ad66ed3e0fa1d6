//! Date-anchored windowing of enriched reviews.
//!
//! Windows are anchored to the latest review date in the dataset rather
//! than the wall clock, so a static dataset always produces the same
//! current/prior split.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use insight_core::error::{InsightError, Result};
use insight_core::models::EnrichedReview;

/// The current and immediately preceding review windows of equal length.
#[derive(Debug, Clone)]
pub struct ReviewWindow {
    /// Reviews with `review_date >= cutoff`.
    pub current: Vec<EnrichedReview>,
    /// Reviews in `[cutoff - window_days, cutoff)`: contiguous with the
    /// current window and non-overlapping.
    pub prior: Vec<EnrichedReview>,
    /// Inclusive lower bound of the current window.
    pub cutoff: NaiveDate,
    /// Latest review date across the whole dataset.
    pub max_date: NaiveDate,
}

/// Split `reviews` into the current window and the prior window of equal
/// length, both anchored at the dataset's latest review date.
///
/// Fails with [`InsightError::EmptyDataset`] when there are no reviews at
/// all, since no window can be anchored. A window longer than the data span
/// is not an error: everything lands in `current` and `prior` is empty.
pub fn make_review_window(
    reviews: &[EnrichedReview],
    window_days: u32,
) -> Result<ReviewWindow> {
    let max_date = reviews
        .iter()
        .map(|r| r.review.review_date)
        .max()
        .ok_or(InsightError::EmptyDataset)?;

    let span = Duration::days(i64::from(window_days));
    let cutoff = max_date - span;
    let prior_start = cutoff - span;

    let current: Vec<EnrichedReview> = reviews
        .iter()
        .filter(|r| r.review.review_date >= cutoff)
        .cloned()
        .collect();

    let prior: Vec<EnrichedReview> = reviews
        .iter()
        .filter(|r| r.review.review_date >= prior_start && r.review.review_date < cutoff)
        .cloned()
        .collect();

    debug!(
        "Window of {} days anchored at {}: {} current, {} prior reviews",
        window_days,
        max_date,
        current.len(),
        prior.len()
    );

    Ok(ReviewWindow {
        current,
        prior,
        cutoff,
        max_date,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
