//! Review enrichment: theme tagging plus sentiment classification.

use tracing::debug;

use insight_core::models::{EnrichedReview, Review};
use insight_core::sentiment::SentimentScorer;
use insight_core::taxonomy::ThemeTaxonomy;

/// Derive themes and sentiment for every review.
///
/// A pure mapping: one enriched row per input row, original fields and row
/// order preserved, no filtering and no deduplication. All derived fields
/// are functions of `review_text` alone, so repeated calls over the same
/// input produce identical output.
pub fn enrich_reviews(
    reviews: &[Review],
    taxonomy: &ThemeTaxonomy,
    scorer: &SentimentScorer,
) -> Vec<EnrichedReview> {
    let enriched: Vec<EnrichedReview> = reviews
        .iter()
        .map(|review| {
            let themes = taxonomy.classify(&review.review_text);
            let (sentiment_label, sentiment_score) = scorer.classify(&review.review_text);
            EnrichedReview {
                review: review.clone(),
                themes,
                sentiment_label,
                sentiment_score,
            }
        })
        .collect();

    debug!("Enriched {} reviews", enriched.len());
    enriched
}

// ── Tests ─────────────────────────────────────────────────────────────────────
