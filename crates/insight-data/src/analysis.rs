//! Main analysis pipeline for forecourt-insights.
//!
//! Strings together enrichment, windowing, aggregation and comparison,
//! returning a [`ReviewAnalysis`] ready for the presentation layer.

use chrono::Utc;

use insight_core::error::Result;
use insight_core::models::{
    ComparisonRecord, EnrichedReview, OverallSummary, Review, Station, StationMetrics,
};
use insight_core::sentiment::SentimentScorer;
use insight_core::taxonomy::ThemeTaxonomy;

use crate::compare::compare_windows;
use crate::enrich::enrich_reviews;
use crate::metrics::{overall_summary, station_metrics};
use crate::window::{make_review_window, ReviewWindow};

// ── Public types ──────────────────────────────────────────────────────────────

/// Fleet-wide change between the current and prior windows.
///
/// Both deltas are zero when the prior window holds no reviews, since there
/// is nothing meaningful to compare against.
#[derive(Debug, Clone, Default)]
pub struct TrendDeltas {
    pub delta_rating: f64,
    pub delta_neg_pct: f64,
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Window length used for the current/prior split.
    pub window_days: u32,
    /// Total number of raw reviews processed.
    pub reviews_processed: usize,
    /// Number of stations in the reference table.
    pub stations_covered: usize,
    /// Wall-clock seconds spent enriching the reviews.
    pub enrich_time_seconds: f64,
}

/// The complete output of [`analyze_reviews`].
#[derive(Debug, Clone)]
pub struct ReviewAnalysis {
    /// Every review, enriched, in input order.
    pub enriched: Vec<EnrichedReview>,
    /// The current/prior window split.
    pub window: ReviewWindow,
    /// Per-station metrics over the current window.
    pub station_metrics_current: Vec<StationMetrics>,
    /// Per-station metrics over the prior window.
    pub station_metrics_prior: Vec<StationMetrics>,
    /// Fleet-wide summary over the current window.
    pub overall_current: OverallSummary,
    /// Fleet-wide summary over the prior window.
    pub overall_prior: OverallSummary,
    /// Per-station comparison records (unranked, station input order).
    pub comparison: Vec<ComparisonRecord>,
    /// Fleet-wide trend deltas.
    pub trend: TrendDeltas,
    /// Metadata about this analysis run.
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Enrich every review with themes and sentiment.
/// 2. Split the enriched set into current and prior windows.
/// 3. Aggregate station metrics for both windows.
/// 4. Aggregate fleet-wide summaries for both windows.
/// 5. Build comparison records and the fleet trend.
///
/// The only fatal condition is an entirely empty review set, which cannot
/// anchor a window.
pub fn analyze_reviews(
    stations: &[Station],
    reviews: &[Review],
    taxonomy: &ThemeTaxonomy,
    scorer: &SentimentScorer,
    window_days: u32,
) -> Result<ReviewAnalysis> {
    // ── Step 1: Enrich ────────────────────────────────────────────────────────
    let enrich_start = std::time::Instant::now();
    let enriched = enrich_reviews(reviews, taxonomy, scorer);
    let enrich_time = enrich_start.elapsed().as_secs_f64();

    // ── Step 2: Window ────────────────────────────────────────────────────────
    let window = make_review_window(&enriched, window_days)?;

    // ── Step 3: Station metrics ───────────────────────────────────────────────
    let station_metrics_current = station_metrics(stations, &window.current);
    let station_metrics_prior = station_metrics(stations, &window.prior);

    // ── Step 4: Fleet summaries ───────────────────────────────────────────────
    let overall_current = overall_summary(&window.current);
    let overall_prior = overall_summary(&window.prior);

    // ── Step 5: Comparison and trend ──────────────────────────────────────────
    let comparison = compare_windows(stations, &window.current, &window.prior);
    let trend = if overall_prior.review_count > 0 {
        TrendDeltas {
            delta_rating: overall_current.avg_rating - overall_prior.avg_rating,
            delta_neg_pct: overall_current.neg_pct - overall_prior.neg_pct,
        }
    } else {
        TrendDeltas::default()
    };

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        window_days,
        reviews_processed: reviews.len(),
        stations_covered: stations.len(),
        enrich_time_seconds: enrich_time,
    };

    Ok(ReviewAnalysis {
        enriched,
        window,
        station_metrics_current,
        station_metrics_prior,
        overall_current,
        overall_prior,
        comparison,
        trend,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insight_core::error::InsightError;

    fn make_station(id: &str, name: &str) -> Station {
        Station {
            station_id: id.to_string(),
            name: name.to_string(),
            address: String::new(),
            borough: "Camden".to_string(),
            lat: 51.5,
            lon: -0.1,
        }
    }

    fn make_review(id: &str, station_id: &str, date: (i32, u32, u32), rating: u8, text: &str) -> Review {
        Review {
            review_id: id.to_string(),
            station_id: station_id.to_string(),
            review_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            rating: Some(rating),
            review_text: text.to_string(),
        }
    }

    #[test]
    fn test_analyze_empty_reviews_fails_fast() {
        let stations = vec![make_station("s1", "Alpha")];
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();

        let err = analyze_reviews(&stations, &[], &taxonomy, &scorer, 90).unwrap_err();
        assert!(matches!(err, InsightError::EmptyDataset));
    }

    #[test]
    fn test_analyze_basic_pipeline() {
        let stations = vec![make_station("s1", "Alpha"), make_station("s2", "Bravo")];
        let reviews = vec![
            make_review("r1", "s1", (2024, 6, 20), 5, "great staff, very friendly"),
            make_review("r2", "s1", (2024, 6, 10), 1, "filthy toilets"),
            make_review("r3", "s2", (2024, 3, 1), 3, "long queue"),
        ];
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();

        let analysis = analyze_reviews(&stations, &reviews, &taxonomy, &scorer, 30).unwrap();

        assert_eq!(analysis.enriched.len(), 3);
        assert_eq!(analysis.window.max_date, NaiveDate::from_ymd_opt(2024, 6, 20).unwrap());
        assert_eq!(analysis.window.current.len(), 2);
        assert!(analysis.window.prior.is_empty());

        // Per-station rows cover every station; only s1 has current reviews.
        assert_eq!(analysis.station_metrics_current.len(), 2);
        assert_eq!(analysis.station_metrics_current[0].review_count, 2);
        assert_eq!(analysis.station_metrics_current[1].review_count, 0);

        assert_eq!(analysis.overall_current.review_count, 2);
        assert!((analysis.overall_current.avg_rating - 3.0).abs() < 1e-9);

        // Comparison only contains the station with current reviews.
        assert_eq!(analysis.comparison.len(), 1);
        assert_eq!(analysis.comparison[0].station_id, "s1");
    }

    #[test]
    fn test_analyze_trend_zero_when_prior_empty() {
        let stations = vec![make_station("s1", "Alpha")];
        let reviews = vec![make_review("r1", "s1", (2024, 6, 20), 4, "fine")];
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();

        let analysis = analyze_reviews(&stations, &reviews, &taxonomy, &scorer, 30).unwrap();

        assert_eq!(analysis.overall_prior.review_count, 0);
        assert_eq!(analysis.trend.delta_rating, 0.0);
        assert_eq!(analysis.trend.delta_neg_pct, 0.0);
    }

    #[test]
    fn test_analyze_trend_compares_windows() {
        let stations = vec![make_station("s1", "Alpha")];
        let reviews = vec![
            make_review("r1", "s1", (2024, 6, 20), 5, "spotless and friendly"),
            make_review("r2", "s1", (2024, 5, 1), 1, "rude staff, filthy"),
        ];
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();

        let analysis = analyze_reviews(&stations, &reviews, &taxonomy, &scorer, 30).unwrap();

        assert_eq!(analysis.window.current.len(), 1);
        assert_eq!(analysis.window.prior.len(), 1);
        assert!((analysis.trend.delta_rating - 4.0).abs() < 1e-9);
        assert!(analysis.trend.delta_neg_pct < 0.0);
    }

    #[test]
    fn test_analyze_metadata_populated() {
        let stations = vec![make_station("s1", "Alpha")];
        let reviews = vec![make_review("r1", "s1", (2024, 6, 20), 4, "fine")];
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();

        let analysis = analyze_reviews(&stations, &reviews, &taxonomy, &scorer, 90).unwrap();

        assert!(!analysis.metadata.generated_at.is_empty());
        assert_eq!(analysis.metadata.window_days, 90);
        assert_eq!(analysis.metadata.reviews_processed, 1);
        assert_eq!(analysis.metadata.stations_covered, 1);
        assert!(analysis.metadata.enrich_time_seconds >= 0.0);
    }

    #[test]
    fn test_analyze_is_idempotent_modulo_metadata() {
        let stations = vec![make_station("s1", "Alpha")];
        let reviews = vec![
            make_review("r1", "s1", (2024, 6, 20), 5, "very clean"),
            make_review("r2", "s1", (2024, 6, 1), 2, "slow queue"),
        ];
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();

        let first = analyze_reviews(&stations, &reviews, &taxonomy, &scorer, 30).unwrap();
        let second = analyze_reviews(&stations, &reviews, &taxonomy, &scorer, 30).unwrap();

        assert_eq!(first.window.cutoff, second.window.cutoff);
        assert_eq!(
            first.overall_current.review_count,
            second.overall_current.review_count
        );
        assert_eq!(first.overall_current.avg_rating, second.overall_current.avg_rating);
        for (a, b) in first.enriched.iter().zip(second.enriched.iter()) {
            assert_eq!(a.themes, b.themes);
            assert_eq!(a.sentiment_score, b.sentiment_score);
        }
    }
}
