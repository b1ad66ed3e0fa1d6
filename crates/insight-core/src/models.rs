use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Three-way sentiment polarity derived from the compound lexicon score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Sort rank used by evidence ordering: negative rows surface first.
    pub fn evidence_rank(self) -> u8 {
        match self {
            SentimentLabel::Negative => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Positive => 2,
        }
    }

    /// Lowercase name as it appears in output tables.
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

/// A fuel-station site. Immutable reference data, loaded once per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Unique identifier, trimmed at load time.
    pub station_id: String,
    pub name: String,
    pub address: String,
    pub borough: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// A raw customer review as provided by the reviews table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    /// Foreign key into the stations table; orphan ids are tolerated.
    pub station_id: String,
    pub review_date: NaiveDate,
    /// Star rating 1–5. `None` when the source value was absent or invalid.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Free review text; may be empty.
    #[serde(default)]
    pub review_text: String,
}

/// A review plus the fields derived from its text.
///
/// Derivation is a pure function of `review_text` alone: identical text
/// always yields identical themes, label and score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedReview {
    #[serde(flatten)]
    pub review: Review,
    /// Theme tags detected in the text, in taxonomy order, no duplicates.
    pub themes: Vec<String>,
    pub sentiment_label: SentimentLabel,
    /// Compound polarity score in `[-1, 1]`.
    pub sentiment_score: f64,
}

impl EnrichedReview {
    /// Whether `theme` was detected in this review's text.
    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }
}

/// Per-station aggregate over a given review subset.
///
/// The three `*_display` fields are cosmetic string projections computed
/// once by the aggregator; they never feed back into numeric computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationMetrics {
    pub station_id: String,
    pub name: String,
    pub borough: String,
    pub review_count: u32,
    /// Mean of non-missing ratings in the subset; `0.0` when none.
    pub avg_rating: f64,
    pub pos_count: u32,
    pub neu_count: u32,
    pub neg_count: u32,
    /// `neg_count / review_count`, or `0.0` when the subset is empty.
    pub neg_pct: f64,
    pub avg_rating_display: String,
    pub review_count_display: String,
    pub neg_pct_display: String,
}

/// Fleet-wide aggregate over a given review subset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverallSummary {
    pub review_count: u32,
    pub avg_rating: f64,
    pub pos_count: u32,
    pub neu_count: u32,
    pub neg_count: u32,
    pub neg_pct: f64,
    pub avg_rating_display: String,
    pub review_count_display: String,
    pub neg_pct_display: String,
}

/// Current-vs-prior window deltas for one station.
///
/// A station with no prior-window reviews compares against zero-valued
/// prior metrics; stations with no current-window reviews are not emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub station_id: String,
    pub name: String,
    pub review_count_cur: u32,
    pub avg_rating_cur: f64,
    pub neg_pct_cur: f64,
    pub avg_rating_prev: f64,
    pub neg_pct_prev: f64,
    /// `avg_rating_cur - avg_rating_prev`.
    pub delta_rating: f64,
    /// `neg_pct_cur - neg_pct_prev`.
    pub delta_neg_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_review(id: &str, rating: Option<u8>, text: &str) -> Review {
        Review {
            review_id: id.to_string(),
            station_id: "st-1".to_string(),
            review_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            rating,
            review_text: text.to_string(),
        }
    }

    // ── SentimentLabel ─────────────────────────────────────────────────────

    #[test]
    fn test_evidence_rank_orders_negative_first() {
        assert!(
            SentimentLabel::Negative.evidence_rank() < SentimentLabel::Neutral.evidence_rank()
        );
        assert!(
            SentimentLabel::Neutral.evidence_rank() < SentimentLabel::Positive.evidence_rank()
        );
    }

    #[test]
    fn test_sentiment_label_serde_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Negative).unwrap();
        assert_eq!(json, r#""negative""#);
        let back: SentimentLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SentimentLabel::Negative);
    }

    #[test]
    fn test_sentiment_label_as_str() {
        assert_eq!(SentimentLabel::Positive.as_str(), "positive");
        assert_eq!(SentimentLabel::Neutral.as_str(), "neutral");
        assert_eq!(SentimentLabel::Negative.as_str(), "negative");
    }

    // ── EnrichedReview ─────────────────────────────────────────────────────

    #[test]
    fn test_has_theme() {
        let enriched = EnrichedReview {
            review: make_review("r1", Some(2), "dirty toilets"),
            themes: vec!["cleanliness".to_string(), "toilets".to_string()],
            sentiment_label: SentimentLabel::Negative,
            sentiment_score: -0.5,
        };
        assert!(enriched.has_theme("toilets"));
        assert!(!enriched.has_theme("pricing"));
    }

    #[test]
    fn test_enriched_review_serde_flattens_review_fields() {
        let enriched = EnrichedReview {
            review: make_review("r1", None, "ok"),
            themes: vec![],
            sentiment_label: SentimentLabel::Neutral,
            sentiment_score: 0.0,
        };
        let value = serde_json::to_value(&enriched).unwrap();
        // Review columns appear at the top level, not nested.
        assert_eq!(value["review_id"], "r1");
        assert_eq!(value["station_id"], "st-1");
        assert_eq!(value["sentiment_label"], "neutral");
    }
}
