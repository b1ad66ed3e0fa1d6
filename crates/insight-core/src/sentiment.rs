//! Lexicon-based compound sentiment scoring.
//!
//! A valence-aware scorer over a fixed word lexicon: negations flip the
//! sign of nearby sentiment-bearing words, intensifiers and dampeners scale
//! them, and exclamation marks add emphasis. The raw valence sum is
//! normalised into a compound score in `[-1, 1]`, then thresholded into a
//! three-way label. The scorer is immutable after construction and is meant
//! to be built once and shared by reference across all calls.

use std::collections::{HashMap, HashSet};

use crate::models::SentimentLabel;

/// Compound score at or above which a text is labelled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.20;
/// Compound score at or below which a text is labelled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.20;

/// Normalisation constant: compound = sum / sqrt(sum² + ALPHA).
const NORMALIZATION_ALPHA: f64 = 15.0;
/// A negation within the lookback window flips and dampens the valence.
const NEGATION_FACTOR: f64 = -0.74;
/// How many preceding tokens are scanned for negations and modifiers.
const LOOKBACK_TOKENS: usize = 3;
/// Emphasis added per exclamation mark, in the direction of the raw sum.
const EXCLAMATION_BUMP: f64 = 0.292;
/// Exclamation marks beyond this count add no further emphasis.
const MAX_EXCLAMATIONS: usize = 3;

/// Word valences in `[-4, 4]`. Matching is on whole lowercase tokens.
const LEXICON: &[(&str, f64)] = &[
    // positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("best", 3.2),
    ("brilliant", 2.8),
    ("cheap", 1.1),
    ("clean", 1.7),
    ("convenient", 1.6),
    ("easy", 1.9),
    ("efficient", 1.8),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("fast", 1.3),
    ("fine", 0.7),
    ("friendly", 2.2),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("polite", 2.0),
    ("quick", 1.3),
    ("recommend", 1.6),
    ("spotless", 2.4),
    ("superb", 3.0),
    ("tidy", 1.5),
    // negative
    ("appalling", -2.7),
    ("avoid", -1.3),
    ("awful", -2.0),
    ("bad", -2.5),
    ("broken", -1.9),
    ("crime", -2.5),
    ("danger", -2.4),
    ("dangerous", -2.2),
    ("dirty", -1.8),
    ("disappointed", -1.8),
    ("disappointing", -2.0),
    ("disgusting", -2.9),
    ("expensive", -1.1),
    ("faulty", -1.6),
    ("filthy", -2.5),
    ("grim", -1.8),
    ("grime", -1.4),
    ("harassed", -2.2),
    ("hate", -2.7),
    ("horrible", -2.5),
    ("mess", -1.4),
    ("messy", -1.5),
    ("overpriced", -1.9),
    ("poor", -1.9),
    ("rude", -2.0),
    ("scary", -1.9),
    ("slow", -1.2),
    ("smelly", -1.7),
    ("sticky", -1.1),
    ("terrible", -2.1),
    ("threatening", -2.3),
    ("unhelpful", -1.6),
    ("unsafe", -1.9),
    ("useless", -1.8),
    ("worst", -3.1),
];

/// Tokens that flip the valence of a following sentiment word.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "without", "hardly", "barely", "isn't", "wasn't",
    "aren't", "weren't", "don't", "didn't", "doesn't", "won't", "can't", "cannot", "couldn't",
    "wouldn't", "shouldn't", "hasn't", "haven't", "ain't",
];

/// Tokens that scale the valence of a following sentiment word.
/// Factors above 1.0 intensify, below 1.0 dampen.
const MODIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("absolutely", 1.4),
    ("incredibly", 1.5),
    ("totally", 1.3),
    ("super", 1.4),
    ("so", 1.2),
    ("quite", 1.1),
    ("slightly", 0.8),
    ("somewhat", 0.9),
];

// ── SentimentScorer ───────────────────────────────────────────────────────────

/// Process-wide sentiment scorer: build once, share by reference.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    modifiers: HashMap<&'static str, f64>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    /// Build a scorer over the built-in lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
            modifiers: MODIFIERS.iter().copied().collect(),
        }
    }

    /// Compound polarity score for `text`, in `[-1, 1]`.
    ///
    /// Empty or blank text scores `0.0`.
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| !w.is_empty())
            .collect();

        let mut sum = 0.0;
        for (i, &token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(token) else {
                continue;
            };
            let mut v = valence;

            let window = &tokens[i.saturating_sub(LOOKBACK_TOKENS)..i];
            for &prior in window {
                if let Some(&factor) = self.modifiers.get(prior) {
                    v *= factor;
                }
            }
            if window.iter().any(|&t| self.negations.contains(t)) {
                v *= NEGATION_FACTOR;
            }

            sum += v;
        }

        if sum != 0.0 {
            let bumps = lower.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
            sum += bumps * EXCLAMATION_BUMP * sum.signum();
        }

        (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }

    /// Score `text` and threshold the result into a label.
    ///
    /// `score >= 0.20` is positive, `score <= -0.20` is negative, everything
    /// in between is neutral. Empty text yields `(Neutral, 0.0)`.
    pub fn classify(&self, text: &str) -> (SentimentLabel, f64) {
        let score = self.score(text);
        (label_for_score(score), score)
    }
}

/// Map a compound score onto the three-way label under the fixed thresholds.
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
