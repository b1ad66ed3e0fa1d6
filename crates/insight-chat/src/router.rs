//! Ordered first-match-wins intent routing.

use insight_core::taxonomy::RouterAliases;

/// An analytic query type the router can dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Ranked stations mentioning a theme, with evidence snippets.
    ThemeComplaints(String),
    /// Theme histogram over 1-star reviews.
    OneStarReasons,
    /// Stations ranked by rating improvement vs the prior window.
    MostImproved,
    /// Recurring safety mentions.
    SafetyConcerns,
    /// EV-charging feedback.
    EvChargingFeedback,
}

/// Map a question onto an [`Intent`], or `None` when no rule matches.
///
/// Rules are evaluated top to bottom and the first match wins; the order is
/// a designed priority, not arbitrary. A complaint/mention question only
/// routes when an alias identifies its theme, otherwise the later rules get
/// their chance.
pub fn route(question: &str, aliases: &RouterAliases) -> Option<Intent> {
    let q = question.trim().to_lowercase();

    // 1) Theme complaints / mentions.
    if contains_any(&q, &["complaint", "complaints", "mentions"]) {
        if let Some(theme) = aliases.detect(&q) {
            return Some(Intent::ThemeComplaints(theme.to_string()));
        }
    }

    // 2) Reasons behind 1-star reviews.
    if contains_any(&q, &["1-star", "one star", "1 star"]) {
        return Some(Intent::OneStarReasons);
    }

    // 3) Improvement vs the prior period.
    if q.contains("improv") {
        return Some(Intent::MostImproved);
    }

    // 4) Safety concerns.
    if contains_any(&q, &["safety", "unsafe", "security"]) {
        return Some(Intent::SafetyConcerns);
    }

    // 5) EV charging feedback.
    if contains_any(&q, &["ev", "charging", "charger"]) {
        return Some(Intent::EvChargingFeedback);
    }

    None
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
