//! Executes routed intents against the windowed dataset and assembles
//! structured, evidence-backed answers.

use tracing::debug;

use insight_core::models::{ComparisonRecord, EnrichedReview, Station};
use insight_core::taxonomy::RouterAliases;
use insight_data::compare::compare_windows;
use insight_data::evidence::{
    format_snippet, pick_evidence, stations_by_theme, top_reasons_for_rating, StationIndex,
    ThemeMention,
};
use insight_data::window::ReviewWindow;

use crate::router::{route, Intent};

/// How many of the top improved stations contribute evidence snippets.
const IMPROVED_EVIDENCE_STATIONS: usize = 2;

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything an answer needs: the windowed dataset plus display knobs.
pub struct AnswerContext<'a> {
    pub stations: &'a [Station],
    pub window: &'a ReviewWindow,
    pub window_days: u32,
    /// Minimum mentions for a station to appear in theme rankings.
    pub min_mentions: u32,
    /// Rows shown in ranked tables.
    pub top_n: usize,
    /// Evidence snippets per answer.
    pub snippets: usize,
}

/// A structured answer payload: a heading, one table, and evidence lines.
#[derive(Debug, Clone)]
pub struct Answer {
    pub heading: String,
    pub body: AnswerBody,
    /// Formatted snippet lines supporting the table.
    pub evidence: Vec<String>,
}

/// The tabular part of an answer.
#[derive(Debug, Clone)]
pub enum AnswerBody {
    /// Ranked per-station mention counts for one theme.
    ThemeMentions(Vec<ThemeMention>),
    /// Theme histogram (may be empty when no themes were detected).
    ThemeHistogram(Vec<(String, usize)>),
    /// Ranked window-comparison records.
    Comparison(Vec<ComparisonRecord>),
}

/// Outcome of answering one question: either a structured answer or an
/// explicit insufficient-evidence message, never a fabricated result.
#[derive(Debug, Clone)]
pub enum RouterOutcome {
    Answer(Answer),
    InsufficientEvidence {
        message: String,
        /// Example questions the router does support.
        example_questions: Vec<String>,
    },
}

// ── Public function ───────────────────────────────────────────────────────────

/// Route `question` and execute the matched intent against the window.
///
/// Unroutable questions and routed queries whose underlying data comes back
/// empty both produce [`RouterOutcome::InsufficientEvidence`].
pub fn answer_question(
    question: &str,
    aliases: &RouterAliases,
    ctx: &AnswerContext<'_>,
) -> RouterOutcome {
    match route(question, aliases) {
        Some(intent) => {
            debug!("Routed question to {:?}", intent);
            dispatch(&intent, ctx)
        }
        None => insufficient(
            "I can't confidently answer that yet.".to_string(),
        ),
    }
}

// ── Intent handlers ───────────────────────────────────────────────────────────

fn dispatch(intent: &Intent, ctx: &AnswerContext<'_>) -> RouterOutcome {
    match intent {
        Intent::ThemeComplaints(theme) => theme_answer(
            theme,
            format!(
                "Top stations mentioning {theme} (last {} days)",
                ctx.window_days
            ),
            format!(
                "I couldn't find enough mentions of {theme} in the last {} days.",
                ctx.window_days
            ),
            ctx,
        ),
        Intent::OneStarReasons => one_star_answer(ctx),
        Intent::MostImproved => most_improved_answer(ctx),
        Intent::SafetyConcerns => theme_answer(
            "safety",
            format!(
                "Stations with recurring safety mentions (last {} days)",
                ctx.window_days
            ),
            format!(
                "No safety-related mentions found in the last {} days.",
                ctx.window_days
            ),
            ctx,
        ),
        Intent::EvChargingFeedback => theme_answer(
            "ev_charging",
            format!("EV charging feedback (last {} days)", ctx.window_days),
            format!(
                "No EV-charging mentions found in the last {} days.",
                ctx.window_days
            ),
            ctx,
        ),
    }
}

/// Shared handler for every theme-ranked answer.
fn theme_answer(
    theme: &str,
    heading: String,
    empty_message: String,
    ctx: &AnswerContext<'_>,
) -> RouterOutcome {
    let index = StationIndex::new(ctx.stations);
    let (mentions, matching) = stations_by_theme(
        theme,
        &ctx.window.current,
        &index,
        ctx.min_mentions,
        ctx.top_n,
    );

    if mentions.is_empty() {
        return insufficient(empty_message);
    }

    let evidence = pick_evidence(&matching, ctx.snippets)
        .into_iter()
        .map(|r| format_snippet(r, &index))
        .collect();

    RouterOutcome::Answer(Answer {
        heading,
        body: AnswerBody::ThemeMentions(mentions),
        evidence,
    })
}

fn one_star_answer(ctx: &AnswerContext<'_>) -> RouterOutcome {
    let index = StationIndex::new(ctx.stations);
    let mut ones: Vec<&EnrichedReview> = ctx
        .window
        .current
        .iter()
        .filter(|r| r.review.rating == Some(1))
        .collect();

    if ones.is_empty() {
        return insufficient(format!(
            "No 1-star reviews found in the last {} days.",
            ctx.window_days
        ));
    }

    // An empty histogram stays a valid answer: the taxonomy simply did not
    // match anything in the 1-star texts.
    let histogram = top_reasons_for_rating(&ctx.window.current, 1);

    ones.sort_by(|a, b| b.review.review_date.cmp(&a.review.review_date));
    let evidence = ones
        .iter()
        .take(ctx.snippets)
        .map(|r| format_snippet(r, &index))
        .collect();

    RouterOutcome::Answer(Answer {
        heading: format!(
            "Top themes in 1-star reviews (last {} days)",
            ctx.window_days
        ),
        body: AnswerBody::ThemeHistogram(histogram),
        evidence,
    })
}

fn most_improved_answer(ctx: &AnswerContext<'_>) -> RouterOutcome {
    let index = StationIndex::new(ctx.stations);
    let mut records = compare_windows(ctx.stations, &ctx.window.current, &ctx.window.prior);

    if records.is_empty() {
        return insufficient(
            "Not enough data to compute improvement vs the prior period.".to_string(),
        );
    }

    // Rating delta first, current review volume as the secondary key so
    // well-evidenced stations rank above one-review wonders.
    records.sort_by(|a, b| {
        b.delta_rating
            .total_cmp(&a.delta_rating)
            .then_with(|| b.review_count_cur.cmp(&a.review_count_cur))
    });
    records.truncate(ctx.top_n);

    // Evidence: recent higher-rated snippets from the top improved stations.
    let top_ids: Vec<&str> = records
        .iter()
        .take(IMPROVED_EVIDENCE_STATIONS)
        .map(|r| r.station_id.as_str())
        .collect();
    let mut evidence_rows: Vec<&EnrichedReview> = ctx
        .window
        .current
        .iter()
        .filter(|r| top_ids.contains(&r.review.station_id.as_str()))
        .collect();
    evidence_rows.sort_by(|a, b| {
        b.review
            .rating
            .unwrap_or(0)
            .cmp(&a.review.rating.unwrap_or(0))
            .then_with(|| b.review.review_date.cmp(&a.review.review_date))
    });
    let evidence = evidence_rows
        .iter()
        .take(ctx.snippets)
        .map(|r| format_snippet(r, &index))
        .collect();

    RouterOutcome::Answer(Answer {
        heading: format!(
            "Most improved stations (last {} vs prior {} days)",
            ctx.window_days, ctx.window_days
        ),
        body: AnswerBody::Comparison(records),
        evidence,
    })
}

// ── Insufficient evidence ─────────────────────────────────────────────────────

/// Example questions shown with every insufficient-evidence outcome.
pub fn example_questions() -> Vec<String> {
    [
        "Which stations have the most complaints about cleanliness?",
        "What are the top reasons for 1-star reviews?",
        "Which stations improved the most in the last 90 days?",
        "Are there recurring mentions of safety concerns?",
        "Summarize common feedback about EV charging availability.",
    ]
    .iter()
    .map(|q| q.to_string())
    .collect()
}

fn insufficient(message: String) -> RouterOutcome {
    RouterOutcome::InsufficientEvidence {
        message,
        example_questions: example_questions(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insight_core::models::{Review, SentimentLabel};
    use insight_core::sentiment::SentimentScorer;
    use insight_core::taxonomy::ThemeTaxonomy;
    use insight_data::enrich::enrich_reviews;
    use insight_data::window::make_review_window;

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

    fn make_review(id: &str, station_id: &str, day: u32, rating: u8, text: &str) -> Review {
        Review {
            review_id: id.to_string(),
            station_id: station_id.to_string(),
            review_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            rating: Some(rating),
            review_text: text.to_string(),
        }
    }

    fn enriched_window(reviews: &[Review]) -> ReviewWindow {
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();
        let enriched = enrich_reviews(reviews, &taxonomy, &scorer);
        make_review_window(&enriched, 30).unwrap()
    }

    fn ctx<'a>(stations: &'a [Station], window: &'a ReviewWindow) -> AnswerContext<'a> {
        AnswerContext {
            stations,
            window,
            window_days: 30,
            min_mentions: 1,
            top_n: 5,
            snippets: 4,
        }
    }

    #[test]
    fn test_theme_question_with_evidence() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews = vec![
            make_review("r1", "s1", 20, 1, "the toilets were filthy and staff were rude"),
            make_review("r2", "s1", 22, 2, "dirty forecourt"),
        ];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question(
            "Which stations have the most complaints about cleanliness?",
            &RouterAliases::default(),
            &ctx,
        );

        let RouterOutcome::Answer(answer) = outcome else {
            panic!("expected an answer");
        };
        assert!(answer.heading.contains("cleanliness"));
        let AnswerBody::ThemeMentions(mentions) = &answer.body else {
            panic!("expected theme mentions");
        };
        assert_eq!(mentions[0].station_id, "s1");
        assert_eq!(mentions[0].mentions, 2);
        assert_eq!(answer.evidence.len(), 2);
        assert!(answer.evidence[0].contains("Alpha Fuels"));
    }

    #[test]
    fn test_theme_question_without_matches_is_insufficient() {
        // Zero cleanliness-tagged reviews in the window: the router must
        // report insufficient evidence, not an empty table.
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews = vec![make_review("r1", "s1", 20, 5, "lovely coffee")];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question(
            "Which stations have the most complaints about cleanliness?",
            &RouterAliases::default(),
            &ctx,
        );

        let RouterOutcome::InsufficientEvidence {
            message,
            example_questions,
        } = outcome
        else {
            panic!("expected insufficient evidence");
        };
        assert!(message.contains("cleanliness"));
        assert!(!example_questions.is_empty());
    }

    #[test]
    fn test_one_star_answer_with_histogram() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews = vec![
            make_review("r1", "s1", 20, 1, "rude staff"),
            make_review("r2", "s1", 21, 1, "staff were unhelpful, long queue"),
            make_review("r3", "s1", 22, 5, "great staff"),
        ];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question(
            "What are the top reasons for 1-star reviews?",
            &RouterAliases::default(),
            &ctx,
        );

        let RouterOutcome::Answer(answer) = outcome else {
            panic!("expected an answer");
        };
        let AnswerBody::ThemeHistogram(histogram) = &answer.body else {
            panic!("expected a histogram");
        };
        // Only the two 1-star reviews count: staff twice, queues once.
        assert_eq!(histogram[0], ("staff".to_string(), 2));
        assert!(histogram.contains(&("queues".to_string(), 1)));
        assert_eq!(answer.evidence.len(), 2);
        // Most recent 1-star first.
        assert!(answer.evidence[0].contains("2024-06-21"));
    }

    #[test]
    fn test_one_star_answer_empty_histogram_still_answers() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews = vec![make_review("r1", "s1", 20, 1, "just awful honestly")];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question("top reasons for 1 star", &RouterAliases::default(), &ctx);

        let RouterOutcome::Answer(answer) = outcome else {
            panic!("expected an answer");
        };
        let AnswerBody::ThemeHistogram(histogram) = &answer.body else {
            panic!("expected a histogram");
        };
        assert!(histogram.is_empty());
        assert_eq!(answer.evidence.len(), 1);
    }

    #[test]
    fn test_one_star_without_matches_is_insufficient() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews = vec![make_review("r1", "s1", 20, 4, "fine")];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question(
            "What are the top reasons for 1-star reviews?",
            &RouterAliases::default(),
            &ctx,
        );

        assert!(matches!(
            outcome,
            RouterOutcome::InsufficientEvidence { ref message, .. } if message.contains("1-star")
        ));
    }

    #[test]
    fn test_most_improved_ranked_with_evidence() {
        let stations = vec![make_station("s1", "Alpha Fuels"), make_station("s2", "Bravo")];
        // s1 improves (prior 2 → current 5), s2 declines (prior 5 → current 1).
        let reviews = vec![
            make_review("r1", "s1", 25, 5, "much better now, very clean"),
            make_review("r2", "s2", 25, 1, "gone downhill"),
        ];
        let taxonomy = ThemeTaxonomy::default();
        let scorer = SentimentScorer::new();
        let mut enriched = enrich_reviews(&reviews, &taxonomy, &scorer);
        // Push two prior-window rows in by hand.
        let prior = vec![
            make_review("p1", "s1", 1, 2, "meh"),
            make_review("p2", "s2", 1, 5, "was great"),
        ];
        enriched.extend(enrich_reviews(&prior, &taxonomy, &scorer));
        let window = make_review_window(&enriched, 20).unwrap();
        let ctx = ctx(&stations, &window);

        let outcome = answer_question(
            "Which stations improved the most?",
            &RouterAliases::default(),
            &ctx,
        );

        let RouterOutcome::Answer(answer) = outcome else {
            panic!("expected an answer");
        };
        let AnswerBody::Comparison(records) = &answer.body else {
            panic!("expected comparison records");
        };
        assert_eq!(records[0].station_id, "s1");
        assert!(records[0].delta_rating > 0.0);
        assert!(!answer.evidence.is_empty());
    }

    #[test]
    fn test_most_improved_without_current_reviews_is_insufficient() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        // Only orphan reviews: no station accrues current-window metrics.
        let reviews = vec![make_review("r1", "ghost", 20, 3, "fine")];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question("most improved stations?", &RouterAliases::default(), &ctx);

        assert!(matches!(
            outcome,
            RouterOutcome::InsufficientEvidence { .. }
        ));
    }

    #[test]
    fn test_unroutable_question_lists_examples() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews = vec![make_review("r1", "s1", 20, 3, "fine")];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question("what is the meaning of it all", &RouterAliases::default(), &ctx);

        let RouterOutcome::InsufficientEvidence {
            message,
            example_questions,
        } = outcome
        else {
            panic!("expected insufficient evidence");
        };
        assert!(message.contains("can't confidently answer"));
        assert_eq!(example_questions.len(), 5);
        assert!(example_questions[0].contains("cleanliness"));
    }

    #[test]
    fn test_safety_question_uses_safety_theme() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews = vec![make_review(
            "r1",
            "s1",
            20,
            2,
            "felt unsafe at night, no security around",
        )];
        let window = enriched_window(&reviews);
        let ctx = ctx(&stations, &window);

        let outcome = answer_question(
            "Are there recurring mentions of safety concerns?",
            &RouterAliases::default(),
            &ctx,
        );

        let RouterOutcome::Answer(answer) = outcome else {
            panic!("expected an answer");
        };
        assert!(answer.heading.contains("safety"));
    }

    #[test]
    fn test_evidence_respects_snippet_limit() {
        let stations = vec![make_station("s1", "Alpha Fuels")];
        let reviews: Vec<Review> = (1..=10)
            .map(|d| make_review(&format!("r{d}"), "s1", d, 1, "filthy toilets"))
            .collect();
        let window = enriched_window(&reviews);
        let mut ctx = ctx(&stations, &window);
        ctx.snippets = 3;

        let outcome = answer_question(
            "complaints about cleanliness",
            &RouterAliases::default(),
            &ctx,
        );

        let RouterOutcome::Answer(answer) = outcome else {
            panic!("expected an answer");
        };
        assert_eq!(answer.evidence.len(), 3);
    }
}
