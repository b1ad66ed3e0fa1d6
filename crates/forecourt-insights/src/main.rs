mod bootstrap;

use anyhow::{bail, Context, Result};

use insight_chat::{answer_question, AnswerBody, AnswerContext, RouterOutcome};
use insight_core::formatting::{format_delta_rating, format_signed_pct, truncate_text};
use insight_core::models::{EnrichedReview, SentimentLabel, StationMetrics};
use insight_core::sentiment::SentimentScorer;
use insight_core::settings::Settings;
use insight_core::taxonomy::{RouterAliases, ThemeTaxonomy};
use insight_data::analysis::{analyze_reviews, ReviewAnalysis};
use insight_data::compare::{most_deteriorated, most_improved};
use insight_data::evidence::station_highlights;
use insight_data::loader::load_dataset;
use insight_data::metrics::top_themes;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("forecourt-insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, window: {} days, top-n: {}",
        settings.view,
        settings.window_days,
        settings.top_n
    );

    let data_dir = settings
        .data_dir
        .clone()
        .or_else(bootstrap::discover_data_path)
        .context("no data directory found; pass --data-dir or create ./data")?;

    let (stations, reviews) = load_dataset(&data_dir)?;
    tracing::info!(
        "Loaded {} stations and {} reviews from {}",
        stations.len(),
        reviews.len(),
        data_dir.display()
    );

    let taxonomy = match &settings.taxonomy_file {
        Some(path) => ThemeTaxonomy::from_json_file(path)?,
        None => ThemeTaxonomy::default(),
    };
    let aliases = match &settings.aliases_file {
        Some(path) => RouterAliases::from_json_file(path)?,
        None => RouterAliases::default(),
    };
    let scorer = SentimentScorer::new();

    let analysis = analyze_reviews(&stations, &reviews, &taxonomy, &scorer, settings.window_days)?;

    match settings.view.as_str() {
        "summary" => render_summary(&analysis, &settings),
        "stations" => render_stations(&analysis, &settings),
        "ask" => {
            let Some(question) = settings.question.as_deref() else {
                bail!("the ask view needs --question \"...\"");
            };
            let ctx = AnswerContext {
                stations: &stations,
                window: &analysis.window,
                window_days: settings.window_days,
                min_mentions: settings.min_mentions,
                top_n: settings.top_n as usize,
                snippets: settings.snippets as usize,
            };
            let outcome = answer_question(question, &aliases, &ctx);
            render_outcome(question, &outcome);
        }
        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}

// ── Summary view ──────────────────────────────────────────────────────────────

fn render_summary(analysis: &ReviewAnalysis, settings: &Settings) {
    let cur = &analysis.overall_current;
    let prev = &analysis.overall_prior;

    println!("Executive summary — last {} days", settings.window_days);
    println!(
        "(windows anchored at the latest review date: {})",
        analysis.window.max_date
    );
    println!();
    println!("Reviews (window):  {}", cur.review_count_display);
    println!("Avg rating:        {}", cur.avg_rating_display);
    println!("Negative %:        {}", cur.neg_pct_display);
    println!("Stations covered:  {}", analysis.metadata.stations_covered);
    println!();
    println!(
        "Sentiment split:   positive {} | neutral {} | negative {}",
        cur.pos_count, cur.neu_count, cur.neg_count
    );

    let positive: Vec<_> = analysis
        .window
        .current
        .iter()
        .filter(|r| r.sentiment_label == SentimentLabel::Positive)
        .cloned()
        .collect();
    let negative: Vec<_> = analysis
        .window
        .current
        .iter()
        .filter(|r| r.sentiment_label == SentimentLabel::Negative)
        .cloned()
        .collect();

    println!();
    println!("Top themes in positive reviews:");
    render_theme_list(&top_themes(&positive, 6));
    println!("Top themes in negative reviews:");
    render_theme_list(&top_themes(&negative, 6));

    println!();
    println!("Trend vs previous period:");
    println!(
        "  avg rating change: {}",
        format_delta_rating(analysis.trend.delta_rating)
    );
    println!(
        "  negative % change: {}",
        format_signed_pct(analysis.trend.delta_neg_pct)
    );
    println!("  prior period reviews: {}", prev.review_count);

    let top_n = settings.top_n as usize;
    let best = most_improved(&analysis.comparison, top_n);
    let worst = most_deteriorated(&analysis.comparison, top_n);

    println!();
    println!("Most improved (avg rating):");
    for record in &best {
        println!(
            "  {:<28} {:>6}  ({} reviews)",
            record.name,
            format_delta_rating(record.delta_rating),
            record.review_count_cur
        );
    }
    println!("Most deteriorated (avg rating):");
    for record in &worst {
        println!(
            "  {:<28} {:>6}  ({} reviews)",
            record.name,
            format_delta_rating(record.delta_rating),
            record.review_count_cur
        );
    }
}

fn render_theme_list(histogram: &[(String, usize)]) {
    if histogram.is_empty() {
        println!("  none detected");
        return;
    }
    for (theme, count) in histogram {
        println!("  {theme} ({count})");
    }
}

// ── Stations view ─────────────────────────────────────────────────────────────

fn render_stations(analysis: &ReviewAnalysis, settings: &Settings) {
    let rows: Vec<&StationMetrics> = analysis
        .station_metrics_current
        .iter()
        .filter(|row| row.review_count >= settings.min_reviews)
        .filter(|row| match &settings.borough {
            Some(borough) => row.borough.eq_ignore_ascii_case(borough),
            None => true,
        })
        .collect();

    println!(
        "Station metrics — last {} days ({} stations)",
        settings.window_days,
        rows.len()
    );
    println!();
    println!(
        "{:<28} {:<16} {:>8} {:>8} {:>6}  {:>3}/{:>3}/{:>3}",
        "Name", "Borough", "Reviews", "Avg", "Neg%", "pos", "neu", "neg"
    );
    for row in &rows {
        println!(
            "{:<28} {:<16} {:>8} {:>8} {:>6}  {:>3}/{:>3}/{:>3}",
            row.name,
            row.borough,
            row.review_count_display,
            row.avg_rating_display,
            row.neg_pct_display,
            row.pos_count,
            row.neu_count,
            row.neg_count
        );
    }

    // Drill into the strongest station, mirroring the explorer's default
    // selection: best average rating, review volume as tie-break.
    let mut ranked: Vec<&StationMetrics> = rows
        .iter()
        .copied()
        .filter(|r| r.review_count > 0)
        .collect();
    ranked.sort_by(|a, b| {
        b.avg_rating
            .total_cmp(&a.avg_rating)
            .then_with(|| b.review_count.cmp(&a.review_count))
    });
    let Some(best) = ranked.first() else {
        return;
    };

    let highlights = station_highlights(&best.station_id, &analysis.window.current, 3);
    println!();
    println!("Spotlight: {} ({})", best.name, best.borough);
    println!(
        "  key themes: {}",
        if highlights.top_themes.is_empty() {
            "none detected".to_string()
        } else {
            highlights
                .top_themes
                .iter()
                .map(|(theme, count)| format!("{theme} ({count})"))
                .collect::<Vec<_>>()
                .join(", ")
        }
    );
    println!("  recent positives:");
    render_highlight_rows(&highlights.recent_positive);
    println!("  recent negatives:");
    render_highlight_rows(&highlights.recent_negative);
}

fn render_highlight_rows(rows: &[&EnrichedReview]) {
    if rows.is_empty() {
        println!("    none in this window");
        return;
    }
    for review in rows {
        let rating = review
            .review
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    ⭐{} — {} — “{}”",
            rating,
            review.review.review_date,
            truncate_text(&review.review.review_text, 160)
        );
    }
}

// ── Ask view ──────────────────────────────────────────────────────────────────

fn render_outcome(question: &str, outcome: &RouterOutcome) {
    println!("Q: {question}");
    println!();
    match outcome {
        RouterOutcome::Answer(answer) => {
            println!("{}", answer.heading);
            println!();
            match &answer.body {
                AnswerBody::ThemeMentions(mentions) => {
                    for m in mentions {
                        println!("  {:<28} {:<16} {:>4} mentions", m.name, m.borough, m.mentions);
                    }
                }
                AnswerBody::ThemeHistogram(histogram) => {
                    if histogram.is_empty() {
                        println!("  no themes detected (taxonomy didn't match)");
                    }
                    for (theme, count) in histogram {
                        println!("  {theme:<16} {count:>4}");
                    }
                }
                AnswerBody::Comparison(records) => {
                    for r in records {
                        println!(
                            "  {:<28} {:>6} rating, {:>5} neg%  ({} reviews)",
                            r.name,
                            format_delta_rating(r.delta_rating),
                            format_signed_pct(r.delta_neg_pct),
                            r.review_count_cur
                        );
                    }
                }
            }
            println!();
            println!("Evidence:");
            for line in &answer.evidence {
                println!("  {line}");
            }
        }
        RouterOutcome::InsufficientEvidence {
            message,
            example_questions,
        } => {
            println!("{message}");
            println!();
            println!("Try questions like:");
            for example in example_questions {
                println!("  - {example}");
            }
        }
    }
}
