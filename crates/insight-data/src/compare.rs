//! Current-vs-prior window comparison per station.

use std::cmp::Ordering;

use insight_core::models::{ComparisonRecord, EnrichedReview, Station};

use crate::metrics::station_metrics;

/// Join current- and prior-window metrics per station and compute deltas.
///
/// Both metric sets are left-joins over the same station list, so the join
/// is positional; a station with no prior-window reviews compares against
/// zero-valued prior metrics rather than null. Stations with no
/// current-window reviews are dropped. Output keeps station input order.
pub fn compare_windows(
    stations: &[Station],
    current: &[EnrichedReview],
    prior: &[EnrichedReview],
) -> Vec<ComparisonRecord> {
    let cur = station_metrics(stations, current);
    let prev = station_metrics(stations, prior);

    cur.into_iter()
        .zip(prev)
        .filter(|(c, _)| c.review_count > 0)
        .map(|(c, p)| ComparisonRecord {
            station_id: c.station_id,
            name: c.name,
            review_count_cur: c.review_count,
            avg_rating_cur: c.avg_rating,
            neg_pct_cur: c.neg_pct,
            avg_rating_prev: p.avg_rating,
            neg_pct_prev: p.neg_pct,
            delta_rating: c.avg_rating - p.avg_rating,
            delta_neg_pct: c.neg_pct - p.neg_pct,
        })
        .collect()
}

/// Top `n` records by descending rating delta.
///
/// Stable: records with equal deltas keep their input (station) order.
pub fn most_improved(records: &[ComparisonRecord], n: usize) -> Vec<ComparisonRecord> {
    ranked_by_delta(records, n, |a, b| b.delta_rating.total_cmp(&a.delta_rating))
}

/// Top `n` records by ascending rating delta.
pub fn most_deteriorated(records: &[ComparisonRecord], n: usize) -> Vec<ComparisonRecord> {
    ranked_by_delta(records, n, |a, b| a.delta_rating.total_cmp(&b.delta_rating))
}

fn ranked_by_delta(
    records: &[ComparisonRecord],
    n: usize,
    cmp: impl Fn(&ComparisonRecord, &ComparisonRecord) -> Ordering,
) -> Vec<ComparisonRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(cmp);
    ranked.truncate(n);
    ranked
}

// ── Tests ─────────────────────────────────────────────────────────────────────
