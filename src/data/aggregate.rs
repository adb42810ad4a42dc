use std::collections::BTreeMap;

use super::model::{AgeKey, AggregatePoint, Metric, Record};

// ---------------------------------------------------------------------------
// Games-played filter
// ---------------------------------------------------------------------------

/// Records with at least `min_games_played` games.
pub fn surviving_records(
    records: &[Record],
    min_games_played: u32,
) -> impl Iterator<Item = &Record> + '_ {
    let threshold = f64::from(min_games_played);
    records.iter().filter(move |r| r.games_played >= threshold)
}

// ---------------------------------------------------------------------------
// Group-by-age mean
// ---------------------------------------------------------------------------

/// Average `metric` per distinct age over the records passing the
/// games-played threshold, ordered by ascending age.
///
/// Non-finite metric values are left out of their age's mean; an age whose
/// values are all non-finite still gets a point, with value 0 and count 0.
/// An empty result is valid and only reported as a diagnostic.
pub fn aggregate_by_age(
    records: &[Record],
    metric: Metric,
    min_games_played: u32,
) -> Vec<AggregatePoint> {
    // age → (sum, count) over finite values
    let mut groups: BTreeMap<AgeKey, (f64, usize)> = BTreeMap::new();
    for r in surviving_records(records, min_games_played) {
        let slot = groups.entry(AgeKey(r.age)).or_insert((0.0, 0));
        let value = r.metric(metric);
        if value.is_finite() {
            slot.0 += value;
            slot.1 += 1;
        }
    }

    if groups.is_empty() {
        log::warn!("No data after filtering; try lowering minimum games played.");
    }

    groups
        .into_iter()
        .map(|(AgeKey(age), (sum, count))| AggregatePoint {
            age,
            value: if count == 0 { 0.0 } else { sum / count as f64 },
            count,
        })
        .collect()
}
