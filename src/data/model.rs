use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Inclusive age bounds a record must fall within to be kept at load time.
pub const MIN_AGE: f64 = 18.0;
pub const MAX_AGE: f64 = 45.0;

// ---------------------------------------------------------------------------
// Metric – the statistic being averaged
// ---------------------------------------------------------------------------

/// One of the three selectable per-game statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    #[default]
    Points,
    Rebounds,
    Assists,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Points, Metric::Rebounds, Metric::Assists];

    /// Column name of this metric in the source file.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Points => "pts",
            Metric::Rebounds => "reb",
            Metric::Assists => "ast",
        }
    }

    /// Axis / tooltip label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Points => "Average Points Per Game",
            Metric::Rebounds => "Average Rebounds Per Game",
            Metric::Assists => "Average Assists Per Game",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Points => "Points",
            Metric::Rebounds => "Rebounds",
            Metric::Assists => "Assists",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Record – one player season
// ---------------------------------------------------------------------------

/// A single sanitized player-season observation.
///
/// `age` and `games_played` are always finite; a metric whose source cell
/// was absent or non-numeric is NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub age: f64,
    pub games_played: f64,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
}

impl Record {
    /// Value of the given metric for this season.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Points => self.points,
            Metric::Rebounds => self.rebounds,
            Metric::Assists => self.assists,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection – what the controls currently ask for
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub metric: Metric,
    pub min_games_played: u32,
}

// ---------------------------------------------------------------------------
// AggregatePoint – one bar of the chart
// ---------------------------------------------------------------------------

/// Mean of the selected metric over all surviving records sharing `age`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatePoint {
    pub age: f64,
    pub value: f64,
    /// Number of finite metric values averaged into `value`.
    pub count: usize,
}

/// Age used as a grouping / diffing key.
///
/// Ages are finite once loaded, so `total_cmp` gives the natural order.
#[derive(Debug, Clone, Copy)]
pub struct AgeKey(pub f64);

impl PartialEq for AgeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AgeKey {}

impl PartialOrd for AgeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AgeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Format an age for axis ticks and tooltips: whole ages without decimals.
pub fn format_age(age: f64) -> String {
    if age.fract() == 0.0 {
        format!("{age:.0}")
    } else {
        format!("{age}")
    }
}

// ---------------------------------------------------------------------------
// PlayerDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The sanitized records plus bookkeeping about the load.
#[derive(Debug, Clone, Default)]
pub struct PlayerDataset {
    pub records: Vec<Record>,
    /// Data rows seen in the source file (header excluded).
    pub rows_read: usize,
    /// Rows dropped for an unusable `age` / `gp` or an age out of range.
    pub rows_rejected: usize,
    pub source: Option<PathBuf>,
}

impl PlayerDataset {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_keys_match_source_columns() {
        let keys: Vec<&str> = Metric::ALL.iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["pts", "reb", "ast"]);
        assert_eq!(Metric::default(), Metric::Points);
    }

    #[test]
    fn record_metric_selects_field() {
        let r = Record {
            age: 27.0,
            games_played: 60.0,
            points: 21.5,
            rebounds: 7.0,
            assists: 4.25,
        };
        assert_eq!(r.metric(Metric::Points), 21.5);
        assert_eq!(r.metric(Metric::Rebounds), 7.0);
        assert_eq!(r.metric(Metric::Assists), 4.25);
    }

    #[test]
    fn age_key_orders_numerically() {
        let mut keys = vec![AgeKey(30.0), AgeKey(19.0), AgeKey(25.5)];
        keys.sort();
        let ages: Vec<f64> = keys.iter().map(|k| k.0).collect();
        assert_eq!(ages, vec![19.0, 25.5, 30.0]);
        assert_eq!(AgeKey(22.0), AgeKey(22.0));
    }

    #[test]
    fn format_age_drops_trailing_zero() {
        assert_eq!(format_age(24.0), "24");
        assert_eq!(format_age(24.5), "24.5");
    }
}
