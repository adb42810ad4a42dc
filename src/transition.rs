use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::{AgeKey, AggregatePoint};

// ---------------------------------------------------------------------------
// Keyed bar transitions
// ---------------------------------------------------------------------------
//
// Each bar is keyed by age. When a new aggregate arrives the previous and
// next key sets are diffed:
//
//   exiting  → height falls to zero in place, then the bar is dropped
//   entering → starts at the baseline in its new slot and grows
//   updating → slides to its new slot and resizes
//
// Exits play first; enter/update tweens wait until every leaving bar (new or
// still in flight from an earlier change) is gone, so leaving and arriving
// bars never share a slot.

/// Duration of the exit animation.
pub const EXIT_SECS: f64 = 0.3;
/// Duration of the enter / update animation.
pub const UPDATE_SECS: f64 = 0.5;

/// Cubic in-out easing on `t ∈ [0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// A timed interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start: f64,
    pub duration: f64,
}

impl Tween {
    /// A tween that is already at rest on `value`.
    pub fn settled(value: f64) -> Self {
        Tween {
            from: value,
            to: value,
            start: f64::NEG_INFINITY,
            duration: 0.0,
        }
    }

    pub fn value_at(&self, now: f64) -> f64 {
        if now <= self.start {
            return self.from;
        }
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to;
        }
        let t = ease_cubic_in_out((now - self.start) / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.duration <= 0.0 || now >= self.start + self.duration
    }

    /// Continue from wherever this tween is at `now` towards `to`.
    fn retarget(&self, now: f64, to: f64, start: f64, duration: f64) -> Self {
        Tween {
            from: self.value_at(now),
            to,
            start,
            duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Updating,
    Exiting,
    Settled,
}

/// Animated state of one keyed bar.
#[derive(Debug, Clone)]
struct AnimatedBar {
    slot: Tween,
    height: Tween,
    phase: Phase,
    /// Latest aggregate for this age; kept while exiting for the tooltip.
    point: AggregatePoint,
}

/// Snapshot of one bar for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFrame {
    pub point: AggregatePoint,
    pub slot: f64,
    pub height: f64,
    pub phase: Phase,
}

/// Result of diffing the previous bar keys against a new aggregate.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeyDiff {
    pub entering: Vec<f64>,
    pub updating: Vec<f64>,
    pub exiting: Vec<f64>,
}

/// Partition ages into entering, updating and exiting, each in ascending order.
pub fn diff_keys(previous: &BTreeSet<AgeKey>, next: &[AggregatePoint]) -> KeyDiff {
    let next_keys: BTreeSet<AgeKey> = next.iter().map(|p| AgeKey(p.age)).collect();
    KeyDiff {
        entering: next_keys.difference(previous).map(|k| k.0).collect(),
        updating: next_keys.intersection(previous).map(|k| k.0).collect(),
        exiting: previous.difference(&next_keys).map(|k| k.0).collect(),
    }
}

/// All keyed bars currently on screen, including those still exiting.
#[derive(Debug, Default, Clone)]
pub struct BarTransitions {
    bars: BTreeMap<AgeKey, AnimatedBar>,
}

impl BarTransitions {
    /// Ages that are live, i.e. not on their way out.
    pub fn live_keys(&self) -> BTreeSet<AgeKey> {
        self.bars
            .iter()
            .filter(|(_, bar)| bar.phase != Phase::Exiting)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Start transitions from the current on-screen state to `points`.
    ///
    /// `points` must be sorted by age; a bar's slot is its index.
    pub fn retarget(&mut self, points: &[AggregatePoint], now: f64) -> KeyDiff {
        let diff = diff_keys(&self.live_keys(), points);

        for age in &diff.exiting {
            if let Some(bar) = self.bars.get_mut(&AgeKey(*age)) {
                let frozen = bar.slot.value_at(now);
                bar.slot = Tween::settled(frozen);
                bar.height = bar.height.retarget(now, 0.0, now, EXIT_SECS);
                bar.phase = Phase::Exiting;
            }
        }

        // Enter/update starts once the last bar still leaving is gone.
        let next_keys: BTreeSet<AgeKey> = points.iter().map(|p| AgeKey(p.age)).collect();
        let start = self
            .bars
            .iter()
            .filter(|(key, bar)| bar.phase == Phase::Exiting && !next_keys.contains(key))
            .map(|(_, bar)| bar.height.start + bar.height.duration)
            .fold(now, f64::max);

        for (index, point) in points.iter().enumerate() {
            let slot = index as f64;
            match self.bars.get_mut(&AgeKey(point.age)) {
                // Live bar, or one that was exiting and has come back.
                Some(bar) => {
                    bar.slot = bar.slot.retarget(now, slot, start, UPDATE_SECS);
                    bar.height = bar.height.retarget(now, point.value, start, UPDATE_SECS);
                    bar.phase = Phase::Updating;
                    bar.point = *point;
                }
                None => {
                    self.bars.insert(
                        AgeKey(point.age),
                        AnimatedBar {
                            slot: Tween::settled(slot),
                            height: Tween {
                                from: 0.0,
                                to: point.value,
                                start,
                                duration: UPDATE_SECS,
                            },
                            phase: Phase::Entering,
                            point: *point,
                        },
                    );
                }
            }
        }

        diff
    }

    /// Advance to `now`: settle finished tweens, drop finished exits and
    /// return what to draw, ordered by age.
    pub fn frame(&mut self, now: f64) -> Vec<BarFrame> {
        self.bars
            .retain(|_, bar| !(bar.phase == Phase::Exiting && bar.height.is_done(now)));

        self.bars
            .values_mut()
            .map(|bar| {
                if bar.phase != Phase::Exiting
                    && bar.slot.is_done(now)
                    && bar.height.is_done(now)
                {
                    bar.phase = Phase::Settled;
                }
                BarFrame {
                    point: bar.point,
                    slot: bar.slot.value_at(now),
                    height: bar.height.value_at(now),
                    phase: bar.phase,
                }
            })
            .collect()
    }

    /// Whether any bar still needs repainting after `now`.
    pub fn is_animating(&self, now: f64) -> bool {
        self.bars
            .values()
            .any(|bar| !(bar.slot.is_done(now) && bar.height.is_done(now)))
    }
}
