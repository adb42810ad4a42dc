// ---------------------------------------------------------------------------
// Axis scales
// ---------------------------------------------------------------------------

/// Padding between bars as a fraction of one slot.
pub const BAND_PADDING: f64 = 0.15;

/// Approximate number of ticks a "nice" y domain aims for.
pub const DEFAULT_TICKS: usize = 10;

/// Spacing of ticks covering `[0, max]` with about `count` ticks: 1, 2 or 5
/// times a power of ten.
///
/// Steps below 1 are held as their integer inverse (0.1 → `Inverse(10.0)`),
/// so rounding to them stays exact in floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Increment {
    Step(f64),
    Inverse(f64),
}

impl Increment {
    /// Smallest multiple of this increment that is `>= value`.
    fn ceil(self, value: f64) -> f64 {
        match self {
            Increment::Step(step) => (value / step).ceil() * step,
            Increment::Inverse(inv) => (value * inv).ceil() / inv,
        }
    }
}

fn tick_increment(max: f64, count: usize) -> Increment {
    let raw = max / count.max(1) as f64;
    let power = raw.log10().floor() as i32;
    let error = raw / 10f64.powi(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0 {
        Increment::Step(factor * 10f64.powi(power))
    } else {
        Increment::Inverse(10f64.powi(-power) / factor)
    }
}

/// Extend `max` up to the next tick boundary so the y axis ends on a round
/// number. Zero and non-finite maxima map to zero.
pub fn nice_max(max: f64, count: usize) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    let mut upper = max;
    let mut prev = None;
    // The increment can shift once the bound is rounded; iterate until stable.
    for _ in 0..10 {
        let increment = tick_increment(upper, count);
        if prev == Some(increment) {
            break;
        }
        upper = increment.ceil(max);
        prev = Some(increment);
    }
    upper
}

/// Width of one bar in slot units.
pub fn bar_width() -> f64 {
    1.0 - BAND_PADDING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_max_rounds_up_to_tick() {
        assert_eq!(nice_max(27.3, DEFAULT_TICKS), 28.0);
        assert_eq!(nice_max(9.1, DEFAULT_TICKS), 10.0);
        assert_eq!(nice_max(0.83, DEFAULT_TICKS), 0.9);
        assert_eq!(nice_max(0.123, DEFAULT_TICKS), 0.13);
        assert_eq!(nice_max(143.0, DEFAULT_TICKS), 160.0);
    }

    #[test]
    fn nice_max_keeps_round_values() {
        assert_eq!(nice_max(20.0, DEFAULT_TICKS), 20.0);
        assert_eq!(nice_max(5.0, DEFAULT_TICKS), 5.0);
        assert_eq!(nice_max(0.7, DEFAULT_TICKS), 0.7);
    }

    #[test]
    fn nice_max_of_empty_domain_is_zero() {
        assert_eq!(nice_max(0.0, DEFAULT_TICKS), 0.0);
        assert_eq!(nice_max(f64::NAN, DEFAULT_TICKS), 0.0);
    }

    #[test]
    fn nice_max_never_shrinks() {
        for i in 1..500 {
            let max = i as f64 * 0.37;
            assert!(nice_max(max, DEFAULT_TICKS) >= max, "max {max}");
        }
    }

    #[test]
    fn tick_increments_are_one_two_five() {
        assert_eq!(tick_increment(10.0, 10), Increment::Step(1.0));
        assert_eq!(tick_increment(20.0, 10), Increment::Step(2.0));
        assert_eq!(tick_increment(45.0, 10), Increment::Step(5.0));
        assert_eq!(tick_increment(80.0, 10), Increment::Step(10.0));
        assert_eq!(tick_increment(0.5, 10), Increment::Inverse(20.0));
        assert_eq!(tick_increment(0.83, 10), Increment::Inverse(10.0));
    }
}
