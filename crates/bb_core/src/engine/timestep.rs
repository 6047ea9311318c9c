//! Fixed tick constants
//!
//! The pitch engine is tick-driven: one fixed-rate loop advances simulated
//! time and the trajectory integrator steps once per tick. Gameplay timing
//! windows were tuned against this stepping, so the rate is a constant and
//! not a config value.

/// Simulation rate (ticks per second)
pub const TICK_HZ: f64 = 60.0;

/// Duration of one tick in milliseconds
pub const TICK_MS: f64 = 1000.0 / TICK_HZ;

/// Whole ticks that have completed after `elapsed_ms`.
///
/// Negative or NaN input yields zero ticks.
#[inline]
pub fn ticks_elapsed(elapsed_ms: f64) -> u32 {
    if elapsed_ms.is_nan() || elapsed_ms <= 0.0 {
        return 0;
    }
    // Small epsilon so that exact multiples of TICK_MS are not lost to rounding.
    let ticks = (elapsed_ms * TICK_HZ / 1000.0 + 1e-9).floor();
    if ticks >= u32::MAX as f64 {
        u32::MAX
    } else {
        ticks as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_consistency() {
        assert_eq!(TICK_HZ, 60.0);
        assert!((TICK_MS * TICK_HZ - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_ticks_elapsed() {
        assert_eq!(ticks_elapsed(0.0), 0);
        assert_eq!(ticks_elapsed(-5.0), 0);
        assert_eq!(ticks_elapsed(f64::NAN), 0);
        assert_eq!(ticks_elapsed(16.0), 0);
        assert_eq!(ticks_elapsed(TICK_MS), 1);
        assert_eq!(ticks_elapsed(1000.0), 60);
        // 370ms flight = 22.2 ticks
        assert_eq!(ticks_elapsed(370.0), 22);
    }
}
