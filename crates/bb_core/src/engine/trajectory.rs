//! Ball trajectory model
//!
//! Perspective-scaled projectile approximation. `depth` is a scripted
//! distance-to-plate parameter that runs from [`START_DEPTH`] down to
//! [`DEPTH_SCALE`] over the pitch's travel time. Screen-space motion is
//! divided by `dist = depth / 300`, so the ball barely moves at release and
//! speeds up as it "grows" toward the batter.
//!
//! The integrator is explicit Euler, one step per fixed tick. Timing windows
//! were tuned against this stepping; do not replace it with a closed form.

use serde::{Deserialize, Serialize};

use super::geometry::Point2;
use super::pitch::PitchDefinition;
use super::timestep::{ticks_elapsed, TICK_HZ};

/// Depth at release
pub const START_DEPTH: f64 = 4600.0;
/// Divisor turning depth into the perspective distance
pub const DEPTH_SCALE: f64 = 300.0;
/// Depth covered between release and arrival
pub const DEPTH_SPAN: f64 = 4300.0;

/// Inverse solver velocity bound (both signs)
pub const SOLVE_VELOCITY_BOUND: f64 = 200.0;
/// Inverse solver convergence tolerance (px)
pub const SOLVE_TOLERANCE_PX: f64 = 0.01;
/// Inverse solver iteration cap
pub const SOLVE_MAX_ITERATIONS: u32 = 100;

/// Ball position: screen x/y plus scripted depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl Position3 {
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Perspective distance (`depth / 300`)
    pub fn dist(&self) -> f64 {
        self.depth / DEPTH_SCALE
    }
}

/// Depth lost per tick for a given travel time
#[inline]
pub fn depth_step(traveltime_ms: f64) -> f64 {
    (DEPTH_SPAN * 1000.0) / (TICK_HZ * traveltime_ms)
}

// ============================================================================
// BallFlight (running integrator)
// ============================================================================

/// One running pitch's integrator state.
///
/// Owns the mutable `vx`/`vy` accumulators; the definition is never touched.
#[derive(Debug, Clone)]
pub struct BallFlight {
    pos: Position3,
    vx: f64,
    vy: f64,
    ax: f64,
    ay: f64,
    step: f64,
    ticks: u32,
}

impl BallFlight {
    pub fn new(release: Point2, vx: f64, vy: f64, ax: f64, ay: f64, traveltime_ms: f64) -> Self {
        Self {
            pos: Position3 { x: release.x, y: release.y, depth: START_DEPTH },
            vx,
            vy,
            ax,
            ay,
            step: depth_step(traveltime_ms),
            ticks: 0,
        }
    }

    /// Seed a fresh integrator from a definition's initial velocity
    pub fn from_pitch(pitch: &PitchDefinition) -> Self {
        Self::new(pitch.release, pitch.vx, pitch.vy, pitch.ax, pitch.ay, pitch.traveltime_ms)
    }

    pub fn position(&self) -> Position3 {
        self.pos
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// True while `depth / 300 > 1`
    pub fn in_flight(&self) -> bool {
        self.pos.depth / DEPTH_SCALE > 1.0
    }

    /// Advance one tick. Returns false (and does nothing) once the ball has landed.
    pub fn step(&mut self) -> bool {
        if !self.in_flight() {
            return false;
        }
        let dist = self.pos.depth / DEPTH_SCALE;
        self.pos.x += self.vx / dist;
        self.pos.y += self.vy / dist;
        self.pos.depth -= self.step;
        self.vy += self.ay * DEPTH_SCALE / dist;
        self.vx += self.ax * DEPTH_SCALE / dist;
        self.ticks += 1;
        true
    }

    /// Step until `tick` ticks have run or the ball lands
    pub fn advance_to(&mut self, tick: u32) -> Position3 {
        while self.ticks < tick {
            if !self.step() {
                break;
            }
        }
        self.pos
    }
}

// ============================================================================
// Pure queries
// ============================================================================

/// Ball position `elapsed_ms` after release.
///
/// Re-seeds the integrator from the definition on every call.
pub fn position_at(pitch: &PitchDefinition, elapsed_ms: f64) -> Position3 {
    BallFlight::from_pitch(pitch).advance_to(ticks_elapsed(elapsed_ms))
}

/// Ball position at the scripted arrival time (`elapsed_ms = traveltime`)
pub fn arrival_position(pitch: &PitchDefinition) -> Position3 {
    position_at(pitch, pitch.traveltime_ms)
}

/// Back-compute the initial velocity that puts the ball at
/// `(target_x, target_y)` at arrival, keeping the given break.
///
/// The axes are independent under this model, so each is solved by its own
/// bisection over `[-200, 200]`. Targets outside the reachable range clamp to
/// the nearest bound.
pub fn velocity_for_target(
    release: Point2,
    target_x: f64,
    target_y: f64,
    ax: f64,
    ay: f64,
    traveltime_ms: f64,
) -> (f64, f64) {
    let ticks = ticks_elapsed(traveltime_ms);

    let vx = solve_axis(target_x, |v| {
        BallFlight::new(release, v, 0.0, ax, 0.0, traveltime_ms).advance_to(ticks).x
    });
    let vy = solve_axis(target_y, |v| {
        BallFlight::new(release, 0.0, v, 0.0, ay, traveltime_ms).advance_to(ticks).y
    });

    log::trace!("velocity_for_target -> vx={:.3} vy={:.3}", vx, vy);
    (vx, vy)
}

/// Bisection on a coordinate that increases with the trial velocity
fn solve_axis(target: f64, reached: impl Fn(f64) -> f64) -> f64 {
    let mut lo = -SOLVE_VELOCITY_BOUND;
    let mut hi = SOLVE_VELOCITY_BOUND;
    let mut mid = 0.0;

    for _ in 0..SOLVE_MAX_ITERATIONS {
        mid = 0.5 * (lo + hi);
        let error = reached(mid) - target;
        if error.abs() < SOLVE_TOLERANCE_PX {
            break;
        }
        if error < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    mid
}
