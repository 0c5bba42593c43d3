//! Fixed-timestep clock: turns variable real frame times into a count of
//! constant-size simulation steps plus an interpolation fraction.
//!
//! # Invariants
//! - Simulation step size never depends on the real frame rate.
//! - At most [`MAX_UPDATES_PER_FRAME`] steps are handed out per frame; time
//!   beyond that is dropped, not queued.
//! - `update` never fails; it only reports whether a frame is ready.

mod clock;
mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{MAX_UPDATES_PER_FRAME, StepPlan, Tick, TimeConfig, TimeManager};

/// Errors from configuring the clock.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    #[error("fps must be finite and positive, got {0}")]
    InvalidFps(f64),
    #[error("time scale must be finite and non-negative, got {0}")]
    InvalidTimeScale(f64),
}

pub fn crate_info() -> &'static str {
    "easel-time v0.1.0"
}
