use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::TimeError;
use crate::clock::{Clock, SystemClock};

/// Most fixed steps handed out for a single real frame.
pub const MAX_UPDATES_PER_FRAME: u32 = 100;

const FPS_WINDOW_MS: f64 = 1000.0;
const FPS_UPDATE_MS: f64 = 500.0;
/// `last_time` is pulled back by the residual modulo this.
const DRIFT_MODULUS_MS: f64 = 10.0;

/// Clock configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Simulation steps per second.
    pub fps: f64,
    /// Multiplier applied to the step size handed to the simulation.
    pub time_scale: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            time_scale: 1.0,
        }
    }
}

/// Work the driver should do for one ready frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Fixed simulation steps to run.
    pub update_count: u32,
    /// Step size (ms) for each of those steps, already time-scaled.
    pub fixed_delta: f64,
    /// Progress into the next, not yet run, step.
    pub interpolation_time: f64,
    /// Backlog (ms) discarded because the frame hit the step cap.
    pub dropped_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    NotReady,
    Ready(StepPlan),
}

impl Tick {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn plan(&self) -> Option<StepPlan> {
        match self {
            Self::Ready(plan) => Some(*plan),
            Self::NotReady => None,
        }
    }
}

/// Fixed-timestep accumulator.
///
/// Real elapsed time is accumulated into a residual and paid out in whole
/// `timestep` steps. State only changes inside [`TimeManager::update`], and
/// only on frames that are ready.
#[derive(Debug)]
pub struct TimeManager<C: Clock = SystemClock> {
    clock: C,
    time_scale: f64,
    last_time: f64,
    curr_time: f64,
    delta_time: f64,
    timestep: f64,
    fps: f64,
    fps_history: VecDeque<f64>,
    fps_last_tick: f64,
    fps_update_time: f64,
}

impl TimeManager<SystemClock> {
    pub fn with_system_clock(config: TimeConfig) -> Result<Self, TimeError> {
        Self::new(config, SystemClock::new())
    }
}

impl<C: Clock> TimeManager<C> {
    pub fn new(config: TimeConfig, clock: C) -> Result<Self, TimeError> {
        if !config.fps.is_finite() || config.fps <= 0.0 {
            return Err(TimeError::InvalidFps(config.fps));
        }
        if !config.time_scale.is_finite() || config.time_scale < 0.0 {
            return Err(TimeError::InvalidTimeScale(config.time_scale));
        }

        let curr_time = clock.now_ms();
        let timestep = 1000.0 / config.fps;
        Ok(Self {
            clock,
            time_scale: config.time_scale,
            last_time: 0.0,
            curr_time,
            delta_time: timestep,
            timestep,
            fps: config.fps,
            fps_history: VecDeque::new(),
            fps_last_tick: 0.0,
            fps_update_time: FPS_UPDATE_MS,
        })
    }

    /// Sample the clock and decide how many fixed steps are due.
    pub fn update(&mut self) -> Tick {
        let now = self.clock.now_ms();
        let elapsed = now - self.last_time;
        if elapsed < self.timestep {
            return Tick::NotReady;
        }

        self.curr_time = now;
        self.delta_time += elapsed;

        while self
            .fps_history
            .front()
            .is_some_and(|&tick| tick <= now - FPS_WINDOW_MS)
        {
            self.fps_history.pop_front();
        }
        self.fps_history.push_back(now);
        if now - self.fps_last_tick >= self.fps_update_time {
            self.fps = self.fps_history.len() as f64;
            self.fps_last_tick = now;
        }

        let due = (self.delta_time / self.timestep).floor();
        let update_count = if due >= f64::from(MAX_UPDATES_PER_FRAME) {
            MAX_UPDATES_PER_FRAME
        } else {
            due as u32
        };
        self.delta_time -= f64::from(update_count) * self.timestep;
        let mut dropped_time = 0.0;
        if update_count == MAX_UPDATES_PER_FRAME && self.delta_time >= self.timestep {
            let kept = self.delta_time % self.timestep;
            dropped_time = self.delta_time - kept;
            tracing::warn!(
                dropped_ms = dropped_time,
                "frame fell behind, dropping simulation time"
            );
            self.delta_time = kept;
        }
        self.delta_time = self.delta_time.max(0.0);
        self.last_time = now - self.delta_time % DRIFT_MODULUS_MS;

        tracing::trace!(
            update_count,
            residual_ms = self.delta_time,
            fps = self.fps,
            "clock tick"
        );

        Tick::Ready(StepPlan {
            update_count,
            fixed_delta: self.timestep * self.time_scale,
            interpolation_time: self.delta_time / self.timestep,
            dropped_time,
        })
    }

    /// Measured frames per second (the configured rate until first measured).
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Accumulated time not yet paid out as a step.
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// Time of the last ready frame.
    pub fn curr_time(&self) -> f64 {
        self.curr_time
    }

    pub fn fps_history(&self) -> &VecDeque<f64> {
        &self.fps_history
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const EPS: f64 = 1e-9;

    fn manager(fps: f64) -> (TimeManager<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0.0);
        let config = TimeConfig {
            fps,
            ..TimeConfig::default()
        };
        (TimeManager::new(config, clock.clone()).unwrap(), clock)
    }

    fn ready(tick: Tick) -> StepPlan {
        tick.plan().expect("expected a ready tick")
    }

    #[test]
    fn rejects_bad_config() {
        let clock = ManualClock::default();
        for fps in [0.0, -30.0, f64::NAN, f64::INFINITY] {
            let config = TimeConfig {
                fps,
                ..TimeConfig::default()
            };
            assert!(matches!(
                TimeManager::new(config, clock.clone()),
                Err(TimeError::InvalidFps(_))
            ));
        }
        let config = TimeConfig {
            time_scale: -1.0,
            ..TimeConfig::default()
        };
        assert!(matches!(
            TimeManager::new(config, clock),
            Err(TimeError::InvalidTimeScale(_))
        ));
    }

    #[test]
    fn timestep_from_fps() {
        let (tm, _) = manager(60.0);
        assert!((tm.timestep() - 1000.0 / 60.0).abs() < EPS);
        assert_eq!(tm.fps(), 60.0);
        assert_eq!(tm.delta_time(), tm.timestep());
    }

    #[test]
    fn first_tick_pays_out_the_seeded_step() {
        let (mut tm, clock) = manager(60.0);
        clock.set(20.0);
        let plan = ready(tm.update());
        // (16.667 + 20) / 16.667 floors to 2
        assert_eq!(plan.update_count, 2);
        assert!((plan.interpolation_time - 0.2).abs() < 1e-9);
        assert_eq!(plan.dropped_time, 0.0);
    }

    #[test]
    fn sixteen_ms_frames_at_sixty_fps() {
        let (mut tm, clock) = manager(60.0);
        let mut plans = Vec::new();
        for _ in 0..5 {
            clock.advance(16.0);
            plans.push(tm.update().plan());
        }

        assert!(plans[0].is_none());
        let expected = [(2, 0.92), (2, 0.2), (1, 0.36), (1, 0.68)];
        for (plan, (count, interp)) in plans[1..].iter().zip(expected) {
            let plan = plan.expect("ready");
            assert_eq!(plan.update_count, count);
            assert!((plan.interpolation_time - interp).abs() < 1e-9);
            assert!((plan.fixed_delta - 1000.0 / 60.0).abs() < EPS);
        }
    }

    #[test]
    fn not_ready_leaves_state_alone() {
        let (mut tm, clock) = manager(60.0);
        clock.set(20.0);
        ready(tm.update());
        let (delta, last, history) = (tm.delta_time(), tm.last_time(), tm.fps_history().len());

        clock.set(25.0);
        assert_eq!(tm.update(), Tick::NotReady);
        assert_eq!(tm.delta_time(), delta);
        assert_eq!(tm.last_time(), last);
        assert_eq!(tm.fps_history().len(), history);
        assert_eq!(tm.curr_time(), 20.0);
    }

    #[test]
    fn last_time_keeps_residual_modulo_ten() {
        let (mut tm, clock) = manager(60.0);
        clock.set(20.0);
        let plan = ready(tm.update());
        assert_eq!(plan.update_count, 2);
        // residual 16.667 + 20 - 2 * 16.667 = 3.333; last_time = 20 - 3.333
        assert!((tm.delta_time() - 10.0 / 3.0).abs() < 1e-9);
        assert!((tm.last_time() - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn long_stall_is_capped_and_excess_dropped() {
        let (mut tm, clock) = manager(60.0);
        clock.set(5010.0);
        let plan = ready(tm.update());
        assert_eq!(plan.update_count, MAX_UPDATES_PER_FRAME);
        assert!(tm.delta_time() < tm.timestep());
        assert!((tm.delta_time() - 10.0).abs() < 1e-6);
        assert!((plan.interpolation_time - 0.6).abs() < 1e-6);
        assert!((plan.dropped_time - 3350.0).abs() < 1e-6);

        // The dropped backlog is not paid out later.
        clock.advance(20.0);
        let next = ready(tm.update());
        assert!(next.update_count <= 2);
    }

    #[test]
    fn time_scale_scales_fixed_delta() {
        let clock = ManualClock::new(0.0);
        let config = TimeConfig {
            fps: 50.0,
            time_scale: 0.5,
        };
        let mut tm = TimeManager::new(config, clock.clone()).unwrap();
        clock.set(20.0);
        let plan = ready(tm.update());
        assert_eq!(plan.update_count, 2);
        assert!((plan.fixed_delta - 10.0).abs() < EPS);
        assert_eq!(tm.time_scale(), 0.5);
    }

    #[test]
    fn fps_is_measured_over_one_second() {
        let (mut tm, clock) = manager(60.0);
        for _ in 0..15 {
            clock.advance(100.0);
            ready(tm.update());
        }
        assert_eq!(tm.fps(), 10.0);
        assert_eq!(tm.fps_history().len(), 10);
    }

    #[test]
    fn fps_history_window_is_one_second() {
        let (mut tm, clock) = manager(60.0);
        for i in 0..200 {
            clock.advance(if i % 3 == 0 { 45.0 } else { 17.0 });
            if tm.update().is_ready() {
                let newest = *tm.fps_history().back().unwrap();
                assert!(tm.fps_history().iter().all(|&t| newest - t < 1000.0));
            }
        }
    }

    #[test]
    fn steps_track_real_time_within_drift() {
        let (mut tm, clock) = manager(60.0);
        let mut steps = 0u32;
        let mut ready_frames = 0u32;
        for _ in 0..60 {
            clock.advance(16.0);
            if let Some(plan) = tm.update().plan() {
                steps += plan.update_count;
                ready_frames += 1;
                assert!(plan.update_count >= 1);
                assert!(plan.interpolation_time >= 0.0 && plan.interpolation_time < 1.0);
            }
        }
        // The seeded residual counts as one step of simulated time up front.
        let simulated = f64::from(steps) * tm.timestep() + tm.delta_time();
        let real = clock.now_ms() + tm.timestep();
        assert!(simulated >= real - tm.timestep());
        assert!(simulated <= real + DRIFT_MODULUS_MS * f64::from(ready_frames));
    }

    /// Running totals for checking that no elapsed time goes missing.
    #[derive(Default)]
    struct Ledger {
        elapsed: f64,
        stepped: f64,
        dropped: f64,
    }

    impl Ledger {
        fn tick(
            &mut self,
            tm: &mut TimeManager<ManualClock>,
            clock: &ManualClock,
            advance: f64,
        ) -> Option<StepPlan> {
            clock.advance(advance);
            let since_last = clock.now_ms() - tm.last_time();
            let plan = tm.update().plan()?;
            self.elapsed += since_last;
            self.stepped += f64::from(plan.update_count) * plan.fixed_delta / tm.time_scale();
            self.dropped += plan.dropped_time;
            Some(plan)
        }
    }

    #[test]
    fn accumulator_conserves_elapsed_time() {
        let clock = ManualClock::new(0.0);
        let config = TimeConfig {
            fps: 60.0,
            time_scale: 0.75,
        };
        let mut tm = TimeManager::new(config, clock.clone()).unwrap();
        let seeded = tm.delta_time();
        let mut ledger = Ledger::default();

        for i in 0..120 {
            let frame = [7.0, 23.0, 16.0, 41.0, 3.0, 30.0][i % 6];
            if let Some(plan) = ledger.tick(&mut tm, &clock, frame) {
                assert!(plan.update_count < MAX_UPDATES_PER_FRAME);
                assert_eq!(plan.dropped_time, 0.0);
            }
        }
        let accounted = ledger.stepped + tm.delta_time();
        assert!((accounted - (seeded + ledger.elapsed)).abs() < 1e-9);

        let stall = ledger
            .tick(&mut tm, &clock, 4000.0)
            .expect("a stall is always ready");
        assert_eq!(stall.update_count, MAX_UPDATES_PER_FRAME);
        assert!(stall.dropped_time > 0.0);
        let shortfall = seeded + ledger.elapsed - (ledger.stepped + tm.delta_time());
        assert!((shortfall - ledger.dropped).abs() < 1e-9);
        assert!((shortfall - stall.dropped_time).abs() < 1e-9);
    }
}
