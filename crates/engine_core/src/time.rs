//! Fixed-timestep clock for the simulation loop.

use std::time::{Duration, Instant};

/// Default logic rate in Hz.
pub const DEFAULT_TICK_RATE: f64 = 30.0;

/// Default cap on logic ticks run for a single frame.
pub const DEFAULT_MAX_CATCH_UP: u32 = 10;

/// Accumulates frame time and hands out whole logic ticks.
///
/// The frame-pacing loop calls [`FixedStep::update`] (wall clock) or
/// [`FixedStep::advance`] (supplied delta) once per rendered frame and runs
/// the returned number of simulation ticks. Backlog beyond
/// `max_catch_up` ticks is dropped so a long stall cannot snowball.
#[derive(Debug)]
pub struct FixedStep {
    /// Time of the last frame.
    last_frame: Instant,
    /// Fixed timestep for logic ticks.
    timestep: Duration,
    /// Accumulated time not yet consumed by ticks.
    accumulator: Duration,
    /// Maximum ticks handed out per frame.
    max_catch_up: u32,
    /// Ticks handed out since creation.
    tick_count: u64,
    /// Ticks discarded because of the catch-up cap.
    dropped_ticks: u64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE, DEFAULT_MAX_CATCH_UP)
    }
}

impl FixedStep {
    /// Create a clock ticking at `hz` with at most `max_catch_up` ticks per frame.
    pub fn new(hz: f64, max_catch_up: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            timestep: timestep_for(hz),
            accumulator: Duration::ZERO,
            max_catch_up: max_catch_up.max(1),
            tick_count: 0,
            dropped_ticks: 0,
        }
    }

    /// Measure wall-clock time since the previous frame and return the ticks to run.
    pub fn update(&mut self) -> u32 {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.advance(delta)
    }

    /// Add `delta` of frame time and return the ticks to run.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta;
        let mut ticks = 0;
        while self.accumulator >= self.timestep && ticks < self.max_catch_up {
            self.accumulator -= self.timestep;
            ticks += 1;
        }
        if self.accumulator >= self.timestep {
            let backlog = self.accumulator.as_nanos() / self.timestep.as_nanos().max(1);
            self.dropped_ticks += backlog as u64;
            log::debug!("Dropping {} logic ticks of backlog", backlog);
            // keep the sub-tick remainder so pacing stays smooth
            self.accumulator = Duration::from_nanos(
                (self.accumulator.as_nanos() % self.timestep.as_nanos().max(1)) as u64,
            );
        }
        self.tick_count += ticks as u64;
        ticks
    }

    /// Get the fixed timestep.
    pub fn timestep(&self) -> Duration {
        self.timestep
    }

    /// Total ticks handed out.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Total ticks dropped by the catch-up cap.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    /// Convert a duration into a whole number of ticks, rounding up.
    pub fn ticks_for(&self, duration: Duration) -> u32 {
        ticks_for(duration, self.timestep)
    }
}

fn timestep_for(hz: f64) -> Duration {
    let hz = if hz.is_finite() && hz > 0.0 { hz } else { DEFAULT_TICK_RATE };
    Duration::from_secs_f64(1.0 / hz)
}

/// Whole ticks of length `timestep` needed to cover `duration`, rounding up.
pub fn ticks_for(duration: Duration, timestep: Duration) -> u32 {
    let step = timestep.as_secs_f64();
    if step <= 0.0 {
        return 0;
    }
    // 1/30 s is not representable in nanoseconds; absorb the rounding
    let ratio = duration.as_secs_f64() / step - 1e-6;
    ratio.ceil().max(0.0) as u32
}

/// Tick length for a rate in Hz (invalid rates fall back to the default).
pub fn tick_duration(hz: f64) -> Duration {
    timestep_for(hz)
}
