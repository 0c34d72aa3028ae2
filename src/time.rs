//! Fixed-timestep game clock and one-shot timers.
//!
//! `draw_web()` calls at ~60fps with variable delta. [`GameTime`] converts
//! this into discrete ticks, and every delay in the game (match resolution,
//! auto-advance, hit flashes) is a [`Timer`] counted in those ticks. Nothing
//! in the game logic ever reads the wall clock, so it stays deterministic.

/// Game ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 10;

/// Milliseconds per tick.
pub const MS_PER_TICK: u32 = 1000 / TICKS_PER_SEC;

/// Convert a delay in milliseconds to whole ticks, rounding up so that a
/// non-zero delay never collapses to zero.
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms.div_ceil(MS_PER_TICK)
}

pub struct GameTime {
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (from `performance.now()`).
    /// Returns the number of discrete ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if tab was backgrounded
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ms_per_tick = MS_PER_TICK as f64;
        let ticks = (self.accumulator / ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * ms_per_tick;
        ticks
    }
}

/// A one-shot countdown measured in ticks.
///
/// A timer fires exactly once per `start`. Re-starting an armed timer
/// replaces its deadline; `cancel` disarms it without firing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    remaining: Option<u32>,
}

impl Timer {
    pub fn start(&mut self, ticks: u32) {
        self.remaining = Some(ticks.max(1));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by one tick. Returns true on the tick the timer fires.
    pub fn step(&mut self) -> bool {
        match self.remaining {
            Some(1) => {
                self.remaining = None;
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }
}
