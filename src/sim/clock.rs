//! Frame timestamps to bounded simulation deltas
//!
//! A long gap between frames (tab in the background, debugger stop) must not
//! turn into one giant step, otherwise obstacles tunnel through the player and
//! distance score jumps.

/// Clamp a raw frame gap into `[0, max_dt]`
#[inline]
pub fn clamp_dt(raw: f64, max_dt: f32) -> f32 {
    if raw.is_nan() || raw <= 0.0 {
        return 0.0;
    }
    (raw as f32).min(max_dt)
}

/// Turns wall-clock frame callbacks into delta times
#[derive(Debug, Clone)]
pub struct Stepper {
    last: Option<f64>,
    max_dt: f32,
}

impl Stepper {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Delta since the previous call, clamped to the ceiling
    ///
    /// The first call (or the first after `reset`) has nothing to measure
    /// against and yields 0.
    pub fn step(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => clamp_dt(now - last, self.max_dt),
            None => 0.0,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous timestamp (used on resume and restart)
    pub fn reset(&mut self) {
        self.last = None;
    }
}
