/// Frame clock driven by the host loop.
/// Tweens read `now()` to compute rewind offsets; the host advances it once per frame.
/// Time accumulates in f64; `since` hands back f32 offsets.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    /// Seconds since the clock was created.
    now: f64,
    /// Delta of the most recent frame.
    last_dt: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame. Negative deltas are treated as zero.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = dt.max(0.0);
        self.now += f64::from(dt);
        self.last_dt = dt;
        dt
    }

    /// Current time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Delta of the most recent frame.
    pub fn dt(&self) -> f32 {
        self.last_dt
    }

    /// Seconds from `earlier` to now, at frame precision.
    pub fn since(&self, earlier: f64) -> f32 {
        (self.now - earlier) as f32
    }
}
