use std::time::Instant;

/// Seconds since the first query.
///
/// The clock starts itself on the first call to [`elapsed`](Self::elapsed),
/// which therefore returns 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    start: Option<Instant>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    pub fn elapsed(&mut self) -> f32 {
        self.elapsed_at(Instant::now())
    }

    /// [`elapsed`](Self::elapsed) measured against a caller-supplied instant.
    pub fn elapsed_at(&mut self, now: Instant) -> f32 {
        let start = *self.start.get_or_insert(now);
        now.saturating_duration_since(start).as_secs_f32()
    }
}
