use std::time::{Duration, Instant};

/// `M:SS`, or `--:--` when the value is unknown.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn format_remaining(current: f64, duration: f64) -> String {
    if !current.is_finite() || !duration.is_finite() {
        return "--:--".to_string();
    }
    format!("-{}", format_time((duration - current).max(0.0)))
}

/// Cached elapsed/remaining labels, refreshed at a bounded rate.
#[derive(Debug, Clone)]
pub struct TimeDisplay {
    pub elapsed: String,
    pub remaining: String,
    refreshed_at: Option<Instant>,
}

impl Default for TimeDisplay {
    fn default() -> Self {
        Self {
            elapsed: format_time(0.0),
            remaining: "--:--".to_string(),
            refreshed_at: None,
        }
    }
}

impl TimeDisplay {
    /// Returns `true` when the labels changed.
    pub fn refresh(&mut self, now: Instant, current: f64, duration: f64, every: Duration) -> bool {
        if self
            .refreshed_at
            .is_some_and(|at| now.saturating_duration_since(at) < every)
        {
            return false;
        }
        self.force(now, current, duration)
    }

    /// Seeks and track changes bypass the rate limit.
    pub fn force(&mut self, now: Instant, current: f64, duration: f64) -> bool {
        self.refreshed_at = Some(now);
        let elapsed = format_time(current);
        let remaining = format_remaining(current, duration);
        let changed = elapsed != self.elapsed || remaining != self.remaining;
        self.elapsed = elapsed;
        self.remaining = remaining;
        changed
    }
}
