//! Pause-aware run timer
//!
//! Timestamps are milliseconds from any monotonic source (`performance.now()`
//! on the web, `Instant` natively). Paused intervals are excluded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTimer {
    started_at: Option<f64>,
    running: bool,
    /// Total paused milliseconds before the current pause
    paused_ms: f64,
    pause_started_at: Option<f64>,
    /// Frozen result once stopped (seconds)
    total_secs: f64,
}

impl RunTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_at.is_some()
    }

    /// Start timing. No effect if already running.
    pub fn start(&mut self, now_ms: f64) {
        if !self.running {
            self.started_at = Some(now_ms);
            self.running = true;
            self.paused_ms = 0.0;
            self.pause_started_at = None;
        }
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.running && self.pause_started_at.is_none() {
            self.pause_started_at = Some(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if let Some(at) = self.pause_started_at.take() {
            self.paused_ms += (now_ms - at).max(0.0);
        }
    }

    /// Freeze the elapsed time. Returns the final seconds.
    pub fn stop(&mut self, now_ms: f64) -> f64 {
        if self.running {
            self.total_secs = self.elapsed_secs(now_ms);
            self.running = false;
            self.pause_started_at = None;
        }
        self.total_secs
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Seconds elapsed excluding pauses
    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        match (self.running, self.started_at) {
            (true, Some(start)) => {
                let mut elapsed = now_ms - start - self.paused_ms;
                if let Some(at) = self.pause_started_at {
                    elapsed -= now_ms - at;
                }
                elapsed.max(0.0) / 1000.0
            }
            _ => self.total_secs,
        }
    }
}

/// Format seconds as `M:SS.CC`
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{}:{:02}.{:02}", minutes, secs, centis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_excludes_pause() {
        let mut t = RunTimer::new();
        t.start(1_000.0);
        t.pause(3_000.0);
        assert_eq!(t.elapsed_secs(10_000.0), 2.0);
        t.resume(10_000.0);
        assert_eq!(t.elapsed_secs(11_000.0), 3.0);
    }

    #[test]
    fn test_stop_freezes() {
        let mut t = RunTimer::new();
        t.start(0.0);
        assert_eq!(t.stop(65_430.0), 65.43);
        assert!(!t.is_running());
        assert_eq!(t.elapsed_secs(999_999.0), 65.43);
    }

    #[test]
    fn test_stop_while_paused() {
        let mut t = RunTimer::new();
        t.start(0.0);
        t.pause(5_000.0);
        assert_eq!(t.stop(9_000.0), 5.0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut t = RunTimer::new();
        t.start(0.0);
        t.start(4_000.0);
        assert_eq!(t.elapsed_secs(5_000.0), 5.0);
    }

    #[test]
    fn test_reset() {
        let mut t = RunTimer::new();
        t.start(0.0);
        t.stop(1_000.0);
        t.reset();
        assert_eq!(t.elapsed_secs(50_000.0), 0.0);
        assert!(!t.is_running());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.00");
        assert_eq!(format_time(65.5), "1:05.50");
        assert_eq!(format_time(600.0), "10:00.00");
        assert_eq!(format_time(-3.0), "0:00.00");
        assert_eq!(format_time(f64::NAN), "0:00.00");
    }
}
