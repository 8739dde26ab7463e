// indicatif cannot draw to a non-tty, so the server logs progress instead
use {
    std::time::{Duration, Instant},
    tracing::info,
};

const REPORT_INTERVAL: Duration = Duration::from_secs(10);

pub struct Progress {
    message: String,
    started_at: Instant,
    reported_at: Instant,
    total_processed: u64,
}

impl Progress {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            started_at: Instant::now(),
            reported_at: Instant::now(),
            total_processed: 0,
        }
    }

    /// Returns true when this update produced a log line.
    pub fn update(&mut self) -> bool {
        self.total_processed += 1;

        let now = Instant::now();
        if now - self.reported_at >= REPORT_INTERVAL {
            self.reported_at = now;
            info!("{}: {} total ({:.2}/second)", self.message, self.total_processed, self.rate(now));
            true
        } else {
            false
        }
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn finish(&self) {
        let now = Instant::now();
        info!(
            "{}: done, {} total in {:.1}s ({:.2}/second)",
            self.message,
            self.total_processed,
            (now - self.started_at).as_secs_f32(),
            self.rate(now),
        );
    }

    fn rate(&self, now: Instant) -> f32 {
        let elapsed = (now - self.started_at).as_secs_f32();
        if elapsed > 0.0 {
            self.total_processed as f32 / elapsed
        } else {
            0.0
        }
    }
}
