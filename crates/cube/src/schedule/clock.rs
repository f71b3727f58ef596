use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Seconds since the Unix epoch. Effects and the scheduler are driven by
/// wall-clock time so every process showing the same playlist stays in phase.
pub fn wall_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Fixed-cadence tick clock. Deadlines advance by one interval per tick; if
/// the caller falls more than an interval behind (a blocking reconnect, say)
/// the schedule restarts from now instead of bursting to catch up.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    pub fn starting_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// Returns how long to sleep before the next tick and schedules the one
    /// after it.
    pub fn delay_from(&mut self, now: Instant) -> Duration {
        if now >= self.next + self.interval {
            self.next = now + self.interval;
            return Duration::ZERO;
        }

        let delay = self.next.saturating_duration_since(now);
        self.next += self.interval;
        delay
    }

    pub fn wait(&mut self) {
        let delay = self.delay_from(Instant::now());
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
