use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time;
use tracing::info;

use crate::deadline::Deadline;
use crate::format::{format_countdown, COUNTDOWN_ZERO};
use crate::surface::{Surface, COUNTDOWN_SLOT};

/// Interval between countdown updates
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Result of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Milliseconds still remaining
    Running(i64),
    /// Deadline reached on this tick; the zero text was written
    Expired,
    /// Already expired on an earlier tick; nothing was written
    Stopped,
}

/// Source of the current wall-clock time
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Worker that renders the time left until a deadline
pub struct CountdownTicker<D> {
    surface: D,
    deadline: Deadline,
    tick_interval: Duration,
    clock: Clock,
    stopped: bool,
}

impl<D: Surface> CountdownTicker<D> {
    pub fn new(surface: D, deadline: Deadline) -> Self {
        Self {
            surface,
            deadline,
            tick_interval: TICK_INTERVAL,
            clock: Box::new(Utc::now),
            stopped: false,
        }
    }

    /// Read the current time from `clock` instead of the system clock
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Tick immediately, then every second until the deadline passes
    pub async fn run(&mut self) {
        info!("Countdown started (deadline: {})", self.deadline);

        let mut interval = time::interval(self.tick_interval);

        loop {
            interval.tick().await;
            let now = (self.clock)();
            if !matches!(self.tick(now), TickOutcome::Running(_)) {
                break;
            }
        }

        info!("Countdown reached zero, stopped");
    }

    /// Render the remaining time as of `now`
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Stopped;
        }

        let remaining = self.deadline.remaining_millis(now);

        if remaining <= 0 {
            self.stopped = true;
            self.render(COUNTDOWN_ZERO);
            return TickOutcome::Expired;
        }

        self.render(&format_countdown(remaining));
        TickOutcome::Running(remaining)
    }

    fn render(&self, text: &str) {
        if self.surface.contains(COUNTDOWN_SLOT) {
            self.surface.set_text(COUNTDOWN_SLOT, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::surface::MemorySurface;

    /// Surface that records every write
    #[derive(Default)]
    struct RecordingSurface {
        writes: Mutex<Vec<String>>,
    }

    impl Surface for RecordingSurface {
        fn contains(&self, id: &str) -> bool {
            id == COUNTDOWN_SLOT
        }

        fn set_text(&self, _id: &str, text: &str) {
            self.writes.lock().unwrap().push(text.to_string());
        }
    }

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_expires_at_deadline_and_stops_writing() {
        let deadline = Deadline::from_epoch_millis(1_000).unwrap();
        let mut ticker = CountdownTicker::new(RecordingSurface::default(), deadline);

        assert_eq!(ticker.tick(at(1_000)), TickOutcome::Expired);
        assert!(ticker.is_stopped());
        assert_eq!(ticker.tick(at(2_000)), TickOutcome::Stopped);
        assert_eq!(ticker.tick(at(0)), TickOutcome::Stopped);

        let writes = ticker.surface.writes.lock().unwrap();
        assert_eq!(*writes, vec![COUNTDOWN_ZERO.to_string()]);
    }

    #[test]
    fn test_counts_down_monotonically() {
        let day = 86_400_000;
        let deadline = Deadline::from_epoch_millis(2 * day).unwrap();
        let mut ticker = CountdownTicker::new(MemorySurface::board(), deadline);

        let mut previous = i64::MAX;
        for now in (0..=2 * day).step_by(3_600_000 * 7) {
            match ticker.tick(at(now)) {
                TickOutcome::Running(remaining) => {
                    assert!(remaining <= previous);
                    previous = remaining;
                }
                outcome => panic!("unexpected {:?} at {}", outcome, now),
            }
        }

        assert_eq!(ticker.tick(at(0)), TickOutcome::Running(2 * day));
        assert_eq!(
            ticker.surface.get(COUNTDOWN_SLOT).as_deref(),
            Some("02D 00H 00M 00S")
        );

        assert_eq!(ticker.tick(at(day + 1_500)), TickOutcome::Running(day - 1_500));
        assert_eq!(
            ticker.surface.get(COUNTDOWN_SLOT).as_deref(),
            Some("00D 23H 59M 58S")
        );

        assert_eq!(ticker.tick(at(2 * day + 1)), TickOutcome::Expired);
        assert_eq!(
            ticker.surface.get(COUNTDOWN_SLOT).as_deref(),
            Some(COUNTDOWN_ZERO)
        );
    }

    #[test]
    fn test_missing_countdown_slot() {
        let surface = MemorySurface::with_slots(["user0_name"]);
        let deadline = Deadline::from_epoch_millis(5_000).unwrap();
        let mut ticker = CountdownTicker::new(surface, deadline);

        assert_eq!(ticker.tick(at(1_000)), TickOutcome::Running(4_000));
        assert_eq!(ticker.surface.get(COUNTDOWN_SLOT), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_counts_down_to_zero() {
        let base = at(1_000_000);
        let deadline = Deadline::from_epoch_millis(1_003_500).unwrap();

        // Wall clock follows the paused tokio clock
        let start = time::Instant::now();
        let mut ticker = CountdownTicker::new(RecordingSurface::default(), deadline)
            .with_clock(move || base + chrono::Duration::from_std(start.elapsed()).unwrap());

        ticker.run().await;

        assert!(ticker.is_stopped());
        assert!(start.elapsed() >= TICK_INTERVAL * 4);
        assert!(start.elapsed() < TICK_INTERVAL * 5);

        let writes = ticker.surface.writes.lock().unwrap();
        assert_eq!(
            *writes,
            vec![
                "00D 00H 00M 03S",
                "00D 00H 00M 02S",
                "00D 00H 00M 01S",
                "00D 00H 00M 00S",
                COUNTDOWN_ZERO,
            ]
        );
    }

    #[tokio::test]
    async fn test_run_returns_for_past_deadline() {
        let deadline = Deadline::from_epoch_millis(0).unwrap();
        let mut ticker = CountdownTicker::new(MemorySurface::board(), deadline);

        ticker.run().await;

        assert!(ticker.is_stopped());
        assert_eq!(
            ticker.surface.get(COUNTDOWN_SLOT).as_deref(),
            Some(COUNTDOWN_ZERO)
        );
    }
}
