//! Time sources and the tick schedule driving the live loop.

use chrono::{DateTime, Duration, Local};

/// Supplies "now" to the simulation.
///
/// The core never reads the ambient clock directly; generators take an
/// explicit instant, and the driving loop obtains its starting instant from
/// a `Clock`. Production wires [`SystemClock`], tests wire [`FixedClock`].
pub trait Clock {
    /// The current local time.
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Time source pinned to a fixed instant, for reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// One entry of a tick schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Tick index, starting at 0.
    pub index: usize,
    /// Simulated instant of this tick.
    pub at: DateTime<Local>,
    /// Simulated time this tick spans (ms), already speed-scaled.
    pub delta_ms: f32,
}

/// Finite schedule of telemetry ticks.
///
/// Each tick advances simulated time by the nominal tick period times the
/// speed multiplier, so a speed of 720 turns a 5-second tick into an hour
/// of simulated time.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    start: DateTime<Local>,
    ticks: usize,
    tick_ms: u64,
    speed: f32,
}

impl TickSchedule {
    /// Creates a schedule of `ticks` ticks from `start`.
    ///
    /// # Panics
    ///
    /// Panics if `tick_ms` is zero or `speed` is not positive.
    pub fn new(start: DateTime<Local>, ticks: usize, tick_ms: u64, speed: f32) -> Self {
        assert!(tick_ms > 0, "tick_ms must be > 0");
        assert!(speed > 0.0, "speed must be > 0");
        Self {
            start,
            ticks,
            tick_ms,
            speed,
        }
    }

    /// Simulated milliseconds per tick.
    pub fn delta_ms(&self) -> f32 {
        self.tick_ms as f32 * self.speed
    }

    /// Iterates the schedule's ticks in order.
    pub fn iter(&self) -> impl Iterator<Item = Tick> + '_ {
        let delta_ms = self.delta_ms();
        (0..self.ticks).map(move |index| Tick {
            index,
            at: self.start + Duration::milliseconds((delta_ms as i64) * index as i64),
            delta_ms,
        })
    }

    /// Number of ticks in the schedule.
    pub fn len(&self) -> usize {
        self.ticks
    }

    /// Whether the schedule contains no ticks.
    pub fn is_empty(&self) -> bool {
        self.ticks == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn fixed_clock_returns_its_instant() {
        let clock = FixedClock(start());
        assert_eq!(clock.now(), start());
        assert_eq!(clock.now(), start());
    }

    #[test]
    fn schedule_produces_the_requested_ticks() {
        let schedule = TickSchedule::new(start(), 3, 5000, 1.0);
        let ticks: Vec<Tick> = schedule.iter().collect();
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[0].index, 0);
        assert_eq!(ticks[0].at, start());
        assert_eq!(ticks[1].at, start() + Duration::milliseconds(5000));
        assert_eq!(ticks[2].delta_ms, 5000.0);
    }

    #[test]
    fn speed_scales_simulated_time() {
        // 720x speed: each 5 s tick spans one simulated hour.
        let schedule = TickSchedule::new(start(), 2, 5000, 720.0);
        let ticks: Vec<Tick> = schedule.iter().collect();
        assert_eq!(ticks[0].delta_ms, 3_600_000.0);
        assert_eq!(ticks[1].at, start() + Duration::hours(1));
    }

    #[test]
    fn empty_schedule_yields_nothing() {
        let schedule = TickSchedule::new(start(), 0, 5000, 1.0);
        assert!(schedule.is_empty());
        assert_eq!(schedule.iter().count(), 0);
    }

    #[test]
    #[should_panic]
    fn zero_tick_period_panics() {
        TickSchedule::new(start(), 1, 0, 1.0);
    }
}
