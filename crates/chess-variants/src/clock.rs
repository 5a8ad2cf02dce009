//! Game clock.
//!
//! Each side has a time budget. A background thread ticks the budget of
//! the side to move and raises a flag when it runs out; the board polls
//! the flag through [`Clock::flagged`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chess_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const TICK: Duration = Duration::from_millis(10);

/// Error from parsing a time control.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("invalid time control {0:?}: expected minutes[+increment[+delay]]")]
    InvalidFormat(String),
}

/// Base time, increment added after each move, and a delay that runs
/// before the clock starts counting down on each turn.
///
/// Written `minutes[+increment_seconds[+delay_seconds]]`, e.g. `5+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeControl {
    pub base: Duration,
    pub increment: Duration,
    pub delay: Duration,
}

impl TimeControl {
    pub const fn new(base: Duration, increment: Duration, delay: Duration) -> Self {
        TimeControl {
            base,
            increment,
            delay,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ClockError> {
        let invalid = || ClockError::InvalidFormat(s.to_string());
        let fields: Vec<u64> = s
            .trim()
            .split('+')
            .map(|field| field.trim().parse::<u64>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid())?;

        let minutes = |m: u64| Duration::from_secs(m.saturating_mul(60));
        match *fields.as_slice() {
            [base] => Ok(Self::new(minutes(base), Duration::ZERO, Duration::ZERO)),
            [base, increment] => Ok(Self::new(
                minutes(base),
                Duration::from_secs(increment),
                Duration::ZERO,
            )),
            [base, increment, delay] => Ok(Self::new(
                minutes(base),
                Duration::from_secs(increment),
                Duration::from_secs(delay),
            )),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.base.as_secs() / 60, self.increment.as_secs())?;
        if !self.delay.is_zero() {
            write!(f, "+{}", self.delay.as_secs())?;
        }
        Ok(())
    }
}

impl FromStr for TimeControl {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeControl::parse(s)
    }
}

impl TryFrom<String> for TimeControl {
    type Error = ClockError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TimeControl::parse(&s)
    }
}

impl From<TimeControl> for String {
    fn from(control: TimeControl) -> String {
        control.to_string()
    }
}

#[derive(Debug)]
struct State {
    remaining: [Duration; 2],
    /// The side whose time is running.
    active: Option<Color>,
    delay_left: Duration,
    last: Instant,
    flagged: Option<Color>,
}

impl State {
    /// Charges the time since the last update to the active side.
    fn settle(&mut self, now: Instant) {
        let Some(color) = self.active else {
            return;
        };
        let mut elapsed = now.saturating_duration_since(self.last);
        self.last = now;

        let absorbed = elapsed.min(self.delay_left);
        self.delay_left -= absorbed;
        elapsed -= absorbed;

        let left = &mut self.remaining[color.index()];
        *left = left.saturating_sub(elapsed);
        if left.is_zero() {
            self.flagged = Some(color);
            self.active = None;
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    wake: Condvar,
    stopped: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A two-sided chess clock.
#[derive(Debug)]
pub struct Clock {
    control: TimeControl,
    shared: Arc<Shared>,
    ticker: Option<JoinHandle<()>>,
}

impl Clock {
    /// Creates a stopped clock; it starts on the first [`press`](Clock::press).
    pub fn new(control: TimeControl) -> Self {
        let state = State {
            remaining: [control.base; 2],
            active: None,
            delay_left: Duration::ZERO,
            last: Instant::now(),
            flagged: None,
        };
        Clock {
            control,
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                wake: Condvar::new(),
                stopped: AtomicBool::new(false),
            }),
            ticker: None,
        }
    }

    pub fn control(&self) -> TimeControl {
        self.control
    }

    /// Ends `mover`'s turn: adds the increment if their time was running and
    /// starts the opponent's time.
    pub fn press(&mut self, mover: Color) {
        if self.shared.stopped.load(Ordering::SeqCst) {
            return;
        }
        {
            let mut state = self.shared.lock();
            let now = Instant::now();
            state.settle(now);
            if state.flagged.is_some() {
                return;
            }
            if state.active == Some(mover) {
                state.remaining[mover.index()] += self.control.increment;
            }
            state.active = Some(mover.opposite());
            state.delay_left = self.control.delay;
            state.last = now;
        }

        if self.ticker.is_none() {
            debug!(control = %self.control, "clock started");
            let shared = Arc::clone(&self.shared);
            self.ticker = Some(thread::spawn(move || tick(&shared)));
        }
        self.shared.wake.notify_all();
    }

    /// Time left for `color`.
    pub fn remaining(&self, color: Color) -> Duration {
        let mut state = self.shared.lock();
        state.settle(Instant::now());
        state.remaining[color.index()]
    }

    /// The side that ran out of time, if any.
    pub fn flagged(&self) -> Option<Color> {
        let mut state = self.shared.lock();
        state.settle(Instant::now());
        state.flagged
    }

    /// The side whose time is running.
    pub fn active(&self) -> Option<Color> {
        self.shared.lock().active
    }

    /// Freezes both sides' time and stops the ticking thread.
    ///
    /// Calling it again has no effect.
    pub fn stop(&mut self) {
        {
            let mut state = self.shared.lock();
            state.settle(Instant::now());
            state.active = None;
        }
        self.shared.stopped.store(true, Ordering::SeqCst);
        self.shared.wake.notify_all();
        if let Some(handle) = self.ticker.take() {
            if handle.join().is_err() {
                debug!("clock thread panicked");
            }
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick(shared: &Shared) {
    let mut state = shared.lock();
    while !shared.stopped.load(Ordering::SeqCst) {
        state.settle(Instant::now());
        if let Some(color) = state.flagged {
            info!(%color, "flag fell");
            break;
        }
        state = match shared.wake.wait_timeout(state, TICK) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn parse_time_controls() {
        let tc = TimeControl::parse("5").unwrap();
        assert_eq!(tc.base, Duration::from_secs(300));
        assert_eq!(tc.increment, Duration::ZERO);

        let tc: TimeControl = "3+2".parse().unwrap();
        assert_eq!(tc.base, Duration::from_secs(180));
        assert_eq!(tc.increment, Duration::from_secs(2));
        assert_eq!(tc.to_string(), "3+2");

        let tc = TimeControl::parse("15+10+5").unwrap();
        assert_eq!(tc.delay, Duration::from_secs(5));
        assert_eq!(tc.to_string(), "15+10+5");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "five", "5+", "5+2+1+1", "-1", "1.5"] {
            assert_eq!(
                TimeControl::parse(bad),
                Err(ClockError::InvalidFormat(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn serde_as_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            tc: TimeControl,
        }
        let w: Wrapper = toml::from_str("tc = \"1+1\"").unwrap();
        assert_eq!(w.tc, TimeControl::parse("1+1").unwrap());
        assert!(toml::from_str::<Wrapper>("tc = \"x\"").is_err());
    }

    #[test]
    fn clock_starts_on_first_press() {
        let mut clock = Clock::new(TimeControl::new(millis(1000), Duration::ZERO, Duration::ZERO));
        assert_eq!(clock.active(), None);
        thread::sleep(millis(20));
        assert_eq!(clock.remaining(Color::White), millis(1000));

        clock.press(Color::White);
        assert_eq!(clock.active(), Some(Color::Black));
        // white's time never ran
        assert_eq!(clock.remaining(Color::White), millis(1000));
        clock.stop();
    }

    #[test]
    fn increment_goes_to_the_mover() {
        let mut clock = Clock::new(TimeControl::new(
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::ZERO,
        ));
        clock.press(Color::White);
        clock.press(Color::Black);
        assert!(clock.remaining(Color::Black) > millis(2500));
        assert_eq!(clock.active(), Some(Color::White));
    }

    #[test]
    fn flag_falls() {
        let mut clock = Clock::new(TimeControl::new(millis(30), Duration::ZERO, Duration::ZERO));
        clock.press(Color::White);
        thread::sleep(millis(200));
        assert_eq!(clock.flagged(), Some(Color::Black));
        assert_eq!(clock.remaining(Color::Black), Duration::ZERO);
        assert_eq!(clock.active(), None);
    }

    #[test]
    fn delay_runs_before_the_budget() {
        let mut clock = Clock::new(TimeControl::new(
            millis(1000),
            Duration::ZERO,
            Duration::from_secs(10),
        ));
        clock.press(Color::White);
        thread::sleep(millis(50));
        assert_eq!(clock.remaining(Color::Black), millis(1000));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut clock = Clock::new(TimeControl::new(millis(500), Duration::ZERO, Duration::ZERO));
        clock.press(Color::White);
        clock.stop();
        let left = clock.remaining(Color::Black);
        clock.stop();
        thread::sleep(millis(30));
        assert_eq!(clock.remaining(Color::Black), left);
        assert_eq!(clock.flagged(), None);

        // pressing a stopped clock does nothing
        clock.press(Color::Black);
        assert_eq!(clock.active(), None);
    }
}
