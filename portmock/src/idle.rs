//! Idle-timeout supervision.
//!
//! The daemon is meant to outlive a test run by a little, not forever. Every
//! qualifying request pushes an absolute deadline forward; a background
//! watchdog polls it and, once it has passed, flushes the log and hands
//! control to a shutdown hook that ends the process.
//!
//! The deadline has two states. `Active` is left exactly once, when the
//! watchdog observes that the deadline has passed, and `Expired` is terminal:
//! activity arriving after that point no longer extends anything.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::validation::{TimeoutBounds, ValidationError};

/// How often the watchdog compares the clock with the deadline.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Source of wall-clock time in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in epoch seconds.
    fn now(&self) -> i64;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
///
/// Useful in tests and simulations that need to cross a deadline without
/// sleeping.
///
/// # Examples
///
/// ```
/// use portmock::idle::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(30);
/// assert_eq!(clock.now(), 1_030);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// State of the idle deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    /// The deadline has not been observed to pass.
    Active,
    /// The deadline passed; the process is shutting down.
    Expired,
}

impl fmt::Display for IdleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct IdleDeadline {
    deadline: i64,
    timeout: u64,
    state: IdleState,
}

impl IdleDeadline {
    fn rearm(&mut self, now: i64) {
        self.deadline = now.saturating_add_unsigned(self.timeout);
    }
}

/// Owns the idle deadline and the watchdog that enforces it.
#[derive(Debug)]
pub struct IdleSupervisor {
    bounds: TimeoutBounds,
    clock: Arc<dyn Clock>,
    deadline: Mutex<IdleDeadline>,
}

impl IdleSupervisor {
    /// Creates a supervisor on the system clock, armed with `timeout`
    /// seconds.
    ///
    /// `timeout` comes from validated configuration and is not re-checked
    /// against `bounds`.
    #[must_use]
    pub fn new(bounds: TimeoutBounds, timeout: u64) -> Self {
        Self::with_clock(bounds, timeout, Arc::new(SystemClock))
    }

    /// Creates a supervisor on a custom clock.
    #[must_use]
    pub fn with_clock(bounds: TimeoutBounds, timeout: u64, clock: Arc<dyn Clock>) -> Self {
        let mut deadline = IdleDeadline {
            deadline: 0,
            timeout,
            state: IdleState::Active,
        };
        deadline.rearm(clock.now());

        Self {
            bounds,
            clock,
            deadline: Mutex::new(deadline),
        }
    }

    /// The accepted timeout range.
    #[must_use]
    pub const fn bounds(&self) -> TimeoutBounds {
        self.bounds
    }

    /// Extends the deadline to `now + timeout`. Ignored once expired.
    pub fn touch(&self) {
        let now = self.clock.now();
        let mut deadline = self.deadline.lock();
        if deadline.state == IdleState::Active {
            deadline.rearm(now);
        }
    }

    /// Changes the timeout and re-arms the deadline with it.
    ///
    /// # Errors
    ///
    /// Returns a `range` [`ValidationError`] if `seconds` lies outside the
    /// configured bounds; the current deadline is left untouched.
    pub fn set_timeout(&self, seconds: u64) -> Result<(), ValidationError> {
        let seconds = self.bounds.check(seconds)?;
        let now = self.clock.now();

        let mut deadline = self.deadline.lock();
        if deadline.state == IdleState::Active {
            deadline.timeout = seconds;
            deadline.rearm(now);
        }
        Ok(())
    }

    /// Seconds until the deadline.
    ///
    /// Negative values mean the deadline has passed and the watchdog is
    /// about to shut the process down.
    #[must_use]
    pub fn remaining_seconds(&self) -> i64 {
        let now = self.clock.now();
        self.deadline.lock().deadline.saturating_sub(now)
    }

    /// The most recently granted timeout.
    #[must_use]
    pub fn timeout_seconds(&self) -> u64 {
        self.deadline.lock().timeout
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> IdleState {
        self.deadline.lock().state
    }

    /// Moves to `Expired` if the deadline has passed and reports whether the
    /// supervisor is expired.
    pub fn check_expired(&self) -> bool {
        let now = self.clock.now();
        let mut deadline = self.deadline.lock();
        if deadline.state == IdleState::Active && deadline.deadline.saturating_sub(now) < 0 {
            deadline.state = IdleState::Expired;
        }
        deadline.state == IdleState::Expired
    }

    /// Spawns the watchdog onto the current tokio runtime.
    ///
    /// Every `period` the deadline is checked. On expiry the logger is
    /// flushed and `on_expire` runs once, synchronously, on the watchdog
    /// task; in the daemon it terminates the process. Cancelling `token`
    /// stops the watchdog without running the hook.
    pub fn spawn_watchdog<F>(
        self: &Arc<Self>,
        period: Duration,
        token: CancellationToken,
        on_expire: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let supervisor = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        log::debug!("idle watchdog cancelled");
                        return;
                    }
                    _ = interval.tick() => {
                        if supervisor.check_expired() {
                            log::info!(
                                "No activity within {} seconds, shutting down",
                                supervisor.timeout_seconds()
                            );
                            crate::logging::flush();
                            on_expire();
                            return;
                        }
                    }
                }
            }
        })
    }
}
