//! Shutdown supervision
//!
//! Every rfcli tool gets one [`Context`]: a cancellable handle threaded
//! through device construction and streaming. It cancels on the first of
//! a configured `--timeout` expiring, an explicit [`Context::cancel`], or
//! SIGINT/SIGTERM.
//!
//! Signal handling comes with a [`Watchdog`]: if cancellation does not
//! lead to process exit within a 3 second grace period, the watchdog
//! dumps a stack trace to stderr and terminates the process. The watchdog
//! timer runs on its own thread, so the forced exit fires even when the
//! application's shutdown path is deadlocked.

use std::process;
use std::sync::{Arc, Condvar, Mutex, Once, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use clap::{ArgMatches, Command};

use crate::flags::FlagSet;

/// How long a requested shutdown may take before the watchdog kills the
/// process.
const WATCHDOG_GRACE: Duration = Duration::from_secs(3);

struct Inner {
    cancelled: Mutex<bool>,
    cond: Condvar,
    deadline: Option<Instant>,
}

/// A cancellable execution context.
///
/// Clones share the same cancellation state. Cancellation is one-way and
/// idempotent: of deadline expiry, explicit cancel, and signal delivery,
/// only the first takes effect.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    fn with_deadline(deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: Mutex::new(false),
                cond: Condvar::new(),
                deadline,
            }),
        }
    }

    /// A context with no deadline.
    pub fn background() -> Self {
        Self::with_deadline(None)
    }

    /// A context that cancels itself after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Some(Instant::now() + timeout))
    }

    /// Build a context from the `--timeout` flag and install
    /// SIGINT/SIGTERM handling. The usual entry point.
    pub fn install(matches: &ArgMatches) -> Self {
        let ctx = Self::from_flags(matches);
        install_signal_handler(&ctx);
        ctx
    }

    /// Build a context from the `--timeout` flag. A zero or missing flag
    /// means no deadline; a flag that was never declared is logged and
    /// ignored, not fatal.
    pub fn from_flags(matches: &ArgMatches) -> Self {
        let timeout = match matches.try_get_one::<Duration>("timeout") {
            Ok(timeout) => timeout.copied().unwrap_or(Duration::ZERO),
            Err(_) => {
                log::warn!(
                    "internal error: register_context_flags was not called, timeouts ignored"
                );
                Duration::ZERO
            }
        };
        if timeout.is_zero() {
            Self::background()
        } else {
            Self::with_timeout(timeout)
        }
    }

    /// Request cancellation. Safe to call from any thread, any number of
    /// times.
    pub fn cancel(&self) {
        let mut cancelled = self.lock();
        if !*cancelled {
            *cancelled = true;
            self.inner.cond.notify_all();
        }
    }

    /// Whether cancellation was requested (or the deadline passed).
    pub fn is_cancelled(&self) -> bool {
        if *self.lock() {
            return true;
        }
        if self.deadline_passed() {
            self.cancel();
            return true;
        }
        false
    }

    /// The absolute deadline, if a timeout was configured.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Block until the context is cancelled (or its deadline passes).
    pub fn wait(&self) {
        let mut cancelled = self.lock();
        loop {
            if *cancelled {
                return;
            }
            match self.inner.deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        *cancelled = true;
                        self.inner.cond.notify_all();
                        return;
                    }
                    let (guard, _) = self
                        .inner
                        .cond
                        .wait_timeout(cancelled, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    cancelled = guard;
                }
                None => {
                    cancelled = self
                        .inner
                        .cond
                        .wait(cancelled)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    fn deadline_passed(&self) -> bool {
        self.inner
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, bool> {
        // A bool can't be left inconsistent, so poison is recoverable.
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Forces process exit if shutdown hangs.
///
/// Arming is latched: the first [`Watchdog::arm`] starts the grace timer
/// on a dedicated thread; later calls do nothing and do not reset it. If
/// the process exits before the grace period elapses, the timer thread
/// dies with it and nothing fires.
pub struct Watchdog {
    grace: Duration,
    armed: Once,
}

impl Watchdog {
    pub fn new() -> Self {
        Self::with_grace(WATCHDOG_GRACE)
    }

    pub fn with_grace(grace: Duration) -> Self {
        Self {
            grace,
            armed: Once::new(),
        }
    }

    /// Start the grace timer. Returns true if this call armed it.
    pub fn arm(&self) -> bool {
        self.arm_with(|| {
            log::warn!("something hung our exit, dumping stack");
            eprintln!("{}", std::backtrace::Backtrace::force_capture());
            process::exit(1);
        })
    }

    fn arm_with<F>(&self, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut armed_now = false;
        let grace = self.grace;
        self.armed.call_once(|| {
            armed_now = true;
            let spawned = thread::Builder::new()
                .name("rfcli-watchdog".to_string())
                .spawn(move || {
                    thread::sleep(grace);
                    action();
                });
            if let Err(e) = spawned {
                log::error!("failed to spawn watchdog thread: {}", e);
            }
        });
        armed_now
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

/// Declare the `--timeout` flag.
pub fn register_context_flags(cmd: Command) -> Command {
    let mut flags = FlagSet::new();
    flags.duration(
        "timeout",
        Duration::ZERO,
        "time to wait before requesting exit",
    );
    flags.attach(cmd)
}

/// Cancel `ctx` on SIGINT/SIGTERM and arm the watchdog.
///
/// The listener lives for the rest of the process. Installation failure
/// (e.g. a second handler in the same process) is logged, not fatal.
pub fn install_signal_handler(ctx: &Context) {
    let ctx = ctx.clone();
    let watchdog = Watchdog::new();
    let result = ctrlc::set_handler(move || {
        log::info!("interrupt received, requesting shutdown");
        ctx.cancel();
        watchdog.arm();
    });
    if let Err(e) = result {
        log::warn!("failed to install signal handler: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn cancel_is_idempotent_and_unblocks_wait() {
        let ctx = Context::background();
        assert!(!ctx.is_cancelled());
        assert!(ctx.deadline().is_none());

        let waiter = {
            let ctx = ctx.clone();
            thread::spawn(move || ctx.wait())
        };

        ctx.cancel();
        ctx.cancel();
        ctx.cancel();

        waiter.join().unwrap();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn deadline_expiry_cancels() {
        let ctx = Context::with_timeout(Duration::from_millis(20));
        assert!(ctx.deadline().is_some());
        ctx.wait();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn explicit_cancel_beats_deadline() {
        let ctx = Context::with_timeout(Duration::from_secs(3600));
        ctx.cancel();
        let start = Instant::now();
        ctx.wait();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn timeout_flag_builds_deadline() {
        let cmd = register_context_flags(Command::new("test"));
        let matches = cmd
            .try_get_matches_from(["test", "--timeout", "30s"])
            .unwrap();
        let ctx = Context::from_flags(&matches);
        assert!(ctx.deadline().is_some());

        let cmd = register_context_flags(Command::new("test"));
        let matches = cmd.try_get_matches_from(["test"]).unwrap();
        let ctx = Context::from_flags(&matches);
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn missing_timeout_flag_is_not_fatal() {
        let _ = env_logger::builder().is_test(true).try_init();
        let matches = Command::new("test").try_get_matches_from(["test"]).unwrap();
        let ctx = Context::from_flags(&matches);
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn watchdog_fires_exactly_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let watchdog = Watchdog::with_grace(Duration::from_millis(20));

        let f = fired.clone();
        assert!(watchdog.arm_with(move || {
            f.fetch_add(1, Ordering::SeqCst);
        }));

        // A second signal must not start a second timer.
        let f = fired.clone();
        assert!(!watchdog.arm_with(move || {
            f.fetch_add(1, Ordering::SeqCst);
        }));

        thread::sleep(Duration::from_millis(100));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn watchdog_waits_out_the_grace_period() {
        let fired = Arc::new(AtomicUsize::new(0));
        let watchdog = Watchdog::with_grace(Duration::from_millis(200));

        let f = fired.clone();
        watchdog.arm_with(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(50));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
