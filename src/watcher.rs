// watcher.rs — Deferred hook installation.
//
// Some targets are not ready when we attach: the pointer slot is filled in by
// the host's lazy initialization seconds later. A Watcher owns one background
// thread that retries the install at a fixed interval, up to a bounded number
// of attempts, and can be cancelled at any point (detach sets the flag and
// unparks the thread, so it never sleeps through a shutdown).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Retry schedule of a deferred install.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before the first attempt.
    pub initial_delay: Duration,
    /// Wait between attempts.
    pub interval: Duration,
    /// Attempts before giving up.
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { initial_delay: Duration::ZERO, interval, max_attempts }
    }

    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

impl Default for PollPolicy {
    /// 100 ms between attempts, 300 attempts (about 30 s).
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 300)
    }
}

/// How a watcher ended.
#[derive(Debug)]
pub enum WatchOutcome<T> {
    Installed { value: T, attempts: u32 },
    /// The attempt bound ran out.
    Abandoned { attempts: u32 },
    Cancelled,
    /// An attempt failed in a way retrying cannot fix.
    Failed(Error),
}

/// Handle to one background install thread.
///
/// Dropping the handle cancels the watcher but does not wait for it.
pub struct Watcher {
    name: &'static str,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Watcher {
    /// Start polling.
    ///
    /// `attempt` is called with the 1-based attempt number and returns
    /// `Ok(None)` while the precondition does not hold yet. `finish` receives
    /// the outcome on the watcher thread.
    pub fn spawn<T, A, F>(name: &'static str, policy: PollPolicy, attempt: A, finish: F) -> Result<Self>
    where
        T: Send + 'static,
        A: FnMut(u32) -> Result<Option<T>> + Send + 'static,
        F: FnOnce(WatchOutcome<T>) + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = thread::Builder::new()
            .name(format!("{}-watcher", name))
            .spawn(move || finish(poll(name, policy, &flag, attempt)))?;
        Ok(Self { name, cancel, handle: Some(handle) })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ask the thread to stop at its next check.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
        if let Some(h) = &self.handle {
            h.thread().unpark();
        }
    }

    /// Wait for the thread. Returns false if it panicked.
    pub fn join(mut self) -> bool {
        match self.handle.take() {
            Some(h) => h.join().is_ok(),
            None => true,
        }
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Sleep for `d` unless cancelled first. Returns false on cancellation.
fn pause(cancel: &AtomicBool, d: Duration) -> bool {
    let deadline = Instant::now() + d;
    loop {
        if cancel.load(Ordering::Acquire) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::park_timeout(deadline - now);
    }
}

fn poll<T>(
    name: &'static str,
    policy: PollPolicy,
    cancel: &AtomicBool,
    mut attempt: impl FnMut(u32) -> Result<Option<T>>,
) -> WatchOutcome<T> {
    log::debug!("{}: polling every {:?}, up to {} attempts", name, policy.interval, policy.max_attempts);
    if !pause(cancel, policy.initial_delay) {
        return WatchOutcome::Cancelled;
    }

    for n in 1..=policy.max_attempts {
        if cancel.load(Ordering::Acquire) {
            log::info!("{}: cancelled after {} attempts", name, n - 1);
            return WatchOutcome::Cancelled;
        }
        match attempt(n) {
            Ok(Some(value)) => {
                log::info!("{}: installed after {} attempts", name, n);
                return WatchOutcome::Installed { value, attempts: n };
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("{}: giving up: {}", name, e);
                return WatchOutcome::Failed(e);
            }
        }
        if n % 50 == 0 {
            log::debug!("{}: still waiting, attempt {}", name, n);
        }
        if n < policy.max_attempts && !pause(cancel, policy.interval) {
            log::info!("{}: cancelled after {} attempts", name, n);
            return WatchOutcome::Cancelled;
        }
    }

    log::warn!("{}: precondition not met after {} attempts", name, policy.max_attempts);
    WatchOutcome::Abandoned { attempts: policy.max_attempts }
}
