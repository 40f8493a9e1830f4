// runtime.rs — Process-wide hook state.
//
// One Runtime exists between attach and detach. It owns the configuration,
// the hook handles (each behind its lifecycle state) and the watcher threads
// that install deferred hooks. Teardown order matters:
//
//   1. raise `stopping` so no watcher can install from here on,
//   2. cancel the watchers (never joined: detach may run under the loader lock),
//   3. drop the hook handles, which puts slots and code bytes back,
//   4. report the relay counters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{Config, InlineTarget, SlotTarget};
use crate::diag;
use crate::error::{Error, Result};
use crate::hook::{HookState, InlineHook, PointerSlotHook, Tracked};
use crate::memory::{Memory, OsMemory};
use crate::relay::{self, StatsSnapshot, RELAYS};
use crate::watcher::{PollPolicy, WatchOutcome, Watcher};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

type Cell<H> = Arc<Mutex<Tracked<H>>>;

pub struct Runtime<M: Memory + Clone + 'static = OsMemory> {
    config: Config,
    base: usize,
    memory: M,
    stopping: Arc<AtomicBool>,
    bake: Cell<PointerSlotHook<M>>,
    text: Cell<InlineHook<M>>,
    watchers: Mutex<Vec<Watcher>>,
}

impl<M: Memory + Clone + 'static> Runtime<M> {
    /// Install (or arm watchers for) every hook `config` names, relative to `base`.
    pub fn start(config: Config, base: usize, memory: M) -> Self {
        RELAYS.set_sample_budget(config.log.max_samples);
        let rt = Self {
            config,
            base,
            memory,
            stopping: Arc::new(AtomicBool::new(false)),
            bake: Arc::default(),
            text: Arc::default(),
            watchers: Mutex::new(Vec::new()),
        };
        log::info!("attach: {} at {:#x}", rt.config.module, base);

        if let Some(target) = rt.config.bake {
            let (memory, base) = (rt.memory.clone(), rt.base);
            rt.arm("bake", target.poll, &rt.bake, move || try_bake(&memory, base, &target));
        }
        if let Some(target) = rt.config.text_draw {
            let (memory, base) = (rt.memory.clone(), rt.base);
            rt.arm("draw_text", target.poll, &rt.text, move || try_text(&memory, base, &target));
        }
        if rt.config.is_inert() {
            log::info!("attach: no hooks configured for this target");
        }
        rt
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn bake_state(&self) -> HookState {
        lock(&self.bake).state()
    }

    pub fn text_state(&self) -> HookState {
        lock(&self.text).state()
    }

    /// Wait for every watcher to finish on its own.
    pub fn join_watchers(&self) {
        let watchers: Vec<Watcher> = lock(&self.watchers).drain(..).collect();
        for w in watchers {
            let name = w.name();
            if !w.join() {
                log::warn!("{}: watcher panicked", name);
            }
        }
    }

    /// Try once now when the policy allows it, otherwise (or on a miss) poll in
    /// the background.
    fn arm<H, A>(&self, name: &'static str, poll: PollPolicy, cell: &Cell<H>, mut attempt: A)
    where
        H: Send + 'static,
        A: FnMut() -> Result<Option<H>> + Send + 'static,
    {
        let stopping = Arc::clone(&self.stopping);
        let target = Arc::clone(cell);
        let mut step = move || -> Result<bool> {
            let mut tracked = lock(&target);
            if stopping.load(Ordering::Acquire) || tracked.state() != HookState::Uninstalled {
                return Ok(false);
            }
            match attempt()? {
                Some(hook) => {
                    tracked.installed(hook)?;
                    Ok(true)
                }
                None => Ok(false),
            }
        };

        if poll.initial_delay.is_zero() {
            match step() {
                Ok(true) => return,
                Ok(false) => log::info!("{}: target not ready, deferring", name),
                Err(e) => {
                    disable(name, cell, e);
                    return;
                }
            }
        }

        let finished = Arc::clone(cell);
        let spawned = Watcher::spawn(
            name,
            poll,
            move |_| step().map(|done| done.then_some(())),
            move |outcome| match outcome {
                WatchOutcome::Abandoned { attempts } => {
                    disable(name, &finished, Error::PreconditionTimeout { hook: name, attempts })
                }
                WatchOutcome::Failed(e) => disable(name, &finished, e),
                WatchOutcome::Installed { .. } | WatchOutcome::Cancelled => {}
            },
        );
        match spawned {
            Ok(w) => lock(&self.watchers).push(w),
            Err(e) => log::warn!("{}: {}", name, e),
        }
    }

    /// Undo everything and report the relay counters.
    pub fn shutdown(self) -> StatsSnapshot {
        self.teardown();
        RELAYS.stats().snapshot()
    }

    fn teardown(&self) {
        if self.stopping.swap(true, Ordering::AcqRel) {
            return;
        }
        for w in lock(&self.watchers).drain(..) {
            w.cancel();
        }
        remove("bake", &self.bake);
        remove("draw_text", &self.text);
        log::info!("detach: {}", RELAYS.stats().snapshot());
        diag::flush();
    }
}

impl<M: Memory + Clone + 'static> Drop for Runtime<M> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Give up on a hook for the rest of the process lifetime.
fn disable<H>(name: &str, cell: &Mutex<Tracked<H>>, cause: Error) {
    log::warn!("{}: disabled: {}", name, cause);
    if let Err(e) = lock(cell).abandon() {
        log::warn!("{}: {}", name, e);
    }
}

fn remove<H>(name: &str, cell: &Mutex<Tracked<H>>) {
    let mut tracked = lock(cell);
    if tracked.state() != HookState::Installed {
        log::debug!("{}: nothing to remove ({:?})", name, tracked.state());
        return;
    }
    match tracked.remove() {
        Ok(hook) => drop(hook),
        Err(e) => log::warn!("{}: {}", name, e),
    }
}

fn resolve(name: &str, base: usize, offset: usize) -> Result<usize> {
    base.checked_add(offset)
        .ok_or_else(|| Error::Resolution { what: format!("{} at {:#x}+{:#x}", name, base, offset) })
}

/// One install attempt for the glyph-bake slot. `Ok(None)` while the host has
/// not filled the slot yet.
fn try_bake<M: Memory + Clone>(memory: &M, base: usize, target: &SlotTarget) -> Result<Option<PointerSlotHook<M>>> {
    let slot = resolve("bake slot", base, target.offset)?;
    let hook = unsafe {
        PointerSlotHook::install(
            memory.clone(),
            "bake",
            slot,
            relay::bake_relay as usize,
            target.min_plausible,
            |original| RELAYS.publish_bake(original),
        )
    };
    match hook {
        Ok(h) => Ok(Some(h)),
        Err(Error::ImplausibleTarget { .. }) | Err(Error::SlotRaced { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// One install attempt for the text-draw function. `Ok(None)` while its code
/// is not mapped or does not look like the expected prologue yet.
fn try_text<M: Memory + Clone>(memory: &M, base: usize, target: &InlineTarget) -> Result<Option<InlineHook<M>>> {
    let address = resolve("draw_text", base, target.offset)?;
    let hook = unsafe {
        InlineHook::install(
            memory.clone(),
            "draw_text",
            address,
            &target.prologue,
            relay::draw_text_relay as usize,
            |trampoline| RELAYS.publish_text(trampoline),
        )
    };
    match hook {
        Ok(h) => Ok(Some(h)),
        Err(Error::Resolution { .. }) | Err(Error::PrologueMismatch { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

// ============================================================
// Process-wide instance
// ============================================================

static ACTIVE: Mutex<Option<Runtime>> = Mutex::new(None);

/// Start the logger and the runtime. False if already attached.
pub fn attach(base: usize, config: Config) -> bool {
    let mut active = lock(&ACTIVE);
    if active.is_some() {
        log::warn!("attach: already attached");
        return false;
    }
    // A logger left over from an earlier attach stays in place.
    let _ = diag::init(&config.log);
    *active = Some(Runtime::start(config, base, OsMemory));
    true
}

/// Tear the runtime down. `None` if it was not attached.
pub fn detach() -> Option<StatsSnapshot> {
    let rt = lock(&ACTIVE).take()?;
    Some(rt.shutdown())
}

pub fn is_attached() -> bool {
    lock(&ACTIVE).is_some()
}
