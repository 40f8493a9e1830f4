// hook.rs — Function interception engine.
//
// Two ways to get between a caller and a function:
//
//   PointerSlotHook: the call goes through a function-pointer variable. Swap the
//                    variable, keep the old value. Nothing executable changes.
//   InlineHook:      the call lands directly on a function body. Copy the first
//                    `stolen_len` bytes into a trampoline that jumps back, then
//                    overwrite them with a jump to the relay.
//
// Both are RAII handles: dropping one puts the slot or the code bytes back.
// The relay learns the address it must call to reach the original code through
// the `publish` callback, which runs before the redirect goes live.

use std::mem;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::arch::JumpEncoding;
use crate::error::{Error, Result};
use crate::memory::{fill_block, Access, ExecBlock, Memory, OsMemory, ProtectGuard};

// ============================================================
// Lifecycle
// ============================================================

/// Lifecycle of one hook target.
///
/// `Uninstalled -> Installed -> Removed`, or `Uninstalled -> Abandoned` when a
/// deferred install runs out of attempts. `Removed` and `Abandoned` are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookState {
    Uninstalled,
    Installed,
    Removed,
    Abandoned,
}

impl HookState {
    pub fn can_become(self, next: HookState) -> bool {
        use HookState::*;
        matches!(
            (self, next),
            (Uninstalled, Installed) | (Installed, Removed) | (Uninstalled, Abandoned)
        )
    }

    pub fn is_final(self) -> bool {
        matches!(self, HookState::Removed | HookState::Abandoned)
    }

    pub fn advance(&mut self, next: HookState) -> Result<()> {
        if !self.can_become(next) {
            return Err(Error::InvalidTransition { from: *self, to: next });
        }
        *self = next;
        Ok(())
    }
}

/// A hook handle together with the state of its target.
#[derive(Debug)]
pub struct Tracked<H> {
    state: HookState,
    hook: Option<H>,
}

impl<H> Tracked<H> {
    pub const fn new() -> Self {
        Self { state: HookState::Uninstalled, hook: None }
    }

    pub fn state(&self) -> HookState {
        self.state
    }

    pub fn hook(&self) -> Option<&H> {
        self.hook.as_ref()
    }

    /// Record a successful install.
    pub fn installed(&mut self, hook: H) -> Result<()> {
        self.state.advance(HookState::Installed)?;
        self.hook = Some(hook);
        Ok(())
    }

    /// Record that the install was given up.
    pub fn abandon(&mut self) -> Result<()> {
        self.state.advance(HookState::Abandoned)
    }

    /// Take the handle out for removal. Dropping the returned handle undoes the hook.
    pub fn remove(&mut self) -> Result<Option<H>> {
        self.state.advance(HookState::Removed)?;
        Ok(self.hook.take())
    }
}

impl<H> Default for Tracked<H> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Pointer-slot interception
// ============================================================

/// Current value of a function-pointer slot if it already holds a plausible code address.
///
/// # Safety
/// `slot` must be a readable, live pointer-sized location.
pub unsafe fn probe_slot(slot: usize, min_plausible: usize) -> Result<Option<usize>> {
    if slot % mem::align_of::<usize>() != 0 {
        return Err(Error::Misaligned { slot });
    }
    let value = (*(slot as *const AtomicUsize)).load(Ordering::Acquire);
    Ok((value != 0 && value >= min_plausible).then_some(value))
}

/// A swapped function-pointer slot. Dropping it writes the original back.
pub struct PointerSlotHook<M: Memory = OsMemory> {
    memory: M,
    name: &'static str,
    slot: usize,
    original: usize,
    replacement: usize,
    active: bool,
}

impl<M: Memory> PointerSlotHook<M> {
    /// Point `slot` at `replacement`.
    ///
    /// The slot must already hold a non-null value of at least `min_plausible`.
    /// `publish` receives that value before the swap, so the relay can call
    /// through it from its very first invocation.
    ///
    /// # Safety
    /// `slot` must be a live pointer-sized variable of this process, and
    /// `replacement` a function with the same signature as the one it holds.
    pub unsafe fn install(
        memory: M,
        name: &'static str,
        slot: usize,
        replacement: usize,
        min_plausible: usize,
        publish: impl FnOnce(usize),
    ) -> Result<Self> {
        if !memory.is_readable(slot, mem::size_of::<usize>()) {
            return Err(Error::Resolution { what: format!("{} slot at {:#x}", name, slot) });
        }
        let original = match probe_slot(slot, min_plausible)? {
            Some(v) => v,
            None => {
                let value = (*(slot as *const AtomicUsize)).load(Ordering::Acquire);
                return Err(Error::ImplausibleTarget { slot, value });
            }
        };

        publish(original);
        {
            let _guard = ProtectGuard::new(&memory, slot, mem::size_of::<usize>(), Access::Data)?;
            (*(slot as *const AtomicUsize))
                .compare_exchange(original, replacement, Ordering::AcqRel, Ordering::Acquire)
                .map_err(|found| Error::SlotRaced { slot, expected: original, found })?;
        }

        log::info!("{}: slot {:#x} now {:#x} (was {:#x})", name, slot, replacement, original);
        Ok(Self { memory, name, slot, original, replacement, active: true })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// The function the slot held before the swap.
    pub fn original(&self) -> usize {
        self.original
    }

    /// Put the original pointer back now instead of on drop.
    pub fn remove(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let _guard = unsafe {
            ProtectGuard::new(&self.memory, self.slot, mem::size_of::<usize>(), Access::Data)?
        };
        let cell = unsafe { &*(self.slot as *const AtomicUsize) };
        self.active = false;
        match cell.compare_exchange(self.replacement, self.original, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => {
                log::info!("{}: slot {:#x} restored to {:#x}", self.name, self.slot, self.original);
                Ok(())
            }
            Err(found) => Err(Error::SlotRaced { slot: self.slot, expected: self.replacement, found }),
        }
    }
}

impl<M: Memory> Drop for PointerSlotHook<M> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("{}: restore failed: {}", self.name, e);
        }
    }
}

// ============================================================
// Inline interception
// ============================================================

/// Where the stolen region of an inline target ends and what it should contain.
///
/// `stolen_len` must end on an instruction boundary and the bytes must not be
/// PC-relative; both are facts about one build of the target binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prologue {
    pub stolen_len: usize,
    /// Expected bytes at the target; empty skips verification.
    pub expected: &'static [u8],
    /// Leading bytes that are enough to accept a partial match; 0 requires an exact match.
    pub verified_prefix: usize,
}

/// How well the live bytes matched [`Prologue::expected`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrologueMatch {
    Exact,
    Partial,
    Unchecked,
}

impl Prologue {
    pub fn verify(&self, address: usize, actual: &[u8]) -> Result<PrologueMatch> {
        if self.expected.is_empty() {
            return Ok(PrologueMatch::Unchecked);
        }
        if actual.starts_with(self.expected) {
            return Ok(PrologueMatch::Exact);
        }
        let prefix = self.verified_prefix.min(self.expected.len());
        if prefix > 0 && actual.get(..prefix) == Some(&self.expected[..prefix]) {
            return Ok(PrologueMatch::Partial);
        }
        Err(Error::PrologueMismatch { address })
    }
}

/// A patched function entry. Dropping it restores the stolen bytes and frees the trampoline.
pub struct InlineHook<M: Memory = OsMemory> {
    memory: M,
    name: &'static str,
    target: usize,
    original: Vec<u8>,
    trampoline: Option<ExecBlock>,
    matched: PrologueMatch,
}

impl<M: Memory> InlineHook<M> {
    /// Redirect `target` to `relay` using the native jump encoding.
    ///
    /// # Safety
    /// See [`InlineHook::install_with`].
    pub unsafe fn install(
        memory: M,
        name: &'static str,
        target: usize,
        prologue: &Prologue,
        relay: usize,
        publish: impl FnOnce(usize),
    ) -> Result<Self> {
        Self::install_with(memory, JumpEncoding::native(), name, target, prologue, relay, publish)
    }

    /// Redirect `target` to `relay`.
    ///
    /// `publish` receives the trampoline address before the redirect is written.
    /// On any failure the target bytes are untouched and the trampoline is freed.
    ///
    /// # Safety
    /// `target` must be the entry of a function in this process whose first
    /// `prologue.stolen_len` bytes are position independent, and no thread may
    /// be executing those bytes while they are rewritten.
    pub unsafe fn install_with(
        memory: M,
        encoding: JumpEncoding,
        name: &'static str,
        target: usize,
        prologue: &Prologue,
        relay: usize,
        publish: impl FnOnce(usize),
    ) -> Result<Self> {
        let len = prologue.stolen_len;
        if !memory.is_readable(target, len) {
            return Err(Error::Resolution { what: format!("{} code at {:#x}", name, target) });
        }

        let original = slice::from_raw_parts(target as *const u8, len).to_vec();
        let matched = prologue.verify(target, &original)?;
        if matched == PrologueMatch::Partial {
            log::warn!("{}: prologue only partially matches at {:#x}", name, target);
        }

        let patch = encoding.redirect(target, len, relay)?;
        let block = memory.alloc_executable(len + encoding.len())?;
        let body = match encoding.relocate(&original, target, block.address) {
            Ok(body) => body,
            Err(e) => {
                memory.free_executable(block);
                return Err(e);
            }
        };
        fill_block(&memory, &block, &body);

        match ProtectGuard::new(&memory, target, len, Access::Code) {
            Ok(guard) => {
                publish(block.address);
                guard.write_bytes(0, &patch);
            }
            Err(e) => {
                memory.free_executable(block);
                return Err(e);
            }
        }

        log::info!(
            "{}: {:#x} -> relay {:#x}, trampoline {:#x} ({:?} prologue)",
            name, target, relay, block.address, matched
        );
        Ok(Self { memory, name, target, original, trampoline: Some(block), matched })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Address to call to run the original function.
    pub fn trampoline(&self) -> Option<usize> {
        self.trampoline.as_ref().map(|b| b.address)
    }

    pub fn prologue_match(&self) -> PrologueMatch {
        self.matched
    }

    /// Undo the patch now instead of on drop.
    pub fn remove(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        let Some(block) = self.trampoline.take() else {
            return Ok(());
        };
        match unsafe { ProtectGuard::new(&self.memory, self.target, self.original.len(), Access::Code) } {
            Ok(guard) => unsafe { guard.write_bytes(0, &self.original) },
            Err(e) => {
                // The target still jumps through the trampoline; it has to stay mapped.
                log::warn!("{}: leaking trampoline at {:#x}", self.name, block.address);
                return Err(e);
            }
        }
        unsafe { self.memory.free_executable(block) };
        log::info!("{}: {:#x} restored", self.name, self.target);
        Ok(())
    }
}

impl<M: Memory> Drop for InlineHook<M> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("{}: restore failed: {}", self.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Heap-backed memory that records every protection change.
    #[derive(Clone, Default)]
    struct Recorder {
        flips: Arc<Mutex<Vec<(usize, Access)>>>,
        freed: Arc<Mutex<Vec<usize>>>,
        deny: bool,
    }

    impl Memory for Recorder {
        unsafe fn make_writable(&self, address: usize, len: usize, access: Access) -> Result<crate::memory::Previous> {
            if self.deny {
                return Err(Error::ProtectionChange { address, len, code: 5 });
            }
            self.flips.lock().unwrap().push((address, access));
            Ok(crate::memory::Previous(0))
        }
        unsafe fn restore(&self, _: usize, _: usize, _: crate::memory::Previous) -> Result<()> {
            Ok(())
        }
        fn alloc_executable(&self, len: usize) -> Result<ExecBlock> {
            let block = vec![0u8; len].leak();
            Ok(ExecBlock { address: block.as_mut_ptr() as usize, len })
        }
        unsafe fn free_executable(&self, block: ExecBlock) {
            self.freed.lock().unwrap().push(block.address);
        }
        fn flush_instruction_cache(&self, _: usize, _: usize) {}
    }

    #[test]
    fn state_machine_rejects_leaving_final_states() {
        let mut s = HookState::Uninstalled;
        s.advance(HookState::Installed).unwrap();
        s.advance(HookState::Removed).unwrap();
        assert!(s.is_final());
        assert!(s.advance(HookState::Installed).is_err());

        let mut s = HookState::Uninstalled;
        s.advance(HookState::Abandoned).unwrap();
        assert!(matches!(
            s.advance(HookState::Installed),
            Err(Error::InvalidTransition { from: HookState::Abandoned, to: HookState::Installed })
        ));
        assert!(!HookState::Uninstalled.can_become(HookState::Removed));
    }

    #[test]
    fn tracked_follows_lifecycle() {
        let mut t: Tracked<u32> = Tracked::new();
        t.installed(7).unwrap();
        assert_eq!(t.hook(), Some(&7));
        assert_eq!(t.remove().unwrap(), Some(7));
        assert_eq!(t.state(), HookState::Removed);
        assert!(t.abandon().is_err());
    }

    #[test]
    fn slot_hook_swaps_and_restores() {
        let slot = Box::new(AtomicUsize::new(0x1_4000_1000));
        let addr = &*slot as *const AtomicUsize as usize;
        let mem = Recorder::default();
        let mut published = 0;

        let hook = unsafe {
            PointerSlotHook::install(mem.clone(), "bake", addr, 0xAAAA, 0x1_4000_0000, |o| published = o)
        }
        .unwrap();
        assert_eq!(published, 0x1_4000_1000);
        assert_eq!(slot.load(Ordering::SeqCst), 0xAAAA);
        assert_eq!(hook.original(), 0x1_4000_1000);
        assert_eq!(mem.flips.lock().unwrap()[0], (addr, Access::Data));

        drop(hook);
        assert_eq!(slot.load(Ordering::SeqCst), 0x1_4000_1000);
    }

    #[test]
    fn slot_hook_refuses_implausible_values() {
        let slot = Box::new(AtomicUsize::new(0x1000));
        let addr = &*slot as *const AtomicUsize as usize;
        let err = unsafe { PointerSlotHook::install(Recorder::default(), "bake", addr, 1, 0x1_0000, |_| {}) }
            .err()
            .unwrap();
        assert!(matches!(err, Error::ImplausibleTarget { value: 0x1000, .. }));
        assert_eq!(slot.load(Ordering::SeqCst), 0x1000);

        assert_eq!(unsafe { probe_slot(addr, 0x1_0000) }.unwrap(), None);
        assert!(matches!(unsafe { probe_slot(addr + 1, 0) }, Err(Error::Misaligned { .. })));
    }

    #[test]
    fn slot_hook_leaves_slot_alone_when_protection_fails() {
        let slot = Box::new(AtomicUsize::new(0x5000));
        let addr = &*slot as *const AtomicUsize as usize;
        let mem = Recorder { deny: true, ..Recorder::default() };
        let res = unsafe { PointerSlotHook::install(mem, "bake", addr, 1, 0x10, |_| {}) };
        assert!(matches!(res, Err(Error::ProtectionChange { .. })));
        assert_eq!(slot.load(Ordering::SeqCst), 0x5000);
    }

    const PROLOGUE_BYTES: [u8; 20] = [
        0x48, 0x89, 0x5C, 0x24, 0x18, 0x48, 0x89, 0x74, 0x24, 0x20,
        0x41, 0x54, 0x41, 0x56, 0x41, 0x57, 0x48, 0x83, 0xEC, 0x20,
    ];

    const PROLOGUE: Prologue = Prologue { stolen_len: 20, expected: &PROLOGUE_BYTES, verified_prefix: 5 };

    #[test]
    fn prologue_verification_levels() {
        assert_eq!(PROLOGUE.verify(0, &PROLOGUE_BYTES).unwrap(), PrologueMatch::Exact);

        let mut drifted = PROLOGUE_BYTES;
        drifted[12] = 0x90;
        assert_eq!(PROLOGUE.verify(0, &drifted).unwrap(), PrologueMatch::Partial);

        drifted[0] = 0xCC;
        assert!(matches!(PROLOGUE.verify(0x40, &drifted), Err(Error::PrologueMismatch { address: 0x40 })));

        let unchecked = Prologue { expected: &[], ..PROLOGUE };
        assert_eq!(unchecked.verify(0, &drifted).unwrap(), PrologueMatch::Unchecked);
    }

    #[test]
    fn inline_hook_patches_and_restores_code() {
        let mut code = PROLOGUE_BYTES.to_vec();
        code.extend_from_slice(&[0xC3; 12]);
        let target = code.as_mut_ptr() as usize;
        let mem = Recorder::default();
        let mut published = 0;

        let hook = unsafe {
            InlineHook::install_with(
                mem.clone(), JumpEncoding::AbsIndirect64, "draw", target, &PROLOGUE, 0xDEAD_0000,
                |t| published = t,
            )
        }
        .unwrap();

        let tramp = hook.trampoline().unwrap();
        assert_eq!(published, tramp);
        assert_eq!(&code[..6], &[0xFF, 0x25, 0, 0, 0, 0]);
        assert_eq!(&code[6..14], &0xDEAD_0000u64.to_le_bytes());
        assert_eq!(&code[14..20], &[0x90; 6]);
        assert_eq!(&code[20..], &[0xC3; 12]);

        let body = unsafe { slice::from_raw_parts(tramp as *const u8, 34) };
        assert_eq!(&body[..20], &PROLOGUE_BYTES);
        assert_eq!(&body[26..34], &((target + 20) as u64).to_le_bytes());

        drop(hook);
        assert_eq!(&code[..20], &PROLOGUE_BYTES);
        assert_eq!(mem.freed.lock().unwrap().as_slice(), &[tramp]);
    }

    #[test]
    fn inline_hook_failure_leaves_target_untouched() {
        let mut code = PROLOGUE_BYTES.to_vec();
        let target = code.as_mut_ptr() as usize;
        let mem = Recorder { deny: true, ..Recorder::default() };
        let res = unsafe {
            InlineHook::install_with(mem.clone(), JumpEncoding::AbsIndirect64, "draw", target, &PROLOGUE, 1, |_| {
                panic!("published before the patch could be written")
            })
        };
        assert!(matches!(res, Err(Error::ProtectionChange { .. })));
        assert_eq!(code, PROLOGUE_BYTES.to_vec());
        assert_eq!(mem.freed.lock().unwrap().len(), 1);

        let short = Prologue { stolen_len: 10, expected: &[], verified_prefix: 0 };
        let res = unsafe {
            InlineHook::install_with(Recorder::default(), JumpEncoding::AbsIndirect64, "draw", target, &short, 1, |_| {})
        };
        assert!(matches!(res, Err(Error::StolenRegionTooSmall { stolen: 10, needed: 14 })));
    }
}
