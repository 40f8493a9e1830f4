// error.rs — Failure taxonomy for the interception engine and its collaborators.
//
// Every failure is local: the caller disables one feature (one hook, one
// conversion) and the host process keeps running. Nothing here ever crosses
// the FFI boundary; relays log and fall back to pass-through.

use thiserror::Error;

use crate::hook::HookState;

/// The crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Target module or address could not be found. Fatal to that hook only.
    #[error("could not resolve {what}")]
    Resolution { what: String },

    /// A deferred install never saw its precondition hold.
    #[error("{hook}: precondition not met after {attempts} attempts")]
    PreconditionTimeout { hook: &'static str, attempts: u32 },

    /// The OS refused a memory-protection change. The target is left untouched.
    #[error("protection change at {address:#x} (+{len}) failed: os error {code}")]
    ProtectionChange { address: usize, len: usize, code: i32 },

    /// Scratch, trampoline or table allocation failed.
    #[error("allocation of {size} bytes failed")]
    Allocation { size: usize },

    /// A pointer slot holds null or a value below the plausible code range.
    #[error("slot {slot:#x} holds implausible code address {value:#x}")]
    ImplausibleTarget { slot: usize, value: usize },

    /// A pointer slot is not aligned for an atomic swap.
    #[error("slot {slot:#x} is not pointer-aligned")]
    Misaligned { slot: usize },

    /// The slot changed between the probe and the swap.
    #[error("slot {slot:#x} changed during install (expected {expected:#x}, found {found:#x})")]
    SlotRaced { slot: usize, expected: usize, found: usize },

    /// The bytes at an inline target are not the configured prologue.
    #[error("prologue at {address:#x} does not match the expected pattern")]
    PrologueMismatch { address: usize },

    /// The stolen region cannot hold the redirect jump, or would be split by padding.
    #[error("stolen region of {stolen} bytes cannot hold a {needed}-byte jump")]
    StolenRegionTooSmall { stolen: usize, needed: usize },

    /// A relative jump cannot reach its destination.
    #[error("jump from {from:#x} to {to:#x} is out of range")]
    JumpOutOfRange { from: usize, to: usize },

    /// A hook state transition the lifecycle does not allow.
    #[error("invalid hook transition {from:?} -> {to:?}")]
    InvalidTransition { from: HookState, to: HookState },

    /// Background watcher could not be started.
    #[error("failed to spawn watcher thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
