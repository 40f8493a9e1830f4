// config.rs — Where the hooks go and how the hook DLL behaves.
//
// Offsets are facts about one build of the host binary and are carried here as
// data, never derived at runtime. Each platform ships the offsets of the one
// build it was made for; everything else gets no hooks at all.

#[cfg(all(windows, target_arch = "x86_64"))]
use std::time::Duration;

use crate::hook::Prologue;
use crate::watcher::PollPolicy;

/// A function-pointer variable inside the host module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotTarget {
    /// Offset from the module base.
    pub offset: usize,
    /// Smallest value accepted as an initialized code pointer.
    pub min_plausible: usize,
    pub poll: PollPolicy,
}

/// A function entry inside the host module, patched in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InlineTarget {
    pub offset: usize,
    pub prologue: Prologue,
    pub poll: PollPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    pub file_name: &'static str,
    /// Records written before the log goes quiet.
    pub max_records: u32,
    /// Per-call samples (text draws, bake requests) written before sampling stops.
    pub max_samples: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: "hangul_text_hook.log",
            max_records: 200,
            max_samples: 30,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Host module the offsets are relative to.
    pub module: &'static str,
    /// Glyph-bake function pointer.
    pub bake: Option<SlotTarget>,
    /// UI text-draw function.
    pub text_draw: Option<InlineTarget>,
    pub log: LogConfig,
}

// mov [rsp+18h], rbx / mov [rsp+20h], rsi / push r12 / push r14 / push r15 / sub rsp, 20h
#[cfg(all(windows, target_arch = "x86_64"))]
const DRAW_TEXT_PROLOGUE: [u8; 20] = [
    0x48, 0x89, 0x5C, 0x24, 0x18,
    0x48, 0x89, 0x74, 0x24, 0x20,
    0x41, 0x54,
    0x41, 0x56,
    0x41, 0x57,
    0x48, 0x83, 0xEC, 0x20,
];

impl Default for Config {
    #[cfg(all(windows, target_arch = "x86_64"))]
    fn default() -> Self {
        Self {
            module: "nwmain.exe",
            bake: Some(SlotTarget {
                offset: 0x0140_B278,
                min_plausible: 0x1_4000_0000,
                poll: PollPolicy::default(),
            }),
            text_draw: Some(InlineTarget {
                offset: 0x00A8_24B0,
                prologue: Prologue { stolen_len: 20, expected: &DRAW_TEXT_PROLOGUE, verified_prefix: 5 },
                poll: PollPolicy::new(Duration::from_secs(1), 60).with_initial_delay(Duration::from_secs(5)),
            }),
            log: LogConfig::default(),
        }
    }

    #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
    fn default() -> Self {
        Self {
            module: "nwmain",
            bake: Some(SlotTarget {
                offset: 0x0144_4F00,
                min_plausible: 0x1_0000_0000,
                poll: PollPolicy::default(),
            }),
            text_draw: None,
            log: LogConfig::default(),
        }
    }

    #[cfg(not(any(
        all(windows, target_arch = "x86_64"),
        all(target_os = "macos", target_arch = "aarch64")
    )))]
    fn default() -> Self {
        Self { module: "", bake: None, text_draw: None, log: LogConfig::default() }
    }
}

/// `0`, `off`, `false` and `no` turn a switch off; anything else leaves it on.
fn switched_off(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "off" | "false" | "no")
}

impl Config {
    /// Defaults with `HANGUL_HOOK_LOG`, `HANGUL_HOOK_TEXT` and `HANGUL_HOOK_BAKE` applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply switch overrides looked up through `var`.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let off = |key: &str| var(key).is_some_and(|v| switched_off(&v));
        if off("HANGUL_HOOK_LOG") {
            self.log.enabled = false;
        }
        if off("HANGUL_HOOK_TEXT") {
            self.text_draw = None;
        }
        if off("HANGUL_HOOK_BAKE") {
            self.bake = None;
        }
        self
    }

    /// True when there is nothing to install.
    pub fn is_inert(&self) -> bool {
        self.bake.is_none() && self.text_draw.is_none()
    }
}
