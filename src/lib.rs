// lib.rs — Entry points of the Hangul text hook.
//
// Loaded into the game process, the library:
//   1. expands the font bake request from 256 glyphs to 256 + 2350 Hangul glyphs
//      by swapping the bake function pointer,
//   2. converts CP949 UI text to UTF-8 by patching the UI text-draw function,
//   3. restores both on unload.
//
// On Windows this happens from DllMain via a worker thread. Elsewhere the
// loader calls `hangul_hook_attach(base)` / `hangul_hook_detach()`.

#![allow(non_snake_case)]

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("Build for x86, x86_64 or aarch64.");

pub mod arch;    // Jump encodings and trampoline bytes
pub mod config;  // Offsets, prologues, poll policies, log settings
pub mod convert; // Encoding detection and CP949 -> UTF-8 conversion
pub mod cp949;   // KS X 1001 Hangul table
pub mod diag;    // Bounded log sink, sample budgets
pub mod error;   // Error taxonomy
pub mod glyph;   // Glyph index formula and expanded glyph table
pub mod hook;    // Pointer-slot and inline interception, hook lifecycle
pub mod memory;  // Page protection and executable allocations
#[cfg(windows)]
pub mod module;  // Module base lookup
pub mod relay;   // The functions installed in place of the host's
pub mod runtime; // Process-wide state between attach and detach
pub mod watcher; // Deferred installation thread

pub use config::Config;
pub use error::{Error, Result};

// ============================================================
// Windows: DLL entry point
// ============================================================

#[cfg(windows)]
mod dll {
    use std::ptr;

    use winapi::shared::minwindef::{BOOL, DWORD, HINSTANCE, LPVOID, TRUE};
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::libloaderapi::DisableThreadLibraryCalls;
    use winapi::um::processthreadsapi::CreateThread;
    use winapi::um::winnt::{DLL_PROCESS_ATTACH, DLL_PROCESS_DETACH};

    use crate::{diag, module, runtime, Config};

    /// Resolves the host module and attaches. Runs outside the loader lock.
    unsafe extern "system" fn worker(_: LPVOID) -> DWORD {
        let result = std::panic::catch_unwind(|| {
            let config = Config::from_env();
            match module::base_address(config.module) {
                Ok(base) => {
                    runtime::attach(base, config);
                    0
                }
                Err(e) => {
                    let _ = diag::init(&config.log);
                    log::warn!("attach: {}", e);
                    diag::flush();
                    1
                }
            }
        });
        result.unwrap_or(2)
    }

    #[no_mangle]
    pub unsafe extern "system" fn DllMain(hinst: HINSTANCE, reason: DWORD, _reserved: LPVOID) -> BOOL {
        match reason {
            DLL_PROCESS_ATTACH => {
                DisableThreadLibraryCalls(hinst);
                diag::set_module_handle(hinst as usize);

                let h = CreateThread(ptr::null_mut(), 0, Some(worker), ptr::null_mut(), 0, ptr::null_mut());
                if !h.is_null() {
                    CloseHandle(h);
                }
            }
            DLL_PROCESS_DETACH => {
                let _ = std::panic::catch_unwind(runtime::detach);
            }
            _ => {}
        }
        TRUE
    }
}

// ============================================================
// Other platforms: explicit C entry points
// ============================================================

/// Attach to a host module loaded at `base`.
///
/// Returns 0 on success, 1 if already attached, -1 for a null base and -2 on panic.
#[cfg(not(windows))]
#[no_mangle]
pub extern "C" fn hangul_hook_attach(base: usize) -> std::ffi::c_int {
    if base == 0 {
        return -1;
    }
    std::panic::catch_unwind(|| if runtime::attach(base, Config::from_env()) { 0 } else { 1 }).unwrap_or(-2)
}

/// Restore every hook and write the final statistics to the log.
#[cfg(not(windows))]
#[no_mangle]
pub extern "C" fn hangul_hook_detach() {
    let _ = std::panic::catch_unwind(runtime::detach);
}
