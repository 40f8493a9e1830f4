// diag.rs — Log sink and sampling limits.
//
// Everything in the crate logs through the `log` facade. When logging is
// enabled, `init` installs a BoundedLogger: a simplelog WriteLogger behind a
// record counter, so a hook that fires every frame can never grow the log
// file without bound. Per-call samples have their own smaller budgets.
// Nothing on the conversion path depends on whether a logger is installed.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use log::{LevelFilter, Log, Metadata, Record};
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::LogConfig;

// ============================================================
// Bounded sink
// ============================================================

/// Forwards at most `max_records` records, then writes one notice and goes quiet.
pub struct BoundedLogger<W: Write + Send + 'static> {
    inner: Box<WriteLogger<W>>,
    remaining: AtomicU32,
}

impl<W: Write + Send + 'static> BoundedLogger<W> {
    pub fn new(level: LevelFilter, max_records: u32, sink: W) -> Self {
        let config = ConfigBuilder::new()
            .set_time_format_rfc3339()
            .set_thread_level(LevelFilter::Debug)
            .build();
        Self { inner: WriteLogger::new(level, config, sink), remaining: AtomicU32::new(max_records) }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }
}

impl<W: Write + Send + 'static> Log for BoundedLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }
        match self.remaining.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)) {
            Ok(1) => {
                self.inner.log(record);
                self.inner.log(
                    &Record::builder()
                        .level(log::Level::Warn)
                        .target(record.target())
                        .args(format_args!("log limit reached, further records dropped"))
                        .build(),
                );
                self.inner.flush();
            }
            Ok(_) => self.inner.log(record),
            Err(_) => {}
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

// ============================================================
// Installation
// ============================================================

/// Handle of the injected DLL, used to put the log file next to it.
static MODULE_HANDLE: AtomicUsize = AtomicUsize::new(0);

pub fn set_module_handle(handle: usize) {
    MODULE_HANDLE.store(handle, Ordering::Relaxed);
}

/// Log file location: beside the DLL on Windows, in the temp dir elsewhere.
#[cfg(windows)]
pub fn log_path(file_name: &str) -> PathBuf {
    use winapi::um::libloaderapi::GetModuleFileNameA;

    let handle = MODULE_HANDLE.load(Ordering::Relaxed);
    if handle != 0 {
        let mut buf = [0u8; 512];
        let len = unsafe { GetModuleFileNameA(handle as _, buf.as_mut_ptr() as _, buf.len() as u32) } as usize;
        if len > 0 {
            let path = PathBuf::from(String::from_utf8_lossy(&buf[..len]).into_owned());
            if let Some(dir) = path.parent() {
                return dir.join(file_name);
            }
        }
    }
    PathBuf::from(file_name)
}

#[cfg(not(windows))]
pub fn log_path(file_name: &str) -> PathBuf {
    std::env::temp_dir().join(file_name)
}

/// Install the file logger described by `config`. A disabled config installs nothing.
pub fn init(config: &LogConfig) -> io::Result<()> {
    if !config.enabled {
        return Ok(());
    }
    let file = File::create(log_path(config.file_name))?;
    let logger = BoundedLogger::new(LevelFilter::Debug, config.max_records, file);
    log::set_boxed_logger(Box::new(logger)).map_err(io::Error::other)?;
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}

pub fn flush() {
    log::logger().flush();
}

// ============================================================
// Sampling
// ============================================================

/// Counts down the per-call samples a hook may still log.
pub struct SampleBudget {
    remaining: AtomicU32,
}

impl SampleBudget {
    pub const fn new(samples: u32) -> Self {
        Self { remaining: AtomicU32::new(samples) }
    }

    /// Claim one sample. False once the budget is spent.
    pub fn take(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn reset(&self, samples: u32) {
        self.remaining.store(samples, Ordering::Release);
    }
}

/// Up to `max` bytes as space-separated hex, with a count of what was left out.
pub fn hex_preview(bytes: &[u8], max: usize) -> String {
    let mut s = String::with_capacity(max.min(bytes.len()) * 3 + 8);
    for (i, b) in bytes.iter().take(max).enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:02X}", b);
    }
    if bytes.len() > max {
        let _ = write!(s, " (+{})", bytes.len() - max);
    }
    s
}
