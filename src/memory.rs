// memory.rs — The OS memory facility behind the interception engine.
//
// Patching needs four things from the OS: flip page protection around a write,
// hand out executable blocks for trampolines, flush the instruction cache, and
// (where the OS can tell) say whether an address is readable. They sit behind
// the `Memory` trait so the engine itself stays platform-neutral; `OsMemory`
// is the real thing (winapi on Windows, libc elsewhere).

use std::ptr;

use crate::error::{Error, Result};

/// What a region is about to be written as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// A data word such as a function-pointer slot.
    Data,
    /// Instruction bytes.
    Code,
}

/// Opaque protection value handed back to [`Memory::restore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Previous(pub u32);

/// An executable allocation owned by a trampoline.
#[derive(Debug, PartialEq, Eq)]
pub struct ExecBlock {
    pub address: usize,
    pub len: usize,
}

pub trait Memory: Send + Sync {
    /// Make `[address, address + len)` writable, returning the protection to restore.
    ///
    /// # Safety
    /// The range must belong to this process.
    unsafe fn make_writable(&self, address: usize, len: usize, access: Access) -> Result<Previous>;

    /// Put back the protection returned by [`Memory::make_writable`].
    ///
    /// # Safety
    /// Same range as the matching `make_writable` call.
    unsafe fn restore(&self, address: usize, len: usize, previous: Previous) -> Result<()>;

    /// Allocate a readable, writable and executable block.
    fn alloc_executable(&self, len: usize) -> Result<ExecBlock>;

    /// Release a block from [`Memory::alloc_executable`].
    ///
    /// # Safety
    /// No thread may still be executing inside the block.
    unsafe fn free_executable(&self, block: ExecBlock);

    fn flush_instruction_cache(&self, address: usize, len: usize);

    /// Best-effort readability check; platforms without a cheap query only reject null.
    fn is_readable(&self, address: usize, len: usize) -> bool {
        address != 0 && len != 0
    }
}

// ============================================================
// RAII protection guard
// ============================================================

/// Keeps a region writable for its lifetime and restores the old protection on drop.
///
/// Code regions get their instruction cache flushed when the guard goes away.
pub struct ProtectGuard<'m, M: Memory + ?Sized> {
    memory: &'m M,
    address: usize,
    len: usize,
    access: Access,
    previous: Previous,
}

impl<'m, M: Memory + ?Sized> ProtectGuard<'m, M> {
    /// # Safety
    /// The range must belong to this process and stay mapped while the guard lives.
    pub unsafe fn new(memory: &'m M, address: usize, len: usize, access: Access) -> Result<Self> {
        let previous = memory.make_writable(address, len, access)?;
        Ok(Self { memory, address, len, access, previous })
    }

    /// Copy `bytes` to `address + offset`.
    ///
    /// # Safety
    /// No other thread may be executing the bytes being replaced.
    pub unsafe fn write_bytes(&self, offset: usize, bytes: &[u8]) {
        assert!(offset + bytes.len() <= self.len, "write outside guarded region");
        ptr::copy_nonoverlapping(bytes.as_ptr(), (self.address + offset) as *mut u8, bytes.len());
    }
}

impl<M: Memory + ?Sized> Drop for ProtectGuard<'_, M> {
    fn drop(&mut self) {
        if self.access == Access::Code {
            self.memory.flush_instruction_cache(self.address, self.len);
        }
        if let Err(e) = unsafe { self.memory.restore(self.address, self.len, self.previous) } {
            log::warn!("restoring protection at {:#x} failed: {}", self.address, e);
        }
    }
}

/// Copy `bytes` into an executable block (already RWX) and flush it.
///
/// # Safety
/// `block` must come from `memory.alloc_executable` and be at least `bytes.len()` long.
pub unsafe fn fill_block<M: Memory + ?Sized>(memory: &M, block: &ExecBlock, bytes: &[u8]) {
    assert!(bytes.len() <= block.len, "trampoline larger than its block");
    ptr::copy_nonoverlapping(bytes.as_ptr(), block.address as *mut u8, bytes.len());
    memory.flush_instruction_cache(block.address, bytes.len());
}

// ============================================================
// Windows
// ============================================================

#[cfg(windows)]
mod os {
    use super::*;
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::memoryapi::{VirtualAlloc, VirtualFree, VirtualProtect, VirtualQuery};
    use winapi::um::processthreadsapi::{FlushInstructionCache, GetCurrentProcess};
    use winapi::um::winnt::{
        MEMORY_BASIC_INFORMATION, MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_EXECUTE_READ,
        PAGE_EXECUTE_READWRITE, PAGE_EXECUTE_WRITECOPY, PAGE_READONLY, PAGE_READWRITE,
        PAGE_WRITECOPY,
    };

    /// Memory facility of the current process.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct OsMemory;

    impl Memory for OsMemory {
        unsafe fn make_writable(&self, address: usize, len: usize, access: Access) -> Result<Previous> {
            let wanted = match access {
                Access::Data => PAGE_READWRITE,
                Access::Code => PAGE_EXECUTE_READWRITE,
            };
            let mut old: u32 = 0;
            if VirtualProtect(address as *mut _, len, wanted, &mut old) == 0 {
                return Err(Error::ProtectionChange { address, len, code: GetLastError() as i32 });
            }
            Ok(Previous(old))
        }

        unsafe fn restore(&self, address: usize, len: usize, previous: Previous) -> Result<()> {
            let mut old: u32 = 0;
            if VirtualProtect(address as *mut _, len, previous.0, &mut old) == 0 {
                return Err(Error::ProtectionChange { address, len, code: GetLastError() as i32 });
            }
            Ok(())
        }

        fn alloc_executable(&self, len: usize) -> Result<ExecBlock> {
            let p = unsafe {
                VirtualAlloc(ptr::null_mut(), len, MEM_COMMIT | MEM_RESERVE, PAGE_EXECUTE_READWRITE)
            };
            if p.is_null() {
                return Err(Error::Allocation { size: len });
            }
            Ok(ExecBlock { address: p as usize, len })
        }

        unsafe fn free_executable(&self, block: ExecBlock) {
            VirtualFree(block.address as *mut _, 0, MEM_RELEASE);
        }

        fn flush_instruction_cache(&self, address: usize, len: usize) {
            unsafe {
                FlushInstructionCache(GetCurrentProcess(), address as *const _, len);
            }
        }

        fn is_readable(&self, address: usize, len: usize) -> bool {
            if address == 0 || len == 0 {
                return false;
            }
            let readable = PAGE_READONLY | PAGE_READWRITE | PAGE_WRITECOPY
                | PAGE_EXECUTE_READ | PAGE_EXECUTE_READWRITE | PAGE_EXECUTE_WRITECOPY;
            let mut mbi: MEMORY_BASIC_INFORMATION = unsafe { std::mem::zeroed() };
            let ret = unsafe {
                VirtualQuery(address as *const _, &mut mbi, std::mem::size_of::<MEMORY_BASIC_INFORMATION>())
            };
            if ret == 0 || mbi.State != MEM_COMMIT || mbi.Protect & readable == 0 {
                return false;
            }
            address + len <= mbi.BaseAddress as usize + mbi.RegionSize
        }
    }
}

// ============================================================
// Unix
// ============================================================

#[cfg(unix)]
mod os {
    use super::*;

    /// Memory facility of the current process.
    ///
    /// `mprotect` cannot report the old protection, so restore assumes the usual
    /// layout: code pages are read+exec, data pages read+write.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct OsMemory;

    fn page_span(address: usize, len: usize) -> (usize, usize) {
        let page = match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
            n if n > 0 => n as usize,
            _ => 4096,
        };
        let start = address & !(page - 1);
        let end = (address + len + page - 1) & !(page - 1);
        (start, end - start)
    }

    fn mprotect(address: usize, len: usize, prot: libc::c_int) -> Result<()> {
        let (start, span) = page_span(address, len);
        if unsafe { libc::mprotect(start as *mut libc::c_void, span, prot) } != 0 {
            let code = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
            return Err(Error::ProtectionChange { address, len, code });
        }
        Ok(())
    }

    #[cfg(target_arch = "aarch64")]
    extern "C" {
        fn __clear_cache(start: *mut libc::c_char, end: *mut libc::c_char);
    }

    impl Memory for OsMemory {
        unsafe fn make_writable(&self, address: usize, len: usize, access: Access) -> Result<Previous> {
            let (wanted, after) = match access {
                Access::Data => (libc::PROT_READ | libc::PROT_WRITE, libc::PROT_READ | libc::PROT_WRITE),
                Access::Code => (
                    libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
                    libc::PROT_READ | libc::PROT_EXEC,
                ),
            };
            mprotect(address, len, wanted)?;
            Ok(Previous(after as u32))
        }

        unsafe fn restore(&self, address: usize, len: usize, previous: Previous) -> Result<()> {
            mprotect(address, len, previous.0 as libc::c_int)
        }

        fn alloc_executable(&self, len: usize) -> Result<ExecBlock> {
            let p = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    len,
                    libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
                    libc::MAP_PRIVATE | libc::MAP_ANON,
                    -1,
                    0,
                )
            };
            if p == libc::MAP_FAILED {
                return Err(Error::Allocation { size: len });
            }
            Ok(ExecBlock { address: p as usize, len })
        }

        unsafe fn free_executable(&self, block: ExecBlock) {
            libc::munmap(block.address as *mut libc::c_void, block.len);
        }

        #[allow(unused_variables)]
        fn flush_instruction_cache(&self, address: usize, len: usize) {
            #[cfg(target_arch = "aarch64")]
            unsafe {
                __clear_cache(address as *mut libc::c_char, (address + len) as *mut libc::c_char);
            }
        }
    }
}

pub use os::OsMemory;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_memory_hands_out_executable_blocks() {
        let mem = OsMemory;
        let block = mem.alloc_executable(64).unwrap();
        assert_ne!(block.address, 0);
        assert!(mem.is_readable(block.address, 64));
        unsafe {
            fill_block(&mem, &block, &[0x90, 0x90, 0xC3]);
            assert_eq!(*(block.address as *const u8).add(2), 0xC3);
            mem.free_executable(block);
        }
    }

    #[test]
    fn null_is_never_readable() {
        assert!(!OsMemory.is_readable(0, 8));
    }
}
