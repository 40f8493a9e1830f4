// module.rs — Base address of a loaded module (Windows only).

use std::ffi::CString;

use winapi::um::libloaderapi::GetModuleHandleA;

use crate::error::{Error, Result};

/// Load address of `name` in this process; an empty name means the main executable.
pub fn base_address(name: &str) -> Result<usize> {
    let handle = if name.is_empty() {
        unsafe { GetModuleHandleA(std::ptr::null()) }
    } else {
        let c_name = CString::new(name).map_err(|_| Error::Resolution { what: format!("module {:?}", name) })?;
        unsafe { GetModuleHandleA(c_name.as_ptr()) }
    };
    if handle.is_null() {
        return Err(Error::Resolution { what: format!("module {}", name) });
    }
    Ok(handle as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_executable_resolves() {
        assert_ne!(base_address("").unwrap(), 0);
        assert!(matches!(base_address("no_such_module_4711.dll"), Err(Error::Resolution { .. })));
    }
}
