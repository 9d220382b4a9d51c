//! Library handles.
//!
//! Probes only need one capability from a loaded library: turning a symbol
//! name into an address. [`SymbolLookup`] captures that, [`Library`] provides
//! it for a `dlopen`ed shared object, and [`SymbolTable`] for an in-memory
//! name map (stand-in libraries, overrides).

use crate::{Error, Result};
use std::collections::HashMap;
use std::ffi::{CStr, CString, c_void};
use std::ptr::NonNull;
use tracing::{debug, trace};

/// Resolves exported symbol names to addresses.
///
/// # Safety
///
/// Probes call the returned addresses directly. An implementation vouches
/// that any address it returns for a BLAS/LAPACK routine name (`isamax`,
/// `dpotrf`, `sdot`, with any mangling suffix) points at code with the
/// reference Fortran calling interface of that routine, in either integer
/// width.
pub unsafe trait SymbolLookup {
    /// Resolve `name`, or `None` if the library does not export it.
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>>;
}

/// A shared library opened with `dlopen`.
///
/// The handle is never closed: resolved addresses end up in forwarding slots
/// that live for the rest of the process.
pub struct Library {
    path: String,
    handle: NonNull<c_void>,
}

// SAFETY: a dlopen handle is a process-wide token; dlsym is thread-safe.
unsafe impl Send for Library {}
// SAFETY: see above.
unsafe impl Sync for Library {}

impl Library {
    /// Open the library at `path`.
    ///
    /// With `deepbind` the library's own symbols take precedence over ours
    /// when it resolves its internal dependencies. It is ignored where
    /// `RTLD_DEEPBIND` does not exist.
    pub fn open(path: &str, deepbind: bool) -> Result<Library> {
        let c_path = CString::new(path).map_err(|_| Error::Load {
            path: path.to_string(),
            reason: "path contains null byte".to_string(),
        })?;
        let flags = libc::RTLD_NOW | libc::RTLD_LOCAL | deepbind_flag(deepbind);
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), flags) };
        match NonNull::new(handle) {
            Some(handle) => {
                debug!("Opened {} (deepbind={})", path, deepbind);
                Ok(Library {
                    path: path.to_string(),
                    handle,
                })
            }
            None => Err(Error::Load {
                path: path.to_string(),
                reason: last_dl_error(),
            }),
        }
    }

    /// The path this library was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

// SAFETY: opening a library is taken as trusting it to be a conforming
// BLAS/LAPACK build.
unsafe impl SymbolLookup for Library {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        let c_name = CString::new(name).ok()?;
        let addr = unsafe { libc::dlsym(self.handle.as_ptr(), c_name.as_ptr()) };
        trace!("dlsym({}) = {:p}", name, addr);
        NonNull::new(addr)
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn deepbind_flag(deepbind: bool) -> libc::c_int {
    if deepbind { libc::RTLD_DEEPBIND } else { 0 }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn deepbind_flag(_deepbind: bool) -> libc::c_int {
    0
}

/// Whether this platform's dynamic loader supports deep binding.
pub const fn supports_deepbind() -> bool {
    cfg!(all(target_os = "linux", target_env = "gnu"))
}

fn last_dl_error() -> String {
    let msg = unsafe { libc::dlerror() };
    if msg.is_null() {
        return "unknown dlopen error".to_string();
    }
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

/// An in-memory symbol table.
#[derive(Default)]
pub struct SymbolTable {
    symbols: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `addr` under `name`, replacing any previous entry.
    ///
    /// # Safety
    ///
    /// `addr` must satisfy the [`SymbolLookup`] contract for `name`.
    pub unsafe fn insert(&mut self, name: &str, addr: *const ()) {
        self.symbols.insert(name.to_string(), addr as usize);
    }

    /// Builder form of [`SymbolTable::insert`].
    ///
    /// # Safety
    ///
    /// Same as [`SymbolTable::insert`].
    pub unsafe fn with(mut self, name: &str, addr: *const ()) -> Self {
        unsafe { self.insert(name, addr) };
        self
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// SAFETY: every entry went through the unsafe `insert`.
unsafe impl SymbolLookup for SymbolTable {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        self.symbols
            .get(name)
            .and_then(|&addr| NonNull::new(addr as *mut c_void))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn marker() {}

    #[test]
    fn symbol_table_resolves_registered_names() {
        let table = unsafe { SymbolTable::new().with("isamax_", marker as *const ()) };
        assert_eq!(table.len(), 1);
        let addr = table.lookup("isamax_").expect("registered");
        assert_eq!(addr.as_ptr() as usize, marker as usize);
        assert!(table.lookup("isamax").is_none());
    }

    #[test]
    fn missing_library_reports_dlerror() {
        let err = Library::open("/nonexistent/libblas-missing.so", false)
            .err()
            .expect("open should fail");
        match err {
            Error::Load { path, reason } => {
                assert_eq!(path, "/nonexistent/libblas-missing.so");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn interior_null_is_rejected() {
        assert!(matches!(
            Library::open("lib\0blas.so", false),
            Err(Error::Load { .. })
        ));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn libc_exports_are_resolvable() {
        let libc = Library::open("libc.so.6", false).expect("libc");
        assert!(libc.lookup("malloc").is_some());
        assert!(libc.lookup("isamax_").is_none());
    }
}
