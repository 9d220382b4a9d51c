//! Stand-in routine registration and lookup.
//!
//! This module provides a distributed slice that collects all routines
//! registered via the `#[stand_in]` attribute macro. Stand-ins are keyed by
//! routine base name, but a library asks for them by its own mangled name
//! (`lsame_`, `lsame_64_`), so lookups accept any known suffix.

use crate::probe::SUFFIX_CANDIDATES;
use linkme::distributed_slice;

/// A function pointer wrapper that's Sync.
///
/// Function pointers are safe to share across threads (they're just addresses
/// into read-only code), but Rust doesn't automatically implement Sync for
/// raw pointers.
#[derive(Clone, Copy, Debug)]
pub struct FnPtr(pub *const ());

// SAFETY: Function pointers point to immutable code, so they're safe to share.
unsafe impl Sync for FnPtr {}
// SAFETY: see above.
unsafe impl Send for FnPtr {}

/// A registered stand-in: the helper's base name and our implementation.
#[derive(Clone, Copy, Debug)]
pub struct StandIn {
    pub name: &'static str,
    pub addr: FnPtr,
}

impl StandIn {
    /// Whether `symbol` is this helper's base name plus a known suffix.
    pub fn answers_to(&self, symbol: &str) -> bool {
        symbol
            .strip_prefix(self.name)
            .is_some_and(|suffix| SUFFIX_CANDIDATES.contains(&suffix))
    }
}

/// Distributed slice of stand-in routines.
#[distributed_slice]
pub static STAND_INS: [StandIn] = [..];

/// Look up a stand-in routine by base name or mangled symbol name.
///
/// `lookup("lsame")`, `lookup("lsame_")` and `lookup("lsame_64_")` all find
/// the `lsame` stand-in. Returns None if no stand-in answers to `symbol`.
pub fn lookup(symbol: &str) -> Option<FnPtr> {
    STAND_INS
        .iter()
        .find(|stand_in| stand_in.answers_to(symbol))
        .map(|stand_in| stand_in.addr)
}
