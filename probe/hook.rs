//! Scoped helper-routine overrides.
//!
//! Without deep binding, a probed library's calls to shared helpers (for
//! example `lsame_`) may land in our own still-empty forwarding slots. A
//! [`HelperOverride`] points those slots at a stand-in for exactly one probe
//! call; the [`OverrideGuard`] it returns puts the previous bindings back when
//! dropped, including during unwinding.

use crate::symbols::{self, FnPtr};
use crate::{Error, Result};
use std::ffi::c_void;
use std::sync::atomic::{AtomicPtr, Ordering};
use tracing::trace;

/// A replacement routine and the slots it should temporarily occupy.
pub struct HelperOverride<'a> {
    slots: &'a [&'a AtomicPtr<c_void>],
    replacement: FnPtr,
}

impl<'a> HelperOverride<'a> {
    pub fn new(slots: &'a [&'a AtomicPtr<c_void>], replacement: FnPtr) -> Self {
        Self { slots, replacement }
    }

    /// Override `slots` with the stand-in registered under `name`.
    pub fn stand_in(name: &str, slots: &'a [&'a AtomicPtr<c_void>]) -> Result<Self> {
        let replacement =
            symbols::lookup(name).ok_or_else(|| Error::MissingStandIn(name.to_string()))?;
        Ok(Self::new(slots, replacement))
    }

    /// Install the replacement. It stays installed until the guard drops.
    #[must_use = "the override is reverted as soon as the guard is dropped"]
    pub fn install(&self) -> OverrideGuard<'a> {
        let replacement = self.replacement.0 as *mut c_void;
        let saved = self
            .slots
            .iter()
            .map(|slot| (*slot, slot.swap(replacement, Ordering::AcqRel)))
            .collect();
        trace!("Installed helper override at {:p}", replacement);
        OverrideGuard { saved }
    }
}

/// Restores overridden slots on drop.
pub struct OverrideGuard<'a> {
    saved: Vec<(&'a AtomicPtr<c_void>, *mut c_void)>,
}

impl Drop for OverrideGuard<'_> {
    fn drop(&mut self) {
        for (slot, previous) in self.saved.drain(..).rev() {
            slot.store(previous, Ordering::Release);
        }
        trace!("Reverted helper override");
    }
}
