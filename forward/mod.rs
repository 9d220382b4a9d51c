//! Forwarding table.
//!
//! Every exported routine owns two slots: one for a library with 32-bit
//! integers and one for a library with 64-bit integers. Trampoline stubs
//! load a slot and jump to it; the slots are exported unmangled as
//! `<name>_addr` and `<name>64__addr` for that purpose.
//!
//! # Lifecycle
//!
//! The table starts [`Phase::Unpopulated`]. [`begin_resolution`] moves it to
//! [`Phase::Resolving`] and hands out the only writer, a [`Resolution`].
//! Dropping (or [`Resolution::finish`]ing) the writer moves the table to
//! [`Phase::Populated`]. Checked reads through [`ExportedFunc::target`] are
//! refused while a resolution is running; call-sites must not run before the
//! first resolution has finished.

pub mod catalog;

use crate::library::SymbolLookup;
use crate::{Error, Result};
use std::ffi::c_void;
use std::fmt::{self, Display};
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicPtr, AtomicU8, Ordering};
use tracing::{debug, trace};

pub use catalog::EXPORTED_FUNCS;

/// Which of a routine's two slots a binding targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// 32-bit integer interface.
    Lp64,
    /// 64-bit integer interface.
    Ilp64,
}

impl Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Lp64 => write!(f, "LP64"),
            Binding::Ilp64 => write!(f, "ILP64"),
        }
    }
}

/// A destination address, null until bound.
#[repr(transparent)]
pub struct ForwardingSlot(AtomicPtr<c_void>);

impl ForwardingSlot {
    pub const fn new() -> Self {
        Self(AtomicPtr::new(ptr::null_mut()))
    }

    /// The raw cell, as trampoline stubs see it.
    ///
    /// Reads and writes through the cell skip the lifecycle check that
    /// [`ExportedFunc::target`] and [`Resolution`] enforce: they succeed in
    /// every phase, including mid-resolution. This is what a stub jumping
    /// through the slot does, and what a [`HelperOverride`] needs in order to
    /// occupy a slot during a probe call. Anything else should go through the
    /// checked API.
    ///
    /// [`HelperOverride`]: crate::probe::HelperOverride
    pub fn cell(&self) -> &AtomicPtr<c_void> {
        &self.0
    }

    fn load(&self) -> Option<NonNull<c_void>> {
        NonNull::new(self.0.load(Ordering::Acquire))
    }

    fn store(&self, addr: *mut c_void) {
        self.0.store(addr, Ordering::Release);
    }
}

impl Default for ForwardingSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// An exported routine and its two slots.
pub struct ExportedFunc {
    name: &'static str,
    lp64: &'static ForwardingSlot,
    ilp64: &'static ForwardingSlot,
}

impl ExportedFunc {
    pub const fn new(
        name: &'static str,
        lp64: &'static ForwardingSlot,
        ilp64: &'static ForwardingSlot,
    ) -> Self {
        Self { name, lp64, ilp64 }
    }

    /// Base name, without any mangling suffix.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn slot(&self, binding: Binding) -> &'static ForwardingSlot {
        match binding {
            Binding::Lp64 => self.lp64,
            Binding::Ilp64 => self.ilp64,
        }
    }

    /// The address bound for `binding`, or `None` if the slot is empty.
    ///
    /// Fails with [`Error::ResolutionInProgress`] while a resolution pass is
    /// running.
    pub fn target(&self, binding: Binding) -> Result<Option<NonNull<c_void>>> {
        if phase() == Phase::Resolving {
            return Err(Error::ResolutionInProgress);
        }
        Ok(self.slot(binding).load())
    }
}

/// Look up a catalog entry by base name.
pub fn find(name: &str) -> Option<&'static ExportedFunc> {
    EXPORTED_FUNCS.iter().find(|func| func.name == name)
}

/// Table lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Unpopulated = 0,
    Resolving = 1,
    Populated = 2,
}

impl Phase {
    fn from_u8(value: u8) -> Phase {
        match value {
            0 => Phase::Unpopulated,
            1 => Phase::Resolving,
            _ => Phase::Populated,
        }
    }
}

static PHASE: AtomicU8 = AtomicU8::new(Phase::Unpopulated as u8);

/// Current lifecycle phase.
pub fn phase() -> Phase {
    Phase::from_u8(PHASE.load(Ordering::Acquire))
}

/// Start a resolution pass.
///
/// Fails with [`Error::ResolutionInProgress`] if another pass has not
/// finished yet.
pub fn begin_resolution() -> Result<Resolution> {
    PHASE
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
            (current != Phase::Resolving as u8).then_some(Phase::Resolving as u8)
        })
        .map_err(|_| Error::ResolutionInProgress)?;
    debug!("Forwarding table resolution started");
    Ok(Resolution { _private: () })
}

/// Outcome of binding a library against the catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindReport {
    /// Number of routines bound.
    pub bound: usize,
    /// Catalog routines the library does not export.
    pub missing: Vec<&'static str>,
}

/// Exclusive writer for the forwarding table.
pub struct Resolution {
    _private: (),
}

impl Resolution {
    /// Point `func`'s `binding` slot at `addr`.
    pub fn bind(&mut self, func: &ExportedFunc, binding: Binding, addr: NonNull<c_void>) {
        trace!("Binding {} ({}) to {:p}", func.name, binding, addr);
        func.slot(binding).store(addr.as_ptr());
    }

    /// Empty every slot of every routine.
    pub fn clear_all(&mut self) {
        for func in EXPORTED_FUNCS {
            func.lp64.store(ptr::null_mut());
            func.ilp64.store(ptr::null_mut());
        }
        debug!("Cleared {} forwarding slot pairs", EXPORTED_FUNCS.len());
    }

    /// Resolve every catalog routine as `name + suffix` in `lib` and bind the
    /// ones found. Slots of routines `lib` does not export are left alone.
    pub fn bind_library<L: SymbolLookup + ?Sized>(
        &mut self,
        lib: &L,
        suffix: &str,
        binding: Binding,
    ) -> BindReport {
        let mut report = BindReport::default();
        for func in EXPORTED_FUNCS {
            let symbol = format!("{}{}", func.name, suffix);
            match lib.lookup(&symbol) {
                Some(addr) => {
                    self.bind(func, binding, addr);
                    report.bound += 1;
                }
                None => report.missing.push(func.name),
            }
        }
        debug!(
            "Bound {} of {} routines ({}), {} missing",
            report.bound,
            EXPORTED_FUNCS.len(),
            binding,
            report.missing.len()
        );
        report
    }

    /// End the pass. Equivalent to dropping the writer.
    pub fn finish(self) {}
}

impl Drop for Resolution {
    fn drop(&mut self) {
        PHASE.store(Phase::Populated as u8, Ordering::Release);
        debug!("Forwarding table resolution finished");
    }
}
