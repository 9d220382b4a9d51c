//! Behavioral ABI probes.
//!
//! Libraries never declare their symbol mangling, integer width, or
//! single-precision return convention. The probes here find out by calling a
//! handful of routines with inputs chosen so that the raw result (an index,
//! an error code, a float) encodes the answer.
//!
//! Every probe returns a classification instead of failing: a name that does
//! not resolve is `None`, and a result that matches none of the expected bit
//! patterns is [`Interface::Unknown`] or [`F2cConvention::Unknown`].
//!
//! Probes keep no state and may run concurrently against different handles.
//! A library that crashes or hangs while being probed takes the caller with
//! it; run probes in a separate process when that matters.
//!
//! # Modules
//!
//! - [`suffix`] - symbol mangling suffix detection
//! - [`interface`] - LP64/ILP64 detection via `isamax` and `dpotrf`
//! - [`f2c`] - single-precision return convention detection via `sdot`
//! - [`abi`] - call signatures used to invoke probed routines
//! - [`hook`] - scoped helper-routine overrides

pub mod abi;
pub mod f2c;
pub mod hook;
pub mod interface;
pub mod suffix;

use std::fmt::{self, Display};

pub use f2c::autodetect_f2c;
pub use hook::{HelperOverride, OverrideGuard};
pub use interface::{
    autodetect_blas_interface, autodetect_interface, autodetect_interface_with,
    autodetect_lapack_interface, cross_check_interface,
};
pub use suffix::{PROBE_SYMBOLS, SUFFIX_CANDIDATES, autodetect_symbol_suffix};

/// Integer width of a library's index and `INTEGER` arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interface {
    /// 32-bit integers.
    Lp64,
    /// 64-bit integers.
    Ilp64,
    /// The probe ran but its result matched no expected pattern, or no
    /// probe routine was exported.
    Unknown,
    /// The BLAS and LAPACK probes gave different definitive answers. Only
    /// [`cross_check_interface`] produces this.
    Inconsistent,
}

impl Interface {
    /// Width of the integer type in bits, if known.
    pub fn bits(self) -> Option<u32> {
        match self {
            Interface::Lp64 => Some(32),
            Interface::Ilp64 => Some(64),
            Interface::Unknown | Interface::Inconsistent => None,
        }
    }

    pub fn is_known(self) -> bool {
        self.bits().is_some()
    }
}

impl Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interface::Lp64 => write!(f, "LP64"),
            Interface::Ilp64 => write!(f, "ILP64"),
            Interface::Unknown => write!(f, "unknown"),
            Interface::Inconsistent => write!(f, "inconsistent"),
        }
    }
}

/// How a library returns single-precision scalars from functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum F2cConvention {
    /// Native `float` return.
    Plain,
    /// f2c/g77 convention: `REAL` functions return a `double`.
    Required,
    /// Neither reading produced the expected value.
    Unknown,
}

impl Display for F2cConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            F2cConvention::Plain => write!(f, "plain"),
            F2cConvention::Required => write!(f, "f2c"),
            F2cConvention::Unknown => write!(f, "unknown"),
        }
    }
}

/// Append a mangling suffix to a routine base name.
pub(crate) fn mangle(base: &str, suffix: &str) -> String {
    let mut name = String::with_capacity(base.len() + suffix.len());
    name.push_str(base);
    name.push_str(suffix);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_bits() {
        assert_eq!(Interface::Lp64.bits(), Some(32));
        assert_eq!(Interface::Ilp64.bits(), Some(64));
        assert_eq!(Interface::Unknown.bits(), None);
        assert!(!Interface::Inconsistent.is_known());
    }

    #[test]
    fn display_names() {
        assert_eq!(Interface::Ilp64.to_string(), "ILP64");
        assert_eq!(F2cConvention::Required.to_string(), "f2c");
    }

    #[test]
    fn mangle_concatenates() {
        assert_eq!(mangle("dpotrf", "_64_"), "dpotrf_64_");
        assert_eq!(mangle("isamax", ""), "isamax");
    }
}
