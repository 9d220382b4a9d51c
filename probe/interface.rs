//! LP64/ILP64 detection.
//!
//! Both probes pass every integer by a pointer to 64 bits of storage and
//! arrange for a 32-bit read and a 64-bit read of that storage to disagree.
//! The routine's own behaviour then tells us which read it performed.

use super::hook::HelperOverride;
use super::{Interface, abi, mangle};
use crate::library::SymbolLookup;
use std::ffi::c_void;
use std::ptr::NonNull;
use tracing::{debug, trace, warn};

/// `n` for the `isamax` probe: 3 in the low half, negative as a whole.
pub const ISAMAX_PROBE_N: i64 = 0xffff_ffff_0000_0003_u64 as i64;

/// `info` after `dpotrf` stored `-4` as a 64-bit integer.
pub const DPOTRF_INFO_ILP64: u64 = 0xffff_ffff_ffff_fffc;

/// `info` after `dpotrf` stored `-4` as a 32-bit integer into zeroed 64-bit
/// storage.
pub const DPOTRF_INFO_LP64: u64 = 0x0000_0000_ffff_fffc;

/// Classify an `isamax` implementation.
///
/// Calls `isamax` with `n = ISAMAX_PROBE_N` over `[1.0, 2.0, 1.0]`. A 32-bit
/// read sees `n == 3` and returns the 1-based index 2; a 64-bit read sees a
/// negative `n` and returns 0.
///
/// When `hook` is given its override is in place for the duration of the call
/// only.
///
/// # Safety
///
/// `isamax` must be the entry point of an `isamax` implementation.
pub unsafe fn autodetect_blas_interface(
    isamax: NonNull<c_void>,
    hook: Option<&HelperOverride<'_>>,
) -> Interface {
    let isamax = unsafe { abi::isamax(isamax) };

    let n = ISAMAX_PROBE_N;
    let x = [1.0f32, 2.0, 1.0];
    let incx: i64 = 1;

    let max_idx = {
        let _guard = hook.map(HelperOverride::install);
        unsafe { isamax(&n, x.as_ptr(), &incx) }
    };
    trace!("isamax probe returned {}", max_idx);

    match max_idx {
        0 => Interface::Ilp64,
        2 => Interface::Lp64,
        _ => {
            warn!("isamax probe returned unexpected index {}", max_idx);
            Interface::Unknown
        }
    }
}

/// Classify a `dpotrf` implementation.
///
/// Calls `dpotrf('U', 2, a, lda = 0, info)`, which must reject argument 4 by
/// storing `-4` into `info`. The bit pattern left in the 64-bit `info`
/// storage shows how wide that store was.
///
/// # Safety
///
/// `dpotrf` must be the entry point of a `dpotrf` implementation.
pub unsafe fn autodetect_lapack_interface(dpotrf: NonNull<c_void>) -> Interface {
    let dpotrf = unsafe { abi::dpotrf(dpotrf) };

    let uplo = b'U' as libc::c_char;
    let n: i64 = 2;
    let mut a = [0.0f64; 4];
    let lda: i64 = 0;
    let mut info: i64 = 0;
    unsafe { dpotrf(&uplo, &n, a.as_mut_ptr(), &lda, &mut info, 1) };

    let info = info as u64;
    trace!("dpotrf probe stored info=0x{:016x}", info);

    match info {
        DPOTRF_INFO_ILP64 => Interface::Ilp64,
        DPOTRF_INFO_LP64 => Interface::Lp64,
        _ => {
            warn!("dpotrf probe stored unexpected info 0x{:016x}", info);
            Interface::Unknown
        }
    }
}

/// Classify `lib`, whose routines carry `suffix`.
///
/// Uses the `isamax` probe when `isamax<suffix>` resolves, otherwise the
/// `dpotrf` probe, otherwise reports [`Interface::Unknown`].
pub fn autodetect_interface<L: SymbolLookup + ?Sized>(lib: &L, suffix: &str) -> Interface {
    autodetect_interface_with(lib, suffix, None)
}

/// [`autodetect_interface`] with a helper override around the `isamax` call.
pub fn autodetect_interface_with<L: SymbolLookup + ?Sized>(
    lib: &L,
    suffix: &str,
    hook: Option<&HelperOverride<'_>>,
) -> Interface {
    let interface = if let Some(isamax) = lib.lookup(&mangle("isamax", suffix)) {
        // SAFETY: SymbolLookup guarantees the address is an isamax.
        unsafe { autodetect_blas_interface(isamax, hook) }
    } else if let Some(dpotrf) = lib.lookup(&mangle("dpotrf", suffix)) {
        // SAFETY: SymbolLookup guarantees the address is a dpotrf.
        unsafe { autodetect_lapack_interface(dpotrf) }
    } else {
        Interface::Unknown
    };
    debug!("Detected {} interface (suffix {:?})", interface, suffix);
    interface
}

/// Run both probes and compare.
///
/// Returns [`Interface::Inconsistent`] when both give a definitive answer and
/// the answers differ. If only one is definitive, that one wins. If neither
/// routine resolves the result is [`Interface::Unknown`].
pub fn cross_check_interface<L: SymbolLookup + ?Sized>(
    lib: &L,
    suffix: &str,
    hook: Option<&HelperOverride<'_>>,
) -> Interface {
    let blas = lib
        .lookup(&mangle("isamax", suffix))
        .map(|isamax| unsafe { autodetect_blas_interface(isamax, hook) });
    let lapack = lib
        .lookup(&mangle("dpotrf", suffix))
        .map(|dpotrf| unsafe { autodetect_lapack_interface(dpotrf) });

    match (blas, lapack) {
        (Some(blas), Some(lapack)) if blas.is_known() && lapack.is_known() => {
            if blas == lapack {
                blas
            } else {
                warn!("BLAS probe says {}, LAPACK probe says {}", blas, lapack);
                Interface::Inconsistent
            }
        }
        (Some(known), Some(Interface::Unknown)) | (Some(Interface::Unknown), Some(known))
            if known.is_known() =>
        {
            warn!("One interface probe was inconclusive; using {}", known);
            known
        }
        (Some(only), None) | (None, Some(only)) => only,
        (Some(_), Some(_)) | (None, None) => Interface::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn isamax_lp64(n: *const i64, _x: *const f32, _incx: *const i64) -> i64 {
        if unsafe { *n } as i32 == 3 { 2 } else { -1 }
    }

    unsafe extern "C" fn dpotrf_ilp64(
        _uplo: *const libc::c_char,
        _n: *const i64,
        _a: *mut f64,
        _lda: *const i64,
        info: *mut i64,
        _uplo_len: usize,
    ) {
        unsafe { *info = -4 };
    }

    unsafe extern "C" fn dpotrf_silent(
        _uplo: *const libc::c_char,
        _n: *const i64,
        _a: *mut f64,
        _lda: *const i64,
        _info: *mut i64,
        _uplo_len: usize,
    ) {
    }

    fn addr(f: *const ()) -> NonNull<c_void> {
        NonNull::new(f as *mut c_void).unwrap()
    }

    #[test]
    fn probe_n_bit_pattern() {
        assert_eq!(ISAMAX_PROBE_N as i32, 3);
        assert!(ISAMAX_PROBE_N < 0);
        assert_eq!(DPOTRF_INFO_ILP64 as i64, -4);
        assert_eq!(DPOTRF_INFO_LP64 as u32 as i32, -4);
    }

    #[test]
    fn blas_probe_on_32_bit_reader() {
        let interface = unsafe { autodetect_blas_interface(addr(isamax_lp64 as *const ()), None) };
        assert_eq!(interface, Interface::Lp64);
    }

    #[test]
    fn lapack_probe_on_64_bit_writer() {
        let interface = unsafe { autodetect_lapack_interface(addr(dpotrf_ilp64 as *const ())) };
        assert_eq!(interface, Interface::Ilp64);
    }

    #[test]
    fn lapack_probe_without_error_code_is_unknown() {
        let interface = unsafe { autodetect_lapack_interface(addr(dpotrf_silent as *const ())) };
        assert_eq!(interface, Interface::Unknown);
    }
}
