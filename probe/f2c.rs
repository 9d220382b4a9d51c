//! Single-precision return convention detection.

use super::abi::SdotSignature;
use super::{F2cConvention, mangle};
use crate::library::SymbolLookup;
use tracing::{debug, trace};

/// 0.5 * 0.5, exact in both `f32` and `f64`.
const EXPECTED_DOT: f64 = 0.25;

/// Find out whether `lib`'s `sdot` returns a `float` or, f2c style, a `double`.
///
/// Returns `None` when `sdot<suffix>` does not resolve. Otherwise computes
/// `[0.5] . [0.5]` through the native signature first and only tries the
/// widened signature if that did not produce exactly 0.25.
pub fn autodetect_f2c<L: SymbolLookup + ?Sized>(lib: &L, suffix: &str) -> Option<F2cConvention> {
    let sdot = lib.lookup(&mangle("sdot", suffix))?;

    let x = [0.5f32];
    let y = [0.5f32];

    // SAFETY: SymbolLookup guarantees the address is an sdot; the probe
    // buffers outlive both calls.
    let plain = unsafe { SdotSignature::plain(sdot).call(&x, &y) };
    trace!("sdot probe (float return) = {}", plain);
    let convention = if plain == EXPECTED_DOT {
        F2cConvention::Plain
    } else {
        let widened = unsafe { SdotSignature::f2c(sdot).call(&x, &y) };
        trace!("sdot probe (double return) = {}", widened);
        if widened == EXPECTED_DOT {
            F2cConvention::Required
        } else {
            F2cConvention::Unknown
        }
    };
    debug!("Detected {} single-precision return convention", convention);
    Some(convention)
}
