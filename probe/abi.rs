//! Call signatures for probed routines.
//!
//! A resolved address carries no type. The probes invoke it under one or more
//! candidate signatures and read the result to learn which one the library
//! really implements. Calls under a signature that turns out to be wrong are
//! speculative: they are only ever made with probe-owned buffers, and their
//! results are compared, never trusted.

use std::ffi::c_void;
use std::ptr::NonNull;

/// `isamax(n, x, incx)` with every integer passed by a 64-bit reference.
pub type IsamaxFn = unsafe extern "C" fn(n: *const i64, x: *const f32, incx: *const i64) -> i64;

/// `dpotrf(uplo, n, a, lda, info)` plus the hidden CHARACTER length of `uplo`.
pub type DpotrfFn = unsafe extern "C" fn(
    uplo: *const libc::c_char,
    n: *const i64,
    a: *mut f64,
    lda: *const i64,
    info: *mut i64,
    uplo_len: usize,
);

/// `sdot` returning a native `float`.
pub type SdotPlainFn = unsafe extern "C" fn(
    n: *const i64,
    x: *const f32,
    incx: *const i64,
    y: *const f32,
    incy: *const i64,
) -> f32;

/// `sdot` returning a `double` under the f2c convention.
pub type SdotF2cFn = unsafe extern "C" fn(
    n: *const i64,
    x: *const f32,
    incx: *const i64,
    y: *const f32,
    incy: *const i64,
) -> f64;

/// Reinterpret `addr` as `isamax`.
///
/// # Safety
///
/// `addr` must be the entry point of an `isamax` implementation.
pub unsafe fn isamax(addr: NonNull<c_void>) -> IsamaxFn {
    unsafe { std::mem::transmute::<*mut c_void, IsamaxFn>(addr.as_ptr()) }
}

/// Reinterpret `addr` as `dpotrf`.
///
/// # Safety
///
/// `addr` must be the entry point of a `dpotrf` implementation.
pub unsafe fn dpotrf(addr: NonNull<c_void>) -> DpotrfFn {
    unsafe { std::mem::transmute::<*mut c_void, DpotrfFn>(addr.as_ptr()) }
}

/// The two candidate return conventions of `sdot`.
#[derive(Copy, Clone, Debug)]
pub enum SdotSignature {
    Plain(SdotPlainFn),
    F2c(SdotF2cFn),
}

impl SdotSignature {
    /// View `addr` as an `sdot` returning `float`.
    ///
    /// # Safety
    ///
    /// `addr` must be the entry point of an `sdot` implementation.
    pub unsafe fn plain(addr: NonNull<c_void>) -> Self {
        SdotSignature::Plain(unsafe {
            std::mem::transmute::<*mut c_void, SdotPlainFn>(addr.as_ptr())
        })
    }

    /// View `addr` as an `sdot` returning `double`.
    ///
    /// # Safety
    ///
    /// `addr` must be the entry point of an `sdot` implementation.
    pub unsafe fn f2c(addr: NonNull<c_void>) -> Self {
        SdotSignature::F2c(unsafe {
            std::mem::transmute::<*mut c_void, SdotF2cFn>(addr.as_ptr())
        })
    }

    /// Compute `x . y` with unit strides, widening the result to `f64`.
    ///
    /// # Safety
    ///
    /// The routine must accept this argument list. If the library uses the
    /// other return convention the result is garbage, but the call itself
    /// only reads `x` and `y`.
    pub unsafe fn call(self, x: &[f32], y: &[f32]) -> f64 {
        let n = x.len().min(y.len()) as i64;
        let inc: i64 = 1;
        match self {
            SdotSignature::Plain(f) => unsafe { f(&n, x.as_ptr(), &inc, y.as_ptr(), &inc) as f64 },
            SdotSignature::F2c(f) => unsafe { f(&n, x.as_ptr(), &inc, y.as_ptr(), &inc) },
        }
    }
}
