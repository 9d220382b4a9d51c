//! In-process stand-ins for BLAS/LAPACK libraries of either integer width.

#![allow(dead_code)]

use blastramp::SymbolTable;
use std::ffi::c_char;

/// Low 32 bits of a 64-bit argument, as a 32-bit library would read it.
fn read32(value: *const i64) -> i64 {
    (unsafe { *value } as u64 as u32 as i32) as i64
}

fn read64(value: *const i64) -> i64 {
    unsafe { *value }
}

/// Reference `isamax`: 1-based index of the largest |x|, 0 when n < 1.
fn isamax(n: i64, x: *const f32, incx: i64) -> i64 {
    if n < 1 || incx < 1 {
        return 0;
    }
    let mut best = 1;
    let mut max = unsafe { (*x).abs() };
    for i in 1..n {
        let value = unsafe { (*x.offset((i * incx) as isize)).abs() };
        if value > max {
            max = value;
            best = i + 1;
        }
    }
    best
}

pub unsafe extern "C" fn isamax_lp64(n: *const i64, x: *const f32, incx: *const i64) -> i64 {
    isamax(read32(n), x, read32(incx))
}

pub unsafe extern "C" fn isamax_ilp64(n: *const i64, x: *const f32, incx: *const i64) -> i64 {
    isamax(read64(n), x, read64(incx))
}

/// Returns an index no correct `isamax` would.
pub unsafe extern "C" fn isamax_confused(_n: *const i64, _x: *const f32, _incx: *const i64) -> i64 {
    7
}

/// Argument validation of the reference `dpotrf`.
fn dpotrf_info(uplo: c_char, n: i64, lda: i64) -> i64 {
    let uplo = uplo as u8;
    if !uplo.eq_ignore_ascii_case(&b'U') && !uplo.eq_ignore_ascii_case(&b'L') {
        -1
    } else if n < 0 {
        -2
    } else if lda < n.max(1) {
        -4
    } else {
        0
    }
}

pub unsafe extern "C" fn dpotrf_lp64(
    uplo: *const c_char,
    n: *const i64,
    _a: *mut f64,
    lda: *const i64,
    info: *mut i64,
    _uplo_len: usize,
) {
    let code = dpotrf_info(unsafe { *uplo }, read32(n), read32(lda)) as i32;
    // A 32-bit store: only the low half of the caller's storage changes.
    unsafe {
        let high = (*info as u64) & 0xffff_ffff_0000_0000;
        *info = (high | code as u32 as u64) as i64;
    }
}

pub unsafe extern "C" fn dpotrf_ilp64(
    uplo: *const c_char,
    n: *const i64,
    _a: *mut f64,
    lda: *const i64,
    info: *mut i64,
    _uplo_len: usize,
) {
    unsafe { *info = dpotrf_info(*uplo, read64(n), read64(lda)) };
}

pub unsafe extern "C" fn sdot_plain(
    n: *const i64,
    x: *const f32,
    incx: *const i64,
    y: *const f32,
    incy: *const i64,
) -> f32 {
    let (n, incx, incy) = (read32(n), read32(incx), read32(incy));
    let mut sum = 0.0f32;
    for i in 0..n {
        unsafe { sum += *x.offset((i * incx) as isize) * *y.offset((i * incy) as isize) };
    }
    sum
}

pub unsafe extern "C" fn sdot_f2c(
    n: *const i64,
    x: *const f32,
    incx: *const i64,
    y: *const f32,
    incy: *const i64,
) -> f64 {
    unsafe { sdot_plain(n, x, incx, y, incy) as f64 }
}

/// An `sdot` whose `float` result is never the dot product.
pub unsafe extern "C" fn sdot_wrong_float(
    _n: *const i64,
    _x: *const f32,
    _incx: *const i64,
    _y: *const f32,
    _incy: *const i64,
) -> f32 {
    1.0
}

/// An `sdot` whose f2c-style `double` result is never the dot product.
pub unsafe extern "C" fn sdot_wrong_double(
    _n: *const i64,
    _x: *const f32,
    _incx: *const i64,
    _y: *const f32,
    _incy: *const i64,
) -> f64 {
    1.0
}

pub unsafe extern "C" fn ddot_any(
    _n: *const i64,
    _x: *const f64,
    _incx: *const i64,
    _y: *const f64,
    _incy: *const i64,
) -> f64 {
    0.0
}

/// A consistent 32-bit library exporting isamax, dpotrf, sdot and ddot.
pub fn lp64_library(suffix: &str) -> SymbolTable {
    unsafe {
        SymbolTable::new()
            .with(&format!("isamax{suffix}"), isamax_lp64 as *const ())
            .with(&format!("dpotrf{suffix}"), dpotrf_lp64 as *const ())
            .with(&format!("sdot{suffix}"), sdot_plain as *const ())
            .with(&format!("ddot{suffix}"), ddot_any as *const ())
    }
}

/// A consistent 64-bit library exporting isamax, dpotrf, sdot and ddot.
pub fn ilp64_library(suffix: &str) -> SymbolTable {
    unsafe {
        SymbolTable::new()
            .with(&format!("isamax{suffix}"), isamax_ilp64 as *const ())
            .with(&format!("dpotrf{suffix}"), dpotrf_ilp64 as *const ())
            .with(&format!("sdot{suffix}"), sdot_plain as *const ())
            .with(&format!("ddot{suffix}"), ddot_any as *const ())
    }
}
