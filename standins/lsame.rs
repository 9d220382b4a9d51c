//! Stand-in for the reference LAPACK `LSAME` function.

use macros::stand_in;

/// Case-insensitive comparison of two single characters.
///
/// Returns 1 when `ca` and `cb` name the same letter, 0 otherwise. The
/// hidden CHARACTER length arguments are ignored. The result is returned as
/// a full register so both 32-bit and 64-bit `LOGICAL` readers see 0 or 1.
#[stand_in]
pub fn lsame(ca: *const libc::c_char, cb: *const libc::c_char) -> i64 {
    if ca.is_null() || cb.is_null() {
        return 0;
    }
    let (a, b) = unsafe { (*ca as u8, *cb as u8) };
    a.eq_ignore_ascii_case(&b) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(a: u8, b: u8) -> i64 {
        let (a, b) = (a as libc::c_char, b as libc::c_char);
        blastramp_stand_in_lsame(&a, &b)
    }

    #[test]
    fn compares_case_insensitively() {
        assert_eq!(call(b'U', b'u'), 1);
        assert_eq!(call(b'l', b'L'), 1);
        assert_eq!(call(b'N', b'N'), 1);
    }

    #[test]
    fn rejects_different_letters() {
        assert_eq!(call(b'U', b'L'), 0);
        assert_eq!(call(b'T', b'n'), 0);
    }

    #[test]
    fn null_arguments_compare_unequal() {
        let a = b'U' as libc::c_char;
        assert_eq!(blastramp_stand_in_lsame(&a, std::ptr::null()), 0);
    }
}
