//! Routines served through the forwarding table.
//!
//! Base names only; a library's mangling suffix is appended at resolution
//! time. `lsame` must stay listed: its slots are where the stand-in goes
//! while a library without deep binding is probed.

use macros::forwarding_table;

forwarding_table! {
    // BLAS level 1
    isamax, idamax, icamax, izamax,
    sasum, dasum, scasum, dzasum,
    saxpy, daxpy, caxpy, zaxpy,
    scopy, dcopy, ccopy, zcopy,
    sdot, ddot, cdotc, zdotc,
    snrm2, dnrm2, scnrm2, dznrm2,
    sscal, dscal, cscal, zscal,
    sswap, dswap, cswap, zswap,
    // BLAS level 2
    sgemv, dgemv, cgemv, zgemv,
    sger, dger,
    strsv, dtrsv,
    // BLAS level 3
    sgemm, dgemm, cgemm, zgemm,
    ssyrk, dsyrk,
    strsm, dtrsm, ctrsm, ztrsm,
    // LAPACK
    spotrf, dpotrf, cpotrf, zpotrf,
    sgetrf, dgetrf, cgetrf, zgetrf,
    sgesv, dgesv, cgesv, zgesv,
    ssyev, dsyev,
    sgeqrf, dgeqrf,
    dgesdd,
    // Shared helpers
    lsame, xerbla,
}
