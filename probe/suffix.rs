//! Symbol mangling suffix detection.

use super::mangle;
use crate::library::SymbolLookup;
use tracing::debug;

/// Routines looked for, in order: one BLAS, one LAPACK, so that libraries
/// exporting only one of the two are still recognised.
pub const PROBE_SYMBOLS: [&str; 2] = ["isamax", "dpotrf"];

/// Known suffixes, most common first. The first three are the usual Fortran
/// manglings; the rest are the same manglings followed by the `64_` tag of
/// ILP64 builds (OpenBLAS `SYMBOLSUFFIX=64_` exports `isamax_64_`).
pub const SUFFIX_CANDIDATES: [&str; 6] = ["", "_", "__", "_64_", "__64__", "___64___"];

/// Find the suffix `lib` appends to routine names.
///
/// Tries every candidate suffix on `isamax` before moving on to `dpotrf`; the
/// first name that resolves decides. Returns `None` if no combination
/// resolves.
pub fn autodetect_symbol_suffix<L: SymbolLookup + ?Sized>(lib: &L) -> Option<&'static str> {
    for base in PROBE_SYMBOLS {
        for suffix in SUFFIX_CANDIDATES {
            let name = mangle(base, suffix);
            if lib.lookup(&name).is_some() {
                debug!("Detected symbol suffix {:?} via {}", suffix, name);
                return Some(suffix);
            }
        }
    }
    debug!("No known BLAS/LAPACK symbol suffix found");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::SymbolTable;

    extern "C" fn marker() {}

    fn table(names: &[&str]) -> SymbolTable {
        let mut table = SymbolTable::new();
        for name in names {
            unsafe { table.insert(name, marker as *const ()) };
        }
        table
    }

    #[test]
    fn each_candidate_is_detected() {
        for suffix in SUFFIX_CANDIDATES {
            let lib = table(&[&format!("isamax{suffix}")]);
            assert_eq!(autodetect_symbol_suffix(&lib), Some(suffix));
        }
    }

    #[test]
    fn earlier_candidates_win() {
        let lib = table(&["isamax__", "isamax_"]);
        assert_eq!(autodetect_symbol_suffix(&lib), Some("_"));
    }

    #[test]
    fn blas_name_is_tried_before_lapack_name() {
        // dpotrf_ would match an earlier suffix, but isamax is searched first.
        let lib = table(&["dpotrf_", "isamax_64_"]);
        assert_eq!(autodetect_symbol_suffix(&lib), Some("_64_"));
    }

    #[test]
    fn lapack_only_library() {
        let lib = table(&["dpotrf__64__"]);
        assert_eq!(autodetect_symbol_suffix(&lib), Some("__64__"));
    }

    #[test]
    fn near_miss_manglings_are_not_recognised() {
        let lib = table(&["isamax64_", "isamax_64__", "dpotrf64_"]);
        assert_eq!(autodetect_symbol_suffix(&lib), None);
    }

    #[test]
    fn unrelated_library_has_no_suffix() {
        let lib = table(&["cblas_isamax", "sgemm_"]);
        assert_eq!(autodetect_symbol_suffix(&lib), None);
        assert_eq!(autodetect_symbol_suffix(&SymbolTable::new()), None);
    }
}
