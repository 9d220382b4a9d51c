//! Probe a library and bind it into the forwarding table.

use crate::config::Config;
use crate::forward::{self, BindReport, Binding};
use crate::library::SymbolLookup;
use crate::probe::{
    F2cConvention, HelperOverride, Interface, autodetect_f2c, autodetect_interface_with,
    autodetect_symbol_suffix, cross_check_interface,
};
use crate::{Error, Result};
use tracing::info;

/// What was learned about a library and how much of it got bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    pub suffix: &'static str,
    pub interface: Interface,
    /// `None` when the probe was disabled or the library has no `sdot`.
    pub f2c: Option<F2cConvention>,
    pub report: BindReport,
}

impl TryFrom<Interface> for Binding {
    type Error = Error;

    fn try_from(interface: Interface) -> Result<Binding> {
        match interface {
            Interface::Lp64 => Ok(Binding::Lp64),
            Interface::Ilp64 => Ok(Binding::Ilp64),
            Interface::Unknown | Interface::Inconsistent => Err(Error::UnknownInterface(interface)),
        }
    }
}

/// Detect `lib`'s suffix and interface, then bind every catalog routine it
/// exports into the matching slots.
///
/// The whole sequence runs inside one resolution pass. If a probe is
/// inconclusive the pass still ends (with the slots cleared when
/// `config.clear` is set) and the error is returned.
pub fn forward_library<L: SymbolLookup + ?Sized>(lib: &L, config: &Config) -> Result<LibraryInfo> {
    let suffix = autodetect_symbol_suffix(lib).ok_or(Error::SuffixNotFound)?;

    let mut resolution = forward::begin_resolution()?;
    if config.clear {
        resolution.clear_all();
    }

    let lsame = forward::find("lsame").ok_or_else(|| Error::MissingStandIn("lsame".to_string()))?;
    let slots = [
        lsame.slot(Binding::Lp64).cell(),
        lsame.slot(Binding::Ilp64).cell(),
    ];
    let hook = if config.deepbindless {
        Some(HelperOverride::stand_in("lsame", &slots)?)
    } else {
        None
    };

    let interface = if config.cross_check {
        cross_check_interface(lib, suffix, hook.as_ref())
    } else {
        autodetect_interface_with(lib, suffix, hook.as_ref())
    };
    let binding = Binding::try_from(interface)?;

    let f2c = if config.f2c_autodetect {
        autodetect_f2c(lib, suffix)
    } else {
        None
    };

    let report = resolution.bind_library(lib, suffix, binding);
    resolution.finish();

    info!(
        "Forwarding {} routines ({}, suffix {:?}, f2c {:?})",
        report.bound, interface, suffix, f2c
    );
    Ok(LibraryInfo {
        suffix,
        interface,
        f2c,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_definitive_interfaces_bind() {
        assert_eq!(Binding::try_from(Interface::Lp64).unwrap(), Binding::Lp64);
        assert_eq!(Binding::try_from(Interface::Ilp64).unwrap(), Binding::Ilp64);
        assert!(matches!(
            Binding::try_from(Interface::Inconsistent),
            Err(Error::UnknownInterface(Interface::Inconsistent))
        ));
        assert!(Binding::try_from(Interface::Unknown).is_err());
    }
}
