//! blastramp - BLAS/LAPACK ABI autodetection and call forwarding.
//!
//! A program linked against a fixed set of BLAS/LAPACK entry points can be
//! served by whatever numerical library gets loaded at run time. blastramp
//! works out how that library mangles its symbol names, whether its integers
//! are 32 or 64 bits wide, and whether it returns `REAL` results f2c style,
//! then records the address of every routine in a forwarding slot that the
//! program's trampoline stubs jump through.
//!
//! # Modules
//!
//! - [`probe`] - Behavioral ABI probes
//! - [`forward`] - Forwarding table and its lifecycle
//! - [`library`] - Library handles and symbol lookup
//! - [`loader`] - Probe a library and populate the forwarding table
//! - [`config`] - Probe and resolution settings
//! - [`standins`] - Stand-in helper routines used while probing
//!
//! # Error Handling
//!
//! Probes never fail; they return a classification that may be "unknown".
//! Everything else uses the consolidated [`Error`] type.

pub mod config;
pub mod forward;
pub mod library;
pub mod loader;
pub mod probe;
pub mod standins;
pub mod symbols;

/// Consolidated error type for all blastramp operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("no known BLAS/LAPACK symbol suffix found")]
    SuffixNotFound,

    #[error("cannot bind a library with {0} interface")]
    UnknownInterface(Interface),

    #[error("forwarding table resolution is in progress")]
    ResolutionInProgress,

    #[error("no stand-in registered for {0}")]
    MissingStandIn(String),
}

pub type Result<T> = core::result::Result<T, Error>;

pub use config::{Config, ConfigBuilder};
pub use forward::{Binding, ExportedFunc, ForwardingSlot};
pub use library::{Library, SymbolLookup, SymbolTable};
pub use loader::{LibraryInfo, forward_library};
pub use probe::{F2cConvention, Interface};
