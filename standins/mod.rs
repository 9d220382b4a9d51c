//! Stand-in helper routines.
//!
//! When a library cannot be loaded with its own symbols bound first (no
//! `RTLD_DEEPBIND`), its internal calls to shared helpers such as `lsame_`
//! can resolve back into our forwarding stubs, whose slots are still empty
//! while the library is being probed. The routines here are installed into
//! those slots for the duration of a single probe call.
//!
//! # Modules
//!
//! * [`lsame`] - LAPACK character comparison

pub mod lsame;
