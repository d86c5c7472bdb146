//! NEVRA parsing for RPM package identifiers
//!
//! This crate parses the `name-epoch:version-release.arch` form used to
//! identify RPM packages (the epoch is optional). It is the identifier
//! format module metadata uses for build artifacts.

mod nevra;

pub use nevra::{Nevra, NevraError};
