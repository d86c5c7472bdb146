// Package universe and the query sublanguage modular filtering composes

mod package;
mod query;

pub use package::{Package, PackageId, PackageSack};
pub use query::PackageQuery;
