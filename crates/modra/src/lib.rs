pub mod error;
pub mod module;
pub mod repo;
pub mod rpm;
pub mod sack;
pub mod solver;
pub mod system;

pub use error::{ModularError, Result};
pub use module::{ModuleItem, ModuleMetadata, ModuleState};
pub use repo::{Repo, RepoRegistry, COMMANDLINE_REPO_ID, SYSTEM_REPO_ID};
pub use rpm::{Package, PackageId, PackageQuery, PackageSack};
pub use sack::{ModuleErrorType, ModuleSack};
pub use solver::{Goal, Pool, SolvableId};
pub use system::SystemState;
