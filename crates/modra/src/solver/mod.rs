// Constraint engine: solvable pool, considered bitmaps and goal
// resolution over provide-install requirements.

mod goal;
pub(crate) mod map;
pub(crate) mod pool;

pub use goal::Goal;
pub use map::SolvMap;
pub use pool::{DepId, Pool, RepoId, Solvable, SolvableId};
