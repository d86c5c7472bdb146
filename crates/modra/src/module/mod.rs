// Module records and their metadata
//
// This module provides the parsed metadata documents, the immutable
// module record built from them, and the persisted per-module state.

mod item;
mod metadata;
mod state;

pub use item::ModuleItem;
pub(crate) use item::dependencies_string;
pub use metadata::{DefaultsDoc, ModuleDoc, ModuleMetadata};
pub use state::ModuleState;
