//! Persisted system state
//!
//! Tracks the enable/disable decision per module name plus the stream an
//! enabled name is pinned to. Read-only from the resolver's perspective;
//! absence of an entry is not an error and callers treat it as
//! `Available` with no enabled stream.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::module::ModuleState;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModuleStateEntry {
    state: ModuleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled_stream: Option<String>,
}

/// Snapshot of the persisted per-module state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemState {
    #[serde(default)]
    modules: IndexMap<String, ModuleStateEntry>,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a persisted snapshot
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Recorded state for a module name, if any
    pub fn module_state(&self, name: &str) -> Option<ModuleState> {
        self.modules.get(name).map(|entry| entry.state)
    }

    /// Stream the module name is enabled on, if any
    pub fn module_enabled_stream(&self, name: &str) -> Option<&str> {
        self.modules
            .get(name)
            .and_then(|entry| entry.enabled_stream.as_deref())
    }

    /// Enable a module name on a stream
    pub fn enable(&mut self, name: &str, stream: &str) {
        self.modules.insert(
            name.to_string(),
            ModuleStateEntry {
                state: ModuleState::Enabled,
                enabled_stream: Some(stream.to_string()),
            },
        );
    }

    /// Disable a module name
    pub fn disable(&mut self, name: &str) {
        self.modules.insert(
            name.to_string(),
            ModuleStateEntry {
                state: ModuleState::Disabled,
                enabled_stream: None,
            },
        );
    }

    /// Drop any recorded state for a module name
    pub fn reset(&mut self, name: &str) {
        self.modules.shift_remove(name);
    }
}
