//! Persisted per-module state and its textual codec

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModularError;

/// Persisted state of a module name.
///
/// The state is tracked per module *name*, not per stream. A name with no
/// recorded state is treated as `Available` by every caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModuleState {
    #[default]
    Available,
    Enabled,
    Disabled,
}

impl ModuleState {
    /// Canonical textual spelling of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleState::Available => "Available",
            ModuleState::Enabled => "Enabled",
            ModuleState::Disabled => "Disabled",
        }
    }
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModuleState {
    type Err = ModularError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ModuleState::Available),
            "Enabled" => Ok(ModuleState::Enabled),
            "Disabled" => Ok(ModuleState::Disabled),
            other => Err(ModularError::InvalidModuleState(other.to_string())),
        }
    }
}

impl Serialize for ModuleState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModuleState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
