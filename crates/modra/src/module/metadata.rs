//! Module metadata documents
//!
//! A metadata payload is a JSON document with two arrays: `modules`
//! (one document per module build) and `defaults` (default stream and
//! default profiles per module name).

use indexmap::IndexMap;
use serde::Deserialize;

fn default_arch() -> String {
    "noarch".to_string()
}

/// A single module document from a metadata payload.
///
/// This is the pending stage of a module record: the context may still be
/// absent and no solvable has been registered yet. The record becomes a
/// [`ModuleItem`](crate::module::ModuleItem) once both are settled.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDoc {
    pub name: String,
    pub stream: String,
    #[serde(default)]
    pub version: u64,
    /// Build context declared by the build system, if any
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default = "default_arch")]
    pub arch: String,
    /// Module-level dependencies: required module name to accepted streams.
    /// An empty stream list accepts any stream of the required module.
    #[serde(default)]
    pub requires: IndexMap<String, Vec<String>>,
    /// Artifact NEVRAs produced by this module build
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Profile name to the package names it installs
    #[serde(default)]
    pub profiles: IndexMap<String, Vec<String>>,
}

/// A defaults document: the default stream for a module name and the
/// default profiles per stream.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsDoc {
    pub module: String,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub profiles: IndexMap<String, Vec<String>>,
}

/// Parsed module metadata for one repository payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleMetadata {
    #[serde(default)]
    pub modules: Vec<ModuleDoc>,
    #[serde(default)]
    pub defaults: Vec<DefaultsDoc>,
}

impl ModuleMetadata {
    /// Parse a raw metadata payload.
    ///
    /// The caller wraps failures with the originating repository id; a
    /// failed parse applies nothing.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_module() {
        let metadata = ModuleMetadata::parse(
            r#"{"modules": [{"name": "foo", "stream": "stable"}]}"#,
        )
        .unwrap();

        assert_eq!(metadata.modules.len(), 1);
        let doc = &metadata.modules[0];
        assert_eq!(doc.name, "foo");
        assert_eq!(doc.stream, "stable");
        assert_eq!(doc.version, 0);
        assert_eq!(doc.context, None);
        assert_eq!(doc.arch, "noarch");
        assert!(doc.requires.is_empty());
        assert!(doc.artifacts.is_empty());
    }

    #[test]
    fn test_parse_full_module() {
        let metadata = ModuleMetadata::parse(
            r#"{
                "modules": [{
                    "name": "nodejs",
                    "stream": "18",
                    "version": 20230101,
                    "context": "abcd1234",
                    "arch": "x86_64",
                    "requires": {"platform": ["f38"]},
                    "artifacts": ["nodejs-1:18.0.0-1.fc38.x86_64"],
                    "profiles": {"default": ["nodejs"], "development": ["nodejs", "nodejs-devel"]}
                }],
                "defaults": [{"module": "nodejs", "stream": "18", "profiles": {"18": ["default"]}}]
            }"#,
        )
        .unwrap();

        let doc = &metadata.modules[0];
        assert_eq!(doc.context.as_deref(), Some("abcd1234"));
        assert_eq!(doc.requires.get("platform").unwrap(), &vec!["f38".to_string()]);
        assert_eq!(doc.profiles.len(), 2);

        let defaults = &metadata.defaults[0];
        assert_eq!(defaults.module, "nodejs");
        assert_eq!(defaults.stream.as_deref(), Some("18"));
        assert_eq!(defaults.profiles.get("18").unwrap(), &vec!["default".to_string()]);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(ModuleMetadata::parse("not json").is_err());
        assert!(ModuleMetadata::parse(r#"{"modules": [{"stream": "s"}]}"#).is_err());
    }

    #[test]
    fn test_parse_empty_document() {
        let metadata = ModuleMetadata::parse("{}").unwrap();
        assert!(metadata.modules.is_empty());
        assert!(metadata.defaults.is_empty());
    }
}
