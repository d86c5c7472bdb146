//! Immutable module records

use indexmap::IndexMap;

use crate::solver::SolvableId;

/// A finalized module record.
///
/// Created from a parsed [`ModuleDoc`](crate::module::ModuleDoc) once its
/// context is settled (declared by the build system, or computed by
/// static-context deduplication) and its solvable has been registered
/// with the pool. Immutable from then on; two records describe the same
/// module iff name, stream and context all match.
#[derive(Debug)]
pub struct ModuleItem {
    name: String,
    stream: String,
    version: u64,
    context: String,
    /// Whether the context was declared in the metadata rather than computed
    static_context: bool,
    arch: String,
    requires: IndexMap<String, Vec<String>>,
    /// Canonical serialization of `requires`, used as the deduplication
    /// signature and, for context-less records, as the computed context
    requires_string: String,
    artifacts: Vec<String>,
    profiles: IndexMap<String, Vec<String>>,
    repo_id: String,
    solvable_id: SolvableId,
}

impl ModuleItem {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        stream: String,
        version: u64,
        context: String,
        static_context: bool,
        arch: String,
        requires: IndexMap<String, Vec<String>>,
        requires_string: String,
        artifacts: Vec<String>,
        profiles: IndexMap<String, Vec<String>>,
        repo_id: String,
        solvable_id: SolvableId,
    ) -> Self {
        Self {
            name,
            stream,
            version,
            context,
            static_context,
            arch,
            requires,
            requires_string,
            artifacts,
            profiles,
            repo_id,
            solvable_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn has_static_context(&self) -> bool {
        self.static_context
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn requires(&self) -> &IndexMap<String, Vec<String>> {
        &self.requires
    }

    /// Canonical dependency signature, see [`dependencies_string`]
    pub fn dependencies_string(&self) -> &str {
        &self.requires_string
    }

    pub fn artifacts(&self) -> &[String] {
        &self.artifacts
    }

    pub fn profiles(&self) -> &IndexMap<String, Vec<String>> {
        &self.profiles
    }

    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    /// Identifier of the solvable registered for this record
    pub fn solvable_id(&self) -> SolvableId {
        self.solvable_id
    }

    /// "name:stream"
    pub fn name_stream(&self) -> String {
        format!("{}:{}", self.name, self.stream)
    }

    /// "name:stream:context", the full identity of the record and the name
    /// of its solvable
    pub fn name_stream_context(&self) -> String {
        format!("{}:{}:{}", self.name, self.stream, self.context)
    }
}

/// Serialize a requires map into its canonical dependency signature.
///
/// Entries are sorted by module name and streams are sorted within each
/// entry, so records built from the same dependencies always produce the
/// same signature regardless of metadata order. An empty map serializes
/// to an empty string.
pub(crate) fn dependencies_string(requires: &IndexMap<String, Vec<String>>) -> String {
    let mut entries: Vec<String> = requires
        .iter()
        .map(|(name, streams)| {
            let mut streams = streams.clone();
            streams.sort();
            format!("{}:[{}]", name, streams.join(","))
        })
        .collect();
    entries.sort();
    entries.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requires(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, streams)| {
                (
                    name.to_string(),
                    streams.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_dependencies_string_empty() {
        assert_eq!(dependencies_string(&IndexMap::new()), "");
    }

    #[test]
    fn test_dependencies_string_canonical_order() {
        let a = requires(&[("platform", &["f38", "f37"]), ("perl", &["5.32"])]);
        let b = requires(&[("perl", &["5.32"]), ("platform", &["f37", "f38"])]);

        assert_eq!(dependencies_string(&a), "perl:[5.32];platform:[f37,f38]");
        assert_eq!(dependencies_string(&a), dependencies_string(&b));
    }

    #[test]
    fn test_dependencies_string_any_stream() {
        let r = requires(&[("platform", &[])]);
        assert_eq!(dependencies_string(&r), "platform:[]");
    }
}
