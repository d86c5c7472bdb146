//! Repository registry

use indexmap::IndexMap;

/// Synthetic repository holding installed packages
pub const SYSTEM_REPO_ID: &str = "@System";
/// Synthetic repository holding command-line packages
pub const COMMANDLINE_REPO_ID: &str = "@commandline";

/// A registered repository and the flags modular filtering consults
#[derive(Debug, Clone)]
pub struct Repo {
    id: String,
    enabled: bool,
    /// Packages from a hotfix repository are exempt from modular filtering
    module_hotfixes: bool,
}

impl Repo {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            enabled: true,
            module_hotfixes: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn module_hotfixes(&self) -> bool {
        self.module_hotfixes
    }

    pub fn set_module_hotfixes(&mut self, hotfixes: bool) {
        self.module_hotfixes = hotfixes;
    }
}

/// Registry of repositories by string id, in registration order
#[derive(Debug, Clone, Default)]
pub struct RepoRegistry {
    repos: IndexMap<String, Repo>,
}

impl RepoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an existing repository or create it enabled with defaults
    pub fn get_or_create(&mut self, id: &str) -> &mut Repo {
        self.repos
            .entry(id.to_string())
            .or_insert_with(|| Repo::new(id))
    }

    pub fn get(&self, id: &str) -> Option<&Repo> {
        self.repos.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repo> {
        self.repos.values()
    }

    /// Ids of enabled repositories flagged to keep module hotfixes
    pub fn enabled_hotfix_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|repo| repo.enabled() && repo.module_hotfixes())
            .map(|repo| repo.id().to_string())
            .collect()
    }
}
