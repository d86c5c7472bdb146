//! Solvable pool
//!
//! The pool is an explicitly owned handle, never shared global state, so
//! multiple resolver instances can coexist (one pool per module sack).

use std::collections::HashMap;

use indexmap::IndexMap;

use super::map::SolvMap;

/// Identifier of a solvable registered in a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolvableId(pub u32);

/// Identifier of an interned dependency string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepId(pub u32);

/// Identifier of a pool-level repository handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepoId(pub u32);

/// A unit the goal resolver can select.
///
/// For module solvables the name is the full "name:stream:context"
/// identity and the module name is the part shared by all streams.
#[derive(Debug)]
pub struct Solvable {
    id: SolvableId,
    name: String,
    module_name: String,
    version: u64,
    arch: String,
    repo: RepoId,
    provides: Vec<DepId>,
    /// Conjunction of clauses; each clause is a disjunction of accepted
    /// provide dependencies
    requires: Vec<Vec<DepId>>,
}

impl Solvable {
    pub fn id(&self) -> SolvableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn repo(&self) -> RepoId {
        self.repo
    }

    pub fn provides(&self) -> &[DepId] {
        &self.provides
    }

    pub fn requires(&self) -> &[Vec<DepId>] {
        &self.requires
    }
}

static NO_PROVIDERS: [SolvableId; 0] = [];

/// Pool of solvables with an interned dependency table, a reverse
/// provides index and a caller-supplied considered bitmap.
#[derive(Debug, Default)]
pub struct Pool {
    solvables: Vec<Solvable>,
    dep_strings: Vec<String>,
    dep_ids: HashMap<String, DepId>,
    whatprovides: HashMap<DepId, Vec<SolvableId>>,
    considered: Option<SolvMap>,
    repos: IndexMap<String, RepoId>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a dependency string
    pub fn str2dep(&mut self, dep: &str) -> DepId {
        if let Some(&id) = self.dep_ids.get(dep) {
            return id;
        }
        let id = DepId(self.dep_strings.len() as u32);
        self.dep_strings.push(dep.to_string());
        self.dep_ids.insert(dep.to_string(), id);
        id
    }

    /// Look up an already interned dependency string
    pub fn find_dep(&self, dep: &str) -> Option<DepId> {
        self.dep_ids.get(dep).copied()
    }

    pub fn dep2str(&self, dep: DepId) -> &str {
        &self.dep_strings[dep.0 as usize]
    }

    /// Resolve or create a repository handle by its string id
    pub fn find_or_create_repo(&mut self, repo_id: &str) -> RepoId {
        if let Some(&id) = self.repos.get(repo_id) {
            return id;
        }
        let id = RepoId(self.repos.len() as u32);
        self.repos.insert(repo_id.to_string(), id);
        id
    }

    /// Register a solvable. The whatprovides index becomes stale until
    /// [`Pool::create_whatprovides`] runs again.
    pub fn add_solvable(
        &mut self,
        repo: RepoId,
        name: String,
        module_name: String,
        version: u64,
        arch: String,
        provides: Vec<DepId>,
        requires: Vec<Vec<DepId>>,
    ) -> SolvableId {
        let id = SolvableId(self.solvables.len() as u32);
        self.solvables.push(Solvable {
            id,
            name,
            module_name,
            version,
            arch,
            repo,
            provides,
            requires,
        });
        id
    }

    pub fn nsolvables(&self) -> usize {
        self.solvables.len()
    }

    pub fn solvable(&self, id: SolvableId) -> &Solvable {
        &self.solvables[id.0 as usize]
    }

    pub fn solvables(&self) -> impl Iterator<Item = &Solvable> {
        self.solvables.iter()
    }

    /// Rebuild the reverse provides index.
    ///
    /// Provides are computed over the entire universe: the considered map
    /// is detached for the duration of the rebuild and restored
    /// afterwards, so exclusions never leak into the index itself.
    pub fn create_whatprovides(&mut self) {
        let considered = self.considered.take();

        self.whatprovides.clear();
        for solvable in &self.solvables {
            for &dep in &solvable.provides {
                self.whatprovides.entry(dep).or_default().push(solvable.id);
            }
        }

        self.considered = considered;
    }

    /// Solvables providing `dep`, in registration order
    pub fn whatprovides(&self, dep: DepId) -> &[SolvableId] {
        self.whatprovides
            .get(&dep)
            .map(Vec::as_slice)
            .unwrap_or(&NO_PROVIDERS)
    }

    /// Whether a solvable is eligible for resolution. With no considered
    /// map installed, everything is eligible.
    pub fn is_considered(&self, id: SolvableId) -> bool {
        match &self.considered {
            Some(map) => map.contains(id),
            None => true,
        }
    }

    pub fn considered(&self) -> Option<&SolvMap> {
        self.considered.as_ref()
    }

    pub fn considered_mut(&mut self) -> &mut Option<SolvMap> {
        &mut self.considered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_solvable(pool: &mut Pool, name: &str, module_name: &str, version: u64) -> SolvableId {
        let repo = pool.find_or_create_repo("test");
        let provide = pool.str2dep(&format!("module({})", module_name));
        pool.add_solvable(
            repo,
            name.to_string(),
            module_name.to_string(),
            version,
            "x86_64".to_string(),
            vec![provide],
            Vec::new(),
        )
    }

    #[test]
    fn test_dep_interning() {
        let mut pool = Pool::new();
        let a = pool.str2dep("module(foo)");
        let b = pool.str2dep("module(foo)");
        let c = pool.str2dep("module(bar)");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.dep2str(a), "module(foo)");
        assert_eq!(pool.find_dep("module(bar)"), Some(c));
        assert_eq!(pool.find_dep("module(baz)"), None);
    }

    #[test]
    fn test_repo_handles_are_reused() {
        let mut pool = Pool::new();
        let a = pool.find_or_create_repo("rawhide");
        let b = pool.find_or_create_repo("rawhide");
        let c = pool.find_or_create_repo("updates");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_whatprovides() {
        let mut pool = Pool::new();
        simple_solvable(&mut pool, "foo:a:ctx", "foo", 1);
        simple_solvable(&mut pool, "foo:b:ctx", "foo", 2);
        simple_solvable(&mut pool, "bar:a:ctx", "bar", 1);
        pool.create_whatprovides();

        let dep = pool.find_dep("module(foo)").unwrap();
        assert_eq!(pool.whatprovides(dep).len(), 2);

        let dep = pool.find_dep("module(bar)").unwrap();
        assert_eq!(pool.whatprovides(dep).len(), 1);
    }

    #[test]
    fn test_whatprovides_ignores_considered() {
        let mut pool = Pool::new();
        let id = simple_solvable(&mut pool, "foo:a:ctx", "foo", 1);

        let excluded = SolvMap::new(pool.nsolvables());
        *pool.considered_mut() = Some(excluded);
        pool.create_whatprovides();

        // The index sees the whole universe even though nothing is considered
        let dep = pool.find_dep("module(foo)").unwrap();
        assert_eq!(pool.whatprovides(dep), &[id]);
        assert!(!pool.is_considered(id));
        assert!(pool.considered().is_some());
    }
}
