//! Considered-set cache
//!
//! Owns the exclusion set and the two validity flags gating the pool's
//! provides index and considered bitmap. Every exclusion-set mutation
//! invalidates the considered flag; registering new solvables
//! invalidates the provides flag. Both recomputations are rechecked
//! before each resolution attempt, never assumed.

use crate::solver::{Pool, SolvMap, SolvableId};

#[derive(Debug, Default)]
pub(crate) struct ConsideredCache {
    excludes: SolvMap,
    provides_ready: bool,
    considered_uptodate: bool,
}

impl ConsideredCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a resolution session with a fresh, empty exclusion set
    pub fn reset_excludes(&mut self, nsolvables: usize) {
        self.excludes = SolvMap::new(nsolvables);
        self.considered_uptodate = false;
    }

    /// Exclude a solvable from consideration. Exclusions only grow
    /// within a resolution attempt; they are never removed mid-attempt.
    pub fn add_exclude(&mut self, id: SolvableId) {
        self.excludes.add(id);
        self.considered_uptodate = false;
    }

    pub fn excludes(&self) -> &SolvMap {
        &self.excludes
    }

    /// Mark the provides index stale; called when solvables are registered
    pub fn invalidate_provides(&mut self) {
        self.provides_ready = false;
    }

    /// Rebuild the pool's reverse provides index if stale. The pool
    /// computes it over the whole universe, ignoring the considered map.
    pub fn make_provides_ready(&mut self, pool: &mut Pool) {
        if self.provides_ready {
            return;
        }
        pool.create_whatprovides();
        self.provides_ready = true;
    }

    /// Recompute the pool's considered bitmap from the exclusion set if
    /// stale: cover all known solvables, mark everything considered,
    /// subtract the exclusions.
    pub fn recompute_considered(&mut self, pool: &mut Pool) {
        if self.considered_uptodate {
            return;
        }

        let nsolvables = pool.nsolvables();
        let considered = pool
            .considered_mut()
            .get_or_insert_with(|| SolvMap::new(nsolvables));
        considered.grow(nsolvables);
        considered.set_all();
        considered.subtract(&self.excludes);

        self.considered_uptodate = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with_solvables(count: u32) -> Pool {
        let mut pool = Pool::new();
        let repo = pool.find_or_create_repo("test");
        for index in 0..count {
            let provide = pool.str2dep(&format!("module(m{})", index));
            pool.add_solvable(
                repo,
                format!("m{}:s:c", index),
                format!("m{}", index),
                1,
                "x86_64".to_string(),
                vec![provide],
                Vec::new(),
            );
        }
        pool
    }

    #[test]
    fn test_recompute_considered_subtracts_excludes() {
        let mut pool = pool_with_solvables(4);
        let mut cache = ConsideredCache::new();
        cache.reset_excludes(pool.nsolvables());
        cache.add_exclude(SolvableId(2));

        cache.recompute_considered(&mut pool);
        assert!(pool.is_considered(SolvableId(0)));
        assert!(!pool.is_considered(SolvableId(2)));
    }

    #[test]
    fn test_exclude_mutation_invalidates() {
        let mut pool = pool_with_solvables(3);
        let mut cache = ConsideredCache::new();
        cache.reset_excludes(pool.nsolvables());

        cache.recompute_considered(&mut pool);
        assert!(pool.is_considered(SolvableId(1)));

        cache.add_exclude(SolvableId(1));
        cache.recompute_considered(&mut pool);
        assert!(!pool.is_considered(SolvableId(1)));
    }

    #[test]
    fn test_considered_grows_with_pool() {
        let mut pool = pool_with_solvables(2);
        let mut cache = ConsideredCache::new();
        cache.reset_excludes(pool.nsolvables());
        cache.recompute_considered(&mut pool);

        let repo = pool.find_or_create_repo("test");
        let provide = pool.str2dep("module(late)");
        let late = pool.add_solvable(
            repo,
            "late:s:c".to_string(),
            "late".to_string(),
            1,
            "x86_64".to_string(),
            vec![provide],
            Vec::new(),
        );
        cache.invalidate_provides();
        cache.add_exclude(SolvableId(0));

        cache.recompute_considered(&mut pool);
        assert!(pool.is_considered(late));
        assert!(!pool.is_considered(SolvableId(0)));
    }

    #[test]
    fn test_make_provides_ready_is_memoized() {
        let mut pool = pool_with_solvables(1);
        let mut cache = ConsideredCache::new();

        cache.make_provides_ready(&mut pool);
        let dep = pool.find_dep("module(m0)").unwrap();
        assert_eq!(pool.whatprovides(dep).len(), 1);

        // A second call without invalidation is a no-op; after
        // invalidation the index picks up new solvables.
        cache.make_provides_ready(&mut pool);

        let repo = pool.find_or_create_repo("test");
        let provide = pool.str2dep("module(m0)");
        pool.add_solvable(
            repo,
            "m0:other:c".to_string(),
            "m0".to_string(),
            2,
            "x86_64".to_string(),
            vec![provide],
            Vec::new(),
        );
        cache.make_provides_ready(&mut pool);
        assert_eq!(pool.whatprovides(dep).len(), 1);

        cache.invalidate_provides();
        cache.make_provides_ready(&mut pool);
        assert_eq!(pool.whatprovides(dep).len(), 2);
    }
}
