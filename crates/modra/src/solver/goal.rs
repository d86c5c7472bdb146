//! Goal resolution over provide-install jobs
//!
//! A goal is a set of weighted provide-install requirements resolved by
//! deterministic backtracking. The invariant the resolver enforces is
//! that at most one solvable per module name can be selected; requires
//! clauses of a selected solvable are satisfied transitively under the
//! same invariant.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::pool::{DepId, Pool, SolvableId};

#[derive(Debug, Clone, Copy)]
struct Job {
    dep: DepId,
    /// Mandatory: resolution of the whole goal fails when unsatisfiable.
    /// Non-strict jobs are dropped silently instead.
    strict: bool,
    /// Restrict candidates to the highest available version
    latest: bool,
}

/// A resolvable set of provide-install requirements.
///
/// After [`Goal::resolve`] the installed set, the conflicting solvables
/// observed during a failed run and the problem descriptions are
/// available from the accessors. Resolving again resets all three.
#[derive(Debug, Default)]
pub struct Goal {
    jobs: Vec<Job>,
    installs: Vec<SolvableId>,
    conflicting: Vec<SolvableId>,
    problems: Vec<String>,
}

impl Goal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provide-install requirement.
    ///
    /// `strict` makes the job mandatory; `latest` restricts its
    /// candidates to the highest version among the providers.
    pub fn add_provide_install(&mut self, dep: DepId, strict: bool, latest: bool) {
        self.jobs.push(Job { dep, strict, latest });
    }

    /// Resolve the goal against the pool. Returns whether every strict
    /// job was satisfied.
    pub fn resolve(&mut self, pool: &Pool) -> bool {
        self.installs.clear();
        self.conflicting.clear();
        self.problems.clear();

        // module name -> selected solvable
        let mut chosen: IndexMap<String, SolvableId> = IndexMap::new();
        let mut blocked: Vec<(SolvableId, SolvableId)> = Vec::new();
        let mut success = true;

        // Strict jobs first, in insertion order
        for job in self.jobs.iter().filter(|job| job.strict) {
            if !satisfy(pool, job.dep, job.latest, &mut chosen, &mut blocked) {
                log::debug!("goal: cannot satisfy {}", pool.dep2str(job.dep));
                self.problems.push(describe_unsatisfied(pool, job.dep));
                success = false;
            }
        }

        for job in self.jobs.iter().filter(|job| !job.strict) {
            let saved = chosen.clone();
            if !satisfy(pool, job.dep, job.latest, &mut chosen, &mut blocked) {
                chosen = saved;
                log::debug!("goal: dropping optional {}", pool.dep2str(job.dep));
            }
        }

        if success {
            self.installs = chosen.into_values().collect();
            self.installs.sort();
        } else {
            let set: BTreeSet<SolvableId> = blocked
                .into_iter()
                .flat_map(|(candidate, holder)| [candidate, holder])
                .collect();
            self.conflicting = set.into_iter().collect();
        }

        success
    }

    /// Solvables selected by the last successful resolution
    pub fn list_installs(&self) -> &[SolvableId] {
        &self.installs
    }

    /// Solvables observed mutually conflicting during the last failed
    /// resolution (blocked by the one-per-module-name invariant)
    pub fn list_conflicting(&self) -> &[SolvableId] {
        &self.conflicting
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

/// Considered providers of `dep`, best candidate first
fn candidates(pool: &Pool, dep: DepId, latest: bool) -> Vec<SolvableId> {
    let mut candidates: Vec<SolvableId> = pool
        .whatprovides(dep)
        .iter()
        .copied()
        .filter(|&id| pool.is_considered(id))
        .collect();

    if latest {
        if let Some(max) = candidates.iter().map(|&id| pool.solvable(id).version()).max() {
            candidates.retain(|&id| pool.solvable(id).version() == max);
        }
    }

    candidates.sort_by(|&a, &b| {
        pool.solvable(b)
            .version()
            .cmp(&pool.solvable(a).version())
            .then(a.cmp(&b))
    });
    candidates
}

/// Try to satisfy `dep` by selecting one of its providers, recursively
/// satisfying the provider's requires clauses. On failure `chosen` is
/// left untouched; blocked selections are recorded either way.
fn satisfy(
    pool: &Pool,
    dep: DepId,
    latest: bool,
    chosen: &mut IndexMap<String, SolvableId>,
    blocked: &mut Vec<(SolvableId, SolvableId)>,
) -> bool {
    let candidates = candidates(pool, dep, latest);

    // Already satisfied by a previous selection
    if candidates
        .iter()
        .any(|id| chosen.get(pool.solvable(*id).module_name()) == Some(id))
    {
        return true;
    }

    for &candidate in &candidates {
        let solvable = pool.solvable(candidate);

        if let Some(&holder) = chosen.get(solvable.module_name()) {
            if holder != candidate {
                // Another stream or context of the same module is selected
                blocked.push((candidate, holder));
                continue;
            }
        }

        let saved = chosen.clone();
        chosen.insert(solvable.module_name().to_string(), candidate);

        let mut satisfied = true;
        for clause in solvable.requires() {
            let mut clause_ok = false;
            for &alternative in clause {
                let before = chosen.clone();
                if satisfy(pool, alternative, false, chosen, blocked) {
                    clause_ok = true;
                    break;
                }
                *chosen = before;
            }
            if !clause_ok {
                satisfied = false;
                break;
            }
        }

        if satisfied {
            return true;
        }
        *chosen = saved;
    }

    false
}

fn describe_unsatisfied(pool: &Pool, dep: DepId) -> String {
    let considered: Vec<SolvableId> = pool
        .whatprovides(dep)
        .iter()
        .copied()
        .filter(|&id| pool.is_considered(id))
        .collect();

    if considered.is_empty() {
        format!("nothing provides requested {}", pool.dep2str(dep))
    } else {
        format!("conflicting requests for {}", pool.dep2str(dep))
    }
}
