//! Module sack: the catalog of module records and the activation resolver
//!
//! The sack owns its pool and considered-set cache outright, so multiple
//! sacks can coexist (one resolution session each). Loading appends
//! records per repository; the first query for active modules runs the
//! four-tier activation resolution and memoizes its result.

mod considered;
mod filtering;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{ModularError, Result};
use crate::module::{dependencies_string, ModuleDoc, ModuleItem, ModuleMetadata, ModuleState};
use crate::solver::{Goal, Pool, SolvableId};
use crate::system::SystemState;

use considered::ConsideredCache;

/// Graded outcome of activation resolution.
///
/// Every tier except total failure yields a usable activation set; the
/// variants signal how far the constraints had to be relaxed. Returned
/// as data rather than through the error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleErrorType {
    /// Enabled and default streams all resolved at their latest versions
    NoError,
    /// Default streams had to be relaxed to optional
    ErrorInDefaults,
    /// The latest-version preference had to be relaxed
    ErrorInLatest,
    /// Best-effort resolution; some modules may have been dropped
    Error,
    /// No module set could be activated at all
    CannotResolveModules,
}

/// A parsed module document whose context is not settled yet
#[derive(Debug)]
struct PendingModule {
    doc: ModuleDoc,
    repo_id: String,
}

/// Catalog of module records plus the state driving activation
#[derive(Debug, Default)]
pub struct ModuleSack {
    pool: Pool,
    cache: ConsideredCache,
    modules: Vec<Arc<ModuleItem>>,
    /// Records loaded without a static context, waiting for deduplication
    pending: Vec<PendingModule>,
    /// Default stream per module name, from defaults documents
    module_defaults: IndexMap<String, String>,
    /// Default profiles per module name and stream
    default_profiles: IndexMap<String, IndexMap<String, Vec<String>>>,
    /// Solvable id of each active module record
    active_modules: IndexMap<SolvableId, Arc<ModuleItem>>,
    active_modules_resolved: bool,
}

impl ModuleSack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register module-definition content for a repository.
    ///
    /// The payload is parsed fully before anything is applied, so a
    /// malformed payload leaves the catalog untouched.
    pub fn add(&mut self, content: &str, repo_id: &str) -> Result<()> {
        let metadata =
            ModuleMetadata::parse(content).map_err(|source| ModularError::MetadataParse {
                repo_id: repo_id.to_string(),
                source,
            })?;

        log::debug!(
            "loaded {} module documents and {} defaults from repository \"{}\"",
            metadata.modules.len(),
            metadata.defaults.len(),
            repo_id
        );

        for doc in metadata.modules {
            match doc.context.clone() {
                Some(context) => {
                    let item = self.finalize(doc, repo_id, context, true);
                    self.modules.push(item);
                }
                None => self.pending.push(PendingModule {
                    doc,
                    repo_id: repo_id.to_string(),
                }),
            }
        }

        for defaults in metadata.defaults {
            if let Some(stream) = defaults.stream {
                self.module_defaults.insert(defaults.module.clone(), stream);
            }
            if !defaults.profiles.is_empty() {
                let per_stream = self
                    .default_profiles
                    .entry(defaults.module.clone())
                    .or_default();
                for (stream, profiles) in defaults.profiles {
                    per_stream.insert(stream, profiles);
                }
            }
        }

        Ok(())
    }

    /// All known module records, deduplicating pending ones first
    pub fn get_modules(&mut self) -> &[Arc<ModuleItem>] {
        self.add_modules_without_static_context();
        &self.modules
    }

    /// Active module records, resolving on first call.
    ///
    /// The resolution result is memoized; use
    /// [`ModuleSack::invalidate_active_modules`] to force a recompute.
    pub fn get_active_modules(&mut self, system: &SystemState) -> Vec<Arc<ModuleItem>> {
        if self.get_modules().is_empty() {
            return Vec::new();
        }
        if !self.active_modules_resolved {
            self.resolve_active_module_items(system);
        }
        self.active_modules.values().cloned().collect()
    }

    /// Whether a record was selected by the last activation resolution
    pub fn is_active(&self, item: &ModuleItem) -> bool {
        self.active_modules.contains_key(&item.solvable_id())
    }

    /// Clear the memoized activation result
    pub fn invalidate_active_modules(&mut self) {
        self.active_modules_resolved = false;
    }

    /// Default stream for a module name, if the catalog declares one
    pub fn default_stream(&self, name: &str) -> Option<&str> {
        self.module_defaults.get(name).map(String::as_str)
    }

    /// Default profiles for a module stream; empty when undeclared
    pub fn default_profiles(&self, name: &str, stream: &str) -> &[String] {
        self.default_profiles
            .get(name)
            .and_then(|per_stream| per_stream.get(stream))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Derive the candidate list from persisted state and resolve it.
    ///
    /// Records of disabled names go straight to the exclusion set.
    /// Enabled names contribute only their enabled stream; names without
    /// an explicit enable contribute their default stream, if any.
    pub fn resolve_active_module_items(
        &mut self,
        system: &SystemState,
    ) -> (Vec<String>, ModuleErrorType) {
        self.add_modules_without_static_context();
        self.cache.reset_excludes(self.pool.nsolvables());

        let mut to_solve: Vec<Arc<ModuleItem>> = Vec::new();
        for item in &self.modules {
            let state = system.module_state(item.name()).unwrap_or_default();
            match state {
                ModuleState::Disabled => {
                    self.cache.add_exclude(item.solvable_id());
                }
                ModuleState::Enabled => {
                    if system.module_enabled_stream(item.name()) == Some(item.stream()) {
                        to_solve.push(item.clone());
                    }
                }
                ModuleState::Available => {
                    if self.module_defaults.get(item.name()).map(String::as_str)
                        == Some(item.stream())
                    {
                        to_solve.push(item.clone());
                    }
                }
            }
        }

        let result = self.module_solve(&to_solve, system);
        self.active_modules_resolved = true;
        result
    }

    /// Run the four-tier cascading resolution over the candidate set.
    ///
    /// Tier order is strict, best, good, weak; the first tier to resolve
    /// wins and rebuilds the activation set. Before the weak tier, every
    /// module the good tier reported as mutually conflicting is added to
    /// the exclusion set, otherwise one of them could end up active.
    fn module_solve(
        &mut self,
        items: &[Arc<ModuleItem>],
        system: &SystemState,
    ) -> (Vec<String>, ModuleErrorType) {
        let mut problems: Vec<String> = Vec::new();
        if items.is_empty() {
            self.active_modules.clear();
            return (problems, ModuleErrorType::NoError);
        }

        self.cache.make_provides_ready(&mut self.pool);
        self.cache.recompute_considered(&mut self.pool);

        // Require both enabled and default module streams, latest versions
        let mut goal_strict = Goal::new();
        // Require only enabled module streams, latest versions
        let mut goal_best = Goal::new();
        // Require only enabled module streams
        let mut goal_good = Goal::new();
        // No strict requirements
        let mut goal_weak = Goal::new();

        for item in items {
            let dep = self
                .pool
                .str2dep(&format!("module({})", item.name_stream()));
            let enabled = matches!(
                system.module_state(item.name()).unwrap_or_default(),
                ModuleState::Enabled
            );

            goal_strict.add_provide_install(dep, true, true);
            goal_weak.add_provide_install(dep, false, false);
            if enabled {
                goal_best.add_provide_install(dep, true, true);
                goal_good.add_provide_install(dep, true, false);
            } else {
                goal_best.add_provide_install(dep, false, true);
                goal_good.add_provide_install(dep, false, false);
            }
        }

        log::debug!("resolving activation for {} module candidates", items.len());

        if goal_strict.resolve(&self.pool) {
            self.set_active_modules(&goal_strict);
            return (problems, ModuleErrorType::NoError);
        }
        problems.extend(goal_strict.problems().iter().cloned());

        log::debug!("strict goal failed, relaxing default streams");
        if goal_best.resolve(&self.pool) {
            self.set_active_modules(&goal_best);
            log::warn!("module defaults could not all be activated");
            return (problems, ModuleErrorType::ErrorInDefaults);
        }

        log::debug!("best goal failed, relaxing latest-version preference");
        if goal_good.resolve(&self.pool) {
            self.set_active_modules(&goal_good);
            log::warn!("latest module versions could not all be activated");
            return (problems, ModuleErrorType::ErrorInLatest);
        }
        problems.extend(goal_good.problems().iter().cloned());

        // Conflicting modules have to be excluded, otherwise one of them
        // could end up active in the weak tier.
        for &id in goal_good.list_conflicting() {
            log::debug!("excluding conflicting module {}", self.pool.solvable(id).name());
            self.cache.add_exclude(id);
        }
        self.cache.recompute_considered(&mut self.pool);

        if goal_weak.resolve(&self.pool) {
            self.set_active_modules(&goal_weak);
            log::warn!("module activation degraded to best effort");
            return (problems, ModuleErrorType::Error);
        }

        log::error!("modular dependency resolution failed; no module streams can be activated");
        self.active_modules.clear();
        (problems, ModuleErrorType::CannotResolveModules)
    }

    /// Rebuild the activation set from a winning goal: exactly the
    /// catalog records whose identity matches an installed solvable name.
    fn set_active_modules(&mut self, goal: &Goal) {
        self.active_modules.clear();

        let installed: HashSet<String> = goal
            .list_installs()
            .iter()
            .map(|&id| self.pool.solvable(id).name().to_string())
            .collect();

        for item in &self.modules {
            if installed.contains(&item.name_stream_context()) {
                self.active_modules.insert(item.solvable_id(), item.clone());
            }
        }
    }

    /// Static-context deduplication.
    ///
    /// Context-bearing records are indexed by "name:stream" and
    /// dependency signature; a context-less record with a matching
    /// signature adopts the representative's context, otherwise its own
    /// signature becomes the context ("NoRequires" when empty) and it
    /// registers as representative for records that follow. No-op when
    /// nothing is pending.
    fn add_modules_without_static_context(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        // "name:stream" -> dependency signature -> representative context
        let mut static_context_map: HashMap<String, HashMap<String, String>> = HashMap::new();
        for item in &self.modules {
            static_context_map
                .entry(item.name_stream())
                .or_default()
                .entry(item.dependencies_string().to_string())
                .or_insert_with(|| item.context().to_string());
        }

        let pending = std::mem::take(&mut self.pending);
        for PendingModule { doc, repo_id } in pending {
            let signature = dependencies_string(&doc.requires);
            let name_stream = format!("{}:{}", doc.name, doc.stream);

            let by_signature = static_context_map.entry(name_stream).or_default();
            let context = match by_signature.get(&signature) {
                Some(context) => context.clone(),
                None => {
                    let context = if signature.is_empty() {
                        "NoRequires".to_string()
                    } else {
                        signature.clone()
                    };
                    by_signature.insert(signature, context.clone());
                    context
                }
            };

            let item = self.finalize(doc, &repo_id, context, false);
            self.modules.push(item);
        }
    }

    /// Build the immutable record and register its solvable and
    /// dependency edges with the pool, exactly once per record.
    fn finalize(
        &mut self,
        doc: ModuleDoc,
        repo_id: &str,
        context: String,
        static_context: bool,
    ) -> Arc<ModuleItem> {
        let requires_string = dependencies_string(&doc.requires);
        let full_name = format!("{}:{}:{}", doc.name, doc.stream, context);

        let provides = vec![
            self.pool.str2dep(&format!("module({})", doc.name)),
            self.pool
                .str2dep(&format!("module({}:{})", doc.name, doc.stream)),
        ];
        let requires = doc
            .requires
            .iter()
            .map(|(dep_name, streams)| {
                if streams.is_empty() {
                    vec![self.pool.str2dep(&format!("module({})", dep_name))]
                } else {
                    streams
                        .iter()
                        .map(|stream| {
                            self.pool
                                .str2dep(&format!("module({}:{})", dep_name, stream))
                        })
                        .collect()
                }
            })
            .collect();

        let repo = self.pool.find_or_create_repo(repo_id);
        let solvable_id = self.pool.add_solvable(
            repo,
            full_name,
            doc.name.clone(),
            doc.version,
            doc.arch.clone(),
            provides,
            requires,
        );
        self.cache.invalidate_provides();

        Arc::new(ModuleItem::new(
            doc.name,
            doc.stream,
            doc.version,
            context,
            static_context,
            doc.arch,
            doc.requires,
            requires_string,
            doc.artifacts,
            doc.profiles,
            repo_id.to_string(),
            solvable_id,
        ))
    }
}
