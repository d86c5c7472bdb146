//! Modular package filtering
//!
//! Turns the active/inactive module partition into package-level include
//! and exclude sets on the package universe. Artifacts of active modules
//! must never be filtered out by a same-name or same-provide collision
//! with an inactive module, so every exclusion query subtracts the
//! include query before it is committed.

use modra_nevra::Nevra;

use crate::repo::{RepoRegistry, COMMANDLINE_REPO_ID, SYSTEM_REPO_ID};
use crate::rpm::{PackageQuery, PackageSack};
use crate::system::SystemState;

use super::ModuleSack;

#[derive(Debug, Default)]
struct FilterData {
    include_nevras: Vec<String>,
    exclude_nevras: Vec<String>,
    /// Binary package names from active-module artifacts
    names: Vec<String>,
    /// Source package names from active-module artifacts
    src_names: Vec<String>,
    /// Provide names derived from the binary artifact names
    provide_names: Vec<String>,
}

impl ModuleSack {
    /// Apply modular filtering to the package universe.
    ///
    /// Runs activation resolution first if it has not run yet, then
    /// commits the exclude, exclude-provides and exclude-names results
    /// to the universe's module-exclude accumulator, in that order.
    pub fn apply_filtering(
        &mut self,
        system: &SystemState,
        packages: &mut PackageSack,
        repos: &RepoRegistry,
    ) {
        if !self.active_modules_resolved {
            self.resolve_active_module_items(system);
        }

        let data = self.collect_data_for_modular_filtering();

        // Packages from the system, command-line and module-hotfix
        // repositories are not targets for modular filtering.
        let mut keep_repo_ids = vec![SYSTEM_REPO_ID.to_string(), COMMANDLINE_REPO_ID.to_string()];
        keep_repo_ids.extend(repos.enabled_hotfix_ids());

        let mut target = PackageQuery::new(packages);
        target.filter_repo_id_not_in(packages, &keep_repo_ids);

        let mut include = PackageQuery::new(packages);
        include.filter_nevra(packages, &data.include_nevras);

        // Everything from inactive modules is filtered out, except
        // packages also reachable through an active module.
        let mut exclude = target.clone();
        exclude
            .filter_nevra(packages, &data.exclude_nevras)
            .difference(&include);

        // Exclude by provides to disable obsoletes against active-module
        // names; again keep active-module artifacts visible.
        let mut exclude_provides = target.clone();
        exclude_provides
            .filter_provides(packages, &data.provide_names)
            .difference(&include);

        // Source packages provide nothing; handling them separately
        // keeps same-named binary packages outside the module visible.
        let mut exclude_src_names = target.clone();
        exclude_src_names
            .filter_name(packages, &data.src_names)
            .filter_arch(packages, &["src", "nosrc"]);

        let mut exclude_names = target;
        exclude_names
            .filter_name(packages, &data.names)
            .update(&exclude_src_names)
            .difference(&include);

        log::debug!(
            "modular filtering: {} excluded by NEVRA, {} by provides, {} by name",
            exclude.len(),
            exclude_provides.len(),
            exclude_names.len()
        );

        packages.set_module_excludes(&exclude);
        packages.add_module_excludes(&exclude_provides);
        packages.add_module_excludes(&exclude_names);
    }

    /// Partition artifact NEVRAs by module activity and split the active
    /// ones into binary and source name lists.
    fn collect_data_for_modular_filtering(&mut self) -> FilterData {
        self.add_modules_without_static_context();

        let mut data = FilterData::default();
        for item in &self.modules {
            let artifacts = item.artifacts();
            if self.is_active(item) {
                for artifact in artifacts {
                    match Nevra::parse(artifact) {
                        Ok(nevra) => {
                            if nevra.is_source() {
                                data.src_names.push(nevra.name().to_string());
                            } else {
                                data.names.push(nevra.name().to_string());
                                data.provide_names.push(nevra.name().to_string());
                            }
                        }
                        Err(err) => {
                            log::warn!("skipping unparsable artifact \"{}\": {}", artifact, err);
                        }
                    }
                }
                data.include_nevras.extend(artifacts.iter().cloned());
            } else {
                data.exclude_nevras.extend(artifacts.iter().cloned());
            }
        }
        data
    }
}
