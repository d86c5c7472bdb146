//! Package queries
//!
//! A query is a set of package ids refined by successive filters. Set
//! difference and union between queries over the same sack compose the
//! modular-filtering exclusion sets.

use std::collections::BTreeSet;

use modra_nevra::Nevra;

use super::package::{PackageId, PackageSack};

/// A filterable set of packages from one sack
#[derive(Debug, Clone, Default)]
pub struct PackageQuery {
    ids: BTreeSet<PackageId>,
}

impl PackageQuery {
    /// Query over the whole universe
    pub fn new(sack: &PackageSack) -> Self {
        Self {
            ids: (0..sack.len()).collect(),
        }
    }

    pub fn ids(&self) -> &BTreeSet<PackageId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.ids.contains(&id)
    }

    /// Keep packages matching any of the given NEVRA strings.
    /// Unparsable inputs are skipped with a warning.
    pub fn filter_nevra(&mut self, sack: &PackageSack, nevras: &[String]) -> &mut Self {
        let parsed: Vec<Nevra> = nevras
            .iter()
            .filter_map(|text| match Nevra::parse(text) {
                Ok(nevra) => Some(nevra),
                Err(err) => {
                    log::warn!("skipping unparsable NEVRA \"{}\": {}", text, err);
                    None
                }
            })
            .collect();

        self.ids.retain(|&id| {
            let package = sack.package(id);
            parsed.iter().any(|nevra| {
                nevra.matches(
                    &package.name,
                    package.epoch,
                    &package.version,
                    &package.release,
                    &package.arch,
                )
            })
        });
        self
    }

    /// Keep packages whose name is in the list
    pub fn filter_name(&mut self, sack: &PackageSack, names: &[String]) -> &mut Self {
        self.ids
            .retain(|&id| names.iter().any(|name| sack.package(id).name == *name));
        self
    }

    /// Keep packages whose architecture is in the list
    pub fn filter_arch(&mut self, sack: &PackageSack, arches: &[&str]) -> &mut Self {
        self.ids
            .retain(|&id| arches.contains(&sack.package(id).arch.as_str()));
        self
    }

    /// Drop packages originating from any of the given repositories
    pub fn filter_repo_id_not_in(&mut self, sack: &PackageSack, repo_ids: &[String]) -> &mut Self {
        self.ids
            .retain(|&id| !repo_ids.iter().any(|repo| sack.package(id).repo_id == *repo));
        self
    }

    /// Keep packages providing any of the given names. A version suffix
    /// on a provide ("webserver = 1.0") is ignored.
    pub fn filter_provides(&mut self, sack: &PackageSack, names: &[String]) -> &mut Self {
        self.ids.retain(|&id| {
            sack.package(id).provides.iter().any(|provide| {
                let provide_name = provide.split_whitespace().next().unwrap_or(provide);
                names.iter().any(|name| provide_name == name)
            })
        });
        self
    }

    /// Remove every package also present in `other`
    pub fn difference(&mut self, other: &PackageQuery) -> &mut Self {
        self.ids.retain(|id| !other.ids.contains(id));
        self
    }

    /// Union with `other`
    pub fn update(&mut self, other: &PackageQuery) -> &mut Self {
        self.ids.extend(other.ids.iter().copied());
        self
    }
}
