//! Package universe

use std::collections::HashSet;

use super::query::PackageQuery;

/// Index of a package within its sack
pub type PackageId = usize;

/// A binary or source package in the universe
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub epoch: u32,
    pub version: String,
    pub release: String,
    pub arch: String,
    /// Id of the repository the package originates from
    pub repo_id: String,
    /// Explicit provides; a provide may carry a version suffix
    /// ("webserver = 1.0") which is ignored by name matching
    pub provides: Vec<String>,
}

impl Package {
    pub fn new(name: &str, version: &str, release: &str, arch: &str, repo_id: &str) -> Self {
        Self {
            name: name.to_string(),
            epoch: 0,
            version: version.to_string(),
            release: release.to_string(),
            arch: arch.to_string(),
            repo_id: repo_id.to_string(),
            provides: Vec::new(),
        }
    }

    pub fn with_epoch(mut self, epoch: u32) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn with_provide(mut self, provide: &str) -> Self {
        self.provides.push(provide.to_string());
        self
    }

    /// Full NEVRA string; the epoch is printed only when non-zero
    pub fn nevra(&self) -> String {
        if self.epoch != 0 {
            format!(
                "{}-{}:{}-{}.{}",
                self.name, self.epoch, self.version, self.release, self.arch
            )
        } else {
            format!("{}-{}-{}.{}", self.name, self.version, self.release, self.arch)
        }
    }

    pub fn is_source(&self) -> bool {
        self.arch == "src" || self.arch == "nosrc"
    }
}

/// The package universe plus the module-exclude accumulator the modular
/// filter commits its results to.
#[derive(Debug, Default)]
pub struct PackageSack {
    packages: Vec<Package>,
    module_excludes: HashSet<PackageId>,
}

impl PackageSack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_package(&mut self, package: Package) -> PackageId {
        self.packages.push(package);
        self.packages.len() - 1
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id]
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages.iter().enumerate()
    }

    /// Replace the module-exclude set with the query result
    pub fn set_module_excludes(&mut self, query: &PackageQuery) {
        self.module_excludes = query.ids().iter().copied().collect();
    }

    /// Union the query result into the module-exclude set
    pub fn add_module_excludes(&mut self, query: &PackageQuery) {
        self.module_excludes.extend(query.ids().iter().copied());
    }

    pub fn module_excludes(&self) -> &HashSet<PackageId> {
        &self.module_excludes
    }

    pub fn is_module_excluded(&self, id: PackageId) -> bool {
        self.module_excludes.contains(&id)
    }

    /// Packages that survive modular filtering
    pub fn visible(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages()
            .filter(|(id, _)| !self.module_excludes.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nevra_formatting() {
        let package = Package::new("foo", "1.0", "1", "x86_64", "rawhide");
        assert_eq!(package.nevra(), "foo-1.0-1.x86_64");

        let with_epoch = Package::new("bash", "5.2", "3.fc38", "aarch64", "rawhide").with_epoch(5);
        assert_eq!(with_epoch.nevra(), "bash-5:5.2-3.fc38.aarch64");
    }

    #[test]
    fn test_is_source() {
        assert!(Package::new("foo", "1.0", "1", "src", "r").is_source());
        assert!(Package::new("foo", "1.0", "1", "nosrc", "r").is_source());
        assert!(!Package::new("foo", "1.0", "1", "noarch", "r").is_source());
    }

    #[test]
    fn test_module_excludes_replace_then_union() {
        let mut sack = PackageSack::new();
        let a = sack.add_package(Package::new("a", "1", "1", "x86_64", "r"));
        let b = sack.add_package(Package::new("b", "1", "1", "x86_64", "r"));
        let c = sack.add_package(Package::new("c", "1", "1", "x86_64", "r"));

        let mut first = PackageQuery::new(&sack);
        first.filter_name(&sack, &["a".to_string()]);
        sack.set_module_excludes(&first);
        assert!(sack.is_module_excluded(a));

        let mut second = PackageQuery::new(&sack);
        second.filter_name(&sack, &["b".to_string()]);
        sack.add_module_excludes(&second);
        assert!(sack.is_module_excluded(a));
        assert!(sack.is_module_excluded(b));
        assert!(!sack.is_module_excluded(c));

        // set replaces the accumulated result
        let mut third = PackageQuery::new(&sack);
        third.filter_name(&sack, &["c".to_string()]);
        sack.set_module_excludes(&third);
        assert!(!sack.is_module_excluded(a));
        assert!(sack.is_module_excluded(c));

        let visible: Vec<&str> = sack.visible().map(|(_, p)| p.name.as_str()).collect();
        assert_eq!(visible, vec!["a", "b"]);
    }
}
