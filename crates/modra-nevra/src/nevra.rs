//! NEVRA parsing and formatting

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Error type for NEVRA parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NevraError {
    #[error("Invalid NEVRA \"{0}\"")]
    InvalidNevra(String),
}

lazy_static! {
    // name-[epoch:]version-release.arch
    // The version and release cannot contain dashes, which makes the last
    // two dash-separated fields unambiguous even for dashed package names.
    static ref NEVRA_RE: Regex = Regex::new(
        r"^(?P<name>.+)-(?:(?P<epoch>\d+):)?(?P<version>[^-]+?)-(?P<release>[^-]+?)\.(?P<arch>[A-Za-z0-9_]+)$"
    ).unwrap();
}

/// A parsed name-epoch:version-release.arch package identifier.
///
/// The epoch is optional in the textual form; an absent epoch compares
/// equal to an explicit epoch of zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nevra {
    name: String,
    epoch: Option<u32>,
    version: String,
    release: String,
    arch: String,
}

impl Nevra {
    /// Parse a NEVRA string
    pub fn parse(input: &str) -> Result<Self, NevraError> {
        let captures = NEVRA_RE
            .captures(input)
            .ok_or_else(|| NevraError::InvalidNevra(input.to_string()))?;

        let epoch = match captures.name("epoch") {
            Some(m) => Some(
                m.as_str()
                    .parse::<u32>()
                    .map_err(|_| NevraError::InvalidNevra(input.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            name: captures["name"].to_string(),
            epoch,
            version: captures["version"].to_string(),
            release: captures["release"].to_string(),
            arch: captures["arch"].to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Epoch as written, if any
    pub fn epoch(&self) -> Option<u32> {
        self.epoch
    }

    /// Epoch with the RPM default of zero applied
    pub fn epoch_or_zero(&self) -> u32 {
        self.epoch.unwrap_or(0)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Whether this identifies a source or no-source package
    pub fn is_source(&self) -> bool {
        self.arch == "src" || self.arch == "nosrc"
    }

    /// Check field-wise equality against explicit package fields,
    /// treating an absent epoch as zero.
    pub fn matches(&self, name: &str, epoch: u32, version: &str, release: &str, arch: &str) -> bool {
        self.name == name
            && self.epoch_or_zero() == epoch
            && self.version == version
            && self.release == release
            && self.arch == arch
    }
}

impl std::fmt::Display for Nevra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.epoch {
            Some(epoch) => write!(
                f,
                "{}-{}:{}-{}.{}",
                self.name, epoch, self.version, self.release, self.arch
            ),
            None => write!(
                f,
                "{}-{}-{}.{}",
                self.name, self.version, self.release, self.arch
            ),
        }
    }
}

impl std::str::FromStr for Nevra {
    type Err = NevraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let nevra = Nevra::parse("foo-1.0-1.x86_64").unwrap();
        assert_eq!(nevra.name(), "foo");
        assert_eq!(nevra.epoch(), None);
        assert_eq!(nevra.version(), "1.0");
        assert_eq!(nevra.release(), "1");
        assert_eq!(nevra.arch(), "x86_64");
    }

    #[test]
    fn test_parse_with_epoch() {
        let nevra = Nevra::parse("bash-5:5.2.15-3.fc38.aarch64").unwrap();
        assert_eq!(nevra.name(), "bash");
        assert_eq!(nevra.epoch(), Some(5));
        assert_eq!(nevra.version(), "5.2.15");
        assert_eq!(nevra.release(), "3.fc38");
        assert_eq!(nevra.arch(), "aarch64");
    }

    #[test]
    fn test_parse_dashed_name() {
        let nevra = Nevra::parse("perl-DBD-MySQL-0:4.050-13.module_f38.x86_64").unwrap();
        assert_eq!(nevra.name(), "perl-DBD-MySQL");
        assert_eq!(nevra.epoch(), Some(0));
        assert_eq!(nevra.version(), "4.050");
        assert_eq!(nevra.release(), "13.module_f38");
    }

    #[test]
    fn test_parse_source() {
        let nevra = Nevra::parse("foo-1.0-1.src").unwrap();
        assert!(nevra.is_source());
        let nevra = Nevra::parse("foo-1.0-1.nosrc").unwrap();
        assert!(nevra.is_source());
        let nevra = Nevra::parse("foo-1.0-1.noarch").unwrap();
        assert!(!nevra.is_source());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Nevra::parse("").is_err());
        assert!(Nevra::parse("foo").is_err());
        assert!(Nevra::parse("foo-1.0").is_err());
        assert!(Nevra::parse("foo-1.0-1").is_err());
        assert!(Nevra::parse("foo-1.0.x86_64").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["foo-1.0-1.x86_64", "bash-5:5.2.15-3.fc38.aarch64"] {
            let nevra = Nevra::parse(input).unwrap();
            assert_eq!(nevra.to_string(), input);
        }
    }

    #[test]
    fn test_matches_defaults_epoch_to_zero() {
        let nevra = Nevra::parse("foo-1.0-1.x86_64").unwrap();
        assert!(nevra.matches("foo", 0, "1.0", "1", "x86_64"));
        assert!(!nevra.matches("foo", 2, "1.0", "1", "x86_64"));

        let with_epoch = Nevra::parse("foo-0:1.0-1.x86_64").unwrap();
        assert!(with_epoch.matches("foo", 0, "1.0", "1", "x86_64"));
    }
}
