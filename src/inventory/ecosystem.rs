use std::fmt;
use std::str::FromStr;

use crate::inventory::package::{Metadata, OsPackageMetadata, Package};
use crate::purl;
use crate::shared::InventoryError;

/// The fixed registry of OSV ecosystem names this crate recognizes.
///
/// The `name()` strings are the exact spellings used by the OSV schema and
/// must not be altered; downstream matchers compare them byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsvEcosystem {
    AlmaLinux,
    Alpine,
    Chainguard,
    ConanCenter,
    Cran,
    CratesIo,
    Debian,
    Go,
    Hackage,
    Hex,
    Linux,
    Mageia,
    Maven,
    Npm,
    NuGet,
    Opam,
    OpenSuse,
    Packagist,
    Pub,
    PyPI,
    RedHat,
    RockyLinux,
    RubyGems,
    Suse,
    Ubuntu,
    Wolfi,
}

impl OsvEcosystem {
    /// The canonical OSV schema spelling.
    pub fn name(&self) -> &'static str {
        match self {
            OsvEcosystem::AlmaLinux => "AlmaLinux",
            OsvEcosystem::Alpine => "Alpine",
            OsvEcosystem::Chainguard => "Chainguard",
            OsvEcosystem::ConanCenter => "ConanCenter",
            OsvEcosystem::Cran => "CRAN",
            OsvEcosystem::CratesIo => "crates.io",
            OsvEcosystem::Debian => "Debian",
            OsvEcosystem::Go => "Go",
            OsvEcosystem::Hackage => "Hackage",
            OsvEcosystem::Hex => "Hex",
            OsvEcosystem::Linux => "Linux",
            OsvEcosystem::Mageia => "Mageia",
            OsvEcosystem::Maven => "Maven",
            OsvEcosystem::Npm => "npm",
            OsvEcosystem::NuGet => "NuGet",
            OsvEcosystem::Opam => "opam",
            OsvEcosystem::OpenSuse => "openSUSE",
            OsvEcosystem::Packagist => "Packagist",
            OsvEcosystem::Pub => "Pub",
            OsvEcosystem::PyPI => "PyPI",
            OsvEcosystem::RedHat => "Red Hat",
            OsvEcosystem::RockyLinux => "Rocky Linux",
            OsvEcosystem::RubyGems => "RubyGems",
            OsvEcosystem::Suse => "SUSE",
            OsvEcosystem::Ubuntu => "Ubuntu",
            OsvEcosystem::Wolfi => "Wolfi",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        const ALL: &[OsvEcosystem] = &[
            OsvEcosystem::AlmaLinux,
            OsvEcosystem::Alpine,
            OsvEcosystem::Chainguard,
            OsvEcosystem::ConanCenter,
            OsvEcosystem::Cran,
            OsvEcosystem::CratesIo,
            OsvEcosystem::Debian,
            OsvEcosystem::Go,
            OsvEcosystem::Hackage,
            OsvEcosystem::Hex,
            OsvEcosystem::Linux,
            OsvEcosystem::Mageia,
            OsvEcosystem::Maven,
            OsvEcosystem::Npm,
            OsvEcosystem::NuGet,
            OsvEcosystem::Opam,
            OsvEcosystem::OpenSuse,
            OsvEcosystem::Packagist,
            OsvEcosystem::Pub,
            OsvEcosystem::PyPI,
            OsvEcosystem::RedHat,
            OsvEcosystem::RockyLinux,
            OsvEcosystem::RubyGems,
            OsvEcosystem::Suse,
            OsvEcosystem::Ubuntu,
            OsvEcosystem::Wolfi,
        ];
        ALL.iter().copied().find(|e| e.name() == name)
    }
}

impl fmt::Display for OsvEcosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A parsed ecosystem tag plus free-text suffix, e.g. `Debian` + `"12"` or
/// `Red Hat` + `"8.4::appstream"`.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub ecosystem: OsvEcosystem,
    pub suffix: String,
}

impl Parsed {
    pub fn new(ecosystem: OsvEcosystem) -> Self {
        Self {
            ecosystem,
            suffix: String::new(),
        }
    }

    pub fn with_suffix(ecosystem: OsvEcosystem, suffix: impl Into<String>) -> Self {
        Self {
            ecosystem,
            suffix: suffix.into(),
        }
    }
}

/// Suffix-fuzzy equality: two values with differing suffixes still compare
/// equal when at least one suffix is empty. A suffix-less value is assumed
/// compatible with any concrete release of the same ecosystem, so
/// `Debian == Debian:12` but `Debian:11 != Debian:12`. This intentionally
/// makes equality non-transitive, which is why there is no `Eq` or `Hash`
/// implementation.
impl PartialEq for Parsed {
    fn eq(&self, other: &Self) -> bool {
        self.ecosystem == other.ecosystem
            && (self.suffix == other.suffix || self.suffix.is_empty() || other.suffix.is_empty())
    }
}

impl fmt::Display for Parsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.suffix.is_empty() {
            write!(f, "{}", self.ecosystem)
        } else {
            write!(f, "{}:{}", self.ecosystem, self.suffix)
        }
    }
}

/// Parses a `"Name"` or `"Name:Suffix"` ecosystem string, splitting on the
/// first colon. The name part must belong to the fixed registry; anything
/// else is a validation failure for the caller to handle.
impl FromStr for Parsed {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InventoryError::EmptyEcosystem);
        }
        let (name, suffix) = match s.split_once(':') {
            Some((name, suffix)) => (name, suffix),
            None => (s, ""),
        };
        let ecosystem = OsvEcosystem::from_name(name).ok_or_else(|| {
            InventoryError::UnknownEcosystem {
                name: name.to_string(),
            }
        })?;
        Ok(Parsed::with_suffix(ecosystem, suffix))
    }
}

/// Classifies a package into its OSV ecosystem.
///
/// Language PURL types map to a static tag; the OS package-manager families
/// read distro fields out of the metadata instead. Unrecognized types and
/// metadata shape mismatches fall through to `None` ("ecosystem unknown"),
/// never an error.
pub fn classify(pkg: &Package) -> Option<Parsed> {
    match pkg.purl_type.as_str() {
        purl::TYPE_PYPI => Some(Parsed::new(OsvEcosystem::PyPI)),
        purl::TYPE_MAVEN => Some(Parsed::new(OsvEcosystem::Maven)),
        purl::TYPE_NPM => Some(Parsed::new(OsvEcosystem::Npm)),
        purl::TYPE_GOLANG => Some(Parsed::new(OsvEcosystem::Go)),
        purl::TYPE_CARGO => Some(Parsed::new(OsvEcosystem::CratesIo)),
        purl::TYPE_GEM => Some(Parsed::new(OsvEcosystem::RubyGems)),
        purl::TYPE_NUGET => Some(Parsed::new(OsvEcosystem::NuGet)),
        purl::TYPE_COMPOSER => Some(Parsed::new(OsvEcosystem::Packagist)),
        purl::TYPE_CRAN => Some(Parsed::new(OsvEcosystem::Cran)),
        purl::TYPE_HACKAGE => Some(Parsed::new(OsvEcosystem::Hackage)),
        purl::TYPE_HEX => Some(Parsed::new(OsvEcosystem::Hex)),
        purl::TYPE_PUB => Some(Parsed::new(OsvEcosystem::Pub)),
        purl::TYPE_CONAN => Some(Parsed::new(OsvEcosystem::ConanCenter)),
        purl::TYPE_OPAM => Some(Parsed::new(OsvEcosystem::Opam)),
        purl::TYPE_DEBIAN | purl::TYPE_OPKG => classify_debian_family(os_metadata(pkg)?),
        purl::TYPE_APK => classify_alpine(os_metadata(pkg)?),
        purl::TYPE_RPM => classify_rpm_family(os_metadata(pkg)?),
        _ => None,
    }
}

fn os_metadata(pkg: &Package) -> Option<&OsPackageMetadata> {
    match &pkg.metadata {
        Some(Metadata::OsPackage(meta)) => Some(meta),
        _ => None,
    }
}

fn classify_debian_family(meta: &OsPackageMetadata) -> Option<Parsed> {
    let ecosystem = match meta.os_id.as_deref() {
        Some("debian") => OsvEcosystem::Debian,
        Some("ubuntu") => OsvEcosystem::Ubuntu,
        _ => return Some(Parsed::new(OsvEcosystem::Linux)),
    };
    match &meta.os_version_id {
        Some(version) => Some(Parsed::with_suffix(ecosystem, version.clone())),
        None => Some(Parsed::new(ecosystem)),
    }
}

/// Alpine advisories are keyed on `v<major>.<minor>`, so longer version
/// strings are trimmed to their first two components.
fn classify_alpine(meta: &OsPackageMetadata) -> Option<Parsed> {
    match &meta.os_version_id {
        Some(version) => {
            let trimmed: Vec<&str> = version.split('.').take(2).collect();
            Some(Parsed::with_suffix(
                OsvEcosystem::Alpine,
                format!("v{}", trimmed.join(".")),
            ))
        }
        None => Some(Parsed::new(OsvEcosystem::Alpine)),
    }
}

fn classify_rpm_family(meta: &OsPackageMetadata) -> Option<Parsed> {
    let ecosystem = match meta.os_id.as_deref() {
        Some("rhel") => OsvEcosystem::RedHat,
        Some("rocky") => OsvEcosystem::RockyLinux,
        Some("almalinux") => OsvEcosystem::AlmaLinux,
        Some("opensuse") | Some("opensuse-leap") | Some("opensuse-tumbleweed") => {
            OsvEcosystem::OpenSuse
        }
        Some("sles") => OsvEcosystem::Suse,
        Some("mageia") => OsvEcosystem::Mageia,
        _ => return Some(Parsed::new(OsvEcosystem::Linux)),
    };
    match &meta.os_version_id {
        Some(version) => Some(Parsed::with_suffix(ecosystem, version.clone())),
        None => Some(Parsed::new(ecosystem)),
    }
}
