use crate::inventory::ecosystem::Parsed;
use crate::purl::PackageURL;

/// One discovered software unit, as reported by an extractor plugin.
///
/// `name` and `version` are human-readable identity and are not guaranteed
/// to be globally unique or canonical; the canonical identity is derived on
/// demand through [`Package::purl`]. A package with an empty `purl_type`
/// makes no identity claim at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    pub name: String,
    pub version: String,
    /// PURL type tag selecting the normalization rules that apply, e.g.
    /// `"pypi"`, `"maven"`, `"deb"`. Empty means "no identity".
    pub purl_type: String,
    /// Ecosystem-specific payload. At most one shape is populated per
    /// PURL-type family.
    pub metadata: Option<Metadata>,
    /// Filesystem paths or other sources where the unit was observed.
    /// May be empty, e.g. for units derived from runtime probing.
    pub locations: Vec<String>,
    /// Names of the plugins that produced this record. Attribution only,
    /// never part of the identity.
    pub plugins: Vec<String>,
    /// Raw license strings as found by the extractor, not yet normalized.
    pub licenses: Vec<String>,
    pub source_code: Option<SourceCodeIdentifier>,
    pub layer_details: Option<LayerDetails>,
    pub annotations: Vec<Annotation>,
}

impl Package {
    /// Computes the canonical Package URL for this package, or `None` when
    /// the package carries no usable identity.
    pub fn purl(&self) -> Option<PackageURL> {
        crate::purl::synthesize(self)
    }

    /// Classifies this package into an OSV ecosystem, or `None` when the
    /// PURL type is unrecognized or the metadata shape carries no distro
    /// information. "Unknown" is a legal state, not an error.
    pub fn ecosystem(&self) -> Option<Parsed> {
        crate::inventory::ecosystem::classify(self)
    }

    /// CPE identifiers carried alongside the package.
    ///
    /// Only the two SBOM-sourced metadata shapes can carry CPEs; every
    /// other shape yields an empty slice.
    pub fn cpes(&self) -> &[String] {
        match &self.metadata {
            Some(Metadata::SpdxDocument(sbom)) | Some(Metadata::CycloneDxDocument(sbom)) => {
                &sbom.cpes
            }
            _ => &[],
        }
    }
}

/// Ecosystem-specific metadata payloads.
///
/// This is a closed set: PURL synthesis and ecosystem classification match
/// exhaustively on it, so adding a shape forces every dispatch site to
/// decide how to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    PythonArchive(PythonArchiveMetadata),
    JavaArchive(JavaArchiveMetadata),
    JavaLockfile(JavaLockfileMetadata),
    JavascriptPackage(JavascriptPackageMetadata),
    OsPackage(OsPackageMetadata),
    /// Package sourced from an SPDX document; carries its own PURL.
    SpdxDocument(SbomReference),
    /// Package sourced from a CycloneDX document; carries its own PURL.
    CycloneDxDocument(SbomReference),
    WindowsOsVersion(WindowsOsVersionMetadata),
}

/// Metadata parsed out of a Python wheel or egg archive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PythonArchiveMetadata {
    pub author: Option<String>,
    pub author_email: Option<String>,
}

/// Metadata read from a Java archive manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JavaArchiveMetadata {
    pub group_id: String,
    pub artifact_id: String,
}

/// Metadata read from a Maven lockfile entry. Unlike archive metadata this
/// can carry the artifact classifier and packaging type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JavaLockfileMetadata {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: Option<String>,
    pub packaging_type: Option<String>,
}

/// Where an npm package was resolved from, when the lockfile records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpmProvenance {
    /// The public npm registry.
    NpmRegistry,
    /// A registry other than the public one.
    OtherRegistry,
    /// A local path or workspace link.
    Local,
}

impl NpmProvenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            NpmProvenance::NpmRegistry => "npm-registry",
            NpmProvenance::OtherRegistry => "other-registry",
            NpmProvenance::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JavascriptPackageMetadata {
    pub provenance: Option<NpmProvenance>,
}

/// Metadata shared by the OS package manager families (dpkg, apk, rpm,
/// pacman, portage, nix, flatpak, snap, opkg).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsPackageMetadata {
    /// Lowercase OS identifier from os-release, e.g. `"debian"`.
    pub os_id: Option<String>,
    /// Release codename from os-release, e.g. `"bookworm"`.
    pub os_version_codename: Option<String>,
    /// Release version from os-release, e.g. `"12"`.
    pub os_version_id: Option<String>,
}

/// Identity carried over from a package found inside an existing SBOM
/// document. The embedded PURL, when present, wins over any PURL-type
/// based synthesis so that re-exported packages keep their original
/// identity verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SbomReference {
    pub purl: Option<PackageURL>,
    pub cpes: Vec<String>,
}

/// Metadata for a Windows product discovered through OS version probing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowsOsVersionMetadata {
    pub product: String,
    pub build_number: Option<String>,
}

/// Repository and commit of a source-level package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceCodeIdentifier {
    pub repo: String,
    pub commit: String,
}

/// Attribution of a package to a container image layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerDetails {
    pub index: usize,
    pub diff_id: String,
    pub chain_id: String,
    pub command: String,
    pub in_base_image: bool,
}

/// Matching hints attached by annotator plugins. Never part of identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Unknown,
    Transitional,
    InsideOsPackage,
    InsideCacheDir,
}
