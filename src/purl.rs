//! Package URL synthesis: converts a package's ecosystem-specific metadata
//! into a normalized purl, applying per-ecosystem normalization rules.

use std::collections::BTreeMap;
use std::fmt;

use crate::inventory::package::{Metadata, Package};

pub const TYPE_PYPI: &str = "pypi";
pub const TYPE_MAVEN: &str = "maven";
pub const TYPE_NPM: &str = "npm";
pub const TYPE_GOLANG: &str = "golang";
pub const TYPE_CARGO: &str = "cargo";
pub const TYPE_GEM: &str = "gem";
pub const TYPE_NUGET: &str = "nuget";
pub const TYPE_COMPOSER: &str = "composer";
pub const TYPE_CRAN: &str = "cran";
pub const TYPE_HACKAGE: &str = "hackage";
pub const TYPE_HEX: &str = "hex";
pub const TYPE_PUB: &str = "pub";
pub const TYPE_CONAN: &str = "conan";
pub const TYPE_OPAM: &str = "opam";
pub const TYPE_DEBIAN: &str = "deb";
pub const TYPE_OPKG: &str = "opkg";
pub const TYPE_FLATPAK: &str = "flatpak";
pub const TYPE_APK: &str = "apk";
pub const TYPE_RPM: &str = "rpm";
pub const TYPE_SNAP: &str = "snap";
pub const TYPE_PACMAN: &str = "pacman";
pub const TYPE_PORTAGE: &str = "portage";
pub const TYPE_NIX: &str = "nix";
pub const TYPE_WINDOWS: &str = "windows";
pub const TYPE_GENERIC: &str = "generic";

pub const QUALIFIER_DISTRO: &str = "distro";
pub const QUALIFIER_CLASSIFIER: &str = "classifier";
pub const QUALIFIER_TYPE: &str = "type";
pub const QUALIFIER_PROVENANCE: &str = "provenance";
pub const QUALIFIER_BUILD_NUMBER: &str = "buildnumber";

/// A normalized Package URL. Immutable once built; equality is structural.
/// Two packages with equal purls denote the same software unit for SBOM
/// purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageURL {
    purl_type: String,
    namespace: String,
    name: String,
    version: String,
    qualifiers: BTreeMap<String, String>,
    subpath: String,
}

impl PackageURL {
    pub fn new(purl_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            purl_type: purl_type.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.insert(key.into(), value.into());
        self
    }

    pub fn with_subpath(mut self, subpath: impl Into<String>) -> Self {
        self.subpath = subpath.into();
        self
    }

    pub fn purl_type(&self) -> &str {
        &self.purl_type
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn qualifiers(&self) -> &BTreeMap<String, String> {
        &self.qualifiers
    }

    pub fn subpath(&self) -> &str {
        &self.subpath
    }
}

/// Renders the canonical `pkg:` string form. Qualifiers are emitted in key
/// order, which the purl spec requires for canonical output.
impl fmt::Display for PackageURL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg:{}", self.purl_type)?;
        if !self.namespace.is_empty() {
            write!(f, "/{}", encode_segments(&self.namespace))?;
        }
        write!(f, "/{}", urlencoding::encode(&self.name))?;
        if !self.version.is_empty() {
            write!(f, "@{}", urlencoding::encode(&self.version))?;
        }
        if !self.qualifiers.is_empty() {
            let query: Vec<String> = self
                .qualifiers
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            write!(f, "?{}", query.join("&"))?;
        }
        if !self.subpath.is_empty() {
            write!(f, "#{}", encode_segments(&self.subpath))?;
        }
        Ok(())
    }
}

fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Computes the canonical purl for a package.
///
/// Packages with an empty `purl_type` make no identity claim and yield
/// `None`. SBOM-sourced metadata shapes carry a pre-built purl that wins
/// over any type-based synthesis, so re-exported packages keep their
/// original identity even when its type differs from the nominal
/// `purl_type`. Every builder is a pure function of the package's fields.
pub fn synthesize(pkg: &Package) -> Option<PackageURL> {
    if pkg.purl_type.is_empty() {
        return None;
    }
    match &pkg.metadata {
        Some(Metadata::SpdxDocument(sbom)) | Some(Metadata::CycloneDxDocument(sbom)) => {
            return sbom.purl.clone();
        }
        _ => {}
    }
    let purl = match pkg.purl_type.as_str() {
        TYPE_PYPI => PackageURL::new(TYPE_PYPI, normalize_pypi_name(&pkg.name))
            .with_version(pkg.version.clone()),
        TYPE_MAVEN => maven_purl(pkg),
        TYPE_NPM => npm_purl(pkg),
        TYPE_GOLANG => golang_purl(pkg),
        TYPE_HEX => PackageURL::new(TYPE_HEX, pkg.name.to_lowercase())
            .with_version(pkg.version.clone()),
        TYPE_DEBIAN | TYPE_OPKG | TYPE_FLATPAK | TYPE_APK | TYPE_RPM | TYPE_SNAP | TYPE_PACMAN
        | TYPE_PORTAGE | TYPE_NIX => os_purl(pkg),
        TYPE_WINDOWS => windows_purl(pkg),
        // No special-case builder: take the fields verbatim.
        _ => PackageURL::new(pkg.purl_type.clone(), pkg.name.clone())
            .with_version(pkg.version.clone()),
    };
    Some(purl)
}

/// PEP 503 name normalization: lowercase, with runs of `-`, `_` and `.`
/// collapsed into a single `-`. Idempotent.
fn normalize_pypi_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator_run = false;
    for c in name.chars() {
        if c == '-' || c == '_' || c == '.' {
            in_separator_run = true;
            continue;
        }
        if in_separator_run {
            out.push('-');
            in_separator_run = false;
        }
        out.extend(c.to_lowercase());
    }
    if in_separator_run {
        out.push('-');
    }
    out
}

fn maven_purl(pkg: &Package) -> PackageURL {
    let (group_id, artifact_id, classifier, packaging_type) = match &pkg.metadata {
        Some(Metadata::JavaArchive(meta)) => {
            (meta.group_id.as_str(), meta.artifact_id.as_str(), None, None)
        }
        Some(Metadata::JavaLockfile(meta)) => (
            meta.group_id.as_str(),
            meta.artifact_id.as_str(),
            meta.classifier.as_deref(),
            meta.packaging_type.as_deref(),
        ),
        // No Java metadata: fall back to the "group:artifact" name form.
        _ => match pkg.name.split_once(':') {
            Some((group, artifact)) => (group, artifact, None, None),
            None => ("", pkg.name.as_str(), None, None),
        },
    };
    let mut purl = PackageURL::new(TYPE_MAVEN, artifact_id.to_lowercase())
        .with_namespace(group_id.to_lowercase())
        .with_version(pkg.version.clone());
    if let Some(classifier) = classifier {
        purl = purl.with_qualifier(QUALIFIER_CLASSIFIER, classifier);
    }
    if let Some(packaging_type) = packaging_type {
        purl = purl.with_qualifier(QUALIFIER_TYPE, packaging_type);
    }
    purl
}

/// npm names keep their case; scoped names keep the `@scope/` prefix in the
/// name field and rely on percent-encoding at render time.
fn npm_purl(pkg: &Package) -> PackageURL {
    let mut purl = PackageURL::new(TYPE_NPM, pkg.name.clone()).with_version(pkg.version.clone());
    if let Some(Metadata::JavascriptPackage(meta)) = &pkg.metadata {
        if let Some(provenance) = meta.provenance {
            purl = purl.with_qualifier(QUALIFIER_PROVENANCE, provenance.as_str());
        }
    }
    purl
}

/// Go module paths split on the last path segment: `host/org/repo` becomes
/// namespace `host/org` and name `repo`, both lowercased.
fn golang_purl(pkg: &Package) -> PackageURL {
    let lowered = pkg.name.to_lowercase();
    match lowered.rsplit_once('/') {
        Some((namespace, name)) => PackageURL::new(TYPE_GOLANG, name)
            .with_namespace(namespace)
            .with_version(pkg.version.clone()),
        None => PackageURL::new(TYPE_GOLANG, lowered).with_version(pkg.version.clone()),
    }
}

/// OS package-manager families: the namespace is the lowercase OS id with
/// `linux` as the fallback, and the `distro` qualifier carries the release
/// codename when the metadata has one (version id otherwise).
fn os_purl(pkg: &Package) -> PackageURL {
    let meta = match &pkg.metadata {
        Some(Metadata::OsPackage(meta)) => Some(meta),
        _ => None,
    };
    let namespace = meta
        .and_then(|m| m.os_id.as_deref())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "linux".to_string());
    let mut purl = PackageURL::new(pkg.purl_type.clone(), pkg.name.clone())
        .with_namespace(namespace)
        .with_version(pkg.version.clone());
    if let Some(meta) = meta {
        if let Some(distro) = meta.os_version_codename.as_deref().or(meta.os_version_id.as_deref())
        {
            purl = purl.with_qualifier(QUALIFIER_DISTRO, distro);
        }
    }
    purl
}

fn windows_purl(pkg: &Package) -> PackageURL {
    let mut purl = PackageURL::new(TYPE_WINDOWS, pkg.name.clone())
        .with_namespace("microsoft")
        .with_version(pkg.version.clone());
    if let Some(Metadata::WindowsOsVersion(meta)) = &pkg.metadata {
        if let Some(build_number) = &meta.build_number {
            purl = purl.with_qualifier(QUALIFIER_BUILD_NUMBER, build_number);
        }
    }
    purl
}
