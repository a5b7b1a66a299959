/// Inventory domain model: the canonical package record, ecosystem
/// classification, and the scan-result wrapper consumed by the exporters.
pub mod ecosystem;
pub mod package;

pub use ecosystem::{OsvEcosystem, Parsed};
pub use package::{
    Annotation, JavaArchiveMetadata, JavaLockfileMetadata, JavascriptPackageMetadata,
    LayerDetails, Metadata, NpmProvenance, OsPackageMetadata, Package, PythonArchiveMetadata,
    SbomReference, SourceCodeIdentifier, WindowsOsVersionMetadata,
};

/// The aggregated set of packages produced by a scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub packages: Vec<Package>,
}

/// A completed scan, as handed to the SBOM exporters. Extractor plugins and
/// the scanning orchestrator live upstream; by the time a `ScanResult`
/// reaches this crate its packages are final.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    pub inventory: Inventory,
}

impl ScanResult {
    pub fn with_packages(packages: Vec<Package>) -> Self {
        Self {
            inventory: Inventory { packages },
        }
    }
}
