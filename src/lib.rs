//! stocktake - software composition analysis core
//!
//! This library takes the heterogeneous package records produced by
//! extractor plugins (manifest parsers, lockfile parsers, binary probes,
//! SBOM readers), normalizes them into a canonical identity representation
//! (Package URL + OSV ecosystem), and exports the aggregated inventory as
//! SPDX 2.3 or CycloneDX documents.
//!
//! # Architecture
//!
//! - **Inventory** (`inventory`): the canonical [`Package`](inventory::Package)
//!   record, its closed metadata shapes, and ecosystem classification
//! - **PURL synthesis** (`purl`): per-ecosystem identity normalization
//! - **License normalization** (`license`): canonical SPDX identifier
//!   resolution and license expression building
//! - **Export** (`export`): SPDX 2.3 and CycloneDX document builders
//! - **Shared** (`shared`): common error types
//!
//! Extractors, the scanning orchestrator and serialization to disk all live
//! upstream or downstream of this crate; everything here is synchronous and
//! operates on in-memory data only.
//!
//! # Example
//!
//! ```
//! use stocktake::prelude::*;
//!
//! let result = ScanResult::with_packages(vec![Package {
//!     name: "requests".to_string(),
//!     version: "2.31.0".to_string(),
//!     purl_type: "pypi".to_string(),
//!     plugins: vec!["python/wheelegg".to_string()],
//!     ..Default::default()
//! }]);
//!
//! let mut exporter = SpdxExporter::new();
//! let document = exporter.export(&result, &SpdxConfig::default());
//! assert_eq!(document.packages.len(), 2); // main + requests
//! ```

pub mod export;
pub mod inventory;
pub mod license;
pub mod purl;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::export::{
        Bom, CdxConfig, Creator, CycloneDxExporter, SpdxConfig, SpdxDocument, SpdxExporter,
        UuidGenerator,
    };
    pub use crate::inventory::{
        Annotation, Inventory, Metadata, OsvEcosystem, Package, Parsed, ScanResult,
    };
    pub use crate::license::{
        license_expression, short_identifier, LicenseExpression, LicenseOutcome,
    };
    pub use crate::purl::PackageURL;
    pub use crate::shared::{InventoryError, Result};
}
