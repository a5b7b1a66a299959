/// SBOM exporters: SPDX 2.3 and CycloneDX document builders plus the
/// injectable reference-ID source they share.
pub mod cyclonedx;
pub mod spdx;
pub mod uuid_source;

pub use cyclonedx::{Bom, CdxConfig, CycloneDxExporter};
pub use spdx::{Creator, SpdxConfig, SpdxDocument, SpdxExporter};
pub use uuid_source::UuidGenerator;
