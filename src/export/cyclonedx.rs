//! CycloneDX 1.6 export. Unlike the SPDX path, packages without a
//! resolvable PURL still produce a component — CycloneDX has no
//! skip-if-no-identity convention, the field is simply omitted.

use chrono::Utc;
use serde::Serialize;

use crate::export::uuid_source::UuidGenerator;
use crate::inventory::ScanResult;

const TOOL_NAME: &str = "stocktake";
const TOOL_URL: &str = "https://github.com/stocktake/stocktake";

const BOM_FORMAT: &str = "CycloneDX";
const SPEC_VERSION: &str = "1.6";
const JSON_SCHEMA: &str = "http://cyclonedx.org/schema/bom-1.6.schema.json";

/// A CycloneDX BOM document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bom {
    #[serde(rename = "$schema")]
    pub json_schema: String,
    #[serde(rename = "bomFormat")]
    pub bom_format: String,
    #[serde(rename = "specVersion")]
    pub spec_version: String,
    pub version: u32,
    #[serde(rename = "serialNumber")]
    pub serial_number: String,
    pub metadata: BomMetadata,
    pub components: Vec<Component>,
}

impl Bom {
    /// Renders the BOM as pretty-printed CycloneDX JSON.
    pub fn to_json(&self) -> crate::shared::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BomMetadata {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<OrganizationalContact>>,
    pub component: Component,
    pub tools: Tools,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrganizationalContact {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tools {
    pub components: Vec<Component>,
}

/// One component entry: used for the root component, the tool identity and
/// every inventory package. Optional fields are omitted from the output
/// entirely when absent.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Component {
    #[serde(rename = "bom-ref", skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    #[serde(rename = "externalReferences", skip_serializing_if = "Option::is_none")]
    pub external_references: Option<Vec<ExternalReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl Component {
    fn library(name: String, version: String) -> Self {
        Self {
            bom_ref: None,
            component_type: "library".to_string(),
            name,
            version: Some(version),
            purl: None,
            cpe: None,
            external_references: None,
            evidence: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExternalReference {
    pub url: String,
    #[serde(rename = "type")]
    pub reference_type: String,
}

/// Occurrence evidence: the locations where the package was observed, in
/// original order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Evidence {
    pub occurrences: Vec<EvidenceOccurrence>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvidenceOccurrence {
    pub location: String,
}

/// Caller-supplied settings for the BOM's root component.
#[derive(Debug, Clone)]
pub struct CdxConfig {
    pub component_name: String,
    pub component_version: String,
    pub component_type: String,
    pub authors: Vec<String>,
}

impl Default for CdxConfig {
    fn default() -> Self {
        Self {
            component_name: String::new(),
            component_version: String::new(),
            component_type: "application".to_string(),
            authors: vec![],
        }
    }
}

/// Builds CycloneDX BOMs from scan results. Export never fails.
#[derive(Debug)]
pub struct CycloneDxExporter {
    uuids: UuidGenerator,
}

impl CycloneDxExporter {
    pub fn new() -> Self {
        Self::with_uuid_generator(UuidGenerator::new())
    }

    /// Uses the given UUID source for BOM references; pass a seeded one for
    /// reproducible documents.
    pub fn with_uuid_generator(uuids: UuidGenerator) -> Self {
        Self { uuids }
    }

    pub fn export(&mut self, result: &ScanResult, config: &CdxConfig) -> Bom {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let serial_number = format!("urn:uuid:{}", self.uuids.next_uuid());

        let root_component = Component {
            bom_ref: Some(self.uuids.next_uuid().to_string()),
            component_type: config.component_type.clone(),
            name: config.component_name.clone(),
            version: Some(config.component_version.clone()),
            purl: None,
            cpe: None,
            external_references: None,
            evidence: None,
        };
        let tool_component = Component {
            bom_ref: None,
            component_type: "application".to_string(),
            name: TOOL_NAME.to_string(),
            version: None,
            purl: None,
            cpe: None,
            external_references: Some(vec![ExternalReference {
                url: TOOL_URL.to_string(),
                reference_type: "website".to_string(),
            }]),
            evidence: None,
        };
        let authors = if config.authors.is_empty() {
            None
        } else {
            Some(
                config
                    .authors
                    .iter()
                    .map(|name| OrganizationalContact { name: name.clone() })
                    .collect(),
            )
        };

        let mut components = Vec::with_capacity(result.inventory.packages.len());
        for pkg in &result.inventory.packages {
            let mut component = Component::library(pkg.name.clone(), pkg.version.clone());
            component.bom_ref = Some(self.uuids.next_uuid().to_string());
            component.purl = pkg.purl().map(|purl| purl.to_string());
            component.cpe = pkg.cpes().first().cloned();
            if !pkg.locations.is_empty() {
                component.evidence = Some(Evidence {
                    occurrences: pkg
                        .locations
                        .iter()
                        .map(|location| EvidenceOccurrence {
                            location: location.clone(),
                        })
                        .collect(),
                });
            }
            components.push(component);
        }

        Bom {
            json_schema: JSON_SCHEMA.to_string(),
            bom_format: BOM_FORMAT.to_string(),
            spec_version: SPEC_VERSION.to_string(),
            version: 1,
            serial_number,
            metadata: BomMetadata {
                timestamp,
                authors,
                component: root_component,
                tools: Tools {
                    components: vec![tool_component],
                },
            },
            components,
        }
    }
}

impl Default for CycloneDxExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Package;

    fn scan_result(packages: Vec<Package>) -> ScanResult {
        ScanResult::with_packages(packages)
    }

    #[test]
    fn test_bom_shell_defaults() {
        let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
        let bom = exporter.export(&scan_result(vec![]), &CdxConfig::default());
        assert_eq!(bom.bom_format, "CycloneDX");
        assert_eq!(bom.spec_version, "1.6");
        assert_eq!(bom.version, 1);
        assert!(bom.serial_number.starts_with("urn:uuid:"));
        assert!(bom.components.is_empty());
    }

    #[test]
    fn test_tool_component_identity() {
        let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
        let bom = exporter.export(&scan_result(vec![]), &CdxConfig::default());
        let tool = &bom.metadata.tools.components[0];
        assert_eq!(tool.name, "stocktake");
        assert_eq!(tool.component_type, "application");
        let refs = tool.external_references.as_ref().unwrap();
        assert_eq!(refs[0].url, "https://github.com/stocktake/stocktake");
        assert_eq!(refs[0].reference_type, "website");
    }

    #[test]
    fn test_authors_omitted_when_absent() {
        let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
        let bom = exporter.export(&scan_result(vec![]), &CdxConfig::default());
        assert!(bom.metadata.authors.is_none());
        let json = serde_json::to_string(&bom).unwrap();
        assert!(!json.contains("\"authors\""));
    }

    #[test]
    fn test_authors_mapped_in_declaration_order() {
        let config = CdxConfig {
            component_name: "sbom-1".to_string(),
            component_version: "1.0.0".to_string(),
            authors: vec!["first".to_string(), "second".to_string()],
            ..Default::default()
        };
        let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
        let bom = exporter.export(&scan_result(vec![]), &config);
        let authors = bom.metadata.authors.unwrap();
        assert_eq!(authors[0].name, "first");
        assert_eq!(authors[1].name, "second");
    }
}
