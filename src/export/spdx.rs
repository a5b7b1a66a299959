//! SPDX 2.3 export: assembles a spec-compliant document graph out of a
//! completed scan result. Serialization to tag-value/JSON/YAML is the
//! caller's concern; the types here only derive `Serialize` for the JSON
//! field spellings.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::export::uuid_source::UuidGenerator;
use crate::inventory::{Package, ScanResult};
use crate::license::{license_expression, license_ref_id, NO_ASSERTION};

/// Prefix required on every SPDX element reference ID.
pub const SPDX_REF_PREFIX: &str = "SPDXRef-";

/// Reference ID of the document itself.
pub const DOCUMENT_REF_ID: &str = "SPDXRef-DOCUMENT";

const TOOL_NAME: &str = "stocktake";
const DEFAULT_DOCUMENT_NAME: &str = "stocktake-generated SPDX";
const DEFAULT_NAMESPACE_PREFIX: &str = "https://sbom.stocktake.dev/";

/// An SPDX 2.3 document graph.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    pub spdx_version: String,
    pub data_license: String,
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub name: String,
    pub document_namespace: String,
    pub creation_info: CreationInfo,
    pub packages: Vec<SpdxPackage>,
    pub relationships: Vec<SpdxRelationship>,
    #[serde(
        rename = "hasExtractedLicensingInfos",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub other_licenses: Vec<OtherLicense>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreationInfo {
    pub created: String,
    pub creators: Vec<Creator>,
}

/// A document creator. Renders to the SPDX `"<Type>: <name>"` string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub creator_type: String,
    pub name: String,
}

impl Creator {
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            creator_type: "Tool".to_string(),
            name: name.into(),
        }
    }

    pub fn person(name: impl Into<String>) -> Self {
        Self {
            creator_type: "Person".to_string(),
            name: name.into(),
        }
    }

    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            creator_type: "Organization".to_string(),
            name: name.into(),
        }
    }
}

impl Serialize for Creator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}: {}", self.creator_type, self.name))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpdxPackage {
    pub name: String,
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub version_info: String,
    pub supplier: String,
    pub download_location: String,
    pub files_analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_declared: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<ExternalRef>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRef {
    pub reference_category: String,
    pub reference_type: String,
    pub reference_locator: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpdxRelationship {
    pub spdx_element_id: String,
    pub related_spdx_element: String,
    pub relationship_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OtherLicense {
    pub license_id: String,
    pub extracted_text: String,
}

impl SpdxDocument {
    /// Renders the document as pretty-printed SPDX JSON.
    pub fn to_json(&self) -> crate::shared::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

/// Caller-supplied document settings. Every field has a safe fallback.
#[derive(Debug, Clone, Default)]
pub struct SpdxConfig {
    pub document_name: Option<String>,
    pub document_namespace: Option<String>,
    pub creators: Vec<Creator>,
}

/// Builds SPDX 2.3 documents from scan results.
///
/// Packages without a usable identity (no PURL, or a PURL with an empty
/// name or version) cannot be represented as SPDX nodes and are skipped
/// with a warning; everything else degrades gracefully. Export never
/// fails.
#[derive(Debug)]
pub struct SpdxExporter {
    uuids: UuidGenerator,
}

impl SpdxExporter {
    pub fn new() -> Self {
        Self::with_uuid_generator(UuidGenerator::new())
    }

    /// Uses the given UUID source for reference IDs; pass a seeded one for
    /// reproducible documents.
    pub fn with_uuid_generator(uuids: UuidGenerator) -> Self {
        Self { uuids }
    }

    pub fn export(&mut self, result: &ScanResult, config: &SpdxConfig) -> SpdxDocument {
        let inventory_packages = &result.inventory.packages;
        let mut packages = Vec::with_capacity(inventory_packages.len() + 1);
        let mut relationships = Vec::with_capacity(2 * inventory_packages.len() + 1);
        let mut other_license_texts = BTreeSet::new();

        // The synthetic main package logically contains every top-level
        // package found in the scan.
        let main_id = format!("{}Package-main-{}", SPDX_REF_PREFIX, self.uuids.next_uuid());
        packages.push(SpdxPackage {
            name: "main".to_string(),
            spdx_id: main_id.clone(),
            version_info: "0".to_string(),
            supplier: NO_ASSERTION.to_string(),
            download_location: NO_ASSERTION.to_string(),
            files_analyzed: false,
            license_concluded: None,
            license_declared: None,
            source_info: None,
            external_refs: vec![],
        });
        relationships.push(SpdxRelationship {
            spdx_element_id: DOCUMENT_REF_ID.to_string(),
            related_spdx_element: main_id.clone(),
            relationship_type: "DESCRIBES".to_string(),
        });

        for pkg in inventory_packages {
            let purl = match pkg.purl() {
                Some(purl) => purl,
                None => {
                    warn!(package = %pkg.name, "package has no PURL, skipping");
                    continue;
                }
            };
            if purl.name().is_empty() || purl.version().is_empty() {
                warn!(package = %pkg.name, "PURL name or version empty, skipping");
                continue;
            }

            let pkg_id = format!(
                "{}Package-{}-{}",
                SPDX_REF_PREFIX,
                sanitize_ref_id(purl.name()),
                self.uuids.next_uuid()
            );
            let licenses = license_expression(&pkg.licenses);
            other_license_texts.extend(licenses.other_licenses.iter().cloned());

            packages.push(SpdxPackage {
                name: purl.name().to_string(),
                spdx_id: pkg_id.clone(),
                version_info: purl.version().to_string(),
                supplier: NO_ASSERTION.to_string(),
                download_location: NO_ASSERTION.to_string(),
                files_analyzed: false,
                license_concluded: Some(licenses.outcome.as_spdx().to_string()),
                license_declared: Some(NO_ASSERTION.to_string()),
                source_info: Some(source_info(pkg)),
                external_refs: vec![ExternalRef {
                    reference_category: "PACKAGE-MANAGER".to_string(),
                    reference_type: "purl".to_string(),
                    reference_locator: purl.to_string(),
                }],
            });
            relationships.push(SpdxRelationship {
                spdx_element_id: main_id.clone(),
                related_spdx_element: pkg_id.clone(),
                relationship_type: "CONTAINS".to_string(),
            });
            // Marks that no file-level analysis was performed.
            relationships.push(SpdxRelationship {
                spdx_element_id: pkg_id,
                related_spdx_element: NO_ASSERTION.to_string(),
                relationship_type: "CONTAINS".to_string(),
            });
        }

        let name = config
            .document_name
            .clone()
            .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string());
        let document_namespace = config.document_namespace.clone().unwrap_or_else(|| {
            format!("{}{}", DEFAULT_NAMESPACE_PREFIX, self.uuids.next_uuid())
        });
        let mut creators = vec![Creator::tool(TOOL_NAME)];
        creators.extend(config.creators.iter().cloned());

        SpdxDocument {
            spdx_version: "SPDX-2.3".to_string(),
            data_license: "CC0-1.0".to_string(),
            spdx_id: DOCUMENT_REF_ID.to_string(),
            name,
            document_namespace,
            creation_info: CreationInfo {
                created: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                creators,
            },
            packages,
            relationships,
            other_licenses: other_license_texts
                .into_iter()
                .map(|text| OtherLicense {
                    license_id: license_ref_id(&text),
                    extracted_text: text,
                })
                .collect(),
        }
    }
}

impl Default for SpdxExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// SPDX reference IDs may only contain letters, digits, `.` and `-`.
fn sanitize_ref_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Human-readable provenance: which plugin found the package, and where.
/// With more than two locations only the first two are named.
fn source_info(pkg: &Package) -> String {
    let plugin = pkg
        .plugins
        .first()
        .map(String::as_str)
        .unwrap_or("unknown");
    let base = format!("Identified by the {} extractor", plugin);
    match pkg.locations.len() {
        0 => base,
        1 => format!("{} from {}", base, pkg.locations[0]),
        n => format!(
            "{} from {} locations, including {} and {}",
            base, n, pkg.locations[0], pkg.locations[1]
        ),
    }
}
