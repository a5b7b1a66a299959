/// Integration tests for the CycloneDX exporter.
use stocktake::inventory::{Metadata, SbomReference};
use stocktake::prelude::*;

fn pypi_package(name: &str, version: &str) -> Package {
    Package {
        name: name.to_string(),
        version: version.to_string(),
        purl_type: "pypi".to_string(),
        plugins: vec!["python/wheelegg".to_string()],
        ..Default::default()
    }
}

fn config() -> CdxConfig {
    CdxConfig {
        component_name: "sbom-1".to_string(),
        component_version: "1.0.0".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_root_component_from_config() {
    let result = ScanResult::with_packages(vec![]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());

    let root = &bom.metadata.component;
    assert_eq!(root.name, "sbom-1");
    assert_eq!(root.version.as_deref(), Some("1.0.0"));
    assert_eq!(root.component_type, "application");
    assert!(root.bom_ref.is_some());
}

#[test]
fn test_package_component_with_purl() {
    let result = ScanResult::with_packages(vec![pypi_package("software", "1.2.3")]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());

    assert_eq!(bom.components.len(), 1);
    let component = &bom.components[0];
    assert_eq!(component.component_type, "library");
    assert_eq!(component.name, "software");
    assert_eq!(component.version.as_deref(), Some("1.2.3"));
    assert_eq!(component.purl.as_deref(), Some("pkg:pypi/software@1.2.3"));
    assert!(component.bom_ref.is_some());
    assert!(component.cpe.is_none());
    assert!(component.evidence.is_none());
}

#[test]
fn test_package_without_identity_still_emitted() {
    // Unlike the SPDX path, a package with no PURL type still produces a
    // component; it just has no purl field.
    let result = ScanResult::with_packages(vec![Package {
        name: "no-identity".to_string(),
        version: "1.0".to_string(),
        plugins: vec!["python/wheelegg".to_string()],
        ..Default::default()
    }]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());

    assert_eq!(bom.components.len(), 1);
    assert_eq!(bom.components[0].name, "no-identity");
    assert!(bom.components[0].purl.is_none());
    let json = serde_json::to_string(&bom).unwrap();
    assert!(!json.contains("\"purl\""));
}

#[test]
fn test_cpe_taken_from_sbom_sourced_metadata_only() {
    let mut from_sbom = pypi_package("carried", "1.0.0");
    from_sbom.metadata = Some(Metadata::SpdxDocument(SbomReference {
        purl: Some(PackageURL::new("pypi", "carried").with_version("1.0.0")),
        cpes: vec![
            "cpe:2.3:a:carried:carried:1.0.0:*:*:*:*:*:*:*".to_string(),
            "cpe:2.3:a:carried:carried:1:*:*:*:*:*:*:*".to_string(),
        ],
    }));
    let plain = pypi_package("plain", "2.0.0");

    let result = ScanResult::with_packages(vec![from_sbom, plain]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());

    // Only the first CPE is carried over.
    assert_eq!(
        bom.components[0].cpe.as_deref(),
        Some("cpe:2.3:a:carried:carried:1.0.0:*:*:*:*:*:*:*")
    );
    assert!(bom.components[1].cpe.is_none());
}

#[test]
fn test_evidence_occurrences_in_location_order() {
    let mut pkg = pypi_package("software", "1.2.3");
    pkg.locations = vec!["/b/file2".to_string(), "/a/file1".to_string()];
    let result = ScanResult::with_packages(vec![pkg]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());

    let evidence = bom.components[0].evidence.as_ref().unwrap();
    let locations: Vec<&str> = evidence
        .occurrences
        .iter()
        .map(|o| o.location.as_str())
        .collect();
    // Original order, not sorted.
    assert_eq!(locations, vec!["/b/file2", "/a/file1"]);
}

#[test]
fn test_evidence_omitted_without_locations() {
    let result = ScanResult::with_packages(vec![pypi_package("software", "1.2.3")]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());
    let json = serde_json::to_string(&bom).unwrap();
    assert!(!json.contains("\"evidence\""));
}

#[test]
fn test_every_component_gets_a_fresh_bom_ref() {
    let result = ScanResult::with_packages(vec![
        pypi_package("one", "1.0.0"),
        pypi_package("two", "2.0.0"),
    ]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());

    let mut refs: Vec<&String> = bom
        .components
        .iter()
        .filter_map(|c| c.bom_ref.as_ref())
        .collect();
    refs.push(bom.metadata.component.bom_ref.as_ref().unwrap());
    let total = refs.len();
    refs.sort();
    refs.dedup();
    assert_eq!(refs.len(), total);
}

#[test]
fn test_json_field_spellings() {
    let result = ScanResult::with_packages(vec![pypi_package("software", "1.2.3")]);
    let mut exporter = CycloneDxExporter::with_uuid_generator(UuidGenerator::seeded(1));
    let bom = exporter.export(&result, &config());
    let json = bom.to_json().unwrap();

    assert!(json.contains("\"$schema\": \"http://cyclonedx.org/schema/bom-1.6.schema.json\""));
    assert!(json.contains("\"bomFormat\": \"CycloneDX\""));
    assert!(json.contains("\"specVersion\": \"1.6\""));
    assert!(json.contains("\"bom-ref\""));
    assert!(json.contains("\"serialNumber\": \"urn:uuid:"));
    assert!(bom.metadata.timestamp.ends_with('Z'));
}
