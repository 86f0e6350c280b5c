//! Region catalog loading tests.

use crate::catalog::domain::{CatalogDomainError, FALLBACK_REGION, RegionCatalog, RegionCatalogError};
use camino::Utf8PathBuf;
use rstest::rstest;
use std::io::Write;

fn write_region_file(contents: &str) -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("regions.json")).expect("utf-8 path");
    let mut file = std::fs::File::create(&path).expect("create region file");
    file.write_all(contents.as_bytes()).expect("write region file");
    (dir, path)
}

#[rstest]
fn loads_regions_in_file_order() {
    let (_dir, path) = write_region_file(r#"["Севастополь", " Республика Крым ", "Севастополь", ""]"#);
    let catalog = RegionCatalog::load(&path).expect("catalog loads");
    assert_eq!(catalog.names(), ["Севастополь", "Республика Крым"]);
}

#[rstest]
#[case("not json")]
#[case(r#"{"regions": []}"#)]
fn malformed_file_is_a_parse_error(#[case] contents: &str) {
    let (_dir, path) = write_region_file(contents);
    assert!(matches!(
        RegionCatalog::load(&path),
        Err(RegionCatalogError::Parse { .. })
    ));
}

#[rstest]
fn empty_list_is_rejected() {
    let (_dir, path) = write_region_file("[]");
    assert!(matches!(
        RegionCatalog::load(&path),
        Err(RegionCatalogError::Empty(_))
    ));
}

#[rstest]
fn missing_file_falls_back_to_crimea() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json")).expect("utf-8 path");
    assert!(matches!(
        RegionCatalog::load(&path),
        Err(RegionCatalogError::Io { .. })
    ));
    assert_eq!(RegionCatalog::load_or_fallback(&path).names(), [FALLBACK_REGION]);
}

#[rstest]
fn shipped_region_file_loads() {
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/regions.json");
    let catalog = RegionCatalog::load(&path).expect("shipped catalog loads");
    assert!(catalog.contains(FALLBACK_REGION));
}

#[rstest]
fn resolve_rejects_unknown_regions() {
    let catalog = RegionCatalog::fallback();
    assert_eq!(
        catalog.resolve("Атлантида"),
        Err(CatalogDomainError::UnknownRegion("Атлантида".to_owned()))
    );
    assert_eq!(
        catalog
            .resolve(" Республика Крым ")
            .map(|region| region.to_string()),
        Ok(FALLBACK_REGION.to_owned())
    );
}
