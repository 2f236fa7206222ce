#![allow(non_snake_case)]

use super::*;

#[test]
fn GeneratorConfig___default___targets_duckdb_layout() {
    let config = GeneratorConfig::default();

    assert_eq!(config.namespace, "duckdb");
    assert_eq!(config.core_includes.len(), 2);
    assert!(config.is_movable("string"));
    assert!(!config.is_movable("idx_t"));
}

#[test]
fn GeneratorConfig___output_file_name___uses_prefix_and_extension() {
    let config = GeneratorConfig::default();

    assert_eq!(config.output_file_name("expression"), "serialize_expression.cpp");
}

#[test]
fn GeneratorConfig___partial_json___fills_defaults() {
    let config: GeneratorConfig =
        serde_json::from_str(r#"{"namespace": "acme", "output_extension": "cc"}"#).unwrap();

    assert_eq!(config.namespace, "acme");
    assert_eq!(config.output_extension, "cc");
    assert_eq!(config.generator, "serialgen");
}

#[test]
fn GeneratorConfig___unknown_key___is_rejected() {
    let result = serde_json::from_str::<GeneratorConfig>(r#"{"namespac": "acme"}"#);

    assert!(result.is_err());
}

#[test]
fn GeneratorConfig___load___reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("serialgen.json");
    std::fs::write(&path, r#"{"movable_types": ["Value"]}"#).unwrap();

    let config = GeneratorConfig::load(&path).unwrap();

    assert!(config.is_movable("Value"));
    assert!(!config.is_movable("string"));
}

#[test]
fn GeneratorConfig___load_missing_file___fails() {
    let dir = tempfile::tempdir().unwrap();

    assert!(GeneratorConfig::load(&dir.path().join("absent.json")).is_err());
}
