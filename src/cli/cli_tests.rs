#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;

const VALID: &str = r#"[{"class": "A", "members": [{"name": "x", "type": "idx_t"}]}]"#;
const BROKEN: &str = r#"[{"class": "A", "constructor": ["missing"], "members": []}]"#;

fn schema_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn target_path___uses_prefix_stem_and_extension() {
    let config = GeneratorConfig::default();

    let target = target_path(Path::new("schemas/expression.json"), Path::new("out"), &config);

    assert_eq!(target, Path::new("out").join("serialize_expression.cpp"));
}

#[test]
fn generate_files___valid_schema___writes_rendered_source() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = schema_file(&input, "nodes.json", VALID);
    let config = GeneratorConfig::default();

    let reports = generate_files(&[source], out.path(), &config, false);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome.as_ref().unwrap(), &FileOutcome::Written);
    let written = std::fs::read_to_string(out.path().join("serialize_nodes.cpp")).unwrap();
    assert_eq!(written, crate::generate_source(VALID, &config).unwrap());
}

#[test]
fn generate_files___failing_schema___leaves_no_output_and_spares_others() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let good = schema_file(&input, "good.json", VALID);
    let bad = schema_file(&input, "bad.json", BROKEN);

    let reports = generate_files(&[bad, good], out.path(), &GeneratorConfig::default(), false);

    let error = reports[0].outcome.as_ref().unwrap_err();
    assert!(format!("{error:#}").contains("missing"));
    assert!(!out.path().join("serialize_bad.cpp").exists());
    assert!(reports[1].outcome.is_ok());
    assert!(out.path().join("serialize_good.cpp").exists());
}

#[test]
fn generate_files___check_mode___reports_stale_then_up_to_date() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = schema_file(&input, "nodes.json", VALID);
    let config = GeneratorConfig::default();

    let first = generate_files(std::slice::from_ref(&source), out.path(), &config, true);
    assert_eq!(first[0].outcome.as_ref().unwrap(), &FileOutcome::Stale);
    assert!(!first[0].target.exists());

    generate_files(std::slice::from_ref(&source), out.path(), &config, false);
    let second = generate_files(&[source], out.path(), &config, true);
    assert_eq!(second[0].outcome.as_ref().unwrap(), &FileOutcome::UpToDate);
}

#[test]
fn write_atomically___replaces_existing_file() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("nested").join("file.cpp");

    write_atomically(&target, "first").unwrap();
    write_atomically(&target, "second").unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
}

#[test]
fn resolve_file_path_patterns___glob___sorted_and_deduplicated() {
    let input = TempDir::new().unwrap();
    let b = schema_file(&input, "b.json", VALID);
    let a = schema_file(&input, "a.json", VALID);
    schema_file(&input, "notes.txt", "");
    let pattern = format!("{}/*.json", input.path().display());

    let paths = resolve_file_path_patterns([pattern.as_str(), b.to_str().unwrap()]).unwrap();

    assert_eq!(paths, vec![a, b]);
}

#[test]
fn resolve_file_path_patterns___unmatched_glob___is_an_error() {
    let input = TempDir::new().unwrap();
    let pattern = format!("{}/*.json", input.path().display());

    assert!(resolve_file_path_patterns([pattern]).is_err());
}

#[test]
fn CommandLineInterface___generate_arguments___parse() {
    let cli = CommandLineInterface::try_parse_from([
        "serialgen", "generate", "-i", "a.json", "b.json", "-o", "out", "--check",
    ])
    .unwrap();

    match cli.cmd {
        Command::Generate(target) => {
            assert_eq!(target.input_settings.input, vec!["a.json", "b.json"]);
            assert_eq!(target.out, PathBuf::from("out"));
            assert!(target.check);
        }
        Command::Resolve(_) => panic!("expected generate"),
    }
}

#[test]
fn generate_files___sources_sharing_a_stem___all_fail_without_writing() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::create_dir_all(input.path().join("a")).unwrap();
    std::fs::create_dir_all(input.path().join("b")).unwrap();
    let first = schema_file(&input, "a/expr.json", VALID);
    let second = schema_file(&input, "b/expr.json", VALID);
    let other = schema_file(&input, "other.json", VALID);

    let reports = generate_files(&[first, second, other], out.path(), &GeneratorConfig::default(), false);

    for report in &reports[..2] {
        let error = report.outcome.as_ref().unwrap_err();
        assert!(format!("{error:#}").contains("2 schema files"), "{error:#}");
    }
    assert_eq!(reports[2].outcome.as_ref().unwrap(), &FileOutcome::Written);
    assert!(!out.path().join("serialize_expr.cpp").exists());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 1);
}
