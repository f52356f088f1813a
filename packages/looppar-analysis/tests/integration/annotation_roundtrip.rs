//! Annotation map and configuration persistence

#[path = "../common/mod.rs"]
mod common;

use common::*;
use looppar_analysis::config::{ConfigError, SolverBackend};
use looppar_analysis::{
    AnalysisConfig, AnalysisContext, AnnotationMap, LoopParError, LoopParallelizer,
    ParallelRegion,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_pipeline_output_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("annotationMap.json");
    let config = test_config().with_output(&path);

    let mut ctx = AnalysisContext::build(dep_test_program(), config).unwrap();
    LoopParallelizer::new().run(&mut ctx);
    ctx.write_annotations().unwrap();

    let loaded = AnnotationMap::read_from(&path).unwrap();
    assert_eq!(loaded, ctx.annotations);
    assert_eq!(
        loaded.regions_of(SIMPLE_NO_DEP0),
        &[ParallelRegion { start: 2, length: 17, slot: 1 }]
    );
}

#[test]
fn test_written_json_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.json");

    let mut map = AnnotationMap::new();
    map.add_annotation("<B: g()V>", ParallelRegion { start: 4, length: 9, slot: 0 });
    map.add_annotation("<A: f([I)V>", ParallelRegion { start: 2, length: 7, slot: 1 });
    map.add_annotation("<A: f([I)V>", ParallelRegion { start: 12, length: 5, slot: 2 });
    map.write_to(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "<A: f([I)V>": [
                {"start": 2, "length": 7, "slot": 1},
                {"start": 12, "length": 5, "slot": 2}
            ],
            "<B: g()V>": [{"start": 4, "length": 9, "slot": 0}]
        })
    );
    // keys sorted
    assert!(text.find("<A: f").unwrap() < text.find("<B: g").unwrap());
}

#[test]
fn test_missing_map_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = AnnotationMap::read_from(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoopParError::Io(_)), "{}", err);
}

#[test]
fn test_config_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("looppar.yaml");
    let config = AnalysisConfig::default()
        .with_timeout_ms(250)
        .with_output("out/map.json")
        .with_entry_points(vec!["<DepTest: main([Ljava/lang/String;)V>".to_string()]);
    fs::write(&path, config.to_yaml().unwrap()).unwrap();

    let loaded = AnalysisConfig::from_yaml_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.solver.backend, SolverBackend::Builtin);
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("looppar.yaml");
    fs::write(&path, "solver:\n  timeout_ms: 100\n").unwrap();

    let loaded = AnalysisConfig::from_yaml_file(&path).unwrap();
    assert_eq!(loaded.solver.timeout_ms, 100);
    assert_eq!(loaded.solver.max_disjuncts, 256);
    assert_eq!(loaded.output, std::path::PathBuf::from("annotationMap.json"));
    assert!(loaded.skip_library_classes);
}

#[test]
fn test_invalid_config_stops_the_run() {
    let config = AnalysisConfig::default().with_timeout_ms(0);
    let err = AnalysisContext::build(dep_test_program(), config).err().unwrap();
    assert!(
        matches!(err, LoopParError::Config(ConfigError::Range { ref field, .. }) if field == "solver.timeout_ms"),
        "{}",
        err
    );
}

#[test]
fn test_unknown_entry_point_stops_the_run() {
    let config = test_config().with_entry_points(vec!["<Nope: main()V>".to_string()]);
    let err = AnalysisContext::build(dep_test_program(), config).err().unwrap();
    assert!(matches!(err, LoopParError::Config(ConfigError::Validation(_))), "{}", err);
}

#[test]
fn test_method_without_body_is_skipped() {
    let (ctx, report) = analyze_source(
        r#"
class E {
    method static void empty() {
    }
    method static void fill(int[], int) {
        int[] a
        int n, i
        a := @parameter0: int[]
        n := @parameter1: int
        i = 0
    head:
        if i >= n goto done
        a[i] = 0
        i = i + 1
        goto head
    done:
        return
    }
}
"#,
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].signature, "<E: empty()V>");
    assert!(report.skipped[0].reason.contains("no body"));
    assert_eq!(ctx.annotations.regions_of("<E: fill([II)V>").len(), 1);
}
