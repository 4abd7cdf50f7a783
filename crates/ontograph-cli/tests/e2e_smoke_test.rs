use std::{fs, path::PathBuf};

use tempfile::tempdir;

use ontograph::ErrorCode;
use ontograph_cli::{Args, run};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn args(input: PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        format: None,
        graph: false,
        #[cfg(feature = "graphviz")]
        dot: false,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    for name in ["animals", "weekdays"] {
        let output = temp_dir.path().join(format!("{name}.ttl"));
        run(&args(fixture(&format!("{name}.json")), output.clone()))
            .unwrap_or_else(|err| panic!("{name} failed: {err}"));

        let turtle = fs::read_to_string(&output).expect("Output file should exist");
        assert!(turtle.contains("a owl:Ontology"), "{name}:\n{turtle}");
    }
}

#[test]
fn e2e_animals_formats() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("animals.ofn");

    let mut cli = args(fixture("animals.json"), output.clone());
    cli.format = Some("functional".parse().unwrap());
    run(&cli).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Ontology(<http://example.org/animals>"));
    assert!(text.contains(
        "SubClassOf(<http://example.org/animals#Dog> <http://example.org/animals#Animal>)"
    ));
    assert!(text.contains(
        "DisjointClasses(<http://example.org/animals#Cat> <http://example.org/animals#Dog>)"
    ));
    assert!(text.contains(
        "ClassAssertion(<http://example.org/animals#Dog> <http://example.org/animals#rex>)"
    ));
    assert!(text.contains(
        "ClassAssertion(<http://www.w3.org/2002/07/owl#Thing> <http://example.org/animals#tom>)"
    ));
    assert!(text.contains(
        "DifferentIndividuals(<http://example.org/animals#rex> <http://example.org/animals#tom>)"
    ));
}

#[test]
fn e2e_config_file() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[output]\nformat = \"ntriples\"\n").unwrap();
    let output = temp_dir.path().join("weekdays.nt");

    let mut cli = args(fixture("weekdays.json"), output.clone());
    cli.config = Some(config.to_string_lossy().to_string());
    run(&cli).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains(
        "<http://example.org/calendar/> <http://www.w3.org/2002/07/owl#imports> <http://www.w3.org/2006/time> .\n"
    ));
    assert!(text.contains(
        "<http://example.org/calendar/Weekday> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://www.w3.org/2006/time#DayOfWeek> .\n"
    ));
    assert!(text.contains(
        "<http://example.org/calendar/Monday> <http://example.org/calendar/order> \"1\"^^<http://www.w3.org/2001/XMLSchema#int> .\n"
    ));
}

#[test]
fn e2e_graph_export() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("animals-graph.ttl");

    let mut cli = args(fixture("animals.json"), output.clone());
    cli.graph = true;
    run(&cli).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("@prefix og: <http://www.epistem.org/og/20090801#> ."));
    assert!(text.contains("og:author \"Ada\""));
}

#[cfg(feature = "graphviz")]
#[test]
fn e2e_dot_export() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("animals.dot");

    let mut cli = args(fixture("animals.json"), output.clone());
    cli.dot = true;
    run(&cli).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("digraph"));
    assert!(text.contains("og:head"));
}

#[test]
fn e2e_invalid_inputs() {
    let temp_dir = tempdir().unwrap();

    let err = run(&args(fixture("no_root.json"), temp_dir.path().join("out.ttl"))).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E200));
    assert!(!temp_dir.path().join("out.ttl").exists());

    let err = run(&args(fixture("missing.json"), temp_dir.path().join("out.ttl"))).unwrap_err();
    assert!(err.to_string().starts_with("I/O error"));
}
