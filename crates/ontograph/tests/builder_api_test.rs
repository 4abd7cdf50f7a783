//! Integration tests for the OntologyBuilder API
//!
//! These tests drive the public API from JSON text to serialized output.

use indexmap::IndexMap;
use serde_json::{Value, json};

use ontograph::{
    ErrorCode, OntographError, OntologyBuilder,
    config::{AppConfig, GraphConfig, OntologyConfig, OutputConfig},
    ontology::OutputFormat,
};

fn zoo() -> Value {
    json!({
        "Sheets": [{
            "SheetTitle": "Zoo",
            "GraphicsList": [
                { "Class": "Group", "ID": 1, "Text": "http://example.org/zoo", "Graphics": [
                    { "Class": "ShapedGraphic", "ID": 2, "Text": "Animal", "Notes": "Class", "Bounds": [0, 0, 60, 30] },
                    { "Class": "ShapedGraphic", "ID": 3, "Text": "Dog", "Notes": "Class", "Bounds": [0, 100, 60, 30] }
                ]},
                { "Class": "LineGraphic", "ID": 4, "Notes": "Extends", "Tail": { "ID": 3 }, "Head": { "ID": 2 } }
            ]
        }]
    })
}

fn config(format: OutputFormat) -> AppConfig {
    AppConfig::default().with_format(format)
}

#[test]
fn test_builder_api_exists() {
    let _builder = OntologyBuilder::default();
}

#[test]
fn test_load_and_synthesize() {
    let builder = OntologyBuilder::default();
    let diagram = builder
        .load(&zoo().to_string())
        .expect("Failed to load document");
    assert_eq!(diagram.pages().len(), 1);

    let ontology = builder
        .synthesize(&diagram)
        .expect("Failed to synthesize ontology");
    assert_eq!(ontology.iri().as_str(), "http://example.org/zoo");
    assert_eq!(ontology.axioms().count(), 1);
}

#[test]
fn test_render_each_format() {
    let source = zoo().to_string();

    let builder = OntologyBuilder::new(config(OutputFormat::Turtle));
    let ontology = builder.synthesize(&builder.load(&source).unwrap()).unwrap();
    let turtle = builder.render(&ontology).unwrap();
    assert!(turtle.contains(":Dog a owl:Class"), "{turtle}");
    assert!(turtle.contains("rdfs:subClassOf :Animal"), "{turtle}");

    let builder = OntologyBuilder::new(config(OutputFormat::NTriples));
    let ntriples = builder.render(&ontology).unwrap();
    assert!(ntriples.contains(
        "<http://example.org/zoo#Dog> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/zoo#Animal> .\n"
    ));

    let builder = OntologyBuilder::new(config(OutputFormat::Functional));
    let functional = builder.render(&ontology).unwrap();
    assert!(functional.contains("Declaration(Class(<http://example.org/zoo#Dog>))"));
}

#[test]
fn test_invalid_json_returns_error() {
    let builder = OntologyBuilder::default();
    let err = builder.load("{ not json").unwrap_err();
    assert!(matches!(err, OntographError::Json(_)));
    assert_eq!(err.code(), None);
}

#[test]
fn test_malformed_document_returns_error() {
    let builder = OntologyBuilder::default();
    let err = builder
        .load(r#"{ "GraphicsList": [ { "Class": "ShapedGraphic" } ] }"#)
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E100));
}

#[test]
fn test_missing_root_returns_error() {
    let builder = OntologyBuilder::default();
    let diagram = builder
        .load(r#"{ "GraphicsList": [] }"#)
        .expect("An empty document is still a diagram");
    let err = builder.synthesize(&diagram).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E200));
}

#[test]
fn test_configured_prefixes() {
    let mut document = zoo();
    document["Sheets"][0]["GraphicsList"][0]["Graphics"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "Class": "ShapedGraphic", "ID": 5, "Text": "foaf:Person", "Notes": "Class", "Bounds": [200, 0, 60, 30]
        }));

    let without = OntologyBuilder::default();
    let diagram = without.load(&document.to_string()).unwrap();
    assert_eq!(
        without.synthesize(&diagram).unwrap_err().code(),
        Some(ErrorCode::E300)
    );

    let prefixes = IndexMap::from([(
        "foaf".to_string(),
        "http://xmlns.com/foaf/0.1/".to_string(),
    )]);
    let with = OntologyBuilder::new(AppConfig::new(
        OntologyConfig::new(prefixes),
        OutputConfig::new(OutputFormat::NTriples),
        GraphConfig::default(),
    ));
    let ontology = with.synthesize(&diagram).unwrap();
    assert!(with.render(&ontology).unwrap().contains("<http://xmlns.com/foaf/0.1/Person>"));
}

#[test]
fn test_export_graph() {
    let builder = OntologyBuilder::new(AppConfig::new(
        OntologyConfig::default(),
        OutputConfig::new(OutputFormat::NTriples),
        GraphConfig::new("http://example.org/graph/"),
    ));
    let diagram = builder.load(&zoo().to_string()).unwrap();

    let text = builder.export_graph(&diagram).unwrap();
    assert!(text.contains(
        "<http://example.org/graph/sheet-0/graphic-4> <http://www.epistem.org/og/20090801#tail> <http://example.org/graph/sheet-0/graphic-3> .\n"
    ));

    let functional = OntologyBuilder::new(config(OutputFormat::Functional));
    assert!(matches!(
        functional.export_graph(&diagram),
        Err(OntographError::Export(_))
    ));
}

#[test]
fn test_builder_reusability() {
    let builder = OntologyBuilder::default();
    for _ in 0..2 {
        let diagram = builder.load(&zoo().to_string()).unwrap();
        let ontology = builder.synthesize(&diagram).unwrap();
        assert!(!builder.render(&ontology).unwrap().is_empty());
    }
}
