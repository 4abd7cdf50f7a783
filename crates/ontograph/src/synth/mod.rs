//! Axiom synthesis: from an annotated diagram to an ontology.
//!
//! The [`Synthesizer`] runs a fixed sequence of passes over a [`Diagram`],
//! each one a walk with the visitor protocol of `ontograph-core`:
//!
//! 1. **Ontology root** (shallow): finds the single group holding the
//!    ontology IRI and reads its imports and annotation tables.
//! 2. **Discovery** (deep): declares classes, individuals and properties.
//! 3. **Class axioms**: subclass, equivalence, disjointness and disjoint
//!    unions, plus sub-property axioms between properties.
//! 4. **Class expressions**: unions, intersections, complements and
//!    enumerations, as equivalences (solid lines) or subsumptions (dashed).
//! 5. **Assertions**: property grids and individual-level lines.
//! 6. **Cleanup**: individuals without a type become `owl:Thing`s.
//!
//! Passes only read the diagram; their state lives in the engine caches.
//! The first error aborts the run and nothing is returned.

mod assertions;
mod class_axioms;
mod discover;
mod error;
mod expressions;
pub mod names;
mod root;

pub use error::{End, Fault, SynthError};

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};

use ontograph_core::{
    model::{Diagram, GraphicRef, Node, Page},
    visit::{DiagramVisitor, Visit, walk},
};

use crate::{
    ontology::{
        AnnotationValue, Axiom, ClassExpression, EntityKind, Iri, Literal, Ontology,
        OntologySink, vocab,
    },
    role::{self, Role},
};

use names::Namespaces;

/// Translates diagrams into ontologies.
///
/// # Examples
///
/// ```
/// # use ontograph::synth::Synthesizer;
/// # use ontograph_core::build::build_diagram;
/// # use serde_json::json;
/// let document = json!({
///     "GraphicsList": [
///         { "Class": "Group", "ID": 1, "Text": "http://example.org/zoo", "Graphics": [
///             { "Class": "ShapedGraphic", "ID": 2, "Text": "Animal", "Notes": "Class", "Bounds": [0, 0, 50, 20] },
///             { "Class": "ShapedGraphic", "ID": 3, "Text": "Dog", "Notes": "Class", "Bounds": [0, 80, 50, 20] }
///         ]},
///         { "Class": "LineGraphic", "ID": 4, "Notes": "Extends", "Tail": { "ID": 3 }, "Head": { "ID": 2 } }
///     ]
/// });
/// let diagram = build_diagram(&document).unwrap();
/// let ontology = Synthesizer::new().synthesize(&diagram).unwrap();
///
/// assert_eq!(ontology.iri().as_str(), "http://example.org/zoo");
/// assert_eq!(ontology.axioms().count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    prefixes: Vec<(String, String)>,
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an extra prefix before the document's own prefixes are read.
    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.prefixes.push((prefix.into(), namespace.into()));
        self
    }

    /// Runs every pass over `diagram`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SynthError`] raised by any pass.
    pub fn synthesize(&self, diagram: &Diagram) -> Result<Ontology, SynthError> {
        info!(pages = diagram.pages().len(); "Synthesizing ontology");

        let root = root::find_root(diagram)?;
        info!(ontology:% = root.iri; "Found ontology root");

        let mut engine = Engine::new(diagram, root.iri.clone());
        for (prefix, namespace) in &self.prefixes {
            engine.bind_prefix(prefix, namespace);
        }

        root::read_tables(&mut engine, &root)?;
        discover::run(&mut engine)?;
        class_axioms::run(&mut engine)?;
        expressions::run(&mut engine)?;
        assertions::run(&mut engine)?;
        engine.type_untyped_individuals();

        let ontology = engine.finish();
        info!(
            declarations = ontology.declarations().count(),
            axioms = ontology.axioms().count();
            "Ontology synthesized"
        );
        Ok(ontology)
    }
}

/// A graphic's synthesized entity.
#[derive(Debug, Clone)]
struct Entity {
    iri: Iri,
    kind: EntityKind,
}

/// Caches and output shared by the passes.
struct Engine<'d> {
    diagram: &'d Diagram,
    names: Namespaces,
    ontology: Ontology,
    entities: IndexMap<GraphicRef, Entity>,
    typed: HashSet<Iri>,
    visited: HashSet<GraphicRef>,
}

impl<'d> Engine<'d> {
    fn new(diagram: &'d Diagram, iri: Iri) -> Self {
        Self {
            diagram,
            names: Namespaces::new(&iri),
            ontology: Ontology::new(iri),
            entities: IndexMap::new(),
            typed: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    fn finish(self) -> Ontology {
        self.ontology
    }

    fn bind_prefix(&mut self, prefix: &str, namespace: &str) {
        self.names.bind(prefix, namespace);
        self.ontology.bind_prefix(prefix, namespace);
    }

    fn annotate(&mut self, property: Iri, value: AnnotationValue) {
        let subject = self.ontology.iri().clone();
        self.ontology.add_annotation(&subject, &property, value);
    }

    fn add(&mut self, axiom: Axiom) {
        if let Axiom::ClassAssertion { individual, .. } = &axiom {
            self.typed.insert(individual.clone());
        }
        self.ontology.add_axiom(axiom);
    }

    /// Resolves a name written on `node`.
    fn resolve(&self, name: &str, node: Node<'_>) -> Result<Iri, SynthError> {
        self.names
            .resolve(name)
            .map_err(|unbound| SynthError::UnknownPrefix {
                prefix: unbound.0,
                name: name.to_string(),
                location: node.location(),
            })
    }

    /// Resolves the display text of `node`; `Ok(None)` for blank text.
    fn resolve_text(&self, node: Node<'_>) -> Result<Option<Iri>, SynthError> {
        let text = node.text().unwrap_or_default().trim();
        self.names
            .resolve_text(text)
            .map_err(|unbound| SynthError::UnknownPrefix {
                prefix: unbound.0,
                name: text.to_string(),
                location: node.location(),
            })
    }

    /// Declares the entity named by `node`, once.
    fn declare(&mut self, node: Node<'d>, kind: EntityKind, role: Role) -> Result<Iri, SynthError> {
        if let Some(entity) = self.entities.get(&node.reference()) {
            return Ok(entity.iri.clone());
        }

        let iri = self
            .resolve_text(node)?
            .ok_or_else(|| SynthError::BlankEntityName {
                role,
                location: node.location(),
            })?;

        if self.names.is_local(&iri) {
            self.ontology.declare_entity(&iri, kind);
        }
        self.entities.insert(
            node.reference(),
            Entity {
                iri: iri.clone(),
                kind,
            },
        );
        Ok(iri)
    }

    fn entity(&self, node: Node<'_>) -> Option<&Entity> {
        self.entities.get(&node.reference())
    }

    fn entity_kind(&self, node: Node<'_>) -> Option<EntityKind> {
        self.entity(node).map(|entity| entity.kind)
    }

    /// Returns the class declared by `node`.
    fn class(&self, node: Node<'_>) -> Result<Iri, SynthError> {
        match self.entity(node) {
            Some(Entity {
                iri,
                kind: EntityKind::Class,
            }) => Ok(iri.clone()),
            _ => Err(wrong_kind(node, "a class")),
        }
    }

    /// Returns the individual named by `node`, declaring it on first use.
    ///
    /// Plain shapes without a role become individuals on demand.
    fn individual(&mut self, node: Node<'d>) -> Result<Iri, SynthError> {
        match self.entity(node) {
            Some(Entity {
                iri,
                kind: EntityKind::Individual,
            }) => Ok(iri.clone()),
            Some(_) => Err(wrong_kind(node, "an individual")),
            None => {
                let unannotated = role::classify(node).is_none();
                if node.graphic().is_plain_shape() && unannotated {
                    self.declare(node, EntityKind::Individual, Role::Individual)
                } else {
                    Err(wrong_kind(node, "an individual"))
                }
            }
        }
    }

    /// Returns an individual that was declared explicitly.
    fn declared_individual(&self, node: Node<'_>) -> Result<Iri, SynthError> {
        match self.entity(node) {
            Some(Entity {
                iri,
                kind: EntityKind::Individual,
            }) => Ok(iri.clone()),
            _ => Err(wrong_kind(node, "an individual")),
        }
    }

    /// Returns a data or object property declared by `node`.
    fn property(&self, node: Node<'_>) -> Result<(Iri, EntityKind), SynthError> {
        match self.entity(node) {
            Some(Entity { iri, kind })
                if matches!(kind, EntityKind::DataProperty | EntityKind::ObjectProperty) =>
            {
                Ok((iri.clone(), *kind))
            }
            _ => Err(wrong_kind(node, "a data or object property")),
        }
    }

    /// Returns the literal written on `node`, typed by an `xsd:` note.
    fn literal(&self, node: Node<'_>) -> Literal {
        let text = node.text().unwrap_or_default().trim();
        match node.note().and_then(role::literal_datatype) {
            Some(datatype) => Literal::typed(text, Iri::new(format!("{}{datatype}", vocab::XSD))),
            None => Literal::plain(text),
        }
    }

    /// Individuals that never received a class assertion become `owl:Thing`s.
    fn type_untyped_individuals(&mut self) {
        let untyped: Vec<Iri> = self
            .entities
            .values()
            .filter(|entity| entity.kind == EntityKind::Individual)
            .filter(|entity| !self.typed.contains(&entity.iri))
            .map(|entity| entity.iri.clone())
            .collect();

        debug!(untyped = untyped.len(); "Typing untyped individuals");
        for individual in untyped {
            self.add(Axiom::ClassAssertion {
                class: ClassExpression::class(vocab::OWL_THING),
                individual,
            });
        }
    }
}

/// Holds the first error raised while a pass walks the diagram.
#[derive(Debug, Default)]
struct Outcome(Option<SynthError>);

impl Outcome {
    fn record(&mut self, result: Result<(), SynthError>) {
        if let Err(err) = result {
            self.0.get_or_insert(err);
        }
    }

    fn is_failed(&self) -> bool {
        self.0.is_some()
    }

    fn finish(self) -> Result<(), SynthError> {
        self.0.map_or(Ok(()), Err)
    }
}

/// A deep walk handing every graphic to one step function.
///
/// Containers are handed over before their children. Once a step fails the
/// rest of the diagram is skipped.
struct Pass<'e, 'd, F> {
    engine: &'e mut Engine<'d>,
    step: F,
    outcome: Outcome,
    graphics: usize,
}

impl<'d, F> Pass<'_, 'd, F>
where
    F: FnMut(&mut Engine<'d>, Node<'d>) -> Result<(), SynthError>,
{
    fn visit(&mut self, node: Node<'d>) -> bool {
        if self.outcome.is_failed() {
            return false;
        }
        self.graphics += 1;
        let result = (self.step)(&mut *self.engine, node);
        self.outcome.record(result);
        !self.outcome.is_failed()
    }
}

fn descend<'v, 'd>(proceed: bool) -> Visit<'v, 'd> {
    if proceed { Visit::Continue } else { Visit::Skip }
}

impl<'d, F> DiagramVisitor<'d> for Pass<'_, 'd, F>
where
    F: FnMut(&mut Engine<'d>, Node<'d>) -> Result<(), SynthError>,
{
    fn page_start(&mut self, _page: &'d Page) -> Visit<'_, 'd> {
        descend(!self.outcome.is_failed())
    }

    fn group_start(&mut self, group: Node<'d>) -> Visit<'_, 'd> {
        descend(self.visit(group))
    }

    fn line_start(&mut self, line: Node<'d>) -> Visit<'_, 'd> {
        descend(self.visit(line))
    }

    fn table_start(&mut self, table: Node<'d>) -> Visit<'_, 'd> {
        descend(self.visit(table))
    }

    fn shape(&mut self, shape: Node<'d>) {
        self.visit(shape);
    }

    fn connector_shape(&mut self, shape: Node<'d>) {
        self.visit(shape);
    }
}

/// Runs `step` over every graphic of the diagram.
fn run_pass<'d, F>(engine: &mut Engine<'d>, name: &str, step: F) -> Result<(), SynthError>
where
    F: FnMut(&mut Engine<'d>, Node<'d>) -> Result<(), SynthError>,
{
    let diagram = engine.diagram;
    let axioms = engine.ontology.axioms().count();
    let mut pass = Pass {
        engine,
        step,
        outcome: Outcome::default(),
        graphics: 0,
    };
    walk(diagram, &mut pass);

    debug!(
        pass = name,
        graphics = pass.graphics,
        entities = pass.engine.entities.len(),
        axioms = pass.engine.ontology.axioms().count() - axioms;
        "Pass finished"
    );
    pass.outcome.finish()
}

fn fault(node: Node<'_>, fault: Fault) -> SynthError {
    SynthError::GraphicSemantic {
        fault,
        location: node.location(),
    }
}

fn wrong_kind(node: Node<'_>, expected: &'static str) -> SynthError {
    let found = match node.text().map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => format!("{} '{text}'", node.graphic().kind_name()),
        None => node.graphic().kind_name().to_string(),
    };
    fault(node, Fault::WrongKind { expected, found })
}

/// The required end of a semantic connector.
fn endpoint<'d>(connector: Node<'d>, role: Role, end: End) -> Result<Node<'d>, SynthError> {
    let node = match end {
        End::Head => connector.head(),
        End::Tail => connector.tail(),
    };
    node.ok_or_else(|| fault(connector, Fault::MissingEndpoint { role, end }))
}

/// Outgoing connectors of `node` carrying `role`.
fn outgoing_with<'d>(node: Node<'d>, role: Role) -> impl Iterator<Item = Node<'d>> {
    node.outgoing()
        .filter(move |connector| role::has_role(*connector, role))
}

/// Incoming connectors of `node` carrying `role`.
fn incoming_with<'d>(node: Node<'d>, role: Role) -> impl Iterator<Item = Node<'d>> {
    node.incoming()
        .filter(move |connector| role::has_role(*connector, role))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use ontograph_core::{build::build_diagram, error::ErrorCode};

    use super::*;
    use crate::ontology::OutputFormat;

    pub(super) const BASE: &str = "http://example.org/onto";

    pub(super) fn shape(id: i64, text: &str, note: &str) -> Value {
        let mut shape = json!({
            "Class": "ShapedGraphic",
            "ID": id,
            "Text": text,
            "Bounds": [id * 100, 0, 60, 30],
        });
        if !note.is_empty() {
            shape["Notes"] = json!(note);
        }
        shape
    }

    pub(super) fn line(id: i64, note: &str, tail: i64, head: i64) -> Value {
        json!({
            "Class": "LineGraphic",
            "ID": id,
            "Notes": note,
            "Tail": { "ID": tail },
            "Head": { "ID": head },
            "Points": [[tail * 100, 0], [head * 100, 0]],
        })
    }

    pub(super) fn dashed(mut line: Value) -> Value {
        line["Style"] = json!({ "stroke": { "Pattern": 1 } });
        line
    }

    /// A table whose cells have ids `id * 100 + row * 10 + col`.
    pub(super) fn table(id: i64, note: &str, rows: &[&[&str]]) -> Value {
        let rows: Vec<Vec<Value>> = rows
            .iter()
            .enumerate()
            .map(|(r, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(c, text)| {
                        let id = id * 100 + (r * 10 + c) as i64;
                        json!({
                            "Class": "ShapedGraphic",
                            "ID": id,
                            "Text": text,
                            "Bounds": [c * 50, r * 20, 50, 20],
                        })
                    })
                    .collect()
            })
            .collect();
        let mut table = json!({ "Class": "TableGroup", "ID": id, "Rows": rows });
        if !note.is_empty() {
            table["Notes"] = json!(note);
        }
        table
    }

    /// Wraps `graphics` in a one-page document with an ontology root group.
    pub(super) fn document(graphics: Vec<Value>) -> Value {
        let mut list = vec![json!({
            "Class": "Group",
            "ID": 9000,
            "Text": BASE,
            "Graphics": [shape(9001, "marker", "")],
        })];
        list.extend(graphics);
        json!({ "Sheets": [{ "SheetTitle": "Test", "GraphicsList": list }] })
    }

    pub(super) fn synthesize(graphics: Vec<Value>) -> Result<Ontology, SynthError> {
        let diagram = build_diagram(&document(graphics)).unwrap();
        Synthesizer::new().synthesize(&diagram)
    }

    pub(super) fn iri(local: &str) -> Iri {
        Iri::new(format!("{BASE}#{local}"))
    }

    pub(super) fn class(local: &str) -> ClassExpression {
        ClassExpression::Class(iri(local))
    }

    #[test]
    fn test_minimal_class_hierarchy() {
        let ontology = synthesize(vec![
            shape(1, "Animal", "Class"),
            shape(2, "Dog", "Class"),
            line(3, "Extends", 2, 1),
        ])
        .unwrap();

        assert!(ontology.is_declared(&iri("Animal"), EntityKind::Class));
        assert!(ontology.is_declared(&iri("Dog"), EntityKind::Class));
        let axioms: Vec<&Axiom> = ontology.axioms().collect();
        assert_eq!(
            axioms,
            [&Axiom::SubClassOf {
                sub: class("Dog"),
                sup: class("Animal"),
            }]
        );
    }

    #[test]
    fn test_untyped_individual_becomes_thing() {
        let ontology = synthesize(vec![shape(1, "rex", "Individual")]).unwrap();

        assert!(ontology.contains_axiom(&Axiom::ClassAssertion {
            class: ClassExpression::class(vocab::OWL_THING),
            individual: iri("rex"),
        }));
    }

    #[test]
    fn test_typed_individual_is_not_a_thing() {
        let ontology = synthesize(vec![
            shape(1, "Dog", "Class"),
            shape(2, "rex", "Individual"),
            line(3, "InstanceOf", 2, 1),
        ])
        .unwrap();

        let assertions: Vec<&Axiom> = ontology
            .axioms()
            .filter(|axiom| matches!(axiom, Axiom::ClassAssertion { .. }))
            .collect();
        assert_eq!(
            assertions,
            [&Axiom::ClassAssertion {
                class: class("Dog"),
                individual: iri("rex"),
            }]
        );
    }

    #[test]
    fn test_unknown_prefix_fails() {
        let err = synthesize(vec![shape(1, "foo:Bar", "Class")]).unwrap_err();
        match &err {
            SynthError::UnknownPrefix { prefix, name, location } => {
                assert_eq!(prefix, "foo");
                assert_eq!(name, "foo:Bar");
                assert_eq!(location.graphic().map(|id| id.value()), Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.code(), ErrorCode::E300);
    }

    #[test]
    fn test_configured_prefix_resolves() {
        let document = document(vec![shape(1, "foo:Bar", "Class")]);
        let diagram = build_diagram(&document).unwrap();
        let ontology = Synthesizer::new()
            .with_prefix("foo", "http://foo.org/ns#")
            .synthesize(&diagram)
            .unwrap();

        assert_eq!(ontology.prefix("foo"), Some("http://foo.org/ns#"));
        // External entities are referenced, never declared.
        assert_eq!(ontology.declarations().count(), 0);
    }

    #[test]
    fn test_blank_entity_name() {
        let err = synthesize(vec![shape(1, "   ", "Class")]).unwrap_err();
        assert!(matches!(
            err,
            SynthError::BlankEntityName {
                role: Role::Class,
                ..
            }
        ));
        assert_eq!(err.code(), ErrorCode::E301);
    }

    #[test]
    fn test_entity_names_are_encoded() {
        let ontology = synthesize(vec![shape(1, r#"A<B> "q""#, "Class")]).unwrap();

        let encoded = Iri::new(format!("{BASE}#A%3CB%3E-%22q%22"));
        assert!(ontology.is_declared(&encoded, EntityKind::Class));

        let turtle = ontology.render(OutputFormat::Turtle).unwrap();
        assert!(turtle.contains(&format!("<{encoded}> a owl:Class")));
        let ntriples = ontology.render(OutputFormat::NTriples).unwrap();
        assert!(ntriples.contains(&format!("<{encoded}> <{}>", vocab::RDF_TYPE)));
        assert!(!ntriples.contains("<B>"));
    }

    #[test]
    fn test_url_inside_text_is_a_local_name() {
        let ontology = synthesize(vec![shape(1, "Foo http://x.org/a", "Class")]).unwrap();

        let declarations: Vec<(&Iri, EntityKind)> = ontology.declarations().collect();
        assert_eq!(
            declarations,
            [(&Iri::new(format!("{BASE}#Foo-http://x.org/a")), EntityKind::Class)]
        );
    }

    #[test]
    fn test_same_text_declares_once() {
        let ontology = synthesize(vec![shape(1, "Dog", "Class"), shape(2, "Dog", "Class")]).unwrap();
        assert_eq!(ontology.declarations().count(), 1);
    }

    #[test]
    fn test_outcome_keeps_first_error() {
        let mut outcome = Outcome::default();
        outcome.record(Ok(()));
        assert!(!outcome.is_failed());
        outcome.record(Err(SynthError::NoOntologyRoot));
        outcome.record(Err(SynthError::MultipleOntologyRoots {
            locations: Vec::new(),
        }));
        assert_eq!(outcome.finish(), Err(SynthError::NoOntologyRoot));
    }
}
