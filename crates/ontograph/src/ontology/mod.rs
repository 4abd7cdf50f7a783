//! OWL 2 ontology model and the sink interface the translator writes to.
//!
//! # Overview
//!
//! - [`Iri`], [`Literal`], [`AnnotationValue`] - Terms.
//! - [`EntityKind`] - What a declared entity is.
//! - [`ClassExpression`] - Named classes and the boolean class constructors.
//! - [`Axiom`] - Every statement the translator can produce.
//! - [`OntologySink`] - Receives declarations, axioms and annotations.
//! - [`Ontology`] - The in-memory sink, with serialization to every [`OutputFormat`].
//!
//! n-ary operands are kept in ordered sets, so the same document always
//! renders to byte-identical output.

mod functional;
pub mod vocab;

use std::{collections::BTreeSet, fmt, str::FromStr};

use indexmap::IndexSet;
use log::trace;
use serde::Deserialize;
use thiserror::Error;

use crate::rdf;

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the IRI starts with a scheme and holds only
    /// characters allowed in an IRI.
    pub fn is_valid(&self) -> bool {
        self.0
            .split_once(':')
            .is_some_and(|(scheme, _)| is_scheme(scheme))
            && self.0.chars().all(is_iri_char)
    }
}

/// An IRI that cannot be written to any output format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot write invalid IRI <{0}>")]
pub struct InvalidIri(pub Iri);

/// Returns true for characters allowed unescaped in an IRI.
pub(crate) fn is_iri_char(c: char) -> bool {
    !c.is_control()
        && !c.is_whitespace()
        && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

/// Returns true for an IRI scheme such as `http` or `urn`.
pub(crate) fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

/// The kind of a declared entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Class,
    Individual,
    ObjectProperty,
    DataProperty,
}

impl EntityKind {
    /// Keyword used by the functional syntax
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Individual => "NamedIndividual",
            Self::ObjectProperty => "ObjectProperty",
            Self::DataProperty => "DataProperty",
        }
    }

    /// The `rdf:type` a declaration maps to
    pub fn rdf_type(self) -> &'static str {
        match self {
            Self::Class => vocab::OWL_CLASS,
            Self::Individual => vocab::OWL_NAMED_INDIVIDUAL,
            Self::ObjectProperty => vocab::OWL_OBJECT_PROPERTY,
            Self::DataProperty => vocab::OWL_DATATYPE_PROPERTY,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Individual => "individual",
            Self::ObjectProperty => "object property",
            Self::DataProperty => "data property",
        };
        f.write_str(name)
    }
}

/// A class, or a boolean combination of classes and individuals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassExpression {
    Class(Iri),
    UnionOf(BTreeSet<ClassExpression>),
    IntersectionOf(BTreeSet<ClassExpression>),
    ComplementOf(Box<ClassExpression>),
    OneOf(BTreeSet<Iri>),
}

impl ClassExpression {
    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::Class(iri.into())
    }

    /// The IRI of a named class
    pub fn as_class(&self) -> Option<&Iri> {
        match self {
            Self::Class(iri) => Some(iri),
            _ => None,
        }
    }
}

impl From<Iri> for ClassExpression {
    fn from(iri: Iri) -> Self {
        Self::Class(iri)
    }
}

/// A literal value; untyped literals are plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: Option<Iri>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype),
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }
}

/// The object of an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationValue {
    Literal(Literal),
    Iri(Iri),
}

/// Which property hierarchy a [`Axiom::SubPropertyOf`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKind {
    Object,
    Data,
}

/// A logical statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axiom {
    SubClassOf {
        sub: ClassExpression,
        sup: ClassExpression,
    },
    EquivalentClasses(BTreeSet<ClassExpression>),
    DisjointClasses(BTreeSet<ClassExpression>),
    DisjointUnion {
        class: Iri,
        members: BTreeSet<ClassExpression>,
    },
    SubPropertyOf {
        kind: PropertyKind,
        sub: Iri,
        sup: Iri,
    },
    ClassAssertion {
        class: ClassExpression,
        individual: Iri,
    },
    ObjectPropertyAssertion {
        property: Iri,
        subject: Iri,
        object: Iri,
    },
    DataPropertyAssertion {
        property: Iri,
        subject: Iri,
        value: Literal,
    },
    SameIndividuals(BTreeSet<Iri>),
    DifferentIndividuals(BTreeSet<Iri>),
}

impl Axiom {
    /// Functional-syntax name of the axiom type
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubClassOf { .. } => "SubClassOf",
            Self::EquivalentClasses(_) => "EquivalentClasses",
            Self::DisjointClasses(_) => "DisjointClasses",
            Self::DisjointUnion { .. } => "DisjointUnion",
            Self::SubPropertyOf {
                kind: PropertyKind::Object,
                ..
            } => "SubObjectPropertyOf",
            Self::SubPropertyOf {
                kind: PropertyKind::Data,
                ..
            } => "SubDataPropertyOf",
            Self::ClassAssertion { .. } => "ClassAssertion",
            Self::ObjectPropertyAssertion { .. } => "ObjectPropertyAssertion",
            Self::DataPropertyAssertion { .. } => "DataPropertyAssertion",
            Self::SameIndividuals(_) => "SameIndividual",
            Self::DifferentIndividuals(_) => "DifferentIndividuals",
        }
    }
}

/// An annotation triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    subject: Iri,
    property: Iri,
    value: AnnotationValue,
}

impl Annotation {
    pub fn subject(&self) -> &Iri {
        &self.subject
    }

    pub fn property(&self) -> &Iri {
        &self.property
    }

    pub fn value(&self) -> &AnnotationValue {
        &self.value
    }
}

/// Wire format of a serialized ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Turtle,
    NTriples,
    Functional,
}

impl OutputFormat {
    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
            Self::Functional => "ofn",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "nt" => Ok(Self::NTriples),
            "functional" | "ofn" => Ok(Self::Functional),
            other => Err(format!(
                "unknown output format '{other}' (expected turtle, ntriples or functional)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Turtle => "turtle",
            Self::NTriples => "ntriples",
            Self::Functional => "functional",
        };
        f.write_str(name)
    }
}

/// Receives the output of the translator.
pub trait OntologySink {
    /// Declares an entity. Declaring the same entity twice has no effect.
    fn declare_entity(&mut self, iri: &Iri, kind: EntityKind);

    fn add_axiom(&mut self, axiom: Axiom);

    fn add_annotation(&mut self, subject: &Iri, property: &Iri, value: AnnotationValue);

    /// Binds a namespace prefix for serialization
    fn bind_prefix(&mut self, _prefix: &str, _namespace: &str) {}

    fn serialize(&self, format: OutputFormat) -> Result<Vec<u8>, InvalidIri>;
}

/// An ontology held in memory.
///
/// Everything keeps insertion order and duplicates are dropped.
#[derive(Debug, Clone)]
pub struct Ontology {
    iri: Iri,
    prefixes: Vec<(String, String)>,
    declarations: IndexSet<(Iri, EntityKind)>,
    axioms: IndexSet<Axiom>,
    annotations: IndexSet<Annotation>,
}

impl Ontology {
    /// Creates an empty ontology with the default prefixes bound.
    pub fn new(iri: Iri) -> Self {
        let mut ontology = Self {
            iri,
            prefixes: Vec::new(),
            declarations: IndexSet::new(),
            axioms: IndexSet::new(),
            annotations: IndexSet::new(),
        };
        for (prefix, namespace) in vocab::DEFAULT_PREFIXES {
            ontology.bind_prefix(prefix, namespace);
        }
        ontology
    }

    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    /// Bound prefixes in binding order
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    pub fn prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(name, _)| name == prefix)
            .map(|(_, namespace)| namespace.as_str())
    }

    pub fn declarations(&self) -> impl Iterator<Item = (&Iri, EntityKind)> {
        self.declarations.iter().map(|(iri, kind)| (iri, *kind))
    }

    pub fn is_declared(&self, iri: &Iri, kind: EntityKind) -> bool {
        self.declarations.contains(&(iri.clone(), kind))
    }

    pub fn axioms(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter()
    }

    pub fn contains_axiom(&self, axiom: &Axiom) -> bool {
        self.axioms.contains(axiom)
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Ontologies imported through `owl:imports` annotations
    pub fn imports(&self) -> impl Iterator<Item = &Iri> {
        self.annotations.iter().filter_map(|annotation| {
            match (&annotation.value, annotation.property.as_str()) {
                (AnnotationValue::Iri(target), vocab::OWL_IMPORTS)
                    if annotation.subject == self.iri =>
                {
                    Some(target)
                }
                _ => None,
            }
        })
    }

    /// Forwards every prefix, declaration, annotation and axiom to `sink`.
    pub fn replay_into(&self, sink: &mut dyn OntologySink) {
        for (prefix, namespace) in self.prefixes() {
            sink.bind_prefix(prefix, namespace);
        }
        for (iri, kind) in self.declarations() {
            sink.declare_entity(iri, kind);
        }
        for annotation in &self.annotations {
            sink.add_annotation(
                &annotation.subject,
                &annotation.property,
                annotation.value.clone(),
            );
        }
        for axiom in &self.axioms {
            sink.add_axiom(axiom.clone());
        }
    }

    /// Serializes the ontology to text.
    ///
    /// Fails without writing anything if any IRI in the ontology is invalid.
    pub fn render(&self, format: OutputFormat) -> Result<String, InvalidIri> {
        let graph = rdf::mapping::ontology_to_graph(self);
        match format {
            OutputFormat::Turtle => graph.to_turtle(),
            OutputFormat::NTriples => graph.to_ntriples(),
            OutputFormat::Functional => {
                graph.validate()?;
                Ok(functional::to_functional(self))
            }
        }
    }
}

impl OntologySink for Ontology {
    fn declare_entity(&mut self, iri: &Iri, kind: EntityKind) {
        if self.declarations.insert((iri.clone(), kind)) {
            trace!(iri:% = iri, kind:% = kind; "Declared entity");
        }
    }

    fn add_axiom(&mut self, axiom: Axiom) {
        trace!(axiom:? = axiom; "Adding axiom");
        self.axioms.insert(axiom);
    }

    fn add_annotation(&mut self, subject: &Iri, property: &Iri, value: AnnotationValue) {
        self.annotations.insert(Annotation {
            subject: subject.clone(),
            property: property.clone(),
            value,
        });
    }

    fn bind_prefix(&mut self, prefix: &str, namespace: &str) {
        match self.prefixes.iter_mut().find(|(name, _)| name == prefix) {
            Some(entry) => entry.1 = namespace.to_string(),
            None => self
                .prefixes
                .push((prefix.to_string(), namespace.to_string())),
        }
    }

    fn serialize(&self, format: OutputFormat) -> Result<Vec<u8>, InvalidIri> {
        self.render(format).map(String::into_bytes)
    }
}
