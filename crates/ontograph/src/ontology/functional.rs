//! OWL 2 functional-style syntax writer.

use std::fmt::Write as _;

use super::{AnnotationValue, Axiom, ClassExpression, Iri, Literal, Ontology, vocab};
use crate::rdf::mapping::local_namespace;

/// Serializes `ontology` in functional-style syntax.
#[must_use]
pub fn to_functional(ontology: &Ontology) -> String {
    let mut out = String::with_capacity(4096);

    let _ = writeln!(out, "Prefix(:=<{}>)", local_namespace(ontology.iri()));
    for (prefix, namespace) in ontology.prefixes() {
        let _ = writeln!(out, "Prefix({prefix}:=<{namespace}>)");
    }
    out.push('\n');
    let _ = writeln!(out, "Ontology({}", iri(ontology.iri()));

    for import in ontology.imports() {
        let _ = writeln!(out, "Import({})", iri(import));
    }
    for annotation in ontology.annotations() {
        if annotation.property().as_str() == vocab::OWL_IMPORTS {
            continue;
        }
        let value = annotation_value(annotation.value());
        if annotation.subject() == ontology.iri() {
            let _ = writeln!(out, "Annotation({} {value})", iri(annotation.property()));
        } else {
            let _ = writeln!(
                out,
                "AnnotationAssertion({} {} {value})",
                iri(annotation.property()),
                iri(annotation.subject())
            );
        }
    }

    out.push('\n');
    for (entity, kind) in ontology.declarations() {
        let _ = writeln!(out, "Declaration({}({}))", kind.keyword(), iri(entity));
    }

    out.push('\n');
    for axiom in ontology.axioms() {
        let _ = writeln!(out, "{}({})", axiom.name(), axiom_arguments(axiom));
    }
    out.push_str(")\n");

    out
}

fn iri(iri: &Iri) -> String {
    format!("<{iri}>")
}

fn literal(literal: &Literal) -> String {
    let escaped = literal.lexical().replace('\\', "\\\\").replace('"', "\\\"");
    match literal.datatype() {
        Some(datatype) => format!("\"{escaped}\"^^{}", iri(datatype)),
        None => format!("\"{escaped}\""),
    }
}

fn annotation_value(value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::Iri(target) => iri(target),
        AnnotationValue::Literal(value) => literal(value),
    }
}

fn class(expression: &ClassExpression) -> String {
    match expression {
        ClassExpression::Class(name) => iri(name),
        ClassExpression::UnionOf(operands) => format!("ObjectUnionOf({})", classes(operands)),
        ClassExpression::IntersectionOf(operands) => {
            format!("ObjectIntersectionOf({})", classes(operands))
        }
        ClassExpression::ComplementOf(operand) => {
            format!("ObjectComplementOf({})", class(operand))
        }
        ClassExpression::OneOf(individuals) => format!("ObjectOneOf({})", iris(individuals)),
    }
}

fn classes<'a>(expressions: impl IntoIterator<Item = &'a ClassExpression>) -> String {
    expressions
        .into_iter()
        .map(class)
        .collect::<Vec<_>>()
        .join(" ")
}

fn iris<'a>(names: impl IntoIterator<Item = &'a Iri>) -> String {
    names.into_iter().map(iri).collect::<Vec<_>>().join(" ")
}

fn axiom_arguments(axiom: &Axiom) -> String {
    match axiom {
        Axiom::SubClassOf { sub, sup } => format!("{} {}", class(sub), class(sup)),
        Axiom::EquivalentClasses(operands) | Axiom::DisjointClasses(operands) => {
            classes(operands)
        }
        Axiom::DisjointUnion { class: name, members } => {
            format!("{} {}", iri(name), classes(members))
        }
        Axiom::SubPropertyOf { sub, sup, .. } => format!("{} {}", iri(sub), iri(sup)),
        Axiom::ClassAssertion {
            class: expression,
            individual,
        } => format!("{} {}", class(expression), iri(individual)),
        Axiom::ObjectPropertyAssertion {
            property,
            subject,
            object,
        } => format!("{} {} {}", iri(property), iri(subject), iri(object)),
        Axiom::DataPropertyAssertion {
            property,
            subject,
            value,
        } => format!("{} {} {}", iri(property), iri(subject), literal(value)),
        Axiom::SameIndividuals(individuals) | Axiom::DifferentIndividuals(individuals) => {
            iris(individuals)
        }
    }
}
