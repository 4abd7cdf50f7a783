//! Turtle writer.
//!
//! Prefixes are declared up front, consecutive triples sharing a subject
//! are folded into one block, and IRIs are abbreviated whenever a bound
//! namespace leaves a plain local name.

use super::{Term, TripleGraph, escape};
use crate::ontology::vocab;

pub(super) fn write(graph: &TripleGraph) -> String {
    let mut out = String::with_capacity(graph.len() * 64 + 512);

    for (prefix, namespace) in graph.prefixes() {
        out.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
    }

    let mut current: Option<&Term> = None;
    for triple in graph.triples() {
        let predicate = if triple.predicate().as_str() == vocab::RDF_TYPE {
            "a".to_string()
        } else {
            iri(graph, triple.predicate().as_str())
        };
        let object = term(graph, triple.object());

        if current == Some(triple.subject()) {
            out.push_str(" ;\n    ");
        } else {
            if current.is_some() {
                out.push_str(" .\n");
            }
            out.push('\n');
            out.push_str(&term(graph, triple.subject()));
            out.push(' ');
            current = Some(triple.subject());
        }
        out.push_str(&predicate);
        out.push(' ');
        out.push_str(&object);
    }
    if current.is_some() {
        out.push_str(" .\n");
    }

    out
}

fn term(graph: &TripleGraph, term: &Term) -> String {
    match term {
        Term::Iri(value) => iri(graph, value.as_str()),
        Term::Blank(id) => format!("_:b{id}"),
        Term::Literal(literal) => match literal.datatype() {
            Some(datatype) => format!(
                "\"{}\"^^{}",
                escape(literal.lexical()),
                iri(graph, datatype.as_str())
            ),
            None => format!("\"{}\"", escape(literal.lexical())),
        },
    }
}

/// Abbreviates `value` with the longest matching namespace.
fn iri(graph: &TripleGraph, value: &str) -> String {
    graph
        .prefixes()
        .iter()
        .filter_map(|(prefix, namespace)| {
            value
                .strip_prefix(namespace.as_str())
                .filter(|local| is_plain_local(local))
                .map(|local| (namespace.len(), prefix, local))
        })
        .max_by_key(|(len, _, _)| *len)
        .map_or_else(
            || format!("<{value}>"),
            |(_, prefix, local)| format!("{prefix}:{local}"),
        )
}

fn is_plain_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{Iri, Literal};

    fn graph() -> TripleGraph {
        let mut graph = TripleGraph::new();
        graph.bind_prefix("owl", vocab::OWL);
        graph.bind_prefix("xsd", vocab::XSD);
        graph.bind_prefix("", "http://example.org/onto#");
        graph
    }

    #[test]
    fn test_folds_subjects_and_abbreviates() {
        let mut graph = graph();
        let dog = Term::iri("http://example.org/onto#Dog");
        graph.add(dog.clone(), vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
        graph.add(
            dog,
            vocab::RDFS_SUBCLASS_OF,
            Term::iri("http://example.org/onto#Animal"),
        );

        let text = write(&graph);
        assert!(text.starts_with("@prefix owl: <http://www.w3.org/2002/07/owl#> .\n"));
        assert!(text.contains(
            "\n:Dog a owl:Class ;\n    <http://www.w3.org/2000/01/rdf-schema#subClassOf> :Animal .\n"
        ));
    }

    #[test]
    fn test_keeps_full_iri_when_local_is_not_plain() {
        let graph = graph();
        assert_eq!(
            iri(&graph, "http://example.org/onto#has space"),
            "<http://example.org/onto#has space>"
        );
        assert_eq!(iri(&graph, "http://other.org/x"), "<http://other.org/x>");
        assert_eq!(iri(&graph, "http://example.org/onto#motor-vehicle"), ":motor-vehicle");
    }

    #[test]
    fn test_typed_literal() {
        let graph = graph();
        let literal = Term::Literal(Literal::typed(
            "42",
            Iri::new("http://www.w3.org/2001/XMLSchema#int"),
        ));
        assert_eq!(term(&graph, &literal), "\"42\"^^xsd:int");
    }

    #[test]
    fn test_empty_graph_has_only_prefixes() {
        let text = write(&graph());
        assert_eq!(text.lines().count(), 3);
    }
}
