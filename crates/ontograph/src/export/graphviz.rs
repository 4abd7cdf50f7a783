//! Graphviz DOT rendering of a triple graph.
//!
//! IRIs and blank nodes become ellipses, literals become boxes, and every
//! triple becomes an edge labelled with its predicate. IRIs are shortened
//! with the graph's bound prefixes.

use dot_structures::{Attribute, Edge, EdgeTy, Graph, Id, Node, NodeId, Stmt, Vertex};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use indexmap::IndexMap;
use log::debug;

use crate::rdf::{Term, TripleGraph};

/// Renders `graph` as a DOT digraph.
pub fn to_dot(graph: &TripleGraph) -> String {
    let mut nodes: IndexMap<&Term, String> = IndexMap::new();
    let mut stmts = Vec::new();

    for triple in graph.triples() {
        let subject = vertex(graph, triple.subject(), &mut nodes, &mut stmts);
        let object = vertex(graph, triple.object(), &mut nodes, &mut stmts);

        stmts.push(Stmt::Edge(Edge {
            ty: EdgeTy::Pair(
                Vertex::N(NodeId(Id::Plain(subject), None)),
                Vertex::N(NodeId(Id::Plain(object), None)),
            ),
            attributes: vec![attribute(
                "label",
                &shorten(graph, triple.predicate().as_str()),
            )],
        }));
    }

    debug!(nodes = nodes.len(), edges = graph.len(); "Rendering DOT graph");

    let dot = Graph::DiGraph {
        id: Id::Plain("diagram".to_string()),
        strict: false,
        stmts,
    };
    dot.print(&mut PrinterContext::default())
}

/// Returns the DOT id of `term`, declaring the node on first use.
fn vertex<'g>(
    graph: &TripleGraph,
    term: &'g Term,
    nodes: &mut IndexMap<&'g Term, String>,
    stmts: &mut Vec<Stmt>,
) -> String {
    if let Some(id) = nodes.get(term) {
        return id.clone();
    }
    let id = format!("n{}", nodes.len());
    stmts.push(Stmt::Node(Node {
        id: NodeId(Id::Plain(id.clone()), None),
        attributes: node_attributes(graph, term),
    }));
    nodes.insert(term, id.clone());
    id
}

fn node_attributes(graph: &TripleGraph, term: &Term) -> Vec<Attribute> {
    match term {
        Term::Iri(iri) => vec![attribute("label", &shorten(graph, iri.as_str()))],
        Term::Blank(_) => vec![attribute("label", ""), attribute("shape", "point")],
        Term::Literal(literal) => vec![
            attribute("label", literal.lexical()),
            attribute("shape", "box"),
        ],
    }
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(name.to_string()), quoted(value))
}

fn quoted(value: &str) -> Id {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    Id::Escaped(format!("\"{escaped}\""))
}

/// `prefix:local` when a bound namespace matches, the full IRI otherwise
fn shorten(graph: &TripleGraph, iri: &str) -> String {
    graph
        .prefixes()
        .iter()
        .find_map(|(prefix, namespace)| {
            iri.strip_prefix(namespace.as_str())
                .map(|local| format!("{prefix}:{local}"))
        })
        .unwrap_or_else(|| iri.to_string())
}
