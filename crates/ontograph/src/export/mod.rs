//! Export of the diagram model itself, independent of any ontology.
//!
//! [`graph::diagram_to_graph`] mirrors every structural relation of a
//! [`Diagram`](ontograph_core::model::Diagram) into a [`TripleGraph`], which
//! is then written as Turtle or N-Triples. With the `graphviz` feature the
//! same graph can be rendered as Graphviz DOT.

pub mod graph;
#[cfg(feature = "graphviz")]
pub mod graphviz;

use thiserror::Error;

use crate::{
    ontology::{InvalidIri, OutputFormat},
    rdf::TripleGraph,
};

/// Errors raised while exporting the diagram graph.
#[derive(Debug, Error)]
pub enum Error {
    #[error("graph export cannot be written as {0}")]
    UnsupportedFormat(OutputFormat),
    #[error(transparent)]
    InvalidIri(#[from] InvalidIri),
}

/// Writes an exported graph in one of the triple formats.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for formats that are not triple based
/// and [`Error::InvalidIri`] when the graph holds an IRI that cannot be written.
pub fn render_graph(graph: &TripleGraph, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Turtle => Ok(graph.to_turtle()?),
        OutputFormat::NTriples => Ok(graph.to_ntriples()?),
        OutputFormat::Functional => Err(Error::UnsupportedFormat(format)),
    }
}
