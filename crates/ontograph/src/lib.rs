//! Ontograph - Translates annotated diagram documents into OWL ontologies.
//!
//! A diagram document is decoded from JSON into the diagram model of
//! `ontograph-core`, then synthesized into an [`Ontology`](ontology::Ontology)
//! and serialized as Turtle, N-Triples or functional-style syntax. The
//! diagram model can also be exported as-is, as a triple graph.

pub mod config;
pub mod export;
pub mod ontology;
pub mod rdf;
pub mod role;
pub mod synth;

mod error;

pub use ontograph_core::{error::ErrorCode, model};

pub use error::OntographError;

use log::{debug, info, trace};

use ontograph_core::{build::build_diagram, model::Diagram};

use config::AppConfig;
use ontology::Ontology;
use synth::Synthesizer;

/// Builder for loading diagrams and translating them.
///
/// This provides an API for processing diagram documents through
/// decoding, synthesis and serialization.
///
/// # Examples
///
/// ```rust
/// use ontograph::{OntologyBuilder, config::AppConfig};
///
/// let source = r#"{
///     "GraphicsList": [
///         { "Class": "Group", "ID": 1, "Text": "http://example.org/zoo", "Graphics": [
///             { "Class": "ShapedGraphic", "ID": 2, "Text": "Dog", "Notes": "Class", "Bounds": [0, 0, 50, 20] }
///         ]}
///     ]
/// }"#;
///
/// let builder = OntologyBuilder::new(AppConfig::default());
///
/// // Decode the document into the diagram model
/// let diagram = builder.load(source).expect("Failed to load");
///
/// // Synthesize and serialize with the configured format
/// let ontology = builder.synthesize(&diagram).expect("Failed to synthesize");
/// let turtle = builder.render(&ontology).expect("Failed to serialize");
/// assert!(turtle.contains("owl:Class"));
///
/// // Or use default config
/// let builder = OntologyBuilder::default();
/// ```
#[derive(Default)]
pub struct OntologyBuilder {
    config: AppConfig,
}

impl OntologyBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including prefixes and output settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decode a JSON document into the diagram model.
    ///
    /// # Errors
    ///
    /// Returns `OntographError::Json` for text that is not JSON and
    /// `OntographError::Document` for JSON that is not a diagram document.
    pub fn load(&self, source: &str) -> Result<Diagram, OntographError> {
        info!(bytes = source.len(); "Loading diagram document");

        let document: serde_json::Value = serde_json::from_str(source)?;
        let diagram = build_diagram(&document)?;

        debug!(
            pages = diagram.pages().len(),
            graphics = diagram.nodes().count();
            "Diagram model built"
        );
        Ok(diagram)
    }

    /// Translate a diagram into an ontology.
    ///
    /// Prefixes from the configuration are bound first, so a document
    /// binding the same prefix overrides them.
    ///
    /// # Errors
    ///
    /// Returns `OntographError::Synthesis` for the first semantic error
    /// found in the diagram.
    pub fn synthesize(&self, diagram: &Diagram) -> Result<Ontology, OntographError> {
        let synthesizer = self
            .config
            .ontology()
            .prefixes()
            .fold(Synthesizer::new(), |synthesizer, (prefix, namespace)| {
                synthesizer.with_prefix(prefix, namespace)
            });

        let ontology = synthesizer.synthesize(diagram)?;
        trace!(ontology:?; "Synthesized ontology");
        Ok(ontology)
    }

    /// Serialize an ontology in the configured output format.
    ///
    /// # Errors
    ///
    /// Returns `OntographError::Serialize` when the ontology holds an IRI
    /// that cannot be written, such as a configured prefix with a space.
    pub fn render(&self, ontology: &Ontology) -> Result<String, OntographError> {
        let format = self.config.output().format();
        info!(format:%; "Serializing ontology");
        Ok(ontology.render(format)?)
    }

    /// Export the diagram model itself in the configured output format.
    ///
    /// # Errors
    ///
    /// Returns `OntographError::Export` when the configured format is not
    /// a triple format.
    pub fn export_graph(&self, diagram: &Diagram) -> Result<String, OntographError> {
        let graph = export::graph::diagram_to_graph(diagram, self.config.graph().base());
        let text = export::render_graph(&graph, self.config.output().format())?;
        Ok(text)
    }

    /// Export the diagram model as a Graphviz DOT digraph.
    #[cfg(feature = "graphviz")]
    pub fn export_dot(&self, diagram: &Diagram) -> String {
        let graph = export::graph::diagram_to_graph(diagram, self.config.graph().base());
        export::graphviz::to_dot(&graph)
    }
}
