//! Configuration types for ontology translation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as TOML files. Every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`OntologyConfig`] - Extra namespace prefixes available to every document.
//! - [`OutputConfig`] - The serialization format of the ontology.
//! - [`GraphConfig`] - Settings of the diagram graph export.
//!
//! # Example
//!
//! ```
//! # use ontograph::{config::AppConfig, ontology::OutputFormat};
//! let config = AppConfig::default();
//! assert_eq!(config.output().format(), OutputFormat::Turtle);
//! assert_eq!(config.ontology().prefixes().count(), 0);
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use crate::ontology::OutputFormat;

/// Base IRI of graph export nodes when none is configured
pub const DEFAULT_GRAPH_BASE: &str = "urn:ontograph:diagram/";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ontology section.
    #[serde(default)]
    ontology: OntologyConfig,

    /// Output section.
    #[serde(default)]
    output: OutputConfig,

    /// Graph export section.
    #[serde(default)]
    graph: GraphConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(ontology: OntologyConfig, output: OutputConfig, graph: GraphConfig) -> Self {
        Self {
            ontology,
            output,
            graph,
        }
    }

    pub fn ontology(&self) -> &OntologyConfig {
        &self.ontology
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn graph(&self) -> &GraphConfig {
        &self.graph
    }

    /// Replaces the output format, keeping everything else.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }
}

/// Prefixes bound before a document's own `Imports` tables are read.
///
/// Document prefixes with the same name override these.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OntologyConfig {
    #[serde(default)]
    prefixes: IndexMap<String, String>,
}

impl OntologyConfig {
    pub fn new(prefixes: IndexMap<String, String>) -> Self {
        Self { prefixes }
    }

    /// Configured `(prefix, namespace)` pairs in file order
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OutputConfig {
    /// Serialization format, `turtle` unless configured.
    #[serde(default)]
    format: OutputFormat,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphConfig {
    /// Base IRI of graph nodes.
    #[serde(default)]
    base: Option<String>,
}

impl GraphConfig {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Returns the configured base, or [`DEFAULT_GRAPH_BASE`].
    pub fn base(&self) -> &str {
        self.base.as_deref().unwrap_or(DEFAULT_GRAPH_BASE)
    }
}
