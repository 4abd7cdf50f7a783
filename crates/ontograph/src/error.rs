//! Error types for Ontograph operations.
//!
//! This module provides the main error type [`OntographError`] which wraps
//! the failures of every pipeline stage: reading, decoding, building the
//! diagram model, synthesis and export.

use std::io;

use thiserror::Error;

use ontograph_core::error::{DocumentError, ErrorCode};

use crate::{ontology::InvalidIri, synth::SynthError};

/// The main error type for Ontograph operations.
#[derive(Debug, Error)]
pub enum OntographError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Synthesis(#[from] SynthError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] InvalidIri),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for OntographError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl OntographError {
    /// The stable code of document and synthesis errors.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Document(err) => Some(err.code()),
            Self::Synthesis(err) => Some(err.code()),
            Self::Io(_) | Self::Json(_) | Self::Serialize(_) | Self::Export(_) => None,
        }
    }
}
