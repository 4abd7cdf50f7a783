//! Synthesis errors.

use std::fmt;

use thiserror::Error;

use ontograph_core::{error::ErrorCode, model::Location};

use crate::role::Role;

/// A connector end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Head,
    Tail,
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Tail => f.write_str("tail"),
        }
    }
}

/// What is wrong with a graphic that carries semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("expected {expected}, found {found}")]
    WrongKind {
        expected: &'static str,
        found: String,
    },

    #[error("{role} connector has no {end}")]
    MissingEndpoint { role: Role, end: End },

    #[error("relationship line has no property label")]
    MissingProperty,

    #[error("relationship line has {count} property labels, expected one")]
    AmbiguousProperty { count: usize },

    #[error("{role} needs at least {required} members, found {found}")]
    InsufficientOperands {
        role: Role,
        required: usize,
        found: usize,
    },

    #[error(
        "DisjointUnion needs at least 2 members, found {found}; draw one DisjointUnion \
         line from each member class to the union class, or one from the union class \
         to a Disjoint connector"
    )]
    InsufficientUnionMembers { found: usize },

    #[error("{role} table needs at least {required} columns, found {found}")]
    MalformedTable {
        role: &'static str,
        required: usize,
        found: usize,
    },

    #[error("ontology group text '{text}' is not an absolute URI")]
    InvalidOntologyRoot { text: String },
}

impl Fault {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::WrongKind { .. } => ErrorCode::E400,
            Self::MissingEndpoint { .. } => ErrorCode::E401,
            Self::MissingProperty | Self::AmbiguousProperty { .. } => ErrorCode::E402,
            Self::InsufficientOperands { .. } | Self::InsufficientUnionMembers { .. } => {
                ErrorCode::E403
            }
            Self::MalformedTable { .. } => ErrorCode::E404,
            Self::InvalidOntologyRoot { .. } => ErrorCode::E405,
        }
    }
}

/// Errors raised while translating a diagram into an ontology.
///
/// Every error aborts the translation; no partial ontology is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("no ontology root: no group holds an absolute ontology URI")]
    NoOntologyRoot,

    #[error("multiple ontology roots: {}", join(.locations))]
    MultipleOntologyRoots { locations: Vec<Location> },

    #[error("unknown prefix '{prefix}' in '{name}' at {location}")]
    UnknownPrefix {
        prefix: String,
        name: String,
        location: Location,
    },

    #[error("{role} at {location} has no name")]
    BlankEntityName { role: Role, location: Location },

    #[error("{location}: {fault}")]
    GraphicSemantic { fault: Fault, location: Location },
}

impl SynthError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoOntologyRoot => ErrorCode::E200,
            Self::MultipleOntologyRoots { .. } => ErrorCode::E201,
            Self::UnknownPrefix { .. } => ErrorCode::E300,
            Self::BlankEntityName { .. } => ErrorCode::E301,
            Self::GraphicSemantic { fault, .. } => fault.code(),
        }
    }

    /// The location of the offending graphic, when there is a single one
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::NoOntologyRoot | Self::MultipleOntologyRoots { .. } => None,
            Self::UnknownPrefix { location, .. }
            | Self::BlankEntityName { location, .. }
            | Self::GraphicSemantic { location, .. } => Some(location),
        }
    }
}

fn join(locations: &[Location]) -> String {
    locations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
