//! Error codes and document construction errors.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Document structure errors (malformed input)
//! - `E2xx` - Ontology root errors
//! - `E3xx` - Naming errors
//! - `E4xx` - Graphic semantic errors

use std::fmt;

use thiserror::Error;

/// Error codes for categorizing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E1xx)
    // =========================================================================
    /// Missing required key.
    ///
    /// A record lacks a key the document schema requires, such as a
    /// graphic's `ID` or a sheet's `GraphicsList`.
    E100,

    /// Unexpected value type.
    ///
    /// A key is present but holds a value of the wrong type.
    E101,

    /// Unknown graphic class.
    ///
    /// The `Class` discriminant names a graphic kind that is not supported.
    E102,

    /// Duplicate graphic ID.
    ///
    /// Two graphics on the same sheet share an ID.
    E103,

    /// Invalid geometry.
    ///
    /// A bounds or point value could not be read.
    E104,

    /// Malformed table grid.
    ///
    /// A table has no rows, an empty row, or rows of unequal length.
    E105,

    // =========================================================================
    // Ontology Root Errors (E2xx)
    // =========================================================================
    /// No ontology root.
    ///
    /// No group in the document declares the ontology URI.
    E200,

    /// Multiple ontology roots.
    ///
    /// More than one group declares an ontology URI.
    E201,

    // =========================================================================
    // Naming Errors (E3xx)
    // =========================================================================
    /// Unknown prefix.
    ///
    /// A `prefix:local` name uses a prefix that was never declared.
    E300,

    /// Blank entity name.
    ///
    /// A role-bearing shape has no usable text to derive a name from.
    E301,

    // =========================================================================
    // Graphic Semantic Errors (E4xx)
    // =========================================================================
    /// Wrong kind of graphic.
    ///
    /// A class, individual, property or connector was required but a
    /// different graphic was found.
    E400,

    /// Missing connector endpoint.
    ///
    /// A semantic connector has no head or tail.
    E401,

    /// Ambiguous or missing property label.
    ///
    /// A relationship line carries zero or several property labels.
    E402,

    /// Insufficient operands.
    ///
    /// An n-ary constructor (union, intersection, disjointness) has fewer
    /// members than it requires.
    E403,

    /// Malformed semantic table.
    ///
    /// An annotation, imports or property grid table has too few columns.
    E404,

    /// Invalid ontology root.
    ///
    /// A group annotated `Ontology` does not hold an absolute URI.
    E405,
}

impl ErrorCode {
    /// Returns the code as a string slice (e.g. `"E100"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E100 => "E100",
            Self::E101 => "E101",
            Self::E102 => "E102",
            Self::E103 => "E103",
            Self::E104 => "E104",
            Self::E105 => "E105",
            Self::E200 => "E200",
            Self::E201 => "E201",
            Self::E300 => "E300",
            Self::E301 => "E301",
            Self::E400 => "E400",
            Self::E401 => "E401",
            Self::E402 => "E402",
            Self::E403 => "E403",
            Self::E404 => "E404",
            Self::E405 => "E405",
        }
    }

    /// Returns a short description of the error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::E100 => "missing required key",
            Self::E101 => "unexpected value type",
            Self::E102 => "unknown graphic class",
            Self::E103 => "duplicate graphic ID",
            Self::E104 => "invalid geometry",
            Self::E105 => "malformed table grid",
            Self::E200 => "no ontology root",
            Self::E201 => "multiple ontology roots",
            Self::E300 => "unknown prefix",
            Self::E301 => "blank entity name",
            Self::E400 => "wrong kind of graphic",
            Self::E401 => "missing connector endpoint",
            Self::E402 => "ambiguous or missing property label",
            Self::E403 => "insufficient operands",
            Self::E404 => "malformed semantic table",
            Self::E405 => "invalid ontology root",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded document that violates the expected schema.
///
/// Every variant carries the path of the offending value inside the
/// document tree, written as a slash-separated pointer such as
/// `/Sheets/0/GraphicsList/3/ID`. Construction stops at the first
/// violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("malformed document: missing key `{path}`")]
    MissingKey { path: String },

    #[error("malformed document: expected {expected} at `{path}`")]
    WrongType {
        path: String,
        expected: &'static str,
    },

    #[error("malformed document: unknown graphic class `{class}` at `{path}`")]
    UnknownClass { path: String, class: String },

    #[error("malformed document: duplicate graphic ID {id} at `{path}`")]
    DuplicateId { path: String, id: i64 },

    #[error("malformed document: invalid geometry `{text}` at `{path}`")]
    InvalidGeometry { path: String, text: String },

    #[error("malformed document: {reason} at `{path}`")]
    MalformedTable { path: String, reason: &'static str },
}

impl DocumentError {
    /// Returns the path of the offending value.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingKey { path }
            | Self::WrongType { path, .. }
            | Self::UnknownClass { path, .. }
            | Self::DuplicateId { path, .. }
            | Self::InvalidGeometry { path, .. }
            | Self::MalformedTable { path, .. } => path,
        }
    }

    /// Returns the error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingKey { .. } => ErrorCode::E100,
            Self::WrongType { .. } => ErrorCode::E101,
            Self::UnknownClass { .. } => ErrorCode::E102,
            Self::DuplicateId { .. } => ErrorCode::E103,
            Self::InvalidGeometry { .. } => ErrorCode::E104,
            Self::MalformedTable { .. } => ErrorCode::E105,
        }
    }
}
