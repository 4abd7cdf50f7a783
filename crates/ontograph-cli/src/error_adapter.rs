//! Error adapter for converting OntographError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Document and
//! synthesis errors report their stable code and a short description of the
//! error category as help.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use ontograph::OntographError;

/// Adapter rendering an [`OntographError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a OntographError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if let Some(code) = self.0.code() {
            return Some(Box::new(code));
        }
        let code = match self.0 {
            OntographError::Io(_) => "ontograph::io",
            OntographError::Json(_) => "ontograph::json",
            OntographError::Serialize(_) => "ontograph::serialize",
            OntographError::Export(_) => "ontograph::export",
            OntographError::Document(_) | OntographError::Synthesis(_) => return None,
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.0
            .code()
            .map(|code| Box::new(code.description()) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wraps an [`OntographError`] for rendering by miette.
pub fn to_reportable(err: &OntographError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
