//! Ontograph Core Types and Definitions
//!
//! This crate provides the diagram object model that the Ontograph
//! translator works on. It includes:
//!
//! - **Geometry**: Rectangles with intersection and containment tests ([`geometry`] module)
//! - **Document access**: Typed getters over the decoded document tree ([`document`] module)
//! - **Model**: Diagrams, pages and graphics ([`model`] module)
//! - **Construction**: Two-phase building of the model ([`build`] module)
//! - **Traversal**: The visitor protocol used by every pass ([`visit`] module)
//! - **Errors**: Error codes and document errors ([`error`] module)

pub mod build;
pub mod document;
pub mod error;
pub mod geometry;
pub mod model;
pub mod visit;

mod relate;
