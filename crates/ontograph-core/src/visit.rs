//! Traversal protocol over the diagram model.
//!
//! A [`DiagramVisitor`] receives a `*_start`/`*_end` pair for every
//! container (diagram, page, group, line, table) and a single call for
//! every leaf (shape, connector shape). A `*_start` hook returns a [`Visit`]
//! deciding what happens to the container's children:
//!
//! - [`Visit::Continue`] descends with the same visitor,
//! - [`Visit::Delegate`] descends with another visitor,
//! - [`Visit::Skip`] skips the children.
//!
//! The matching `*_end` hook runs in every case.
//!
//! Traversal order is diagram, then each page, then each page root in
//! record order, depth first. Group children come in record order, line
//! labels from tail to head, table cells row by row.
//!
//! # Depth
//!
//! The default container hooks consult [`DiagramVisitor::depth`]. A
//! [`Depth::Deep`] visitor descends everywhere. A [`Depth::Shallow`] visitor
//! descends into pages but skips the children of groups, lines and tables;
//! overriding one of those hooks opts that container back in.
//!
//! # Examples
//!
//! ```
//! # use ontograph_core::{build::build_diagram, model::Node, visit::{walk, DiagramVisitor}};
//! # use serde_json::json;
//! #[derive(Default)]
//! struct ShapeCounter {
//!     shapes: usize,
//! }
//!
//! impl<'d> DiagramVisitor<'d> for ShapeCounter {
//!     fn shape(&mut self, _shape: Node<'d>) {
//!         self.shapes += 1;
//!     }
//! }
//!
//! let document = json!({
//!     "GraphicsList": [
//!         { "Class": "ShapedGraphic", "ID": 1, "Bounds": "{{0, 0}, {1, 1}}" },
//!         { "Class": "Group", "ID": 2, "Graphics": [
//!             { "Class": "ShapedGraphic", "ID": 3, "Bounds": "{{0, 0}, {1, 1}}" }
//!         ]}
//!     ]
//! });
//! let diagram = build_diagram(&document).unwrap();
//!
//! let mut counter = ShapeCounter::default();
//! walk(&diagram, &mut counter);
//! assert_eq!(counter.shapes, 2);
//! ```

use crate::model::{Diagram, GraphicKind, Node, Page};

/// What to do with the children of a container.
pub enum Visit<'v, 'd> {
    /// Visit the children with the current visitor
    Continue,
    /// Visit the children with another visitor
    Delegate(&'v mut dyn DiagramVisitor<'d>),
    /// Do not visit the children
    Skip,
}

/// Default descent policy of a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    /// Descend into every container
    #[default]
    Deep,
    /// Descend into pages only
    Shallow,
}

impl Depth {
    fn nested<'v, 'd>(self) -> Visit<'v, 'd> {
        match self {
            Self::Deep => Visit::Continue,
            Self::Shallow => Visit::Skip,
        }
    }
}

/// Hooks invoked while walking a [`Diagram`].
///
/// Every hook has a default, so visitors only implement what they need.
pub trait DiagramVisitor<'d> {
    /// Descent policy used by the default container hooks
    fn depth(&self) -> Depth {
        Depth::Deep
    }

    fn diagram_start(&mut self, _diagram: &'d Diagram) -> Visit<'_, 'd> {
        Visit::Continue
    }

    fn diagram_end(&mut self, _diagram: &'d Diagram) {}

    fn page_start(&mut self, _page: &'d Page) -> Visit<'_, 'd> {
        Visit::Continue
    }

    fn page_end(&mut self, _page: &'d Page) {}

    fn group_start(&mut self, _group: Node<'d>) -> Visit<'_, 'd> {
        self.depth().nested()
    }

    fn group_end(&mut self, _group: Node<'d>) {}

    fn line_start(&mut self, _line: Node<'d>) -> Visit<'_, 'd> {
        self.depth().nested()
    }

    fn line_end(&mut self, _line: Node<'d>) {}

    fn table_start(&mut self, _table: Node<'d>) -> Visit<'_, 'd> {
        self.depth().nested()
    }

    fn table_end(&mut self, _table: Node<'d>) {}

    fn shape(&mut self, _shape: Node<'d>) {}

    fn connector_shape(&mut self, _shape: Node<'d>) {}
}

/// Walks `diagram`, calling `visitor` hooks in traversal order.
pub fn walk<'d>(diagram: &'d Diagram, visitor: &mut dyn DiagramVisitor<'d>) {
    match visitor.diagram_start(diagram) {
        Visit::Continue => walk_pages(diagram, visitor),
        Visit::Delegate(child) => walk_pages(diagram, child),
        Visit::Skip => {}
    }
    visitor.diagram_end(diagram);
}

fn walk_pages<'d>(diagram: &'d Diagram, visitor: &mut dyn DiagramVisitor<'d>) {
    for page in diagram.pages() {
        walk_page(diagram, page, visitor);
    }
}

/// Walks a single page, calling `visitor` hooks in traversal order.
pub fn walk_page<'d>(diagram: &'d Diagram, page: &'d Page, visitor: &mut dyn DiagramVisitor<'d>) {
    match visitor.page_start(page) {
        Visit::Continue => walk_roots(diagram, page, visitor),
        Visit::Delegate(child) => walk_roots(diagram, page, child),
        Visit::Skip => {}
    }
    visitor.page_end(page);
}

fn walk_roots<'d>(diagram: &'d Diagram, page: &'d Page, visitor: &mut dyn DiagramVisitor<'d>) {
    for root in page.roots() {
        walk_node(diagram.node(*root), visitor);
    }
}

fn walk_all<'d>(
    nodes: impl Iterator<Item = Node<'d>>,
    visitor: &mut dyn DiagramVisitor<'d>,
) {
    for node in nodes {
        walk_node(node, visitor);
    }
}

/// Walks one graphic and its descendants.
pub fn walk_node<'d>(node: Node<'d>, visitor: &mut dyn DiagramVisitor<'d>) {
    match node.graphic().kind() {
        GraphicKind::Shape(_) => visitor.shape(node),
        GraphicKind::ConnectorShape(_) => visitor.connector_shape(node),
        GraphicKind::Group(_) => {
            match visitor.group_start(node) {
                Visit::Continue => walk_all(node.children(), visitor),
                Visit::Delegate(child) => walk_all(node.children(), child),
                Visit::Skip => {}
            }
            visitor.group_end(node);
        }
        GraphicKind::Line(_) => {
            match visitor.line_start(node) {
                Visit::Continue => walk_all(node.labels(), visitor),
                Visit::Delegate(child) => walk_all(node.labels(), child),
                Visit::Skip => {}
            }
            visitor.line_end(node);
        }
        GraphicKind::Table(_) => {
            match visitor.table_start(node) {
                Visit::Continue => walk_all(node.cells(), visitor),
                Visit::Delegate(child) => walk_all(node.cells(), child),
                Visit::Skip => {}
            }
            visitor.table_end(node);
        }
    }
}
