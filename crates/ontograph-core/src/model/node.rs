//! Borrowed navigation over the model.

use std::fmt;

use super::{Diagram, Graphic, GraphicId, GraphicRef, Location, Page};

/// A graphic together with the diagram it belongs to.
///
/// Nodes resolve [`GraphicRef`]s on the fly, so passes over the model can
/// follow relations without touching page arenas.
///
/// # Examples
///
/// ```
/// # use ontograph_core::build::build_diagram;
/// # use serde_json::json;
/// let document = json!({
///     "GraphicsList": [
///         { "Class": "ShapedGraphic", "ID": 1, "Bounds": "{{0, 0}, {10, 10}}" },
///         { "Class": "ShapedGraphic", "ID": 2, "Bounds": "{{50, 0}, {10, 10}}" },
///         { "Class": "LineGraphic", "ID": 3, "Tail": { "ID": 1 }, "Head": { "ID": 2 } },
///     ]
/// });
/// let diagram = build_diagram(&document).unwrap();
/// let page = &diagram.pages()[0];
/// let line = diagram.node(page.roots()[2]);
///
/// assert_eq!(line.tail().map(|n| n.id().value()), Some(1));
/// assert_eq!(line.head().map(|n| n.id().value()), Some(2));
/// ```
#[derive(Clone, Copy)]
pub struct Node<'d> {
    diagram: &'d Diagram,
    graphic: &'d Graphic,
}

impl<'d> Node<'d> {
    pub(crate) fn new(diagram: &'d Diagram, graphic: &'d Graphic) -> Self {
        Self { diagram, graphic }
    }

    pub fn graphic(self) -> &'d Graphic {
        self.graphic
    }

    pub fn diagram(self) -> &'d Diagram {
        self.diagram
    }

    /// The page holding this graphic
    pub fn page(self) -> &'d Page {
        self.diagram.page_of(self.graphic.reference())
    }

    pub fn id(self) -> GraphicId {
        self.graphic.id()
    }

    pub fn reference(self) -> GraphicRef {
        self.graphic.reference()
    }

    pub fn note(self) -> Option<&'d str> {
        self.graphic.note()
    }

    pub fn is_solid(self) -> bool {
        self.graphic.is_solid()
    }

    /// Display text of shape-like graphics
    pub fn text(self) -> Option<&'d str> {
        self.graphic.text()
    }

    fn resolve(self, graphic: GraphicRef) -> Node<'d> {
        self.diagram.node(graphic)
    }

    pub fn parent(self) -> Option<Node<'d>> {
        self.graphic.parent().map(|parent| self.resolve(parent))
    }

    /// Head of a connector, if it resolved
    pub fn head(self) -> Option<Node<'d>> {
        self.graphic
            .connector()
            .and_then(|ends| ends.head())
            .map(|head| self.resolve(head))
    }

    /// Tail of a connector, if it resolved
    pub fn tail(self) -> Option<Node<'d>> {
        self.graphic
            .connector()
            .and_then(|ends| ends.tail())
            .map(|tail| self.resolve(tail))
    }

    /// Connectors whose head is this graphic
    pub fn incoming(self) -> impl Iterator<Item = Node<'d>> {
        self.graphic
            .incoming()
            .iter()
            .map(move |connector| self.resolve(*connector))
    }

    /// Connectors whose tail is this graphic
    pub fn outgoing(self) -> impl Iterator<Item = Node<'d>> {
        self.graphic
            .outgoing()
            .iter()
            .map(move |connector| self.resolve(*connector))
    }

    /// Visible children of a group; empty for other graphics
    pub fn children(self) -> impl Iterator<Item = Node<'d>> {
        self.graphic
            .as_group()
            .map(|group| group.children())
            .unwrap_or_default()
            .iter()
            .map(move |child| self.resolve(*child))
    }

    /// Labels of a line from tail to head; empty for other graphics
    pub fn labels(self) -> impl Iterator<Item = Node<'d>> {
        self.graphic
            .as_line()
            .map(|line| line.labels())
            .unwrap_or_default()
            .iter()
            .map(move |label| self.resolve(label.shape()))
    }

    /// Cells of a table, row-major; empty for other graphics
    pub fn cells(self) -> impl Iterator<Item = Node<'d>> {
        self.graphic
            .as_table()
            .map(|table| table.cells())
            .unwrap_or_default()
            .iter()
            .map(move |cell| self.resolve(*cell))
    }

    /// Rows of a table as nodes; empty for other graphics
    pub fn rows(self) -> Vec<Vec<Node<'d>>> {
        self.graphic
            .as_table()
            .map(|table| {
                table
                    .rows()
                    .iter()
                    .map(|row| row.iter().map(|cell| self.resolve(*cell)).collect())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Where this graphic sits, for error messages
    pub fn location(self) -> Location {
        Location::new(
            self.page().title(),
            Some(self.graphic.id()),
            self.graphic.origin(),
        )
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.diagram, other.diagram) && self.reference() == other.reference()
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.graphic.kind_name())
            .field("id", &self.graphic.id())
            .field("page", &self.reference().page())
            .finish()
    }
}
