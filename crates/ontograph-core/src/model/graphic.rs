//! Graphic variants.

use serde_json::Value;

use super::{GraphicId, GraphicRef, Metadata};
use crate::geometry::{Bounds, Point};

/// A drawable element of a page.
///
/// Attributes shared by every variant live here; variant data lives in
/// [`GraphicKind`].
#[derive(Debug, Clone)]
pub struct Graphic {
    id: GraphicId,
    this: GraphicRef,
    parent: Option<GraphicRef>,
    solid: bool,
    metadata: Metadata,
    incoming: Vec<GraphicRef>,
    outgoing: Vec<GraphicRef>,
    kind: GraphicKind,
}

impl Graphic {
    pub(crate) fn new(
        id: GraphicId,
        this: GraphicRef,
        parent: Option<GraphicRef>,
        solid: bool,
        metadata: Metadata,
        kind: GraphicKind,
    ) -> Self {
        Self {
            id,
            this,
            parent,
            solid,
            metadata,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            kind,
        }
    }

    pub fn id(&self) -> GraphicId {
        self.id
    }

    /// The identity handle of this graphic
    pub fn reference(&self) -> GraphicRef {
        self.this
    }

    /// The containing group, table or line; `None` for page roots
    pub fn parent(&self) -> Option<GraphicRef> {
        self.parent
    }

    /// Returns true for a solid stroke, false for a dashed one
    pub fn is_solid(&self) -> bool {
        self.solid
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Shortcut for the trimmed note
    pub fn note(&self) -> Option<&str> {
        self.metadata.note()
    }

    /// Connectors whose head is this graphic, in ID order
    pub fn incoming(&self) -> &[GraphicRef] {
        &self.incoming
    }

    /// Connectors whose tail is this graphic, in ID order
    pub fn outgoing(&self) -> &[GraphicRef] {
        &self.outgoing
    }

    pub fn kind(&self) -> &GraphicKind {
        &self.kind
    }

    /// Returns the shape data of shapes, groups and connector shapes
    pub fn as_shape(&self) -> Option<&Shape> {
        match &self.kind {
            GraphicKind::Shape(shape) => Some(shape),
            GraphicKind::Group(group) => Some(&group.shape),
            GraphicKind::ConnectorShape(connector) => Some(&connector.shape),
            GraphicKind::Line(_) | GraphicKind::Table(_) => None,
        }
    }

    /// Returns the endpoints of lines and connector shapes
    pub fn connector(&self) -> Option<&Endpoints> {
        match &self.kind {
            GraphicKind::Line(line) => Some(&line.endpoints),
            GraphicKind::ConnectorShape(connector) => Some(&connector.endpoints),
            GraphicKind::Shape(_) | GraphicKind::Group(_) | GraphicKind::Table(_) => None,
        }
    }

    pub fn is_connector(&self) -> bool {
        self.connector().is_some()
    }

    /// Returns true only for plain leaf shapes
    pub fn is_plain_shape(&self) -> bool {
        matches!(self.kind, GraphicKind::Shape(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            GraphicKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match &self.kind {
            GraphicKind::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match &self.kind {
            GraphicKind::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Display text of shape-like graphics
    pub fn text(&self) -> Option<&str> {
        self.as_shape().map(Shape::text)
    }

    /// Bounding rectangle of shape-like graphics and tables
    pub fn bounds(&self) -> Option<Bounds> {
        match &self.kind {
            GraphicKind::Table(table) => Some(table.bounds),
            _ => self.as_shape().map(Shape::bounds),
        }
    }

    /// The point used to locate this graphic in messages
    pub fn origin(&self) -> Option<Point> {
        match &self.kind {
            GraphicKind::Line(line) => line.points.first().copied(),
            _ => self.bounds().map(Bounds::origin),
        }
    }

    /// Human readable name of the variant
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            GraphicKind::Shape(_) => "shape",
            GraphicKind::Group(_) => "group",
            GraphicKind::Line(_) => "line",
            GraphicKind::Table(_) => "table",
            GraphicKind::ConnectorShape(_) => "connector shape",
        }
    }

    pub(crate) fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match &mut self.kind {
            GraphicKind::Shape(shape) => Some(shape),
            GraphicKind::Group(group) => Some(&mut group.shape),
            GraphicKind::ConnectorShape(connector) => Some(&mut connector.shape),
            GraphicKind::Line(_) | GraphicKind::Table(_) => None,
        }
    }

    pub(crate) fn kind_mut(&mut self) -> &mut GraphicKind {
        &mut self.kind
    }

    pub(crate) fn set_parent(&mut self, parent: Option<GraphicRef>) {
        self.parent = parent;
    }

    pub(crate) fn add_incoming(&mut self, connector: GraphicRef) {
        self.incoming.push(connector);
    }

    pub(crate) fn add_outgoing(&mut self, connector: GraphicRef) {
        self.outgoing.push(connector);
    }
}

/// The variants a [`Graphic`] can take.
#[derive(Debug, Clone)]
pub enum GraphicKind {
    Shape(Shape),
    Group(Group),
    Line(Line),
    Table(Table),
    ConnectorShape(ConnectorShape),
}

/// Geometric relations of a page root shape to the other page root shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeRelations {
    pub(crate) contained: Vec<GraphicRef>,
    pub(crate) containing: Vec<GraphicRef>,
    pub(crate) intersecting: Vec<GraphicRef>,
}

impl ShapeRelations {
    /// Shapes fully enclosed by this shape
    pub fn contained(&self) -> &[GraphicRef] {
        &self.contained
    }

    /// Shapes that fully enclose this shape
    pub fn containing(&self) -> &[GraphicRef] {
        &self.containing
    }

    /// Shapes whose interior overlaps this shape
    pub fn intersecting(&self) -> &[GraphicRef] {
        &self.intersecting
    }
}

/// A leaf graphic with text and bounds.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    text: String,
    rich_text: Option<Value>,
    bounds: Bounds,
    relations: ShapeRelations,
}

impl Shape {
    pub(crate) fn new(text: String, rich_text: Option<Value>, bounds: Bounds) -> Self {
        Self {
            text,
            rich_text,
            bounds,
            relations: ShapeRelations::default(),
        }
    }

    /// Plain display text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Opaque rich-text payload, passed through undecoded
    pub fn rich_text(&self) -> Option<&Value> {
        self.rich_text.as_ref()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Geometric relations; empty for shapes that are not page roots
    pub fn relations(&self) -> &ShapeRelations {
        &self.relations
    }

    pub(crate) fn relations_mut(&mut self) -> &mut ShapeRelations {
        &mut self.relations
    }
}

/// A shape owning child graphics.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub(crate) shape: Shape,
    pub(crate) children: Vec<GraphicRef>,
    pub(crate) background: Option<GraphicRef>,
}

impl Group {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Visible children in record order
    pub fn children(&self) -> &[GraphicRef] {
        &self.children
    }

    /// Background shape of a subgraph group, excluded from the children
    pub fn background(&self) -> Option<GraphicRef> {
        self.background
    }

    pub fn is_subgraph(&self) -> bool {
        self.background.is_some()
    }
}

/// The head and tail of a connector.
///
/// Either end is `None` when the document referenced a missing graphic or
/// left the end unattached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub(crate) head: Option<GraphicRef>,
    pub(crate) tail: Option<GraphicRef>,
}

impl Endpoints {
    pub fn head(&self) -> Option<GraphicRef> {
        self.head
    }

    pub fn tail(&self) -> Option<GraphicRef> {
        self.tail
    }
}

/// A label shape attached to a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    position: f64,
    shape: GraphicRef,
}

impl Label {
    pub(crate) fn new(position: f64, shape: GraphicRef) -> Self {
        Self { position, shape }
    }

    /// Position along the line, from tail to head
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn shape(&self) -> GraphicRef {
        self.shape
    }
}

/// A connector drawn as a polyline.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub(crate) endpoints: Endpoints,
    pub(crate) labels: Vec<Label>,
    pub(crate) points: Vec<Point>,
}

impl Line {
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Labels ordered from tail to head
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A shape that also acts as a connector.
#[derive(Debug, Clone, Default)]
pub struct ConnectorShape {
    pub(crate) shape: Shape,
    pub(crate) endpoints: Endpoints,
}

impl ConnectorShape {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// A grid of shape cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub(crate) rows: Vec<Vec<GraphicRef>>,
    pub(crate) cells: Vec<GraphicRef>,
    pub(crate) bounds: Bounds,
}

impl Table {
    /// Cells indexed as `rows()[row][col]`
    pub fn rows(&self) -> &[Vec<GraphicRef>] {
        &self.rows
    }

    /// Every cell, row-major
    pub fn cells(&self) -> &[GraphicRef] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<GraphicRef> {
        self.rows.get(row).and_then(|cells| cells.get(col)).copied()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
