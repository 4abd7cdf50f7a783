//! The diagram object model.
//!
//! A [`Diagram`] owns its [`Page`]s and every page owns the [`Graphic`]s
//! drawn on it, stored in a per-page arena. All non-owning relations
//! between graphics (parent, head and tail, labels, incoming and outgoing
//! connectors, geometric relations) are expressed as [`GraphicRef`]
//! handles into those arenas.
//!
//! The model is produced once by [`build_diagram`](crate::build::build_diagram)
//! and is read-only afterwards. [`Node`] is the convenient way to walk it.
//!
//! # Overview
//!
//! - [`Diagram`] - Root of one document.
//! - [`Page`] - One drawing surface.
//! - [`Graphic`] - A drawable element, see [`GraphicKind`] for the variants.
//! - [`Node`] - A borrowed graphic with navigation helpers.
//! - [`Location`] - Where a graphic sits, for error reporting.

mod graphic;
mod node;

pub use graphic::{
    ConnectorShape, Endpoints, Graphic, GraphicKind, Group, Label, Line, Shape, ShapeRelations,
    Table,
};
pub use node::Node;

use std::{collections::BTreeMap, fmt};

use crate::geometry::Point;

/// The integer identifier a graphic carries in the source document.
///
/// IDs are unique within one page only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphicId(i64);

impl GraphicId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GraphicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity handle of a graphic inside a [`Diagram`].
///
/// References are cheap to copy, hash and compare, which makes them the
/// natural key for caches built over the model. A reference is only
/// meaningful for the diagram that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphicRef {
    page: u32,
    slot: u32,
}

impl GraphicRef {
    pub(crate) fn new(page: usize, slot: usize) -> Self {
        Self {
            page: page as u32,
            slot: slot as u32,
        }
    }

    /// Index of the owning page
    pub fn page(self) -> usize {
        self.page as usize
    }

    /// Index of the graphic in its page arena
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

/// Free-text note and custom properties attached to a graphic or page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    note: Option<String>,
    properties: BTreeMap<String, String>,
}

impl Metadata {
    /// Creates metadata, trimming the note and dropping it when blank.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::collections::BTreeMap;
    /// # use ontograph_core::model::Metadata;
    /// let metadata = Metadata::new(Some("  Class \n"), BTreeMap::new());
    /// assert_eq!(metadata.note(), Some("Class"));
    ///
    /// let blank = Metadata::new(Some("   "), BTreeMap::new());
    /// assert_eq!(blank.note(), None);
    /// ```
    pub fn new(note: Option<&str>, properties: BTreeMap<String, String>) -> Self {
        let note = note
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_string);
        Self { note, properties }
    }

    /// Returns the trimmed note, if any
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns all custom properties
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Returns one custom property
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Descriptive document metadata, passed through untouched.
///
/// Entries keep document order. Multi-valued fields (authors, keywords,
/// languages, organizations, projects) contribute one entry per value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    entries: Vec<(&'static str, String)>,
}

impl DocumentInfo {
    pub(crate) fn push(&mut self, key: &'static str, value: String) {
        self.entries.push((key, value));
    }

    /// Returns the first value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value stored under `key`
    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over all entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One drawing surface of a diagram.
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    title: String,
    metadata: Metadata,
    roots: Vec<GraphicRef>,
    graphics: Vec<Graphic>,
}

impl Page {
    pub(crate) fn new(
        index: usize,
        title: String,
        metadata: Metadata,
        roots: Vec<GraphicRef>,
        graphics: Vec<Graphic>,
    ) -> Self {
        Self {
            index,
            title,
            metadata,
            roots,
            graphics,
        }
    }

    /// Position of the page in the document
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Page-level note and properties, taken from the page background
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Graphics drawn directly on the page, in record order.
    ///
    /// Shapes that became line labels are not included.
    pub fn roots(&self) -> &[GraphicRef] {
        &self.roots
    }

    /// Every graphic on the page, nested ones included, in arena order
    pub fn graphics(&self) -> &[Graphic] {
        &self.graphics
    }
}

/// Root of one document.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    info: DocumentInfo,
    pages: Vec<Page>,
}

impl Diagram {
    pub(crate) fn new(info: DocumentInfo, pages: Vec<Page>) -> Self {
        Self { info, pages }
    }

    /// Descriptive document metadata
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Returns the page a reference belongs to.
    ///
    /// # Panics
    ///
    /// Panics if the reference was produced by another diagram.
    pub fn page_of(&self, graphic: GraphicRef) -> &Page {
        &self.pages[graphic.page()]
    }

    /// Resolves a reference to its graphic.
    ///
    /// # Panics
    ///
    /// Panics if the reference was produced by another diagram.
    pub fn graphic(&self, graphic: GraphicRef) -> &Graphic {
        &self.page_of(graphic).graphics[graphic.slot()]
    }

    /// Resolves a reference to a navigable [`Node`]
    pub fn node(&self, graphic: GraphicRef) -> Node<'_> {
        Node::new(self, self.graphic(graphic))
    }

    /// Iterates over every graphic of every page
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        self.pages
            .iter()
            .flat_map(|page| page.graphics.iter())
            .map(move |graphic| Node::new(self, graphic))
    }
}

/// Where a graphic sits, used to position error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    page: String,
    graphic: Option<GraphicId>,
    origin: Option<Point>,
}

impl Location {
    pub fn new(page: impl Into<String>, graphic: Option<GraphicId>, origin: Option<Point>) -> Self {
        Self {
            page: page.into(),
            graphic,
            origin,
        }
    }

    /// Title of the page holding the graphic
    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn graphic(&self) -> Option<GraphicId> {
        self.graphic
    }

    /// Top-left corner of a shape, or first point of a line
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet '{}'", self.page)?;
        if let Some(origin) = self.origin {
            write!(f, " {origin}")?;
        }
        if let Some(graphic) = self.graphic {
            write!(f, " graphic {graphic}")?;
        }
        Ok(())
    }
}
