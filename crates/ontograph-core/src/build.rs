//! Two-phase construction of a [`Diagram`] from a decoded document.
//!
//! Each page is built in two phases:
//!
//! 1. **Raw build** - every graphic record is turned into a [`Graphic`] in
//!    the page arena, dispatching on the record's `Class`. Each graphic is
//!    registered under its ID as soon as it is allocated, so records may
//!    refer to graphics that appear later. Groups and tables build their
//!    children before they return.
//! 2. **Resolution** - graphics are visited in ID order. Connectors look up
//!    their head and tail and register themselves in the targets'
//!    `incoming` and `outgoing` lists. Shapes carrying a label-line link
//!    are detached from their container and attached to the line.
//!
//! The ID map and the per-record links only live inside this module; the
//! finished model exposes [`GraphicRef`]s exclusively. A reference to an ID
//! that does not exist leaves the connector end unattached.
//!
//! After resolution the geometric relations of the page root shapes are
//! computed.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info, trace};
use serde_json::Value;

use crate::{
    document::{Record, scalar_to_string},
    error::DocumentError,
    geometry::Bounds,
    model::{
        ConnectorShape, Diagram, DocumentInfo, Endpoints, Graphic, GraphicId, GraphicKind,
        GraphicRef, Group, Label, Line, Metadata, Page, Shape, Table,
    },
    relate::relate_shapes,
};

/// Builds a diagram from a decoded document tree.
///
/// The tree either lists its pages under `Sheets` or is itself a single
/// page.
///
/// # Errors
///
/// Returns a [`DocumentError`] when a required key is missing, a value has
/// the wrong type, a graphic class is unknown, an ID repeats within a
/// page, geometry cannot be read, or a table grid is not rectangular.
///
/// # Examples
///
/// ```
/// # use ontograph_core::build::build_diagram;
/// # use serde_json::json;
/// let document = json!({
///     "Sheets": [{
///         "SheetTitle": "Animals",
///         "GraphicsList": [
///             { "Class": "ShapedGraphic", "ID": 1, "Text": "Dog", "Bounds": "{{0, 0}, {40, 20}}" }
///         ]
///     }]
/// });
///
/// let diagram = build_diagram(&document).unwrap();
/// assert_eq!(diagram.pages()[0].title(), "Animals");
/// assert_eq!(diagram.pages()[0].roots().len(), 1);
/// ```
pub fn build_diagram(document: &Value) -> Result<Diagram, DocumentError> {
    let root = Record::new(document, "")?;
    let info = read_info(&root)?;

    let sheets = if root.has("Sheets") {
        root.required_records("Sheets")?
    } else {
        vec![root.clone()]
    };

    let pages = sheets
        .iter()
        .enumerate()
        .map(|(index, sheet)| build_page(index, sheet))
        .collect::<Result<Vec<_>, _>>()?;

    let graphics: usize = pages.iter().map(|page| page.graphics().len()).sum();
    info!(pages = pages.len(), graphics; "Diagram built");

    Ok(Diagram::new(info, pages))
}

const INFO_LISTS: [(&str, &str); 5] = [
    ("kMDItemAuthors", "author"),
    ("kMDItemKeywords", "keyword"),
    ("kMDItemLanguages", "language"),
    ("kMDItemOrganizations", "organization"),
    ("kMDItemProjects", "project"),
];

const INFO_VALUES: [(&str, &str); 5] = [
    ("kMDItemComments", "comments"),
    ("kMDItemCopyright", "copyright"),
    ("kMDItemDescription", "description"),
    ("kMDItemSubject", "subject"),
    ("kMDItemVersion", "version"),
];

const DOCUMENT_VALUES: [(&str, &str); 4] = [
    ("Creator", "creator"),
    ("CreationDate", "creationDate"),
    ("Modifier", "modifier"),
    ("ModificationDate", "modificationDate"),
];

fn read_info(root: &Record<'_>) -> Result<DocumentInfo, DocumentError> {
    let mut info = DocumentInfo::default();

    if let Some(user) = root.record("UserInfo")? {
        for (source, key) in INFO_LISTS {
            for value in user.strings(source)? {
                info.push(key, value);
            }
        }
        for (source, key) in INFO_VALUES {
            if let Some(value) = user.strings(source)?.into_iter().next() {
                info.push(key, value);
            }
        }
    }

    for (source, key) in DOCUMENT_VALUES {
        if let Some(value) = root.get(source).and_then(scalar_to_string) {
            info.push(key, value);
        }
    }

    Ok(info)
}

fn read_metadata(record: &Record<'_>) -> Result<Metadata, DocumentError> {
    let note = record.str("Notes")?;

    let mut properties = BTreeMap::new();
    if let Some(user) = record.record("UserInfo")? {
        for (key, value) in user.iter() {
            let value = scalar_to_string(value).ok_or_else(|| DocumentError::WrongType {
                path: user.path_of(key),
                expected: "a scalar",
            })?;
            properties.insert(key.clone(), value);
        }
    }

    Ok(Metadata::new(note, properties))
}

fn build_page(index: usize, sheet: &Record<'_>) -> Result<Page, DocumentError> {
    let title = sheet.str("SheetTitle")?.unwrap_or_default().to_string();
    let metadata = match sheet.record("BackgroundGraphic")? {
        Some(background) => read_metadata(&background)?,
        None => Metadata::default(),
    };

    let mut builder = PageBuilder::new(index);
    let mut roots = Vec::new();
    for record in sheet.required_records("GraphicsList")? {
        roots.push(builder.build(&record, None)?);
    }

    builder.resolve(&mut roots);
    let mut graphics = builder.finish();
    relate_shapes(&roots, &mut graphics);

    debug!(
        page = index,
        title = title.as_str(),
        graphics = graphics.len(),
        roots = roots.len();
        "Page built"
    );

    Ok(Page::new(index, title, metadata, roots, graphics))
}

/// Graphic classes understood by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordClass {
    Shape,
    Line,
    Group,
    Table,
}

impl RecordClass {
    fn read(record: &Record<'_>) -> Result<Self, DocumentError> {
        let path = record.path_of("Class");
        let class = record
            .str("Class")?
            .ok_or_else(|| DocumentError::MissingKey { path: path.clone() })?;

        match class {
            "ShapedGraphic" => Ok(Self::Shape),
            "LineGraphic" => Ok(Self::Line),
            "Group" => Ok(Self::Group),
            "TableGroup" => Ok(Self::Table),
            other => Err(DocumentError::UnknownClass {
                path,
                class: other.to_string(),
            }),
        }
    }
}

/// References a record makes by raw ID, kept until resolution
#[derive(Debug, Clone, Copy, Default)]
struct Links {
    head: Option<GraphicId>,
    tail: Option<GraphicId>,
    label: Option<(GraphicId, f64)>,
}

impl Links {
    fn read(record: &Record<'_>) -> Result<Self, DocumentError> {
        let end = |key: &str| -> Result<Option<GraphicId>, DocumentError> {
            match record.record(key)? {
                Some(end) => Ok(end.int("ID")?.map(GraphicId::new)),
                None => Ok(None),
            }
        };

        let label = match record.record("Line")? {
            Some(line) => {
                let id = line.required_int("ID")?;
                let position = line.float("Position")?.unwrap_or(0.5);
                Some((GraphicId::new(id), position))
            }
            None => None,
        };

        Ok(Self {
            head: end("Head")?,
            tail: end("Tail")?,
            label,
        })
    }

    fn has_ends(&self) -> bool {
        self.head.is_some() || self.tail.is_some()
    }
}

struct PageBuilder {
    page: usize,
    graphics: Vec<Graphic>,
    links: Vec<Links>,
    ids: HashMap<GraphicId, GraphicRef>,
}

impl PageBuilder {
    fn new(page: usize) -> Self {
        Self {
            page,
            graphics: Vec::new(),
            links: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn finish(self) -> Vec<Graphic> {
        self.graphics
    }

    /// Phase A: builds one record and, recursively, its children.
    fn build(
        &mut self,
        record: &Record<'_>,
        parent: Option<GraphicRef>,
    ) -> Result<GraphicRef, DocumentError> {
        let class = RecordClass::read(record)?;
        let id = GraphicId::new(record.required_int("ID")?);
        let links = Links::read(record)?;
        let metadata = read_metadata(record)?;
        let solid = read_solid(record)?;

        let this = GraphicRef::new(self.page, self.graphics.len());
        if self.ids.insert(id, this).is_some() {
            return Err(DocumentError::DuplicateId {
                path: record.path_of("ID"),
                id: id.value(),
            });
        }

        // Placeholder until the variant is known; children need `this` first.
        self.graphics.push(Graphic::new(
            id,
            this,
            parent,
            solid,
            metadata,
            GraphicKind::Shape(Shape::default()),
        ));
        self.links.push(links);

        let kind = match class {
            RecordClass::Shape => {
                let shape = read_shape(record)?;
                if links.has_ends() {
                    GraphicKind::ConnectorShape(ConnectorShape {
                        shape,
                        endpoints: Endpoints::default(),
                    })
                } else {
                    GraphicKind::Shape(shape)
                }
            }
            RecordClass::Line => GraphicKind::Line(Line {
                points: record.points("Points")?,
                ..Line::default()
            }),
            RecordClass::Group => GraphicKind::Group(self.build_group(record, this)?),
            RecordClass::Table => GraphicKind::Table(self.build_table(record, this)?),
        };

        trace!(id = id.value(), class:?; "Graphic built");
        *self.graphics[this.slot()].kind_mut() = kind;
        Ok(this)
    }

    fn build_group(&mut self, record: &Record<'_>, this: GraphicRef) -> Result<Group, DocumentError> {
        let mut children = Vec::new();
        for child in record.required_records("Graphics")? {
            children.push(self.build(&child, Some(this))?);
        }

        let background = if record.bool("isSubgraph")?.unwrap_or(false) {
            children.pop()
        } else {
            None
        };

        let background_shape = background.and_then(|bg| self.graphics[bg.slot()].as_shape());
        let (text, rich_text) = match background_shape {
            Some(shape) => (shape.text().to_string(), shape.rich_text().cloned()),
            None => read_text(record)?,
        };

        let bounds = match record.bounds("Bounds")? {
            Some(bounds) => bounds,
            None => background_shape
                .map(Shape::bounds)
                .or_else(|| self.merged_bounds(&children))
                .unwrap_or_default(),
        };

        Ok(Group {
            shape: Shape::new(text, rich_text, bounds),
            children,
            background,
        })
    }

    fn build_table(&mut self, record: &Record<'_>, this: GraphicRef) -> Result<Table, DocumentError> {
        let rows_path = record.path_of("Rows");
        let row_values = record.required_list("Rows")?;
        if row_values.is_empty() {
            return Err(DocumentError::MalformedTable {
                path: rows_path,
                reason: "table has no rows",
            });
        }

        let mut rows = Vec::with_capacity(row_values.len());
        let mut cells = Vec::new();
        let mut width = None;

        for (index, row_value) in row_values.iter().enumerate() {
            let path = format!("{rows_path}/{index}");
            let Value::Array(items) = row_value else {
                return Err(DocumentError::WrongType {
                    path,
                    expected: "a list",
                });
            };

            if items.is_empty() {
                return Err(DocumentError::MalformedTable {
                    path,
                    reason: "table row is empty",
                });
            }
            match width {
                None => width = Some(items.len()),
                Some(width) if width != items.len() => {
                    return Err(DocumentError::MalformedTable {
                        path,
                        reason: "table rows differ in length",
                    });
                }
                Some(_) => {}
            }

            let mut row = Vec::with_capacity(items.len());
            for (col, item) in items.iter().enumerate() {
                let cell_record = Record::new(item, format!("{path}/{col}"))?;
                let cell = self.build(&cell_record, Some(this))?;
                if !self.graphics[cell.slot()].is_plain_shape() {
                    return Err(DocumentError::MalformedTable {
                        path: cell_record.path().to_string(),
                        reason: "table cells must be shapes",
                    });
                }
                row.push(cell);
                cells.push(cell);
            }
            rows.push(row);
        }

        let bounds = self.merged_bounds(&cells).unwrap_or_default();
        Ok(Table {
            rows,
            cells,
            bounds,
        })
    }

    fn merged_bounds(&self, graphics: &[GraphicRef]) -> Option<Bounds> {
        graphics
            .iter()
            .filter_map(|graphic| self.graphics[graphic.slot()].bounds())
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Phase B: resolves connector ends and label links in ID order.
    fn resolve(&mut self, roots: &mut Vec<GraphicRef>) {
        let mut order: Vec<GraphicRef> = self.ids.values().copied().collect();
        order.sort_by_key(|graphic| self.graphics[graphic.slot()].id());

        let links = std::mem::take(&mut self.links);
        for this in order {
            let link = links[this.slot()];
            if self.graphics[this.slot()].is_connector() {
                self.connect(this, link);
            } else if let Some((line, position)) = link.label {
                self.attach_label(this, line, position, roots);
            }
        }
    }

    fn lookup(&self, owner: GraphicRef, id: Option<GraphicId>) -> Option<GraphicRef> {
        let id = id?;
        let found = self.ids.get(&id).copied();
        if found.is_none() {
            debug!(
                graphic = self.graphics[owner.slot()].id().value(),
                missing = id.value();
                "Unresolved graphic reference"
            );
        }
        found
    }

    fn connect(&mut self, this: GraphicRef, link: Links) {
        let endpoints = Endpoints {
            head: self.lookup(this, link.head),
            tail: self.lookup(this, link.tail),
        };

        if let Some(head) = endpoints.head {
            self.graphics[head.slot()].add_incoming(this);
        }
        if let Some(tail) = endpoints.tail {
            self.graphics[tail.slot()].add_outgoing(this);
        }

        match self.graphics[this.slot()].kind_mut() {
            GraphicKind::Line(line) => line.endpoints = endpoints,
            GraphicKind::ConnectorShape(connector) => connector.endpoints = endpoints,
            GraphicKind::Shape(_) | GraphicKind::Group(_) | GraphicKind::Table(_) => {}
        }
    }

    fn attach_label(
        &mut self,
        this: GraphicRef,
        line_id: GraphicId,
        position: f64,
        roots: &mut Vec<GraphicRef>,
    ) {
        let Some(line) = self.lookup(this, Some(line_id)) else {
            return;
        };
        let label = self.graphics[this.slot()].id().value();
        if self.graphics[line.slot()].as_line().is_none() || !self.graphics[this.slot()].is_plain_shape() {
            debug!(label; "Label link ignored, not a shape on a line");
            return;
        }

        match self.graphics[this.slot()].parent() {
            None => roots.retain(|root| *root != this),
            Some(parent) => match self.graphics[parent.slot()].kind_mut() {
                GraphicKind::Group(group) if group.background != Some(this) => {
                    group.children.retain(|child| *child != this);
                }
                _ => {
                    debug!(label; "Label link ignored, shape is not detachable");
                    return;
                }
            },
        }

        if let GraphicKind::Line(line) = self.graphics[line.slot()].kind_mut() {
            let index = line
                .labels
                .partition_point(|label| label.position().total_cmp(&position).is_le());
            line.labels.insert(index, Label::new(position, this));
        }
        self.graphics[this.slot()].set_parent(Some(line));
    }
}

fn read_solid(record: &Record<'_>) -> Result<bool, DocumentError> {
    let pattern = match record.record("Style")? {
        Some(style) => match style.record("stroke")? {
            Some(stroke) => stroke.int("Pattern")?,
            None => None,
        },
        None => None,
    };
    Ok(pattern.unwrap_or(0) == 0)
}

fn read_text(record: &Record<'_>) -> Result<(String, Option<Value>), DocumentError> {
    match record.get("Text") {
        None | Some(Value::Null) => Ok((String::new(), None)),
        Some(Value::String(text)) => Ok((text.clone(), None)),
        Some(value @ Value::Object(_)) => {
            let text = Record::new(value, record.path_of("Text"))?;
            let plain = text.str("Text")?.unwrap_or_default().to_string();
            Ok((plain, text.get("RichText").cloned()))
        }
        Some(_) => Err(DocumentError::WrongType {
            path: record.path_of("Text"),
            expected: "a string or text object",
        }),
    }
}

fn read_shape(record: &Record<'_>) -> Result<Shape, DocumentError> {
    let (text, rich_text) = read_text(record)?;
    let bounds = record
        .bounds("Bounds")?
        .ok_or_else(|| DocumentError::MissingKey {
            path: record.path_of("Bounds"),
        })?;
    Ok(Shape::new(text, rich_text, bounds))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn shape(id: i64, text: &str, bounds: &str) -> Value {
        json!({ "Class": "ShapedGraphic", "ID": id, "Text": text, "Bounds": bounds })
    }

    fn line(id: i64, tail: i64, head: i64) -> Value {
        json!({ "Class": "LineGraphic", "ID": id, "Tail": { "ID": tail }, "Head": { "ID": head } })
    }

    fn page(graphics: Vec<Value>) -> Value {
        json!({ "Sheets": [{ "SheetTitle": "Test", "GraphicsList": graphics }] })
    }

    fn ids(diagram: &Diagram, refs: &[GraphicRef]) -> Vec<i64> {
        refs.iter().map(|r| diagram.graphic(*r).id().value()).collect()
    }

    #[test]
    fn test_forward_references_resolve() {
        let document = page(vec![
            line(1, 2, 3),
            shape(2, "A", "{{0, 0}, {10, 10}}"),
            shape(3, "B", "{{50, 0}, {10, 10}}"),
        ]);
        let diagram = build_diagram(&document).unwrap();
        let page = &diagram.pages()[0];

        let line = diagram.node(page.roots()[0]);
        assert_eq!(line.tail().unwrap().id().value(), 2);
        assert_eq!(line.head().unwrap().id().value(), 3);

        let a = diagram.node(page.roots()[1]);
        let b = diagram.node(page.roots()[2]);
        assert_eq!(ids(&diagram, a.graphic().outgoing()), vec![1]);
        assert!(a.graphic().incoming().is_empty());
        assert_eq!(ids(&diagram, b.graphic().incoming()), vec![1]);
    }

    #[test]
    fn test_unresolved_end_is_none() {
        let document = page(vec![line(1, 2, 99), shape(2, "A", "{{0, 0}, {10, 10}}")]);
        let diagram = build_diagram(&document).unwrap();
        let line = diagram.node(diagram.pages()[0].roots()[0]);
        assert!(line.head().is_none());
        assert_eq!(line.tail().unwrap().id().value(), 2);
    }

    #[test]
    fn test_incoming_in_id_order() {
        let document = page(vec![
            shape(1, "Target", "{{0, 0}, {10, 10}}"),
            shape(2, "Source", "{{50, 0}, {10, 10}}"),
            line(9, 2, 1),
            line(4, 2, 1),
            line(6, 2, 1),
        ]);
        let diagram = build_diagram(&document).unwrap();
        let target = diagram.graphic(diagram.pages()[0].roots()[0]);
        assert_eq!(ids(&diagram, target.incoming()), vec![4, 6, 9]);
    }

    #[test]
    fn test_shaped_graphic_with_ends_is_connector_shape() {
        let document = page(vec![
            shape(1, "A", "{{0, 0}, {10, 10}}"),
            shape(2, "B", "{{50, 0}, {10, 10}}"),
            json!({
                "Class": "ShapedGraphic", "ID": 3, "Bounds": "{{20, 0}, {5, 5}}",
                "Tail": { "ID": 1 }, "Head": { "ID": 2 }
            }),
        ]);
        let diagram = build_diagram(&document).unwrap();
        let connector = diagram.graphic(diagram.pages()[0].roots()[2]);
        assert!(matches!(connector.kind(), GraphicKind::ConnectorShape(_)));
        assert!(connector.as_shape().is_some());
        assert!(connector.is_connector());
    }

    #[test]
    fn test_labels_are_reparented_and_ordered() {
        let mut late = shape(5, "late", "{{0, 0}, {5, 5}}");
        late["Line"] = json!({ "ID": 1, "Position": 0.8 });
        let mut early = shape(4, "early", "{{0, 0}, {5, 5}}");
        early["Line"] = json!({ "ID": 1, "Position": 0.2 });

        let document = page(vec![
            line(1, 2, 3),
            shape(2, "A", "{{0, 0}, {10, 10}}"),
            shape(3, "B", "{{50, 0}, {10, 10}}"),
            late,
            early,
        ]);
        let diagram = build_diagram(&document).unwrap();
        let page = &diagram.pages()[0];

        assert_eq!(ids(&diagram, page.roots()), vec![1, 2, 3]);

        let line = diagram.node(page.roots()[0]);
        let labels: Vec<_> = line.labels().map(|n| n.text().unwrap()).collect();
        assert_eq!(labels, vec!["early", "late"]);
        for label in line.labels() {
            assert_eq!(label.parent(), Some(line));
        }
    }

    #[test]
    fn test_label_inside_group_leaves_group() {
        let mut label = shape(3, "name", "{{0, 0}, {5, 5}}");
        label["Line"] = json!({ "ID": 10, "Position": 0.5 });
        let document = page(vec![
            json!({
                "Class": "Group", "ID": 1,
                "Graphics": [shape(2, "member", "{{0, 0}, {10, 10}}"), label]
            }),
            json!({ "Class": "LineGraphic", "ID": 10 }),
        ]);
        let diagram = build_diagram(&document).unwrap();
        let group = diagram.node(diagram.pages()[0].roots()[0]);
        assert_eq!(group.children().map(|c| c.id().value()).collect::<Vec<_>>(), vec![2]);
        let line = diagram.node(diagram.pages()[0].roots()[1]);
        assert_eq!(line.labels().count(), 1);
    }

    #[test]
    fn test_subgraph_background_supplies_text_and_bounds() {
        let document = page(vec![json!({
            "Class": "Group", "ID": 1, "isSubgraph": true,
            "Graphics": [
                shape(2, "inner", "{{10, 10}, {5, 5}}"),
                shape(3, "http://example.org/onto", "{{0, 0}, {100, 100}}"),
            ]
        })]);
        let diagram = build_diagram(&document).unwrap();
        let group = diagram.graphic(diagram.pages()[0].roots()[0]);
        let data = group.as_group().unwrap();

        assert_eq!(group.text(), Some("http://example.org/onto"));
        assert_eq!(ids(&diagram, data.children()), vec![2]);
        assert_eq!(diagram.graphic(data.background().unwrap()).id().value(), 3);
        assert_eq!(group.bounds().unwrap().size().width(), 100.0);
    }

    #[test]
    fn test_group_bounds_default_to_children() {
        let document = page(vec![json!({
            "Class": "Group", "ID": 1,
            "Graphics": [
                shape(2, "a", "{{0, 0}, {10, 10}}"),
                shape(3, "b", "{{20, 20}, {10, 10}}"),
            ]
        })]);
        let diagram = build_diagram(&document).unwrap();
        let bounds = diagram.graphic(diagram.pages()[0].roots()[0]).bounds().unwrap();
        assert_eq!(bounds.max_x(), 30.0);
        assert_eq!(bounds.max_y(), 30.0);
    }

    #[test]
    fn test_table_grid() {
        let document = page(vec![json!({
            "Class": "TableGroup", "ID": 1, "Notes": "PropertyGrid",
            "Rows": [
                [shape(2, "", "{{0, 0}, {10, 10}}"), shape(3, "age", "{{10, 0}, {10, 10}}")],
                [shape(4, "Bob", "{{0, 10}, {10, 10}}"), shape(5, "42", "{{10, 10}, {10, 10}}")],
            ]
        })]);
        let diagram = build_diagram(&document).unwrap();
        let table = diagram.graphic(diagram.pages()[0].roots()[0]);
        let grid = table.as_table().unwrap();

        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 2);
        assert_eq!(ids(&diagram, grid.cells()), vec![2, 3, 4, 5]);
        assert_eq!(diagram.graphic(grid.cell(1, 0).unwrap()).text(), Some("Bob"));
        assert_eq!(table.note(), Some("PropertyGrid"));
    }

    #[test]
    fn test_ragged_table_is_malformed() {
        let document = page(vec![json!({
            "Class": "TableGroup", "ID": 1,
            "Rows": [
                [shape(2, "", "{{0, 0}, {10, 10}}"), shape(3, "", "{{10, 0}, {10, 10}}")],
                [shape(4, "", "{{0, 10}, {10, 10}}")],
            ]
        })]);
        let err = build_diagram(&document).unwrap_err();
        assert_eq!(
            err,
            DocumentError::MalformedTable {
                path: "/Sheets/0/GraphicsList/0/Rows/1".to_string(),
                reason: "table rows differ in length",
            }
        );
    }

    #[test]
    fn test_missing_graphics_list_is_malformed() {
        let document = json!({ "Sheets": [{ "SheetTitle": "Empty" }] });
        let err = build_diagram(&document).unwrap_err();
        assert_eq!(
            err,
            DocumentError::MissingKey {
                path: "/Sheets/0/GraphicsList".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_class_is_malformed() {
        let document = page(vec![json!({ "Class": "Blob", "ID": 1 })]);
        assert!(matches!(
            build_diagram(&document),
            Err(DocumentError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_duplicate_id_is_malformed() {
        let document = page(vec![
            shape(1, "a", "{{0, 0}, {1, 1}}"),
            shape(1, "b", "{{0, 0}, {1, 1}}"),
        ]);
        assert!(matches!(
            build_diagram(&document),
            Err(DocumentError::DuplicateId { id: 1, .. })
        ));
    }

    #[test]
    fn test_ids_are_scoped_per_page() {
        let document = json!({
            "Sheets": [
                { "GraphicsList": [shape(1, "a", "{{0, 0}, {1, 1}}")] },
                { "GraphicsList": [shape(1, "b", "{{0, 0}, {1, 1}}")] },
            ]
        });
        let diagram = build_diagram(&document).unwrap();
        assert_eq!(diagram.pages().len(), 2);
    }

    #[test]
    fn test_stroke_pattern_sets_solid() {
        let mut dashed = line(1, 2, 2);
        dashed["Style"] = json!({ "stroke": { "Pattern": 1 } });
        let document = page(vec![dashed, line(3, 2, 2), shape(2, "a", "{{0, 0}, {1, 1}}")]);
        let diagram = build_diagram(&document).unwrap();
        let roots = diagram.pages()[0].roots();
        assert!(!diagram.graphic(roots[0]).is_solid());
        assert!(diagram.graphic(roots[1]).is_solid());
    }

    #[test]
    fn test_metadata_and_document_info() {
        let mut annotated = shape(1, "Dog", "{{0, 0}, {1, 1}}");
        annotated["Notes"] = json!("  Class ");
        annotated["UserInfo"] = json!({ "weight": 3, "owner": "me" });
        let document = json!({
            "UserInfo": { "kMDItemAuthors": ["Ada", "Grace"], "kMDItemVersion": "1.2" },
            "Creator": "tool",
            "Sheets": [{
                "BackgroundGraphic": { "Notes": "page note" },
                "GraphicsList": [annotated]
            }]
        });
        let diagram = build_diagram(&document).unwrap();
        let page = &diagram.pages()[0];
        let graphic = diagram.graphic(page.roots()[0]);

        assert_eq!(graphic.note(), Some("Class"));
        assert_eq!(graphic.metadata().property("weight"), Some("3"));
        assert_eq!(page.metadata().note(), Some("page note"));
        assert_eq!(diagram.info().all("author").collect::<Vec<_>>(), vec!["Ada", "Grace"]);
        assert_eq!(diagram.info().get("version"), Some("1.2"));
        assert_eq!(diagram.info().get("creator"), Some("tool"));
    }

    #[test]
    fn test_rich_text_is_passed_through() {
        let document = page(vec![json!({
            "Class": "ShapedGraphic", "ID": 1, "Bounds": "{{0, 0}, {1, 1}}",
            "Text": { "Text": "Dog", "RichText": "{\\rtf1 Dog}" }
        })]);
        let diagram = build_diagram(&document).unwrap();
        let shape = diagram.graphic(diagram.pages()[0].roots()[0]).as_shape().unwrap();
        assert_eq!(shape.text(), "Dog");
        assert_eq!(shape.rich_text(), Some(&json!("{\\rtf1 Dog}")));
    }

    #[test]
    fn test_geometric_relations_among_roots() {
        let document = page(vec![
            shape(1, "outer", "{{0, 0}, {100, 100}}"),
            shape(2, "inner", "{{10, 10}, {10, 10}}"),
            shape(3, "overlap", "{{90, 90}, {20, 20}}"),
            shape(4, "far", "{{500, 500}, {10, 10}}"),
        ]);
        let diagram = build_diagram(&document).unwrap();
        let roots = diagram.pages()[0].roots();
        let relations = |i: usize| diagram.graphic(roots[i]).as_shape().unwrap().relations().clone();

        assert_eq!(ids(&diagram, relations(0).contained()), vec![2]);
        assert_eq!(ids(&diagram, relations(1).containing()), vec![1]);
        assert_eq!(ids(&diagram, relations(0).intersecting()), vec![2, 3]);
        assert_eq!(ids(&diagram, relations(2).intersecting()), vec![1]);
        assert!(relations(2).containing().is_empty());
        assert!(relations(3).intersecting().is_empty());
    }

    #[test]
    fn test_relations_skip_nested_shapes() {
        let document = page(vec![
            shape(1, "outer", "{{0, 0}, {100, 100}}"),
            json!({ "Class": "Group", "ID": 2, "Graphics": [shape(3, "nested", "{{10, 10}, {5, 5}}")] }),
        ]);
        let diagram = build_diagram(&document).unwrap();
        let roots = diagram.pages()[0].roots();
        let outer = diagram.graphic(roots[0]).as_shape().unwrap();
        // The group itself is a root shape; its child is not.
        assert_eq!(ids(&diagram, outer.relations().contained()), vec![2]);
    }
}
