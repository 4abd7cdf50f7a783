//! Diagram graph export.
//!
//! Every page becomes a node `<base>sheet-<n>` and every graphic a node
//! `<base>sheet-<n>/graphic-<id>`, linked with the `og:` vocabulary:
//!
//! - document metadata hangs off `og:document`, which links each sheet
//!   through `og:sheet`;
//! - containment uses `og:child`, `og:background`, `og:cell` and `og:label`;
//! - connectors carry `og:head`, `og:tail` and `og:stroke`;
//! - text and notes become `og:text`, `og:note` and typed `og:value`
//!   literals;
//! - overlapping page roots carry `og:intersects` and `og:contains`;
//! - table rows and columns are linked chains closed by `og:end`, and so
//!   are the lines sharing a note at each endpoint.

use indexmap::IndexMap;
use log::{debug, info};

use ontograph_core::{
    model::{Diagram, GraphicId, GraphicRef, Node, Page},
    visit::{DiagramVisitor, Visit, walk},
};

use crate::{
    ontology::{Iri, Literal, vocab},
    rdf::{Term, TripleGraph},
    role,
};

/// The diagram graph vocabulary
pub const OG: &str = "http://www.epistem.org/og/20090801#";

/// Mirrors `diagram` into triples, naming nodes under `base`.
///
/// # Examples
///
/// ```
/// # use ontograph::export::graph::{diagram_to_graph, OG};
/// # use ontograph_core::build::build_diagram;
/// # use serde_json::json;
/// let document = json!({
///     "GraphicsList": [
///         { "Class": "ShapedGraphic", "ID": 1, "Text": "Dog", "Bounds": [0, 0, 40, 20] }
///     ]
/// });
/// let diagram = build_diagram(&document).unwrap();
/// let graph = diagram_to_graph(&diagram, "http://example.org/zoo/");
///
/// let text = graph.to_ntriples().unwrap();
/// assert!(text.contains(&format!(
///     "<http://example.org/zoo/sheet-0/graphic-1> <{OG}text> \"Dog\" ."
/// )));
/// ```
pub fn diagram_to_graph(diagram: &Diagram, base: &str) -> TripleGraph {
    info!(base; "Exporting diagram graph");

    let mut exporter = GraphExporter::new(base);
    walk(diagram, &mut exporter);
    let graph = exporter.graph;

    debug!(triples = graph.len(); "Diagram graph exported");
    graph
}

fn og(name: &str) -> String {
    format!("{OG}{name}")
}

fn og_term(name: &str) -> Term {
    Term::iri(og(name))
}

/// Graph property of a document metadata key
fn info_property(key: &str) -> String {
    match key {
        "creationDate" => og("createdDate"),
        "modificationDate" => og("modifiedDate"),
        other => og(other),
    }
}

struct GraphExporter {
    graph: TripleGraph,
    base: String,
    document: Term,
}

impl GraphExporter {
    fn new(base: &str) -> Self {
        let mut graph = TripleGraph::new();
        graph.bind_prefix("og", OG);
        graph.bind_prefix("xsd", vocab::XSD);
        Self {
            graph,
            base: base.to_string(),
            document: og_term("document"),
        }
    }

    fn sheet(&self, page: usize) -> Term {
        Term::iri(format!("{}sheet-{page}", self.base))
    }

    fn graphic_term(&self, page: usize, id: GraphicId) -> Term {
        Term::iri(format!("{}sheet-{page}/graphic-{}", self.base, id.value()))
    }

    fn node(&self, node: Node<'_>) -> Term {
        self.graphic_term(node.page().index(), node.id())
    }

    fn link(&mut self, subject: &Term, property: &str, object: Term) {
        self.graph.add(subject.clone(), &og(property), object);
    }

    fn integer(value: usize) -> Term {
        Term::Literal(Literal::typed(
            value.to_string(),
            Iri::new(format!("{}integer", vocab::XSD)),
        ))
    }

    /// Text, note and typed value of any graphic.
    fn describe(&mut self, subject: &Term, text: Option<&str>, note: Option<&str>) {
        let text = text.filter(|text| !text.is_empty());
        if let Some(text) = text {
            self.link(subject, "text", Term::literal(text));
        }
        let Some(note) = note else {
            return;
        };
        match role::literal_datatype(note) {
            Some(datatype) => {
                if let Some(value) = text.map(str::trim).filter(|value| !value.is_empty()) {
                    let datatype = Iri::new(format!("{}{datatype}", vocab::XSD));
                    self.link(subject, "value", Term::Literal(Literal::typed(value, datatype)));
                }
            }
            None => self.link(subject, "note", Term::literal(note)),
        }
    }

    fn graphic(&mut self, node: Node<'_>) {
        let subject = self.node(node);
        self.describe(&subject, node.text(), node.note());

        if let Some(head) = node.head() {
            let head = self.node(head);
            self.link(&subject, "head", head);
        }
        if let Some(tail) = node.tail() {
            let tail = self.node(tail);
            self.link(&subject, "tail", tail);
        }
        if node.graphic().is_connector() || node.graphic().is_plain_shape() {
            let stroke = if node.is_solid() { "solid" } else { "dashed" };
            self.link(&subject, "stroke", og_term(stroke));
        }

        if let Some(shape) = node.graphic().as_shape() {
            let relations = shape.relations();
            for (property, others) in [
                ("intersects", relations.intersecting()),
                ("contains", relations.contained()),
            ] {
                for other in others {
                    let other = self.node(node.diagram().node(*other));
                    self.link(&subject, property, other);
                }
            }
        }

        self.line_chains(node, &subject);
    }

    /// One chain per note among the lines entering, then leaving, `node`.
    fn line_chains(&mut self, node: Node<'_>, subject: &Term) {
        self.note_chains(subject, node.incoming(), "firstIn", "nextIn");
        self.note_chains(subject, node.outgoing(), "firstOut", "nextOut");
    }

    fn note_chains<'d>(
        &mut self,
        subject: &Term,
        lines: impl Iterator<Item = Node<'d>>,
        first: &str,
        next: &str,
    ) {
        let mut by_note: IndexMap<String, Vec<Node<'d>>> = IndexMap::new();
        for line in lines {
            if let Some(note) = line.note() {
                by_note.entry(role::normalize(note)).or_default().push(line);
            }
        }

        for lines in by_note.values() {
            let mut previous: Option<Term> = None;
            for line in lines {
                let entry = self.graph.blank();
                let line = self.node(*line);
                self.link(&entry, "line", line);
                match &previous {
                    Some(previous) => self.link(previous, next, entry.clone()),
                    None => self.link(subject, first, entry.clone()),
                }
                previous = Some(entry);
            }
            if let Some(last) = previous {
                self.link(&last, next, og_term("end"));
            }
        }
    }

    fn table(&mut self, table: Node<'_>) {
        let subject = self.node(table);
        let rows: Vec<Vec<Term>> = table
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(|cell| self.node(cell)).collect())
            .collect();
        let cols = rows.first().map_or(0, Vec::len);

        for cell in rows.iter().flatten() {
            self.link(&subject, "cell", cell.clone());
        }
        self.link(&subject, "rowCount", Self::integer(rows.len()));
        self.link(&subject, "colCount", Self::integer(cols));

        let columns: Vec<Vec<Term>> = (0..cols)
            .map(|col| rows.iter().map(|row| row[col].clone()).collect())
            .collect();
        self.chain(&subject, &rows, ["firstRow", "nextRow", "firstRight", "right", "row"]);
        self.chain(&subject, &columns, ["firstCol", "nextCol", "firstDown", "down", "col"]);
    }

    /// Links `lines` (rows or columns) as a chain of blank nodes.
    ///
    /// `names` holds the properties for the first line, the next line, the
    /// first cell, the next cell and the cell-to-line back link.
    fn chain(&mut self, table: &Term, lines: &[Vec<Term>], names: [&str; 5]) {
        let [first_line, next_line, first_cell, next_cell, back] = names;

        let mut previous_line: Option<Term> = None;
        for cells in lines {
            let line = self.graph.blank();
            match &previous_line {
                Some(previous) => self.link(previous, next_line, line.clone()),
                None => self.link(table, first_line, line.clone()),
            }

            let mut previous_cell: Option<&Term> = None;
            for cell in cells {
                match previous_cell {
                    Some(previous) => self.link(previous, next_cell, cell.clone()),
                    None => self.link(&line, first_cell, cell.clone()),
                }
                self.link(cell, back, line.clone());
                previous_cell = Some(cell);
            }
            if let Some(last) = previous_cell {
                self.link(last, next_cell, og_term("end"));
            }
            previous_line = Some(line);
        }
        if let Some(last) = previous_line {
            self.link(&last, next_line, og_term("end"));
        }
    }

    fn children(&mut self, parent: &Term, children: &[GraphicRef], diagram: &Diagram) {
        for child in children {
            let child = self.node(diagram.node(*child));
            self.link(parent, "child", child);
        }
    }
}

impl<'d> DiagramVisitor<'d> for GraphExporter {
    fn diagram_start(&mut self, diagram: &'d Diagram) -> Visit<'_, 'd> {
        let document = self.document.clone();
        for (key, value) in diagram.info().iter() {
            self.graph.add(document.clone(), &info_property(key), Term::literal(value));
        }
        Visit::Continue
    }

    fn page_start(&mut self, page: &'d Page) -> Visit<'_, 'd> {
        let sheet = self.sheet(page.index());
        let document = self.document.clone();
        self.link(&document, "sheet", sheet.clone());
        self.describe(&sheet, Some(page.title()), page.metadata().note());
        Visit::Continue
    }

    fn page_end(&mut self, page: &'d Page) {
        let sheet = self.sheet(page.index());
        for root in page.roots() {
            let root = self.graphic_term(page.index(), page.graphics()[root.slot()].id());
            self.link(&sheet, "child", root);
        }
    }

    fn group_start(&mut self, group: Node<'d>) -> Visit<'_, 'd> {
        self.graphic(group);
        if let Some(data) = group.graphic().as_group() {
            let subject = self.node(group);
            self.children(&subject, data.children(), group.diagram());
            if let Some(background) = data.background() {
                let background = group.diagram().node(background);
                self.graphic(background);
                let background = self.node(background);
                self.link(&subject, "background", background);
            }
        }
        Visit::Continue
    }

    fn line_start(&mut self, line: Node<'d>) -> Visit<'_, 'd> {
        self.graphic(line);
        let subject = self.node(line);
        for label in line.labels() {
            let label = self.node(label);
            self.link(&subject, "label", label);
        }
        Visit::Continue
    }

    fn table_start(&mut self, table: Node<'d>) -> Visit<'_, 'd> {
        self.graphic(table);
        self.table(table);
        Visit::Continue
    }

    fn shape(&mut self, shape: Node<'d>) {
        self.graphic(shape);
    }

    fn connector_shape(&mut self, shape: Node<'d>) {
        self.graphic(shape);
    }
}
