//! Ontology root pass.
//!
//! The root is the page-level group whose text is an absolute IRI, or a
//! group annotated `Ontology`. Exactly one root must exist across all pages.
//! Tables directly inside it annotate the ontology; `Imports` tables there
//! or on any page root bind prefixes and import other ontologies.

use log::debug;

use ontograph_core::model::{Diagram, Node};
use ontograph_core::visit::{Depth, DiagramVisitor, Visit, walk};

use super::{Engine, Fault, Outcome, SynthError, fault, names};
use crate::{
    ontology::{AnnotationValue, Iri, vocab},
    role::{self, Role},
};

/// The ontology root and the tables that configure it.
pub(super) struct Root<'d> {
    pub iri: Iri,
    imports: Vec<Node<'d>>,
    annotations: Vec<Node<'d>>,
}

/// Shallow walk collecting root candidates and page-level imports tables.
#[derive(Default)]
struct RootFinder<'d> {
    candidates: Vec<(Node<'d>, Iri)>,
    imports: Vec<Node<'d>>,
    outcome: Outcome,
}

impl<'d> RootFinder<'d> {
    fn inspect(&mut self, group: Node<'d>) -> Result<(), SynthError> {
        let text = group.text().unwrap_or_default().trim();
        if names::is_absolute(text) {
            self.candidates.push((group, Iri::new(names::encode(text))));
        } else if role::has_role(group, Role::Ontology) {
            return Err(fault(
                group,
                Fault::InvalidOntologyRoot {
                    text: text.to_string(),
                },
            ));
        }
        Ok(())
    }
}

impl<'d> DiagramVisitor<'d> for RootFinder<'d> {
    fn depth(&self) -> Depth {
        Depth::Shallow
    }

    fn group_start(&mut self, group: Node<'d>) -> Visit<'_, 'd> {
        if group.parent().is_none() {
            let result = self.inspect(group);
            self.outcome.record(result);
        }
        Visit::Skip
    }

    fn table_start(&mut self, table: Node<'d>) -> Visit<'_, 'd> {
        if table.parent().is_none() && role::has_role(table, Role::Imports) {
            self.imports.push(table);
        }
        Visit::Skip
    }
}

/// Finds the single ontology root of `diagram`.
pub(super) fn find_root(diagram: &Diagram) -> Result<Root<'_>, SynthError> {
    let mut finder = RootFinder::default();
    walk(diagram, &mut finder);
    finder.outcome.finish()?;

    let mut candidates = finder.candidates;
    if candidates.len() > 1 {
        return Err(SynthError::MultipleOntologyRoots {
            locations: candidates.iter().map(|(node, _)| node.location()).collect(),
        });
    }
    let (node, iri) = candidates.pop().ok_or(SynthError::NoOntologyRoot)?;

    let mut imports = finder.imports;
    let mut annotations = Vec::new();
    for child in node.children().filter(|child| child.graphic().as_table().is_some()) {
        match role::classify(child) {
            Some(Role::Imports) => imports.push(child),
            None => annotations.push(child),
            Some(_) => {}
        }
    }

    debug!(
        imports = imports.len(),
        annotations = annotations.len();
        "Ontology root tables"
    );
    Ok(Root {
        iri,
        imports,
        annotations,
    })
}

/// Reads the imports tables, then the annotation tables of `root`.
pub(super) fn read_tables<'d>(engine: &mut Engine<'d>, root: &Root<'d>) -> Result<(), SynthError> {
    for table in &root.imports {
        read_imports(engine, *table)?;
    }
    for table in &root.annotations {
        read_annotations(engine, *table)?;
    }
    Ok(())
}

fn cell_text(cell: Node<'_>) -> &str {
    cell.text().unwrap_or_default().trim()
}

fn require_columns(table: Node<'_>, role: &'static str, required: usize) -> Result<(), SynthError> {
    let found = table.graphic().as_table().map_or(0, |grid| grid.col_count());
    if found < required {
        return Err(fault(
            table,
            Fault::MalformedTable {
                role,
                required,
                found,
            },
        ));
    }
    Ok(())
}

/// Rows of `prefix | namespace`; a blank prefix only imports.
fn read_imports<'d>(engine: &mut Engine<'d>, table: Node<'d>) -> Result<(), SynthError> {
    require_columns(table, "Imports", 2)?;

    for row in table.rows() {
        let prefix = cell_text(row[0]).trim_end_matches('*').trim();
        let target = cell_text(row[1]);
        if target.is_empty() {
            continue;
        }
        let namespace = engine.resolve(target, row[1])?;

        if !prefix.is_empty() {
            engine.bind_prefix(prefix, namespace.as_str());
        }
        let import = Iri::new(namespace.as_str().trim_end_matches('#'));
        debug!(prefix, import:% = import; "Importing ontology");
        engine.annotate(Iri::new(vocab::OWL_IMPORTS), AnnotationValue::Iri(import));
    }
    Ok(())
}

/// Rows of `property | value`, attached to the ontology itself.
fn read_annotations<'d>(engine: &mut Engine<'d>, table: Node<'d>) -> Result<(), SynthError> {
    require_columns(table, "annotation", 2)?;

    for row in table.rows() {
        if cell_text(row[1]).is_empty() {
            continue;
        }
        let Some(property) = engine.resolve_text(row[0])? else {
            continue;
        };
        let value = engine.literal(row[1]);
        engine.annotate(property, AnnotationValue::Literal(value));
    }
    Ok(())
}
