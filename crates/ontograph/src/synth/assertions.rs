//! Assertion pass: property grids and individual-level lines.

use std::collections::BTreeSet;

use log::{debug, warn};

use ontograph_core::model::Node;

use super::{End, Engine, Fault, SynthError, endpoint, fault, run_pass};
use crate::{
    ontology::{Axiom, ClassExpression, EntityKind, Iri},
    role::{self, Role},
};

pub(super) fn run(engine: &mut Engine<'_>) -> Result<(), SynthError> {
    run_pass(engine, "assertions", assertions)
}

fn assertions<'d>(engine: &mut Engine<'d>, node: Node<'d>) -> Result<(), SynthError> {
    match role::classify(node) {
        Some(Role::PropertyGrid) => property_grid(engine, node),
        Some(Role::Property) => relationship(engine, node),
        Some(Role::InstanceOf) => instance_of(engine, node),
        Some(role @ (Role::SameAs | Role::DifferentFrom)) => identity(engine, node, role),
        _ => Ok(()),
    }
}

fn is_blank(cell: Node<'_>) -> bool {
    cell.text().is_none_or(|text| text.trim().is_empty())
}

/// Row 0 names the properties, column 0 the subjects, the rest are values.
fn property_grid<'d>(engine: &mut Engine<'d>, table: Node<'d>) -> Result<(), SynthError> {
    let rows = table.rows();
    let found = rows.first().map_or(0, Vec::len);
    if found < 2 {
        return Err(fault(
            table,
            Fault::MalformedTable {
                role: "PropertyGrid",
                required: 2,
                found,
            },
        ));
    }

    let headers = rows[0][1..]
        .iter()
        .map(|header| engine.property(*header))
        .collect::<Result<Vec<_>, _>>()?;

    let mut count = 0;
    for row in &rows[1..] {
        if row.iter().all(|cell| is_blank(*cell)) {
            continue;
        }
        let subject = engine.individual(row[0])?;
        for ((property, kind), cell) in headers.iter().zip(&row[1..]) {
            if is_blank(*cell) {
                continue;
            }
            let axiom = match kind {
                EntityKind::DataProperty => Axiom::DataPropertyAssertion {
                    property: property.clone(),
                    subject: subject.clone(),
                    value: engine.literal(*cell),
                },
                _ => Axiom::ObjectPropertyAssertion {
                    property: property.clone(),
                    subject: subject.clone(),
                    object: engine.individual(*cell)?,
                },
            };
            engine.add(axiom);
            count += 1;
        }
    }
    debug!(graphic = table.id().value(), assertions = count; "Property grid read");
    Ok(())
}

/// A `Property` line carries exactly one property label.
fn relationship<'d>(engine: &mut Engine<'d>, line: Node<'d>) -> Result<(), SynthError> {
    let labels: Vec<Node<'d>> = line
        .labels()
        .filter(|label| {
            matches!(
                role::classify(*label),
                Some(Role::ObjectProperty | Role::DataProperty)
            )
        })
        .collect();
    let label = match labels.as_slice() {
        [label] => *label,
        [] => return Err(fault(line, Fault::MissingProperty)),
        _ => {
            return Err(fault(
                line,
                Fault::AmbiguousProperty {
                    count: labels.len(),
                },
            ));
        }
    };
    let (property, kind) = engine.property(label)?;

    let tail = endpoint(line, Role::Property, End::Tail)?;
    let head = endpoint(line, Role::Property, End::Head)?;
    if engine.entity_kind(tail) == Some(EntityKind::Class) {
        warn!(
            graphic = line.id().value(),
            page = line.page().title();
            "Property restriction on a class is not supported, ignored"
        );
        return Ok(());
    }

    let subject = engine.individual(tail)?;
    let axiom = if kind == EntityKind::DataProperty {
        Axiom::DataPropertyAssertion {
            property,
            subject,
            value: engine.literal(head),
        }
    } else {
        Axiom::ObjectPropertyAssertion {
            property,
            subject,
            object: engine.individual(head)?,
        }
    };
    engine.add(axiom);
    Ok(())
}

fn instance_of<'d>(engine: &mut Engine<'d>, line: Node<'d>) -> Result<(), SynthError> {
    let tail = endpoint(line, Role::InstanceOf, End::Tail)?;
    let head = endpoint(line, Role::InstanceOf, End::Head)?;
    let individual = engine.individual(tail)?;
    let class = ClassExpression::Class(engine.class(head)?);
    engine.add(Axiom::ClassAssertion { class, individual });
    Ok(())
}

fn identity<'d>(engine: &mut Engine<'d>, line: Node<'d>, role: Role) -> Result<(), SynthError> {
    let tail = endpoint(line, role, End::Tail)?;
    let head = endpoint(line, role, End::Head)?;
    let individuals: BTreeSet<Iri> = [engine.individual(tail)?, engine.individual(head)?].into();
    if individuals.len() < 2 {
        return Ok(());
    }
    engine.add(if role == Role::SameAs {
        Axiom::SameIndividuals(individuals)
    } else {
        Axiom::DifferentIndividuals(individuals)
    });
    Ok(())
}
