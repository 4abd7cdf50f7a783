//! Class axiom pass.
//!
//! Handles the connectors leaving (and, for disjointness, entering) every
//! declared class:
//!
//! - `Extends` gives `SubClassOf`, or `SubPropertyOf` between properties.
//! - `Equivalent` gives `EquivalentClasses`.
//! - `Disjoint` connectors form chains. A chain is every `Disjoint`
//!   connector reachable through connector endpoints and attachments; the
//!   shapes at its ends are mutually disjoint.
//! - `DisjointUnion` collects the tails of incoming connectors and the
//!   chains hanging off outgoing ones.

use std::collections::{BTreeSet, HashSet};

use log::debug;

use ontograph_core::model::{GraphicRef, Node};

use super::{
    End, Engine, Fault, SynthError, endpoint, fault, incoming_with, outgoing_with, run_pass,
    wrong_kind,
};
use crate::{
    ontology::{Axiom, ClassExpression, EntityKind, PropertyKind},
    role::{self, Role},
};

pub(super) fn run(engine: &mut Engine<'_>) -> Result<(), SynthError> {
    run_pass(engine, "class axioms", class_axioms)
}

fn class_axioms<'d>(engine: &mut Engine<'d>, node: Node<'d>) -> Result<(), SynthError> {
    match engine.entity_kind(node) {
        Some(EntityKind::Class) => {
            subclasses(engine, node)?;
            equivalences(engine, node)?;
            disjoint_chains(engine, node)?;
            disjoint_union(engine, node)
        }
        Some(kind @ (EntityKind::ObjectProperty | EntityKind::DataProperty)) => {
            subproperties(engine, node, kind)
        }
        Some(EntityKind::Individual) | None => Ok(()),
    }
}

fn subclasses<'d>(engine: &mut Engine<'d>, class: Node<'d>) -> Result<(), SynthError> {
    let sub = ClassExpression::Class(engine.class(class)?);
    for connector in outgoing_with(class, Role::Extends) {
        let head = endpoint(connector, Role::Extends, End::Head)?;
        let sup = ClassExpression::Class(engine.class(head)?);
        engine.add(Axiom::SubClassOf {
            sub: sub.clone(),
            sup,
        });
    }
    Ok(())
}

fn equivalences<'d>(engine: &mut Engine<'d>, class: Node<'d>) -> Result<(), SynthError> {
    let this = ClassExpression::Class(engine.class(class)?);
    for connector in outgoing_with(class, Role::Equivalent) {
        let head = endpoint(connector, Role::Equivalent, End::Head)?;
        let other = ClassExpression::Class(engine.class(head)?);
        if other != this {
            engine.add(Axiom::EquivalentClasses([this.clone(), other].into()));
        }
    }
    Ok(())
}

fn subproperties<'d>(
    engine: &mut Engine<'d>,
    property: Node<'d>,
    kind: EntityKind,
) -> Result<(), SynthError> {
    let (sub, _) = engine.property(property)?;
    for connector in outgoing_with(property, Role::Extends) {
        let head = endpoint(connector, Role::Extends, End::Head)?;
        let (sup, head_kind) = engine.property(head)?;
        if head_kind != kind {
            return Err(wrong_kind(head, property_kind_name(kind)));
        }
        engine.add(Axiom::SubPropertyOf {
            kind: if kind == EntityKind::ObjectProperty {
                PropertyKind::Object
            } else {
                PropertyKind::Data
            },
            sub: sub.clone(),
            sup,
        });
    }
    Ok(())
}

fn property_kind_name(kind: EntityKind) -> &'static str {
    if kind == EntityKind::ObjectProperty {
        "an object property"
    } else {
        "a data property"
    }
}

/// Emits one `DisjointClasses` per chain touching `class`.
fn disjoint_chains<'d>(engine: &mut Engine<'d>, class: Node<'d>) -> Result<(), SynthError> {
    let connectors: Vec<Node<'d>> = outgoing_with(class, Role::Disjoint)
        .chain(incoming_with(class, Role::Disjoint))
        .collect();

    for connector in connectors {
        let mut visited = std::mem::take(&mut engine.visited);
        let chain = gather_chain(connector, &mut visited);
        engine.visited = visited;

        let shapes = chain?;
        if shapes.is_empty() {
            continue;
        }
        let classes = classes_of(engine, &shapes)?;
        if classes.len() < 2 {
            return Err(fault(
                connector,
                Fault::InsufficientOperands {
                    role: Role::Disjoint,
                    required: 2,
                    found: classes.len(),
                },
            ));
        }
        engine.add(Axiom::DisjointClasses(classes));
    }
    Ok(())
}

/// Collects the terminal shapes of the chain holding `start`.
///
/// Every connector is entered at most once; connectors already in
/// `visited` are not entered again, so a chain reached twice yields no
/// shapes the second time.
fn gather_chain<'d>(
    start: Node<'d>,
    visited: &mut HashSet<GraphicRef>,
) -> Result<Vec<Node<'d>>, SynthError> {
    let mut shapes = Vec::new();
    let mut pending = vec![start];

    while let Some(connector) = pending.pop() {
        if !visited.insert(connector.reference()) {
            continue;
        }
        if !role::has_role(connector, Role::Disjoint) {
            return Err(wrong_kind(connector, "a Disjoint connector"));
        }

        for end in [End::Tail, End::Head] {
            let node = endpoint(connector, Role::Disjoint, end)?;
            if node.graphic().is_connector() {
                pending.push(node);
            } else if node.graphic().is_plain_shape() {
                if !shapes.contains(&node) {
                    shapes.push(node);
                }
            } else {
                return Err(wrong_kind(node, "a class or Disjoint connector"));
            }
        }

        pending.extend(
            connector
                .incoming()
                .chain(connector.outgoing())
                .filter(|attached| role::has_role(*attached, Role::Disjoint)),
        );
    }
    Ok(shapes)
}

fn classes_of(engine: &Engine<'_>, shapes: &[Node<'_>]) -> Result<BTreeSet<ClassExpression>, SynthError> {
    shapes
        .iter()
        .map(|shape| engine.class(*shape).map(ClassExpression::Class))
        .collect()
}

fn disjoint_union<'d>(engine: &mut Engine<'d>, class: Node<'d>) -> Result<(), SynthError> {
    let mut members = BTreeSet::new();
    let mut anchor = None;

    for connector in incoming_with(class, Role::DisjointUnion) {
        let tail = endpoint(connector, Role::DisjointUnion, End::Tail)?;
        members.insert(ClassExpression::Class(engine.class(tail)?));
        anchor.get_or_insert(connector);
    }
    for connector in outgoing_with(class, Role::DisjointUnion) {
        let head = endpoint(connector, Role::DisjointUnion, End::Head)?;
        // A class at the head makes this class one of its members instead.
        if !head.graphic().is_connector() {
            debug!(
                graphic = connector.id().value();
                "DisjointUnion line counts as a member of its head class"
            );
            continue;
        }
        let shapes = gather_chain(head, &mut HashSet::new())?;
        members.extend(classes_of(engine, &shapes)?);
        anchor.get_or_insert(connector);
    }

    let Some(anchor) = anchor else {
        return Ok(());
    };
    if members.len() < 2 {
        return Err(fault(
            anchor,
            Fault::InsufficientUnionMembers {
                found: members.len(),
            },
        ));
    }
    let class = engine.class(class)?;
    engine.add(Axiom::DisjointUnion { class, members });
    Ok(())
}
