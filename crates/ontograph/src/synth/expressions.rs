//! Class expression pass.
//!
//! Lines leaving a class with role `Union`, `Intersection`, `Complement` or
//! `Member` build a class expression. A solid stroke defines the class as
//! the expression (`EquivalentClasses`), a dashed one only restricts it
//! (`SubClassOf`). Lines of one role and one stroke form a single
//! expression.

use std::collections::BTreeSet;

use ontograph_core::model::Node;

use super::{End, Engine, Fault, SynthError, endpoint, fault, outgoing_with, run_pass, wrong_kind};
use crate::{
    ontology::{Axiom, ClassExpression, EntityKind, Iri},
    role::{self, Role},
};

pub(super) fn run(engine: &mut Engine<'_>) -> Result<(), SynthError> {
    run_pass(engine, "class expressions", expressions)
}

fn expressions<'d>(engine: &mut Engine<'d>, node: Node<'d>) -> Result<(), SynthError> {
    if engine.entity_kind(node) != Some(EntityKind::Class) {
        return Ok(());
    }
    let class = ClassExpression::Class(engine.class(node)?);

    for solid in [true, false] {
        let lines = |role| outgoing_with(node, role).filter(move |line| line.is_solid() == solid);

        for role in [Role::Union, Role::Intersection] {
            let connectors: Vec<Node<'d>> = lines(role).collect();
            if let Some(expression) = n_ary(engine, role, &connectors)? {
                define(engine, &class, expression, solid);
            }
        }

        for connector in lines(Role::Complement) {
            let head = endpoint(connector, Role::Complement, End::Head)?;
            let operand = ClassExpression::Class(engine.class(head)?);
            define(engine, &class, ClassExpression::ComplementOf(Box::new(operand)), solid);
        }

        let connectors: Vec<Node<'d>> = lines(Role::Member).collect();
        let members = members(engine, &connectors)?;
        if !members.is_empty() {
            define(engine, &class, ClassExpression::OneOf(members), solid);
        }
    }
    Ok(())
}

fn define(engine: &mut Engine<'_>, class: &ClassExpression, expression: ClassExpression, solid: bool) {
    let axiom = if solid {
        Axiom::EquivalentClasses([class.clone(), expression].into())
    } else {
        Axiom::SubClassOf {
            sub: class.clone(),
            sup: expression,
        }
    };
    engine.add(axiom);
}

/// A union or intersection over the heads of `connectors`.
fn n_ary(
    engine: &Engine<'_>,
    role: Role,
    connectors: &[Node<'_>],
) -> Result<Option<ClassExpression>, SynthError> {
    let Some(first) = connectors.first() else {
        return Ok(None);
    };

    let mut operands = BTreeSet::new();
    for connector in connectors {
        let head = endpoint(*connector, role, End::Head)?;
        operands.insert(ClassExpression::Class(engine.class(head)?));
    }
    if operands.len() < 2 {
        return Err(fault(
            *first,
            Fault::InsufficientOperands {
                role,
                required: 2,
                found: operands.len(),
            },
        ));
    }

    Ok(Some(if role == Role::Union {
        ClassExpression::UnionOf(operands)
    } else {
        ClassExpression::IntersectionOf(operands)
    }))
}

/// Individuals enumerated by `Member` lines.
///
/// A line may point at an individual or at a property grid, whose subjects
/// all become members.
fn members<'d>(engine: &mut Engine<'d>, connectors: &[Node<'d>]) -> Result<BTreeSet<Iri>, SynthError> {
    let mut members = BTreeSet::new();
    for connector in connectors {
        let head = endpoint(*connector, Role::Member, End::Head)?;
        if head.graphic().as_table().is_some() {
            if !role::has_role(head, Role::PropertyGrid) {
                return Err(wrong_kind(head, "an individual or property grid"));
            }
            for row in head.rows().into_iter().skip(1) {
                let subject = row[0];
                if subject.text().is_some_and(|text| !text.trim().is_empty()) {
                    members.insert(engine.individual(subject)?);
                }
            }
        } else {
            members.insert(engine.declared_individual(head)?);
        }
    }
    Ok(members)
}
