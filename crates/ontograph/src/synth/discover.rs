//! Entity discovery pass.

use log::warn;

use ontograph_core::model::Node;

use super::{Engine, SynthError, run_pass};
use crate::role;

pub(super) fn run(engine: &mut Engine<'_>) -> Result<(), SynthError> {
    run_pass(engine, "discovery", discover)
}

/// Declares the entity of a role-bearing shape.
fn discover<'d>(engine: &mut Engine<'d>, node: Node<'d>) -> Result<(), SynthError> {
    let Some(role) = role::classify(node) else {
        return Ok(());
    };
    if !role.is_supported() {
        warn!(
            role = role.name(),
            graphic = node.id().value(),
            page = node.page().title();
            "Unsupported construct ignored"
        );
        return Ok(());
    }
    if let Some(kind) = role.entity_kind() {
        engine.declare(node, kind, role)?;
    }
    Ok(())
}
