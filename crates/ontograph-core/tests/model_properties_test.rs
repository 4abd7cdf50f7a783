//! Structural properties of built diagrams, checked over generated documents.

use proptest::prelude::*;
use serde_json::{Value, json};

use ontograph_core::{
    build::build_diagram,
    model::{Diagram, GraphicKind, GraphicRef},
};

type ShapeSpec = (f64, f64, f64, f64, Option<i64>);

fn document(shapes: &[ShapeSpec], lines: &[(i64, i64)]) -> Value {
    let first_line = shapes.len() as i64 + 1;
    let mut graphics: Vec<Value> = shapes
        .iter()
        .enumerate()
        .map(|(index, (x, y, w, h, label))| {
            let mut shape = json!({
                "Class": "ShapedGraphic",
                "ID": index as i64 + 1,
                "Text": format!("shape {index}"),
                "Bounds": [x, y, w, h],
            });
            if let Some(line) = label {
                shape["Line"] = json!({ "ID": line, "Position": (*x / 200.0) });
            }
            shape
        })
        .collect();

    // Nest the last two shapes in a group so group children are covered.
    if graphics.len() > 3 {
        let nested = graphics.split_off(graphics.len() - 2);
        graphics.push(json!({ "Class": "Group", "ID": 1000, "Graphics": nested }));
    }

    for (offset, (tail, head)) in lines.iter().enumerate() {
        graphics.push(json!({
            "Class": "LineGraphic",
            "ID": first_line + offset as i64,
            "Tail": { "ID": tail },
            "Head": { "ID": head },
        }));
    }

    json!({ "Sheets": [{ "SheetTitle": "generated", "GraphicsList": graphics }] })
}

fn document_strategy() -> impl Strategy<Value = Value> {
    (1usize..8, 0usize..6).prop_flat_map(|(shape_count, line_count)| {
        let max_id = (shape_count + line_count) as i64 + 2;
        let shape = (
            0.0..200.0f64,
            0.0..200.0f64,
            1.0..80.0f64,
            1.0..80.0f64,
            prop::option::of(1..=max_id),
        );
        (
            prop::collection::vec(shape, shape_count),
            prop::collection::vec((1..=max_id, 1..=max_id), line_count),
        )
            .prop_map(|(shapes, lines)| document(&shapes, &lines))
    })
}

/// Counts how many containers list `graphic` as a member.
fn memberships(diagram: &Diagram, graphic: GraphicRef) -> usize {
    let page = diagram.page_of(graphic);
    let mut count = page.roots().iter().filter(|r| **r == graphic).count();
    for other in page.graphics() {
        count += match other.kind() {
            GraphicKind::Group(group) => group.children().iter().filter(|c| **c == graphic).count(),
            GraphicKind::Line(line) => line.labels().iter().filter(|l| l.shape() == graphic).count(),
            GraphicKind::Table(table) => table.cells().iter().filter(|c| **c == graphic).count(),
            GraphicKind::Shape(_) | GraphicKind::ConnectorShape(_) => 0,
        };
    }
    count
}

proptest! {
    #[test]
    fn resolution_round_trip(doc in document_strategy()) {
        let diagram = build_diagram(&doc).unwrap();
        for node in diagram.nodes() {
            if let Some(head) = node.head() {
                prop_assert!(head.graphic().incoming().contains(&node.reference()));
            }
            if let Some(tail) = node.tail() {
                prop_assert!(tail.graphic().outgoing().contains(&node.reference()));
            }
            for connector in node.incoming() {
                prop_assert_eq!(connector.head(), Some(node));
            }
            for connector in node.outgoing() {
                prop_assert_eq!(connector.tail(), Some(node));
            }
        }
    }

    #[test]
    fn label_exclusivity(doc in document_strategy()) {
        let diagram = build_diagram(&doc).unwrap();
        for node in diagram.nodes() {
            prop_assert_eq!(memberships(&diagram, node.reference()), 1);

            let is_label = node.parent().is_some_and(|p| p.graphic().as_line().is_some());
            if is_label {
                prop_assert!(node.parent().unwrap().labels().any(|l| l == node));
            }
        }
    }

    #[test]
    fn geometric_symmetry(doc in document_strategy()) {
        let diagram = build_diagram(&doc).unwrap();
        for node in diagram.nodes() {
            let Some(shape) = node.graphic().as_shape() else { continue };
            for other in shape.relations().intersecting() {
                let other_shape = diagram.graphic(*other).as_shape().unwrap();
                prop_assert!(other_shape.relations().intersecting().contains(&node.reference()));
            }
            for other in shape.relations().contained() {
                let other_shape = diagram.graphic(*other).as_shape().unwrap();
                prop_assert!(other_shape.relations().containing().contains(&node.reference()));
            }
        }
    }

    #[test]
    fn incoming_lists_are_sorted_by_id(doc in document_strategy()) {
        let diagram = build_diagram(&doc).unwrap();
        for node in diagram.nodes() {
            let ids: Vec<i64> = node.incoming().map(|c| c.id().value()).collect();
            let mut sorted = ids.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(ids, sorted);
        }
    }
}
