//! Geometric relations between the root shapes of a page.
//!
//! Every unordered pair of distinct root shapes is tested once. Overlap is
//! recorded on both shapes; containment is recorded as `contained` on the
//! enclosing shape and `containing` on the enclosed one. The two relations
//! are tracked independently and never inferred from each other.
//! Graphics nested in groups, tables or lines take no part.

use log::debug;

use crate::{
    geometry::Bounds,
    model::{Graphic, GraphicRef, ShapeRelations},
};

/// Computes intersection and containment among `roots`.
///
/// Relation lists end up sorted by reference, which is arena order.
pub(crate) fn relate_shapes(roots: &[GraphicRef], graphics: &mut [Graphic]) {
    let shapes: Vec<(GraphicRef, Bounds)> = roots
        .iter()
        .filter_map(|root| {
            graphics[root.slot()]
                .as_shape()
                .map(|shape| (*root, shape.bounds()))
        })
        .collect();

    let mut relations = vec![ShapeRelations::default(); shapes.len()];
    let mut pairs = 0usize;

    for i in 0..shapes.len() {
        let (a, a_bounds) = shapes[i];
        for j in (i + 1)..shapes.len() {
            let (b, b_bounds) = shapes[j];

            if a_bounds.intersects(&b_bounds) {
                relations[i].intersecting.push(b);
                relations[j].intersecting.push(a);
                pairs += 1;
            }

            if a_bounds.contains(&b_bounds) {
                relations[i].contained.push(b);
                relations[j].containing.push(a);
            }

            if b_bounds.contains(&a_bounds) {
                relations[j].contained.push(a);
                relations[i].containing.push(b);
            }
        }
    }

    for ((shape, _), mut relation) in shapes.into_iter().zip(relations) {
        relation.contained.sort();
        relation.containing.sort();
        relation.intersecting.sort();
        if let Some(target) = graphics[shape.slot()].as_shape_mut() {
            *target.relations_mut() = relation;
        }
    }

    debug!(overlapping_pairs = pairs; "Related page shapes");
}
