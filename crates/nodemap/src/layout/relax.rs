//! Box overlap relaxation.
//!
//! A greedy pairwise solver: every pass visits each unordered pair of boxes in
//! insertion order and, if the padded rectangles overlap, pushes the two boxes
//! apart along the line between their centers. Moves go through
//! [`Graph::move_box_and_children`] so owned nodes travel with their box.
//!
//! The heuristic is order dependent and does not guarantee convergence; large
//! box counts can leave residual overlap once the pass budget runs out.

use std::f64::consts::TAU;

use log::{debug, trace};

use nodemap_core::{Graph, geometry::Point};

use super::options::RelaxOptions;

/// Pushes overlapping boxes apart. Returns the number of passes that moved
/// at least one box.
pub fn relax_boxes(graph: &mut Graph, options: &RelaxOptions) -> usize {
    let box_ids = graph.box_ids();
    let count = box_ids.len();
    if count < 2 {
        return 0;
    }

    let half_push = options.push_distance / 2.0;
    let mut passes = 0;

    for _ in 0..options.iterations {
        let mut moved = false;

        for i in 0..count {
            for j in (i + 1)..count {
                let (Some(a), Some(b)) = (graph.group_box(&box_ids[i]), graph.group_box(&box_ids[j]))
                else {
                    continue;
                };
                if !a.overlaps(b, options.padding) {
                    continue;
                }

                // Coincident stacks spread around the circle instead of along one axis
                let fallback = Point::from_angle(TAU * j as f64 / count as f64);
                let direction = b.center().sub_point(a.center()).normalize_or(fallback);
                let step = direction.scale(half_push);

                let a_target = a.position().sub_point(step);
                let b_target = b.position().add_point(step);
                graph.move_box_and_children(&box_ids[i], a_target);
                graph.move_box_and_children(&box_ids[j], b_target);

                trace!(first = box_ids[i].as_str(), second = box_ids[j].as_str(); "Separated boxes");
                moved = true;
            }
        }

        if !moved {
            break;
        }
        passes += 1;
    }

    debug!(boxes = count, passes = passes; "Box relaxation finished");
    passes
}
