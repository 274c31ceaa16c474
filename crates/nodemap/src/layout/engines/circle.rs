//! Circle layout engine
//!
//! Boxes are spread evenly around an outer ring and relaxed afterwards. Free
//! nodes sit on a smaller inner ring around the same center, independent of
//! where the boxes end up.

use std::f64::consts::TAU;

use log::debug;

use nodemap_core::{
    Graph,
    geometry::{Point, Size},
};

use crate::layout::{engines::LayoutEngine, options::CircleOptions, relax::relax_boxes};

/// Circle layout engine.
pub struct Engine {
    options: CircleOptions,
}

impl Engine {
    pub fn new(options: CircleOptions) -> Self {
        Self { options }
    }

    /// Ring center: explicit coordinates win, otherwise the world point at
    /// the middle of the visible viewport.
    fn center(&self, graph: &Graph) -> Point {
        let options = &self.options;
        let viewport = Size::new(options.viewport_width, options.viewport_height);
        let visible = graph
            .view()
            .copied()
            .unwrap_or_default()
            .visible_center(viewport);
        Point::new(
            options.center_x.unwrap_or(visible.x()),
            options.center_y.unwrap_or(visible.y()),
        )
    }
}

/// Point `index` of `count` evenly spaced points on a circle.
fn ring_point(center: Point, radius: f64, index: usize, count: usize) -> Point {
    let angle = TAU * index as f64 / count as f64;
    center.add_point(Point::from_angle(angle).scale(radius))
}

impl LayoutEngine for Engine {
    fn apply(&self, graph: &mut Graph) {
        let center = self.center(graph);

        let box_ids = graph.box_ids();
        for (index, box_id) in box_ids.iter().enumerate() {
            let Some(size) = graph.group_box(box_id).map(|group| group.size()) else {
                continue;
            };
            let box_center = ring_point(center, self.options.outer_radius, index, box_ids.len());
            let top_left = box_center.sub_point(Point::new(size.width() / 2.0, size.height() / 2.0));
            graph.move_box_and_children(box_id, top_left);
        }
        relax_boxes(graph, &self.options.relax);

        let free = graph.free_node_ids();
        for (index, node_id) in free.iter().enumerate() {
            let position = ring_point(center, self.options.inner_radius, index, free.len());
            graph.set_node_position(node_id, position);
        }

        debug!(
            center:? = center,
            boxes = box_ids.len(),
            free_nodes = free.len();
            "Circle layout applied"
        );
    }
}
