//! Layout engines.
//!
//! Every strategy splits the graph into boxes (moved as a whole, members
//! following through [`Graph::move_box_and_children`]) and free nodes
//! (positioned directly). Engines only reassign coordinates; they never add or
//! remove entities and never touch box membership.

mod circle;
mod force;
mod grid;
mod hierarchical;
mod weighted_tree;

pub use circle::Engine as CircleEngine;
pub use force::Engine as ForceEngine;
pub use grid::Engine as GridEngine;
pub use hierarchical::Engine as HierarchicalEngine;
pub use weighted_tree::Engine as WeightedTreeEngine;

use nodemap_core::{Graph, geometry::Point};

/// Trait implemented by every layout strategy.
pub trait LayoutEngine {
    /// Rearranges `graph` in place.
    fn apply(&self, graph: &mut Graph);
}

/// Number of columns for a square-ish grid of `count` cells.
pub(crate) fn grid_columns(count: usize) -> usize {
    ((count as f64).sqrt().ceil() as usize).max(1)
}

/// Top-left offset of grid cell `index` relative to the grid origin.
pub(crate) fn grid_cell(index: usize, columns: usize, margin_x: f64, margin_y: f64) -> Point {
    let row = index / columns;
    let col = index % columns;
    Point::new(col as f64 * margin_x, row as f64 * margin_y)
}

/// Tiles all boxes in insertion order, top-left corners on a
/// `margin_x` × `margin_y` lattice starting at `origin`.
pub(crate) fn tile_boxes(graph: &mut Graph, origin: Point, margin_x: f64, margin_y: f64) {
    let box_ids = graph.box_ids();
    let columns = grid_columns(box_ids.len());
    for (index, box_id) in box_ids.iter().enumerate() {
        let target = origin.add_point(grid_cell(index, columns, margin_x, margin_y));
        graph.move_box_and_children(box_id, target);
    }
}

/// First y coordinate available to free nodes: `gap` below the lowest box
/// edge, or `start_y` when there are no boxes.
pub(crate) fn free_origin_y(graph: &Graph, start_y: f64, gap: f64) -> f64 {
    graph
        .boxes_bounds()
        .map(|bounds| bounds.max_y() + gap)
        .unwrap_or(start_y)
}


#[cfg(test)]
mod tests {
    use nodemap_core::{element::GroupBox, geometry::Size};

    use super::*;

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(10), 4);
    }

    #[test]
    fn test_grid_cell() {
        assert_eq!(grid_cell(4, 3, 400.0, 280.0), Point::new(400.0, 280.0));
        assert_eq!(grid_cell(2, 3, 400.0, 280.0), Point::new(800.0, 0.0));
    }

    #[test]
    fn test_free_origin_y() {
        let mut graph = Graph::new();
        assert_eq!(free_origin_y(&graph, 100.0, 120.0), 100.0);

        graph
            .insert_box(GroupBox::new("b", Point::new(0.0, 50.0), Size::new(10.0, 200.0)))
            .unwrap();
        assert_eq!(free_origin_y(&graph, 100.0, 120.0), 370.0);
    }
}
