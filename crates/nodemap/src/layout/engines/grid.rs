//! Grid layout engine
//!
//! Boxes are tiled in a square-ish grid and relaxed; free nodes get their own
//! grid below the lowest box edge.

use log::debug;

use nodemap_core::{Graph, geometry::Point};

use crate::layout::{
    engines::{LayoutEngine, free_origin_y, grid_cell, grid_columns, tile_boxes},
    options::GridOptions,
    relax::relax_boxes,
};

/// Grid layout engine.
pub struct Engine {
    options: GridOptions,
}

impl Engine {
    pub fn new(options: GridOptions) -> Self {
        Self { options }
    }
}

impl LayoutEngine for Engine {
    fn apply(&self, graph: &mut Graph) {
        let options = &self.options;
        let origin = Point::new(options.start_x, options.start_y);

        tile_boxes(graph, origin, options.box_margin_x, options.box_margin_y);
        relax_boxes(graph, &options.relax);

        let free = graph.free_node_ids();
        let columns = grid_columns(free.len());
        let free_origin = Point::new(
            options.start_x,
            free_origin_y(graph, options.start_y, options.free_gap),
        );
        for (index, node_id) in free.iter().enumerate() {
            let offset = grid_cell(index, columns, options.node_margin_x, options.node_margin_y);
            graph.set_node_position(node_id, free_origin.add_point(offset));
        }

        debug!(
            boxes = graph.boxes_count(),
            free_nodes = free.len(),
            columns = columns;
            "Grid layout applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use nodemap_core::{
        element::{GroupBox, Node},
        geometry::Size,
    };

    use super::*;
    use crate::layout::engines::test_support::{memberships, mixed_graph};

    #[test]
    fn test_boxes_follow_grid_cells() {
        let mut graph = Graph::new();
        for i in 0..5 {
            graph
                .insert_box(GroupBox::new(
                    format!("b{i}"),
                    Point::new(-50.0 * i as f64, 30.0),
                    Size::new(200.0, 150.0),
                ))
                .unwrap();
        }

        Engine::new(GridOptions::default()).apply(&mut graph);

        // 5 boxes -> 3 columns
        let expected = [
            (100.0, 100.0),
            (500.0, 100.0),
            (900.0, 100.0),
            (100.0, 380.0),
            (500.0, 380.0),
        ];
        for (i, (x, y)) in expected.into_iter().enumerate() {
            let group = graph.group_box(&format!("b{i}")).unwrap();
            assert_eq!(group.position(), Point::new(x, y), "box b{i}");
        }
    }

    #[test]
    fn test_free_nodes_start_below_boxes() {
        let mut graph = Graph::new();
        graph
            .insert_box(GroupBox::new("b", Point::new(0.0, 0.0), Size::new(200.0, 150.0)))
            .unwrap();
        for i in 0..4 {
            graph
                .insert_node(Node::new(format!("n{i}"), Point::new(0.0, 0.0)))
                .unwrap();
        }

        Engine::new(GridOptions::default()).apply(&mut graph);

        // Box bottom at 250, plus the 120 gap
        assert_eq!(graph.node_position("n0"), Some(Point::new(100.0, 370.0)));
        assert_eq!(graph.node_position("n1"), Some(Point::new(250.0, 370.0)));
        assert_eq!(graph.node_position("n2"), Some(Point::new(100.0, 520.0)));
        assert_eq!(graph.node_position("n3"), Some(Point::new(250.0, 520.0)));
    }

    #[test]
    fn test_free_nodes_without_boxes_use_start() {
        let mut graph = Graph::new();
        graph.insert_node(Node::new("a", Point::new(9.0, 9.0))).unwrap();

        Engine::new(GridOptions::default()).apply(&mut graph);

        assert_eq!(graph.node_position("a"), Some(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_membership_is_preserved() {
        let mut graph = mixed_graph();
        let before = memberships(&graph);

        Engine::new(GridOptions::default()).apply(&mut graph);

        assert_eq!(memberships(&graph), before);
        let group = graph.group_box("box1").unwrap();
        // Member keeps its offset inside the box
        let offset = graph
            .node_position("box1-n0")
            .unwrap()
            .sub_point(group.position());
        assert_eq!(offset, Point::new(50.0, 60.0));
    }

    #[test]
    fn test_empty_graph() {
        let mut graph = Graph::new();
        Engine::new(GridOptions::default()).apply(&mut graph);
        assert_eq!(graph.nodes_count(), 0);
    }
}
