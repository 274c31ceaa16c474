//! Force-directed layout engine
//!
//! Boxes and free nodes are simulated together as circular bodies under
//! all-pairs repulsion. Springs act only on edges whose endpoints are both free
//! nodes. There is no cooling: every iteration applies forces of the same
//! scale, so the system settles approximately rather than converging.
//!
//! Box bodies move through [`Graph::move_box_and_children`], which keeps their
//! members attached. A final relaxation pass removes leftover box overlap.

use std::collections::HashSet;

use log::debug;

use nodemap_core::{Graph, geometry::Point};

use crate::layout::{engines::LayoutEngine, options::ForceOptions, relax::relax_boxes};

/// Added to every raw center distance before it is used.
const DISTANCE_OFFSET: f64 = 0.1;
/// Lower bound for distances used as divisors.
const MIN_DISTANCE: f64 = 1.0;
/// Scale applied to the inverse-square repulsion.
const REPULSION_SCALE: f64 = 0.01;
/// Bodies closer than this fraction of their summed radii get an extra push.
const CLOSE_RANGE_FACTOR: f64 = 0.75;

/// A simulated body: either a box or a free node.
#[derive(Debug, Clone)]
enum Body {
    Box { id: String, radius: f64 },
    Node { id: String, radius: f64 },
}

impl Body {
    fn radius(&self) -> f64 {
        match self {
            Body::Box { radius, .. } | Body::Node { radius, .. } => *radius,
        }
    }

    fn center(&self, graph: &Graph) -> Option<Point> {
        match self {
            Body::Box { id, .. } => graph.group_box(id).map(|group| group.center()),
            Body::Node { id, .. } => graph.node_position(id),
        }
    }

    fn set_center(&self, graph: &mut Graph, center: Point) {
        match self {
            Body::Box { id, .. } => {
                let Some(size) = graph.group_box(id).map(|group| group.size()) else {
                    return;
                };
                let top_left =
                    center.sub_point(Point::new(size.width() / 2.0, size.height() / 2.0));
                graph.move_box_and_children(id, top_left);
            }
            Body::Node { id, .. } => {
                graph.set_node_position(id, center);
            }
        }
    }

    fn translate(&self, graph: &mut Graph, offset: Point) {
        if let Some(center) = self.center(graph) {
            self.set_center(graph, center.add_point(offset));
        }
    }
}

/// Collects box bodies followed by free-node bodies, both in insertion order.
fn collect_bodies(graph: &Graph) -> Vec<Body> {
    let boxes = graph.boxes().map(|group| Body::Box {
        id: group.id().to_string(),
        radius: group.size().max_dimension() / 2.0,
    });
    let nodes = graph
        .nodes()
        .filter(|node| graph.is_free(node.id()))
        .map(|node| Body::Node {
            id: node.id().to_string(),
            radius: node.body_radius(),
        });
    boxes.chain(nodes).collect()
}

/// Edges between two distinct, existing free nodes.
fn spring_edges(graph: &Graph) -> Vec<(String, String)> {
    let free: HashSet<String> = graph.free_node_ids().into_iter().collect();
    graph
        .edges()
        .iter()
        .filter(|edge| edge.source() != edge.target())
        .filter(|edge| free.contains(edge.source()) && free.contains(edge.target()))
        .map(|edge| (edge.source().to_string(), edge.target().to_string()))
        .collect()
}

/// Unit direction from `from` to `to` and the offset, floored distance.
fn separation(from: Point, to: Point) -> (Point, f64) {
    let delta = to.sub_point(from);
    let direction = delta.normalize_or(Point::new(1.0, 0.0));
    let distance = (delta.hypot() + DISTANCE_OFFSET).max(MIN_DISTANCE);
    (direction, distance)
}

/// Force-directed layout engine.
pub struct Engine {
    options: ForceOptions,
}

impl Engine {
    pub fn new(options: ForceOptions) -> Self {
        Self { options }
    }

    fn repel(&self, graph: &mut Graph, bodies: &[Body]) {
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (a, b) = (&bodies[i], &bodies[j]);
                let (Some(a_center), Some(b_center)) = (a.center(graph), b.center(graph)) else {
                    continue;
                };
                let (direction, distance) = separation(a_center, b_center);

                let mut push = self.options.repulsion / (distance * distance) * REPULSION_SCALE;
                let min_separation = a.radius() + b.radius();
                if distance < CLOSE_RANGE_FACTOR * min_separation {
                    push += (min_separation - distance) / 2.0;
                }

                a.translate(graph, direction.scale(-push));
                b.translate(graph, direction.scale(push));
            }
        }
    }

    fn attract(&self, graph: &mut Graph, springs: &[(String, String)]) {
        for (source, target) in springs {
            let (Some(source_pos), Some(target_pos)) =
                (graph.node_position(source), graph.node_position(target))
            else {
                continue;
            };
            let (direction, distance) = separation(source_pos, target_pos);
            let pull = (distance - self.options.ideal_edge_length) * self.options.spring_constant;

            graph.set_node_position(source, source_pos.add_point(direction.scale(pull)));
            graph.set_node_position(target, target_pos.sub_point(direction.scale(pull)));
        }
    }
}

impl LayoutEngine for Engine {
    fn apply(&self, graph: &mut Graph) {
        let bodies = collect_bodies(graph);
        let springs = spring_edges(graph);

        for _ in 0..self.options.iterations {
            self.repel(graph, &bodies);
            self.attract(graph, &springs);
        }
        let passes = relax_boxes(graph, &self.options.relax);

        debug!(
            bodies = bodies.len(),
            springs = springs.len(),
            iterations = self.options.iterations,
            relax_passes = passes;
            "Force layout applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use nodemap_core::{
        element::{Edge, GroupBox, Node},
        geometry::Size,
    };
    use proptest::prelude::*;

    use super::*;
    use crate::layout::engines::test_support::{memberships, mixed_graph};

    fn pair(distance: f64) -> Graph {
        let mut graph = Graph::new();
        graph.insert_node(Node::new("a", Point::new(0.0, 0.0))).unwrap();
        graph
            .insert_node(Node::new("b", Point::new(distance, 0.0)))
            .unwrap();
        graph
    }

    #[test]
    fn test_bodies_cover_boxes_and_free_nodes() {
        let graph = mixed_graph();
        let bodies = collect_bodies(&graph);
        assert_eq!(bodies.len(), 3 + 3);
        assert!(matches!(&bodies[0], Body::Box { radius, .. } if *radius == 100.0));
        assert!(matches!(&bodies[3], Body::Node { id, .. } if id == "free0"));
    }

    #[test]
    fn test_springs_skip_boxed_self_and_dangling() {
        let mut graph = mixed_graph();
        graph.insert_edge(Edge::new("free2", "free2")).unwrap();
        let springs = spring_edges(&graph);
        assert_eq!(
            springs,
            vec![
                ("free0".to_string(), "free1".to_string()),
                ("free1".to_string(), "free2".to_string())
            ]
        );
    }

    #[test]
    fn test_repulsion_pushes_apart() {
        let mut graph = pair(10.0);
        let options = ForceOptions {
            iterations: 1,
            ..ForceOptions::default()
        };
        Engine::new(options).apply(&mut graph);

        let a = graph.node_position("a").unwrap();
        let b = graph.node_position("b").unwrap();
        assert!(a.x() < 0.0);
        assert!(b.x() > 10.0);
        assert!(approx_eq!(f64, a.x(), -(b.x() - 10.0), epsilon = 1e-9));
    }

    #[test]
    fn test_spring_pulls_toward_ideal_length() {
        let mut graph = pair(1000.0);
        graph.insert_edge(Edge::new("a", "b")).unwrap();
        let options = ForceOptions {
            iterations: 1,
            repulsion: 0.0,
            ..ForceOptions::default()
        };
        Engine::new(options).apply(&mut graph);

        let distance = graph
            .node_position("b")
            .unwrap()
            .sub_point(graph.node_position("a").unwrap())
            .hypot();
        assert!(distance < 1000.0);
        assert!(distance > 220.0);
    }

    #[test]
    fn test_boxed_edge_never_acts_as_spring() {
        // One box far from one free node, joined by an edge from a box member.
        let build = || {
            let mut graph = Graph::new();
            graph
                .insert_box(GroupBox::new("b", Point::new(0.0, 0.0), Size::new(100.0, 100.0)))
                .unwrap();
            graph.insert_node(Node::new("member", Point::new(50.0, 50.0))).unwrap();
            graph.assign_to_box("member", Some("b")).unwrap();
            graph.insert_node(Node::new("free", Point::new(5000.0, 0.0))).unwrap();
            graph.insert_edge(Edge::new("member", "free")).unwrap();
            graph
        };
        let run = |ideal_edge_length: f64| {
            let mut graph = build();
            let options = ForceOptions {
                iterations: 20,
                repulsion: 0.0,
                ideal_edge_length,
                ..ForceOptions::default()
            };
            Engine::new(options).apply(&mut graph);
            graph.node_position("free").unwrap()
        };

        assert_eq!(run(10.0), run(4000.0));
        assert_eq!(run(10.0), Point::new(5000.0, 0.0));
    }

    #[test]
    fn test_membership_is_preserved() {
        let mut graph = mixed_graph();
        let before = memberships(&graph);
        let offset_before = graph.node_position("box2-n1").unwrap();

        Engine::new(ForceOptions::default()).apply(&mut graph);

        assert_eq!(memberships(&graph), before);
        let group = graph.group_box("box2").unwrap();
        let offset = graph
            .node_position("box2-n1")
            .unwrap()
            .sub_point(group.position());
        assert!(approx_eq!(f64, offset.x(), offset_before.x(), epsilon = 1e-6));
        assert!(approx_eq!(f64, offset.y(), offset_before.y(), epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn prop_positions_stay_finite(
            points in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..8)
        ) {
            let mut graph = Graph::new();
            for (i, (x, y)) in points.iter().enumerate() {
                graph.insert_node(Node::new(format!("n{i}"), Point::new(*x, *y))).unwrap();
            }
            for i in 1..points.len() {
                graph.insert_edge(Edge::new(format!("n{}", i - 1), format!("n{i}"))).unwrap();
            }
            let options = ForceOptions { iterations: 30, ..ForceOptions::default() };
            Engine::new(options).apply(&mut graph);

            for node in graph.nodes() {
                prop_assert!(node.position().x().is_finite());
                prop_assert!(node.position().y().is_finite());
            }
        }
    }
}
