//! Weighted-tree layout engine
//!
//! Free nodes are bucketed into tiers by normalized undirected degree and laid
//! out one row per tier, busiest tier on top. Each row is ordered by the
//! median x of a node's neighbors in the row above so related nodes line up
//! vertically. Rows above the busiest occupied tier are dropped, so the tree
//! always starts at the free-node origin. Boxes are tiled above the tree like
//! in the grid layout.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use nodemap_core::{Graph, geometry::Point};

use crate::layout::{
    engines::{LayoutEngine, free_origin_y, tile_boxes},
    options::WeightedTreeOptions,
    relax::relax_boxes,
};

/// Weighted-tree layout engine.
pub struct Engine {
    options: WeightedTreeOptions,
}

impl Engine {
    pub fn new(options: WeightedTreeOptions) -> Self {
        Self { options }
    }
}

/// Undirected degree of every free node, counting only edges whose endpoints
/// both exist.
fn degrees(graph: &Graph, free: &[String]) -> HashMap<String, usize> {
    let mut degrees: HashMap<String, usize> = free.iter().map(|id| (id.clone(), 0)).collect();
    for edge in graph.edges() {
        if !graph.contains_node(edge.source()) || !graph.contains_node(edge.target()) {
            continue;
        }
        for endpoint in [edge.source(), edge.target()] {
            if let Some(degree) = degrees.get_mut(endpoint) {
                *degree += 1;
            }
        }
    }
    degrees
}

/// Neighbors of each free node restricted to the free subgraph.
fn free_neighbors(graph: &Graph, free: &[String]) -> HashMap<String, Vec<String>> {
    let free_set: HashSet<&str> = free.iter().map(String::as_str).collect();
    let mut neighbors: HashMap<String, Vec<String>> = HashMap::new();
    for edge in graph.edges() {
        let (source, target) = (edge.source(), edge.target());
        if source == target || !free_set.contains(source) || !free_set.contains(target) {
            continue;
        }
        neighbors
            .entry(source.to_string())
            .or_default()
            .push(target.to_string());
        neighbors
            .entry(target.to_string())
            .or_default()
            .push(source.to_string());
    }
    neighbors
}

/// Tier index in `0..tiers` for a degree, 0 being the least connected.
fn tier_of(degree: usize, min: usize, max: usize, tiers: usize) -> usize {
    let last = tiers.saturating_sub(1);
    let span = (max - min).max(1) as f64;
    let normalized = (degree - min) as f64 / span;
    ((normalized * last as f64).floor() as usize).min(last)
}

/// Median of a non-empty set of values; the mean of the middle pair for even
/// counts.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

impl LayoutEngine for Engine {
    fn apply(&self, graph: &mut Graph) {
        let options = &self.options;

        tile_boxes(
            graph,
            Point::new(options.start_x, options.start_y),
            options.box_margin_x,
            options.box_margin_y,
        );
        relax_boxes(graph, &options.relax);

        let free = graph.free_node_ids();
        if free.is_empty() {
            debug!("Weighted-tree layout applied to boxes only");
            return;
        }

        let tiers = options.tiers.max(1);
        let degrees = degrees(graph, &free);
        let min = degrees.values().copied().min().unwrap_or_default();
        let max = degrees.values().copied().max().unwrap_or_default();

        // Row 0 holds the highest tier
        let mut rows: Vec<Vec<&str>> = vec![Vec::new(); tiers];
        for id in &free {
            let degree = degrees.get(id).copied().unwrap_or_default();
            let rank = tiers - 1 - tier_of(degree, min, max, tiers);
            rows[rank].push(id);
        }
        // Equal degrees all land in the lowest tier; start at the first used row
        let top = rows.iter().position(|row| !row.is_empty()).unwrap_or_default();
        rows.drain(..top);

        let widest = rows.iter().map(Vec::len).max().unwrap_or_default();
        let base_x = options.start_x + widest.saturating_sub(1) as f64 * options.node_spacing / 2.0;
        let base_y = free_origin_y(graph, options.start_y, options.free_gap);
        let neighbors = free_neighbors(graph, &free);

        let mut placed: HashMap<&str, (usize, f64)> = HashMap::new();
        for (rank, row) in rows.iter_mut().enumerate() {
            let mut targets: HashMap<&str, f64> = HashMap::new();
            for &id in row.iter() {
                let mut above: Vec<f64> = neighbors
                    .get(id)
                    .into_iter()
                    .flatten()
                    .filter_map(|neighbor| placed.get(neighbor.as_str()))
                    .filter(|(placed_rank, _)| rank > 0 && *placed_rank == rank - 1)
                    .map(|(_, x)| *x)
                    .collect();
                targets.insert(id, median(&mut above).unwrap_or(base_x));
            }
            row.sort_by(|a, b| {
                let ta = targets.get(a).copied().unwrap_or(base_x);
                let tb = targets.get(b).copied().unwrap_or(base_x);
                ta.total_cmp(&tb)
            });

            let y = base_y + rank as f64 * options.tier_spacing;
            let row_start = base_x - row.len().saturating_sub(1) as f64 * options.node_spacing / 2.0;
            for (index, &id) in row.iter().enumerate() {
                let x = row_start + index as f64 * options.node_spacing;
                placed.insert(id, (rank, x));
                trace!(node = id, rank = rank, x = x; "Placed tree node");
            }
        }

        for (id, (rank, x)) in &placed {
            let y = base_y + *rank as f64 * options.tier_spacing;
            graph.set_node_position(id, Point::new(*x, y));
        }

        debug!(
            free_nodes = free.len(),
            tiers = tiers,
            min_degree = min,
            max_degree = max;
            "Weighted-tree layout applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use nodemap_core::element::{Edge, Node};

    use super::*;
    use crate::layout::engines::test_support::{memberships, mixed_graph};

    fn star() -> Graph {
        // hub -- a, hub -- b, hub -- c, a -- leaf
        let mut graph = Graph::new();
        for id in ["leaf", "a", "b", "c", "hub"] {
            graph.insert_node(Node::new(id, Point::new(0.0, 0.0))).unwrap();
        }
        for (source, target) in [("hub", "a"), ("hub", "b"), ("hub", "c"), ("a", "leaf")] {
            graph.insert_edge(Edge::new(source, target)).unwrap();
        }
        graph
    }

    #[test]
    fn test_tier_of() {
        assert_eq!(tier_of(1, 1, 4, 4), 0);
        assert_eq!(tier_of(4, 1, 4, 4), 3);
        assert_eq!(tier_of(3, 1, 5, 4), 1);
        assert_eq!(tier_of(3, 3, 3, 4), 0);
        assert_eq!(tier_of(5, 0, 5, 1), 0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 10.0]), Some(3.0));
    }

    #[test]
    fn test_degrees_skip_dangling() {
        let graph = Graph::from_json(
            r#"{
                "nodes": {
                    "hub": {"x": 0, "y": 0},
                    "a": {"x": 0, "y": 0}
                },
                "edges": [
                    {"source": "hub", "target": "a"},
                    {"source": "hub", "target": "ghost"}
                ],
                "boxes": {}
            }"#,
        )
        .unwrap();

        let free = graph.free_node_ids();
        let degrees = degrees(&graph, &free);
        assert_eq!(degrees["hub"], 1);
        assert_eq!(degrees["a"], 1);
    }

    #[test]
    fn test_highest_degree_on_top() {
        let mut graph = star();
        Engine::new(WeightedTreeOptions::default()).apply(&mut graph);

        let hub = graph.node_position("hub").unwrap();
        let a = graph.node_position("a").unwrap();
        let leaf = graph.node_position("leaf").unwrap();

        // Degrees: hub 3 -> tier 3, a 2 -> tier 1, b/c/leaf 1 -> tier 0
        assert_eq!(hub.y(), 100.0);
        assert_eq!(a.y(), 460.0);
        assert_eq!(leaf.y(), 640.0);
        for id in ["b", "c"] {
            assert_eq!(graph.node_position(id).unwrap().y(), leaf.y());
        }
    }

    #[test]
    fn test_rows_are_centered() {
        let mut graph = star();
        Engine::new(WeightedTreeOptions::default()).apply(&mut graph);

        // Widest row has 3 nodes: base x = 100 + 150
        assert_eq!(graph.node_position("hub").unwrap().x(), 250.0);
        assert_eq!(graph.node_position("a").unwrap().x(), 250.0);

        let mut bottom: Vec<f64> = ["leaf", "b", "c"]
            .iter()
            .map(|id| graph.node_position(id).unwrap().x())
            .collect();
        bottom.sort_by(f64::total_cmp);
        assert_eq!(bottom, vec![100.0, 250.0, 400.0]);
    }

    #[test]
    fn test_equal_degrees_start_at_origin() {
        let mut graph = Graph::new();
        for id in ["a", "b", "c"] {
            graph.insert_node(Node::new(id, Point::new(0.0, 0.0))).unwrap();
        }

        Engine::new(WeightedTreeOptions::default()).apply(&mut graph);

        for id in ["a", "b", "c"] {
            assert_eq!(graph.node_position(id).unwrap().y(), 100.0, "{id}");
        }
    }

    #[test]
    fn test_membership_is_preserved() {
        let mut graph = mixed_graph();
        let before = memberships(&graph);

        Engine::new(WeightedTreeOptions::default()).apply(&mut graph);

        assert_eq!(memberships(&graph), before);
        let lowest_box = graph.boxes_bounds().unwrap().max_y();
        for id in graph.free_node_ids() {
            assert!(graph.node_position(&id).unwrap().y() >= lowest_box + 120.0);
        }
    }
}
