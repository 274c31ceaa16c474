//! Hierarchical layout engine
//!
//! Boxes take the top of the canvas in the same grid as the grid layout.
//! Free nodes are leveled along edges of the free-only subgraph and laid out
//! one row per level beneath the boxes.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use nodemap_core::{Graph, geometry::Point};

use crate::layout::{
    engines::{LayoutEngine, free_origin_y, tile_boxes},
    options::HierarchicalOptions,
    relax::relax_boxes,
};

/// Hierarchical (BFS level) layout engine.
pub struct Engine {
    options: HierarchicalOptions,
}

impl Engine {
    pub fn new(options: HierarchicalOptions) -> Self {
        Self { options }
    }
}

/// Assigns a level to every free node.
///
/// All free nodes start at level 0 and are queued in insertion order. An edge
/// `u -> v` raises `v` to `level(u) + 1` whenever that is at least its current
/// level; `v` is re-queued only when its level grows. Edge direction follows
/// source to target regardless of the directed flag; edges touching a boxed or
/// missing node are ignored.
///
/// On an acyclic subgraph no level exceeds `nodes - 1`. Cycles would raise
/// forever, so levels are capped at the free node count.
fn assign_levels(graph: &Graph, free: &[String]) -> IndexMap<String, usize> {
    let mut levels: IndexMap<String, usize> = free.iter().map(|id| (id.clone(), 0)).collect();

    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut edge_count = 0;
    for edge in graph.edges() {
        if levels.contains_key(edge.source()) && levels.contains_key(edge.target()) {
            successors.entry(edge.source()).or_default().push(edge.target());
            edge_count += 1;
        }
    }

    let cap = free.len();
    let mut capped = false;
    let mut queue: VecDeque<&str> = free.iter().map(String::as_str).collect();

    while let Some(current) = queue.pop_front() {
        let next_level = levels.get(current).copied().unwrap_or_default() + 1;
        let Some(targets) = successors.get(current) else {
            continue;
        };
        for &target in targets {
            let Some(level) = levels.get_mut(target) else {
                continue;
            };
            if next_level < *level {
                continue;
            }
            if next_level > cap {
                capped = true;
                continue;
            }
            if next_level > *level {
                *level = next_level;
                trace!(node = target, level = next_level; "Raised node level");
                queue.push_back(target);
            }
        }
    }

    if capped {
        warn!(
            nodes = free.len(),
            edges = edge_count,
            cap = cap;
            "Hierarchical leveling found a cycle, levels capped"
        );
    }

    levels
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
        let levels = assign_levels(graph, &free);

        let mut rows: Vec<Vec<&str>> = Vec::new();
        for (node_id, &level) in &levels {
            if rows.len() <= level {
                rows.resize_with(level + 1, Vec::new);
            }
            rows[level].push(node_id);
        }

        let base_y = free_origin_y(graph, options.start_y, options.free_gap);
        for (level, row) in rows.iter().enumerate() {
            let y = base_y + level as f64 * options.node_margin_y;
            for (col, node_id) in row.iter().enumerate() {
                let x = options.start_x + col as f64 * options.node_margin_x;
                graph.set_node_position(node_id, Point::new(x, y));
            }
        }

        debug!(free_nodes = free.len(), levels = rows.len(); "Hierarchical layout applied");
    }
}
