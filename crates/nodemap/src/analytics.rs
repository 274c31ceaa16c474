//! Graph analytics: shortest paths, connected components and summary
//! statistics.
//!
//! Every call builds a fresh adjacency view over the current graph and only
//! reads from it. Edges with a missing endpoint are skipped. Path failures are
//! reported as [`PathError`] values, never as panics.

use std::{
    borrow::Cow,
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, VecDeque},
};

use log::{debug, trace};
use petgraph::{
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use nodemap_core::Graph;

/// Smallest weight an edge may carry in weighted searches.
const MIN_WEIGHT: f64 = 0.0001;

/// Shortest-path algorithm selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathAlgorithm {
    /// Dijkstra, falling back to breadth-first search.
    #[default]
    Auto,
    Bfs,
    Dijkstra,
}

/// Why no path was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Start or end node not found.")]
    EndpointNotFound,

    #[error("No path between the selected nodes.")]
    NoPath,
}

impl Serialize for PathError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A path found between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    nodes: Vec<String>,
    edges: Vec<String>,
    algorithm: PathAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<f64>,
}

impl PathResult {
    /// Node ids from start to end.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Ids of the traversed edges, `e{index}` for edges without an id.
    pub fn edges(&self) -> &[String] {
        &self.edges
    }

    /// The algorithm that produced the path.
    pub fn algorithm(&self) -> PathAlgorithm {
        self.algorithm
    }

    /// Total weight, for weighted searches only.
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }
}

/// Summary statistics of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    /// Every edge, including edges with a missing endpoint.
    pub edge_count: usize,
    pub components: usize,
    /// `2 * edges / nodes`, rounded to two decimals.
    pub average_degree: f64,
    pub max_degree: usize,
    pub isolated: usize,
}

/// An analytics query: statistics always, a path when both endpoints are set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsRequest {
    start: Option<String>,
    end: Option<String>,
    algorithm: Option<PathAlgorithm>,
}

impl AnalyticsRequest {
    /// A request for statistics only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also asks for a path from `start` to `end`.
    pub fn with_path(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    pub fn with_algorithm(mut self, algorithm: PathAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Both endpoints, if present and non-empty.
    fn endpoints(&self) -> Option<(&str, &str)> {
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => Some((start, end)),
            _ => None,
        }
    }
}

/// Result of an analytics query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    stats: GraphStats,
    path: Option<PathResult>,
    path_error: Option<PathError>,
}

impl AnalyticsReport {
    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    pub fn path(&self) -> Option<&PathResult> {
        self.path.as_ref()
    }

    pub fn path_error(&self) -> Option<PathError> {
        self.path_error
    }
}

/// One traversable direction of an edge.
#[derive(Debug)]
struct Link<'g> {
    weight: f64,
    edge_id: Cow<'g, str>,
}

/// Adjacency view over the nodes and valid edges of a [`Graph`].
struct Adjacency<'g> {
    graph: DiGraph<&'g str, Link<'g>>,
    index: HashMap<&'g str, NodeIndex>,
}

impl<'g> Adjacency<'g> {
    /// Builds the view. Unweighted arcs weigh 1. An edge contributes its
    /// reverse arc unless both the view and the edge are directed.
    fn build(source: &'g Graph, weighted: bool, directed: bool) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for node in source.nodes() {
            index.insert(node.id(), graph.add_node(node.id()));
        }

        for (position, edge) in source.edges().iter().enumerate() {
            let (Some(&from), Some(&to)) = (index.get(edge.source()), index.get(edge.target()))
            else {
                trace!(source = edge.source(), target = edge.target(); "Skipping dangling edge");
                continue;
            };
            let weight = if weighted {
                edge.cost().max(MIN_WEIGHT)
            } else {
                1.0
            };
            let edge_id: Cow<'g, str> = match edge.id() {
                Some(id) if !id.is_empty() => Cow::Borrowed(id),
                _ => Cow::Owned(format!("e{position}")),
            };

            if !directed || !edge.is_directed() {
                graph.add_edge(
                    to,
                    from,
                    Link {
                        weight,
                        edge_id: edge_id.clone(),
                    },
                );
            }
            graph.add_edge(from, to, Link { weight, edge_id });
        }

        Self { graph, index }
    }

    fn node(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Outgoing arcs of `node` in edge-list order.
    fn arcs(&self, node: NodeIndex) -> Vec<(NodeIndex, EdgeIndex)> {
        // petgraph walks outgoing edges newest first
        let mut arcs: Vec<_> = self
            .graph
            .edges(node)
            .map(|edge| (edge.target(), edge.id()))
            .collect();
        arcs.reverse();
        arcs
    }

    fn degree(&self, node: NodeIndex) -> usize {
        self.graph.edges(node).count()
    }

    /// Walks `parents` back from `end` and returns node and edge ids.
    fn trace_back(
        &self,
        parents: &[Option<(NodeIndex, EdgeIndex)>],
        end: NodeIndex,
    ) -> (Vec<String>, Vec<String>) {
        let mut nodes = vec![self.graph[end].to_string()];
        let mut edges = Vec::new();
        let mut current = end;
        while let Some((previous, edge)) = parents[current.index()] {
            edges.push(self.graph[edge].edge_id.to_string());
            nodes.push(self.graph[previous].to_string());
            current = previous;
        }
        nodes.reverse();
        edges.reverse();
        (nodes, edges)
    }

    fn bfs(&self, start: NodeIndex, end: NodeIndex) -> Option<PathResult> {
        let mut visited = vec![false; self.graph.node_count()];
        let mut parents = vec![None; self.graph.node_count()];
        let mut queue = VecDeque::from([start]);
        visited[start.index()] = true;

        while let Some(current) = queue.pop_front() {
            if current == end {
                break;
            }
            for (next, edge) in self.arcs(current) {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    parents[next.index()] = Some((current, edge));
                    queue.push_back(next);
                }
            }
        }

        if !visited[end.index()] {
            return None;
        }
        let (nodes, edges) = self.trace_back(&parents, end);
        Some(PathResult {
            nodes,
            edges,
            algorithm: PathAlgorithm::Bfs,
            cost: None,
        })
    }

    fn dijkstra(&self, start: NodeIndex, end: NodeIndex) -> Option<PathResult> {
        let mut distances = vec![f64::INFINITY; self.graph.node_count()];
        let mut parents = vec![None; self.graph.node_count()];
        let mut heap = BinaryHeap::from([State {
            cost: 0.0,
            node: start,
        }]);
        distances[start.index()] = 0.0;

        while let Some(State { cost, node }) = heap.pop() {
            if cost > distances[node.index()] {
                continue;
            }
            if node == end {
                break;
            }
            for (next, edge) in self.arcs(node) {
                let candidate = cost + self.graph[edge].weight;
                if candidate < distances[next.index()] {
                    distances[next.index()] = candidate;
                    parents[next.index()] = Some((node, edge));
                    heap.push(State {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        let cost = distances[end.index()];
        if cost.is_infinite() {
            return None;
        }
        let (nodes, edges) = self.trace_back(&parents, end);
        Some(PathResult {
            nodes,
            edges,
            algorithm: PathAlgorithm::Dijkstra,
            cost: Some(cost),
        })
    }

    /// Number of weakly connected sets, counted by iterative depth-first
    /// flood fill. Expects an undirected view.
    fn components(&self) -> usize {
        let mut visited = vec![false; self.graph.node_count()];
        let mut components = 0;
        for start in self.graph.node_indices() {
            if visited[start.index()] {
                continue;
            }
            components += 1;
            visited[start.index()] = true;
            let mut stack = vec![start];
            while let Some(current) = stack.pop() {
                for next in self.graph.neighbors(current) {
                    if !visited[next.index()] {
                        visited[next.index()] = true;
                        stack.push(next);
                    }
                }
            }
        }
        components
    }
}

/// Min-heap entry for Dijkstra.
#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes summary statistics over the undirected view of `graph`.
pub fn stats(graph: &Graph) -> GraphStats {
    let adjacency = Adjacency::build(graph, false, false);
    let node_count = graph.nodes_count();
    let edge_count = graph.edges().len();

    let degrees: Vec<usize> = adjacency
        .graph
        .node_indices()
        .map(|node| adjacency.degree(node))
        .collect();
    let average_degree = if node_count == 0 {
        0.0
    } else {
        round_to_hundredths(2.0 * edge_count as f64 / node_count as f64)
    };

    GraphStats {
        node_count,
        edge_count,
        components: adjacency.components(),
        average_degree,
        max_degree: degrees.iter().copied().max().unwrap_or_default(),
        isolated: degrees.iter().filter(|&&degree| degree == 0).count(),
    }
}

/// Number of connected components, ignoring edge direction.
pub fn component_count(graph: &Graph) -> usize {
    Adjacency::build(graph, false, false).components()
}

/// Finds a path from `start` to `end`.
///
/// Directed edges are followed from source to target only. Breadth-first
/// search minimizes hop count; Dijkstra minimizes total weight, where an
/// edge weighs its `weight`, else its `width`, else 1. [`PathAlgorithm::Auto`]
/// runs Dijkstra and falls back to breadth-first search.
pub fn shortest_path(
    graph: &Graph,
    start: &str,
    end: &str,
    algorithm: PathAlgorithm,
) -> Result<PathResult, PathError> {
    let weighted = Adjacency::build(graph, true, true);
    let (Some(from), Some(to)) = (weighted.node(start), weighted.node(end)) else {
        return Err(PathError::EndpointNotFound);
    };

    let path = match algorithm {
        PathAlgorithm::Bfs => Adjacency::build(graph, false, true).bfs(from, to),
        PathAlgorithm::Dijkstra => weighted.dijkstra(from, to),
        PathAlgorithm::Auto => weighted
            .dijkstra(from, to)
            .or_else(|| Adjacency::build(graph, false, true).bfs(from, to)),
    };
    path.ok_or(PathError::NoPath)
}

/// Runs an analytics query. `default_algorithm` applies when the request
/// names none.
pub fn analyze(
    graph: &Graph,
    request: &AnalyticsRequest,
    default_algorithm: PathAlgorithm,
) -> AnalyticsReport {
    let stats = stats(graph);
    let algorithm = request.algorithm.unwrap_or(default_algorithm);

    let (path, path_error) = match request.endpoints() {
        Some((start, end)) => match shortest_path(graph, start, end, algorithm) {
            Ok(path) => (Some(path), None),
            Err(err) => (None, Some(err)),
        },
        None => (None, None),
    };

    debug!(
        nodes = stats.node_count,
        components = stats.components,
        algorithm:? = algorithm,
        path_found = path.is_some();
        "Analytics computed"
    );
    AnalyticsReport {
        stats,
        path,
        path_error,
    }
}
