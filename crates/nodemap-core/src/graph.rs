//! The editable diagram graph.
//!
//! [`Graph`] is an aggregate of nodes, edges and boxes. Boxes own their member
//! nodes: the member list on each [`GroupBox`] is the source of truth, and a
//! node id appears in at most one list. Every operation here preserves that
//! invariant and keeps each node's `boxId` back-reference in sync.
//!
//! Box coordinates can only change through [`Graph::move_box_and_children`],
//! which translates the members by the same delta as the box.

use indexmap::IndexMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    element::{Edge, GroupBox, Node, View},
    error::GraphError,
    geometry::{Bounds, Point},
};

/// Persisted graph record as produced by editors and autosave.
#[derive(Debug, Default, Deserialize)]
struct GraphRecord {
    #[serde(default)]
    nodes: IndexMap<String, Node>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    boxes: IndexMap<String, GroupBox>,
    #[serde(default)]
    view: Option<View>,
}

/// A diagram: nodes keyed by id, an edge list, boxes keyed by id and an
/// optional camera view.
///
/// Maps keep insertion order, which fixes the iteration order that layout
/// algorithms depend on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphRecord")]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    boxes: IndexMap<String, GroupBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<View>,
}

impl From<GraphRecord> for Graph {
    fn from(record: GraphRecord) -> Self {
        let mut graph = Graph {
            nodes: record.nodes,
            edges: record.edges,
            boxes: record.boxes,
            view: record.view,
        };
        graph.normalize();
        graph
    }
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a graph from its JSON representation.
    ///
    /// Map keys are authoritative for ids. If a node is listed by more than
    /// one box, the first box keeps it.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: Graph = serde_json::from_str(json)?;
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            boxes = graph.boxes.len();
            "Graph loaded"
        );
        Ok(graph)
    }

    /// Serializes the graph as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn normalize(&mut self) {
        for (id, node) in &mut self.nodes {
            node.set_id(id.clone());
            node.set_box_id(None);
        }

        for (box_id, group) in &mut self.boxes {
            group.set_id(box_id.clone());

            let nodes = &mut self.nodes;
            group.node_ids_mut().retain(|node_id| match nodes.get_mut(node_id) {
                Some(node) if node.box_id().is_some() => {
                    warn!(
                        node_id = node_id.as_str(),
                        box_id = box_id.as_str();
                        "Dropping duplicate box membership"
                    );
                    false
                }
                Some(node) => {
                    node.set_box_id(Some(box_id.clone()));
                    true
                }
                None => {
                    trace!(
                        node_id = node_id.as_str(),
                        box_id = box_id.as_str();
                        "Box lists an unknown node"
                    );
                    true
                }
            });
        }
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterates boxes in insertion order.
    pub fn boxes(&self) -> impl Iterator<Item = &GroupBox> {
        self.boxes.values()
    }

    pub fn group_box(&self, id: &str) -> Option<&GroupBox> {
        self.boxes.get(id)
    }

    pub fn boxes_count(&self) -> usize {
        self.boxes.len()
    }

    /// Box ids in insertion order.
    pub fn box_ids(&self) -> Vec<String> {
        self.boxes.keys().cloned().collect()
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn set_view(&mut self, view: Option<View>) {
        self.view = view;
    }

    /// Id of the box that owns `node_id`, if any.
    pub fn owner_of(&self, node_id: &str) -> Option<&str> {
        self.boxes
            .values()
            .find(|group| group.contains_node(node_id))
            .map(GroupBox::id)
    }

    /// True if the node exists and no box owns it.
    pub fn is_free(&self, node_id: &str) -> bool {
        self.contains_node(node_id) && self.owner_of(node_id).is_none()
    }

    /// Ids of nodes not owned by any box, in insertion order.
    pub fn free_node_ids(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|id| self.owner_of(id).is_none())
            .cloned()
            .collect()
    }

    /// Smallest rectangle enclosing every box, or `None` without boxes.
    pub fn boxes_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.boxes.values().map(GroupBox::bounds))
    }

    pub fn node_position(&self, id: &str) -> Option<Point> {
        self.nodes.get(id).map(Node::position)
    }

    // ---------------------------------------------------------------------
    // Movement
    // ---------------------------------------------------------------------

    /// Moves a node's center. Returns false if the node does not exist.
    pub fn set_node_position(&mut self, id: &str, position: Point) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Moves a box's top-left corner to `top_left` and translates every owned
    /// node by the same delta.
    ///
    /// Returns the applied delta, or `None` if the box does not exist. Member
    /// ids without a node are skipped.
    pub fn move_box_and_children(&mut self, box_id: &str, top_left: Point) -> Option<Point> {
        let group = self.boxes.get_mut(box_id)?;
        let delta = top_left.sub_point(group.position());
        group.set_position(top_left);

        for node_id in group.node_ids() {
            if let Some(node) = self.nodes.get_mut(node_id) {
                let moved = node.position().add_point(delta);
                node.set_position(moved);
            }
        }
        Some(delta)
    }

    // ---------------------------------------------------------------------
    // Editing
    // ---------------------------------------------------------------------

    /// Creates a node with a fresh id. Missing fields default to
    /// `(100, 100)` and the label `"Node"`.
    pub fn create_node(&mut self, x: Option<f64>, y: Option<f64>, label: Option<&str>) -> &Node {
        let id = Uuid::new_v4().to_string();
        let mut node = Node::new(id.clone(), Point::new(x.unwrap_or(100.0), y.unwrap_or(100.0)));
        if let Some(label) = label {
            node = node.with_label(label);
        }
        self.nodes.insert(id.clone(), node);
        &self.nodes[&id]
    }

    /// Inserts or replaces a node.
    ///
    /// A `boxId` on the incoming node is honored by assigning it to that box.
    pub fn insert_node(&mut self, mut node: Node) -> Result<(), GraphError> {
        let requested_box = node.box_id().map(str::to_string);
        if let Some(box_id) = &requested_box {
            if !self.boxes.contains_key(box_id) {
                return Err(GraphError::MissingBox(box_id.clone()));
            }
        }

        let id = node.id().to_string();
        // Keep any membership the replaced node already had
        node.set_box_id(self.owner_of(&id).map(str::to_string));
        self.nodes.insert(id.clone(), node);

        if requested_box.is_some() {
            self.assign_to_box(&id, requested_box.as_deref())?;
        }
        Ok(())
    }

    /// Appends an edge. Both endpoints must exist.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        for endpoint in [edge.source(), edge.target()] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::MissingNode(endpoint.to_string()));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Inserts a box. Every listed member must exist and be free.
    pub fn insert_box(&mut self, group: GroupBox) -> Result<(), GraphError> {
        for node_id in group.node_ids() {
            if !self.contains_node(node_id) {
                return Err(GraphError::MissingNode(node_id.clone()));
            }
            match self.owner_of(node_id) {
                Some(owner) if owner != group.id() => {
                    return Err(GraphError::AlreadyOwned {
                        node: node_id.clone(),
                        owner: owner.to_string(),
                    });
                }
                _ => {}
            }
        }

        let box_id = group.id().to_string();
        for node_id in group.node_ids() {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.set_box_id(Some(box_id.clone()));
            }
        }
        if let Some(previous) = self.boxes.insert(box_id.clone(), group) {
            // Members dropped by the replacement become free
            for node_id in previous.node_ids() {
                if self.owner_of(node_id).is_some() {
                    continue;
                }
                if let Some(node) = self.nodes.get_mut(node_id) {
                    node.set_box_id(None);
                }
            }
        }
        Ok(())
    }

    /// Removes a node, its box membership and every incident edge.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let node = self.nodes.shift_remove(id)?;
        for group in self.boxes.values_mut() {
            group.node_ids_mut().retain(|member| member != id);
        }
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));
        debug!(node_id = id, removed_edges = before - self.edges.len(); "Node removed");
        Some(node)
    }

    /// Removes a box. Its members stay in the graph as free nodes.
    pub fn remove_box(&mut self, id: &str) -> Option<GroupBox> {
        let group = self.boxes.shift_remove(id)?;
        for node_id in group.node_ids() {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.set_box_id(None);
            }
        }
        Some(group)
    }

    /// Moves `node_id` into `box_id`, or frees it when `box_id` is `None`.
    pub fn assign_to_box(&mut self, node_id: &str, box_id: Option<&str>) -> Result<(), GraphError> {
        if !self.contains_node(node_id) {
            return Err(GraphError::MissingNode(node_id.to_string()));
        }
        if let Some(box_id) = box_id {
            if !self.boxes.contains_key(box_id) {
                return Err(GraphError::MissingBox(box_id.to_string()));
            }
        }

        for group in self.boxes.values_mut() {
            if Some(group.id()) != box_id {
                group.node_ids_mut().retain(|member| member != node_id);
            }
        }
        if let Some(group) = box_id.and_then(|box_id| self.boxes.get_mut(box_id)) {
            if !group.contains_node(node_id) {
                group.node_ids_mut().push(node_id.to_string());
            }
        }
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.set_box_id(box_id.map(str::to_string));
        }
        Ok(())
    }

    /// Re-derives a dragged node's membership from containment.
    ///
    /// The node joins the first box (in insertion order) whose rectangle
    /// contains its center, or becomes free. Returns the new owner.
    pub fn recompute_membership(&mut self, node_id: &str) -> Result<Option<String>, GraphError> {
        let center = self
            .node_position(node_id)
            .ok_or_else(|| GraphError::MissingNode(node_id.to_string()))?;
        let owner = self
            .boxes
            .values()
            .find(|group| group.bounds().contains_point(center))
            .map(|group| group.id().to_string());

        self.assign_to_box(node_id, owner.as_deref())?;
        Ok(owner)
    }
}
