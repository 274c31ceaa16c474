//! Diagram element types: nodes, edges, boxes and the camera view.
//!
//! Field names follow the persisted graph representation (camelCase on the
//! wire), so a graph exported by an editor round-trips through these types
//! without loss.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point, Size};

/// Body radius used for nodes that declare no explicit size.
pub const DEFAULT_NODE_RADIUS: f64 = 24.0;

fn default_node_label() -> String {
    "Node".to_string()
}

/// Visual outline of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Circle,
    Rect,
}

/// A positioned node.
///
/// The position is the node's center. A node may be owned by at most one
/// [`GroupBox`]; `box_id` is a weak back-reference maintained by
/// [`Graph`](crate::graph::Graph), while the box's member list is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    id: String,
    x: f64,
    y: f64,
    #[serde(default = "default_node_label")]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default)]
    shape: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    box_id: Option<String>,
}

impl Node {
    /// Create a circular node at `position` with the default label.
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            x: position.x(),
            y: position.y(),
            label: default_node_label(),
            color: None,
            shape: NodeShape::default(),
            radius: None,
            width: None,
            height: None,
            box_id: None,
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Make this a circle of the given radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.shape = NodeShape::Circle;
        self.radius = Some(radius);
        self
    }

    /// Make this a rectangle of the given size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.shape = NodeShape::Rect;
        self.width = Some(size.width());
        self.height = Some(size.height());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    /// Center of the node.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Id of the owning box, if any.
    pub fn box_id(&self) -> Option<&str> {
        self.box_id.as_deref()
    }

    /// Radius of the circle that encloses the node's visual.
    ///
    /// Explicit radii win, then half the larger rectangle dimension, then
    /// [`DEFAULT_NODE_RADIUS`].
    pub fn body_radius(&self) -> f64 {
        if let Some(radius) = self.radius {
            return radius;
        }
        match (self.width, self.height) {
            (None, None) => DEFAULT_NODE_RADIUS,
            (width, height) => width.unwrap_or(0.0).max(height.unwrap_or(0.0)) / 2.0,
        }
    }

    /// Visual extent of the node centered on its position.
    pub fn bounds(&self) -> Bounds {
        let size = match (self.shape, self.width, self.height) {
            (NodeShape::Rect, Some(width), Some(height)) => Size::new(width, height),
            _ => {
                let diameter = self.body_radius() * 2.0;
                Size::new(diameter, diameter)
            }
        };
        Bounds::new_from_center(self.position(), size)
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = id;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.x = position.x();
        self.y = position.y();
    }

    pub(crate) fn set_box_id(&mut self, box_id: Option<String>) {
        self.box_id = box_id;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A connection between two nodes.
///
/// Endpoints are plain ids; an edge whose endpoint does not exist is kept in
/// the graph but ignored by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    source: String,
    target: String,
    #[serde(default)]
    directed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
}

impl Edge {
    /// Create an undirected edge between two node ids.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            directed: false,
            label: None,
            color: None,
            width: None,
            weight: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Declared weight, falling back to the stroke width, then 1.
    pub fn cost(&self) -> f64 {
        self.weight.or(self.width).unwrap_or(1.0)
    }

    /// True if the edge touches `node_id` at either end.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A rectangular group that owns an ordered list of nodes.
///
/// Position and member list are read-only outside this crate. Moving a box
/// goes through [`Graph::move_box_and_children`](crate::graph::Graph::move_box_and_children),
/// which carries the members along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBox {
    #[serde(default)]
    id: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    label: String,
    #[serde(default)]
    node_ids: Vec<String>,
}

impl GroupBox {
    /// Create an empty box with its top-left corner at `top_left`.
    pub fn new(id: impl Into<String>, top_left: Point, size: Size) -> Self {
        Self {
            id: id.into(),
            x: top_left.x(),
            y: top_left.y(),
            width: size.width(),
            height: size.height(),
            label: String::new(),
            node_ids: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Seed the member list. Ownership is validated when the box is inserted
    /// into a graph.
    pub fn with_nodes<I, S>(mut self, node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_ids = node_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position(), self.size())
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Owned node ids in insertion order.
    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.node_ids.iter().any(|id| id == node_id)
    }

    /// Padding-expanded overlap test against another box.
    pub fn overlaps(&self, other: &GroupBox, padding: f64) -> bool {
        self.bounds().overlaps(&other.bounds(), padding)
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = id;
    }

    pub(crate) fn set_position(&mut self, top_left: Point) {
        self.x = top_left.x();
        self.y = top_left.y();
    }

    pub(crate) fn node_ids_mut(&mut self) -> &mut Vec<String> {
        &mut self.node_ids
    }
}

/// Camera transform of the editor canvas.
///
/// A world point `p` appears on screen at `p * scale + (tx, ty)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

impl View {
    /// Converts a screen-space point into world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let scale = if self.scale.abs() < f64::EPSILON {
            1.0
        } else {
            self.scale
        };
        Point::new((screen.x() - self.tx) / scale, (screen.y() - self.ty) / scale)
    }

    /// World-space center of a viewport of the given screen size.
    pub fn visible_center(&self, viewport: Size) -> Point {
        self.screen_to_world(Point::new(viewport.width() / 2.0, viewport.height() / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_radius_precedence() {
        let plain = Node::new("a", Point::default());
        assert_eq!(plain.body_radius(), DEFAULT_NODE_RADIUS);

        let round = Node::new("b", Point::default()).with_radius(10.0);
        assert_eq!(round.body_radius(), 10.0);

        let rect = Node::new("c", Point::default()).with_size(Size::new(80.0, 40.0));
        assert_eq!(rect.body_radius(), 40.0);
        assert_eq!(rect.bounds().to_size(), Size::new(80.0, 40.0));
    }

    #[test]
    fn test_node_wire_format() {
        let json = r#"{"id":"n1","x":10,"y":20,"boxId":"b1","shape":"rect","width":50,"height":30}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.id(), "n1");
        assert_eq!(node.label(), "Node");
        assert_eq!(node.box_id(), Some("b1"));
        assert_eq!(node.shape(), NodeShape::Rect);
        assert_eq!(node.position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_edge_cost_fallbacks() {
        assert_eq!(Edge::new("a", "b").cost(), 1.0);
        assert_eq!(Edge::new("a", "b").with_width(3.0).cost(), 3.0);
        assert_eq!(Edge::new("a", "b").with_width(3.0).with_weight(0.5).cost(), 0.5);
    }

    #[test]
    fn test_edge_wire_format() {
        let edge: Edge = serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
        assert!(!edge.is_directed());
        assert!(edge.id().is_none());
        assert!(edge.touches("a"));
        assert!(!edge.touches("c"));
    }

    #[test]
    fn test_box_wire_format() {
        let json = r#"{"id":"b","x":0,"y":0,"width":100,"height":50,"label":"Group","nodeIds":["a"]}"#;
        let group: GroupBox = serde_json::from_str(json).unwrap();
        assert!(group.contains_node("a"));
        assert_eq!(group.center(), Point::new(50.0, 25.0));

        let back = serde_json::to_value(&group).unwrap();
        assert_eq!(back["nodeIds"][0], "a");
    }

    #[test]
    fn test_view_visible_center() {
        let view = View {
            scale: 2.0,
            tx: 100.0,
            ty: 50.0,
        };
        let center = view.visible_center(Size::new(800.0, 600.0));
        assert_eq!(center, Point::new(150.0, 125.0));
    }
}
