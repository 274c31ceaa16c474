//! Drag snapping.
//!
//! While a node or box is dragged, its proposed position is pulled onto grid
//! lines and onto the edges of nearby objects. Both candidate sources are
//! pooled per axis and the nearest candidate wins if it lies within the
//! configured threshold; otherwise that axis keeps its raw value.
//!
//! A node's position is its center, a box's position is its top-left corner.

use std::collections::HashSet;

use log::trace;
use serde::{Deserialize, Serialize};

use nodemap_core::{
    Graph, GraphError,
    geometry::{Bounds, Point},
};

use crate::config::SnapConfig;

/// The element being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum SnapTarget {
    Node(String),
    Box(String),
}

impl SnapTarget {
    pub fn id(&self) -> &str {
        match self {
            SnapTarget::Node(id) | SnapTarget::Box(id) => id,
        }
    }
}

/// A proposed drag position to snap.
#[derive(Debug, Clone)]
pub struct SnapRequest {
    target: SnapTarget,
    position: Point,
    exclude: HashSet<String>,
    visible_area: Option<Bounds>,
}

impl SnapRequest {
    pub fn new(target: SnapTarget, position: Point) -> Self {
        Self {
            target,
            position,
            exclude: HashSet::new(),
            visible_area: None,
        }
    }

    /// Ignores the given node or box ids as snap sources.
    pub fn excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Only objects intersecting `area` act as snap sources.
    pub fn within(mut self, area: Bounds) -> Self {
        self.visible_area = Some(area);
        self
    }

    pub fn target(&self) -> &SnapTarget {
        &self.target
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// Axis of an alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// A vertical line at a fixed x.
    X,
    /// A horizontal line at a fixed y.
    Y,
}

/// An alignment line the dragged element was snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Guide {
    pub axis: Axis,
    pub position: f64,
}

/// Outcome of a snap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    x: f64,
    y: f64,
    snapped_x: bool,
    snapped_y: bool,
    guides: Vec<Guide>,
}

impl SnapResult {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn snapped_x(&self) -> bool {
        self.snapped_x
    }

    pub fn snapped_y(&self) -> bool {
        self.snapped_y
    }

    /// Guides used for the snapped axes; empty when guides are disabled.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    value: f64,
    guide: Option<f64>,
}

/// Edge lines of one axis: the min and max coordinate of each source object.
#[derive(Debug, Default)]
struct Lines {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Lines {
    fn push(&mut self, bounds: Bounds) {
        self.x.extend([bounds.min_x(), bounds.max_x()]);
        self.y.extend([bounds.min_y(), bounds.max_y()]);
    }
}

/// Extent of the dragged element relative to its position.
fn moving_extent(graph: &Graph, target: &SnapTarget) -> Result<Bounds, GraphError> {
    match target {
        SnapTarget::Node(id) => {
            let node = graph
                .node(id)
                .ok_or_else(|| GraphError::MissingNode(id.clone()))?;
            Ok(Bounds::new_from_center(Point::default(), node.bounds().to_size()))
        }
        SnapTarget::Box(id) => {
            let group = graph
                .group_box(id)
                .ok_or_else(|| GraphError::MissingBox(id.clone()))?;
            Ok(Bounds::new_from_top_left(Point::default(), group.size()))
        }
    }
}

/// Collects edge lines of every object that may act as a snap source.
fn source_lines(graph: &Graph, request: &SnapRequest) -> Lines {
    let mut lines = Lines::default();
    let moving_box = match &request.target {
        SnapTarget::Box(id) => graph.group_box(id),
        SnapTarget::Node(_) => None,
    };
    let is_visible = |bounds: &Bounds| {
        request
            .visible_area
            .is_none_or(|area| area.overlaps(bounds, 0.0))
    };

    for node in graph.nodes() {
        let id = node.id();
        if matches!(&request.target, SnapTarget::Node(target) if target == id)
            || request.exclude.contains(id)
            || moving_box.is_some_and(|group| group.contains_node(id))
        {
            continue;
        }
        let bounds = node.bounds();
        if is_visible(&bounds) {
            lines.push(bounds);
        }
    }

    for group in graph.boxes() {
        let id = group.id();
        if matches!(&request.target, SnapTarget::Box(target) if target == id)
            || request.exclude.contains(id)
        {
            continue;
        }
        let bounds = group.bounds();
        if is_visible(&bounds) {
            lines.push(bounds);
        }
    }

    lines
}

/// Nearest candidate for one axis, if it lies within `threshold`.
///
/// `anchors` are the offsets of the element's min edge, center and max edge
/// from the raw coordinate; aligning any of them to a line is a candidate.
fn snap_axis(
    raw: f64,
    anchors: [f64; 3],
    lines: &[f64],
    grid_size: Option<f64>,
    threshold: f64,
) -> Option<Candidate> {
    let grid = grid_size.map(|size| Candidate {
        value: (raw / size).round() * size,
        guide: None,
    });
    let objects = lines.iter().flat_map(|&line| {
        anchors.into_iter().map(move |offset| Candidate {
            value: line - offset,
            guide: Some(line),
        })
    });

    let mut best: Option<(f64, Candidate)> = None;
    for candidate in grid.into_iter().chain(objects) {
        let distance = (candidate.value - raw).abs();
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, candidate));
        }
    }

    best.filter(|(distance, _)| *distance <= threshold)
        .map(|(_, candidate)| candidate)
}

/// Snaps the requested position of a node or box.
///
/// # Errors
///
/// Returns an error if the dragged node or box does not exist.
pub fn snap(
    graph: &Graph,
    request: &SnapRequest,
    config: &SnapConfig,
) -> Result<SnapResult, GraphError> {
    let raw = request.position;
    let extent = moving_extent(graph, &request.target)?;
    let lines = if config.object_snap() {
        source_lines(graph, request)
    } else {
        Lines::default()
    };
    let grid_size = Some(config.grid_size()).filter(|size| config.grid_enabled() && *size > 0.0);

    let x_anchors = [extent.min_x(), extent.center().x(), extent.max_x()];
    let y_anchors = [extent.min_y(), extent.center().y(), extent.max_y()];
    let snap_x = snap_axis(raw.x(), x_anchors, &lines.x, grid_size, config.threshold());
    let snap_y = snap_axis(raw.y(), y_anchors, &lines.y, grid_size, config.threshold());

    let mut guides = Vec::new();
    if config.show_guides() {
        if let Some(position) = snap_x.and_then(|candidate| candidate.guide) {
            guides.push(Guide {
                axis: Axis::X,
                position,
            });
        }
        if let Some(position) = snap_y.and_then(|candidate| candidate.guide) {
            guides.push(Guide {
                axis: Axis::Y,
                position,
            });
        }
    }

    let result = SnapResult {
        x: snap_x.map_or(raw.x(), |candidate| candidate.value),
        y: snap_y.map_or(raw.y(), |candidate| candidate.value),
        snapped_x: snap_x.is_some(),
        snapped_y: snap_y.is_some(),
        guides,
    };
    trace!(
        target_id = request.target.id(),
        raw:? = raw,
        snapped:? = result.position();
        "Snapped drag position"
    );
    Ok(result)
}
