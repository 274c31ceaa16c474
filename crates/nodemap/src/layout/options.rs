//! Strongly typed options for every layout strategy.
//!
//! Each strategy has its own options struct with the documented defaults.
//! Editors send a loose `map<string, number>`; [`with_overrides`] folds such a
//! map into a typed struct, ignoring keys the strategy does not know.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

/// Loosely typed option overrides keyed by camelCase option name.
pub type LayoutOverrides = HashMap<String, f64>;

/// Options that accept named numeric overrides.
pub(crate) trait Overridable {
    /// Applies one override. Returns false if the key is not recognized.
    fn set_option(&mut self, key: &str, value: f64) -> bool;
}

/// Returns `options` with every recognized, finite override applied.
pub(crate) fn with_overrides<T: Overridable>(mut options: T, overrides: &LayoutOverrides) -> T {
    for (key, &value) in overrides {
        if !value.is_finite() {
            debug!(key = key.as_str(), value = value; "Ignoring non-finite layout option");
            continue;
        }
        if !options.set_option(key, value) {
            debug!(key = key.as_str(); "Ignoring unknown layout option");
        }
    }
    options
}

fn to_count(value: f64) -> usize {
    value.max(0.0).round() as usize
}

/// Box overlap relaxation settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelaxOptions {
    /// Clearance added on every side of each box before the overlap test.
    pub padding: f64,
    /// Maximum number of full passes over all box pairs.
    pub iterations: usize,
    /// Total separation applied to an overlapping pair per visit, split evenly.
    pub push_distance: f64,
}

impl Default for RelaxOptions {
    fn default() -> Self {
        Self {
            padding: 40.0,
            iterations: 50,
            push_distance: 40.0,
        }
    }
}

impl RelaxOptions {
    /// Defaults for the shorter post-pass used by force and weighted-tree layouts.
    pub fn post_pass() -> Self {
        Self {
            iterations: 30,
            ..Self::default()
        }
    }
}

impl Overridable for RelaxOptions {
    fn set_option(&mut self, key: &str, value: f64) -> bool {
        match key {
            "separationPadding" => self.padding = value,
            "separationIterations" => self.iterations = to_count(value),
            "pushDistance" => self.push_distance = value,
            _ => return false,
        }
        true
    }
}

/// Grid layout: boxes and free nodes tiled in square-ish grids.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub start_x: f64,
    pub start_y: f64,
    pub box_margin_x: f64,
    pub box_margin_y: f64,
    pub node_margin_x: f64,
    pub node_margin_y: f64,
    /// Vertical gap between the lowest box edge and the first node row.
    pub free_gap: f64,
    pub relax: RelaxOptions,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            start_y: 100.0,
            box_margin_x: 400.0,
            box_margin_y: 280.0,
            node_margin_x: 150.0,
            node_margin_y: 150.0,
            free_gap: 120.0,
            relax: RelaxOptions::default(),
        }
    }
}

impl Overridable for GridOptions {
    fn set_option(&mut self, key: &str, value: f64) -> bool {
        match key {
            "startX" => self.start_x = value,
            "startY" => self.start_y = value,
            "boxMarginX" => self.box_margin_x = value,
            "boxMarginY" => self.box_margin_y = value,
            "nodeMarginX" => self.node_margin_x = value,
            "nodeMarginY" => self.node_margin_y = value,
            "freeGap" => self.free_gap = value,
            _ => return self.relax.set_option(key, value),
        }
        true
    }
}

/// Circle layout: boxes on an outer ring, free nodes on an inner ring.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CircleOptions {
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Explicit center; when unset the center of the visible viewport is used.
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    /// Screen size used to derive the visible center from the view transform.
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub relax: RelaxOptions,
}

impl Default for CircleOptions {
    fn default() -> Self {
        Self {
            outer_radius: 600.0,
            inner_radius: 350.0,
            center_x: None,
            center_y: None,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            relax: RelaxOptions::default(),
        }
    }
}

impl Overridable for CircleOptions {
    fn set_option(&mut self, key: &str, value: f64) -> bool {
        match key {
            "outerRadius" => self.outer_radius = value,
            "innerRadius" => self.inner_radius = value,
            "centerX" => self.center_x = Some(value),
            "centerY" => self.center_y = Some(value),
            "viewportWidth" => self.viewport_width = value,
            "viewportHeight" => self.viewport_height = value,
            _ => return self.relax.set_option(key, value),
        }
        true
    }
}

/// Hierarchical layout: boxes in a top grid, free nodes in BFS levels below.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HierarchicalOptions {
    pub start_x: f64,
    pub start_y: f64,
    pub box_margin_x: f64,
    pub box_margin_y: f64,
    pub node_margin_x: f64,
    pub node_margin_y: f64,
    pub free_gap: f64,
    pub relax: RelaxOptions,
}

impl Default for HierarchicalOptions {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            start_y: 100.0,
            box_margin_x: 400.0,
            box_margin_y: 260.0,
            node_margin_x: 180.0,
            node_margin_y: 120.0,
            free_gap: 120.0,
            relax: RelaxOptions::default(),
        }
    }
}

impl Overridable for HierarchicalOptions {
    fn set_option(&mut self, key: &str, value: f64) -> bool {
        match key {
            "startX" => self.start_x = value,
            "startY" => self.start_y = value,
            "boxMarginX" => self.box_margin_x = value,
            "boxMarginY" => self.box_margin_y = value,
            "nodeMarginX" => self.node_margin_x = value,
            "nodeMarginY" => self.node_margin_y = value,
            "freeGap" => self.free_gap = value,
            _ => return self.relax.set_option(key, value),
        }
        true
    }
}

/// Force-directed layout: all-pairs repulsion plus springs on free-free edges.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceOptions {
    pub iterations: usize,
    pub repulsion: f64,
    pub ideal_edge_length: f64,
    pub spring_constant: f64,
    pub relax: RelaxOptions,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            iterations: 150,
            repulsion: 20000.0,
            ideal_edge_length: 220.0,
            spring_constant: 0.02,
            relax: RelaxOptions::post_pass(),
        }
    }
}

impl Overridable for ForceOptions {
    fn set_option(&mut self, key: &str, value: f64) -> bool {
        match key {
            "iterations" => self.iterations = to_count(value),
            "repulsion" => self.repulsion = value,
            "idealEdgeLength" => self.ideal_edge_length = value,
            "springConstant" => self.spring_constant = value,
            _ => return self.relax.set_option(key, value),
        }
        true
    }
}

/// Weighted-tree layout: free nodes in degree tiers with median alignment.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeightedTreeOptions {
    pub start_x: f64,
    pub start_y: f64,
    pub box_margin_x: f64,
    pub box_margin_y: f64,
    pub tiers: usize,
    pub tier_spacing: f64,
    pub node_spacing: f64,
    pub free_gap: f64,
    pub relax: RelaxOptions,
}

impl Default for WeightedTreeOptions {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            start_y: 100.0,
            box_margin_x: 400.0,
            box_margin_y: 280.0,
            tiers: 4,
            tier_spacing: 180.0,
            node_spacing: 150.0,
            free_gap: 120.0,
            relax: RelaxOptions::post_pass(),
        }
    }
}

impl Overridable for WeightedTreeOptions {
    fn set_option(&mut self, key: &str, value: f64) -> bool {
        match key {
            "startX" => self.start_x = value,
            "startY" => self.start_y = value,
            "boxMarginX" => self.box_margin_x = value,
            "boxMarginY" => self.box_margin_y = value,
            "tiers" => self.tiers = to_count(value),
            "tierSpacing" => self.tier_spacing = value,
            "nodeSpacing" => self.node_spacing = value,
            "freeGap" => self.free_gap = value,
            _ => return self.relax.set_option(key, value),
        }
        true
    }
}
