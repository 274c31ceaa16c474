//! Configuration types for nodemap.
//!
//! Every section derives [`serde::Deserialize`] with per-field defaults, so a
//! configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Default layout and per-strategy option defaults.
//! - [`SnapConfig`] - Drag snapping behavior.
//! - [`AnalyticsConfig`] - Default path-finding algorithm.
//!
//! # Example
//!
//! ```
//! # use nodemap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.snap().threshold(), 8.0);
//! ```

use serde::Deserialize;

use crate::{
    analytics::PathAlgorithm,
    layout::{
        CircleOptions, ForceOptions, GridOptions, HierarchicalOptions, Layout, LayoutKind,
        LayoutOverrides, WeightedTreeOptions, with_overrides,
    },
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Snapping section.
    #[serde(default)]
    snap: SnapConfig,

    /// Analytics section.
    #[serde(default)]
    analytics: AnalyticsConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, snap: SnapConfig, analytics: AnalyticsConfig) -> Self {
        Self {
            layout,
            snap,
            analytics,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the snapping configuration.
    pub fn snap(&self) -> &SnapConfig {
        &self.snap
    }

    /// Returns the analytics configuration.
    pub fn analytics(&self) -> &AnalyticsConfig {
        &self.analytics
    }
}

/// Layout defaults.
///
/// Holds the layout used when none is requested and the baseline options of
/// each strategy. Per-call overrides are folded on top of these by
/// [`LayoutConfig::layout`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    default_kind: LayoutKind,
    grid: GridOptions,
    circle: CircleOptions,
    hierarchical: HierarchicalOptions,
    force: ForceOptions,
    weighted_tree: WeightedTreeOptions,
}

impl LayoutConfig {
    /// Returns the layout used when a caller names none.
    pub fn default_kind(&self) -> LayoutKind {
        self.default_kind
    }

    /// Resolves `kind` to a [`Layout`], applying recognized `overrides` on
    /// top of the configured options.
    pub fn layout(&self, kind: LayoutKind, overrides: &LayoutOverrides) -> Layout {
        match kind {
            LayoutKind::Grid => Layout::Grid(with_overrides(self.grid, overrides)),
            LayoutKind::Circle => Layout::Circle(with_overrides(self.circle, overrides)),
            LayoutKind::Hierarchical => {
                Layout::Hierarchical(with_overrides(self.hierarchical, overrides))
            }
            LayoutKind::Force => Layout::Force(with_overrides(self.force, overrides)),
            LayoutKind::WeightedTree => {
                Layout::WeightedTree(with_overrides(self.weighted_tree, overrides))
            }
        }
    }
}

/// Drag snapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    grid_enabled: bool,
    grid_size: f64,
    object_snap: bool,
    show_guides: bool,
    threshold: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            grid_enabled: true,
            grid_size: 20.0,
            object_snap: true,
            show_guides: true,
            threshold: 8.0,
        }
    }
}

impl SnapConfig {
    /// Returns true if positions snap to grid lines.
    pub fn grid_enabled(&self) -> bool {
        self.grid_enabled
    }

    /// Returns the grid cell size.
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Returns true if positions snap to the edges of other objects.
    pub fn object_snap(&self) -> bool {
        self.object_snap
    }

    /// Returns true if snap results carry alignment guides.
    pub fn show_guides(&self) -> bool {
        self.show_guides
    }

    /// Returns the maximum distance a coordinate may travel when snapping.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn with_grid(mut self, enabled: bool, size: f64) -> Self {
        self.grid_enabled = enabled;
        self.grid_size = size;
        self
    }

    pub fn with_object_snap(mut self, enabled: bool) -> Self {
        self.object_snap = enabled;
        self
    }

    pub fn with_guides(mut self, show: bool) -> Self {
        self.show_guides = show;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Analytics configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    default_algorithm: PathAlgorithm,
}

impl AnalyticsConfig {
    /// Returns the path algorithm used when a request names none.
    pub fn default_algorithm(&self) -> PathAlgorithm {
        self.default_algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().default_kind(), LayoutKind::Grid);
        assert!(config.snap().grid_enabled());
        assert_eq!(config.snap().grid_size(), 20.0);
        assert_eq!(config.analytics().default_algorithm(), PathAlgorithm::Auto);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            default_kind = "weightedTree"

            [layout.force]
            iterations = 10

            [layout.weighted_tree]
            tiers = 6

            [snap]
            threshold = 4.0
            grid_enabled = false

            [analytics]
            default_algorithm = "bfs"
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().default_kind(), LayoutKind::WeightedTree);
        assert_eq!(config.snap().threshold(), 4.0);
        assert!(!config.snap().grid_enabled());
        assert_eq!(config.snap().grid_size(), 20.0);
        assert_eq!(config.analytics().default_algorithm(), PathAlgorithm::Bfs);

        match config.layout().layout(LayoutKind::Force, &LayoutOverrides::new()) {
            Layout::Force(options) => {
                assert_eq!(options.iterations, 10);
                assert_eq!(options.repulsion, 20000.0);
            }
            other => panic!("unexpected layout {other:?}"),
        }
        match config
            .layout()
            .layout(LayoutKind::WeightedTree, &LayoutOverrides::new())
        {
            Layout::WeightedTree(options) => assert_eq!(options.tiers, 6),
            other => panic!("unexpected layout {other:?}"),
        }
    }

    #[test]
    fn test_overrides_win_over_config() {
        let config: LayoutConfig = toml::from_str("[grid]\nstart_x = 10.0\n").unwrap();
        let overrides: LayoutOverrides = [("startX".to_string(), 20.0)].into_iter().collect();

        match config.layout(LayoutKind::Grid, &overrides) {
            Layout::Grid(options) => assert_eq!(options.start_x, 20.0),
            other => panic!("unexpected layout {other:?}"),
        }
        match config.layout(LayoutKind::Grid, &LayoutOverrides::new()) {
            Layout::Grid(options) => assert_eq!(options.start_x, 10.0),
            other => panic!("unexpected layout {other:?}"),
        }
    }
}
