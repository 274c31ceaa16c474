//! Layout dispatch.
//!
//! A layout is selected by its identifier (`grid`, `circle`, `hierarchical`,
//! `force`, `weightedTree`), resolved to a [`Layout`] carrying the typed
//! options for that strategy, and applied to a graph in place.

mod engines;
mod options;
mod relax;

pub use engines::{
    CircleEngine, ForceEngine, GridEngine, HierarchicalEngine, LayoutEngine, WeightedTreeEngine,
};
pub use options::{
    CircleOptions, ForceOptions, GridOptions, HierarchicalOptions, LayoutOverrides, RelaxOptions,
    WeightedTreeOptions,
};
pub use relax::relax_boxes;

pub(crate) use options::with_overrides;

use std::{fmt, str::FromStr};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nodemap_core::Graph;

use crate::config::LayoutConfig;

/// Identifier of a layout strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutKind {
    #[default]
    Grid,
    Circle,
    Hierarchical,
    Force,
    WeightedTree,
}

impl LayoutKind {
    /// All strategies, in menu order.
    pub const ALL: [LayoutKind; 5] = [
        LayoutKind::Grid,
        LayoutKind::Circle,
        LayoutKind::Hierarchical,
        LayoutKind::Force,
        LayoutKind::WeightedTree,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Grid => "grid",
            LayoutKind::Circle => "circle",
            LayoutKind::Hierarchical => "hierarchical",
            LayoutKind::Force => "force",
            LayoutKind::WeightedTree => "weightedTree",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A layout identifier that names no known strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown layout type: {0}")]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutKind {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

/// A layout strategy together with its resolved options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    Grid(GridOptions),
    Circle(CircleOptions),
    Hierarchical(HierarchicalOptions),
    Force(ForceOptions),
    WeightedTree(WeightedTreeOptions),
}

impl Layout {
    pub fn kind(&self) -> LayoutKind {
        match self {
            Layout::Grid(_) => LayoutKind::Grid,
            Layout::Circle(_) => LayoutKind::Circle,
            Layout::Hierarchical(_) => LayoutKind::Hierarchical,
            Layout::Force(_) => LayoutKind::Force,
            Layout::WeightedTree(_) => LayoutKind::WeightedTree,
        }
    }

    /// Builds the engine for this strategy.
    pub fn engine(&self) -> Box<dyn LayoutEngine> {
        match *self {
            Layout::Grid(options) => Box::new(GridEngine::new(options)),
            Layout::Circle(options) => Box::new(CircleEngine::new(options)),
            Layout::Hierarchical(options) => Box::new(HierarchicalEngine::new(options)),
            Layout::Force(options) => Box::new(ForceEngine::new(options)),
            Layout::WeightedTree(options) => Box::new(WeightedTreeEngine::new(options)),
        }
    }

    /// Rearranges `graph` in place.
    pub fn apply(&self, graph: &mut Graph) {
        self.engine().apply(graph);
    }
}

/// Applies the layout named `name` to `graph`.
///
/// An unknown name is not fatal: it is logged, the graph is left untouched
/// and the error is handed back so the caller can surface it.
pub fn apply(
    name: &str,
    graph: &mut Graph,
    config: &LayoutConfig,
    overrides: &LayoutOverrides,
) -> Result<LayoutKind, UnknownLayout> {
    let kind = match name.parse::<LayoutKind>() {
        Ok(kind) => kind,
        Err(err) => {
            warn!(layout = name; "{err}, leaving graph untouched");
            return Err(err);
        }
    };

    info!(
        layout = kind.as_str(),
        nodes = graph.nodes_count(),
        boxes = graph.boxes_count(),
        edges = graph.edges().len();
        "Applying layout"
    );
    config.layout(kind, overrides).apply(graph);
    Ok(kind)
}
