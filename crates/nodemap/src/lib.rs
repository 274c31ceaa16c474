//! Nodemap - layout, snapping and analytics for box-and-node diagrams.
//!
//! A diagram is a [`Graph`] of nodes, edges and boxes that own nodes. This
//! crate rearranges such graphs with one of five layout strategies, snaps
//! dragged elements to grid lines and neighboring edges, and computes path and
//! connectivity analytics. Every operation works on a graph the caller owns;
//! layouts mutate it in place, everything else only reads it.

pub mod analytics;
pub mod config;
pub mod layout;
pub mod snap;

mod error;

pub use nodemap_core::{GraphError, element, geometry, graph::Graph};

pub use error::NodemapError;

use std::{fs, path::Path};

use log::{debug, info};

use analytics::{AnalyticsReport, AnalyticsRequest};
use config::AppConfig;
use layout::{LayoutKind, LayoutOverrides, UnknownLayout};
use snap::{SnapRequest, SnapResult};

/// Entry point for arranging and inspecting diagrams.
///
/// # Examples
///
/// ```rust
/// use nodemap::{Arranger, Graph, config::AppConfig, layout::LayoutOverrides};
///
/// let arranger = Arranger::new(AppConfig::default());
/// let mut graph = Graph::new();
/// graph.create_node(None, None, Some("Start"));
///
/// let kind = arranger
///     .arrange(&mut graph, "circle", &LayoutOverrides::new())
///     .expect("circle is a known layout");
/// assert_eq!(kind.as_str(), "circle");
/// ```
#[derive(Debug, Default)]
pub struct Arranger {
    config: AppConfig,
}

impl Arranger {
    /// Create a new arranger with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Applies the layout named `layout` to `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLayout`] if no strategy has that name. The graph is
    /// left untouched in that case.
    pub fn arrange(
        &self,
        graph: &mut Graph,
        layout: &str,
        overrides: &LayoutOverrides,
    ) -> Result<LayoutKind, UnknownLayout> {
        layout::apply(layout, graph, self.config.layout(), overrides)
    }

    /// Applies the configured default layout to `graph`.
    pub fn arrange_default(&self, graph: &mut Graph, overrides: &LayoutOverrides) -> LayoutKind {
        let kind = self.config.layout().default_kind();
        info!(layout = kind.as_str(); "Applying default layout");
        self.config.layout().layout(kind, overrides).apply(graph);
        kind
    }

    /// Computes statistics and, when requested, a path.
    pub fn analyze(&self, graph: &Graph, request: &AnalyticsRequest) -> AnalyticsReport {
        analytics::analyze(graph, request, self.config.analytics().default_algorithm())
    }

    /// Snaps a proposed drag position using the configured snapping rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the dragged node or box does not exist.
    pub fn snap(&self, graph: &Graph, request: &SnapRequest) -> Result<SnapResult, NodemapError> {
        Ok(snap::snap(graph, request, self.config.snap())?)
    }

    /// Parses a graph document.
    ///
    /// # Errors
    ///
    /// Returns [`NodemapError::Document`] carrying `json` if it is not a
    /// valid graph.
    pub fn parse_graph(&self, json: &str) -> Result<Graph, NodemapError> {
        serde_json::from_str(json).map_err(|err| NodemapError::new_document_error(err, json))
    }

    /// Reads a graph document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid graph.
    pub fn read_graph(&self, path: impl AsRef<Path>) -> Result<Graph, NodemapError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading graph");
        let json = fs::read_to_string(path)?;
        let graph = self.parse_graph(&json)?;
        debug!(
            nodes = graph.nodes_count(),
            edges = graph.edges().len(),
            boxes = graph.boxes_count();
            "Graph loaded"
        );
        Ok(graph)
    }

    /// Writes a graph document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph cannot be serialized or the file cannot
    /// be written.
    pub fn write_graph(&self, graph: &Graph, path: impl AsRef<Path>) -> Result<(), NodemapError> {
        let path = path.as_ref();
        let json = graph.to_json_pretty()?;
        fs::write(path, json)?;
        info!(path:? = path; "Graph written");
        Ok(())
    }
}
