//! Nodemap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Nodemap layout
//! engine and its front ends. It includes:
//!
//! - **Geometry**: Points, sizes and rectangles ([`geometry`] module)
//! - **Elements**: Nodes, edges, boxes and the camera view ([`element`] module)
//! - **Graph**: The editable aggregate that owns every element ([`graph`] module)

pub mod element;
pub mod error;
pub mod geometry;
pub mod graph;

pub use error::GraphError;
pub use graph::Graph;
