//! UI components.

pub mod ras_graph;
