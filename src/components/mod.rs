//! UI components.

/// Incremental force-directed article graph and its data model.
pub mod force_graph;
