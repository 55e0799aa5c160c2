//! UI components.

pub mod detail_modal;
pub mod force_graph;
pub mod fundamentals_panel;
