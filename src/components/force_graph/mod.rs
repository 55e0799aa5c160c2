//! Risk-event graph: model building and the canvas that shows it.
//!
//! The graph is a forest rooted at the ticker:
//! - Filings hang off the ticker, ranked by recency
//! - Detected event categories hang off their filing
//! - A single placeholder node stands in when nothing was found
//!
//! [`build`] turns analysed filings into a [`GraphModel`]; [`ForceGraphCanvas`]
//! lays it out with a force simulation and handles pan, zoom, drag, hover and
//! tap on a canvas.
//!
//! # Example
//!
//! ```ignore
//! use risk_graph::components::force_graph::{BuildConfig, ForceGraphCanvas, build};
//!
//! let model = build(&filings, "ACME", &BuildConfig::default());
//!
//! view! { <ForceGraphCanvas model=Signal::stored(model) on_event=on_event hovered=hovered /> }
//! ```

mod builder;
mod component;
mod render;
mod state;
pub mod theme;
mod types;

pub use builder::{BuildConfig, build, sort_by_recency};
pub use component::ForceGraphCanvas;
pub use theme::{Border, Color, EventPalette, RankBorders, StyleTable, Theme};
pub use types::{
	GraphEdge, GraphModel, GraphNode, NodeKind, NodeSource, PLACEHOLDER_NODE_ID, TICKER_NODE_ID,
	TemporalClass, edge_id, event_node_id, filing_node_id,
};
