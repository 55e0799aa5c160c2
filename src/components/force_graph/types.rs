//! Graph model handed to the canvas: typed nodes and directed edges.
//!
//! The model carries display attributes only. Nodes point back to their
//! source entity through [`NodeSource`], an index into the analysis data,
//! never through the data itself.

use std::collections::HashMap;

use super::theme::Color;

/// Role of a node in the ticker -> filing -> event forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// The company the analysis is about; root of the forest.
	Ticker,
	/// One disclosure document.
	Filing,
	/// One detected risk-event category within a filing.
	Event,
	/// Stand-in node when no filings were found.
	Placeholder,
}

/// Whether an event's window lies behind or ahead of today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TemporalClass {
	/// No remaining-days figure, or exactly zero.
	#[default]
	None,
	/// Window already elapsed.
	Past,
	/// Window still ahead.
	Future,
}

impl TemporalClass {
	/// Sign of `days_remaining`: negative is past, positive is future.
	pub fn from_days_remaining(days: Option<i64>) -> Self {
		match days {
			Some(d) if d < 0 => TemporalClass::Past,
			Some(d) if d > 0 => TemporalClass::Future,
			_ => TemporalClass::None,
		}
	}
}

/// Lookup key for the entity a node was built from.
///
/// `filing_index` is the filing's position in the slice the model was built
/// from, so duplicate filing numbers still resolve to the filing kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeSource {
	/// The ticker root.
	Ticker,
	/// The empty-result placeholder.
	Placeholder,
	/// A filing node.
	Filing {
		/// Position in the input filings.
		filing_index: usize,
		/// The filing's own number.
		filing_number: u32,
	},
	/// An event-category node.
	Event {
		/// Position of the parent filing in the input filings.
		filing_index: usize,
		/// The parent filing's number.
		filing_number: u32,
		/// Position in the filing's detected categories.
		category_index: usize,
	},
}

/// A node in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Deterministic id derived from role and indices.
	pub id: String,
	/// Role in the forest.
	pub kind: NodeKind,
	/// Text drawn beside the node.
	pub label: String,
	/// Fill color.
	pub color: Color,
	/// Outline color.
	pub border_color: Color,
	/// Outline width in pixels, before temporal emphasis.
	pub border_width: f64,
	/// Past/future marker for event nodes.
	pub temporal_class: TemporalClass,
	/// Hover text.
	pub tooltip: Option<String>,
	/// What to look up when the node is tapped.
	pub source: NodeSource,
}

/// A directed edge: event -> filing or filing -> ticker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	/// `{source}->{target}`.
	pub id: String,
	/// Child node id.
	pub source: String,
	/// Parent node id.
	pub target: String,
	/// Remaining days for event edges; empty otherwise.
	pub label: String,
}

impl GraphEdge {
	/// Edge from `source` to `target` with its id derived from both.
	pub fn new(source: &str, target: &str, label: impl Into<String>) -> Self {
		Self {
			id: edge_id(source, target),
			source: source.to_string(),
			target: target.to_string(),
			label: label.into(),
		}
	}
}

/// Id of the ticker root.
pub const TICKER_NODE_ID: &str = "ticker";
/// Id of the placeholder node.
pub const PLACEHOLDER_NODE_ID: &str = "placeholder";

/// Id of the node for filing `filing_number`.
pub fn filing_node_id(filing_number: u32) -> String {
	format!("filing-{filing_number}")
}

/// Id of the node for category `category_index` of a filing.
pub fn event_node_id(filing_number: u32, category_index: usize) -> String {
	format!("event-{filing_number}-{category_index}")
}

/// Id of the edge between two nodes.
pub fn edge_id(source: &str, target: &str) -> String {
	format!("{source}->{target}")
}

/// Complete graph data: nodes and edges, with an id index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	index: HashMap<String, usize>,
}

impl GraphModel {
	/// Index `nodes` by id. Later duplicates of an id shadow earlier ones.
	pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		Self {
			nodes,
			edges,
			index,
		}
	}

	/// All nodes, in build order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// All edges, in build order.
	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// Node with the given id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index.get(id).and_then(|&i| self.nodes.get(i))
	}

	/// Ids of nodes sharing an edge with `id`.
	pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.edges.iter().filter_map(move |e| {
			if e.source == id {
				Some(e.target.as_str())
			} else if e.target == id {
				Some(e.source.as_str())
			} else {
				None
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, kind: NodeKind) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			kind,
			label: id.to_string(),
			color: Color::rgb(0, 0, 0),
			border_color: Color::rgb(0, 0, 0),
			border_width: 1.0,
			temporal_class: TemporalClass::None,
			tooltip: None,
			source: NodeSource::Ticker,
		}
	}

	#[test]
	fn lookup_goes_through_the_index() {
		let model = GraphModel::new(
			vec![node(TICKER_NODE_ID, NodeKind::Ticker), node("filing-3", NodeKind::Filing)],
			vec![GraphEdge::new("filing-3", TICKER_NODE_ID, "")],
		);
		assert_eq!(model.nodes().len(), 2);
		assert_eq!(model.edges()[0].id, "filing-3->ticker");
		assert_eq!(model.node("filing-3").map(|n| n.kind), Some(NodeKind::Filing));
		assert!(model.node("filing-4").is_none());
		assert!(GraphModel::default().node(TICKER_NODE_ID).is_none());
	}

	#[test]
	fn temporal_class_from_sign() {
		assert_eq!(TemporalClass::from_days_remaining(Some(-1)), TemporalClass::Past);
		assert_eq!(TemporalClass::from_days_remaining(Some(0)), TemporalClass::None);
		assert_eq!(TemporalClass::from_days_remaining(Some(9)), TemporalClass::Future);
		assert_eq!(TemporalClass::from_days_remaining(None), TemporalClass::None);
	}
}
