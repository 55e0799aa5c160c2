//! Turns analysed filings into the graph model.
//!
//! Layout of the result: one ticker node in the middle, one node per filing
//! pointing at it, and one node per detected event category pointing at its
//! filing. Ids depend only on role, filing number and category position, so
//! rebuilding from the same input yields the same ids.

use std::collections::HashSet;

use log::{info, warn};

use super::theme::{EventPalette, RankBorders, StyleTable};
use super::types::{
	GraphEdge, GraphModel, GraphNode, NodeKind, NodeSource, PLACEHOLDER_NODE_ID, TICKER_NODE_ID,
	TemporalClass, event_node_id, filing_node_id,
};
use crate::analysis::{EventCategory, Filing};

/// The configuration tables the builder reads.
#[derive(Clone, Debug, Default)]
pub struct BuildConfig {
	/// Event fill and border colors.
	pub palette: EventPalette,
	/// Filing borders by recency rank.
	pub ranks: RankBorders,
	/// Per-kind sizes and fills.
	pub style: StyleTable,
}

/// Filings sorted by `days_ago` ascending; filings without an age go last in
/// input order.
pub fn sort_by_recency(filings: &[Filing]) -> Vec<&Filing> {
	by_recency(filings).into_iter().map(|(_, f)| f).collect()
}

/// Like [`sort_by_recency`], keeping each filing's input position.
fn by_recency(filings: &[Filing]) -> Vec<(usize, &Filing)> {
	let mut sorted: Vec<_> = filings.iter().enumerate().collect();
	sorted.sort_by_key(|(_, f)| (f.days_ago.is_none(), f.days_ago));
	sorted
}

/// Build the graph for `ticker` from its filings.
pub fn build(filings: &[Filing], ticker: &str, config: &BuildConfig) -> GraphModel {
	if filings.is_empty() {
		return placeholder(ticker, config);
	}

	let mut nodes = vec![GraphNode {
		id: TICKER_NODE_ID.to_string(),
		kind: NodeKind::Ticker,
		label: ticker.to_string(),
		color: config.style.ticker.fill,
		border_color: config.ranks.rest.color,
		border_width: config.ranks.rest.width,
		temporal_class: TemporalClass::None,
		tooltip: None,
		source: NodeSource::Ticker,
	}];
	let mut edges = Vec::new();
	let mut seen = HashSet::new();

	// Duplicates are dropped after sorting, so the most recent copy wins.
	for (filing_index, filing) in by_recency(filings) {
		if !seen.insert(filing.filing_number) {
			warn!(
				"duplicate filing number {} for {}, keeping the most recent",
				filing.filing_number, ticker
			);
			continue;
		}

		let filing_id = filing_node_id(filing.filing_number);
		// Rank counts only filings that made it into the graph.
		let border = config.ranks.for_rank(seen.len() - 1);
		nodes.push(GraphNode {
			id: filing_id.clone(),
			kind: NodeKind::Filing,
			label: format!("{} ({})", filing.form_type, filing.filing_date),
			color: config.style.filing.fill,
			border_color: border.color,
			border_width: border.width,
			temporal_class: TemporalClass::None,
			tooltip: Some(filing_tooltip(filing)),
			source: NodeSource::Filing {
				filing_index,
				filing_number: filing.filing_number,
			},
		});
		edges.push(GraphEdge::new(&filing_id, TICKER_NODE_ID, ""));

		for (category_index, category) in filing.detected_event_categories.iter().enumerate() {
			let event_id = event_node_id(filing.filing_number, category_index);
			nodes.push(event_node(
				event_id.clone(),
				category,
				NodeSource::Event {
					filing_index,
					filing_number: filing.filing_number,
					category_index,
				},
				config,
			));
			let label = category
				.days_remaining
				.map(|d| format!("{d} days"))
				.unwrap_or_default();
			edges.push(GraphEdge::new(&event_id, &filing_id, label));
		}
	}

	info!(
		"built graph for {}: {} nodes, {} edges",
		ticker,
		nodes.len(),
		edges.len()
	);
	GraphModel::new(nodes, edges)
}

fn placeholder(ticker: &str, config: &BuildConfig) -> GraphModel {
	info!("no filings for {}, showing placeholder", ticker);
	let node = GraphNode {
		id: PLACEHOLDER_NODE_ID.to_string(),
		kind: NodeKind::Placeholder,
		label: format!("No risk events found for {ticker}"),
		color: config.style.placeholder.fill,
		border_color: config.ranks.rest.color,
		border_width: config.ranks.rest.width,
		temporal_class: TemporalClass::None,
		tooltip: None,
		source: NodeSource::Placeholder,
	};
	GraphModel::new(vec![node], Vec::new())
}

fn event_node(
	id: String,
	category: &EventCategory,
	source: NodeSource,
	config: &BuildConfig,
) -> GraphNode {
	GraphNode {
		id,
		kind: NodeKind::Event,
		label: category.label(),
		color: config.palette.fill_for(&category.event_type),
		border_color: config
			.palette
			.border_for(&category.event_type, category.event_nature),
		border_width: config.ranks.rest.width * 2.0,
		temporal_class: TemporalClass::from_days_remaining(category.days_remaining),
		tooltip: Some(event_tooltip(category)),
		source,
	}
}

fn filing_tooltip(filing: &Filing) -> String {
	match filing.days_ago {
		Some(days) => format!(
			"{} filed {} ({} days ago)",
			filing.form_type, filing.filing_date, days
		),
		None => format!("{} filed {}", filing.form_type, filing.filing_date),
	}
}

fn event_tooltip(category: &EventCategory) -> String {
	let mut lines = vec![category.label()];
	if let Some(description) = &category.description {
		lines.push(description.clone());
	}
	if let Some(count) = category.count {
		lines.push(format!("{count} occurrence(s)"));
	}
	if let Some(typical) = &category.representative_match {
		lines.push(format!("Typical match: \"{typical}\""));
	}
	if let Some(days) = category.t_star_days {
		lines.push(format!("Typical duration: {days} days"));
	}
	match (&category.event_started_on, &category.event_ends_on) {
		(Some(start), Some(end)) => lines.push(format!("Window: {start} to {end}")),
		(Some(start), None) => lines.push(format!("Started: {start}")),
		(None, Some(end)) => lines.push(format!("Ends: {end}")),
		(None, None) => {}
	}
	if let Some(relation) = &category.time_relation {
		lines.push(format!("Timing: {relation}"));
	}
	lines.join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{Value, json};

	fn filings(value: Value) -> Vec<Filing> {
		serde_json::from_value(value).unwrap()
	}

	fn node<'a>(model: &'a GraphModel, id: &str) -> &'a GraphNode {
		model.node(id).unwrap()
	}

	#[test]
	fn empty_filings_give_a_single_placeholder() {
		let model = build(&[], "ABC", &BuildConfig::default());
		assert_eq!(model.nodes().len(), 1);
		assert!(model.edges().is_empty());
		assert_eq!(model.nodes()[0].kind, NodeKind::Placeholder);
		assert!(model.nodes()[0].label.contains("ABC"));
	}

	#[test]
	fn one_filing_with_two_events() {
		let input = filings(json!([{
			"filing_number": 1,
			"form_type": "10-Q",
			"filing_date": "2024-05-01",
			"days_ago": 10,
			"detected_event_categories": [
				{ "event_type": "going_concern_opinion", "days_remaining": 30 },
				{ "event_type": "litigation" },
			],
		}]));
		let model = build(&input, "ABC", &BuildConfig::default());

		let count = |kind| model.nodes().iter().filter(|n| n.kind == kind).count();
		assert_eq!(model.nodes().len(), 4);
		assert_eq!(count(NodeKind::Ticker), 1);
		assert_eq!(count(NodeKind::Filing), 1);
		assert_eq!(count(NodeKind::Event), 2);
		assert_eq!(model.edges().len(), 3);

		let filing_edge = model.edges().iter().find(|e| e.source == "filing-1").unwrap();
		assert_eq!(filing_edge.target, TICKER_NODE_ID);
		assert_eq!(filing_edge.label, "");

		let labelled = model.edges().iter().find(|e| e.source == "event-1-0").unwrap();
		assert_eq!(labelled.target, "filing-1");
		assert_eq!(labelled.label, "30 days");
		let unlabelled = model.edges().iter().find(|e| e.source == "event-1-1").unwrap();
		assert_eq!(unlabelled.label, "");
		assert_eq!(unlabelled.id, "event-1-1->filing-1");
	}

	#[test]
	fn most_recent_filing_gets_strongest_border() {
		let input = filings(json!([
			{ "filing_number": 1, "days_ago": 50 },
			{ "filing_number": 2, "days_ago": 5 },
		]));
		let config = BuildConfig::default();
		let model = build(&input, "ABC", &config);

		let recent = node(&model, "filing-2");
		assert_eq!(recent.border_color, config.ranks.latest.color);
		assert_eq!(recent.border_width, config.ranks.latest.width);
		let older = node(&model, "filing-1");
		assert_eq!(older.border_color, config.ranks.second.color);
		assert_eq!(older.border_width, config.ranks.second.width);
	}

	#[test]
	fn filings_without_age_sort_last_and_stay_stable() {
		let input = filings(json!([
			{ "filing_number": 1 },
			{ "filing_number": 2, "days_ago": 90 },
			{ "filing_number": 3 },
			{ "filing_number": 4, "days_ago": 3 },
		]));
		let order: Vec<u32> = sort_by_recency(&input)
			.iter()
			.map(|f| f.filing_number)
			.collect();
		assert_eq!(order, vec![4, 2, 1, 3]);

		let config = BuildConfig::default();
		let model = build(&input, "ABC", &config);
		assert_eq!(node(&model, "filing-4").border_width, config.ranks.latest.width);
		assert_eq!(node(&model, "filing-2").border_width, config.ranks.second.width);
		assert_eq!(node(&model, "filing-1").border_width, config.ranks.rest.width);
		assert_eq!(node(&model, "filing-3").border_width, config.ranks.rest.width);
	}

	#[test]
	fn temporal_class_follows_days_remaining_sign() {
		let input = filings(json!([{
			"filing_number": 7,
			"detected_event_categories": [
				{ "event_type": "debt_default", "days_remaining": -3 },
				{ "event_type": "debt_default", "days_remaining": 4 },
				{ "event_type": "debt_default" },
				{ "event_type": "debt_default", "days_remaining": 0 },
			],
		}]));
		let model = build(&input, "ABC", &BuildConfig::default());
		assert_eq!(node(&model, "event-7-0").temporal_class, TemporalClass::Past);
		assert_eq!(node(&model, "event-7-1").temporal_class, TemporalClass::Future);
		assert_eq!(node(&model, "event-7-2").temporal_class, TemporalClass::None);
		assert_eq!(node(&model, "event-7-3").temporal_class, TemporalClass::None);
	}

	#[test]
	fn event_colors_come_from_the_palette() {
		let input = filings(json!([{
			"filing_number": 1,
			"detected_event_categories": [
				{ "event_type": "going_concern_opinion", "event_nature": "single" },
				{ "event_type": "something_new", "event_nature": "process" },
				{ "event_type": "litigation" },
			],
		}]));
		let config = BuildConfig::default();
		let model = build(&input, "ABC", &config);
		let palette = &config.palette;

		let known = node(&model, "event-1-0");
		assert_eq!(known.color, palette.fill_for("going_concern_opinion"));
		assert_eq!(known.border_color, palette.single_border);
		assert_eq!(known.label, "Going Concern Opinion");

		let unknown = node(&model, "event-1-1");
		assert_eq!(unknown.color, palette.default_fill);
		assert_eq!(unknown.border_color, palette.process_border);

		let by_type = node(&model, "event-1-2");
		assert_eq!(by_type.border_color, palette.border["litigation"]);
	}

	#[test]
	fn rebuilding_gives_identical_ids() {
		let input = filings(json!([
			{ "filing_number": 3, "days_ago": 20, "detected_event_categories": [
				{ "event_type": "layoffs" }, { "event_type": "restatement" }
			]},
			{ "filing_number": 1, "days_ago": 2, "detected_event_categories": [
				{ "event_type": "litigation" }
			]},
		]));
		let config = BuildConfig::default();
		let first = build(&input, "ABC", &config);
		let second = build(&input, "ABC", &config);

		let ids = |m: &GraphModel| {
			(
				m.nodes().iter().map(|n| n.id.clone()).collect::<Vec<_>>(),
				m.edges().iter().map(|e| e.id.clone()).collect::<Vec<_>>(),
			)
		};
		assert_eq!(ids(&first), ids(&second));
		assert_eq!(first, second);
		assert!(first.node("event-3-1").is_some());
		assert!(first.node("event-1-0").is_some());
	}

	#[test]
	fn duplicate_filing_numbers_keep_the_most_recent() {
		let input = filings(json!([
			{ "filing_number": 1, "days_ago": 90, "form_type": "8-K" },
			{ "filing_number": 1, "days_ago": 5, "form_type": "10-K" },
			{ "filing_number": 2, "days_ago": 12 },
		]));
		let config = BuildConfig::default();
		let model = build(&input, "ABC", &config);
		assert_eq!(model.nodes().len(), 3);
		assert!(node(&model, "filing-1").label.starts_with("10-K"));
		assert_eq!(
			node(&model, "filing-1").source,
			NodeSource::Filing {
				filing_index: 1,
				filing_number: 1
			}
		);
		assert_eq!(node(&model, "filing-2").border_width, config.ranks.second.width);
	}

	#[test]
	fn edges_form_a_forest_rooted_at_the_ticker() {
		let input = filings(json!([
			{ "filing_number": 1, "detected_event_categories": [{ "event_type": "layoffs" }] },
			{ "filing_number": 2, "detected_event_categories": [{ "event_type": "layoffs" }] },
		]));
		let model = build(&input, "ABC", &BuildConfig::default());
		for edge in model.edges() {
			let source = node(&model, &edge.source);
			let target = node(&model, &edge.target);
			match source.kind {
				NodeKind::Filing => assert_eq!(target.kind, NodeKind::Ticker),
				NodeKind::Event => assert_eq!(target.kind, NodeKind::Filing),
				other => panic!("unexpected edge source {other:?}"),
			}
		}
		assert_eq!(model.edges().len(), model.nodes().len() - 1);

		let mut around_filing: Vec<_> = model.neighbors("filing-2").collect();
		around_filing.sort();
		assert_eq!(around_filing, vec!["event-2-0", TICKER_NODE_ID]);
	}

	#[test]
	fn event_tooltip_lists_typical_match_and_window() {
		let input = filings(json!([{
			"filing_number": 7,
			"detected_event_categories": [{
				"event_type": "debt_default",
				"count": 2,
				"representative_match": "event of default",
				"T_star_days": 180,
				"event_started_on": "2024-01-10",
				"event_ends_on": "2024-07-08",
			}],
		}]));
		let model = build(&input, "ABC", &BuildConfig::default());
		let tooltip = node(&model, "event-7-0").tooltip.clone().unwrap();
		assert_eq!(
			tooltip.lines().collect::<Vec<_>>(),
			vec![
				"Debt Default",
				"2 occurrence(s)",
				"Typical match: \"event of default\"",
				"Typical duration: 180 days",
				"Window: 2024-01-10 to 2024-07-08",
			]
		);
	}
}
