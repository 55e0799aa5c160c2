//! Inbound data model for the filing analysis service.
//!
//! The service answers with `{ ticker, filings_analyzed, results: [...] }`,
//! where each result is either a processed filing or an `{ filing_number, error }`
//! entry for a filing it failed to read.

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level response of the analysis endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnalysisResponse {
	/// Ticker echoed back by the service, upper-cased.
	#[serde(default)]
	pub ticker: Option<String>,
	/// Number of filings the service attempted.
	#[serde(default)]
	pub filings_analyzed: Option<u32>,
	/// Filings in service order.
	#[serde(default)]
	pub results: Vec<Filing>,
}

impl AnalysisResponse {
	/// Filings that were processed successfully, in input order.
	pub fn filings(&self) -> Vec<Filing> {
		self.results
			.iter()
			.filter(|f| {
				if let Some(err) = &f.error {
					warn!("filing {} skipped: {}", f.filing_number, err);
					false
				} else {
					true
				}
			})
			.cloned()
			.collect()
	}

	/// One-line account of how many filings were processed, e.g.
	/// `3 of 4 filings analyzed`.
	pub fn summary(&self) -> String {
		let ok = self.results.iter().filter(|f| f.error.is_none()).count();
		let attempted = self
			.filings_analyzed
			.map_or(self.results.len(), |n| n as usize);
		format!("{ok} of {attempted} filings analyzed")
	}
}

/// One disclosure document with the risk categories detected in it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Filing {
	/// Position of the filing in the service's download order. Unique per response.
	pub filing_number: u32,
	/// Form type, e.g. `10-K`; `N/A` when unknown.
	#[serde(default = "not_available")]
	pub form_type: String,
	/// Filing date as reported; `N/A` when unknown.
	#[serde(default = "not_available")]
	pub filing_date: String,
	/// Age of the filing in days; absent when the date could not be parsed.
	#[serde(default)]
	pub days_ago: Option<i64>,
	/// Risk categories detected in the filing, in service order.
	#[serde(default)]
	pub detected_event_categories: Vec<EventCategory>,
	/// High-risk sentences excerpted from the filing.
	#[serde(default)]
	pub sentences: Vec<String>,
	/// Set when the service failed to process this filing.
	#[serde(default)]
	pub error: Option<String>,
}

fn not_available() -> String {
	"N/A".to_string()
}

/// Whether a risk event happens once or unfolds over time.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventNature {
	/// Happens at a point in time.
	Single,
	/// Unfolds over a window.
	Process,
	/// Any value the taxonomy does not define.
	#[serde(other)]
	Unknown,
}

/// A taxonomy-classified risk signal detected in one filing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct EventCategory {
	/// Taxonomy key, e.g. `going_concern_opinion`.
	pub event_type: String,
	/// Single occurrence or ongoing process.
	#[serde(default)]
	pub event_nature: Option<EventNature>,
	/// Taxonomy description of the event type.
	#[serde(default)]
	pub description: Option<String>,
	/// Passed through untouched.
	#[serde(default)]
	pub confidence_interval: Option<Value>,
	/// Start of the event window.
	#[serde(default)]
	pub event_started_on: Option<String>,
	/// End of the event window.
	#[serde(default)]
	pub event_ends_on: Option<String>,
	/// Days until the event window closes; negative once it has passed.
	#[serde(default)]
	pub days_remaining: Option<i64>,
	/// Where the window sits relative to today.
	#[serde(default)]
	pub time_relation: Option<String>,
	/// Typical causes listed by the taxonomy.
	#[serde(default)]
	pub likely_triggers: Vec<String>,
	/// Number of matches in the filing.
	#[serde(default)]
	pub count: Option<u32>,
	/// Most typical matched phrase.
	#[serde(default)]
	pub representative_match: Option<String>,
	/// Typical duration of this event type, in days.
	#[serde(default, rename = "T_star_days")]
	pub t_star_days: Option<i64>,
	#[serde(default)]
	sub_events: Option<Vec<SubEvent>>,
	#[serde(default, rename = "subevents")]
	subevents_alt: Option<Vec<SubEvent>>,
}

impl EventCategory {
	/// Sub-events of this category.
	///
	/// `sub_events` wins; `subevents` is read only when `sub_events` is absent.
	pub fn sub_events(&self) -> &[SubEvent] {
		self.sub_events
			.as_deref()
			.or(self.subevents_alt.as_deref())
			.unwrap_or(&[])
	}

	/// Sub-events that carry a usable trigger sentence.
	pub fn displayable_sub_events(&self) -> impl Iterator<Item = &SubEvent> {
		self.sub_events().iter().filter(|s| s.trigger_sentence().is_some())
	}

	/// Human-readable label derived from the taxonomy key.
	pub fn label(&self) -> String {
		humanize(&self.event_type)
	}
}

/// One textual occurrence supporting an event category.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SubEvent {
	#[serde(default)]
	trigger_sentence: Option<String>,
	#[serde(default)]
	match_text: Option<String>,
	#[serde(default)]
	representative_match: Option<String>,
	/// Start date extracted for this occurrence.
	#[serde(default)]
	pub event_started_on: Option<String>,
	/// Where this occurrence sits relative to today.
	#[serde(default)]
	pub time_relation: Option<String>,
	/// Every other field, kept verbatim for display.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl SubEvent {
	/// The sentence that triggered the match, if it is non-blank.
	pub fn trigger_sentence(&self) -> Option<&str> {
		self.trigger_sentence
			.as_deref()
			.map(str::trim)
			.filter(|s| !s.is_empty())
	}

	/// Matched text; `match_text` wins over `representative_match`.
	pub fn match_text(&self) -> Option<&str> {
		self.match_text
			.as_deref()
			.or(self.representative_match.as_deref())
	}
}

/// `going_concern_opinion` -> `Going Concern Opinion`.
pub fn humanize(key: &str) -> String {
	key.split(['_', '-'])
		.filter(|w| !w.is_empty())
		.map(|w| {
			let mut chars = w.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}
