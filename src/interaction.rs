//! Hover, tap and modal state for the risk graph.
//!
//! The machine has three states. Hovering is tracked only for event nodes;
//! the modal shows one detail payload at a time and a new one replaces it.
//! Camera moves are returned to the caller rather than stored, since they
//! are transient animations.

use log::debug;
use serde_json::Value;

use crate::analysis::{EventCategory, Filing, SubEvent};
use crate::components::force_graph::{GraphModel, NodeKind, NodeSource};

/// One sub-event as shown in the modal.
#[derive(Clone, Debug, PartialEq)]
pub struct SubEventDetail {
	/// Sentence that triggered the detection, trimmed.
	pub trigger_sentence: String,
	/// Matched phrase, falling back to the representative match.
	pub match_text: Option<String>,
	/// Start date extracted for this occurrence.
	pub event_started_on: Option<String>,
	/// `past`, `ongoing` or `future`, as reported.
	pub time_relation: Option<String>,
	/// Remaining fields as `(key, rendered value)`, shown as-is.
	pub extra: Vec<(String, String)>,
}

impl SubEventDetail {
	/// `None` for sub-events without a usable trigger sentence.
	fn from_sub_event(sub: &SubEvent) -> Option<Self> {
		let trigger_sentence = sub.trigger_sentence()?.to_string();
		Some(Self {
			trigger_sentence,
			match_text: sub.match_text().map(str::to_string),
			event_started_on: sub.event_started_on.clone(),
			time_relation: sub.time_relation.clone(),
			extra: sub
				.extra
				.iter()
				.map(|(k, v)| (k.clone(), render_value(v)))
				.collect(),
		})
	}
}

fn render_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Everything the modal shows for one event category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventDetail {
	/// Humanised taxonomy key.
	pub label: String,
	/// Taxonomy description.
	pub description: Option<String>,
	/// Typical causes listed by the taxonomy.
	pub likely_triggers: Vec<String>,
	/// Number of matches in the filing.
	pub count: Option<u32>,
	/// Most typical matched phrase.
	pub representative_match: Option<String>,
	/// Typical duration of the event, in days.
	pub t_star_days: Option<i64>,
	/// Start of the event window.
	pub started_on: Option<String>,
	/// End of the event window.
	pub ends_on: Option<String>,
	/// Days until the window closes; negative once passed.
	pub days_remaining: Option<i64>,
	/// Where the window sits relative to today.
	pub time_relation: Option<String>,
	/// Confidence interval, rendered verbatim.
	pub confidence_interval: Option<String>,
	/// Sub-events with a usable trigger sentence.
	pub sub_events: Vec<SubEventDetail>,
}

impl EventDetail {
	fn from_category(category: &EventCategory) -> Self {
		Self {
			label: category.label(),
			description: category.description.clone(),
			likely_triggers: category.likely_triggers.clone(),
			count: category.count,
			representative_match: category.representative_match.clone(),
			t_star_days: category.t_star_days,
			started_on: category.event_started_on.clone(),
			ends_on: category.event_ends_on.clone(),
			days_remaining: category.days_remaining,
			time_relation: category.time_relation.clone(),
			confidence_interval: category
				.confidence_interval
				.as_ref()
				.filter(|v| !v.is_null())
				.map(render_value),
			sub_events: category
				.displayable_sub_events()
				.filter_map(SubEventDetail::from_sub_event)
				.collect(),
		}
	}
}

/// Payload of an open modal.
#[derive(Clone, Debug, PartialEq)]
pub enum Detail {
	/// A filing's excerpted sentences.
	Filing {
		/// The filing's number.
		filing_number: u32,
		/// Filing date as reported.
		filing_date: String,
		/// Form type, e.g. `10-K`.
		form_type: String,
		/// High-risk sentences, never empty.
		sentences: Vec<String>,
	},
	/// One event category.
	Event(EventDetail),
}

/// Resolve the detail payload for a node, going through its source key.
///
/// `filings` must be the slice the model was built from. Filings without
/// sentences have nothing to show and yield `None`.
pub fn resolve_detail(model: &GraphModel, filings: &[Filing], node_id: &str) -> Option<Detail> {
	let node = model.node(node_id)?;
	let filing_at = |index: usize, number: u32| {
		filings
			.get(index)
			.filter(|f| f.filing_number == number)
	};

	match node.source {
		NodeSource::Filing {
			filing_index,
			filing_number,
		} => {
			let filing = filing_at(filing_index, filing_number)?;
			if filing.sentences.is_empty() {
				return None;
			}
			Some(Detail::Filing {
				filing_number,
				filing_date: filing.filing_date.clone(),
				form_type: filing.form_type.clone(),
				sentences: filing.sentences.clone(),
			})
		}
		NodeSource::Event {
			filing_index,
			filing_number,
			category_index,
		} => {
			let category = filing_at(filing_index, filing_number)?
				.detected_event_categories
				.get(category_index)?;
			Some(Detail::Event(EventDetail::from_category(category)))
		}
		NodeSource::Ticker | NodeSource::Placeholder => None,
	}
}

/// Pointer and control events fed to the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
	/// Pointer moved onto the node with this id.
	PointerEnter(String),
	/// Pointer left the node it was over.
	PointerLeave,
	/// Press and release on the node with this id.
	Tap(String),
	/// Press and release on empty canvas.
	TapBackground,
	/// Modal close button or backdrop.
	Close,
}

/// View transitions requested by an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CameraMove {
	/// Frame the node and its direct neighbours.
	Frame(String),
	/// Fit the whole graph.
	Reset,
}

/// Interaction state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
	/// Nothing emphasised, no modal.
	#[default]
	Idle,
	/// An event node is emphasised.
	Hovering(String),
	/// The modal shows this payload.
	ModalOpen(Detail),
}

impl Interaction {
	/// Id of the emphasised event node.
	pub fn hovered(&self) -> Option<&str> {
		match self {
			Interaction::Hovering(id) => Some(id.as_str()),
			_ => None,
		}
	}

	/// Payload of the open modal.
	pub fn detail(&self) -> Option<&Detail> {
		match self {
			Interaction::ModalOpen(detail) => Some(detail),
			_ => None,
		}
	}

	/// Whether the modal is open.
	pub fn is_modal_open(&self) -> bool {
		matches!(self, Interaction::ModalOpen(_))
	}

	/// Apply one event and return the camera move it triggers, if any.
	pub fn handle(
		&mut self,
		event: UiEvent,
		model: &GraphModel,
		filings: &[Filing],
	) -> Option<CameraMove> {
		match event {
			UiEvent::PointerEnter(id) => {
				if self.is_modal_open() {
					return None;
				}
				match model.node(&id).map(|n| n.kind) {
					Some(NodeKind::Event) => *self = Interaction::Hovering(id),
					Some(_) if self.hovered().is_some() => *self = Interaction::Idle,
					_ => {}
				}
				None
			}
			UiEvent::PointerLeave => {
				if self.hovered().is_some() {
					*self = Interaction::Idle;
				}
				None
			}
			UiEvent::Tap(id) => self.tap(id, model, filings),
			UiEvent::TapBackground => {
				*self = Interaction::Idle;
				Some(CameraMove::Reset)
			}
			UiEvent::Close => {
				if self.is_modal_open() {
					*self = Interaction::Idle;
				}
				None
			}
		}
	}

	fn tap(&mut self, id: String, model: &GraphModel, filings: &[Filing]) -> Option<CameraMove> {
		let Some(node) = model.node(&id) else {
			debug!("tap on unknown node {}", id);
			return None;
		};
		let detail = resolve_detail(model, filings, &id);
		if node.kind == NodeKind::Event && detail.is_none() {
			debug!("no source entity for {}", id);
			return None;
		}

		let camera = match self {
			Interaction::ModalOpen(_) => None,
			_ => Some(CameraMove::Frame(id)),
		};
		if let Some(detail) = detail {
			*self = Interaction::ModalOpen(detail);
		}
		camera
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{BuildConfig, build};
	use serde_json::json;

	fn fixture() -> (GraphModel, Vec<Filing>) {
		let filings: Vec<Filing> = serde_json::from_value(json!([
			{
				"filing_number": 1,
				"form_type": "10-K",
				"filing_date": "2024-02-01",
				"days_ago": 30,
				"sentences": ["There is substantial doubt about our ability to continue."],
				"detected_event_categories": [{
					"event_type": "going_concern_opinion",
					"description": "Auditor doubts the company can continue.",
					"likely_triggers": ["recurring losses"],
					"subevents": [
						{ "trigger_sentence": "Substantial doubt exists.", "match_text": "substantial doubt", "match_span": [4, 21] },
						{ "match_text": "going concern" },
						{ "trigger_sentence": "" },
					],
				}],
			},
			{
				"filing_number": 2,
				"form_type": "8-K",
				"filing_date": "2024-01-01",
				"days_ago": 60,
				"sentences": [],
				"detected_event_categories": [],
			},
		]))
		.unwrap();
		let model = build(&filings, "ABC", &BuildConfig::default());
		(model, filings)
	}

	#[test]
	fn starts_idle() {
		assert_eq!(Interaction::default(), Interaction::Idle);
	}

	#[test]
	fn hovering_event_nodes_only() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;

		state.handle(UiEvent::PointerEnter("filing-1".into()), &model, &filings);
		assert_eq!(state, Interaction::Idle);

		state.handle(UiEvent::PointerEnter("event-1-0".into()), &model, &filings);
		assert_eq!(state.hovered(), Some("event-1-0"));

		state.handle(UiEvent::PointerLeave, &model, &filings);
		assert_eq!(state, Interaction::Idle);
	}

	#[test]
	fn tapping_an_event_opens_filtered_detail() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;

		let camera = state.handle(UiEvent::Tap("event-1-0".into()), &model, &filings);
		assert_eq!(camera, Some(CameraMove::Frame("event-1-0".into())));

		let Some(Detail::Event(event)) = state.detail() else {
			panic!("expected event detail, got {state:?}");
		};
		assert_eq!(event.label, "Going Concern Opinion");
		assert_eq!(
			event.description.as_deref(),
			Some("Auditor doubts the company can continue.")
		);
		assert_eq!(event.likely_triggers, vec!["recurring losses".to_string()]);
		assert_eq!(event.sub_events.len(), 1);
		assert_eq!(event.sub_events[0].trigger_sentence, "Substantial doubt exists.");
		assert_eq!(
			event.sub_events[0].match_text.as_deref(),
			Some("substantial doubt")
		);
		assert_eq!(
			event.sub_events[0].extra,
			vec![("match_span".to_string(), "[4,21]".to_string())]
		);
	}

	#[test]
	fn tapping_a_filing_with_sentences_opens_it() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;
		state.handle(UiEvent::Tap("filing-1".into()), &model, &filings);
		assert_eq!(
			state.detail(),
			Some(&Detail::Filing {
				filing_number: 1,
				filing_date: "2024-02-01".into(),
				form_type: "10-K".into(),
				sentences: vec!["There is substantial doubt about our ability to continue.".into()],
			})
		);
	}

	#[test]
	fn filing_without_sentences_only_moves_the_camera() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;
		let camera = state.handle(UiEvent::Tap("filing-2".into()), &model, &filings);
		assert_eq!(camera, Some(CameraMove::Frame("filing-2".into())));
		assert_eq!(state, Interaction::Idle);

		let mut state = Interaction::Hovering("event-1-0".into());
		state.handle(UiEvent::Tap("filing-2".into()), &model, &filings);
		assert_eq!(state, Interaction::Hovering("event-1-0".into()));
	}

	#[test]
	fn ticker_tap_frames_without_modal() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;
		let camera = state.handle(UiEvent::Tap("ticker".into()), &model, &filings);
		assert_eq!(camera, Some(CameraMove::Frame("ticker".into())));
		assert_eq!(state, Interaction::Idle);
	}

	#[test]
	fn unknown_ids_are_ignored() {
		let (model, filings) = fixture();
		let mut state = Interaction::Hovering("event-1-0".into());
		assert_eq!(state.handle(UiEvent::Tap("event-9-9".into()), &model, &filings), None);
		assert_eq!(state, Interaction::Hovering("event-1-0".into()));
		state.handle(UiEvent::PointerEnter("nope".into()), &model, &filings);
		assert_eq!(state, Interaction::Hovering("event-1-0".into()));
	}

	#[test]
	fn stale_source_data_is_a_no_op() {
		let (model, _) = fixture();
		let mut state = Interaction::Idle;
		assert_eq!(state.handle(UiEvent::Tap("event-1-0".into()), &model, &[]), None);
		assert_eq!(state, Interaction::Idle);
	}

	#[test]
	fn new_modal_replaces_the_open_one() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;
		state.handle(UiEvent::Tap("filing-1".into()), &model, &filings);
		let camera = state.handle(UiEvent::Tap("event-1-0".into()), &model, &filings);
		assert_eq!(camera, None);
		assert!(matches!(state.detail(), Some(Detail::Event(_))));
	}

	#[test]
	fn hover_is_ignored_while_modal_is_open() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;
		state.handle(UiEvent::Tap("filing-1".into()), &model, &filings);
		state.handle(UiEvent::PointerEnter("event-1-0".into()), &model, &filings);
		assert!(matches!(state, Interaction::ModalOpen(_)));
		state.handle(UiEvent::PointerLeave, &model, &filings);
		assert!(matches!(state, Interaction::ModalOpen(_)));
	}

	#[test]
	fn background_tap_resets_everything() {
		let (model, filings) = fixture();
		let mut state = Interaction::Idle;
		state.handle(UiEvent::Tap("filing-1".into()), &model, &filings);
		let camera = state.handle(UiEvent::TapBackground, &model, &filings);
		assert_eq!(camera, Some(CameraMove::Reset));
		assert_eq!(state, Interaction::Idle);

		let mut state = Interaction::Hovering("event-1-0".into());
		state.handle(UiEvent::TapBackground, &model, &filings);
		assert_eq!(state, Interaction::Idle);
	}

	#[test]
	fn close_only_affects_open_modal() {
		let (model, filings) = fixture();
		let mut state = Interaction::Hovering("event-1-0".into());
		state.handle(UiEvent::Close, &model, &filings);
		assert_eq!(state, Interaction::Hovering("event-1-0".into()));

		state.handle(UiEvent::Tap("event-1-0".into()), &model, &filings);
		state.handle(UiEvent::Close, &model, &filings);
		assert_eq!(state, Interaction::Idle);
	}

	#[test]
	fn duplicate_filing_numbers_resolve_to_the_drawn_filing() {
		let filings: Vec<Filing> = serde_json::from_value(json!([
			{
				"filing_number": 1,
				"form_type": "8-K",
				"filing_date": "2024-01-01",
				"days_ago": 90,
				"sentences": ["Older sentence."],
				"detected_event_categories": [{
					"event_type": "layoffs",
					"sub_events": [{ "trigger_sentence": "older trigger" }],
				}],
			},
			{
				"filing_number": 1,
				"form_type": "10-K",
				"filing_date": "2024-03-01",
				"days_ago": 5,
				"sentences": ["Newer sentence."],
				"detected_event_categories": [{
					"event_type": "going_concern_opinion",
					"sub_events": [{ "trigger_sentence": "newer trigger" }],
				}],
			},
		]))
		.unwrap();
		let model = build(&filings, "ABC", &BuildConfig::default());
		assert_eq!(model.node("filing-1").unwrap().label, "10-K (2024-03-01)");
		assert_eq!(model.node("event-1-0").unwrap().label, "Going Concern Opinion");

		let Some(Detail::Filing {
			form_type,
			sentences,
			..
		}) = resolve_detail(&model, &filings, "filing-1")
		else {
			panic!("expected filing detail");
		};
		assert_eq!(form_type, "10-K");
		assert_eq!(sentences, vec!["Newer sentence.".to_string()]);

		let Some(Detail::Event(event)) = resolve_detail(&model, &filings, "event-1-0") else {
			panic!("expected event detail");
		};
		assert_eq!(event.label, "Going Concern Opinion");
		assert_eq!(event.sub_events[0].trigger_sentence, "newer trigger");
	}

	#[test]
	fn event_detail_carries_window_and_typical_match() {
		let filings: Vec<Filing> = serde_json::from_value(json!([{
			"filing_number": 4,
			"detected_event_categories": [{
				"event_type": "debt_default",
				"count": 3,
				"representative_match": "event of default",
				"T_star_days": 180,
				"event_started_on": "2024-01-10",
				"event_ends_on": "2024-07-08",
				"days_remaining": -12,
				"time_relation": "past",
				"confidence_interval": [150, 210],
			}],
		}]))
		.unwrap();
		let model = build(&filings, "ABC", &BuildConfig::default());

		let Some(Detail::Event(event)) = resolve_detail(&model, &filings, "event-4-0") else {
			panic!("expected event detail");
		};
		assert_eq!(event.count, Some(3));
		assert_eq!(event.representative_match.as_deref(), Some("event of default"));
		assert_eq!(event.t_star_days, Some(180));
		assert_eq!(event.started_on.as_deref(), Some("2024-01-10"));
		assert_eq!(event.ends_on.as_deref(), Some("2024-07-08"));
		assert_eq!(event.days_remaining, Some(-12));
		assert_eq!(event.time_relation.as_deref(), Some("past"));
		assert_eq!(event.confidence_interval.as_deref(), Some("[150,210]"));
		assert!(event.sub_events.is_empty());
	}
}
