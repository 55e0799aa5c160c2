//! Modal overlay showing the detail payload of a tapped node.

use leptos::prelude::*;

use crate::analysis::humanize;
use crate::interaction::{Detail, EventDetail, SubEventDetail};

fn sub_event_view(sub: SubEventDetail) -> impl IntoView {
	let when = match (sub.event_started_on, sub.time_relation) {
		(Some(date), Some(rel)) => Some(format!("{date} ({rel})")),
		(Some(date), None) => Some(date),
		(None, Some(rel)) => Some(rel),
		(None, None) => None,
	};

	view! {
		<li class="sub-event">
			<blockquote class="trigger">{sub.trigger_sentence}</blockquote>
			{sub.match_text.map(|m| view! { <p class="match">"Matched: " <mark>{m}</mark></p> })}
			{when.map(|w| view! { <p class="when">{w}</p> })}
			{(!sub.extra.is_empty()).then(|| {
				view! {
					<dl class="extra">
						{sub
							.extra
							.into_iter()
							.map(|(k, v)| view! {
								<dt>{humanize(&k)}</dt>
								<dd>{v}</dd>
							})
							.collect_view()}
					</dl>
				}
			})}
		</li>
	}
}

/// Label/value rows for the fields of an event category that are present.
fn event_facts(event: &EventDetail) -> Vec<(&'static str, String)> {
	let window = match (&event.started_on, &event.ends_on) {
		(Some(start), Some(end)) => Some(format!("{start} to {end}")),
		(Some(start), None) => Some(format!("from {start}")),
		(None, Some(end)) => Some(format!("until {end}")),
		(None, None) => None,
	};
	[
		("Occurrences", event.count.map(|c| c.to_string())),
		("Typical match", event.representative_match.clone()),
		("Typical duration", event.t_star_days.map(|d| format!("{d} days"))),
		("Window", window),
		("Days remaining", event.days_remaining.map(|d| d.to_string())),
		("Timing", event.time_relation.clone()),
		("Confidence interval", event.confidence_interval.clone()),
	]
	.into_iter()
	.filter_map(|(k, v)| v.map(|v| (k, v)))
	.collect()
}

fn detail_body(detail: Detail) -> AnyView {
	match detail {
		Detail::Filing {
			filing_number,
			filing_date,
			form_type,
			sentences,
		} => view! {
			<h2>{format!("{form_type} filed {filing_date}")}</h2>
			<p class="subtitle">{format!("Filing #{filing_number}")}</p>
			<ul class="sentences">
				{sentences.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
			</ul>
		}
		.into_any(),
		Detail::Event(event) => {
			let facts = event_facts(&event);
			let EventDetail {
				label,
				description,
				likely_triggers,
				sub_events,
				..
			} = event;
			view! {
				<h2>{label}</h2>
				{description.map(|d| view! { <p class="description">{d}</p> })}
				{(!facts.is_empty()).then(|| view! {
					<dl class="facts">
						{facts
							.into_iter()
							.map(|(k, v)| view! {
								<dt>{k}</dt>
								<dd>{v}</dd>
							})
							.collect_view()}
					</dl>
				})}
				{(!likely_triggers.is_empty()).then(|| view! {
					<h3>"Likely triggers"</h3>
					<ul class="triggers">
						{likely_triggers.into_iter().map(|t| view! { <li>{t}</li> }).collect_view()}
					</ul>
				})}
				{if sub_events.is_empty() {
					view! { <p class="empty">"No supporting sentences."</p> }.into_any()
				} else {
					view! {
						<h3>{format!("Occurrences ({})", sub_events.len())}</h3>
						<ul class="sub-events">
							{sub_events.into_iter().map(sub_event_view).collect_view()}
						</ul>
					}
					.into_any()
				}}
			}
			.into_any()
		}
	}
}

/// Shows `detail` while it is `Some`; the close button and the backdrop both
/// call `on_close`.
#[component]
pub fn DetailModal(
	/// Payload to show; `None` hides the modal.
	#[prop(into)]
	detail: Signal<Option<Detail>>,
	/// Called when the user dismisses the modal.
	#[prop(into)]
	on_close: Callback<()>,
) -> impl IntoView {
	move || {
		detail.get().map(|detail| {
			view! {
				<div class="modal-backdrop" on:click=move |_| on_close.run(())>
					<div class="modal" on:click=|ev| ev.stop_propagation()>
						<button class="modal-close" on:click=move |_| on_close.run(())>
							"×"
						</button>
						{detail_body(detail)}
					</div>
				</div>
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn facts_list_only_present_fields() {
		let event = EventDetail {
			label: "Debt Default".into(),
			representative_match: Some("event of default".into()),
			t_star_days: Some(180),
			started_on: Some("2024-01-10".into()),
			ends_on: Some("2024-07-08".into()),
			..Default::default()
		};
		assert_eq!(
			event_facts(&event),
			vec![
				("Typical match", "event of default".to_string()),
				("Typical duration", "180 days".to_string()),
				("Window", "2024-01-10 to 2024-07-08".to_string()),
			]
		);
		assert!(event_facts(&EventDetail::default()).is_empty());
	}
}
