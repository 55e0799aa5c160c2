//! risk-graph: Interactive risk-disclosure graph and fundamentals health view.
//!
//! This crate provides a WASM front end that renders the risk events detected
//! in a company's filings as a force-directed forest rooted at the ticker,
//! alongside a three-zone health score for the company's fundamentals.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlScriptElement};

pub mod analysis;
pub mod components;
pub mod error;
pub mod fundamentals;
pub mod interaction;

use analysis::{AnalysisResponse, Filing};
use components::detail_modal::DetailModal;
use components::force_graph::{BuildConfig, GraphModel, build};
use components::fundamentals_panel::FundamentalsPanel;
use error::LoadError;
use fundamentals::{StockEntry, StockInfoResponse, cache};
use interaction::{Interaction, UiEvent};

pub use components::force_graph::ForceGraphCanvas;

const ANALYSIS_ELEMENT: &str = "analysis-data";
const FUNDAMENTALS_ELEMENT: &str = "fundamentals-data";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("risk-graph: logging initialized");
}

fn document() -> Result<Document, LoadError> {
	web_sys::window()
		.and_then(|w| w.document())
		.ok_or(LoadError::NoDocument)
}

fn script_element(document: &Document, id: &str) -> Result<HtmlScriptElement, LoadError> {
	document
		.get_element_by_id(id)
		.ok_or_else(|| LoadError::MissingElement(id.to_string()))?
		.dyn_into()
		.map_err(|_| LoadError::NotAScript(id.to_string()))
}

/// Load the analysis from `<script id="analysis-data" data-ticker="...">`.
///
/// The ticker comes from the `data-ticker` attribute, falling back to the one
/// echoed in the response.
fn load_analysis() -> Result<(AnalysisResponse, String), LoadError> {
	let script = script_element(&document()?, ANALYSIS_ELEMENT)?;
	let text = script.text().unwrap_or_default();
	let response: AnalysisResponse = serde_json::from_str(&text)?;

	let ticker = script
		.get_attribute("data-ticker")
		.filter(|t| !t.trim().is_empty())
		.or_else(|| response.ticker.clone())
		.unwrap_or_else(|| "UNKNOWN".to_string())
		.to_uppercase();
	info!(
		"risk-graph: loaded {} results for {}",
		response.results.len(),
		ticker
	);
	Ok((response, ticker))
}

/// Fundamentals embedded in the page, or the cached list when none are.
///
/// Fresh data replaces the cache.
fn load_fundamentals() -> Vec<StockEntry> {
	let fresh = document()
		.and_then(|doc| script_element(&doc, FUNDAMENTALS_ELEMENT))
		.and_then(|script| {
			let text = script.text().unwrap_or_default();
			Ok(serde_json::from_str::<StockInfoResponse>(&text)?)
		});

	match fresh {
		Ok(response) => {
			let entries = response.entries();
			info!("risk-graph: loaded fundamentals for {} symbols", entries.len());
			cache::store(&entries);
			entries
		}
		Err(LoadError::MissingElement(_)) => cache::load(),
		Err(e) => {
			warn!("risk-graph: fundamentals unavailable: {}", e);
			cache::load()
		}
	}
}

/// Main application component.
/// Loads the analysis and fundamentals from the DOM and renders the graph,
/// the detail modal and the fundamentals panel.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let entries = load_fundamentals();
	let entries_signal = Signal::derive(move || entries.clone());

	let graph = match load_analysis() {
		Ok((response, ticker)) => {
			let filings: Vec<Filing> = response.filings();
			let model = build(&filings, &ticker, &BuildConfig::default());
			info!(
				"risk-graph: graph has {} nodes, {} edges",
				model.nodes().len(),
				model.edges().len()
			);
			Ok((model, filings, ticker, response.summary()))
		}
		Err(e) => {
			warn!("risk-graph: failed to load analysis: {}", e);
			Err(e.to_string())
		}
	};

	let title = match &graph {
		Ok((_, _, ticker, _)) => format!("{ticker} Risk Events"),
		Err(_) => "Risk Events".to_string(),
	};

	let summary = graph.as_ref().ok().map(|(_, _, _, summary)| summary.clone());

	let body = match graph {
		Ok((model, filings, _, _)) => graph_view(model, filings).into_any(),
		Err(message) => view! {
			<div class="error-banner" role="alert">
				<strong>"Could not load the analysis. "</strong>
				{message}
			</div>
		}
		.into_any(),
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text=title.clone() />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			{body}
			<div class="graph-overlay">
				<h1>{title}</h1>
				{summary.map(|s| view! { <p class="summary">{s}</p> })}
				<p class="subtitle">"Tap a node for details. Scroll to zoom. Drag background to pan."</p>
			</div>
			<FundamentalsPanel entries=entries_signal />
		</div>
	}
}

fn graph_view(model: GraphModel, filings: Vec<Filing>) -> impl IntoView {
	let interaction = RwSignal::new(Interaction::default());
	let model = StoredValue::new(model);
	let filings = StoredValue::new(filings);

	let on_event = Callback::new(move |event: UiEvent| {
		model.with_value(|model| {
			filings.with_value(|filings| {
				interaction
					.try_update(|state| state.handle(event, model, filings))
					.flatten()
			})
		})
	});
	let on_close = Callback::new(move |_: ()| {
		on_event.run(UiEvent::Close);
	});
	let detail = Signal::derive(move || interaction.with(|state| state.detail().cloned()));
	let hovered =
		Signal::derive(move || interaction.with(|state| state.hovered().map(str::to_string)));

	view! {
		<ForceGraphCanvas
			model=Signal::derive(move || model.get_value())
			on_event=on_event
			hovered=hovered
		/>
		<DetailModal detail=detail on_close=on_close />
	}
}
