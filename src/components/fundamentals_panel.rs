//! Side panel listing each symbol's fundamentals with its health score.
//!
//! Metric cells and the badge are colored by the same classifier, so a cell
//! never disagrees with the score it feeds.

use leptos::prelude::*;

use crate::components::force_graph::Theme;
use crate::fundamentals::{
	Classification, HealthMetrics, HealthTiers, Metric, MetricRules, StockEntry, aggregate,
};

fn format_value(metric: Metric, value: Option<f64>) -> String {
	let Some(v) = value else {
		return "N/A".to_string();
	};
	match metric {
		Metric::ShortPercentOfFloat | Metric::ReturnOnEquity | Metric::ProfitMargins => {
			format!("{:.1}%", v * 100.0)
		}
		Metric::FloatShares | Metric::FreeCashflow => compact(v),
		_ => format!("{v:.2}"),
	}
}

/// `1.2B`, `340.0M`, `12.5K`.
fn compact(v: f64) -> String {
	let abs = v.abs();
	if abs >= 1e9 {
		format!("{:.1}B", v / 1e9)
	} else if abs >= 1e6 {
		format!("{:.1}M", v / 1e6)
	} else if abs >= 1e3 {
		format!("{:.1}K", v / 1e3)
	} else {
		format!("{v:.0}")
	}
}

fn money(v: Option<f64>) -> String {
	v.map_or_else(|| "N/A".to_string(), |v| format!("${v:.2}"))
}

fn badge_text(tier: Classification, total: i32) -> String {
	let name = match tier {
		Classification::Favorable => "Healthy",
		Classification::Neutral => "Mixed",
		Classification::Unfavorable => "Weak",
	};
	format!("{name} ({total:+})")
}

fn entry_view(entry: StockEntry, rules: &MetricRules, tiers: &HealthTiers, theme: &Theme) -> AnyView {
	let StockEntry { symbol, record } = entry;
	if let Some(err) = record.error() {
		return view! {
			<div class="stock-card error">
				<h3>{symbol}</h3>
				<p class="error">{err.to_string()}</p>
			</div>
		}
		.into_any();
	}

	let metrics = HealthMetrics::from_record(&record);
	let score = aggregate(&metrics, rules, tiers);
	let badge_color = theme.classification(score.tier).to_css();
	let (low, high) = record.fifty_two_week_range();
	let change = record.change_percent().map(|c| format!("{c:+.2}%"));

	let rows = score
		.breakdown
		.iter()
		.map(|&(metric, class)| {
			let color = theme.classification(class).to_css();
			view! {
				<tr class=class.as_str()>
					<td>{metric.label()}</td>
					<td style=format!("color: {color}")>{format_value(metric, metrics.get(metric))}</td>
				</tr>
			}
		})
		.collect_view();

	view! {
		<div class="stock-card">
			<header>
				<h3>{symbol}</h3>
				<span class="health-badge" style=format!("background: {badge_color}")>
					{badge_text(score.tier, score.total)}
				</span>
			</header>
			{record.name().map(|n| view! { <p class="company">{n.to_string()}</p> })}
			<p class="price">
				{money(record.price())}
				{change.map(|c| view! { <span class="change">" "{c}</span> })}
			</p>
			<p class="range">
				{format!("52w: {} to {} (prev close {})", money(low), money(high), money(record.previous_close()))}
			</p>
			<table class="metrics">{rows}</table>
		</div>
	}
	.into_any()
}

/// Renders one card per entry, in the order given.
#[component]
pub fn FundamentalsPanel(
	/// Symbols to show, each with its record.
	#[prop(into)]
	entries: Signal<Vec<StockEntry>>,
) -> impl IntoView {
	let rules = MetricRules::default();
	let tiers = HealthTiers::default();
	let theme = Theme::default();

	view! {
		<aside class="fundamentals-panel">
			{move || {
				let entries = entries.get();
				if entries.is_empty() {
					view! { <p class="empty">"No fundamentals loaded."</p> }.into_any()
				} else {
					entries
						.into_iter()
						.map(|e| entry_view(e, &rules, &tiers, &theme))
						.collect_view()
						.into_any()
				}
			}}
		</aside>
	}
}
