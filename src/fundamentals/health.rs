//! Composite health score over nine fundamental metrics.
//!
//! The score is only a composition of [`classify`]: each metric contributes
//! its classification score, and the total is bucketed into a tier.

use super::classify::{Classification, MetricRule, classify};
use super::record::FundamentalsRecord;

/// The nine metrics that make up the health score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
	/// Shorted shares as a fraction of float.
	ShortPercentOfFloat,
	/// Shares available for trading.
	FloatShares,
	/// Volatility relative to the market.
	Beta,
	/// Debt to equity, in percent.
	DebtToEquity,
	/// Current assets over current liabilities.
	CurrentRatio,
	/// Liquid assets over current liabilities.
	QuickRatio,
	/// Free cash flow.
	FreeCashflow,
	/// Net income over equity, as a fraction.
	ReturnOnEquity,
	/// Net margin, as a fraction.
	ProfitMargins,
}

impl Metric {
	/// Every metric, in display order.
	pub const ALL: [Metric; 9] = [
		Metric::ShortPercentOfFloat,
		Metric::FloatShares,
		Metric::Beta,
		Metric::DebtToEquity,
		Metric::CurrentRatio,
		Metric::QuickRatio,
		Metric::FreeCashflow,
		Metric::ReturnOnEquity,
		Metric::ProfitMargins,
	];

	/// Field name in the stock-info record.
	pub fn key(self) -> &'static str {
		match self {
			Metric::ShortPercentOfFloat => "shortPercentOfFloat",
			Metric::FloatShares => "floatShares",
			Metric::Beta => "beta",
			Metric::DebtToEquity => "debtToEquity",
			Metric::CurrentRatio => "currentRatio",
			Metric::QuickRatio => "quickRatio",
			Metric::FreeCashflow => "freeCashflow",
			Metric::ReturnOnEquity => "returnOnEquity",
			Metric::ProfitMargins => "profitMargins",
		}
	}

	/// Display name.
	pub fn label(self) -> &'static str {
		match self {
			Metric::ShortPercentOfFloat => "Short % of Float",
			Metric::FloatShares => "Float Shares",
			Metric::Beta => "Beta",
			Metric::DebtToEquity => "Debt / Equity",
			Metric::CurrentRatio => "Current Ratio",
			Metric::QuickRatio => "Quick Ratio",
			Metric::FreeCashflow => "Free Cash Flow",
			Metric::ReturnOnEquity => "Return on Equity",
			Metric::ProfitMargins => "Profit Margin",
		}
	}

	fn index(self) -> usize {
		self as usize
	}
}

/// One rule per metric.
///
/// Ratios follow the stock-info feed's units: short interest, return on
/// equity and profit margin are fractions (0.05 = 5%), debt/equity is a
/// percentage (100 = 1.0x).
#[derive(Clone, Debug, PartialEq)]
pub struct MetricRules {
	rules: [MetricRule; 9],
}

impl MetricRules {
	/// Rule for one metric.
	pub fn rule(&self, metric: Metric) -> &MetricRule {
		&self.rules[metric.index()]
	}

	/// Replace the rule for one metric.
	pub fn with_rule(mut self, metric: Metric, rule: MetricRule) -> Self {
		self.rules[metric.index()] = rule;
		self
	}
}

impl Default for MetricRules {
	fn default() -> Self {
		Self {
			rules: [
				MetricRule::LowerIsBetter {
					favorable: 0.05,
					marginal: 0.15,
				},
				MetricRule::HigherIsBetter {
					favorable: 50_000_000.0,
					marginal: 10_000_000.0,
				},
				MetricRule::RangeIsBetter {
					favorable: (0.8, 1.2),
					marginal: (0.5, 2.0),
				},
				MetricRule::LowerIsBetter {
					favorable: 100.0,
					marginal: 200.0,
				},
				MetricRule::HigherIsBetter {
					favorable: 1.5,
					marginal: 1.0,
				},
				MetricRule::HigherIsBetter {
					favorable: 1.0,
					marginal: 0.5,
				},
				// Sign only: non-negative is favorable, there is no neutral band.
				MetricRule::HigherIsBetter {
					favorable: 0.0,
					marginal: 0.0,
				},
				MetricRule::HigherIsBetter {
					favorable: 0.15,
					marginal: 0.05,
				},
				MetricRule::HigherIsBetter {
					favorable: 0.10,
					marginal: 0.0,
				},
			],
		}
	}
}

/// Cut-offs that turn a total into a tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthTiers {
	/// Totals at or above this are favorable.
	pub favorable_at: i32,
	/// Totals at or below this are unfavorable.
	pub unfavorable_at: i32,
}

impl Default for HealthTiers {
	fn default() -> Self {
		Self {
			favorable_at: 5,
			unfavorable_at: -5,
		}
	}
}

/// Raw values for the nine metrics; `None` when the feed has no number.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HealthMetrics {
	values: [Option<f64>; 9],
}

impl HealthMetrics {
	/// Metrics from `(metric, value)` pairs; unlisted metrics are missing.
	pub fn new(values: impl IntoIterator<Item = (Metric, Option<f64>)>) -> Self {
		let mut metrics = Self::default();
		for (metric, value) in values {
			metrics.values[metric.index()] = value;
		}
		metrics
	}

	/// Read the nine metrics from a stock-info record.
	pub fn from_record(record: &FundamentalsRecord) -> Self {
		Self::new(Metric::ALL.map(|m| (m, record.number(m.key()))))
	}

	/// Value of one metric.
	pub fn get(&self, metric: Metric) -> Option<f64> {
		self.values[metric.index()]
	}
}

/// Aggregated score with the per-metric classifications it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct HealthScore {
	/// Sum of the nine scores, in `-9..=9`.
	pub total: i32,
	/// Bucketed total.
	pub tier: Classification,
	/// Per-metric classifications, in [`Metric::ALL`] order.
	pub breakdown: Vec<(Metric, Classification)>,
}

/// Score a full set of metrics.
pub fn aggregate(metrics: &HealthMetrics, rules: &MetricRules, tiers: &HealthTiers) -> HealthScore {
	let breakdown: Vec<_> = Metric::ALL
		.iter()
		.map(|&m| (m, classify(metrics.get(m), rules.rule(m))))
		.collect();
	let total = breakdown.iter().map(|(_, c)| c.score()).sum();

	HealthScore {
		total,
		tier: Classification::from_total(total, tiers.favorable_at, tiers.unfavorable_at),
		breakdown,
	}
}
