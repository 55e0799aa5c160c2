//! Three-zone threshold classification of a single metric.
//!
//! A metric's value range is split into a favorable, a neutral and an
//! unfavorable zone. Missing or non-finite values always land in the neutral
//! zone; missing data is common and never treated as a failure.

/// Zone a metric value falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
	/// Better than the favorable bound; scores +1.
	Favorable,
	/// Between the bounds, or unknown; scores 0.
	Neutral,
	/// Worse than the marginal bound; scores -1.
	Unfavorable,
}

impl Classification {
	/// Signed contribution to the health score: +1, 0 or -1.
	pub const fn score(self) -> i32 {
		match self {
			Classification::Favorable => 1,
			Classification::Neutral => 0,
			Classification::Unfavorable => -1,
		}
	}

	/// Build from a score total using symmetric cut-offs.
	pub fn from_total(total: i32, favorable_at: i32, unfavorable_at: i32) -> Self {
		if total >= favorable_at {
			Classification::Favorable
		} else if total <= unfavorable_at {
			Classification::Unfavorable
		} else {
			Classification::Neutral
		}
	}

	/// Lower-case name, used as a CSS class.
	pub fn as_str(self) -> &'static str {
		match self {
			Classification::Favorable => "favorable",
			Classification::Neutral => "neutral",
			Classification::Unfavorable => "unfavorable",
		}
	}
}

/// Which direction of a metric is good.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	/// Smaller values are healthier.
	LowerIsBetter,
	/// Larger values are healthier.
	HigherIsBetter,
	/// Values inside a band are healthier.
	RangeIsBetter,
}

/// Thresholds paired with their comparison mode.
///
/// Bounds are inclusive on the favorable side. For ranges the marginal
/// interval is expected to contain the favorable one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricRule {
	/// Favorable if `value <= favorable`, neutral if `value <= marginal`.
	LowerIsBetter {
		/// Favorable bound, inclusive.
		favorable: f64,
		/// Unfavorable beyond this bound.
		marginal: f64,
	},
	/// Favorable if `value >= favorable`, neutral if `value >= marginal`.
	HigherIsBetter {
		/// Favorable bound, inclusive.
		favorable: f64,
		/// Unfavorable beyond this bound.
		marginal: f64,
	},
	/// Favorable inside `favorable`, neutral inside `marginal`.
	RangeIsBetter {
		/// Inclusive favorable band.
		favorable: (f64, f64),
		/// Inclusive band outside of which the value is unfavorable.
		marginal: (f64, f64),
	},
}

impl MetricRule {
	/// Direction this rule treats as better.
	pub fn mode(&self) -> Mode {
		match self {
			MetricRule::LowerIsBetter { .. } => Mode::LowerIsBetter,
			MetricRule::HigherIsBetter { .. } => Mode::HigherIsBetter,
			MetricRule::RangeIsBetter { .. } => Mode::RangeIsBetter,
		}
	}
}

fn within((lo, hi): (f64, f64), value: f64) -> bool {
	lo <= value && value <= hi
}

/// Classify `value` against `rule`.
///
/// Total and deterministic. Every caller that colors a metric or scores it
/// goes through here.
pub fn classify(value: Option<f64>, rule: &MetricRule) -> Classification {
	let Some(value) = value.filter(|v| v.is_finite()) else {
		return Classification::Neutral;
	};

	match *rule {
		MetricRule::LowerIsBetter {
			favorable,
			marginal,
		} => {
			if value <= favorable {
				Classification::Favorable
			} else if value <= marginal {
				Classification::Neutral
			} else {
				Classification::Unfavorable
			}
		}
		MetricRule::HigherIsBetter {
			favorable,
			marginal,
		} => {
			if value >= favorable {
				Classification::Favorable
			} else if value >= marginal {
				Classification::Neutral
			} else {
				Classification::Unfavorable
			}
		}
		MetricRule::RangeIsBetter {
			favorable,
			marginal,
		} => {
			if within(favorable, value) {
				Classification::Favorable
			} else if within(marginal, value) {
				Classification::Neutral
			} else {
				Classification::Unfavorable
			}
		}
	}
}

/// Classify a raw JSON field. Anything that is not a number counts as missing.
pub fn classify_json(value: Option<&serde_json::Value>, rule: &MetricRule) -> Classification {
	classify(value.and_then(serde_json::Value::as_f64), rule)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	const SHORT_INTEREST: MetricRule = MetricRule::LowerIsBetter {
		favorable: 0.05,
		marginal: 0.15,
	};
	const BETA: MetricRule = MetricRule::RangeIsBetter {
		favorable: (0.8, 1.2),
		marginal: (0.5, 2.0),
	};
	const CURRENT_RATIO: MetricRule = MetricRule::HigherIsBetter {
		favorable: 1.5,
		marginal: 1.0,
	};

	#[test]
	fn lower_is_better_zones() {
		assert_eq!(classify(Some(0.03), &SHORT_INTEREST), Classification::Favorable);
		assert_eq!(classify(Some(0.05), &SHORT_INTEREST), Classification::Favorable);
		assert_eq!(classify(Some(0.10), &SHORT_INTEREST), Classification::Neutral);
		assert_eq!(classify(Some(0.15), &SHORT_INTEREST), Classification::Neutral);
		assert_eq!(classify(Some(0.20), &SHORT_INTEREST), Classification::Unfavorable);
	}

	#[test]
	fn higher_is_better_zones() {
		assert_eq!(classify(Some(2.0), &CURRENT_RATIO), Classification::Favorable);
		assert_eq!(classify(Some(1.5), &CURRENT_RATIO), Classification::Favorable);
		assert_eq!(classify(Some(1.0), &CURRENT_RATIO), Classification::Neutral);
		assert_eq!(classify(Some(0.99), &CURRENT_RATIO), Classification::Unfavorable);
	}

	#[test]
	fn range_is_better_zones() {
		assert_eq!(classify(Some(1.0), &BETA), Classification::Favorable);
		assert_eq!(classify(Some(0.8), &BETA), Classification::Favorable);
		assert_eq!(classify(Some(1.2), &BETA), Classification::Favorable);
		assert_eq!(classify(Some(0.6), &BETA), Classification::Neutral);
		assert_eq!(classify(Some(1.9), &BETA), Classification::Neutral);
		assert_eq!(classify(Some(0.4), &BETA), Classification::Unfavorable);
		assert_eq!(classify(Some(2.5), &BETA), Classification::Unfavorable);
	}

	#[test]
	fn missing_and_non_finite_values_are_neutral() {
		for rule in [SHORT_INTEREST, BETA, CURRENT_RATIO] {
			assert_eq!(classify(None, &rule), Classification::Neutral);
			assert_eq!(classify(Some(f64::NAN), &rule), Classification::Neutral);
			assert_eq!(classify(Some(f64::INFINITY), &rule), Classification::Neutral);
		}
	}

	#[test]
	fn non_numeric_json_is_neutral() {
		assert_eq!(classify_json(Some(&json!("1.0")), &BETA), Classification::Neutral);
		assert_eq!(classify_json(Some(&json!(null)), &BETA), Classification::Neutral);
		assert_eq!(classify_json(None, &BETA), Classification::Neutral);
		assert_eq!(classify_json(Some(&json!(1)), &BETA), Classification::Favorable);
	}

	#[test]
	fn scores_are_bounded_and_deterministic() {
		let values = [-1e9, -3.0, -0.5, 0.0, 0.05, 0.5, 0.9, 1.0, 1.4, 1.6, 3.0, 1e12];
		for rule in [SHORT_INTEREST, BETA, CURRENT_RATIO] {
			for v in values {
				let first = classify(Some(v), &rule);
				assert!((-1..=1).contains(&first.score()));
				assert_eq!(first, classify(Some(v), &rule));
			}
		}
	}

	#[test]
	fn score_mapping_is_fixed() {
		assert_eq!(Classification::Favorable.score(), 1);
		assert_eq!(Classification::Neutral.score(), 0);
		assert_eq!(Classification::Unfavorable.score(), -1);
		assert_eq!(BETA.mode(), Mode::RangeIsBetter);
	}
}
