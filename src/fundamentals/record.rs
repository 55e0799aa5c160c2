//! Stock-info records as returned by the fundamentals upload endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of the stock-info endpoint: `{ symbols, data: { SYMBOL: record } }`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StockInfoResponse {
	/// Requested symbols, in upload order.
	#[serde(default)]
	pub symbols: Vec<String>,
	/// Record per symbol.
	#[serde(default)]
	pub data: HashMap<String, FundamentalsRecord>,
}

impl StockInfoResponse {
	/// Records in `symbols` order. Symbols without data are dropped.
	pub fn entries(&self) -> Vec<StockEntry> {
		self.symbols
			.iter()
			.filter_map(|symbol| {
				self.data.get(symbol).map(|record| StockEntry {
					symbol: symbol.clone(),
					record: record.clone(),
				})
			})
			.collect()
	}
}

/// One symbol with its record; the unit the local cache stores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
	/// Ticker symbol.
	pub symbol: String,
	/// Fundamentals for the symbol.
	pub record: FundamentalsRecord,
}

/// Loosely typed per-symbol fundamentals.
///
/// The feed is a free-form key/value map in which any field may be missing,
/// `null` or a string, so fields are read on demand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FundamentalsRecord(pub Map<String, Value>);

impl FundamentalsRecord {
	/// Numeric field, `None` for anything that is not a JSON number.
	pub fn number(&self, key: &str) -> Option<f64> {
		self.0.get(key).and_then(Value::as_f64)
	}

	fn text(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(Value::as_str)
	}

	/// Set when the feed could not fetch this symbol.
	pub fn error(&self) -> Option<&str> {
		self.text("error")
	}

	/// Company name, long form preferred.
	pub fn name(&self) -> Option<&str> {
		self.text("longName").or_else(|| self.text("shortName"))
	}

	/// Latest price.
	pub fn price(&self) -> Option<f64> {
		self.number("currentPrice")
			.or_else(|| self.number("regularMarketPrice"))
	}

	/// Previous session's close.
	pub fn previous_close(&self) -> Option<f64> {
		self.number("previousClose")
	}

	/// Change against the previous close, in percent.
	pub fn change_percent(&self) -> Option<f64> {
		match (self.price(), self.previous_close()) {
			(Some(price), Some(prev)) if prev != 0.0 => Some((price - prev) / prev * 100.0),
			_ => None,
		}
	}

	/// 52-week `(low, high)`.
	pub fn fifty_two_week_range(&self) -> (Option<f64>, Option<f64>) {
		(self.number("fiftyTwoWeekLow"), self.number("fiftyTwoWeekHigh"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn entries_follow_symbol_order() {
		let response: StockInfoResponse = serde_json::from_value(json!({
			"symbols": ["ZZZ", "AAA", "MISSING"],
			"data": {
				"AAA": { "beta": 1.1 },
				"ZZZ": { "error": "not found" },
			},
		}))
		.unwrap();
		let entries = response.entries();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].symbol, "ZZZ");
		assert_eq!(entries[0].record.error(), Some("not found"));
		assert_eq!(entries[1].record.number("beta"), Some(1.1));
	}

	#[test]
	fn display_fields_fall_back() {
		let record: FundamentalsRecord = serde_json::from_value(json!({
			"shortName": "Acme",
			"regularMarketPrice": 11.0,
			"previousClose": 10.0,
			"fiftyTwoWeekLow": 4.5,
			"beta": "n/a",
		}))
		.unwrap();
		assert_eq!(record.name(), Some("Acme"));
		assert_eq!(record.price(), Some(11.0));
		assert_eq!(record.change_percent().map(|p| p.round()), Some(10.0));
		assert_eq!(record.fifty_two_week_range(), (Some(4.5), None));
		assert_eq!(record.number("beta"), None);
	}
}
