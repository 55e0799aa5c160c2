//! Client-local cache of the last uploaded fundamentals list.
//!
//! Stored as an opaque JSON array in `localStorage`. The cache is a
//! convenience only: a missing, unreadable or stale entry just means the panel
//! starts empty.

use log::{debug, warn};
use web_sys::Storage;

use super::record::StockEntry;

/// Local-storage key holding the cached list.
pub const CACHE_KEY: &str = "stockData";

fn storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

/// Serialise the list as stored.
pub fn encode(entries: &[StockEntry]) -> Option<String> {
	serde_json::to_string(entries)
		.map_err(|e| warn!("fundamentals cache: encode failed: {}", e))
		.ok()
}

/// Parse a stored list; unreadable input gives an empty list.
pub fn decode(raw: &str) -> Vec<StockEntry> {
	serde_json::from_str(raw).unwrap_or_else(|e| {
		warn!("fundamentals cache: ignoring unreadable entry: {}", e);
		Vec::new()
	})
}

/// Read the cached list; empty when nothing usable is stored.
pub fn load() -> Vec<StockEntry> {
	let Some(raw) = storage().and_then(|s| s.get_item(CACHE_KEY).ok().flatten()) else {
		return Vec::new();
	};
	let entries = decode(&raw);
	debug!("fundamentals cache: loaded {} entries", entries.len());
	entries
}

/// Replace the cached list. Failures are logged and otherwise ignored.
pub fn store(entries: &[StockEntry]) {
	let (Some(storage), Some(raw)) = (storage(), encode(entries)) else {
		return;
	};
	if storage.set_item(CACHE_KEY, &raw).is_err() {
		warn!("fundamentals cache: write refused by the browser");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fundamentals::record::FundamentalsRecord;
	use serde_json::json;

	#[test]
	fn encoded_list_reads_back() {
		let record: FundamentalsRecord = serde_json::from_value(json!({ "beta": 0.9 })).unwrap();
		let entries = vec![StockEntry {
			symbol: "ABC".into(),
			record,
		}];
		let raw = encode(&entries).unwrap();
		assert_eq!(decode(&raw), entries);
	}

	#[test]
	fn unreadable_cache_is_empty() {
		assert!(decode("not json").is_empty());
		assert!(decode("{\"symbol\": 1}").is_empty());
	}
}
