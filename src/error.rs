//! Failures while reading page-embedded data.

use thiserror::Error;

/// Why the embedded analysis could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
	/// Not running in a browser page.
	#[error("no browser window or document available")]
	NoDocument,

	/// No element with this id.
	#[error("element #{0} not found")]
	MissingElement(String),

	/// Element exists but is not a `<script>`.
	#[error("element #{0} is not a <script>")]
	NotAScript(String),

	/// Script content is not the expected JSON.
	#[error("invalid JSON in embedded data: {source}")]
	Parse {
		/// Underlying parse error.
		#[from]
		source: serde_json::Error,
	},
}
