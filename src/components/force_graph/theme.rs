//! Visual theming for the risk graph.
//!
//! Holds the color type, the event color tables, the recency border ranks and
//! the per-kind style table. Everything here is plain immutable configuration
//! with a `Default`; nothing is global.

use std::collections::HashMap;

use super::types::{NodeKind, TemporalClass};
use crate::analysis::EventNature;
use crate::fundamentals::Classification;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parse `#rrggbb`. Anything else yields `None`.
	pub fn hex(s: &str) -> Option<Self> {
		let digits = s.strip_prefix('#').filter(|d| d.len() == 6)?;
		let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}

	/// Same color, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// `rgba(r, g, b, a)` for canvas and inline styles.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

fn table(entries: &[(&str, &str)]) -> HashMap<String, Color> {
	entries
		.iter()
		.filter_map(|(k, v)| Color::hex(v).map(|c| (k.to_string(), c)))
		.collect()
}

/// Color tables keyed by event taxonomy.
#[derive(Clone, Debug)]
pub struct EventPalette {
	/// Fill color per `event_type`.
	pub fill: HashMap<String, Color>,
	/// Fill for event types missing from `fill`.
	pub default_fill: Color,
	/// Border for single-occurrence events.
	pub single_border: Color,
	/// Border for process events.
	pub process_border: Color,
	/// Border per `event_type`, used when the nature is absent or unknown.
	pub border: HashMap<String, Color>,
	/// Border when neither nature nor type is known.
	pub default_border: Color,
}

impl EventPalette {
	/// Fill for an event type, or the default fill.
	pub fn fill_for(&self, event_type: &str) -> Color {
		self.fill
			.get(event_type)
			.copied()
			.unwrap_or(self.default_fill)
	}

	/// Nature decides first; the per-type table is the fallback.
	pub fn border_for(&self, event_type: &str, nature: Option<EventNature>) -> Color {
		match nature {
			Some(EventNature::Single) => self.single_border,
			Some(EventNature::Process) => self.process_border,
			Some(EventNature::Unknown) | None => self
				.border
				.get(event_type)
				.copied()
				.unwrap_or(self.default_border),
		}
	}
}

impl Default for EventPalette {
	fn default() -> Self {
		Self {
			fill: table(&[
				("going_concern_opinion", "#b71c1c"),
				("bankruptcy_filing", "#880e4f"),
				("debt_default", "#d84315"),
				("covenant_breach", "#ef6c00"),
				("credit_downgrade", "#c62828"),
				("material_weakness", "#f9a825"),
				("restatement", "#fbc02d"),
				("auditor_resignation", "#8d6e63"),
				("delisting_notice", "#6a1b9a"),
				("sec_investigation", "#4527a0"),
				("litigation", "#283593"),
				("executive_departure", "#1565c0"),
				("goodwill_impairment", "#00838f"),
				("restructuring", "#2e7d32"),
				("layoffs", "#558b2f"),
				("dilutive_offering", "#9e9d24"),
				("cybersecurity_incident", "#37474f"),
				("supply_chain_disruption", "#00695c"),
			]),
			default_fill: Color::rgb(158, 158, 158),
			single_border: Color::rgb(41, 182, 246),
			process_border: Color::rgb(171, 71, 188),
			border: table(&[
				("going_concern_opinion", "#ff1744"),
				("bankruptcy_filing", "#ff1744"),
				("debt_default", "#ff6d00"),
				("covenant_breach", "#ff6d00"),
				("material_weakness", "#ffd600"),
				("restatement", "#ffd600"),
				("delisting_notice", "#7c4dff"),
				("sec_investigation", "#7c4dff"),
				("litigation", "#7c4dff"),
			]),
			default_border: Color::rgb(207, 216, 220),
		}
	}
}

/// A border color and width pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
	/// Stroke color.
	pub color: Color,
	/// Stroke width in pixels.
	pub width: f64,
}

/// Filing borders by recency rank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankBorders {
	/// Most recent filing.
	pub latest: Border,
	/// Second most recent filing.
	pub second: Border,
	/// Every other filing.
	pub rest: Border,
}

impl RankBorders {
	/// Border for a 0-based recency rank.
	pub fn for_rank(&self, rank: usize) -> Border {
		match rank {
			0 => self.latest,
			1 => self.second,
			_ => self.rest,
		}
	}
}

impl Default for RankBorders {
	fn default() -> Self {
		Self {
			latest: Border {
				color: Color::rgb(229, 57, 53),
				width: 4.0,
			},
			second: Border {
				color: Color::rgba(255, 152, 0, 0.6),
				width: 3.0,
			},
			rest: Border {
				color: Color::rgba(176, 190, 197, 0.8),
				width: 1.0,
			},
		}
	}
}

/// Resting look of one node kind.
#[derive(Clone, Copy, Debug)]
pub struct NodeKindStyle {
	/// Radius in world units.
	pub radius: f64,
	/// Fill for kinds that do not derive their color from data.
	pub fill: Color,
	/// Whether the label is drawn.
	pub show_label: bool,
}

/// Edge look.
#[derive(Clone, Copy, Debug)]
pub struct EdgeStyle {
	/// Line color.
	pub color: Color,
	/// Line width in screen pixels.
	pub width: f64,
	/// Dash (on, off) for event edges, in world units.
	pub event_dash: (f64, f64),
	/// Edge label color.
	pub label_color: Color,
}

/// How temporal classes alter the resting style.
#[derive(Clone, Copy, Debug)]
pub struct TemporalStyle {
	/// Opacity of past events.
	pub past_alpha: f64,
	/// Border width multiplier for future events.
	pub future_border: f64,
	/// Radius multiplier for future events.
	pub future_radius: f64,
}

/// Transient emphasis of the hovered node at full intensity.
#[derive(Clone, Copy, Debug)]
pub struct HoverStyle {
	/// Extra radius at full emphasis, as a fraction.
	pub radius_boost: f64,
	/// How far the fill moves towards white.
	pub lighten: f64,
	/// Extra border width at full emphasis, as a fraction.
	pub border_boost: f64,
}

/// Node/edge kind to visual properties; the render side reads only this and
/// the graph model.
#[derive(Clone, Debug)]
pub struct StyleTable {
	/// Ticker root.
	pub ticker: NodeKindStyle,
	/// Filing nodes.
	pub filing: NodeKindStyle,
	/// Event nodes.
	pub event: NodeKindStyle,
	/// Placeholder node.
	pub placeholder: NodeKindStyle,
	/// Edges and their labels.
	pub edge: EdgeStyle,
	/// Past/future treatment.
	pub temporal: TemporalStyle,
	/// Hover emphasis.
	pub hover: HoverStyle,
}

impl StyleTable {
	/// Style for a node kind.
	pub fn node(&self, kind: NodeKind) -> &NodeKindStyle {
		match kind {
			NodeKind::Ticker => &self.ticker,
			NodeKind::Filing => &self.filing,
			NodeKind::Event => &self.event,
			NodeKind::Placeholder => &self.placeholder,
		}
	}

	/// Opacity of a node at rest.
	pub fn resting_alpha(&self, temporal: TemporalClass) -> f64 {
		match temporal {
			TemporalClass::Past => self.temporal.past_alpha,
			TemporalClass::Future | TemporalClass::None => 1.0,
		}
	}

	/// (radius, border) multipliers of a node at rest.
	pub fn resting_scale(&self, temporal: TemporalClass) -> (f64, f64) {
		match temporal {
			TemporalClass::Future => (self.temporal.future_radius, self.temporal.future_border),
			TemporalClass::Past | TemporalClass::None => (1.0, 1.0),
		}
	}
}

impl Default for StyleTable {
	fn default() -> Self {
		Self {
			ticker: NodeKindStyle {
				radius: 16.0,
				fill: Color::rgb(236, 239, 241),
				show_label: true,
			},
			filing: NodeKindStyle {
				radius: 10.0,
				fill: Color::rgb(84, 110, 122),
				show_label: true,
			},
			event: NodeKindStyle {
				radius: 7.0,
				fill: Color::rgb(158, 158, 158),
				show_label: true,
			},
			placeholder: NodeKindStyle {
				radius: 12.0,
				fill: Color::rgb(96, 125, 139),
				show_label: true,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				width: 1.5,
				event_dash: (6.0, 3.0),
				label_color: Color::rgba(200, 210, 220, 0.85),
			},
			temporal: TemporalStyle {
				past_alpha: 0.35,
				future_border: 1.5,
				future_radius: 1.15,
			},
			hover: HoverStyle {
				radius_boost: 0.4,
				lighten: 0.35,
				border_boost: 1.0,
			},
		}
	}
}

/// Page-level colors.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: Color,
	/// Node labels and tooltip text.
	pub label: Color,
	/// Favorable classification.
	pub favorable: Color,
	/// Neutral classification.
	pub neutral: Color,
	/// Unfavorable classification.
	pub unfavorable: Color,
}

impl Theme {
	/// Color for a classification.
	pub fn classification(&self, c: Classification) -> Color {
		match c {
			Classification::Favorable => self.favorable,
			Classification::Neutral => self.neutral,
			Classification::Unfavorable => self.unfavorable,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(22, 27, 34),
			label: Color::rgba(255, 255, 255, 0.85),
			favorable: Color::rgb(67, 160, 71),
			neutral: Color::rgb(251, 192, 45),
			unfavorable: Color::rgb(229, 57, 53),
		}
	}
}
