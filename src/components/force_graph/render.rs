//! Canvas rendering for the risk graph.
//!
//! Rendering uses passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges, then edge labels (world space)
//! 3. Nodes at rest, then the emphasised node on top
//! 4. Tooltip for the node under the pointer (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NodeInfo};
use super::theme::{StyleTable, Theme};
use super::types::NodeKind;

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	style: &StyleTable,
	theme: &Theme,
) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let t = state.camera.transform;
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	draw_edges(state, ctx, style);
	draw_nodes(state, ctx, style, theme);

	ctx.restore();

	draw_tooltip(state, ctx, theme);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, style: &StyleTable) {
	let k = state.camera.transform.k;
	let edge = &style.edge;
	ctx.set_stroke_style_str(&edge.color.to_css());
	ctx.set_line_width(edge.width / k);

	state.graph.visit_edges(|n1, n2, _| {
		let info = state.edge_label(n1.index(), n2.index());
		if info.is_some_and(|i| i.dashed) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(edge.event_dash.0),
				&JsValue::from_f64(edge.event_dash.1),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	// Labels only once they are legible.
	if k < 0.6 {
		return;
	}
	ctx.set_fill_style_str(&edge.label_color.to_css());
	ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(1.0)));
	state.graph.visit_edges(|n1, n2, _| {
		let Some(info) = state.edge_label(n1.index(), n2.index()) else {
			return;
		};
		if info.label.is_empty() {
			return;
		}
		let (mx, my) = (
			(n1.x() as f64 + n2.x() as f64) / 2.0,
			(n1.y() as f64 + n2.y() as f64) / 2.0,
		);
		let _ = ctx.fill_text(&info.label, mx + 3.0, my - 3.0);
	});
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	style: &StyleTable,
	theme: &Theme,
) {
	// Pass 1: resting nodes
	state.graph.visit_nodes(|node| {
		if state.highlight.intensity(node.index()) > 0.001 {
			return;
		}
		draw_node(
			ctx,
			node.x() as f64,
			node.y() as f64,
			&node.data.user_data,
			style,
			theme,
			state.camera.transform.k,
			0.0,
		);
	});

	// Pass 2: emphasised or fading nodes on top
	state.graph.visit_nodes(|node| {
		let t = state.highlight.intensity(node.index());
		if t <= 0.001 {
			return;
		}
		draw_node(
			ctx,
			node.x() as f64,
			node.y() as f64,
			&node.data.user_data,
			style,
			theme,
			state.camera.transform.k,
			smooth_step(t),
		);
	});
}

/// Draw one node; `emphasis` in 0..=1 blends from resting to hovered look.
#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	info: &NodeInfo,
	style: &StyleTable,
	theme: &Theme,
	k: f64,
	emphasis: f64,
) {
	let hover = &style.hover;
	let rest_alpha = style.resting_alpha(info.temporal);
	// Emphasis lifts past events to full opacity; on exit they fade back.
	let alpha = rest_alpha + (1.0 - rest_alpha) * emphasis;
	let radius = info.radius * (1.0 + hover.radius_boost * emphasis);
	let fill = info.color.lighten(hover.lighten * emphasis);
	let border = info.border_width * (1.0 + hover.border_boost * emphasis);

	ctx.set_global_alpha(alpha);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();

	if border > 0.0 {
		ctx.set_stroke_style_str(&info.border_color.to_css());
		ctx.set_line_width(border / k.max(0.5));
		ctx.stroke();
	}

	if style.node(info.kind).show_label && (k >= 0.5 || info.kind != NodeKind::Event) {
		ctx.set_fill_style_str(&theme.label.to_css());
		ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
		let _ = ctx.fill_text(&info.label, x + radius + 4.0, y + 3.0);
	}

	ctx.set_global_alpha(1.0);
}

fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if state.drag.active || state.pan.active {
		return;
	}
	let Some(idx) = state.pointer_node else {
		return;
	};
	let mut found = None;
	state.graph.visit_nodes(|node| {
		if node.index() == idx {
			found = Some((
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.tooltip.clone(),
			));
		}
	});
	let Some((gx, gy, Some(text))) = found else {
		return;
	};
	let t = state.camera.transform;
	let (sx, sy) = (gx * t.k + t.x + 14.0, gy * t.k + t.y + 14.0);

	let lines: Vec<&str> = text.lines().collect();
	ctx.set_font("12px sans-serif");
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max)
		+ 16.0;
	let height = lines.len() as f64 * 16.0 + 8.0;

	ctx.set_fill_style_str("rgba(10, 12, 16, 0.9)");
	ctx.fill_rect(sx, sy, width, height);
	ctx.set_fill_style_str(&theme.label.to_css());
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, sx + 8.0, sy + 18.0 + i as f64 * 16.0);
	}
}
