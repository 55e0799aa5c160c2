//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node display data,
//! a smoothed camera for pan/zoom and framing, and hover emphasis with smooth
//! intensity transitions.

use std::collections::HashMap;
use std::f64::consts::TAU;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::theme::{Color, StyleTable};
use super::types::{GraphModel, NodeKind, TemporalClass};

/// Per-node display data attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub tooltip: Option<String>,
	pub color: Color,
	pub border_color: Color,
	pub border_width: f64,
	pub temporal: TemporalClass,
	/// Radius in world units.
	pub radius: f64,
}

/// Display data for an edge, keyed by its (source, target) pair.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub label: String,
	/// Event edges are drawn dashed.
	pub dashed: bool,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 4.0;

/// Transform that fits `points` (graph space) into a `width` x `height`
/// viewport, leaving `padding` pixels on each side.
pub fn fit_transform(points: &[(f64, f64)], width: f64, height: f64, padding: f64) -> ViewTransform {
	if points.is_empty() {
		return ViewTransform {
			x: width / 2.0,
			y: height / 2.0,
			k: 1.0,
		};
	}

	let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
	let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
	for &(x, y) in points {
		min_x = min_x.min(x);
		min_y = min_y.min(y);
		max_x = max_x.max(x);
		max_y = max_y.max(y);
	}

	let avail_w = (width - 2.0 * padding).max(1.0);
	let avail_h = (height - 2.0 * padding).max(1.0);
	// A single point has no extent; keep it at 1:1.
	let k = match (max_x - min_x, max_y - min_y) {
		(w, h) if w < 1e-6 && h < 1e-6 => 1.0,
		(w, h) => (avail_w / w.max(1e-6)).min(avail_h / h.max(1e-6)),
	}
	.clamp(MIN_ZOOM, MAX_ZOOM);

	let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
	ViewTransform {
		x: width / 2.0 - cx * k,
		y: height / 2.0 - cy * k,
		k,
	}
}

/// Camera with an optional animation target.
#[derive(Clone, Debug, Default)]
pub struct Camera {
	pub transform: ViewTransform,
	target: Option<ViewTransform>,
}

impl Camera {
	pub fn animate_to(&mut self, target: ViewTransform) {
		self.target = Some(target);
	}

	/// Direct manipulation (pan, wheel) cancels any running animation.
	pub fn cancel(&mut self) {
		self.target = None;
	}

	pub fn is_animating(&self) -> bool {
		self.target.is_some()
	}

	/// Ease towards the target with exponential smoothing.
	pub fn tick(&mut self, dt: f64) {
		const SPEED: f64 = 5.0;
		let Some(target) = self.target else {
			return;
		};
		let f = 1.0 - (-SPEED * dt).exp();
		let t = &mut self.transform;
		t.x += (target.x - t.x) * f;
		t.y += (target.y - t.y) * f;
		t.k += (target.k - t.k) * f;

		let close = (target.x - t.x).abs() < 0.5
			&& (target.y - t.y).abs() < 0.5
			&& (target.k - t.k).abs() < 0.001;
		if close {
			self.transform = target;
			self.target = None;
		}
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pointer travel (pixels) below which a press/release counts as a tap.
pub const TAP_SLOP: f64 = 4.0;

/// Smooth per-node hover emphasis.
///
/// The hovered node fades towards full intensity; every other node fades
/// back to rest. Entries are dropped once invisible.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered_node: Option<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
}

impl HighlightState {
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hovered_node = node;
	}

	/// Animate intensities using exponential smoothing.
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0; // ~150ms to 95%
		const FADE_OUT_SPEED: f64 = 4.0; // ~250ms to 95%

		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		if let Some(idx) = self.hovered_node {
			let i = self.intensity.entry(idx).or_insert(0.0);
			*i += (1.0 - *i) * fade_in;
		}

		let hovered = self.hovered_node;
		self.intensity.retain(|idx, i| {
			if Some(*idx) == hovered {
				return true;
			}
			*i *= fade_out;
			*i > 0.005
		});
	}

	pub fn intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}
}

/// Core graph state combining physics simulation with camera and hover.
///
/// Rebuilt whenever the graph model changes, then mutated each frame by the
/// animation loop.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub camera: Camera,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	/// Node under the pointer, of any kind; drives the tooltip.
	pub pointer_node: Option<DefaultNodeIdx>,
	/// Whether the current press has travelled past [`TAP_SLOP`].
	pub press_moved: bool,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub edge_info: HashMap<(DefaultNodeIdx, DefaultNodeIdx), EdgeInfo>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(model: &GraphModel, width: f64, height: f64, style: &StyleTable) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let positions = seed_positions(model);

		for node in model.nodes() {
			let (x, y) = positions.get(node.id.as_str()).copied().unwrap_or((0.0, 0.0));
			let (radius_mult, border_mult) = style.resting_scale(node.temporal_class);
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				// The centre stays put so the forest hangs around it.
				is_anchor: matches!(node.kind, NodeKind::Ticker | NodeKind::Placeholder),
				user_data: NodeInfo {
					id: node.id.clone(),
					kind: node.kind,
					label: node.label.clone(),
					tooltip: node.tooltip.clone(),
					color: node.color,
					border_color: node.border_color,
					border_width: node.border_width * border_mult,
					temporal: node.temporal_class,
					radius: style.node(node.kind).radius * radius_mult,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::new();
		let mut edge_info = HashMap::new();
		for edge in model.edges() {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&edge.source), id_to_idx.get(&edge.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
				let dashed = model
					.node(&edge.source)
					.is_some_and(|n| n.kind == NodeKind::Event);
				edge_info.insert(
					(src, tgt),
					EdgeInfo {
						label: edge.label.clone(),
						dashed,
					},
				);
			}
		}

		Self {
			graph,
			camera: Camera {
				transform: ViewTransform {
					x: width / 2.0,
					y: height / 2.0,
					k: 1.0,
				},
				target: None,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			pointer_node: None,
			press_moved: false,
			width,
			height,
			animation_running: true,
			edge_info,
			edges,
			id_to_idx,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		let t = &self.camera.transform;
		((sx - t.x) / t.k, (sy - t.y) / t.k)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// Keep small nodes clickable when zoomed out.
		let min_hit = 6.0 / self.camera.transform.k;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let hit = node.data.user_data.radius.max(min_hit);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_label(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> Option<&EdgeInfo> {
		self.edge_info
			.get(&(a, b))
			.or_else(|| self.edge_info.get(&(b, a)))
	}

	/// Graph-space positions of `id` and its direct neighbours.
	fn neighborhood_points(&self, idx: DefaultNodeIdx) -> Vec<(f64, f64)> {
		let mut members = vec![idx];
		for &(src, tgt) in &self.edges {
			if src == idx {
				members.push(tgt);
			} else if tgt == idx {
				members.push(src);
			}
		}
		let mut points = Vec::with_capacity(members.len());
		self.graph.visit_nodes(|node| {
			if members.contains(&node.index()) {
				points.push((node.x() as f64, node.y() as f64));
			}
		});
		points
	}

	fn all_points(&self) -> Vec<(f64, f64)> {
		let mut points = Vec::new();
		self.graph
			.visit_nodes(|node| points.push((node.x() as f64, node.y() as f64)));
		points
	}

	/// Animate the camera onto a node and its neighbours.
	pub fn frame_node(&mut self, id: &str) {
		let Some(&idx) = self.id_to_idx.get(id) else {
			return;
		};
		let points = self.neighborhood_points(idx);
		self.camera
			.animate_to(fit_transform(&points, self.width, self.height, 80.0));
	}

	/// Animate the camera back to the whole graph.
	pub fn reset_view(&mut self) {
		let points = self.all_points();
		self.camera
			.animate_to(fit_transform(&points, self.width, self.height, 40.0));
	}

	/// Emphasise the node with this id, or nothing.
	///
	/// Driven by the interaction state, so a node is only emphasised while
	/// the machine agrees it is hovered.
	pub fn emphasize(&mut self, id: Option<&str>) {
		let idx = id.and_then(|id| self.id_to_idx.get(id).copied());
		self.highlight.set_hover(idx);
	}

	/// Advance physics, hover fades and the camera by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.highlight.tick(dt as f64);
		self.camera.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Starting positions: ticker at the origin, filings on a ring around it,
/// events fanned out behind their filing. The simulation takes it from there.
fn seed_positions(model: &GraphModel) -> HashMap<&str, (f64, f64)> {
	let mut positions = HashMap::new();
	let filings: Vec<&str> = model
		.nodes()
		.iter()
		.filter(|n| n.kind == NodeKind::Filing)
		.map(|n| n.id.as_str())
		.collect();

	for node in model.nodes() {
		if matches!(node.kind, NodeKind::Ticker | NodeKind::Placeholder) {
			positions.insert(node.id.as_str(), (0.0, 0.0));
		}
	}
	for (i, &id) in filings.iter().enumerate() {
		let angle = i as f64 * TAU / filings.len() as f64;
		let (fx, fy) = (140.0 * angle.cos(), 140.0 * angle.sin());
		positions.insert(id, (fx, fy));

		let children: Vec<&str> = model
			.edges()
			.iter()
			.filter(|e| e.target == id)
			.map(|e| e.source.as_str())
			.collect();
		for (j, &child) in children.iter().enumerate() {
			let spread = (j as f64 - (children.len() as f64 - 1.0) / 2.0) * 0.35;
			let a = angle + spread;
			positions.insert(child, (fx + 70.0 * a.cos(), fy + 70.0 * a.sin()));
		}
	}
	positions
}
