//! Leptos component wrapping the risk graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for hovering, tapping, node dragging, panning and zooming. An
//! animation loop runs via `requestAnimationFrame`, advancing the simulation
//! and redrawing each frame. Pointer activity is reported upward as
//! [`UiEvent`]s; the camera move each event returns is applied here.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{ForceGraphState, TAP_SLOP};
use super::theme::{StyleTable, Theme};
use super::types::GraphModel;
use crate::interaction::{CameraMove, UiEvent};

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	style: StyleTable,
	theme: Theme,
}

fn canvas_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
	(
		dim(window.inner_width()).unwrap_or(800.0),
		dim(window.inner_height()).unwrap_or(600.0),
	)
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the graph model on a full-window canvas.
///
/// Whenever `model` changes the simulation is rebuilt from scratch; the
/// animation loop and the resize listener are installed once and survive
/// rebuilds.
#[component]
pub fn ForceGraphCanvas(
	/// Graph to lay out and draw.
	#[prop(into)]
	model: Signal<GraphModel>,
	/// Receives interaction events and returns the camera move to perform.
	#[prop(into)]
	on_event: Callback<UiEvent, Option<CameraMove>>,
	/// Node the interaction state considers hovered; drives emphasis.
	#[prop(into)]
	hovered: Signal<Option<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let started = Rc::new(Cell::new(false));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let model = model.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let style = StyleTable::default();
		let mut state = ForceGraphState::new(&model, w, h, &style);
		state.reset_view();
		debug!("graph canvas rebuilt with {} nodes", model.nodes().len());
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			style,
			theme: Theme::default(),
		});

		if started.replace(true) {
			return;
		}

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("risk-graph: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("risk-graph: canvas has no 2d context");
				return;
			}
		};

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = canvas_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let dt = 0.016;
				if c.state.animation_running {
					c.state.tick(dt as f32);
				}
				render::render(&c.state, &ctx, &c.style, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_hover = context.clone();
	Effect::new(move |_| {
		let id = hovered.get();
		if let Some(ref mut c) = *context_hover.borrow_mut() {
			c.state.emphasize(id.as_deref());
		}
	});

	// Forward an event and apply the camera move it produces. The context
	// borrow must not be held across the callback.
	let dispatch = {
		let context = context.clone();
		move |event: UiEvent| {
			let camera = on_event.run(event);
			if let (Some(camera), Some(c)) = (camera, context.borrow_mut().as_mut()) {
				match camera {
					CameraMove::Frame(id) => c.state.frame_node(&id),
					CameraMove::Reset => c.state.reset_view(),
				}
			}
		}
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.press_moved = false;
			if let Some(idx) = c.state.node_at_position(x, y) {
				c.state.drag.active = true;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.camera.transform.x;
				c.state.pan.transform_start_y = c.state.camera.transform.y;
			}
		}
	};

	let (context_mm, dispatch_mm) = (context.clone(), dispatch.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};

		let mut events = Vec::new();
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let state = &mut c.state;
			if state.drag.active || state.pan.active {
				let (sx, sy) = if state.drag.active {
					(state.drag.start_x, state.drag.start_y)
				} else {
					(state.pan.start_x, state.pan.start_y)
				};
				if (x - sx).hypot(y - sy) > TAP_SLOP {
					state.press_moved = true;
				}
			}

			if !state.drag.active {
				let under = state.node_at_position(x, y);
				if under != state.pointer_node {
					if state.pointer_node.is_some() {
						events.push(UiEvent::PointerLeave);
					}
					state.pointer_node = under;
					if let Some(idx) = under {
						let mut id = None;
						state.graph.visit_nodes(|node| {
							if node.index() == idx {
								id = Some(node.data.user_data.id.clone());
							}
						});
						events.extend(id.map(UiEvent::PointerEnter));
					}
				}
			}

			if state.drag.active && state.press_moved {
				if let Some(idx) = state.drag.node_idx {
					let k = state.camera.transform.k;
					let (dx, dy) = ((x - state.drag.start_x) / k, (y - state.drag.start_y) / k);
					let (nx, ny) = (
						state.drag.node_start_x + dx as f32,
						state.drag.node_start_y + dy as f32,
					);
					state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if state.pan.active && state.press_moved {
				state.camera.cancel();
				state.camera.transform.x = state.pan.transform_start_x + (x - state.pan.start_x);
				state.camera.transform.y = state.pan.transform_start_y + (y - state.pan.start_y);
			}
		}
		for event in events {
			dispatch_mm(event);
		}
	};

	let (context_mu, dispatch_mu) = (context.clone(), dispatch.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let position = pointer_position(canvas_ref, &ev);
		let mut tap = None;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			let state = &mut c.state;
			let pressed = state.drag.active || state.pan.active;
			if pressed && !state.press_moved {
				tap = Some(match position.and_then(|(x, y)| state.node_at_position(x, y)) {
					Some(idx) => {
						let mut id = None;
						state.graph.visit_nodes(|node| {
							if node.index() == idx {
								id = Some(node.data.user_data.id.clone());
							}
						});
						id.map_or(UiEvent::TapBackground, UiEvent::Tap)
					}
					None => UiEvent::TapBackground,
				});
			}
			state.drag.active = false;
			state.drag.node_idx = None;
			state.pan.active = false;
		}
		if let Some(event) = tap {
			dispatch_mu(event);
		}
	};

	let (context_ml, dispatch_ml) = (context.clone(), dispatch.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let mut was_hovering = false;
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
			was_hovering = c.state.pointer_node.take().is_some();
		}
		if was_hovering {
			dispatch_ml(UiEvent::PointerLeave);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let t = &mut c.state.camera.transform;
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (t.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / t.k;
			t.x = x - (x - t.x) * ratio;
			t.y = y - (y - t.y) * ratio;
			t.k = new_k;
			c.state.camera.cancel();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="risk-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
