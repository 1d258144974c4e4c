use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::controller::{ClickAction, InteractionController};
use super::render;
use super::source::{ArticleSource, RECENT_LIMIT, TAG_LIMIT};
use super::state::{CLICK_SLOP, ForceGraphState};
use super::types::NodeKind;

/// Rename prompt backed by `window.prompt`, pre-filled with the
/// current title. Empty input counts as cancelled.
fn window_prompt(kind: NodeKind, current: Option<&str>) -> Option<String> {
	let window = web_sys::window()?;
	let message = format!("Name this {}:", kind);
	let value = match current {
		Some(cur) => window.prompt_with_message_and_default(&message, cur),
		None => window.prompt_with_message(&message),
	}
	.ok()??;
	if value.is_empty() { None } else { Some(value) }
}

fn random_id() -> u32 {
	(js_sys::Math::random() * 100.0) as u32
}

#[component]
pub fn ForceGraphCanvas(
	source: Rc<dyn ArticleSource>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let controller = Rc::new(RefCell::new(InteractionController::new(
		Box::new(window_prompt),
		Box::new(random_id),
	)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, controller_init, source_init, animate_init, resize_cb_init) = (
		state.clone(),
		controller.clone(),
		source.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		{
			let mut c = controller_init.borrow_mut();
			match source_init.most_recent(RECENT_LIMIT) {
				Ok(batch) => {
					if let Err(err) = c.apply_batch(&batch) {
						c.on_fetch_failed("initial batch", &err);
					}
				}
				Err(err) => c.on_fetch_failed("initial batch", &err),
			}
		}
		let mut initial = ForceGraphState::new(w, h);
		initial.sync(controller_init.borrow().graph());
		*state_init.borrow_mut() = Some(initial);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let mut images = HashMap::new();
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx, &mut images);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let (state_mu, controller_mu, source_mu) = (state.clone(), controller.clone(), source.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		// A release within the slop of the press is a click; anything
		// further is the end of a drag or pan.
		let mut clicked_node: Option<String> = None;
		let mut background_at: Option<(f64, f64)> = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
				if (dx * dx + dy * dy).sqrt() < CLICK_SLOP {
					clicked_node = s
						.drag
						.node_idx
						.and_then(|idx| s.node_id(idx).map(str::to_owned));
				} else if let Some(idx) = s.drag.node_idx {
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if (dx * dx + dy * dy).sqrt() < CLICK_SLOP {
					background_at = Some(s.screen_to_graph(x, y));
				}
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}

		if let Some(id) = clicked_node {
			let action = controller_mu.borrow_mut().on_node_click(&id);
			match action {
				ClickAction::FetchTagged { tag } => {
					let mut c = controller_mu.borrow_mut();
					match source_mu.by_tag(&tag, TAG_LIMIT) {
						Ok(batch) => {
							if let Err(err) = c.apply_batch(&batch) {
								c.on_fetch_failed(&tag, &err);
							}
						}
						Err(err) => c.on_fetch_failed(&tag, &err),
					}
				}
				ClickAction::OpenUrl { url } => {
					if let Some(window) = web_sys::window() {
						let _ = window.open_with_url_and_target(&url, "_blank");
					}
				}
				ClickAction::Renamed { .. } | ClickAction::None => {}
			}
		} else if let Some((gx, gy)) = background_at {
			let mut c = controller_mu.borrow_mut();
			if let Err(err) = c.on_background_click(gx, gy) {
				c.on_fetch_failed("background click", &err);
			}
		}

		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.sync(controller_mu.borrow().graph());
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
