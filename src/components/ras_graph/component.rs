use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent, Window,
};

use super::config::GraphConfig;
use super::interaction::InteractionEvent;
use super::listener::WindowListener;
use super::render;
use super::state::{FitTicket, RasGraphState};
use super::types::{GraphInput, NodeKey, Point, Size};

type SharedState = Rc<RefCell<Option<RasGraphState>>>;

/// Run `f` against the mounted graph state. A missing state (not mounted yet)
/// or a re-entrant borrow turns the call into a no-op.
fn with_state<R>(state: &SharedState, f: impl FnOnce(&mut RasGraphState) -> R) -> Option<R> {
	let Ok(mut guard) = state.try_borrow_mut() else {
		warn!("ras-graph: state busy, dropping event");
		return None;
	};
	guard.as_mut().map(f)
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> Size {
	if fullscreen {
		let window: Option<Window> = web_sys::window();
		let dim = |v: Option<Result<JsValue, JsValue>>, fallback: f64| {
			v.and_then(|r| r.ok()).and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		return Size::new(
			dim(window.as_ref().map(|w| w.inner_width()), 800.0),
			dim(window.as_ref().map(|w| w.inner_height()), 600.0),
		);
	}
	let parent = canvas.parent_element();
	Size::new(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

fn apply_size(canvas: &HtmlCanvasElement, size: Size) {
	canvas.set_width(size.width.max(0.0) as u32);
	canvas.set_height(size.height.max(0.0) as u32);
}

/// Fit on the next animation frame, once the surface reports its final size.
/// Skipped if the component is gone or a newer fit superseded `ticket`.
fn defer_fit(
	state: SharedState,
	alive: Arc<AtomicBool>,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	sizing: (bool, Option<f64>, Option<f64>),
	ticket: FitTicket,
) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let callback = Closure::once_into_js(move || {
		if !alive.load(Ordering::Relaxed) {
			return;
		}
		let size = canvas_ref.get_untracked().map(|canvas| {
			let (fullscreen, width, height) = sizing;
			let size = measure(&canvas, fullscreen, width, height);
			apply_size(&canvas, size);
			size
		});
		with_state(&state, |s| {
			if let Some(size) = size {
				s.resize(size);
			}
			s.run_scheduled_fit(ticket)
		});
	});
	let _ = window.request_animation_frame(callback.unchecked_ref());
}

/// Interactive user/CBS connection graph.
///
/// `data` supplies users, CBS hosts and connections; `external_highlight_id`
/// names a connection to emphasise (hover takes precedence). Clicking a node
/// fires `on_node_selected`; dragging never does. Clicking the background
/// clears the selection and fires `on_selection_cleared`.
#[component]
pub fn RasGraphCanvas(
	/// Users, CBS hosts and sessions to draw.
	#[prop(into)]
	data: Signal<GraphInput>,
	/// Connection id to emphasise; hover takes precedence.
	#[prop(into, optional)]
	external_highlight_id: MaybeProp<String>,
	/// Fired when a node is clicked.
	#[prop(optional)]
	on_node_selected: Option<Callback<NodeKey>>,
	/// Fired when a background click clears the selection.
	#[prop(optional)]
	on_selection_cleared: Option<Callback<()>>,
	/// Layout, zoom, gesture and styling settings.
	#[prop(optional)]
	config: GraphConfig,
	/// Size the canvas to the window instead of its parent.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_listener = StoredValue::new_local(None::<WindowListener>);
	let alive = Arc::new(AtomicBool::new(true));
	let sizing = (fullscreen, width, height);

	let alive_cleanup = alive.clone();
	on_cleanup(move || {
		alive_cleanup.store(false, Ordering::Relaxed);
		resize_listener.try_update_value(|listener| *listener = None);
	});

	let (state_init, animate_init, alive_init) = (state.clone(), animate.clone(), alive.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			warn!("ras-graph: no window, graph not mounted");
			return;
		};
		let size = measure(&canvas, fullscreen, width, height);
		apply_size(&canvas, size);

		let ctx: Option<CanvasRenderingContext2d> = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok());
		let Some(ctx) = ctx else {
			warn!("ras-graph: 2d context unavailable");
			return;
		};

		let mut graph = RasGraphState::new(&data.get_untracked(), size, config.clone());
		graph.set_external_highlight(external_highlight_id.get_untracked());
		let ticket = graph.schedule_fit();
		*state_init.borrow_mut() = Some(graph);
		defer_fit(state_init.clone(), alive_init.clone(), canvas_ref, sizing, ticket);

		let (state_resize, alive_resize) = (state_init.clone(), alive_init.clone());
		let listener = WindowListener::new(window.clone(), "resize", move || {
			if !alive_resize.load(Ordering::Relaxed) {
				return;
			}
			let Some(canvas) = canvas_ref.get_untracked() else {
				return;
			};
			let size = measure(&canvas, fullscreen, width, height);
			apply_size(&canvas, size);
			with_state(&state_resize, |s| s.resize(size));
		});
		if listener.is_none() {
			warn!("ras-graph: could not listen for window resize");
		}
		resize_listener.set_value(listener);

		let (state_anim, animate_inner, alive_anim) =
			(state_init.clone(), animate_init.clone(), alive_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Ok(guard) = state_anim.try_borrow() {
				if let Some(ref s) = *guard {
					render::render(s, &ctx);
				}
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_data, alive_data) = (state.clone(), alive.clone());
	Effect::new(move |_| {
		let input = data.get();
		let ticket = with_state(&state_data, |s| s.set_input(&input).then(|| s.schedule_fit())).flatten();
		if let Some(ticket) = ticket {
			defer_fit(state_data.clone(), alive_data.clone(), canvas_ref, sizing, ticket);
		}
	});

	let state_hl = state.clone();
	Effect::new(move |_| {
		let id = external_highlight_id.get();
		with_state(&state_hl, |s| s.set_external_highlight(id));
	});

	let state_pd = state.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let p = local_point(&canvas, &ev);
		let owns_gesture = with_state(&state_pd, |s| s.pointer_down(ev.pointer_id(), p)).unwrap_or(false);
		if owns_gesture {
			// Keep receiving moves outside the canvas while the button is down.
			let _ = canvas.set_pointer_capture(ev.pointer_id());
		}
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let p = local_point(&canvas, &ev);
		with_state(&state_pm, |s| s.pointer_move(ev.pointer_id(), p));
	};

	let state_pu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		if let Some(canvas) = canvas_ref.get_untracked() {
			if canvas.has_pointer_capture(ev.pointer_id()) {
				let _ = canvas.release_pointer_capture(ev.pointer_id());
			}
		}
		// Callbacks run after the state borrow is released; hosts may call back in.
		match with_state(&state_pu, |s| s.pointer_up(ev.pointer_id())).flatten() {
			Some(InteractionEvent::NodeSelected(key)) => {
				if let Some(cb) = on_node_selected {
					cb.run(key);
				}
			}
			Some(InteractionEvent::BackgroundClicked) => {
				if let Some(cb) = on_selection_cleared {
					cb.run(());
				}
			}
			None => {}
		}
	};

	let state_pl = state.clone();
	let on_pointerleave = move |ev: PointerEvent| {
		with_state(&state_pl, |s| s.pointer_leave(ev.pointer_id()));
	};

	let state_lc = state.clone();
	let on_capture_lost = move |ev: PointerEvent| {
		with_state(&state_lc, |s| s.capture_lost(ev.pointer_id()));
	};

	let state_pc = state.clone();
	let on_pointercancel = move |ev: PointerEvent| {
		with_state(&state_pc, |s| s.capture_lost(ev.pointer_id()));
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let p = local_point(&canvas, &ev);
		with_state(&state_wh, |s| s.wheel(ev.delta_y(), p));
	};

	let state_zi = state.clone();
	let zoom_in = move |_: MouseEvent| {
		with_state(&state_zi, |s| s.zoom_step(true));
	};
	let state_zo = state.clone();
	let zoom_out = move |_: MouseEvent| {
		with_state(&state_zo, |s| s.zoom_step(false));
	};
	let state_fit = state.clone();
	let fit = move |_: MouseEvent| {
		with_state(&state_fit, |s| s.fit_to_view());
	};

	view! {
		<div class="ras-graph">
			<canvas
				node_ref=canvas_ref
				class="ras-graph-canvas"
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=on_pointerup
				on:pointerleave=on_pointerleave
				on:pointercancel=on_pointercancel
				on:lostpointercapture=on_capture_lost
				on:wheel=on_wheel
				style="display: block; cursor: grab; touch-action: none;"
			/>
			<div class="ras-graph-controls">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"−"</button>
				<button title="Fit to view" on:click=fit>"Fit"</button>
			</div>
		</div>
	}
}
