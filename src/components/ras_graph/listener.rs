//! Window event listener tied to a Rust owner.

use wasm_bindgen::prelude::*;
use web_sys::Window;

/// A closure registered on `window` for one event type. Dropping the guard
/// unregisters the listener before the closure itself is freed, so the
/// browser never calls into a dropped closure.
pub struct WindowListener {
	window: Window,
	event: &'static str,
	closure: Closure<dyn FnMut()>,
}

impl WindowListener {
	/// Register `handler` for `event`. `None` if the browser refused it.
	pub fn new(window: Window, event: &'static str, handler: impl FnMut() + 'static) -> Option<Self> {
		let closure = Closure::<dyn FnMut()>::new(handler);
		window
			.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
			.ok()?;
		Some(Self {
			window,
			event,
			closure,
		})
	}

	/// Event type this guard listens to.
	pub fn event(&self) -> &'static str {
		self.event
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
	}
}
