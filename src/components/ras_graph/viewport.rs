//! Pan/zoom viewport and fit-to-view framing.
//!
//! `screen = world * k + (x, y)`. Zoom is clamped before it is stored, so a
//! frame never sees an out-of-range value. Pan is unconstrained.

use serde::Deserialize;

use super::layout::NodePositions;
use super::types::{Point, Size};

/// Which wheel direction zooms in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum WheelZoom {
	/// Scrolling up (negative `deltaY`) zooms in. Browser map convention.
	#[default]
	ScrollUpZoomsIn,
	/// Scrolling down (positive `deltaY`) zooms in.
	ScrollDownZoomsIn,
}

/// Zoom limits, wheel behaviour and fit framing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportConfig {
	/// Smallest allowed zoom.
	pub zoom_min: f64,
	/// Largest allowed zoom.
	pub zoom_max: f64,
	/// Zoom factor per wheel notch.
	pub wheel_step: f64,
	/// Direction convention for the wheel.
	pub wheel_zoom: WheelZoom,
	/// World-space margin added around the node bounding box when fitting.
	pub fit_padding: f64,
	/// Share of the viewport the fitted box may fill.
	pub fit_fill: f64,
	/// Fitting never zooms in past this.
	pub fit_zoom_cap: f64,
	/// Used when the geometry gives no usable zoom (no nodes, one node).
	pub default_zoom: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			zoom_min: 0.2,
			zoom_max: 3.0,
			wheel_step: 1.1,
			wheel_zoom: WheelZoom::ScrollUpZoomsIn,
			fit_padding: 40.0,
			fit_fill: 0.9,
			fit_zoom_cap: 1.5,
			default_zoom: 1.0,
		}
	}
}

impl ViewportConfig {
	/// Clamp `k` into `[zoom_min, zoom_max]`.
	pub fn clamp_zoom(&self, k: f64) -> f64 {
		k.clamp(self.zoom_min, self.zoom_max)
	}

	/// Zoom factor for one wheel event. Zero delta is a no-op.
	pub fn wheel_factor(&self, delta_y: f64) -> f64 {
		if delta_y == 0.0 || !delta_y.is_finite() {
			return 1.0;
		}
		let scroll_up = delta_y < 0.0;
		let zoom_in = match self.wheel_zoom {
			WheelZoom::ScrollUpZoomsIn => scroll_up,
			WheelZoom::ScrollDownZoomsIn => !scroll_up,
		};
		if zoom_in {
			self.wheel_step
		} else {
			1.0 / self.wheel_step
		}
	}
}

/// Pan offset (`x`, `y`, screen pixels) and zoom scalar `k`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan.
	pub x: f64,
	/// Vertical pan.
	pub y: f64,
	/// Zoom.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.k.is_finite()
	}
}

/// Owns the view transform of one graph view.
#[derive(Clone, Debug)]
pub struct Viewport {
	transform: ViewTransform,
	config: ViewportConfig,
}

impl Viewport {
	/// Unpanned viewport at the configured default zoom.
	pub fn new(config: ViewportConfig) -> Self {
		let transform = ViewTransform {
			k: config.clamp_zoom(config.default_zoom),
			..ViewTransform::default()
		};
		Self { transform, config }
	}

	/// Current transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Limits this viewport enforces.
	pub fn config(&self) -> &ViewportConfig {
		&self.config
	}

	/// Shift by a screen-space delta. Non-finite deltas are ignored.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		if !(dx.is_finite() && dy.is_finite()) {
			return;
		}
		self.transform.x += dx;
		self.transform.y += dy;
	}

	/// Multiply the zoom by `factor`, clamped to the configured range. With
	/// `around`, that screen point stays fixed. Returns whether anything
	/// changed.
	pub fn zoom_by(&mut self, factor: f64, around: Option<Point>) -> bool {
		if !factor.is_finite() || factor <= 0.0 {
			return false;
		}
		let old_k = self.transform.k;
		let new_k = self.config.clamp_zoom(old_k * factor);
		if new_k == old_k {
			return false;
		}
		if let Some(p) = around.filter(|p| p.is_finite()) {
			let ratio = new_k / old_k;
			self.transform.x = p.x - (p.x - self.transform.x) * ratio;
			self.transform.y = p.y - (p.y - self.transform.y) * ratio;
		}
		self.transform.k = new_k;
		true
	}

	/// One wheel notch at screen point `at`.
	pub fn wheel(&mut self, delta_y: f64, at: Point) -> bool {
		let factor = self.config.wheel_factor(delta_y);
		self.zoom_by(factor, Some(at))
	}

	/// Replace the transform. Zoom is clamped; non-finite input is ignored.
	pub fn set_viewport(&mut self, transform: ViewTransform) {
		if !transform.is_finite() {
			return;
		}
		self.transform = ViewTransform {
			k: self.config.clamp_zoom(transform.k),
			..transform
		};
	}

	/// Map a world point onto the surface.
	pub fn world_to_screen(&self, p: Point) -> Point {
		let t = self.transform;
		Point::new(p.x * t.k + t.x, p.y * t.k + t.y)
	}

	/// Inverse of [`Viewport::world_to_screen`].
	pub fn screen_to_world(&self, p: Point) -> Point {
		let t = self.transform;
		Point::new((p.x - t.x) / t.k, (p.y - t.y) / t.k)
	}

	/// Frame every node inside `size` and apply the result.
	pub fn fit(&mut self, positions: &NodePositions, size: Size) {
		let transform = fit_to_view(positions, size, &self.config);
		self.set_viewport(transform);
	}
}

/// Pan and zoom that centre all `positions` in a viewport of `size`.
///
/// The bounding box is grown by `fit_padding` on each side and scaled to
/// fill at most `fit_fill` of the viewport, never beyond `fit_zoom_cap`.
/// Degenerate geometry (no nodes, a single point, an empty viewport) falls
/// back to `default_zoom`; the result is always finite.
pub fn fit_to_view(positions: &NodePositions, size: Size, config: &ViewportConfig) -> ViewTransform {
	const EPSILON: f64 = 1e-9;

	let screen_center = if size.width.is_finite() && size.height.is_finite() {
		size.center()
	} else {
		Point::default()
	};
	let default_zoom = config.clamp_zoom(config.default_zoom);

	let mut points = positions.values().filter(|p| p.is_finite());
	let Some(first) = points.next() else {
		return ViewTransform {
			x: screen_center.x,
			y: screen_center.y,
			k: default_zoom,
		};
	};
	let (mut min, mut max) = (*first, *first);
	for p in points {
		min.x = min.x.min(p.x);
		min.y = min.y.min(p.y);
		max.x = max.x.max(p.x);
		max.y = max.y.max(p.y);
	}
	let world_center = Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);

	let single_point = max.x - min.x < EPSILON && max.y - min.y < EPSILON;
	let padding = config.fit_padding.max(0.0);
	let (box_w, box_h) = (max.x - min.x + 2.0 * padding, max.y - min.y + 2.0 * padding);

	let mut k = f64::INFINITY;
	if !single_point {
		if box_w > EPSILON && size.width > 0.0 {
			k = k.min(size.width * config.fit_fill / box_w);
		}
		if box_h > EPSILON && size.height > 0.0 {
			k = k.min(size.height * config.fit_fill / box_h);
		}
	}
	let k = if k.is_finite() && k > 0.0 {
		config.clamp_zoom(k.min(config.fit_zoom_cap))
	} else {
		default_zoom
	};

	ViewTransform {
		x: screen_center.x - world_center.x * k,
		y: screen_center.y - world_center.y * k,
		k,
	}
}
