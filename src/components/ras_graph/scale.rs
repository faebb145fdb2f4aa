//! Zoom-dependent sizes for nodes, hit areas and labels.

use serde::Deserialize;

use super::types::NodeVariant;

/// Node radii and label sizing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScaleConfig {
	/// World-space radius of a user node.
	pub source_radius: f64,
	/// World-space radius of a CBS node.
	pub target_radius: f64,
	/// Extra world-space margin around a node that still counts as a hit.
	pub hit_padding: f64,
	/// Label size in screen pixels at zoom 1.
	pub label_px: f64,
	/// Smallest label size on screen.
	pub min_label_px: f64,
	/// Largest label size on screen.
	pub max_label_px: f64,
	/// Screen-space width of a thin node border.
	pub border_px: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			source_radius: 10.0,
			target_radius: 14.0,
			hit_padding: 4.0,
			label_px: 12.0,
			min_label_px: 9.0,
			max_label_px: 16.0,
			border_px: 1.0,
		}
	}
}

impl ScaleConfig {
	/// World-space radius of a node in column `variant`.
	pub fn radius(&self, variant: NodeVariant) -> f64 {
		match variant {
			NodeVariant::Source => self.source_radius,
			NodeVariant::Target => self.target_radius,
		}
	}
}

/// Sizes for one frame at zoom `k`, expressed in world units so they can be
/// drawn inside the canvas transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledValues {
	/// World units that render as `label_px` screen pixels, clamped.
	pub font_size: f64,
	/// World units of one screen pixel.
	pub pixel: f64,
	/// World units of a thin border.
	pub border_width: f64,
}

impl ScaledValues {
	/// Sizes at zoom `k`. A non-positive or non-finite zoom counts as 1.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let k = if k.is_finite() && k > 0.0 { k } else { 1.0 };
		let screen_font = (config.label_px * k.sqrt()).clamp(config.min_label_px, config.max_label_px);
		Self {
			font_size: screen_font / k,
			pixel: 1.0 / k,
			border_width: config.border_px / k,
		}
	}
}
