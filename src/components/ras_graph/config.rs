//! Aggregated graph configuration. Every section has working defaults, and a
//! host page may override any subset through JSON.

use serde::Deserialize;

use super::edges::EdgeStyleConfig;
use super::interaction::InteractionConfig;
use super::layout::LayoutConfig;
use super::scale::ScaleConfig;
use super::viewport::ViewportConfig;

/// Every tunable of one graph view.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
	/// Column placement.
	pub layout: LayoutConfig,
	/// Zoom and fit.
	pub viewport: ViewportConfig,
	/// Pointer gestures.
	pub interaction: InteractionConfig,
	/// Edge buckets and widths.
	pub edges: EdgeStyleConfig,
	/// Node and label sizes.
	pub scale: ScaleConfig,
}

impl GraphConfig {
	/// Parse a partial JSON override; missing fields keep their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
