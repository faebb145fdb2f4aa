//! Edge draw instructions: resolved endpoints, a duration bucket and a
//! stroke width that doubles for highlighted edges.

use log::debug;
use serde::Deserialize;

use super::highlight::{Emphasis, HighlightSet, edge_emphasis};
use super::layout::NodePositions;
use super::types::{Connection, Point};

/// Duration bucket of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
	/// Long sessions, `duration >= high_threshold`.
	Hot,
	/// Everything in between.
	Warm,
	/// Short sessions, `duration < low_threshold`.
	Cool,
}

impl EdgeStyle {
	/// CSS class used by the detail table.
	pub fn class(self) -> &'static str {
		match self {
			EdgeStyle::Hot => "hot",
			EdgeStyle::Warm => "warm",
			EdgeStyle::Cool => "cool",
		}
	}

	/// RGB triple for canvas strokes.
	pub fn rgb(self) -> (u8, u8, u8) {
		match self {
			EdgeStyle::Hot => (239, 83, 80),
			EdgeStyle::Warm => (255, 183, 77),
			EdgeStyle::Cool => (100, 180, 255),
		}
	}
}

/// Duration thresholds and stroke widths.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeStyleConfig {
	/// Minutes.
	pub high_threshold: f64,
	/// Minutes.
	pub low_threshold: f64,
	/// World-space stroke width of a normal edge.
	pub base_width: f64,
	/// Stroke width factor for highlighted edges.
	pub highlight_multiplier: f64,
}

impl Default for EdgeStyleConfig {
	fn default() -> Self {
		Self {
			high_threshold: 120.0,
			low_threshold: 60.0,
			base_width: 1.5,
			highlight_multiplier: 2.0,
		}
	}
}

impl EdgeStyleConfig {
	/// Bucket a session length. `high_threshold` is inclusive, `low_threshold` exclusive.
	pub fn bucket(&self, duration_minutes: f64) -> EdgeStyle {
		if duration_minutes >= self.high_threshold {
			EdgeStyle::Hot
		} else if duration_minutes < self.low_threshold {
			EdgeStyle::Cool
		} else {
			EdgeStyle::Warm
		}
	}
}

/// One line to draw, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDraw {
	/// Connection id.
	pub id: String,
	/// User end.
	pub from: Point,
	/// CBS end.
	pub to: Point,
	/// Duration bucket.
	pub style: EdgeStyle,
	/// World-space width, already multiplied when highlighted.
	pub stroke_width: f64,
	/// Opacity class against the current highlight.
	pub emphasis: Emphasis,
}

/// Build draw instructions for every connection whose endpoints both have a
/// position. Connections with a missing endpoint are skipped.
pub fn render_edges(
	connections: &[Connection],
	positions: &NodePositions,
	highlight: Option<&HighlightSet>,
	config: &EdgeStyleConfig,
) -> Vec<EdgeDraw> {
	connections
		.iter()
		.filter_map(|connection| {
			let endpoints = (
				positions.get(&connection.source_key()),
				positions.get(&connection.target_key()),
			);
			let (Some(&from), Some(&to)) = endpoints else {
				debug!("ras-graph: skipping edge {} without positions", connection.id);
				return None;
			};
			let emphasis = edge_emphasis(highlight, &connection.id);
			let stroke_width = match emphasis {
				Emphasis::Active => config.base_width * config.highlight_multiplier,
				Emphasis::Normal | Emphasis::Dimmed => config.base_width,
			};
			Some(EdgeDraw {
				id: connection.id.clone(),
				from,
				to,
				style: config.bucket(connection.duration_minutes),
				stroke_width,
				emphasis,
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ras_graph::highlight::resolve;
	use crate::components::ras_graph::types::NodeKey;

	fn connection(id: &str, user: &str, cbs: &str, minutes: f64) -> Connection {
		Connection {
			id: id.to_string(),
			user_id: user.to_string(),
			cbs_id: cbs.to_string(),
			duration_minutes: minutes,
			sent_bytes: 0,
			received_bytes: 0,
			timestamp: String::new(),
		}
	}

	fn positions() -> NodePositions {
		[
			(NodeKey::source("a"), Point::new(0.0, 0.0)),
			(NodeKey::source("b"), Point::new(0.0, 100.0)),
			(NodeKey::target("x"), Point::new(400.0, 50.0)),
		]
		.into_iter()
		.collect()
	}

	#[test]
	fn buckets_follow_thresholds() {
		let config = EdgeStyleConfig::default();
		assert_eq!(config.bucket(200.0), EdgeStyle::Hot);
		assert_eq!(config.bucket(120.0), EdgeStyle::Hot);
		assert_eq!(config.bucket(119.9), EdgeStyle::Warm);
		assert_eq!(config.bucket(60.0), EdgeStyle::Warm);
		assert_eq!(config.bucket(59.9), EdgeStyle::Cool);
		assert_eq!(EdgeStyle::Hot.class(), "hot");
	}

	#[test]
	fn dangling_edges_are_skipped() {
		let connections = vec![
			connection("ok", "a", "x", 10.0),
			connection("ghost", "a", "missing", 10.0),
		];
		let draws = render_edges(&connections, &positions(), None, &EdgeStyleConfig::default());
		assert_eq!(draws.len(), 1);
		assert_eq!(draws[0].id, "ok");
		assert_eq!(draws[0].from, Point::new(0.0, 0.0));
		assert_eq!(draws[0].to, Point::new(400.0, 50.0));
	}

	#[test]
	fn highlighted_edges_are_wider() {
		let connections = vec![connection("e1", "a", "x", 10.0), connection("e2", "b", "x", 10.0)];
		let highlight = resolve(None, Some("e1"), &connections);
		let draws = render_edges(&connections, &positions(), highlight.as_ref(), &EdgeStyleConfig::default());
		assert_eq!(draws[0].stroke_width, 3.0);
		assert_eq!(draws[0].emphasis, Emphasis::Active);
		assert_eq!(draws[1].stroke_width, 1.5);
		assert_eq!(draws[1].emphasis, Emphasis::Dimmed);
	}
}
