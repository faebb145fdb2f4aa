//! Two-column layout for the bipartite user/CBS graph.
//!
//! Users go in the left column, CBS hosts in the right one. Positions are a
//! pure function of each id's index, so the same input always lands on the
//! same coordinates.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use super::types::{NodeKey, Point, TargetRecord};

/// World-space position of every node, keyed by qualified id.
pub type NodePositions = HashMap<NodeKey, Point>;

/// Column placement and spacing bounds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
	/// X of the source column.
	pub start_x: f64,
	/// Y of the first node in the taller column.
	pub start_y: f64,
	/// Horizontal distance between the two columns.
	pub level_separation: f64,
	/// Preferred lower bound on vertical node spacing.
	pub min_spacing: f64,
	/// Upper bound on vertical node spacing.
	pub max_spacing: f64,
	/// Vertical span the taller column should roughly fill.
	pub available_span: f64,
	/// Hard cap on the taller column's span. Wins over `min_spacing`, so a
	/// large fleet stays frameable at the minimum zoom.
	pub max_span: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			start_x: 0.0,
			start_y: 0.0,
			level_separation: 420.0,
			min_spacing: 48.0,
			max_spacing: 120.0,
			available_span: 720.0,
			max_span: 3000.0,
		}
	}
}

impl LayoutConfig {
	/// Adaptive vertical spacing: denser graphs compress toward
	/// `min_spacing`, sparse ones stretch up to `max_spacing`. Past the point
	/// where `min_spacing` would exceed `max_span`, spacing shrinks further.
	pub fn spacing_for(&self, count: usize) -> f64 {
		let raw = self.available_span / count.max(1) as f64;
		let spacing = raw.min(self.max_spacing).max(self.min_spacing);
		match count {
			0 | 1 => spacing,
			n => spacing.min(self.max_span / (n - 1) as f64),
		}
	}
}

/// Assign initial coordinates to every user and CBS node.
///
/// Both columns share one spacing, and the shorter column is centred against
/// the taller one.
pub fn compute_layout(
	source_ids: &[String],
	target_records: &[TargetRecord],
	config: &LayoutConfig,
) -> NodePositions {
	let (sources, targets) = (source_ids.len(), target_records.len());
	let tallest = sources.max(targets);
	let spacing = config.spacing_for(tallest);
	let column_y = |count: usize, index: usize| {
		let offset = (tallest - count) as f64 * spacing / 2.0;
		config.start_y + offset + index as f64 * spacing
	};

	let mut positions = NodePositions::with_capacity(sources + targets);
	for (i, id) in source_ids.iter().enumerate() {
		positions.insert(
			NodeKey::source(id.as_str()),
			Point::new(config.start_x, column_y(sources, i)),
		);
	}
	let target_x = config.start_x + config.level_separation;
	for (i, record) in target_records.iter().enumerate() {
		positions.insert(
			NodeKey::target(record.id.as_str()),
			Point::new(target_x, column_y(targets, i)),
		);
	}
	debug!(
		"ras-graph: layout {} users, {} CBS, spacing {:.1}",
		sources, targets, spacing
	);
	positions
}

/// Recompute the layout for a changed node set, keeping the current position
/// of every node that survives the change. Nodes that left are dropped.
pub fn relayout(
	previous: &NodePositions,
	source_ids: &[String],
	target_records: &[TargetRecord],
	config: &LayoutConfig,
) -> NodePositions {
	let mut positions = compute_layout(source_ids, target_records, config);
	for (key, slot) in positions.iter_mut() {
		if let Some(&kept) = previous.get(key) {
			*slot = kept;
		}
	}
	positions
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	fn targets(list: &[&str]) -> Vec<TargetRecord> {
		list.iter().map(|s| TargetRecord::new(*s)).collect()
	}

	#[test]
	fn layout_is_deterministic() {
		let config = LayoutConfig::default();
		let a = compute_layout(&ids(&["a", "b"]), &targets(&["x", "y"]), &config);
		let b = compute_layout(&ids(&["a", "b"]), &targets(&["x", "y"]), &config);
		assert_eq!(a, b);
		assert_eq!(a.len(), 4);
	}

	#[test]
	fn columns_sit_at_start_and_separation() {
		let config = LayoutConfig::default();
		let positions = compute_layout(&ids(&["a"]), &targets(&["x"]), &config);
		assert_eq!(positions[&NodeKey::source("a")].x, config.start_x);
		assert_eq!(
			positions[&NodeKey::target("x")].x,
			config.start_x + config.level_separation
		);
	}

	#[test]
	fn spacing_is_clamped() {
		let config = LayoutConfig::default();
		assert_eq!(config.spacing_for(0), config.max_spacing);
		assert_eq!(config.spacing_for(2), config.max_spacing);
		assert_eq!(config.spacing_for(10), 72.0);
		assert_eq!(config.spacing_for(50), config.min_spacing);
	}

	#[test]
	fn large_columns_never_exceed_max_span() {
		let config = LayoutConfig::default();
		for count in [63, 100, 250, 1000] {
			let sources: Vec<String> = (0..count).map(|i| format!("u{i}")).collect();
			let positions = compute_layout(&sources, &targets(&["x"]), &config);
			let (lo, hi) = positions
				.values()
				.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
			assert!(hi - lo <= config.max_span + 1e-9, "{count} nodes span {}", hi - lo);
		}
		assert!((config.spacing_for(101) - 30.0).abs() < 1e-12);
	}

	#[test]
	fn shorter_column_is_centred() {
		let config = LayoutConfig::default();
		let positions = compute_layout(&ids(&["a", "b", "c"]), &targets(&["x"]), &config);
		let spacing = config.spacing_for(3);
		assert_eq!(positions[&NodeKey::source("b")].y, spacing);
		assert_eq!(positions[&NodeKey::target("x")].y, spacing);
	}

	#[test]
	fn same_id_in_both_columns_gets_two_nodes() {
		let positions = compute_layout(&ids(&["a"]), &targets(&["a"]), &LayoutConfig::default());
		assert_eq!(positions.len(), 2);
	}

	#[test]
	fn relayout_keeps_surviving_positions() {
		let config = LayoutConfig::default();
		let mut previous = compute_layout(&ids(&["a", "b"]), &targets(&["x"]), &config);
		previous.insert(NodeKey::source("a"), Point::new(-50.0, 999.0));

		let next = relayout(&previous, &ids(&["a", "c"]), &targets(&["x"]), &config);
		assert_eq!(next[&NodeKey::source("a")], Point::new(-50.0, 999.0));
		assert!(next.contains_key(&NodeKey::source("c")));
		assert!(!next.contains_key(&NodeKey::source("b")));
	}
}
