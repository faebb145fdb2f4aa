//! Hover/selection highlighting.
//!
//! The active set is derived fresh for every frame from the hovered node,
//! the host's external highlight and the connection list. Dimming is
//! binary: anything outside the active set is drawn at [`DIMMED_ALPHA`].

use std::collections::HashSet;

use super::types::{Connection, NodeKey, NodeVariant};

/// Opacity of nodes and edges outside the active set.
pub const DIMMED_ALPHA: f64 = 0.2;

/// Nodes and edges that stay at full opacity while a highlight is active.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightSet {
	/// Node keys.
	pub nodes: HashSet<NodeKey>,
	/// Connection ids.
	pub edges: HashSet<String>,
}

impl HighlightSet {
	/// Whether `key` is active.
	pub fn contains_node(&self, key: &NodeKey) -> bool {
		self.nodes.contains(key)
	}

	/// Whether connection `id` is active.
	pub fn contains_edge(&self, id: &str) -> bool {
		self.edges.contains(id)
	}
}

/// How an element is drawn relative to the current highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// No highlight active.
	Normal,
	/// Inside the active set.
	Active,
	/// Outside the active set.
	Dimmed,
}

impl Emphasis {
	/// Draw opacity.
	pub fn alpha(self) -> f64 {
		match self {
			Emphasis::Dimmed => DIMMED_ALPHA,
			Emphasis::Normal | Emphasis::Active => 1.0,
		}
	}
}

/// Emphasis of node `key` under `highlight`.
pub fn node_emphasis(highlight: Option<&HighlightSet>, key: &NodeKey) -> Emphasis {
	match highlight {
		None => Emphasis::Normal,
		Some(set) if set.contains_node(key) => Emphasis::Active,
		Some(_) => Emphasis::Dimmed,
	}
}

/// Emphasis of connection `id` under `highlight`.
pub fn edge_emphasis(highlight: Option<&HighlightSet>, id: &str) -> Emphasis {
	match highlight {
		None => Emphasis::Normal,
		Some(set) if set.contains_edge(id) => Emphasis::Active,
		Some(_) => Emphasis::Dimmed,
	}
}

/// Resolve the active set.
///
/// Hover wins over the external highlight. Hovering a CBS activates it and
/// every user connected to it; hovering a user activates it and every CBS it
/// reached. An external highlight names a connection id and activates both
/// its endpoints. `None` means nothing is dimmed.
pub fn resolve(
	hovered: Option<&NodeKey>,
	external_highlight: Option<&str>,
	connections: &[Connection],
) -> Option<HighlightSet> {
	if let Some(key) = hovered {
		let mut set = HighlightSet::default();
		set.nodes.insert(key.clone());
		for connection in connections.iter().filter(|c| c.touches(key)) {
			let other = match key.variant {
				NodeVariant::Target => connection.source_key(),
				NodeVariant::Source => connection.target_key(),
			};
			set.nodes.insert(other);
			set.edges.insert(connection.id.clone());
		}
		return Some(set);
	}

	let id = external_highlight?;
	let connection = connections.iter().find(|c| c.id == id)?;
	let mut set = HighlightSet::default();
	set.nodes.insert(connection.source_key());
	set.nodes.insert(connection.target_key());
	set.edges.insert(connection.id.clone());
	Some(set)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn connection(id: &str, user: &str, cbs: &str) -> Connection {
		Connection {
			id: id.to_string(),
			user_id: user.to_string(),
			cbs_id: cbs.to_string(),
			duration_minutes: 30.0,
			sent_bytes: 0,
			received_bytes: 0,
			timestamp: String::new(),
		}
	}

	fn edges() -> Vec<Connection> {
		vec![
			connection("e1", "s1", "T"),
			connection("e2", "s2", "T"),
			connection("e3", "s3", "U"),
		]
	}

	#[test]
	fn hovered_target_activates_its_users() {
		let set = resolve(Some(&NodeKey::target("T")), None, &edges()).expect("highlight");
		let expected: HashSet<NodeKey> = [
			NodeKey::target("T"),
			NodeKey::source("s1"),
			NodeKey::source("s2"),
		]
		.into_iter()
		.collect();
		assert_eq!(set.nodes, expected);
		assert!(set.contains_edge("e1") && set.contains_edge("e2"));
		assert!(!set.contains_edge("e3"));
	}

	#[test]
	fn hovered_source_activates_its_hosts() {
		let mut list = edges();
		list.push(connection("e4", "s1", "U"));
		let set = resolve(Some(&NodeKey::source("s1")), None, &list).expect("highlight");
		assert_eq!(set.nodes.len(), 3);
		assert!(set.contains_node(&NodeKey::target("U")));
		assert!(!set.contains_node(&NodeKey::source("s3")));
	}

	#[test]
	fn hovered_node_without_edges_stands_alone() {
		let set = resolve(Some(&NodeKey::target("lonely")), None, &edges()).expect("highlight");
		assert_eq!(set.nodes.len(), 1);
		assert!(set.edges.is_empty());
	}

	#[test]
	fn external_highlight_resolves_connection_endpoints() {
		let set = resolve(None, Some("e3"), &edges()).expect("highlight");
		assert_eq!(set.nodes.len(), 2);
		assert!(set.contains_node(&NodeKey::source("s3")));
		assert!(set.contains_node(&NodeKey::target("U")));
	}

	#[test]
	fn hover_wins_over_external_highlight() {
		let set = resolve(Some(&NodeKey::target("T")), Some("e3"), &edges()).expect("highlight");
		assert!(!set.contains_node(&NodeKey::target("U")));
	}

	#[test]
	fn nothing_selected_means_no_dimming() {
		assert_eq!(resolve(None, None, &edges()), None);
		assert_eq!(resolve(None, Some("missing"), &edges()), None);
		assert_eq!(node_emphasis(None, &NodeKey::source("s1")), Emphasis::Normal);
	}

	#[test]
	fn dimming_is_binary() {
		let set = resolve(None, Some("e1"), &edges());
		assert_eq!(node_emphasis(set.as_ref(), &NodeKey::source("s1")).alpha(), 1.0);
		assert_eq!(node_emphasis(set.as_ref(), &NodeKey::source("s2")).alpha(), DIMMED_ALPHA);
		assert_eq!(edge_emphasis(set.as_ref(), "e2"), Emphasis::Dimmed);
	}
}
