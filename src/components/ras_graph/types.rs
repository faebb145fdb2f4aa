//! Graph data structures: input records supplied by the host view and the
//! derived node model the graph draws.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::Deserialize;

use super::error::InputError;

/// Which column of the bipartite graph a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeVariant {
	/// Left column: users opening remote-access sessions.
	Source,
	/// Right column: CBS hosts the sessions land on.
	Target,
}

impl NodeVariant {
	/// Prefix used in qualified ids.
	pub fn prefix(self) -> &'static str {
		match self {
			NodeVariant::Source => "user",
			NodeVariant::Target => "cbs",
		}
	}
}

/// Variant-qualified node id. Source and target ids live in separate
/// namespaces, so `user:a` and `cbs:a` are different nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
	/// Column.
	pub variant: NodeVariant,
	/// Id as supplied by the host, unique within its column.
	pub id: String,
}

impl NodeKey {
	/// Key of a user node.
	pub fn source(id: impl Into<String>) -> Self {
		Self {
			variant: NodeVariant::Source,
			id: id.into(),
		}
	}

	/// Key of a CBS node.
	pub fn target(id: impl Into<String>) -> Self {
		Self {
			variant: NodeVariant::Target,
			id: id.into(),
		}
	}

	/// Whether the node sits in the CBS column.
	pub fn is_target(&self) -> bool {
		self.variant == NodeVariant::Target
	}
}

impl fmt::Display for NodeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.variant.prefix(), self.id)
	}
}

impl FromStr for NodeKey {
	type Err = InputError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.split_once(':') {
			Some(("user", id)) if !id.is_empty() => Ok(NodeKey::source(id)),
			Some(("cbs", id)) if !id.is_empty() => Ok(NodeKey::target(id)),
			_ => Err(InputError::MalformedKey(s.to_string())),
		}
	}
}

/// A point in world or screen space, depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downward.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Both coordinates are finite.
	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

/// Measured size of the drawing surface, in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Size {
	/// Size of `width` by `height` pixels.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Midpoint of the surface.
	pub fn center(self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

/// A remote-access session between a user and a CBS host. Immutable once
/// supplied; the graph never creates or deletes connections.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
	/// Session id, unique across the input.
	pub id: String,
	/// User id (source column).
	pub user_id: String,
	/// CBS id (target column).
	pub cbs_id: String,
	/// Session length; drives the edge style bucket.
	pub duration_minutes: f64,
	/// Bytes sent from the user to the host.
	#[serde(default)]
	pub sent_bytes: u64,
	/// Bytes sent back from the host.
	#[serde(default)]
	pub received_bytes: u64,
	/// RFC 3339 start time as reported by the host.
	#[serde(default)]
	pub timestamp: String,
}

impl Connection {
	/// Key of the user endpoint.
	pub fn source_key(&self) -> NodeKey {
		NodeKey::source(self.user_id.as_str())
	}

	/// Key of the CBS endpoint.
	pub fn target_key(&self) -> NodeKey {
		NodeKey::target(self.cbs_id.as_str())
	}

	/// Whether this connection touches `key` on the matching side.
	pub fn touches(&self, key: &NodeKey) -> bool {
		match key.variant {
			NodeVariant::Source => self.user_id == key.id,
			NodeVariant::Target => self.cbs_id == key.id,
		}
	}
}

/// A CBS host record as listed by the host view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
	/// CBS id referenced by `Connection::cbs_id`.
	pub id: String,
	/// Display name; falls back to the id.
	#[serde(default)]
	pub name: Option<String>,
	/// Ship the host is installed on.
	#[serde(default)]
	pub ship: Option<String>,
}

impl TargetRecord {
	/// Record with only an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: None,
			ship: None,
		}
	}

	/// Name to draw, or the id when no name was given.
	pub fn label(&self) -> &str {
		self.name.as_deref().unwrap_or(&self.id)
	}
}

/// Everything the host view hands to the graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphInput {
	/// Sessions, one edge each.
	pub connections: Vec<Connection>,
	/// User ids, top to bottom.
	pub source_ids: Vec<String>,
	/// CBS hosts, top to bottom.
	pub target_records: Vec<TargetRecord>,
}

/// Border tier from connection count. Styling only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderWeight {
	/// At most one connection.
	Thin,
	/// Two to four connections.
	Medium,
	/// Five or more.
	Heavy,
}

impl BorderWeight {
	/// Tier for a node with `count` connections.
	pub fn from_count(count: usize) -> Self {
		match count {
			0..=1 => BorderWeight::Thin,
			2..=4 => BorderWeight::Medium,
			_ => BorderWeight::Heavy,
		}
	}

	/// Border width multiplier relative to the base line width.
	pub fn factor(self) -> f64 {
		match self {
			BorderWeight::Thin => 1.0,
			BorderWeight::Medium => 2.0,
			BorderWeight::Heavy => 3.0,
		}
	}
}

/// A node as drawn by the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Qualified id.
	pub key: NodeKey,
	/// Primary label: the user id or the CBS name.
	pub label: String,
	/// Derived, e.g. "3 connections".
	pub sub_label: String,
	/// Border tier derived from `connection_count`.
	pub border_weight: BorderWeight,
	/// Valid connections touching this node.
	pub connection_count: usize,
}

impl GraphNode {
	/// Node with sub-label and border tier derived from `connection_count`.
	pub fn new(key: NodeKey, label: String, connection_count: usize) -> Self {
		let sub_label = match connection_count {
			1 => "1 connection".to_string(),
			n => format!("{n} connections"),
		};
		Self {
			key,
			label,
			sub_label,
			border_weight: BorderWeight::from_count(connection_count),
			connection_count,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn qualified_ids_disambiguate_namespaces() {
		let user = NodeKey::source("a");
		let cbs = NodeKey::target("a");
		assert_ne!(user, cbs);
		assert_eq!(user.to_string(), "user:a");
		assert_eq!(cbs.to_string(), "cbs:a");
	}

	#[test]
	fn qualified_ids_parse_back() {
		assert_eq!("cbs:ecdis-1".parse::<NodeKey>().ok(), Some(NodeKey::target("ecdis-1")));
		assert_eq!("user:j:doe".parse::<NodeKey>().ok(), Some(NodeKey::source("j:doe")));
		assert!("host:x".parse::<NodeKey>().is_err());
		assert!("user:".parse::<NodeKey>().is_err());
	}

	#[test]
	fn border_weight_tiers() {
		assert_eq!(BorderWeight::from_count(0), BorderWeight::Thin);
		assert_eq!(BorderWeight::from_count(1), BorderWeight::Thin);
		assert_eq!(BorderWeight::from_count(4), BorderWeight::Medium);
		assert_eq!(BorderWeight::from_count(5), BorderWeight::Heavy);
	}

	#[test]
	fn sub_label_pluralises() {
		assert_eq!(GraphNode::new(NodeKey::source("a"), "a".into(), 1).sub_label, "1 connection");
		assert_eq!(GraphNode::new(NodeKey::source("a"), "a".into(), 0).sub_label, "0 connections");
	}

	#[test]
	fn input_parses_camel_case_json() {
		let json = r#"{
			"sourceIds": ["alice"],
			"targetRecords": [{ "id": "ecdis", "name": "ECDIS" }],
			"connections": [{ "id": "c1", "userId": "alice", "cbsId": "ecdis", "durationMinutes": 90 }]
		}"#;
		let input: GraphInput = serde_json::from_str(json).expect("valid input");
		assert_eq!(input.source_ids, vec!["alice".to_string()]);
		assert_eq!(input.target_records[0].label(), "ECDIS");
		assert_eq!(input.connections[0].duration_minutes, 90.0);
		assert_eq!(input.connections[0].sent_bytes, 0);
	}
}
