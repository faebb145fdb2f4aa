//! Turns host input into a consistent node/edge set: duplicate nodes and
//! dangling connections are dropped with a warning, never fatally.

use std::collections::{HashMap, HashSet};

use log::warn;

use super::error::InputError;
use super::types::{Connection, GraphInput, GraphNode, NodeKey, TargetRecord};

/// Validated graph contents, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	/// User ids after de-duplication.
	pub source_ids: Vec<String>,
	/// CBS records after de-duplication.
	pub target_records: Vec<TargetRecord>,
	/// Users first, then CBS hosts.
	pub nodes: Vec<GraphNode>,
	/// Only connections whose endpoints both exist.
	pub connections: Vec<Connection>,
}

/// Check that both endpoints of `connection` are known nodes.
pub fn validate_connection(
	connection: &Connection,
	sources: &HashSet<&str>,
	targets: &HashSet<&str>,
) -> Result<(), InputError> {
	if !sources.contains(connection.user_id.as_str()) {
		return Err(InputError::UnknownSource {
			connection: connection.id.clone(),
			id: connection.user_id.clone(),
		});
	}
	if !targets.contains(connection.cbs_id.as_str()) {
		return Err(InputError::UnknownTarget {
			connection: connection.id.clone(),
			id: connection.cbs_id.clone(),
		});
	}
	Ok(())
}

impl GraphModel {
	/// Build the model and collect every problem found on the way.
	pub fn build(input: &GraphInput) -> (Self, Vec<InputError>) {
		let mut errors = Vec::new();

		let mut seen = HashSet::new();
		let mut source_ids = Vec::with_capacity(input.source_ids.len());
		for id in &input.source_ids {
			if seen.insert(id.as_str()) {
				source_ids.push(id.clone());
			} else {
				errors.push(InputError::DuplicateNode(NodeKey::source(id.as_str()).to_string()));
			}
		}

		let mut seen = HashSet::new();
		let mut target_records = Vec::with_capacity(input.target_records.len());
		for record in &input.target_records {
			if seen.insert(record.id.as_str()) {
				target_records.push(record.clone());
			} else {
				errors.push(InputError::DuplicateNode(NodeKey::target(record.id.as_str()).to_string()));
			}
		}

		let sources: HashSet<&str> = source_ids.iter().map(String::as_str).collect();
		let targets: HashSet<&str> = target_records.iter().map(|r| r.id.as_str()).collect();
		let mut connections = Vec::with_capacity(input.connections.len());
		for connection in &input.connections {
			match validate_connection(connection, &sources, &targets) {
				Ok(()) => connections.push(connection.clone()),
				Err(e) => errors.push(e),
			}
		}

		let mut counts: HashMap<NodeKey, usize> = HashMap::new();
		for connection in &connections {
			*counts.entry(connection.source_key()).or_insert(0) += 1;
			*counts.entry(connection.target_key()).or_insert(0) += 1;
		}
		let count = |key: &NodeKey| counts.get(key).copied().unwrap_or(0);

		let nodes = source_ids
			.iter()
			.map(|id| {
				let key = NodeKey::source(id.as_str());
				let n = count(&key);
				GraphNode::new(key, id.clone(), n)
			})
			.chain(target_records.iter().map(|record| {
				let key = NodeKey::target(record.id.as_str());
				let n = count(&key);
				GraphNode::new(key, record.label().to_string(), n)
			}))
			.collect();

		let model = Self {
			source_ids,
			target_records,
			nodes,
			connections,
		};
		(model, errors)
	}

	/// Build the model, logging and discarding input problems.
	pub fn from_input(input: &GraphInput) -> Self {
		let (model, errors) = Self::build(input);
		for e in &errors {
			warn!("ras-graph: dropped input: {}", e);
		}
		model
	}

	/// Node keys in layout order; used to detect membership changes.
	pub fn node_keys(&self) -> Vec<NodeKey> {
		self.nodes.iter().map(|n| n.key.clone()).collect()
	}

	/// Node with qualified id `key`.
	pub fn node(&self, key: &NodeKey) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| &n.key == key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ras_graph::types::BorderWeight;

	fn connection(id: &str, user: &str, cbs: &str) -> Connection {
		Connection {
			id: id.to_string(),
			user_id: user.to_string(),
			cbs_id: cbs.to_string(),
			duration_minutes: 45.0,
			sent_bytes: 0,
			received_bytes: 0,
			timestamp: String::new(),
		}
	}

	fn input() -> GraphInput {
		GraphInput {
			source_ids: vec!["alice".into(), "bob".into(), "alice".into()],
			target_records: vec![TargetRecord {
				id: "ecdis".into(),
				name: Some("ECDIS bridge".into()),
				ship: None,
			}],
			connections: vec![
				connection("c1", "alice", "ecdis"),
				connection("c2", "alice", "ecdis"),
				connection("c3", "mallory", "ecdis"),
				connection("c4", "bob", "radar"),
			],
		}
	}

	#[test]
	fn dangling_connections_are_reported_and_dropped() {
		let (model, errors) = GraphModel::build(&input());
		let ids: Vec<&str> = model.connections.iter().map(|c| c.id.as_str()).collect();
		assert_eq!(ids, vec!["c1", "c2"]);
		assert!(errors.contains(&InputError::UnknownSource {
			connection: "c3".into(),
			id: "mallory".into(),
		}));
		assert!(errors.contains(&InputError::UnknownTarget {
			connection: "c4".into(),
			id: "radar".into(),
		}));
	}

	#[test]
	fn duplicate_nodes_keep_first() {
		let (model, errors) = GraphModel::build(&input());
		assert_eq!(model.source_ids, vec!["alice".to_string(), "bob".to_string()]);
		assert!(errors.contains(&InputError::DuplicateNode("user:alice".into())));
	}

	#[test]
	fn nodes_carry_counts_and_labels() {
		let model = GraphModel::from_input(&input());
		let alice = model.node(&NodeKey::source("alice")).expect("alice");
		assert_eq!(alice.connection_count, 2);
		assert_eq!(alice.border_weight, BorderWeight::Medium);
		let bob = model.node(&NodeKey::source("bob")).expect("bob");
		assert_eq!(bob.sub_label, "0 connections");
		let ecdis = model.node(&NodeKey::target("ecdis")).expect("ecdis");
		assert_eq!(ecdis.label, "ECDIS bridge");
		assert_eq!(model.nodes.len(), 3);
	}

	#[test]
	fn error_messages_name_the_problem() {
		let e = InputError::UnknownTarget {
			connection: "c4".into(),
			id: "radar".into(),
		};
		assert_eq!(e.to_string(), "connection c4 references unknown CBS radar");
	}
}
