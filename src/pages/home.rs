use leptos::prelude::*;

use crate::components::ras_graph::{
	Connection, ConnectionDetails, GraphInput, NodeKey, RasGraphCanvas, TargetRecord,
};
use crate::{load_graph_config, load_graph_data};

const HOSTS: &[(&str, &str, &str)] = &[
	("ecdis", "ECDIS", "MV Nordlys"),
	("radar", "X-band radar", "MV Nordlys"),
	("ems", "Engine monitoring", "MV Skagen"),
	("bnwas", "BNWAS", "MV Skagen"),
	("vdr", "Voyage data recorder", "MV Hestia"),
];

/// Generate sample fleet data (deterministic, so reloads show the same graph).
pub fn sample_fleet(users: usize, hosts: usize, sessions: usize) -> GraphInput {
	let source_ids: Vec<String> = (0..users).map(|i| format!("user-{:02}", i + 1)).collect();
	let target_records: Vec<TargetRecord> = HOSTS
		.iter()
		.cycle()
		.take(hosts)
		.enumerate()
		.map(|(i, (id, name, ship))| TargetRecord {
			id: if i < HOSTS.len() {
				id.to_string()
			} else {
				format!("{id}-{i}")
			},
			name: Some(name.to_string()),
			ship: Some(ship.to_string()),
		})
		.collect();

	let connections = if users == 0 || hosts == 0 {
		Vec::new()
	} else {
		(0..sessions)
			.map(|i| {
				let user = &source_ids[(rand_simple(i) * users as f64) as usize % users];
				let host = &target_records[(rand_simple(i + 97) * hosts as f64) as usize % hosts];
				let minutes = (rand_simple(i + 31) * 240.0).round();
				Connection {
					id: format!("ras-{:04}", i + 1),
					user_id: user.clone(),
					cbs_id: host.id.clone(),
					duration_minutes: minutes,
					sent_bytes: (rand_simple(i + 7) * 50_000_000.0) as u64,
					received_bytes: (rand_simple(i + 13) * 5_000_000.0) as u64,
					timestamp: format!(
						"2026-03-{:02}T{:02}:{:02}:00Z",
						1 + i % 28,
						(i * 7) % 24,
						(i * 13) % 60
					),
				}
			})
			.collect()
	};

	GraphInput {
		connections,
		source_ids,
		target_records,
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Graph selection handlers: picking a node shows its sessions, a background
/// click empties the panel. Either drops the row highlight.
fn selection_callbacks(
	set_selected: WriteSignal<Option<NodeKey>>,
	set_highlighted: WriteSignal<Option<String>>,
) -> (Callback<NodeKey>, Callback<()>) {
	let on_node_selected = Callback::new(move |key: NodeKey| {
		set_selected.set(Some(key));
		set_highlighted.set(None);
	});
	let on_selection_cleared = Callback::new(move |()| {
		set_selected.set(None);
		set_highlighted.set(None);
	});
	(on_node_selected, on_selection_cleared)
}

/// RAS view: the connection graph plus the detail table of the selected node.
#[component]
pub fn Home() -> impl IntoView {
	let input = load_graph_data().unwrap_or_else(|| sample_fleet(10, 3, 15));
	let config = load_graph_config();
	let edge_config = config.edges.clone();

	let graph_data = Signal::derive(move || input.clone());
	let connections = Signal::derive(move || graph_data.get().connections);
	let (selected, set_selected) = signal(None::<NodeKey>);
	let (highlighted, set_highlighted) = signal(None::<String>);

	let (on_node_selected, on_selection_cleared) = selection_callbacks(set_selected, set_highlighted);
	// Clicking the highlighted row again clears it.
	let on_row_selected = Callback::new(move |id: String| {
		set_highlighted.update(|current| {
			*current = if current.as_deref() == Some(id.as_str()) {
				None
			} else {
				Some(id)
			};
		});
	});

	view! {
		<div class="ras-view">
			<div class="ras-graph-pane">
				<RasGraphCanvas
					data=graph_data
					external_highlight_id=highlighted
					on_node_selected=on_node_selected
					on_selection_cleared=on_selection_cleared
					config=config
				/>
				<div class="graph-overlay">
					<h1>"Remote access sessions"</h1>
					<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
				</div>
			</div>
			<ConnectionDetails
				selected=selected
				connections=connections
				highlighted=highlighted
				on_row_selected=on_row_selected
				edge_config=edge_config
			/>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ras_graph::model::GraphModel;

	#[test]
	fn sample_fleet_is_deterministic_and_consistent() {
		let a = sample_fleet(10, 3, 15);
		assert_eq!(a, sample_fleet(10, 3, 15));
		assert_eq!(a.source_ids.len(), 10);
		assert_eq!(a.target_records.len(), 3);
		let (model, errors) = GraphModel::build(&a);
		assert!(errors.is_empty());
		assert_eq!(model.connections.len(), 15);
	}

	#[test]
	fn background_click_empties_the_detail_panel() {
		let (selected, set_selected) = signal(None::<NodeKey>);
		let (highlighted, set_highlighted) = signal(None::<String>);
		let (on_node_selected, on_selection_cleared) = selection_callbacks(set_selected, set_highlighted);

		on_node_selected.run(NodeKey::target("ecdis"));
		assert_eq!(selected.get_untracked(), Some(NodeKey::target("ecdis")));
		set_highlighted.set(Some("ras-0001".into()));

		on_selection_cleared.run(());
		assert_eq!(selected.get_untracked(), None);
		assert_eq!(highlighted.get_untracked(), None);
	}

	#[test]
	fn sample_fleet_handles_empty_columns() {
		assert!(sample_fleet(0, 3, 15).connections.is_empty());
		let many = sample_fleet(2, 7, 4);
		assert_eq!(many.target_records.len(), 7);
		assert_eq!(many.target_records[5].id, "ecdis-5");
	}
}
