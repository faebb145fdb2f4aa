//! Side panel listing the connections of the selected node.

use leptos::prelude::*;

use super::edges::{EdgeStyle, EdgeStyleConfig};
use super::types::{Connection, NodeKey, NodeVariant};

/// One typed row of the detail table.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionRow {
	/// Connection id.
	pub connection_id: String,
	/// The node on the other side of the connection.
	pub counterpart: NodeKey,
	/// Session length.
	pub duration_minutes: f64,
	/// Bytes sent by the user.
	pub sent_bytes: u64,
	/// Bytes received by the user.
	pub received_bytes: u64,
	/// Session start as supplied.
	pub timestamp: String,
	/// Duration bucket, for the row colour.
	pub style: EdgeStyle,
}

/// Connections touching `selected`, newest first.
pub fn connection_rows(
	selected: &NodeKey,
	connections: &[Connection],
	config: &EdgeStyleConfig,
) -> Vec<ConnectionRow> {
	let mut rows: Vec<ConnectionRow> = connections
		.iter()
		.filter(|c| c.touches(selected))
		.map(|c| ConnectionRow {
			connection_id: c.id.clone(),
			counterpart: match selected.variant {
				NodeVariant::Source => c.target_key(),
				NodeVariant::Target => c.source_key(),
			},
			duration_minutes: c.duration_minutes,
			sent_bytes: c.sent_bytes,
			received_bytes: c.received_bytes,
			timestamp: c.timestamp.clone(),
			style: config.bucket(c.duration_minutes),
		})
		.collect();
	// RFC 3339 strings in one offset sort chronologically.
	rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
	rows
}

/// Binary units, one decimal above 1 KiB.
pub fn format_bytes(bytes: u64) -> String {
	const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
	if bytes < 1024 {
		return format!("{bytes} B");
	}
	let mut value = bytes as f64;
	let mut unit = 0;
	while value >= 1024.0 && unit < UNITS.len() - 1 {
		value /= 1024.0;
		unit += 1;
	}
	format!("{value:.1} {}", UNITS[unit])
}

/// Minutes as `2h 5m`. Invalid input renders as `-`.
pub fn format_duration(minutes: f64) -> String {
	if !minutes.is_finite() || minutes < 0.0 {
		return "-".to_string();
	}
	let total = minutes.round() as u64;
	match (total / 60, total % 60) {
		(0, m) => format!("{m}m"),
		(h, 0) => format!("{h}h"),
		(h, m) => format!("{h}h {m}m"),
	}
}

/// Detail table for the selected node. Clicking a row reports its
/// connection id through `on_row_selected`.
#[component]
pub fn ConnectionDetails(
	/// Node whose sessions are listed; `None` shows a hint.
	#[prop(into)]
	selected: Signal<Option<NodeKey>>,
	/// Every session of the view.
	#[prop(into)]
	connections: Signal<Vec<Connection>>,
	/// Connection id of the row to mark.
	#[prop(into)]
	highlighted: Signal<Option<String>>,
	/// Fired with the connection id of a clicked row.
	#[prop(optional)]
	on_row_selected: Option<Callback<String>>,
	/// Bucket thresholds for row colours.
	#[prop(optional)]
	edge_config: EdgeStyleConfig,
) -> impl IntoView {
	let rows = Memo::new(move |_| {
		selected
			.get()
			.map(|key| connection_rows(&key, &connections.get(), &edge_config))
			.unwrap_or_default()
	});

	view! {
		<aside class="ras-details">
			{move || match selected.get() {
				None => view! { <p class="ras-details-empty">"Select a user or CBS node."</p> }.into_any(),
				Some(key) => {
					let heading = match key.variant {
						NodeVariant::Source => "User",
						NodeVariant::Target => "CBS",
					};
					view! {
						<h2>{format!("{heading} {}", key.id)}</h2>
						<table class="ras-details-table">
							<thead>
								<tr>
									<th>{match key.variant {
										NodeVariant::Source => "CBS",
										NodeVariant::Target => "User",
									}}</th>
									<th>"Duration"</th>
									<th>"Sent"</th>
									<th>"Received"</th>
									<th>"Started"</th>
								</tr>
							</thead>
							<tbody>
								<For
									each=move || rows.get()
									key=|row| row.connection_id.clone()
									children=move |row| {
										let id = row.connection_id.clone();
										let active_id = id.clone();
										let style = row.style.class();
										let class = move || {
											let active = highlighted.get().as_deref() == Some(active_id.as_str());
											format!("ras-row {style}{}", if active { " active" } else { "" })
										};
										view! {
											<tr
												class=class
												on:click=move |_| {
													if let Some(cb) = on_row_selected {
														cb.run(id.clone());
													}
												}
											>
												<td>{row.counterpart.id.clone()}</td>
												<td>{format_duration(row.duration_minutes)}</td>
												<td>{format_bytes(row.sent_bytes)}</td>
												<td>{format_bytes(row.received_bytes)}</td>
												<td>{row.timestamp.clone()}</td>
											</tr>
										}
									}
								/>
							</tbody>
						</table>
					}
						.into_any()
				}
			}}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn connection(id: &str, user: &str, cbs: &str, minutes: f64, ts: &str) -> Connection {
		Connection {
			id: id.to_string(),
			user_id: user.to_string(),
			cbs_id: cbs.to_string(),
			duration_minutes: minutes,
			sent_bytes: 2048,
			received_bytes: 10,
			timestamp: ts.to_string(),
		}
	}

	#[test]
	fn rows_are_filtered_typed_and_newest_first() {
		let connections = vec![
			connection("c1", "alice", "ecdis", 30.0, "2026-03-01T08:00:00Z"),
			connection("c2", "bob", "ecdis", 200.0, "2026-03-02T08:00:00Z"),
			connection("c3", "alice", "radar", 90.0, "2026-03-03T08:00:00Z"),
		];
		let rows = connection_rows(&NodeKey::target("ecdis"), &connections, &EdgeStyleConfig::default());
		let ids: Vec<&str> = rows.iter().map(|r| r.connection_id.as_str()).collect();
		assert_eq!(ids, vec!["c2", "c1"]);
		assert_eq!(rows[0].counterpart, NodeKey::source("bob"));
		assert_eq!(rows[0].style, EdgeStyle::Hot);
		assert_eq!(rows[1].style, EdgeStyle::Cool);

		let rows = connection_rows(&NodeKey::source("alice"), &connections, &EdgeStyleConfig::default());
		assert_eq!(rows[0].counterpart, NodeKey::target("radar"));
		assert_eq!(rows[0].style, EdgeStyle::Warm);
	}

	#[test]
	fn bytes_use_binary_units() {
		assert_eq!(format_bytes(0), "0 B");
		assert_eq!(format_bytes(1023), "1023 B");
		assert_eq!(format_bytes(1536), "1.5 KiB");
		assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
	}

	#[test]
	fn durations_read_as_hours_and_minutes() {
		assert_eq!(format_duration(45.0), "45m");
		assert_eq!(format_duration(120.0), "2h");
		assert_eq!(format_duration(135.4), "2h 15m");
		assert_eq!(format_duration(f64::NAN), "-");
	}
}
