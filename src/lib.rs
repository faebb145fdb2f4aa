//! Fleet cyber-posture dashboard: remote-access-session (RAS) connection
//! graph between crew/vendor users and onboard CBS hosts.
//!
//! Leptos client-side app wiring, host data loading and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Modules
pub mod components;
mod pages;

// Top-Level pages
use crate::components::ras_graph::{GraphConfig, GraphInput};
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ras-graph: logging initialized");
}

fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Parse host-supplied graph JSON (`{ sourceIds, targetRecords, connections }`).
pub fn parse_graph_data(json_text: &str) -> Option<GraphInput> {
	match serde_json::from_str::<GraphInput>(json_text) {
		Ok(data) => {
			info!(
				"ras-graph: loaded {} users, {} CBS, {} connections",
				data.source_ids.len(),
				data.target_records.len(),
				data.connections.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("ras-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
pub fn load_graph_data() -> Option<GraphInput> {
	parse_graph_data(&script_text("graph-data")?)
}

/// Load config overrides from a script element with id="graph-config",
/// falling back to defaults.
pub fn load_graph_config() -> GraphConfig {
	let Some(text) = script_text("graph-config") else {
		return GraphConfig::default();
	};
	GraphConfig::from_json(&text).unwrap_or_else(|e| {
		warn!("ras-graph: ignoring malformed graph config: {}", e);
		GraphConfig::default()
	})
}

/// An app router which renders the RAS view and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Fleet RAS Connections" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn graph_data_parses() {
		let data = parse_graph_data(r#"{ "sourceIds": ["a"], "targetRecords": [{ "id": "x" }], "connections": [] }"#)
			.expect("valid data");
		assert_eq!(data.source_ids, vec!["a".to_string()]);
	}

	#[test]
	fn malformed_graph_data_is_rejected() {
		assert!(parse_graph_data("{ \"sourceIds\": 4 }").is_none());
	}
}
