//! Interactive bipartite graph of remote-access sessions between users and
//! CBS hosts: two-column layout, pan/zoom/drag viewport, hover and selection
//! highlighting, and fit-to-view framing.
//!
//! Everything except `component`, `render`, `listener` and `detail`'s view is
//! plain Rust and can be exercised without a DOM.

mod component;
pub mod config;
pub mod detail;
pub mod edges;
pub mod error;
pub mod highlight;
pub mod interaction;
pub mod layout;
pub mod listener;
pub mod model;
mod render;
pub mod scale;
pub mod state;
pub mod types;
pub mod viewport;

pub use component::RasGraphCanvas;
pub use config::GraphConfig;
pub use detail::ConnectionDetails;
pub use types::{Connection, GraphInput, NodeKey, NodeVariant, TargetRecord};
