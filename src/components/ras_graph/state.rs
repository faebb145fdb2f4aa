//! Graph view state: validated model, node positions, viewport, pointer
//! interaction and hover/selection.
//!
//! Created once when the component mounts, then mutated synchronously by
//! pointer and wheel handlers. Nothing here touches the DOM, so every
//! behaviour can be driven from tests.

use log::debug;

use super::config::GraphConfig;
use super::edges::{EdgeDraw, render_edges};
use super::highlight::{HighlightSet, resolve};
use super::interaction::{Interaction, InteractionEvent};
use super::layout::{NodePositions, compute_layout, relayout};
use super::model::GraphModel;
use super::types::{GraphInput, GraphNode, NodeKey, Point, Size};
use super::viewport::Viewport;

/// Handle for one deferred fit request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitTicket(u64);

/// Bookkeeping for the fit that runs one frame after a layout change.
///
/// Only the most recent ticket may fire; `cancel` invalidates all of them.
#[derive(Clone, Debug, Default)]
pub struct PendingFit {
	generation: u64,
	pending: bool,
}

impl PendingFit {
	/// Issue a ticket that supersedes every earlier one.
	pub fn schedule(&mut self) -> FitTicket {
		self.generation += 1;
		self.pending = true;
		FitTicket(self.generation)
	}

	/// Consume `ticket`. True only for the latest, not yet consumed ticket.
	pub fn claim(&mut self, ticket: FitTicket) -> bool {
		if self.pending && ticket.0 == self.generation {
			self.pending = false;
			true
		} else {
			false
		}
	}

	/// Invalidate all outstanding tickets.
	pub fn cancel(&mut self) {
		self.generation += 1;
		self.pending = false;
	}

	/// A ticket is outstanding.
	pub fn is_pending(&self) -> bool {
		self.pending
	}
}

/// Everything one mounted graph view knows.
pub struct RasGraphState {
	/// Config the view was created with.
	pub config: GraphConfig,
	model: GraphModel,
	positions: NodePositions,
	/// Pan and zoom.
	pub viewport: Viewport,
	interaction: Interaction,
	active_pointer: Option<i32>,
	hovered: Option<NodeKey>,
	selected: Option<NodeKey>,
	/// Connection id the host asked to emphasise.
	pub external_highlight: Option<String>,
	size: Size,
	pending_fit: PendingFit,
}

impl RasGraphState {
	/// Validate `input`, lay it out and fit it to `size`.
	pub fn new(input: &GraphInput, size: Size, config: GraphConfig) -> Self {
		let model = GraphModel::from_input(input);
		let positions = compute_layout(&model.source_ids, &model.target_records, &config.layout);
		let mut viewport = Viewport::new(config.viewport.clone());
		viewport.fit(&positions, size);
		Self {
			interaction: Interaction::new(config.interaction.clone()),
			active_pointer: None,
			config,
			model,
			positions,
			viewport,
			hovered: None,
			selected: None,
			external_highlight: None,
			size,
			pending_fit: PendingFit::default(),
		}
	}

	/// Valid nodes in draw order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.model.nodes
	}

	/// Validated input.
	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	/// World position of every node.
	pub fn positions(&self) -> &NodePositions {
		&self.positions
	}

	/// Last measured surface size.
	pub fn size(&self) -> Size {
		self.size
	}

	/// Node under an idle pointer.
	pub fn hovered(&self) -> Option<&NodeKey> {
		self.hovered.as_ref()
	}

	/// Node picked by the last click.
	pub fn selected(&self) -> Option<&NodeKey> {
		self.selected.as_ref()
	}

	/// Gesture state machine.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Replace the host input. The layout is recomputed only when node
	/// membership changed, keeping positions of surviving nodes. Returns
	/// whether it was, so the caller can schedule a fit.
	pub fn set_input(&mut self, input: &GraphInput) -> bool {
		let model = GraphModel::from_input(input);
		let membership_changed = model.node_keys() != self.model.node_keys();
		if membership_changed {
			self.positions = relayout(
				&self.positions,
				&model.source_ids,
				&model.target_records,
				&self.config.layout,
			);
			debug!("ras-graph: node set changed, {} nodes", model.nodes.len());
		}
		self.model = model;

		let known = |key: &Option<NodeKey>| key.as_ref().is_some_and(|k| self.positions.contains_key(k));
		if !known(&self.hovered) {
			self.hovered = None;
		}
		if !known(&self.selected) {
			self.selected = None;
		}
		if let Some(node) = self.interaction.dragged_node() {
			if !self.positions.contains_key(node) {
				self.interaction.cancel();
				self.active_pointer = None;
			}
		}
		membership_changed
	}

	/// Record a new surface size. The view is not refitted.
	pub fn resize(&mut self, size: Size) {
		self.size = size;
	}

	/// Topmost node under screen point `screen`, nearest centre first.
	pub fn node_at_position(&self, screen: Point) -> Option<NodeKey> {
		let world = self.viewport.screen_to_world(screen);
		let scale = &self.config.scale;
		self.model
			.nodes
			.iter()
			.filter_map(|node| {
				let p = self.positions.get(&node.key)?;
				let d = p.distance(world);
				(d <= scale.radius(node.key.variant) + scale.hit_padding).then_some((d, &node.key))
			})
			.min_by(|a, b| a.0.total_cmp(&b.0))
			.map(|(_, key)| key.clone())
	}

	/// Override the hovered node.
	pub fn set_hover(&mut self, node: Option<NodeKey>) {
		self.hovered = node;
	}

	/// Set or clear the host-driven highlight.
	pub fn set_external_highlight(&mut self, id: Option<String>) {
		self.external_highlight = id;
	}

	/// Start a gesture for `pointer`. Ignored while another pointer owns a
	/// gesture; returns whether this pointer now owns it.
	pub fn pointer_down(&mut self, pointer: i32, screen: Point) -> bool {
		if self.active_pointer.is_some() || !self.interaction.is_idle() {
			return false;
		}
		let hit = self.node_at_position(screen);
		self.interaction.pointer_down(screen, hit, &self.viewport, &self.positions);
		self.active_pointer = Some(pointer);
		true
	}

	/// Pan, drag, or (while idle) update the hovered node. Moves from a
	/// pointer that does not own the gesture are ignored.
	pub fn pointer_move(&mut self, pointer: i32, screen: Point) {
		match self.active_pointer {
			None => self.hovered = self.node_at_position(screen),
			Some(owner) if owner == pointer => {
				self.interaction.pointer_move(screen, &mut self.viewport, &mut self.positions);
			}
			Some(_) => {}
		}
	}

	/// Finish the gesture owned by `pointer`. A click on a node selects it;
	/// a click on the background clears the selection. Either is returned so
	/// the host can follow.
	pub fn pointer_up(&mut self, pointer: i32) -> Option<InteractionEvent> {
		if self.active_pointer != Some(pointer) {
			return None;
		}
		self.active_pointer = None;
		let event = self.interaction.pointer_up()?;
		self.selected = match &event {
			InteractionEvent::NodeSelected(key) => Some(key.clone()),
			InteractionEvent::BackgroundClicked => None,
		};
		Some(event)
	}

	/// The pointer left the surface. Abandons its gesture and clears hover.
	pub fn pointer_leave(&mut self, pointer: i32) {
		self.capture_lost(pointer);
		self.hovered = None;
	}

	/// Capture was lost or the pointer was cancelled. Abandons the gesture
	/// when `pointer` owns it.
	pub fn capture_lost(&mut self, pointer: i32) {
		if self.active_pointer == Some(pointer) {
			self.active_pointer = None;
			self.interaction.cancel();
		}
	}

	/// Pointer that currently owns a pan or drag.
	pub fn active_pointer(&self) -> Option<i32> {
		self.active_pointer
	}

	/// One wheel event anchored at screen point `at`. Returns whether the zoom changed.
	pub fn wheel(&mut self, delta_y: f64, at: Point) -> bool {
		self.viewport.wheel(delta_y, at)
	}

	/// One wheel step around the viewport centre.
	pub fn zoom_step(&mut self, zoom_in: bool) -> bool {
		let step = self.config.viewport.wheel_step;
		let factor = if zoom_in { step } else { 1.0 / step };
		self.viewport.zoom_by(factor, Some(self.size.center()))
	}

	/// Frame every node in the current surface.
	pub fn fit_to_view(&mut self) {
		self.viewport.fit(&self.positions, self.size);
		debug!("ras-graph: fit to view {:?}", self.viewport.transform());
	}

	/// Request a fit to run later through [`RasGraphState::run_scheduled_fit`].
	pub fn schedule_fit(&mut self) -> FitTicket {
		self.pending_fit.schedule()
	}

	/// Run a deferred fit if `ticket` is still current. Stale tickets are
	/// no-ops.
	pub fn run_scheduled_fit(&mut self, ticket: FitTicket) -> bool {
		if !self.pending_fit.claim(ticket) {
			return false;
		}
		self.fit_to_view();
		true
	}

	/// Drop any requested fit.
	pub fn cancel_pending_fit(&mut self) {
		self.pending_fit.cancel();
	}

	/// Active set for this frame; hover wins over the external highlight.
	pub fn highlight(&self) -> Option<HighlightSet> {
		resolve(
			self.hovered.as_ref(),
			self.external_highlight.as_deref(),
			&self.model.connections,
		)
	}

	/// Draw instructions for every drawable connection.
	pub fn edge_draws(&self, highlight: Option<&HighlightSet>) -> Vec<EdgeDraw> {
		render_edges(&self.model.connections, &self.positions, highlight, &self.config.edges)
	}
}
