//! Pointer interaction state machine: idle, panning the background, or
//! dragging a node.
//!
//! ```text
//! Idle --down(background)--> Panning --move--> Panning
//! Idle --down(node)--------> Dragging --move--> Dragging
//! Panning | Dragging --up | leave | capture lost--> Idle
//! ```
//!
//! A press that travels less than `click_threshold` screen pixels before
//! release is a click: on a node it selects the node and leaves its position
//! untouched, on the background it clears the selection.

use serde::Deserialize;

use super::layout::NodePositions;
use super::types::{NodeKey, Point};
use super::viewport::Viewport;

/// Gesture tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionConfig {
	/// Screen pixels a press may travel and still count as a click.
	pub click_threshold: f64,
	/// `false` gives a fixed layout: nodes can be clicked but not moved.
	pub allow_node_drag: bool,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			click_threshold: 3.0,
			allow_node_drag: true,
		}
	}
}

/// Current gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
	/// No button down.
	#[default]
	Idle,
	/// Background press; moves pan the viewport.
	Panning {
		/// Last pointer position, screen space.
		last: Point,
		/// Screen position of the press.
		press: Point,
		/// Furthest distance from `press` so far.
		travel: f64,
		/// Node under the press when dragging is disabled; a click on it
		/// still selects.
		pressed_node: Option<NodeKey>,
	},
	/// Node press; moves reposition the node.
	Dragging {
		/// Node being dragged.
		node: NodeKey,
		/// Node position minus pointer world position at press time.
		grab_offset: Point,
		/// Screen position of the press.
		press: Point,
		/// Furthest distance from `press` so far.
		travel: f64,
	},
}

/// Outcome of a completed press.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
	/// Click on a node.
	NodeSelected(NodeKey),
	/// Click on empty space.
	BackgroundClicked,
}

/// Gesture state plus its config.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	state: InteractionState,
	config: InteractionConfig,
}

impl Interaction {
	/// Idle machine.
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			state: InteractionState::Idle,
			config,
		}
	}

	/// Current gesture.
	pub fn state(&self) -> &InteractionState {
		&self.state
	}

	/// No gesture in progress.
	pub fn is_idle(&self) -> bool {
		self.state == InteractionState::Idle
	}

	/// Node currently being dragged, if any.
	pub fn dragged_node(&self) -> Option<&NodeKey> {
		match &self.state {
			InteractionState::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	/// Start a press at screen point `screen`. `hit` is the node under the
	/// pointer; a node hit wins over panning. A press during an ongoing
	/// gesture is ignored.
	pub fn pointer_down(
		&mut self,
		screen: Point,
		hit: Option<NodeKey>,
		viewport: &Viewport,
		positions: &NodePositions,
	) {
		if !self.is_idle() {
			return;
		}
		let (draggable, pressed_node) = if self.config.allow_node_drag {
			(hit, None)
		} else {
			(None, hit)
		};
		let grabbed = draggable.and_then(|node| positions.get(&node).map(|&p| (node, p)));
		self.state = match grabbed {
			Some((node, position)) => InteractionState::Dragging {
				grab_offset: position - viewport.screen_to_world(screen),
				node,
				press: screen,
				travel: 0.0,
			},
			None => InteractionState::Panning {
				last: screen,
				press: screen,
				travel: 0.0,
				pressed_node,
			},
		};
	}

	/// Apply pointer movement. Pans the viewport or moves the dragged node;
	/// a drag only starts writing positions once the click threshold is
	/// crossed. Does nothing while idle.
	pub fn pointer_move(&mut self, screen: Point, viewport: &mut Viewport, positions: &mut NodePositions) {
		if !screen.is_finite() {
			return;
		}
		let threshold = self.config.click_threshold;
		match &mut self.state {
			InteractionState::Idle => {}
			InteractionState::Panning {
				last,
				press,
				travel,
				..
			} => {
				*travel = travel.max(screen.distance(*press));
				viewport.pan(screen.x - last.x, screen.y - last.y);
				*last = screen;
			}
			InteractionState::Dragging {
				node,
				grab_offset,
				press,
				travel,
			} => {
				*travel = travel.max(screen.distance(*press));
				if *travel < threshold {
					return;
				}
				let world = viewport.screen_to_world(screen) + *grab_offset;
				if let Some(slot) = positions.get_mut(&*node) {
					*slot = world;
				}
			}
		}
	}

	/// Release the pointer. Returns the click event when the press never
	/// crossed the click threshold.
	pub fn pointer_up(&mut self) -> Option<InteractionEvent> {
		let threshold = self.config.click_threshold;
		match std::mem::take(&mut self.state) {
			InteractionState::Idle => None,
			InteractionState::Dragging { node, travel, .. } => {
				(travel < threshold).then_some(InteractionEvent::NodeSelected(node))
			}
			InteractionState::Panning {
				travel,
				pressed_node,
				..
			} => (travel < threshold).then(|| match pressed_node {
				Some(node) => InteractionEvent::NodeSelected(node),
				None => InteractionEvent::BackgroundClicked,
			}),
		}
	}

	/// Pointer left the surface or capture was lost: abandon the gesture
	/// without emitting a click.
	pub fn cancel(&mut self) {
		self.state = InteractionState::Idle;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ras_graph::viewport::{ViewTransform, ViewportConfig};

	fn setup() -> (Interaction, Viewport, NodePositions) {
		let mut viewport = Viewport::new(ViewportConfig::default());
		viewport.set_viewport(ViewTransform { x: 100.0, y: 50.0, k: 2.0 });
		let mut positions = NodePositions::new();
		positions.insert(NodeKey::target("x"), Point::new(10.0, 10.0));
		(Interaction::new(InteractionConfig::default()), viewport, positions)
	}

	#[test]
	fn background_press_pans() {
		let (mut interaction, mut viewport, mut positions) = setup();
		interaction.pointer_down(Point::new(0.0, 0.0), None, &viewport, &positions);
		interaction.pointer_move(Point::new(15.0, -5.0), &mut viewport, &mut positions);
		interaction.pointer_move(Point::new(20.0, -5.0), &mut viewport, &mut positions);
		assert_eq!(viewport.transform().x, 120.0);
		assert_eq!(viewport.transform().y, 45.0);
		assert_eq!(interaction.pointer_up(), None);
		assert!(interaction.is_idle());
	}

	#[test]
	fn drag_keeps_grab_offset() {
		let (mut interaction, mut viewport, mut positions) = setup();
		let key = NodeKey::target("x");
		// Node at world (10,10) is at screen (120,70); grab it slightly off-centre.
		let press = Point::new(124.0, 66.0);
		let q = viewport.screen_to_world(press);
		interaction.pointer_down(press, Some(key.clone()), &viewport, &positions);
		assert_eq!(interaction.dragged_node(), Some(&key));

		let moved = Point::new(164.0, 106.0);
		let q2 = viewport.screen_to_world(moved);
		interaction.pointer_move(moved, &mut viewport, &mut positions);
		let expected = Point::new(10.0, 10.0) + (q2 - q);
		assert!(positions[&key].distance(expected) < 1e-9);
		assert_eq!(viewport.transform().x, 100.0, "drag must not pan");
		assert_eq!(interaction.pointer_up(), None);
	}

	#[test]
	fn short_press_on_node_selects_without_moving() {
		let (mut interaction, mut viewport, mut positions) = setup();
		let key = NodeKey::target("x");
		interaction.pointer_down(Point::new(120.0, 70.0), Some(key.clone()), &viewport, &positions);
		interaction.pointer_move(Point::new(121.0, 71.0), &mut viewport, &mut positions);
		assert_eq!(positions[&key], Point::new(10.0, 10.0));
		assert_eq!(interaction.pointer_up(), Some(InteractionEvent::NodeSelected(key)));
	}

	#[test]
	fn returning_to_press_point_is_still_a_drag() {
		let (mut interaction, mut viewport, mut positions) = setup();
		let key = NodeKey::target("x");
		interaction.pointer_down(Point::new(120.0, 70.0), Some(key.clone()), &viewport, &positions);
		interaction.pointer_move(Point::new(160.0, 70.0), &mut viewport, &mut positions);
		interaction.pointer_move(Point::new(120.0, 70.0), &mut viewport, &mut positions);
		assert_eq!(interaction.pointer_up(), None);
	}

	#[test]
	fn background_click_is_reported() {
		let (mut interaction, _, positions) = setup();
		let viewport = Viewport::new(ViewportConfig::default());
		interaction.pointer_down(Point::new(5.0, 5.0), None, &viewport, &positions);
		assert_eq!(interaction.pointer_up(), Some(InteractionEvent::BackgroundClicked));
	}

	#[test]
	fn cancel_returns_to_idle_without_click() {
		let (mut interaction, viewport, positions) = setup();
		interaction.pointer_down(Point::new(120.0, 70.0), Some(NodeKey::target("x")), &viewport, &positions);
		interaction.cancel();
		assert!(interaction.is_idle());
		assert_eq!(interaction.pointer_up(), None);
	}

	#[test]
	fn fixed_layout_pans_but_still_selects() {
		let (_, mut viewport, mut positions) = setup();
		let mut interaction = Interaction::new(InteractionConfig {
			allow_node_drag: false,
			..InteractionConfig::default()
		});
		let key = NodeKey::target("x");

		interaction.pointer_down(Point::new(120.0, 70.0), Some(key.clone()), &viewport, &positions);
		assert!(interaction.dragged_node().is_none());
		assert_eq!(interaction.pointer_up(), Some(InteractionEvent::NodeSelected(key.clone())));

		interaction.pointer_down(Point::new(120.0, 70.0), Some(key.clone()), &viewport, &positions);
		interaction.pointer_move(Point::new(150.0, 70.0), &mut viewport, &mut positions);
		assert_eq!(positions[&key], Point::new(10.0, 10.0));
		assert_eq!(viewport.transform().x, 130.0);
		assert_eq!(interaction.pointer_up(), None);
	}

	#[test]
	fn press_during_gesture_is_ignored() {
		let (mut interaction, viewport, positions) = setup();
		let key = NodeKey::target("x");
		interaction.pointer_down(Point::new(120.0, 70.0), Some(key.clone()), &viewport, &positions);
		interaction.pointer_down(Point::new(0.0, 0.0), None, &viewport, &positions);
		assert_eq!(interaction.dragged_node(), Some(&key));
	}

	#[test]
	fn move_while_idle_does_nothing() {
		let (mut interaction, mut viewport, mut positions) = setup();
		let before = viewport.transform();
		interaction.pointer_move(Point::new(500.0, 500.0), &mut viewport, &mut positions);
		assert_eq!(viewport.transform(), before);
	}
}
