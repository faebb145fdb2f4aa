use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::edges::{EdgeDraw, EdgeStyle};
use super::highlight::{Emphasis, node_emphasis};
use super::scale::ScaledValues;
use super::state::RasGraphState;
use super::types::{GraphNode, NodeVariant};

const BACKGROUND: &str = "#101a2b";
const SOURCE_FILL: &str = "#4fc3f7";
const TARGET_FILL: &str = "#9575cd";
const BORDER: (u8, u8, u8) = (230, 236, 245);
const SELECTION: &str = "#ffd54f";

fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
	format!("rgba({r}, {g}, {b}, {alpha})")
}

pub fn render(state: &RasGraphState, ctx: &CanvasRenderingContext2d) {
	let size = state.size();
	let t = state.viewport.transform();
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, size.width, size.height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	let highlight = state.highlight();
	let scale = ScaledValues::new(&state.config.scale, t.k);
	let edges = state.edge_draws(highlight.as_ref());
	// Dimmed first so active elements paint on top.
	draw_edges(ctx, &scale, edges.iter().filter(|e| e.emphasis != Emphasis::Active));
	draw_edges(ctx, &scale, edges.iter().filter(|e| e.emphasis == Emphasis::Active));
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let (dimmed, active): (Vec<&GraphNode>, Vec<&GraphNode>) = state
		.nodes()
		.iter()
		.partition(|n| node_emphasis(highlight.as_ref(), &n.key) == Emphasis::Dimmed);
	for node in dimmed.into_iter().chain(active) {
		let emphasis = node_emphasis(highlight.as_ref(), &node.key);
		draw_node(state, ctx, node, emphasis, &scale);
	}
	ctx.restore();
}

fn draw_edges<'a>(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	edges: impl Iterator<Item = &'a EdgeDraw>,
) {
	// Cool (short) sessions are dashed.
	let dash = js_sys::Array::of2(
		&JsValue::from_f64(6.0 * scale.pixel),
		&JsValue::from_f64(4.0 * scale.pixel),
	);
	let solid = js_sys::Array::new();
	for edge in edges {
		let _ = ctx.set_line_dash(if edge.style == EdgeStyle::Cool { &dash } else { &solid });
		ctx.set_stroke_style_str(&rgba(edge.style.rgb(), 0.8 * edge.emphasis.alpha()));
		ctx.set_line_width(edge.stroke_width);
		ctx.begin_path();
		ctx.move_to(edge.from.x, edge.from.y);
		ctx.line_to(edge.to.x, edge.to.y);
		ctx.stroke();
	}
}

fn draw_node(
	state: &RasGraphState,
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	emphasis: Emphasis,
	scale: &ScaledValues,
) {
	let Some(p) = state.positions().get(&node.key) else {
		return;
	};
	let radius = state.config.scale.radius(node.key.variant);
	let alpha = emphasis.alpha();

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(match node.key.variant {
		NodeVariant::Source => SOURCE_FILL,
		NodeVariant::Target => TARGET_FILL,
	});
	ctx.fill();
	ctx.set_stroke_style_str(&rgba(BORDER, 0.9));
	ctx.set_line_width(scale.border_width * node.border_weight.factor());
	ctx.stroke();

	if state.selected() == Some(&node.key) {
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius + 4.0 * scale.pixel, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(SELECTION);
		ctx.set_line_width(2.0 * scale.pixel);
		ctx.stroke();
	}

	// Users are labelled on the left, CBS hosts on the right.
	let (align, label_x) = match node.key.variant {
		NodeVariant::Source => ("right", p.x - radius - 6.0 * scale.pixel),
		NodeVariant::Target => ("left", p.x + radius + 6.0 * scale.pixel),
	};
	ctx.set_text_align(align);
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", 0.9 * alpha));
	ctx.set_font(&format!("{}px sans-serif", scale.font_size));
	let _ = ctx.fill_text(&node.label, label_x, p.y);
	ctx.set_fill_style_str(&format!("rgba(180, 195, 215, {})", 0.8 * alpha));
	ctx.set_font(&format!("{}px sans-serif", scale.font_size * 0.8));
	let _ = ctx.fill_text(&node.sub_label, label_x, p.y + scale.font_size * 1.1);
	ctx.set_global_alpha(1.0);
}
