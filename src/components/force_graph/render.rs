//! Canvas painting.
//!
//! Labeled kinds (articles and tags) get a measured background box
//! plus centered text, users get their avatar image. The box painted
//! for a node is recorded on it so pointer picking matches exactly
//! the pixels that were drawn.

use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::state::{AVATAR_SIZE, ForceGraphState, NODE_RADIUS};
use super::types::NodeKind;

/// Label font size in screen pixels; divided by the zoom factor when
/// painting in graph space.
pub const LABEL_FONT_SIZE: f64 = 12.0;

/// Background box for a label of the given measured width: the text
/// extent plus 20% of the font size in each dimension.
pub fn label_dims(text_width: f64, font_size: f64) -> (f64, f64) {
	(
		text_width + font_size * 0.2,
		font_size + font_size * 0.2,
	)
}

pub fn render(
	state: &mut ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	images: &mut HashMap<String, HtmlImageElement>,
) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx, images);
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, arrow_size) = (1.5 / k, 8.0 / k);

	ctx.set_stroke_style_str("rgba(100, 180, 255, 0.6)");
	ctx.set_line_width(line_width);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		ctx.set_fill_style_str("rgba(100, 180, 255, 0.8)");
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
}

fn draw_nodes(
	state: &mut ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	images: &mut HashMap<String, HtmlImageElement>,
) {
	let font_size = LABEL_FONT_SIZE / state.transform.k;

	state.graph.visit_nodes_mut(|node| {
		let (x, y) = (node.data.x as f64, node.data.y as f64);
		let info = &mut node.data.user_data;

		match info.kind {
			NodeKind::Article | NodeKind::Tag => {
				let label = info.title.clone().unwrap_or_else(|| info.id.clone());
				ctx.set_font(&format!("{}px sans-serif", font_size));
				let text_width = ctx
					.measure_text(&label)
					.map(|m| m.width())
					.unwrap_or_default();
				let (w, h) = label_dims(text_width, font_size);

				ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
				ctx.fill_rect(x - w / 2.0, y - h / 2.0, w, h);
				ctx.set_text_align("center");
				ctx.set_text_baseline("middle");
				ctx.set_fill_style_str(&info.color);
				let _ = ctx.fill_text(&label, x, y);

				info.hit_dims = Some((w, h));
			}
			NodeKind::User => {
				let drawn = info.avatar.as_ref().is_some_and(|src| {
					let img = images.entry(src.clone()).or_insert_with(|| {
						let img = HtmlImageElement::new().unwrap();
						img.set_src(src);
						img
					});
					if !img.complete() {
						return false;
					}
					ctx.draw_image_with_html_image_element_and_dw_and_dh(
						img,
						x - AVATAR_SIZE / 2.0,
						y - AVATAR_SIZE / 2.0,
						AVATAR_SIZE,
						AVATAR_SIZE,
					)
					.is_ok()
				});

				// plain dot until the avatar has loaded
				if !drawn {
					ctx.begin_path();
					let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
					ctx.set_fill_style_str(&info.color);
					ctx.fill();
				}

				info.hit_dims = Some((AVATAR_SIZE, AVATAR_SIZE));
			}
		}
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn label_box_pads_by_a_fifth_of_the_font_size() {
		let (w, h) = label_dims(50.0, 12.0);
		assert!((w - 52.4).abs() < 1e-9);
		assert!((h - 14.4).abs() < 1e-9);
	}

	#[test]
	fn label_box_scales_with_zoomed_font() {
		let (w, h) = label_dims(20.0, 6.0);
		assert!((w - 21.2).abs() < 1e-9);
		assert!((h - 7.2).abs() < 1e-9);
	}
}
