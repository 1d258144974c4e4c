//! Simulation wrapper around the `force_graph` engine.
//!
//! Owns the physics graph, the view transform and the pointer state
//! machines. Graph growth arrives through [`ForceGraphState::sync`],
//! which only ever adds: positions of nodes already in the simulation
//! belong to the engine and are never reseeded.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, GraphNode, NodeKind};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

/// Edge length of the square an avatar is painted (and hit-tested) in.
pub const AVATAR_SIZE: f64 = 12.0;

/// Pointer movement below this many pixels between press and release
/// counts as a click rather than a drag or pan.
pub const CLICK_SLOP: f64 = 4.0;

/// Radius of the fallback seeding circle for nodes without coordinates.
const SEED_RADIUS: f64 = 100.0;

/// Color bucket for a node kind.
pub fn kind_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Article => COLORS[0],
		NodeKind::User => COLORS[1],
		NodeKind::Tag => COLORS[2],
	}
}

/// Per-node payload carried inside the simulation.
///
/// `hit_dims` is written by the paint pass (the measured label box, or
/// the avatar box) and read back by pointer picking, so both passes
/// agree on the same rectangle.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub kind: NodeKind,
	pub title: Option<String>,
	pub url: Option<String>,
	pub avatar: Option<String>,
	pub color: String,
	pub hit_dims: Option<(f64, f64)>,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	synced_links: usize,
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		let graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		Self {
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			id_to_idx: HashMap::new(),
			synced_links: 0,
		}
	}

	/// Bring the simulation up to date with the merged graph state.
	///
	/// Unseen nodes are added at their seed coordinates (or on a circle
	/// around the origin when the batch carried none); nodes already
	/// present only get their display fields refreshed, which is how a
	/// rename reaches the canvas. Links are append-only upstream, so a
	/// cursor into the link list suffices.
	pub fn sync(&mut self, data: &GraphData) {
		let fresh: Vec<&GraphNode> = data
			.nodes
			.iter()
			.filter(|n| !self.id_to_idx.contains_key(&n.id))
			.collect();
		let fresh_count = fresh.len().max(1);

		for (i, node) in fresh.into_iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / fresh_count as f64;
			let x = node.x.unwrap_or(SEED_RADIUS * angle.cos()) as f32;
			let y = node.y.unwrap_or(SEED_RADIUS * angle.sin()) as f32;

			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					kind: node.kind,
					title: node.title.clone(),
					url: node.url.clone(),
					avatar: node.avatar.clone(),
					color: kind_color(node.kind).to_owned(),
					hit_dims: None,
				},
			});
			self.id_to_idx.insert(node.id.clone(), idx);
		}

		let titles: HashMap<&str, &Option<String>> =
			data.nodes.iter().map(|n| (n.id.as_str(), &n.title)).collect();
		self.graph.visit_nodes_mut(|node| {
			if let Some(title) = titles.get(node.data.user_data.id.as_str()) {
				node.data.user_data.title = (*title).clone();
			}
		});

		for link in &data.links[self.synced_links..] {
			if let (Some(&src), Some(&tgt)) = (
				self.id_to_idx.get(&link.source),
				self.id_to_idx.get(&link.target),
			) {
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
		}
		self.synced_links = data.links.len();
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Pick the node under a screen position.
	///
	/// Labeled nodes match against the rectangle recorded by the paint
	/// pass, avatar nodes against their image box; nodes not painted
	/// yet fall back to a radius test.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// hit_dims are in world-space, they scale with zoom like nodes
			let hit = match node.data.user_data.hit_dims {
				Some((w, h)) => dx.abs() <= w / 2.0 && dy.abs() <= h / 2.0,
				None => (dx * dx + dy * dy).sqrt() < HIT_RADIUS,
			};
			if hit {
				found = Some(node.index());
			}
		});
		found
	}

	/// Graph-state id of a simulation node.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.id_to_idx
			.iter()
			.find(|&(_, &i)| i == idx)
			.map(|(id, _)| id.as_str())
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::{GraphLink, GraphNode};
	use super::*;

	fn node(id: &str, kind: NodeKind, x: Option<f64>, y: Option<f64>) -> GraphNode {
		GraphNode {
			id: id.to_owned(),
			kind,
			title: None,
			url: None,
			avatar: None,
			x,
			y,
		}
	}

	fn positions(state: &ForceGraphState) -> HashMap<String, (f32, f32)> {
		let mut out = HashMap::new();
		state.graph.visit_nodes(|n| {
			out.insert(n.data.user_data.id.clone(), (n.x(), n.y()));
		});
		out
	}

	#[test]
	fn sync_adds_nodes_and_links_once() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		let mut data = GraphData {
			nodes: vec![
				node("a1", NodeKind::Article, Some(10.0), Some(20.0)),
				node("u1", NodeKind::User, Some(15.0), Some(25.0)),
			],
			links: vec![GraphLink { source: "u1".into(), target: "a1".into() }],
		};
		state.sync(&data);
		assert_eq!(positions(&state).len(), 2);
		assert_eq!(positions(&state)["a1"], (10.0, 20.0));

		// a second sync with the same state is a no-op
		state.sync(&data);
		assert_eq!(positions(&state).len(), 2);

		// growth only appends the new link
		data.nodes.push(node("tag1", NodeKind::Tag, None, None));
		data.links.push(GraphLink { source: "a1".into(), target: "tag1".into() });
		state.sync(&data);
		assert_eq!(positions(&state).len(), 3);
		assert_eq!(state.synced_links, 2);
	}

	#[test]
	fn sync_never_reseeds_an_existing_node() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		let mut data = GraphData {
			nodes: vec![node("a1", NodeKind::Article, Some(10.0), Some(20.0))],
			links: vec![],
		};
		state.sync(&data);

		data.nodes[0].x = Some(99.0);
		data.nodes[0].y = Some(99.0);
		state.sync(&data);
		assert_eq!(positions(&state)["a1"], (10.0, 20.0));
	}

	#[test]
	fn sync_refreshes_titles_of_existing_nodes() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		let mut data = GraphData {
			nodes: vec![node("u1", NodeKind::User, None, None)],
			links: vec![],
		};
		state.sync(&data);

		data.nodes[0].title = Some("Alice".to_owned());
		state.sync(&data);

		let mut title = None;
		state.graph.visit_nodes(|n| title = n.data.user_data.title.clone());
		assert_eq!(title.as_deref(), Some("Alice"));
	}

	#[test]
	fn screen_to_graph_inverts_the_view_transform() {
		let state = ForceGraphState::new(800.0, 600.0);
		assert_eq!(state.screen_to_graph(400.0, 300.0), (0.0, 0.0));
		assert_eq!(state.screen_to_graph(410.0, 320.0), (10.0, 20.0));
	}

	#[test]
	fn picking_uses_recorded_rectangles_with_radius_fallback() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		let data = GraphData {
			nodes: vec![node("a1", NodeKind::Article, Some(0.0), Some(0.0))],
			links: vec![],
		};
		state.sync(&data);

		// unpainted: radius test around the node centre
		assert!(state.node_at_position(400.0, 300.0).is_some());
		assert!(state.node_at_position(400.0 + HIT_RADIUS + 1.0, 300.0).is_none());

		// painted: a wide flat label rectangle wins over the radius
		state.graph.visit_nodes_mut(|n| n.data.user_data.hit_dims = Some((60.0, 8.0)));
		assert!(state.node_at_position(425.0, 300.0).is_some());
		assert!(state.node_at_position(400.0, 306.0).is_none());
	}

	#[test]
	fn node_id_round_trips_through_picking() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.sync(&GraphData {
			nodes: vec![node("tag1", NodeKind::Tag, Some(0.0), Some(0.0))],
			links: vec![],
		});
		let idx = state.node_at_position(400.0, 300.0).unwrap();
		assert_eq!(state.node_id(idx), Some("tag1"));
	}
}
