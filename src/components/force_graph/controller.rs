//! Click routing and graph-state ownership.
//!
//! The controller holds the single current [`GraphData`] value and
//! replaces it wholesale on every transition. It never talks to the
//! network or the window itself: fetches come back as a typed
//! [`ClickAction`] for the host to execute, renames go through an
//! injected prompt and random ids for synthetic growth come from an
//! injected source.

use log::{debug, info, warn};

use super::merge;
use super::types::{ArticleBatch, ArticleRecord, GraphData, GraphError, NodeKind, TagRef, UserRef};

/// Prompt capability for renames: given the node kind and current
/// title, returns the replacement label or `None` when cancelled.
pub type RenamePrompt = Box<dyn Fn(NodeKind, Option<&str>) -> Option<String>>;

/// Source of small random numbers for synthetic entity ids.
pub type RandomSource = Box<dyn FnMut() -> u32>;

const SAMPLE_URL: &str = "https://example.com/sample-article";
const SAMPLE_AVATAR: &str = "https://example.com/sample-avatar.png";

/// What the host must do after a node click. Fetching and navigation
/// stay outside the controller.
#[derive(Debug, PartialEq, Eq)]
pub enum ClickAction {
	/// Fetch articles tagged with `tag` and feed the result back
	/// through [`InteractionController::apply_batch`].
	FetchTagged { tag: String },
	/// Open the article's url out of band; no graph mutation.
	OpenUrl { url: String },
	/// A rename was applied; the rendering surface should refresh
	/// its labels.
	Renamed { id: String },
	/// Nothing to do.
	None,
}

/// Owns the accumulated graph and dispatches user interaction onto it.
pub struct InteractionController {
	graph: GraphData,
	prompt: RenamePrompt,
	random: RandomSource,
}

impl InteractionController {
	/// Start with an empty graph and the host's prompt/random hooks.
	pub fn new(prompt: RenamePrompt, random: RandomSource) -> Self {
		Self {
			graph: GraphData::default(),
			prompt,
			random,
		}
	}

	/// The current graph state.
	pub fn graph(&self) -> &GraphData {
		&self.graph
	}

	/// Normalize and merge one batch, all-or-nothing: on error the
	/// prior state is left untouched.
	pub fn apply_batch(&mut self, batch: &ArticleBatch) -> Result<(), GraphError> {
		let subgraph = merge::normalize(batch)?;
		debug!(
			"merging {} nodes / {} links into {} / {}",
			subgraph.nodes.len(),
			subgraph.links.len(),
			self.graph.nodes.len(),
			self.graph.links.len()
		);
		self.graph = merge::merge(&self.graph, subgraph);
		Ok(())
	}

	/// The fetch collaborator failed; keep the graph as it was.
	pub fn on_fetch_failed(&self, context: &str, err: &GraphError) {
		warn!("fetch for {} failed, graph unchanged: {}", context, err);
	}

	/// Route a click on the node with the given id.
	///
	/// Tag clicks only request more data, the graph changes once the
	/// fetched batch is applied. Article clicks navigate. Everything
	/// else gets the rename prompt.
	pub fn on_node_click(&mut self, id: &str) -> ClickAction {
		let Some(node) = self.graph.node(id) else {
			return ClickAction::None;
		};
		info!("click on {} node {}", node.kind, node.id);

		match node.kind {
			NodeKind::Tag => ClickAction::FetchTagged { tag: node.id.clone() },
			NodeKind::Article => match &node.url {
				Some(url) => ClickAction::OpenUrl { url: url.clone() },
				None => ClickAction::None,
			},
			_ => self.rename(id),
		}
	}

	/// Click on empty canvas space: synthesize a one-record batch
	/// seeded at the given graph coordinates and merge it through the
	/// same path as fetched data.
	pub fn on_background_click(&mut self, gx: f64, gy: f64) -> Result<(), GraphError> {
		let (article_n, user_n, tag_n) = ((self.random)(), (self.random)(), (self.random)());
		info!("background click at ({:.1}, {:.1})", gx, gy);

		let batch = ArticleBatch {
			articles: vec![ArticleRecord {
				id: format!("add_article{}", article_n),
				title: format!("sample_article{}", article_n),
				url: Some(SAMPLE_URL.to_owned()),
				created: None,
				x: Some(gx),
				y: Some(gy),
				user: Some(UserRef {
					username: format!("sample_user{}", user_n),
					avatar: Some(SAMPLE_AVATAR.to_owned()),
				}),
				tags: vec![TagRef {
					name: format!("sample_tag{}", tag_n),
				}],
			}],
		};
		self.apply_batch(&batch)
	}

	fn rename(&mut self, id: &str) -> ClickAction {
		let (kind, current) = match self.graph.node(id) {
			Some(node) => (node.kind, node.title.clone()),
			None => return ClickAction::None,
		};
		let Some(value) = (self.prompt)(kind, current.as_deref()) else {
			return ClickAction::None;
		};
		if value.is_empty() {
			return ClickAction::None;
		}
		self.graph.set_title(id, &value);
		ClickAction::Renamed { id: id.to_owned() }
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::*;

	fn controller_with(prompt: RenamePrompt) -> InteractionController {
		let mut counter = 0;
		InteractionController::new(
			prompt,
			Box::new(move || {
				counter += 1;
				counter
			}),
		)
	}

	fn controller() -> InteractionController {
		controller_with(Box::new(|_, _| None))
	}

	fn seeded() -> InteractionController {
		let mut c = controller();
		let batch: ArticleBatch = serde_json::from_value(serde_json::json!({
			"articles": [{
				"id": "a1",
				"title": "T",
				"url": "https://example.com/a1",
				"tags": [{ "name": "tag1" }],
				"user": { "username": "u1" }
			}]
		}))
		.unwrap();
		c.apply_batch(&batch).unwrap();
		c
	}

	#[test]
	fn tag_click_requests_a_fetch_without_mutating_state() {
		let mut c = seeded();
		let (nodes, links) = (c.graph().nodes.len(), c.graph().links.len());

		let action = c.on_node_click("tag1");
		assert_eq!(action, ClickAction::FetchTagged { tag: "tag1".into() });
		assert_eq!(c.graph().nodes.len(), nodes);
		assert_eq!(c.graph().links.len(), links);
	}

	#[test]
	fn article_click_opens_its_url() {
		let mut c = seeded();
		assert_eq!(
			c.on_node_click("a1"),
			ClickAction::OpenUrl { url: "https://example.com/a1".into() }
		);
	}

	#[test]
	fn unknown_id_is_a_no_op() {
		let mut c = seeded();
		assert_eq!(c.on_node_click("nope"), ClickAction::None);
	}

	#[test]
	fn user_click_renames_through_the_prompt() {
		let asked = Rc::new(Cell::new(false));
		let asked_in_prompt = asked.clone();
		let mut c = controller_with(Box::new(move |kind, current| {
			asked_in_prompt.set(true);
			assert_eq!(kind, NodeKind::User);
			assert_eq!(current, None);
			Some("Alice".to_owned())
		}));
		let batch: ArticleBatch = serde_json::from_value(serde_json::json!({
			"articles": [{ "id": "a1", "title": "T", "user": { "username": "u1" } }]
		}))
		.unwrap();
		c.apply_batch(&batch).unwrap();
		let links_before = c.graph().links.clone();

		let action = c.on_node_click("u1");
		assert!(asked.get());
		assert_eq!(action, ClickAction::Renamed { id: "u1".into() });

		let user = c.graph().node("u1").unwrap();
		assert_eq!(user.title.as_deref(), Some("Alice"));
		assert_eq!(user.kind, NodeKind::User);
		assert_eq!(user.id, "u1");
		assert_eq!((user.x, user.y), (None, None));
		assert_eq!(c.graph().links, links_before);
	}

	#[test]
	fn cancelled_rename_changes_nothing() {
		let mut c = seeded();
		assert_eq!(c.on_node_click("u1"), ClickAction::None);
		assert_eq!(c.graph().node("u1").unwrap().title, None);
	}

	#[test]
	fn background_click_grows_the_graph_at_the_click_point() {
		let mut c = seeded();
		let (nodes, links) = (c.graph().nodes.len(), c.graph().links.len());

		c.on_background_click(10.0, 20.0).unwrap();
		assert_eq!(c.graph().nodes.len(), nodes + 3);
		assert_eq!(c.graph().links.len(), links + 2);

		let article = c.graph().node("add_article1").unwrap();
		assert_eq!((article.x, article.y), (Some(10.0), Some(20.0)));
		assert_eq!(article.kind, NodeKind::Article);
		assert!(c.graph().node("sample_user2").is_some());
		assert!(c.graph().node("sample_tag3").is_some());
	}

	#[test]
	fn failed_batch_leaves_state_untouched() {
		let mut c = seeded();
		let before = c.graph().nodes.len();

		let broken: ArticleBatch = serde_json::from_value(serde_json::json!({
			"articles": [{ "id": "a9", "title": "broken" }]
		}))
		.unwrap();
		assert!(c.apply_batch(&broken).is_err());
		assert_eq!(c.graph().nodes.len(), before);
		assert!(c.graph().node("a9").is_none());
	}

	#[test]
	fn duplicate_batches_keep_the_first_title() {
		let mut c = seeded();
		let second: ArticleBatch = serde_json::from_value(serde_json::json!({
			"articles": [{
				"id": "a1",
				"title": "second title",
				"user": { "username": "u1" }
			}]
		}))
		.unwrap();
		c.apply_batch(&second).unwrap();

		let matching: Vec<_> = c.graph().nodes.iter().filter(|n| n.id == "a1").collect();
		assert_eq!(matching.len(), 1);
		assert_eq!(matching[0].title.as_deref(), Some("T"));
	}
}
