use std::fmt;

use serde::Deserialize;

/// Category of a graph entity, the upstream data's type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Article,
	User,
	Tag,
}

impl NodeKind {
	pub fn label(self) -> &'static str {
		match self {
			NodeKind::Article => "Article",
			NodeKind::User => "User",
			NodeKind::Tag => "Tag",
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// One node of the accumulated graph, unique by `id` across all kinds.
///
/// `x`/`y` are seed coordinates only. Once the node enters the simulation
/// the physics engine owns its position; a later merge never reseeds it.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub kind: NodeKind,
	pub title: Option<String>,
	pub url: Option<String>,
	pub avatar: Option<String>,
	pub x: Option<f64>,
	pub y: Option<f64>,
}

/// Directed link between two node ids. Links carry no identity of their
/// own and are never deduplicated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

/// Node/link set, used both as the running graph state and as the
/// subgraph normalized from a single batch.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Update a node's title in place. This is the one sanctioned
	/// mutation of an existing node; a rename merged as a "new" node
	/// would be dropped by the first-wins dedup rule instead.
	pub fn set_title(&mut self, id: &str, title: &str) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) => {
				node.title = Some(title.to_owned());
				true
			}
			None => false,
		}
	}
}

/// One fetch response: zero or more article records.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ArticleBatch {
	#[serde(default)]
	pub articles: Vec<ArticleRecord>,
}

/// A primary entity as delivered by the fetch layer, with its owning
/// user and zero or more tags.
#[derive(Clone, Debug, Deserialize)]
pub struct ArticleRecord {
	pub id: String,
	pub title: String,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub created: Option<String>,
	#[serde(default)]
	pub x: Option<f64>,
	#[serde(default)]
	pub y: Option<f64>,
	#[serde(default)]
	pub user: Option<UserRef>,
	#[serde(default)]
	pub tags: Vec<TagRef>,
}

/// The user owning an article. `username` doubles as the node id.
#[derive(Clone, Debug, Deserialize)]
pub struct UserRef {
	pub username: String,
	#[serde(default)]
	pub avatar: Option<String>,
}

/// A tag attached to an article. `name` doubles as the node id.
#[derive(Clone, Debug, Deserialize)]
pub struct TagRef {
	pub name: String,
}

/// Failures surfaced while growing the graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// A record arrived without its owning user, so the user→article
	/// link cannot be built. The whole batch is rejected.
	#[error("article {article_id} has no user")]
	MissingActor { article_id: String },
	/// The fetch collaborator failed; nothing is merged.
	#[error("fetch failed: {0}")]
	Fetch(String),
}
