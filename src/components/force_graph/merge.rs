//! Batch normalization and graph merging.
//!
//! `normalize` flattens one fetched batch into a node/link set;
//! `merge` folds such a set into the running graph state. Both apply
//! the same identity policy: node ids are unique and the first-seen
//! node wins, links keep their full multiplicity.

use std::collections::HashSet;

use super::types::{ArticleBatch, GraphData, GraphError, GraphLink, GraphNode, NodeKind};

/// Seed offset of a user node relative to its article, so the two do
/// not spawn exactly on top of each other.
pub const USER_OFFSET: (f64, f64) = (5.0, 5.0);

/// Seed offset of a tag node relative to its article. The upstream
/// implementation assigned two conflicting offsets to the same field;
/// here the tag deliberately sits opposite the user node.
pub const TAG_OFFSET: (f64, f64) = (-5.0, -5.0);

/// Flatten a batch into a deduplicated subgraph.
///
/// Per record this emits the article node, its user node, one
/// user→article link and one article→tag link per tag. A record
/// without a user fails the whole batch so no dangling link can be
/// produced.
pub fn normalize(batch: &ArticleBatch) -> Result<GraphData, GraphError> {
	let mut nodes = Vec::new();
	let mut links = Vec::new();

	for article in &batch.articles {
		let user = article.user.as_ref().ok_or_else(|| GraphError::MissingActor {
			article_id: article.id.clone(),
		})?;

		nodes.push(GraphNode {
			id: article.id.clone(),
			kind: NodeKind::Article,
			title: Some(article.title.clone()),
			url: article.url.clone(),
			avatar: None,
			x: article.x,
			y: article.y,
		});

		nodes.push(GraphNode {
			id: user.username.clone(),
			kind: NodeKind::User,
			title: None,
			url: None,
			avatar: user.avatar.clone(),
			x: article.x.map(|x| x + USER_OFFSET.0),
			y: article.y.map(|y| y + USER_OFFSET.1),
		});

		links.push(GraphLink {
			source: user.username.clone(),
			target: article.id.clone(),
		});

		for tag in &article.tags {
			nodes.push(GraphNode {
				id: tag.name.clone(),
				kind: NodeKind::Tag,
				title: None,
				url: None,
				avatar: None,
				x: article.x.map(|x| x + TAG_OFFSET.0),
				y: article.y.map(|y| y + TAG_OFFSET.1),
			});

			links.push(GraphLink {
				source: article.id.clone(),
				target: tag.name.clone(),
			});
		}
	}

	Ok(GraphData {
		nodes: dedup_by_id(nodes),
		links,
	})
}

/// Fold a subgraph into the current state without mutating it.
///
/// Nodes already present keep their value and position; only unseen
/// ids are appended. Links are concatenated as-is.
pub fn merge(current: &GraphData, incoming: GraphData) -> GraphData {
	let mut seen: HashSet<String> = current.nodes.iter().map(|n| n.id.clone()).collect();
	let mut nodes = current.nodes.clone();
	nodes.extend(incoming.nodes.into_iter().filter(|n| seen.insert(n.id.clone())));

	let mut links = current.links.clone();
	links.extend(incoming.links);

	GraphData { nodes, links }
}

fn dedup_by_id(nodes: Vec<GraphNode>) -> Vec<GraphNode> {
	let mut seen = HashSet::new();
	nodes
		.into_iter()
		.filter(|n| seen.insert(n.id.clone()))
		.collect()
}
