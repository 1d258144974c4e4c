//! Fetch collaborator seam.
//!
//! The graph core never builds transport requests; it only names one
//! of the two query shapes and consumes the resulting batch.

use super::types::{ArticleBatch, ArticleRecord, GraphError};

/// Bound for the initial most-recent query.
pub const RECENT_LIMIT: usize = 30;

/// Bound for a per-tag expansion query.
pub const TAG_LIMIT: usize = 10;

/// Supplier of article batches, most-recent-first.
pub trait ArticleSource {
	/// Up to `limit` newest records.
	fn most_recent(&self, limit: usize) -> Result<ArticleBatch, GraphError>;

	/// Up to `limit` newest records carrying the given tag.
	fn by_tag(&self, tag: &str, limit: usize) -> Result<ArticleBatch, GraphError>;
}

/// In-memory source over a fixed record set, used by the demo page
/// and in tests.
pub struct InMemorySource {
	articles: Vec<ArticleRecord>,
}

impl InMemorySource {
	pub fn new(articles: Vec<ArticleRecord>) -> Self {
		Self { articles }
	}

	fn newest_where<F>(&self, limit: usize, keep: F) -> ArticleBatch
	where
		F: Fn(&ArticleRecord) -> bool,
	{
		let mut articles: Vec<_> = self.articles.iter().filter(|a| keep(a)).cloned().collect();
		// ISO-8601 timestamps order lexicographically; undated records sink
		articles.sort_by(|a, b| b.created.cmp(&a.created));
		articles.truncate(limit);
		ArticleBatch { articles }
	}
}

impl ArticleSource for InMemorySource {
	fn most_recent(&self, limit: usize) -> Result<ArticleBatch, GraphError> {
		Ok(self.newest_where(limit, |_| true))
	}

	fn by_tag(&self, tag: &str, limit: usize) -> Result<ArticleBatch, GraphError> {
		Ok(self.newest_where(limit, |a| a.tags.iter().any(|t| t.name == tag)))
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::{TagRef, UserRef};
	use super::*;

	fn record(id: &str, created: &str, tags: &[&str]) -> ArticleRecord {
		ArticleRecord {
			id: id.to_owned(),
			title: id.to_owned(),
			url: None,
			created: Some(created.to_owned()),
			x: None,
			y: None,
			user: Some(UserRef {
				username: format!("author-of-{}", id),
				avatar: None,
			}),
			tags: tags
				.iter()
				.map(|t| TagRef { name: (*t).to_owned() })
				.collect(),
		}
	}

	fn source() -> InMemorySource {
		InMemorySource::new(vec![
			record("a1", "2024-01-01T00:00:00Z", &["rust"]),
			record("a2", "2024-03-01T00:00:00Z", &["rust", "graphs"]),
			record("a3", "2024-02-01T00:00:00Z", &["graphs"]),
		])
	}

	#[test]
	fn most_recent_orders_newest_first_and_bounds() {
		let batch = source().most_recent(2).unwrap();
		let ids: Vec<&str> = batch.articles.iter().map(|a| a.id.as_str()).collect();
		assert_eq!(ids, ["a2", "a3"]);
	}

	#[test]
	fn by_tag_filters_and_keeps_ordering() {
		let batch = source().by_tag("rust", 10).unwrap();
		let ids: Vec<&str> = batch.articles.iter().map(|a| a.id.as_str()).collect();
		assert_eq!(ids, ["a2", "a1"]);
	}

	#[test]
	fn by_tag_with_unknown_tag_is_empty() {
		assert!(source().by_tag("nope", 10).unwrap().articles.is_empty());
	}
}
