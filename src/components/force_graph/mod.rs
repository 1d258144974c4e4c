//! An article/user/tag graph that grows as it is explored.
//!
//! `merge` and `controller` hold the pure data model: batches of
//! fetched articles are normalized into node/link sets and folded
//! into one append-only graph state. `state`, `render` and
//! `component` wire that state into a canvas with a force simulation.

mod component;
mod controller;
mod merge;
mod render;
mod source;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use controller::{ClickAction, InteractionController, RandomSource, RenamePrompt};
pub use merge::{TAG_OFFSET, USER_OFFSET, merge, normalize};
pub use source::{ArticleSource, InMemorySource, RECENT_LIMIT, TAG_LIMIT};
pub use types::{
	ArticleBatch, ArticleRecord, GraphData, GraphError, GraphLink, GraphNode, NodeKind, TagRef,
	UserRef,
};
