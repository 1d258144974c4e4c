use std::rc::Rc;

use leptos::prelude::*;

use crate::components::force_graph::{
	ArticleRecord, ArticleSource, ForceGraphCanvas, InMemorySource, TagRef, UserRef,
};

const TAG_POOL: &[&str] = &["rust", "wasm", "graphs", "canvas", "physics", "leptos", "data"];
const USER_POOL: &[&str] = &["ada", "grace", "alan", "edsger", "barbara"];

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Deterministic sample corpus standing in for the article backend.
fn sample_articles(n: usize) -> Vec<ArticleRecord> {
	(0..n)
		.map(|i| {
			let user = USER_POOL[(rand_simple(i * 3) * USER_POOL.len() as f64) as usize
				% USER_POOL.len()];
			let first_tag = (rand_simple(i * 3 + 1) * TAG_POOL.len() as f64) as usize
				% TAG_POOL.len();
			let tag_count = 1 + (rand_simple(i * 3 + 2) * 2.0) as usize;

			ArticleRecord {
				id: format!("article-{}", i),
				title: format!("Article {}", i),
				url: Some(format!("https://example.com/articles/{}", i)),
				created: Some(format!(
					"2024-{:02}-{:02}T00:00:00Z",
					1 + (i / 28) % 12,
					1 + i % 28
				)),
				x: None,
				y: None,
				user: Some(UserRef {
					username: user.to_owned(),
					avatar: Some(format!("https://example.com/avatars/{}.png", user)),
				}),
				tags: (0..tag_count)
					.map(|t| TagRef {
						name: TAG_POOL[(first_tag + t) % TAG_POOL.len()].to_owned(),
					})
					.collect(),
			}
		})
		.collect()
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas
					source={
						let source: Rc<dyn ArticleSource> =
							Rc::new(InMemorySource::new(sample_articles(40)));
						source
					}
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Article Graph"</h1>
					<p class="subtitle">
						"Click a tag to pull in its articles, an article to open it, a user to rename it. Click empty space to add a sample article."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use crate::components::force_graph::{RECENT_LIMIT, normalize};

	use super::*;

	#[test]
	fn sample_corpus_normalizes_cleanly() {
		let source = InMemorySource::new(sample_articles(40));
		let batch = source.most_recent(RECENT_LIMIT).unwrap();
		assert_eq!(batch.articles.len(), RECENT_LIMIT);

		let sub = normalize(&batch).unwrap();
		assert!(!sub.nodes.is_empty());
		// every link endpoint resolves inside the subgraph
		for link in &sub.links {
			assert!(sub.node(&link.source).is_some());
			assert!(sub.node(&link.target).is_some());
		}
	}

	#[test]
	fn sample_corpus_is_deterministic() {
		let a = sample_articles(10);
		let b = sample_articles(10);
		let ids_a: Vec<&str> = a.iter().map(|r| r.id.as_str()).collect();
		let ids_b: Vec<&str> = b.iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids_a, ids_b);
	}
}
