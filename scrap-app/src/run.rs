//! The run controller: one incremental fetch-format-dispatch pass.
//!
//! Sequence per run: load cursor → fetch (scoped by cursor unless the
//! `--all` override) → short-circuit on an empty window → render → persist
//! the newest id as the new cursor (skipped in override mode) → dispatch.
//! Any failure along the way is fatal to the run; nothing is retried and
//! nothing already persisted is rolled back.

use anyhow::Result;
use scrap_outline::{render_batch, Post};
use scrap_store::{BlobStore, CursorStore};

use crate::publish::Publisher;

/// Run-mode switches from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    /// Ignore the cursor when fetching and leave it untouched afterward.
    pub fetch_all: bool,
}

/// Source of one descending (newest-first) window of posts.
///
/// The live implementation wraps the timeline API; scenario tests supply
/// canned windows.
#[async_trait::async_trait]
pub trait FetchPosts: Send + Sync {
    /// With `since_id`, return only posts strictly newer than that id.
    async fn fetch(&self, since_id: Option<&str>) -> Result<Vec<Post>>;
}

/// What a completed run did. An empty window is a normal outcome, not an
/// error.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    NoNewPosts,
    Dispatched { posts: usize },
}

/// Execute one full run.
pub async fn run_once(
    store: &dyn BlobStore,
    fetcher: &dyn FetchPosts,
    publisher: &dyn Publisher,
    mode: RunMode,
) -> Result<RunOutcome> {
    let cursor_store = CursorStore::new(store);

    let cursor = cursor_store.load().await?;
    tracing::debug!(
        cursor = cursor.as_ref().map(|c| c.last_id.as_str()).unwrap_or("-"),
        "journal.cursor.loaded"
    );

    let since_id = if mode.fetch_all {
        None
    } else {
        cursor.as_ref().map(|c| c.last_id.as_str())
    };
    let posts = fetcher.fetch(since_id).await?;
    tracing::info!(
        fetched = posts.len(),
        all = mode.fetch_all,
        "journal.fetch.done"
    );

    if posts.is_empty() {
        tracing::info!("journal.fetch.empty");
        return Ok(RunOutcome::NoNewPosts);
    }

    let document = render_batch(&posts);

    if !mode.fetch_all {
        // posts[0] is the newest element of the descending window.
        cursor_store.save(&posts[0].id).await?;
    }

    publisher.publish(&document).await?;
    tracing::info!(posts = posts.len(), "journal.dispatched");

    Ok(RunOutcome::Dispatched { posts: posts.len() })
}
