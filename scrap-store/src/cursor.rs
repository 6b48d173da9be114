//! The timeline cursor: the single last-seen post id that makes runs
//! incremental.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::BlobStore;

pub const CURSOR_KEY: &str = "cursor.json";

/// Persisted cursor value. The id is opaque to this crate; it is only ever
/// compared by the upstream API, never locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cursor {
    pub last_id: String,
}

/// Typed view over the cursor blob.
pub struct CursorStore<'a> {
    store: &'a dyn BlobStore,
}

impl<'a> CursorStore<'a> {
    pub fn new(store: &'a dyn BlobStore) -> Self {
        Self { store }
    }

    /// Read the cursor; `None` on the first run ever.
    pub async fn load(&self) -> Result<Option<Cursor>> {
        crate::get_json(self.store, CURSOR_KEY).await
    }

    /// Replace the cursor with the id of the newest fetched post.
    pub async fn save(&self, last_id: &str) -> Result<()> {
        let cursor = Cursor {
            last_id: last_id.to_string(),
        };
        crate::put_json(self.store, CURSOR_KEY, &cursor).await?;
        tracing::info!(last_id, "journal.cursor.saved");
        Ok(())
    }
}
