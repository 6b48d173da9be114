//! Where the rendered journal document ends up.

use anyhow::Result;

/// Final hand-off of one rendered document.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, document: &str) -> Result<()>;
}

/// `--raw`: write the document to stdout, nothing else.
pub struct StdoutPublisher;

#[async_trait::async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, document: &str) -> Result<()> {
        println!("{document}");
        Ok(())
    }
}

/// Hand-off to the configured Scrapbox project.
///
/// The import contract on the Scrapbox side is not settled, so this accepts
/// the document and records the hand-off without sending anything.
// FIXME: wire the Scrapbox page-import API once the write contract is settled.
pub struct ScrapboxPublisher {
    project: String,
}

impl ScrapboxPublisher {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

#[async_trait::async_trait]
impl Publisher for ScrapboxPublisher {
    async fn publish(&self, document: &str) -> Result<()> {
        tracing::info!(
            project = %self.project,
            lines = document.lines().count(),
            "journal.dispatch.scrapbox"
        );
        Ok(())
    }
}
