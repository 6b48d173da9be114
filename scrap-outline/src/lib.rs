//! Journal domain: normalized posts and the outline renderer.
//!
//! A [`Post`] is what survives of a tweet once the pipeline has normalized
//! it. [`format_post`] turns one post into a Scrapbox-style outline block
//! (first line annotated with the local wall-clock time, continuation lines
//! indented one level deeper) and [`render_batch`] stitches a fetched
//! window into a single document in reading order.

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset};
use time::{OffsetDateTime, UtcOffset};

/// The journal is kept in JST regardless of where the poster was.
pub const JOURNAL_OFFSET: UtcOffset = offset!(+9);

const STAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// One normalized post, transient for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Opaque ordered id from the upstream API.
    pub id: String,
    /// Raw text, newline-separated; empty lines are meaningful.
    pub text: String,
    /// Creation time with its original UTC offset.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Render one post as an outline block.
///
/// The first line gets the JST wall-clock stamp in full-width parentheses
/// appended directly (no separator) and a single-space indent; every
/// following line gets a two-space indent, modelling a one-level-deeper
/// outline continuation. Lines are rejoined with `\n` and no trailing
/// newline is added. Pure: equal posts always render equal blocks.
///
/// ```
/// use scrap_outline::{format_post, Post};
/// use time::macros::datetime;
///
/// let post = Post {
///     id: "1".into(),
///     text: "line1\nline2".into(),
///     created_at: datetime!(2023-05-01 12:00:00 UTC),
/// };
/// assert_eq!(format_post(&post), " line1（21:00）\n  line2");
/// ```
pub fn format_post(post: &Post) -> String {
    let stamp = post
        .created_at
        .to_offset(JOURNAL_OFFSET)
        .format(STAMP_FORMAT)
        .expect("HH:MM formatting is infallible");

    post.text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!(" {line}（{stamp}）")
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a fetched window into one document.
///
/// The fetcher hands posts newest-first; the journal reads oldest-first, so
/// the input is reversed before formatting. Blocks are joined with a single
/// newline. An empty window renders as the empty string; callers
/// short-circuit before dispatching that.
pub fn render_batch(posts: &[Post]) -> String {
    posts
        .iter()
        .rev()
        .map(format_post)
        .collect::<Vec<_>>()
        .join("\n")
}
