//! Normalization of raw statuses into journal [`Post`]s.

use anyhow::{Context, Result};
use scrap_outline::Post;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::twitter::types::Tweet;

/// v1.1 layout: `"Sat May 01 12:00:00 +0000 2023"`.
const CREATED_AT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);

/// Parse the v1.1 `created_at` timestamp, keeping its UTC offset.
pub fn parse_created_at(raw: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(raw, CREATED_AT_FORMAT)
        .with_context(|| format!("unparseable created_at: {raw:?}"))
}

/// Convert one fetched status into the journal domain.
pub fn post_from_tweet(tweet: &Tweet) -> Result<Post> {
    Ok(Post {
        id: tweet.id_str.clone(),
        text: tweet.text.clone(),
        created_at: parse_created_at(&tweet.created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_v11_created_at() {
        let parsed = parse_created_at("Mon May 01 12:00:00 +0000 2023").unwrap();
        assert_eq!(parsed, datetime!(2023-05-01 12:00:00 UTC));
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_created_at("2023-05-01T12:00:00Z").is_err());
        assert!(parse_created_at("").is_err());
    }

    #[test]
    fn extract_minimal() {
        let tweet: Tweet = serde_json::from_value(serde_json::json!({
            "id": 123u64,
            "id_str": "123",
            "text": "hello\nworld",
            "created_at": "Mon May 01 12:00:00 +0000 2023",
            "user": { "id_str": "42", "screen_name": "alice", "name": "Alice" },
            "retweet_count": 1,
            "favorite_count": 2
        }))
        .unwrap();

        let post = post_from_tweet(&tweet).unwrap();
        assert_eq!(post.id, "123");
        assert_eq!(post.text, "hello\nworld");
        assert_eq!(post.created_at, datetime!(2023-05-01 12:00:00 UTC));
    }
}
