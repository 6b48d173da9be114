//! Wrapper around the Twitter v1.1 user-timeline endpoint.
//!
//! Handles OAuth1 signing and request parameter shaping before delegating to
//! the shared HTTP client. The endpoint returns at most one page (up to 200
//! statuses), newest first; that ordering is preserved untouched because the
//! rest of the pipeline depends on it.
use crate::twitter::types::Tweet;
use anyhow::Result;
use scrap_http::{Auth, Credentials, HttpClient, RequestOpts, Signer};
use std::borrow::Cow;

const TIMELINE_PATH: &str = "1.1/statuses/user_timeline.json";

/// Widest window one request can return without pagination.
const MAX_WINDOW: u32 = 200;

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    signer: Signer,
}

impl TwitterApi {
    /// Build a client signing with the given consumer and access credentials.
    pub fn new(consumer: Credentials, access: Credentials) -> Self {
        let http = HttpClient::new("https://api.twitter.com").expect("twitter base url");
        Self {
            http,
            signer: Signer::new(consumer).with_token(access),
        }
    }

    /// Fetch the account's recent timeline, newest first.
    ///
    /// With `since_id` the request is scoped to statuses strictly newer than
    /// that id; without it the endpoint returns the most recent window. A
    /// non-success status is fatal to the run, not retried.
    pub async fn user_timeline(
        &self,
        screen_name: &str,
        since_id: Option<&str>,
    ) -> Result<Vec<Tweet>> {
        let params = timeline_params(screen_name, since_id, MAX_WINDOW);

        let tweets: Vec<Tweet> = self
            .http
            .get_json(
                TIMELINE_PATH,
                RequestOpts {
                    auth: Some(Auth::OAuth1(&self.signer)),
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            screen_name,
            since_id = since_id.unwrap_or("-"),
            fetched = tweets.len(),
            "twitter.timeline.fetched"
        );
        Ok(tweets)
    }
}

/// Shape the timeline query. `since_id` appears only when a cursor exists;
/// its absence asks for the full recent window.
fn timeline_params<'a>(
    screen_name: &'a str,
    since_id: Option<&'a str>,
    count: u32,
) -> Vec<(&'static str, Cow<'a, str>)> {
    let mut params: Vec<(&'static str, Cow<'a, str>)> = vec![
        ("screen_name", screen_name.into()),
        ("count", count.clamp(1, MAX_WINDOW).to_string().into()),
    ];
    if let Some(id) = since_id {
        params.push(("since_id", id.into()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_cursor_the_full_window_is_requested() {
        let params = timeline_params("alice", None, MAX_WINDOW);
        assert_eq!(
            params,
            vec![
                ("screen_name", Cow::Borrowed("alice")),
                ("count", Cow::Owned("200".to_string())),
            ]
        );
    }

    #[test]
    fn cursor_scopes_the_request_with_since_id() {
        let params = timeline_params("alice", Some("987"), MAX_WINDOW);
        assert!(params.contains(&("since_id", Cow::Borrowed("987"))));
    }

    #[test]
    fn count_is_clamped_to_the_endpoint_limit() {
        let params = timeline_params("alice", None, 5000);
        assert!(params.contains(&("count", Cow::Owned("200".to_string()))));
    }
}
