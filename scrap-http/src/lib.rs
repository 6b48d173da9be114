//! Minimal HTTP client with safe logging and OAuth1 signing.
//!
//! - Request options: headers, [`Auth`], query params, timeout
//! - Redacts sensitive query params and never logs secret values
//! - No automatic retries: a failed call is fatal to the run that made it
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), scrap_http::HttpError> {
//! let client = scrap_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", scrap_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Security: OAuth signatures are computed from the credentials but logs only
//! ever include the auth kind (oauth1/none), never key material.

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;

pub mod oauth1;

pub use oauth1::{Credentials, Signer};

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api {
        status: StatusCode,
        message: String,
        body_snippet: String,
    },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Sign the request with OAuth 1.0a (HMAC-SHA1) credentials.
    OAuth1(&'a Signer),
    None,
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use scrap_http::RequestOpts;
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("count", Cow::Borrowed("200"))]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("count", "200".into())]
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use scrap_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET and decode a JSON response body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let (bytes, snippet) = self.request(Method::GET, path, opts).await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            tracing::warn!(
                serde_err=%e.to_string(),
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// POST and parse a `application/x-www-form-urlencoded` response body
    /// (the shape the OAuth token-exchange endpoints answer with).
    pub async fn post_form(
        &self,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<Vec<(String, String)>, HttpError> {
        let (bytes, _snippet) = self.request(Method::POST, path, opts).await?;
        Ok(url::form_urlencoded::parse(&bytes).into_owned().collect())
    }

    // ==============================
    // Core request implementation
    // ==============================

    /// Single-shot send. Success returns the raw body plus a log snippet;
    /// any non-success status becomes [`HttpError::Api`].
    async fn request(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<(Vec<u8>, String), HttpError> {
        // Resolve URL (allow absolute URL when requested).
        let url = if opts.allow_absolute {
            Url::parse(path).or_else(|_| self.base.join(path))
        } else {
            self.base.join(path)
        }
        .map_err(|e| HttpError::Url(e.to_string()))?;

        // ----- Build request -----
        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        rb = rb.timeout(timeout);

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        let auth_kind = match &opts.auth {
            Some(Auth::OAuth1(_)) => "oauth1",
            Some(Auth::None) | None => "none",
        };
        if let Some(Auth::OAuth1(signer)) = &opts.auth {
            // Sign over the query-less URL plus every parameter the request
            // will carry, wherever it ends up.
            let mut signed_params: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            if let Some(q) = &opts.query {
                signed_params
                    .extend(q.iter().map(|(k, v)| (k.to_string(), v.clone().into_owned())));
            }
            let mut base_url = url.clone();
            base_url.set_query(None);
            let header = signer.authorization(method.as_str(), base_url.as_str(), &signed_params);
            let value = reqwest::header::HeaderValue::from_str(&header)
                .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
            rb = rb.header(AUTHORIZATION, value);
        }

        // ----- Safe request logging (pre-send) -----
        let redacted_q = redact_query(opts.query.as_deref());
        tracing::debug!(
            method=%method,
            host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            "http.request.start"
        );

        // ----- Send (single attempt, no retry) -----
        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| {
                let message = err.to_string();
                tracing::warn!(message=%message, "http.network_error.body");
                HttpError::Network(message)
            })?
            .to_vec();
        let dur_ms = t0.elapsed().as_millis() as u64;

        let remain = headers
            .get("x-rate-limit-remaining")
            .and_then(|v| v.to_str().ok());
        tracing::debug!(
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            rate_limit.remaining=?remain,
            "http.response.headers"
        );

        let snippet = snip_body(&bytes);
        tracing::trace!(body_snippet=%snippet, "http.response.body_snippet");

        if status.is_success() {
            return Ok((bytes, snippet));
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            %status,
            message=%message,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            body_snippet: snippet,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // Twitter v1.1: {"errors":[{"code":32,"message":"..."}]}
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(Deserialize)]
    struct TwErr {
        #[serde(default)]
        message: String,
        #[serde(default)]
        code: Option<i64>,
    }

    // Generic: {"message":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().next() {
            if !first.message.is_empty() {
                return match first.code {
                    Some(code) => format!("{} (code {})", first.message, code),
                    None => first.message,
                };
            }
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    snip_body(body)
}

fn redact_query(query: Option<&[(&str, Cow<'_, str>)]>) -> Vec<(String, String)> {
    query
        .map(|q| {
            q.iter()
                .map(|(k, v)| {
                    let is_secret = matches!(
                        k.to_ascii_lowercase().as_str(),
                        "oauth_token"
                            | "oauth_verifier"
                            | "access_token"
                            | "authorization"
                            | "key"
                            | "api_key"
                            | "token"
                            | "secret"
                            | "client_secret"
                    );
                    (
                        (*k).to_string(),
                        if is_secret {
                            "<redacted>".to_string()
                        } else {
                            v.as_ref().to_string()
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_error_body_yields_message_and_code() {
        let body = br#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#;
        assert_eq!(
            extract_error_message(body),
            "Could not authenticate you. (code 32)"
        );
    }

    #[test]
    fn generic_error_bodies_fall_back_in_order() {
        assert_eq!(extract_error_message(br#"{"message":"nope"}"#), "nope");
        assert_eq!(extract_error_message(br#"{"error":"denied"}"#), "denied");
        assert_eq!(extract_error_message(b"plain text"), "plain text");
    }

    #[test]
    fn secret_query_params_are_redacted() {
        let q: Vec<(&str, Cow<'_, str>)> = vec![
            ("screen_name", "alice".into()),
            ("oauth_token", "sekrit".into()),
        ];
        let redacted = redact_query(Some(&q));
        assert_eq!(redacted[0].1, "alice");
        assert_eq!(redacted[1].1, "<redacted>");
    }

    #[test]
    fn long_bodies_are_snipped() {
        let body = vec![b'x'; 600];
        let snip = snip_body(&body);
        assert!(snip.ends_with("..."));
        assert_eq!(snip.len(), 503);
    }
}
