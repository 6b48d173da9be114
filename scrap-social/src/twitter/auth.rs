//! Interactive PIN-based OAuth1 authorization, with a cached access token.
//!
//! The three-legged flow runs at most once per install: request token →
//! user authorizes in a browser and reads back a PIN → access token. The
//! result is cached through [`scrap_store`] and reused on every later run.
//!
//! A rejected token exchange aborts cleanly. Continuing past it with an
//! undefined token is never correct: every later request would fail with a
//! worse diagnostic.

use anyhow::{bail, Context, Result};
use scrap_http::{Auth, Credentials, HttpClient, RequestOpts, Signer};
use scrap_store::{BlobStore, StoredToken, TOKEN_KEY};

const REQUEST_TOKEN_PATH: &str = "oauth/request_token";
const ACCESS_TOKEN_PATH: &str = "oauth/access_token";
const AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";

/// How the PIN from the authorize page reaches the flow.
///
/// The interactive default reads stdin; tests and non-interactive
/// environments plug in a fixed verifier instead.
pub trait VerifierPrompt {
    fn verifier(&self, authorize_url: &str) -> Result<String>;
}

/// Blocking console prompt, the interactive default.
pub struct StdinPrompt;

impl VerifierPrompt for StdinPrompt {
    fn verifier(&self, authorize_url: &str) -> Result<String> {
        use std::io::Write;

        println!("Please go here and authorize: {authorize_url}");
        print!("Paste the PIN here: ");
        std::io::stdout().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("failed to read PIN")?;
        Ok(line.trim().to_string())
    }
}

fn field<'a>(pairs: &'a [(String, String)], name: &str) -> Result<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .with_context(|| format!("token response missing {name}"))
}

/// Run the full three-legged flow and return the issued access token.
pub async fn authorize(
    http: &HttpClient,
    consumer: &Credentials,
    prompt: &dyn VerifierPrompt,
) -> Result<StoredToken> {
    // Leg 1: request token (PIN flow, so the callback is out-of-band).
    let signer = Signer::new(consumer.clone()).with_callback("oob");
    let pairs = http
        .post_form(
            REQUEST_TOKEN_PATH,
            RequestOpts {
                auth: Some(Auth::OAuth1(&signer)),
                ..Default::default()
            },
        )
        .await
        .context("request token exchange rejected; there may be an issue with the consumer_key or consumer_secret")?;
    let request_token = Credentials::new(
        field(&pairs, "oauth_token")?,
        field(&pairs, "oauth_token_secret")?,
    );
    tracing::info!(oauth_token = %request_token.key, "twitter.auth.request_token");

    // Leg 2: the user authorizes in a browser and supplies the PIN.
    let authorize_url = format!("{AUTHORIZE_URL}?oauth_token={}", request_token.key);
    let verifier = prompt.verifier(&authorize_url)?;
    if verifier.is_empty() {
        bail!("empty PIN; authorization aborted");
    }

    // Leg 3: trade the verified request token for an access token.
    let signer = Signer::new(consumer.clone())
        .with_token(request_token)
        .with_verifier(verifier);
    let pairs = http
        .post_form(
            ACCESS_TOKEN_PATH,
            RequestOpts {
                auth: Some(Auth::OAuth1(&signer)),
                ..Default::default()
            },
        )
        .await
        .context("access token exchange rejected")?;

    Ok(StoredToken {
        token: field(&pairs, "oauth_token")?.to_string(),
        secret: field(&pairs, "oauth_token_secret")?.to_string(),
        screen_name: field(&pairs, "screen_name").ok().map(str::to_string),
    })
}

/// Return the cached access token, running the interactive flow only when
/// no cache exists yet.
pub async fn load_or_authorize(
    store: &dyn BlobStore,
    http: &HttpClient,
    consumer: &Credentials,
    prompt: &dyn VerifierPrompt,
) -> Result<StoredToken> {
    if let Some(token) = scrap_store::get_json::<StoredToken>(store, TOKEN_KEY).await? {
        tracing::debug!("twitter.auth.cached_token");
        return Ok(token);
    }

    let token = authorize(http, consumer, prompt).await?;
    scrap_store::put_json(store, TOKEN_KEY, &token).await?;
    tracing::info!(screen_name = ?token.screen_name, "twitter.auth.token_cached");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrap_store::MemoryStore;

    struct NeverPrompt;

    impl VerifierPrompt for NeverPrompt {
        fn verifier(&self, _authorize_url: &str) -> Result<String> {
            panic!("prompt must not run when a cached token exists");
        }
    }

    #[test]
    fn field_lookup_reports_missing_keys() {
        let pairs = vec![("oauth_token".to_string(), "tk".to_string())];
        assert_eq!(field(&pairs, "oauth_token").unwrap(), "tk");
        let err = field(&pairs, "oauth_token_secret").unwrap_err();
        assert!(err.to_string().contains("oauth_token_secret"));
    }

    #[tokio::test]
    async fn cached_token_short_circuits_the_interactive_flow() {
        let store = MemoryStore::new();
        let cached = StoredToken {
            token: "tk".into(),
            secret: "ts".into(),
            screen_name: Some("alice".into()),
        };
        scrap_store::put_json(&store, TOKEN_KEY, &cached).await.unwrap();

        let http = HttpClient::new("https://api.twitter.com").unwrap();
        let consumer = Credentials::new("ck", "cs");
        let token = load_or_authorize(&store, &http, &consumer, &NeverPrompt)
            .await
            .unwrap();
        assert_eq!(token, cached);
    }
}
