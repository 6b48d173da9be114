//! OAuth 1.0a request signing (HMAC-SHA1) for the Twitter v1.1 API.
//!
//! Implements the RFC 5849 signature dance: percent-encode every parameter
//! with the unreserved set, sort the normalized pairs, build the
//! `METHOD&url&params` base string, and MAC it with
//! `consumer_secret&token_secret`. The [`Signer`] carries whichever
//! credentials the current leg of the flow has (consumer only for the
//! request-token leg, consumer + access token for signed API calls).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything except ALPHA / DIGIT / `-` / `.` / `_` / `~` is escaped
/// (RFC 5849 §3.6).
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode one parameter name or value.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// A key/secret pair: consumer credentials or an issued token.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

/// Builds `Authorization: OAuth ...` headers for one leg of the flow.
#[derive(Clone, Debug)]
pub struct Signer {
    consumer: Credentials,
    token: Option<Credentials>,
    verifier: Option<String>,
    callback: Option<String>,
}

impl Signer {
    pub fn new(consumer: Credentials) -> Self {
        Self {
            consumer,
            token: None,
            verifier: None,
            callback: None,
        }
    }

    /// Attach an issued token (request token or access token).
    pub fn with_token(mut self, token: Credentials) -> Self {
        self.token = Some(token);
        self
    }

    /// Attach the PIN from the authorize step (access-token leg only).
    pub fn with_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.verifier = Some(verifier.into());
        self
    }

    /// Attach `oauth_callback` (request-token leg only; `"oob"` for PIN flow).
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// Sign a request with a fresh nonce and the current clock.
    ///
    /// `base_url` must not carry a query string; every query or form
    /// parameter the request will send goes in `params`.
    pub fn authorization(&self, method: &str, base_url: &str, params: &[(String, String)]) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.authorization_at(method, base_url, params, &nonce, timestamp)
    }

    /// Deterministic core of [`Signer::authorization`]; tests inject
    /// `nonce` and `timestamp` here.
    pub fn authorization_at(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: u64,
    ) -> String {
        let mut oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer.key.clone()),
            ("oauth_nonce".into(), nonce.to_string()),
            ("oauth_signature_method".into(), "HMAC-SHA1".into()),
            ("oauth_timestamp".into(), timestamp.to_string()),
            ("oauth_version".into(), "1.0".into()),
        ];
        if let Some(token) = &self.token {
            oauth_params.push(("oauth_token".into(), token.key.clone()));
        }
        if let Some(verifier) = &self.verifier {
            oauth_params.push(("oauth_verifier".into(), verifier.clone()));
        }
        if let Some(callback) = &self.callback {
            oauth_params.push(("oauth_callback".into(), callback.clone()));
        }

        let mut all: Vec<(String, String)> = Vec::with_capacity(params.len() + oauth_params.len());
        all.extend_from_slice(params);
        all.extend(oauth_params.iter().cloned());
        let base = signature_base_string(method, base_url, &all);

        let mut mac = Hmac::<Sha1>::new_from_slice(self.signing_key().as_bytes())
            .expect("hmac accepts any key length");
        mac.update(base.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        oauth_params.push(("oauth_signature".into(), signature));
        oauth_params.sort();
        let joined = oauth_params
            .iter()
            .map(|(k, v)| format!(r#"{}="{}""#, percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {joined}")
    }

    fn signing_key(&self) -> String {
        let token_secret = self.token.as_ref().map(|t| t.secret.as_str()).unwrap_or("");
        format!(
            "{}&{}",
            percent_encode(&self.consumer.secret),
            percent_encode(token_secret)
        )
    }
}

/// `METHOD&enc(url)&enc(sorted normalized params)` per RFC 5849 §3.4.1.
fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn encodes_with_unreserved_set() {
        assert_eq!(
            percent_encode("Hello Ladies + Gentlemen, a signed OAuth request!"),
            "Hello%20Ladies%20%2B%20Gentlemen%2C%20a%20signed%20OAuth%20request%21"
        );
        assert_eq!(percent_encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(percent_encode("az09-._~"), "az09-._~");
    }

    #[test]
    fn base_string_sorts_and_double_encodes() {
        let params = vec![
            pair("screen_name", "alice"),
            pair("count", "200"),
            pair("oauth_consumer_key", "ck"),
            pair("oauth_nonce", "abc"),
            pair("oauth_signature_method", "HMAC-SHA1"),
            pair("oauth_timestamp", "1318622958"),
            pair("oauth_version", "1.0"),
        ];
        let base = signature_base_string(
            "get",
            "https://api.twitter.com/1.1/statuses/user_timeline.json",
            &params,
        );
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fuser_timeline.json&\
             count%3D200%26oauth_consumer_key%3Dck%26oauth_nonce%3Dabc%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26\
             oauth_version%3D1.0%26screen_name%3Dalice"
        );
    }

    #[test]
    fn header_carries_sorted_oauth_params_and_signature() {
        let signer = Signer::new(Credentials::new("ck", "cs"))
            .with_token(Credentials::new("tk", "ts"));
        let header = signer.authorization_at(
            "GET",
            "https://api.twitter.com/1.1/statuses/user_timeline.json",
            &[pair("screen_name", "alice")],
            "nonce-nonce",
            1318622958,
        );
        assert!(header.starts_with("OAuth oauth_consumer_key=\"ck\""));
        assert!(header.contains(r#"oauth_nonce="nonce-nonce""#));
        assert!(header.contains(r#"oauth_signature_method="HMAC-SHA1""#));
        assert!(header.contains(r#"oauth_timestamp="1318622958""#));
        assert!(header.contains(r#"oauth_token="tk""#));
        assert!(header.contains("oauth_signature="));
        // Request parameters are signed over but never placed in the header.
        assert!(!header.contains("screen_name"));
    }

    #[test]
    fn signature_is_a_base64_sha1_mac() {
        let signer = Signer::new(Credentials::new("ck", "cs"));
        let header =
            signer.authorization_at("POST", "https://api.twitter.com/oauth/request_token", &[], "n", 1);
        let sig_field = header
            .split(", ")
            .find(|part| part.starts_with("oauth_signature="))
            .expect("signature present");
        let encoded = sig_field
            .trim_start_matches("oauth_signature=\"")
            .trim_end_matches('"');
        // The header value is percent-encoded; undo that before base64.
        let raw: String = {
            let mut out = String::new();
            let mut bytes = encoded.bytes();
            while let Some(b) = bytes.next() {
                if b == b'%' {
                    let hi = bytes.next().unwrap();
                    let lo = bytes.next().unwrap();
                    let hex = [hi, lo];
                    let s = std::str::from_utf8(&hex).unwrap();
                    out.push(u8::from_str_radix(s, 16).unwrap() as char);
                } else {
                    out.push(b as char);
                }
            }
            out
        };
        let mac = BASE64.decode(raw.as_bytes()).expect("valid base64");
        assert_eq!(mac.len(), 20, "HMAC-SHA1 output is 20 bytes");
    }

    #[test]
    fn same_inputs_sign_identically() {
        let signer = Signer::new(Credentials::new("ck", "cs"));
        let params = vec![pair("count", "200")];
        let a = signer.authorization_at("GET", "https://example.com/x", &params, "n", 7);
        let b = signer.authorization_at("GET", "https://example.com/x", &params, "n", 7);
        assert_eq!(a, b);
    }
}
