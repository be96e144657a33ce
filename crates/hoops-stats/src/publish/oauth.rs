//! OAuth 1.0a request signing (HMAC-SHA1)

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use urlencoding::encode;
use uuid::Uuid;

use crate::config::TwitterCredentials;
use crate::error::{HoopsError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Signs requests with a user-context credential set
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: TwitterCredentials,
}

impl OAuthSigner {
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self { credentials }
    }

    /// `Authorization` header for a request with a fresh nonce and timestamp.
    ///
    /// `url` must not carry a query string; query and form parameters go in
    /// `params`. JSON and multipart bodies are not signed.
    pub fn authorization_header(&self, method: &str, url: &str, params: &[(&str, &str)]) -> Result<String> {
        let nonce = Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, params, &nonce, timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let timestamp = timestamp.to_string();
        let oauth_params = [
            ("oauth_consumer_key", self.credentials.api_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let mut all: Vec<(&str, &str)> = params.to_vec();
        all.extend_from_slice(&oauth_params);
        let signature = self.signature(method, url, &all)?;

        let mut header: Vec<(&str, &str)> = oauth_params.to_vec();
        header.push(("oauth_signature", signature.as_str()));
        header.sort_unstable();

        let fields = header
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn signature(&self, method: &str, url: &str, params: &[(&str, &str)]) -> Result<String> {
        let key = format!(
            "{}&{}",
            encode(&self.credentials.api_secret_key),
            encode(&self.credentials.access_token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| HoopsError::ConfigError(format!("Invalid signing key: {e}")))?;
        mac.update(signature_base(method, url, params).as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&url&params`, each part percent-encoded, params sorted after encoding
fn signature_base(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (encode(key).into_owned(), encode(value).into_owned()))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&param_string)
    )
}
