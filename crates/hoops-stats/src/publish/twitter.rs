//! X/Twitter publisher
//!
//! Images go through the v1.1 media upload endpoint, posts through
//! `POST /2/tweets`. Every request is OAuth 1.0a signed. Failures are
//! returned as-is; nothing is retried.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::{OAuthSigner, Post, PostId, Publisher};
use crate::config::BotConfig;
use crate::error::{HoopsError, Result};
use crate::render::RenderedImage;

const PROVIDER: &str = "twitter";
/// Recent posts searched for a duplicate marker
const RECENT_POSTS: &str = "20";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Media {
    media_id_string: String,
}

/// Posts to X/Twitter
pub struct TwitterPublisher {
    client: Client,
    signer: OAuthSigner,
    api_base: String,
    upload_base: String,
    char_limit: usize,
}

impl TwitterPublisher {
    /// Create a publisher; fails without credentials
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let credentials = config.require_credentials()?.clone();
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            signer: OAuthSigner::new(credentials),
            api_base: config.twitter_api_base.trim_end_matches('/').to_string(),
            upload_base: config.twitter_upload_base.trim_end_matches('/').to_string(),
            char_limit: config.post_char_limit,
        })
    }

    #[instrument(skip(self, image), fields(path = %image.path.display()))]
    async fn upload_media(&self, image: &RenderedImage) -> Result<String> {
        let url = format!("{}/1.1/media/upload.json", self.upload_base);
        let file_name = image
            .path
            .file_name()
            .map_or_else(|| format!("chart.{}", image.format.extension()), |n| n.to_string_lossy().into_owned());
        let part = Part::bytes(image.bytes.clone())
            .file_name(file_name)
            .mime_str(image.format.mime_type())?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.signer.authorization_header("POST", &url, &[])?)
            .multipart(Form::new().part("media", part))
            .send()
            .await?;

        let media: Media = check(response).await?.json().await?;
        debug!("Uploaded media {}", media.media_id_string);
        Ok(media.media_id_string)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("Authorization", self.signer.authorization_header("GET", url, query)?)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self, post), fields(reply_to = ?post.reply_to, quote = ?post.quote))]
    async fn publish(&self, post: Post) -> Result<PostId> {
        let media_id = match &post.image {
            Some(image) => Some(self.upload_media(image).await?),
            None => None,
        };

        let text = hoops_utils::truncate_chars(&post.text, self.char_limit);
        let body = tweet_body(text, media_id.as_deref(), post.reply_to.as_ref(), post.quote.as_ref());

        let url = format!("{}/2/tweets", self.api_base);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.signer.authorization_header("POST", &url, &[])?)
            .json(&body)
            .send()
            .await?;

        let created: Envelope<Created> = check(response).await?.json().await?;
        info!("Posted {}", created.data.id);
        Ok(PostId(created.data.id))
    }

    #[instrument(skip(self))]
    async fn already_published(&self, marker: &str) -> Result<bool> {
        let me: Envelope<User> = self.get(&format!("{}/2/users/me", self.api_base), &[]).await?;
        let timeline: Timeline = self
            .get(
                &format!("{}/2/users/{}/tweets", self.api_base, me.data.id),
                &[("max_results", RECENT_POSTS)],
            )
            .await?;
        Ok(timeline.data.iter().any(|tweet| tweet.text.contains(marker)))
    }
}

/// JSON body of `POST /2/tweets`
fn tweet_body(text: &str, media_id: Option<&str>, reply_to: Option<&PostId>, quote: Option<&PostId>) -> Value {
    let mut body = json!({ "text": text });
    if let Some(id) = media_id {
        body["media"] = json!({ "media_ids": [id] });
    }
    if let Some(id) = reply_to {
        body["reply"] = json!({ "in_reply_to_tweet_id": id.as_str() });
    }
    if let Some(id) = quote {
        body["quote_tweet_id"] = json!(id.as_str());
    }
    body
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reset_at = response
        .headers()
        .get("x-rate-limit-reset")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok());
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, reset_at, body))
}

fn status_error(status: StatusCode, reset_at: Option<i64>, body: String) -> HoopsError {
    match status.as_u16() {
        401 | 403 => HoopsError::AuthenticationFailed {
            provider: PROVIDER.to_string(),
            message: body,
        },
        429 => HoopsError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
            reset_at,
        },
        _ => HoopsError::ApiError(format!("HTTP {status}: {body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TwitterCredentials;

    fn config() -> BotConfig {
        BotConfig::builder()
            .credentials(TwitterCredentials {
                api_key: "key".to_string(),
                api_secret_key: "secret".to_string(),
                access_token: "token".to_string(),
                access_token_secret: "token-secret".to_string(),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_requires_credentials() {
        let err = TwitterPublisher::from_config(&BotConfig::default()).err().unwrap();
        assert!(matches!(err, HoopsError::ConfigError(_)));
        assert!(TwitterPublisher::from_config(&config()).is_ok());
    }

    #[test]
    fn test_tweet_body() {
        let plain = tweet_body("hello", None, None, None);
        assert_eq!(plain, json!({ "text": "hello" }));

        let full = tweet_body("hi", Some("77"), Some(&PostId::new("1")), Some(&PostId::new("2")));
        assert_eq!(full["media"]["media_ids"], json!(["77"]));
        assert_eq!(full["reply"]["in_reply_to_tweet_id"], "1");
        assert_eq!(full["quote_tweet_id"], "2");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, None, "bad".into()),
            HoopsError::AuthenticationFailed { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, None, String::new()),
            HoopsError::AuthenticationFailed { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, Some(1_700_000_000), String::new()),
            HoopsError::RateLimitExceeded { reset_at: Some(1_700_000_000), .. }
        ));
        let err = status_error(StatusCode::BAD_REQUEST, None, "duplicate".into());
        assert_eq!(err.to_string(), "API error: HTTP 400 Bad Request: duplicate");
    }

    #[tokio::test]
    #[ignore = "posts to a live account"]
    async fn test_live_duplicate_check() {
        let config = BotConfig::builder().with_env_credentials().build().unwrap();
        let publisher = TwitterPublisher::from_config(&config).unwrap();
        assert!(!publisher.already_published("#no-such-marker-ever").await.unwrap());
    }
}
