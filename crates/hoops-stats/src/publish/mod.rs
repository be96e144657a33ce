//! Posting to a social account
//!
//! [`TwitterPublisher`] talks to the X/Twitter API; [`DryRunPublisher`]
//! writes posts to disk instead.

pub mod dry_run;
pub mod oauth;
pub mod twitter;

pub use dry_run::DryRunPublisher;
pub use oauth::OAuthSigner;
pub use twitter::TwitterPublisher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::RenderedImage;

/// Identifier of a published post
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A post to publish
#[derive(Debug, Clone, Default)]
pub struct Post {
    pub text: String,
    pub image: Option<RenderedImage>,
    /// Post this one replies to
    pub reply_to: Option<PostId>,
    /// Post this one quotes
    pub quote: Option<PostId>,
}

impl Post {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: RenderedImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn reply_to(mut self, id: Option<PostId>) -> Self {
        self.reply_to = id;
        self
    }

    pub fn quoting(mut self, id: Option<PostId>) -> Self {
        self.quote = id;
        self
    }
}

/// Destination of posts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publisher name for logs and reports
    fn name(&self) -> &str;

    /// Publish a post, returning its id
    async fn publish(&self, post: Post) -> Result<PostId>;

    /// Whether a recent post of the account contains `marker`
    async fn already_published(&self, _marker: &str) -> Result<bool> {
        Ok(false)
    }
}
