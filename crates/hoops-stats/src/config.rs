//! Configuration for fetching, rendering and posting

use crate::api::basketball_reference::BASE_URL;
use crate::error::{HoopsError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default X/Twitter API base
pub const TWITTER_API_BASE: &str = "https://api.twitter.com";
/// Default X/Twitter media upload base
pub const TWITTER_UPLOAD_BASE: &str = "https://upload.twitter.com";
/// Longest post text; one below the platform limit of 280
pub const POST_CHAR_LIMIT: usize = 279;

/// Image format of rendered charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// What the game chart shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Both teams' running scores
    #[default]
    Scores,
    /// Away minus home over time
    Differential,
}

/// OAuth 1.0a user-context credentials of the posting account
#[derive(Clone, Serialize, Deserialize)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret_key: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret_key", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl TwitterCredentials {
    /// Load from `API_KEY`, `API_SECRET_KEY`, `ACCESS_TOKEN` and
    /// `ACCESS_TOKEN_SECRET`
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| HoopsError::ConfigError(format!("{name} environment variable not set")))
        };

        Ok(Self {
            api_key: var("API_KEY")?,
            api_secret_key: var("API_SECRET_KEY")?,
            access_token: var("ACCESS_TOKEN")?,
            access_token_secret: var("ACCESS_TOKEN_SECRET")?,
        })
    }
}

/// Configuration of a bot run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Base URL of the stats site
    pub stats_base_url: String,

    /// Base URL of the posting API
    pub twitter_api_base: String,

    /// Base URL of the media upload API
    pub twitter_upload_base: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// User agent sent to the stats site
    pub user_agent: String,

    /// Directory for transient chart images
    pub output_dir: PathBuf,

    /// Format of rendered charts
    pub image_format: ImageFormat,

    /// What the game chart shows
    pub chart_kind: ChartKind,

    /// TrueType font for chart text; common system fonts are tried if unset
    pub font_path: Option<PathBuf>,

    /// Without a date, games from this many days before today are posted
    pub lookback_days: u32,

    /// Longest post text
    pub post_char_limit: usize,

    /// Teams per conference in the season thread
    pub season_teams: usize,

    /// Posting credentials; required unless running dry
    pub credentials: Option<TwitterCredentials>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            stats_base_url: BASE_URL.to_string(),
            twitter_api_base: TWITTER_API_BASE.to_string(),
            twitter_upload_base: TWITTER_UPLOAD_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("hoops-bot/{}", env!("CARGO_PKG_VERSION")),
            output_dir: std::env::temp_dir().join("hoops-bot"),
            image_format: ImageFormat::Png,
            chart_kind: ChartKind::Scores,
            font_path: None,
            lookback_days: 2,
            post_char_limit: POST_CHAR_LIMIT,
            season_teams: 10,
            credentials: None,
        }
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.post_char_limit == 0 {
            return Err(HoopsError::ConfigError(
                "post_char_limit must be greater than 0".to_string(),
            ));
        }

        if self.season_teams == 0 {
            return Err(HoopsError::ConfigError(
                "season_teams must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(HoopsError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("stats_base_url", &self.stats_base_url),
            ("twitter_api_base", &self.twitter_api_base),
            ("twitter_upload_base", &self.twitter_upload_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HoopsError::ConfigError(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }

    /// Credentials, or a configuration error when they are missing
    pub fn require_credentials(&self) -> Result<&TwitterCredentials> {
        self.credentials.as_ref().ok_or_else(|| {
            HoopsError::ConfigError("posting credentials are not configured".to_string())
        })
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    stats_base_url: Option<String>,
    twitter_api_base: Option<String>,
    twitter_upload_base: Option<String>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
    output_dir: Option<PathBuf>,
    image_format: Option<ImageFormat>,
    chart_kind: Option<ChartKind>,
    font_path: Option<PathBuf>,
    lookback_days: Option<u32>,
    post_char_limit: Option<usize>,
    season_teams: Option<usize>,
    credentials: Option<TwitterCredentials>,
}

impl BotConfigBuilder {
    /// Set the stats site base URL
    pub fn stats_base_url(mut self, url: impl Into<String>) -> Self {
        self.stats_base_url = Some(url.into());
        self
    }

    /// Set the posting API base URL
    pub fn twitter_api_base(mut self, url: impl Into<String>) -> Self {
        self.twitter_api_base = Some(url.into());
        self
    }

    /// Set the media upload base URL
    pub fn twitter_upload_base(mut self, url: impl Into<String>) -> Self {
        self.twitter_upload_base = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the directory for chart images
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = Some(format);
        self
    }

    pub fn chart_kind(mut self, kind: ChartKind) -> Self {
        self.chart_kind = Some(kind);
        self
    }

    /// Set the TrueType font used for chart text
    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = Some(days);
        self
    }

    pub fn post_char_limit(mut self, limit: usize) -> Self {
        self.post_char_limit = Some(limit);
        self
    }

    pub fn season_teams(mut self, teams: usize) -> Self {
        self.season_teams = Some(teams);
        self
    }

    /// Set posting credentials
    pub fn credentials(mut self, credentials: TwitterCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Load posting credentials from the environment when all are set
    pub fn with_env_credentials(mut self) -> Self {
        if let Ok(credentials) = TwitterCredentials::from_env() {
            self.credentials = Some(credentials);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();

        let config = BotConfig {
            stats_base_url: self.stats_base_url.unwrap_or(defaults.stats_base_url),
            twitter_api_base: self.twitter_api_base.unwrap_or(defaults.twitter_api_base),
            twitter_upload_base: self.twitter_upload_base.unwrap_or(defaults.twitter_upload_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            image_format: self.image_format.unwrap_or(defaults.image_format),
            chart_kind: self.chart_kind.unwrap_or(defaults.chart_kind),
            font_path: self.font_path.or(defaults.font_path),
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            post_char_limit: self.post_char_limit.unwrap_or(defaults.post_char_limit),
            season_teams: self.season_teams.unwrap_or(defaults.season_teams),
            credentials: self.credentials,
        };

        config.validate()?;
        Ok(config)
    }
}
