//! Error types for fetching, transforming, rendering and posting

use thiserror::Error;

/// Malformed or inconsistent game data
///
/// Raised instead of producing a partial or misleading chart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// An event carries no resulting score
    #[error("event {index} has no score")]
    MissingScore { index: usize },

    /// Score text that is not `away-home`
    #[error("invalid score '{0}'")]
    InvalidScore(String),

    /// Game clock text that is not `M:SS[.t]`
    #[error("invalid game clock '{0}'")]
    InvalidClock(String),

    /// Clock remaining is longer than the period itself
    #[error("event {index}: {remaining} left in period {period}, which only lasts {length}")]
    ClockOutOfRange {
        index: usize,
        period: u8,
        remaining: String,
        length: String,
    },

    /// Period numbers start at 1
    #[error("event {index} has invalid period {period}")]
    InvalidPeriod { index: usize, period: u8 },

    /// Events must be in chronological order
    #[error("event {index} happens before the event preceding it")]
    OutOfOrder { index: usize },

    /// Expected table is not on the page
    #[error("table '{0}' not found")]
    MissingTable(String),

    /// Row that cannot be read
    #[error("malformed row in '{table}': {reason}")]
    MalformedRow { table: String, reason: String },

    /// Team name that is not an NBA franchise
    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    /// Date text that cannot be parsed
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// CSS selector that does not compile
    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
}

/// Errors surfaced by the bot
#[derive(Debug, Error)]
pub enum HoopsError {
    /// The stats site answered with an error status
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// Requested page or resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed stats data
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Chart rendering failed
    #[error("Render error: {0}")]
    RenderError(String),

    /// Credentials rejected by the social platform
    #[error("Authentication failed for {provider}: {message}")]
    AuthenticationFailed { provider: String, message: String },

    /// Rate limit hit on the social platform
    #[error("Rate limit exceeded for {provider}{}", .reset_at.map(|t| format!(" (resets at {t})")).unwrap_or_default())]
    RateLimitExceeded {
        provider: String,
        reset_at: Option<i64>,
    },

    /// Any other API failure while posting
    #[error("API error: {0}")]
    ApiError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem error while writing transient output
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for hoops operations
pub type Result<T> = std::result::Result<T, HoopsError>;
