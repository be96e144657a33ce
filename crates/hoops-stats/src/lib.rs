//! NBA game statistics bot
//!
//! This crate fetches NBA game data from basketball-reference.com, derives
//! game flow statistics, renders charts and posts them as threads to
//! X/Twitter. It includes:
//!
//! - Schedule, play-by-play, box score, injury and standings scraping
//! - Score series over elapsed game time, including any number of overtimes
//! - Ties, lead changes, largest lead and time in the lead
//! - PNG and SVG charts of scores, score differential and season wins
//! - OAuth 1.0a signed posting, or a dry run that writes posts to disk
//!
//! # Architecture
//!
//! [`GameBot`] drives one run: it selects games from a [`StatsSource`],
//! turns their play-by-play into a [`DerivedSeries`] and a [`GameSummary`],
//! renders a chart with [`PlotRenderer`] and hands the posts of the thread
//! to a [`Publisher`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hoops_stats::{BasketballReferenceClient, BotConfig, DryRunPublisher, GameBot, GameSelection, PlotRenderer};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::default();
//!     let bot = GameBot::new(
//!         Arc::new(BasketballReferenceClient::from_config(&config)?),
//!         Arc::new(DryRunPublisher::new(config.output_dir.join("posts"), config.post_char_limit)),
//!         PlotRenderer::new(&config),
//!         config,
//!     );
//!
//!     let today = chrono::Local::now().date_naive();
//!     for outcome in bot.run_games(GameSelection::Recent { today }, None).await? {
//!         println!("{}: {}", outcome.marker, outcome.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod models;
pub mod publish;
pub mod render;
pub mod stats;
pub mod teams;

// Re-export main types for convenience
pub use api::{BasketballReferenceClient, StatsSource};
pub use config::{BotConfig, ChartKind, ImageFormat, TwitterCredentials};
pub use engine::{GameBot, GameOutcome, GameSelection, OutcomeStatus, SeasonPost, season_for};
pub use error::{DataError, HoopsError, Result};
pub use models::{BoxScore, GameEvent, GameId, Injury, ScheduledGame, Score, Team};
pub use publish::{DryRunPublisher, Post, PostId, Publisher, TwitterPublisher};
pub use render::{PlotRenderer, RenderedImage};
pub use stats::{DerivedSeries, GameSummary, WinSeries};
