//! Stats data sources

pub mod basketball_reference;
pub mod parse;

pub use basketball_reference::BasketballReferenceClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BoxScore, ConferenceStandings, GameEvent, Injury, ScheduledGame};

/// Source of schedules, play-by-play, box scores and injury reports
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// All games of a season, regular season and playoffs.
    ///
    /// `season` is the year the season ends in, e.g. 2021 for 2020-21.
    async fn schedule(&self, season: i32) -> Result<Vec<ScheduledGame>>;

    /// Play-by-play events of a game in chronological order
    async fn play_by_play(&self, game: &ScheduledGame) -> Result<Vec<GameEvent>>;

    /// Basic box score of a game
    async fn box_score(&self, game: &ScheduledGame) -> Result<BoxScore>;

    /// Current league-wide injury report
    async fn injury_report(&self) -> Result<Vec<Injury>>;

    /// Conference standings of a season
    async fn standings(&self, season: i32) -> Result<Vec<ConferenceStandings>>;

    /// Public page a reader can follow for more data on the game
    fn game_url(&self, game: &ScheduledGame) -> String;
}
