//! basketball-reference.com client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::StatsSource;
use super::parse;
use crate::config::BotConfig;
use crate::error::{HoopsError, Result};
use crate::models::{BoxScore, ConferenceStandings, GameEvent, Injury, ScheduledGame};

/// Default base URL of the stats site
pub const BASE_URL: &str = "https://www.basketball-reference.com";

/// basketball-reference.com client
#[derive(Debug, Clone)]
pub struct BasketballReferenceClient {
    client: Client,
    base_url: String,
}

impl BasketballReferenceClient {
    /// Create a client with the given base URL, timeout and user agent
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the bot configuration
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(
            config.stats_base_url.clone(),
            config.request_timeout,
            &config.user_agent,
        )
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Fetch a page as text
    #[instrument(skip(self))]
    async fn get_page(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            status if status.is_success() => {
                let html = response.text().await?;
                debug!("Fetched {} bytes from {}", html.len(), url);
                Ok(html)
            }
            StatusCode::NOT_FOUND => Err(HoopsError::NotFound(url)),
            status => Err(HoopsError::FetchError(format!("HTTP {status} for {url}"))),
        }
    }
}

#[async_trait]
impl StatsSource for BasketballReferenceClient {
    async fn schedule(&self, season: i32) -> Result<Vec<ScheduledGame>> {
        let index = self.get_page(&format!("leagues/NBA_{season}_games.html")).await?;
        let months = parse::parse_schedule_months(&index)?;

        // A season page without a month filter lists every game itself
        if months.is_empty() {
            return Ok(parse::parse_schedule(&index)?);
        }

        let mut games = Vec::new();
        let mut playoffs = false;
        for month in months {
            let html = match self.get_page(&month).await {
                Ok(html) => html,
                // Months of an ongoing season are listed before they exist
                Err(HoopsError::NotFound(url)) => {
                    debug!("Skipping missing schedule page {}", url);
                    continue;
                }
                Err(e) => return Err(e),
            };
            for mut game in parse::parse_schedule(&html)? {
                // The playoffs separator only shows on the month they start in
                playoffs |= game.playoffs;
                game.playoffs = playoffs;
                games.push(game);
            }
        }

        info!("Fetched {} games of the {} season", games.len(), season);
        Ok(games)
    }

    async fn play_by_play(&self, game: &ScheduledGame) -> Result<Vec<GameEvent>> {
        let html = self.get_page(&format!("boxscores/pbp/{}.html", game.id)).await?;
        Ok(parse::parse_play_by_play(&html)?)
    }

    async fn box_score(&self, game: &ScheduledGame) -> Result<BoxScore> {
        let html = self.get_page(&format!("boxscores/{}.html", game.id)).await?;
        Ok(parse::parse_box_score(&html, &game.away.abbr, &game.home.abbr)?)
    }

    async fn injury_report(&self) -> Result<Vec<Injury>> {
        let html = self.get_page("friv/injuries.fcgi").await?;
        Ok(parse::parse_injury_report(&html)?)
    }

    async fn standings(&self, season: i32) -> Result<Vec<ConferenceStandings>> {
        let html = self.get_page(&format!("leagues/NBA_{season}_standings.html")).await?;
        Ok(parse::parse_standings(&html)?)
    }

    fn game_url(&self, game: &ScheduledGame) -> String {
        self.url(&format!("boxscores/pbp/{}.html", game.id))
    }
}
