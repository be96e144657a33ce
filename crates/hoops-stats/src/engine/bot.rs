//! Game and season threads

use chrono::{Datelike, Duration, NaiveDate};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::report::{GameOutcome, OutcomeStatus, SeasonPost};
use crate::api::StatsSource;
use crate::config::BotConfig;
use crate::error::{DataError, HoopsError, Result};
use crate::format;
use crate::models::{Injury, ScheduledGame};
use crate::publish::{Post, PostId, Publisher};
use crate::render::{self, GameLabels, PlotRenderer, SeasonLabels};
use crate::stats::{DerivedSeries, GameSummary, WinSeries};

/// Month from which dates belong to the next season
const SEASON_ROLLOVER_MONTH: u32 = 8;

/// Season a date belongs to, named by the year it ends in
pub fn season_for(date: NaiveDate) -> i32 {
    if date.month() >= SEASON_ROLLOVER_MONTH {
        date.year() + 1
    } else {
        date.year()
    }
}

/// Which games a run posts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSelection {
    /// Final games played on this date
    On(NaiveDate),
    /// Final games of the last `lookback_days` days up to `today`
    Recent { today: NaiveDate },
}

/// Runs game and season threads against a stats source and a publisher
pub struct GameBot {
    source: Arc<dyn StatsSource>,
    publisher: Arc<dyn Publisher>,
    renderer: PlotRenderer,
    config: BotConfig,
}

impl GameBot {
    pub fn new(
        source: Arc<dyn StatsSource>,
        publisher: Arc<dyn Publisher>,
        renderer: PlotRenderer,
        config: BotConfig,
    ) -> Self {
        Self {
            source,
            publisher,
            renderer,
            config,
        }
    }

    pub fn publisher_name(&self) -> &str {
        self.publisher.name()
    }

    /// Final games matching `selection`, oldest first
    #[instrument(skip(self))]
    pub async fn select_games(&self, selection: GameSelection) -> Result<Vec<ScheduledGame>> {
        let (from, to) = match selection {
            GameSelection::On(date) => (date, date),
            GameSelection::Recent { today } => {
                (today - Duration::days(i64::from(self.config.lookback_days)), today)
            }
        };

        let mut seasons = vec![season_for(from)];
        if season_for(to) != seasons[0] {
            seasons.push(season_for(to));
        }

        let mut games = Vec::new();
        for season in seasons {
            match self.source.schedule(season).await {
                Ok(schedule) => games.extend(schedule),
                Err(HoopsError::NotFound(page)) => warn!("No schedule for {season} yet ({page})"),
                Err(e) => return Err(e),
            }
        }

        games.retain(|game| game.is_final() && (from..=to).contains(&game.date));
        games.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.as_str().cmp(b.id.as_str())));
        Ok(games)
    }

    /// Post a thread for every selected game; the first failure ends the run
    pub async fn run_games(&self, selection: GameSelection, quote: Option<PostId>) -> Result<Vec<GameOutcome>> {
        let games = self.select_games(selection).await?;
        if games.is_empty() {
            info!("No final games for {selection:?}");
            return Ok(Vec::new());
        }
        info!("Found {} final game(s)", games.len());

        let injuries = self.source.injury_report().await?;
        let mut outcomes = Vec::with_capacity(games.len());
        for game in &games {
            outcomes.push(self.post_game(game, &injuries, quote.clone()).await?);
        }
        Ok(outcomes)
    }

    /// Post the thread of one game:
    /// summary with chart, team stats, top players, injuries, source link
    #[instrument(skip(self, game, injuries, quote), fields(game = %game.id))]
    pub async fn post_game(
        &self,
        game: &ScheduledGame,
        injuries: &[Injury],
        quote: Option<PostId>,
    ) -> Result<GameOutcome> {
        let score = game
            .final_score
            .ok_or_else(|| HoopsError::NotFound(format!("final score of {}", game.id)))?;
        let marker = format::game_marker(game, score);

        if self.publisher.already_published(&marker).await? {
            info!("{marker} already posted");
            return Ok(GameOutcome::skipped(game.id.clone(), marker));
        }

        let events = self.source.play_by_play(game).await?;
        let series = DerivedSeries::from_events(&events)?;
        let summary = GameSummary::from_events(&events)?;

        let labels = GameLabels::for_game(game, score);
        let image = self.renderer.render_game(&series, &labels, &render::game_stem(game))?;

        let mut thread = Vec::new();
        let published = self
            .publisher
            .publish(
                Post::text(format::summary_text(game, score, &summary))
                    .with_image(image.clone())
                    .quoting(quote),
            )
            .await;
        let discarded = render::discard(&image);
        thread.push(published?);
        discarded?;

        let box_score = match self.source.box_score(game).await {
            Ok(box_score) => Some(box_score),
            Err(HoopsError::Data(DataError::MissingTable(table))) => {
                warn!("No box score for {} ({table} missing)", game.id);
                None
            }
            Err(HoopsError::NotFound(page)) => {
                warn!("No box score for {} ({page})", game.id);
                None
            }
            Err(e) => return Err(e),
        };

        let mut replies = vec![format::team_stats_text(box_score.as_ref())];
        if let Some(box_score) = &box_score {
            replies.push(format::top_players_text(box_score));
        }
        replies.extend(format::injury_posts(game, injuries));
        replies.push(format::source_text(&self.source.game_url(game)));

        for text in replies {
            let id = self
                .publisher
                .publish(Post::text(text).reply_to(thread.last().cloned()))
                .await?;
            thread.push(id);
        }

        info!("{marker} posted in {} posts", thread.len());
        Ok(GameOutcome {
            game_id: game.id.clone(),
            marker,
            status: OutcomeStatus::Posted,
            posts: thread,
        })
    }

    /// Post one thread per conference with the win curves of its top teams
    #[instrument(skip(self))]
    pub async fn run_season(&self, today: NaiveDate) -> Result<Vec<SeasonPost>> {
        let season = season_for(today);
        let standings = self.source.standings(season).await?;
        let schedule = self.source.schedule(season).await?;
        let injuries = self.source.injury_report().await?;

        let mut posts = Vec::new();
        for conference in &standings {
            let mut reply_to: Option<PostId> = None;
            for (index, team) in conference.teams.iter().take(self.config.season_teams).enumerate() {
                let rank = index + 1;
                let wins = WinSeries::from_schedule(&team.abbr, &schedule);
                let injury_dates = injuries
                    .iter()
                    .filter(|injury| injury.team_abbr == team.abbr)
                    .map(|injury| injury.date)
                    .collect();
                let labels = SeasonLabels::new(rank, &team.name, &wins, injury_dates);
                let image = self
                    .renderer
                    .render_season(&wins, &labels, &format!("season-{}", team.abbr))?;

                let published = self
                    .publisher
                    .publish(
                        Post::text(format::team_injuries_text(&team.abbr, &injuries))
                            .with_image(image.clone())
                            .reply_to(reply_to.take()),
                    )
                    .await;
                let discarded = render::discard(&image);
                let post = published?;
                discarded?;

                info!("{} {rank}. {}: {}", conference.conference, team.abbr, labels.title);
                posts.push(SeasonPost {
                    conference: conference.conference.clone(),
                    rank,
                    team_abbr: team.abbr.clone(),
                    wins: wins.wins(),
                    games: wins.games(),
                    post: post.clone(),
                });
                reply_to = Some(post);
            }
        }
        Ok(posts)
    }
}
