//! Game, event and box-score types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Seconds in a regulation quarter
pub const QUARTER_SECONDS: u32 = 12 * 60;
/// Seconds in an overtime period
pub const OVERTIME_SECONDS: u32 = 5 * 60;
/// Number of regulation periods
pub const REGULATION_PERIODS: u8 = 4;

/// Identifier of a game on the stats site, e.g. `202105220MIL`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the id the stats site uses: date, a `0` and the home team code
    pub fn from_parts(date: NaiveDate, home_abbr: &str) -> Self {
        Self(format!("{}0{}", date.format("%Y%m%d"), home_abbr))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A team as it appears in schedules and standings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    /// Full name, e.g. "Milwaukee Bucks"
    pub name: String,
    /// Stats-site code, e.g. "MIL"
    pub abbr: String,
}

/// Score tuple, away team first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub away: u32,
    pub home: u32,
}

impl Score {
    pub fn new(away: u32, home: u32) -> Self {
        Self { away, home }
    }

    /// Away minus home
    pub fn differential(&self) -> i32 {
        self.away as i32 - self.home as i32
    }

    pub fn max(&self) -> u32 {
        self.away.max(self.home)
    }
}

impl FromStr for Score {
    type Err = DataError;

    /// Parses `away-home`, e.g. `102-99`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DataError::InvalidScore(s.to_string());
        let (away, home) = s.trim().split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            away: away.trim().parse().map_err(|_| invalid())?,
            home: home.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.away, self.home)
    }
}

/// Time remaining in a period, in tenths of a second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameClock(u32);

impl GameClock {
    pub fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds * 10)
    }

    pub fn tenths(&self) -> u32 {
        self.0
    }

    pub fn seconds(&self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl FromStr for GameClock {
    type Err = DataError;

    /// Parses `M:SS` or `M:SS.t`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DataError::InvalidClock(s.to_string());
        let (minutes, rest) = s.trim().split_once(':').ok_or_else(invalid)?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        let (seconds, tenths) = match rest.split_once('.') {
            Some((secs, frac)) => {
                let digit = frac.chars().next().and_then(|c| c.to_digit(10));
                (secs, digit.ok_or_else(invalid)?)
            }
            None => (rest, 0),
        };
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        minutes
            .checked_mul(60)
            .and_then(|secs| secs.checked_add(seconds))
            .and_then(|secs| secs.checked_mul(10))
            .and_then(|t| t.checked_add(tenths))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.0 / 10;
        write!(f, "{}:{:02}.{}", seconds / 60, seconds % 60, self.0 % 10)
    }
}

/// Length of a period: four 12-minute quarters, then 5-minute overtimes
pub fn period_length(period: u8) -> GameClock {
    if period <= REGULATION_PERIODS {
        GameClock::from_seconds(QUARTER_SECONDS)
    } else {
        GameClock::from_seconds(OVERTIME_SECONDS)
    }
}

/// Kind of play-by-play event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ScoreChange,
    Foul,
    Substitution,
    Timeout,
    Other,
}

impl EventKind {
    /// Classify a play that did not change the score from its description
    pub fn from_description(description: &str) -> Self {
        let lower = description.to_ascii_lowercase();
        if lower.contains("foul") {
            Self::Foul
        } else if lower.contains("enters the game") {
            Self::Substitution
        } else if lower.contains("timeout") {
            Self::Timeout
        } else {
            Self::Other
        }
    }
}

/// One play-by-play row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// 1-4 regulation, 5 and up overtime
    pub period: u8,
    /// Time remaining in the period
    pub clock: GameClock,
    pub kind: EventKind,
    pub description: String,
    /// Score after the event
    pub score: Option<Score>,
}

/// A game from the season schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub id: GameId,
    pub date: NaiveDate,
    pub away: Team,
    pub home: Team,
    /// `None` until the game is played
    pub final_score: Option<Score>,
    pub playoffs: bool,
}

impl ScheduledGame {
    pub fn is_final(&self) -> bool {
        self.final_score.is_some()
    }

    /// Whether `abbr` won this game; `None` while unplayed or not involved
    pub fn won_by(&self, abbr: &str) -> Option<bool> {
        let score = self.final_score?;
        if self.away.abbr == abbr {
            Some(score.away > score.home)
        } else if self.home.abbr == abbr {
            Some(score.home > score.away)
        } else {
            None
        }
    }
}

/// Team totals from a box score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub fg: u32,
    pub fga: u32,
    pub fg3: u32,
    pub fg3a: u32,
    pub ft: u32,
    pub fta: u32,
    pub orb: u32,
    pub drb: u32,
    pub trb: u32,
    pub ast: u32,
    pub stl: u32,
    pub blk: u32,
    pub tov: u32,
    pub pf: u32,
    pub pts: u32,
}

/// Box score line of a player who played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub name: String,
    pub team: String,
    pub minutes: String,
    pub stats: TeamTotals,
}

/// Box score of one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBox {
    pub abbr: String,
    pub players: Vec<PlayerLine>,
    pub totals: TeamTotals,
}

/// Box score of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScore {
    pub away: TeamBox,
    pub home: TeamBox,
}

impl BoxScore {
    /// All players of both teams
    pub fn players(&self) -> impl Iterator<Item = &PlayerLine> {
        self.away.players.iter().chain(self.home.players.iter())
    }
}

/// Entry of the league injury report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub player: String,
    pub team_abbr: String,
    pub date: NaiveDate,
    /// e.g. "Out", "Day To Day"
    pub status: String,
    /// e.g. "Knee"
    pub injury: String,
}

/// Conference standings, best team first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceStandings {
    pub conference: String,
    pub teams: Vec<Team>,
}
