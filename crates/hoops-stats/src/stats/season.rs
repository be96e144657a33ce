//! Season win curves

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::ScheduledGame;

/// Cumulative wins of one team over its completed regular-season games
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinSeries {
    pub team_abbr: String,
    /// (game date, wins so far), one entry per completed game
    pub points: Vec<(NaiveDate, u32)>,
}

impl WinSeries {
    /// Build the curve from a schedule; playoff games, games of other teams
    /// and unplayed games are ignored.
    pub fn from_schedule(team_abbr: &str, schedule: &[ScheduledGame]) -> Self {
        let mut results: Vec<(NaiveDate, bool)> = schedule
            .iter()
            .filter(|game| !game.playoffs)
            .filter_map(|game| game.won_by(team_abbr).map(|won| (game.date, won)))
            .collect();
        results.sort_by_key(|(date, _)| *date);

        let mut wins = 0;
        let points = results
            .into_iter()
            .map(|(date, won)| {
                wins += u32::from(won);
                (date, wins)
            })
            .collect();

        Self {
            team_abbr: team_abbr.to_string(),
            points,
        }
    }

    pub fn wins(&self) -> u32 {
        self.points.last().map_or(0, |(_, wins)| *wins)
    }

    pub fn games(&self) -> usize {
        self.points.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(date, _)| *date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(date, _)| *date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameId, Score, Team};

    fn game(day: u32, away: &str, home: &str, score: Option<(u32, u32)>) -> ScheduledGame {
        let date = NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
        let team = |abbr: &str| Team {
            name: abbr.to_string(),
            abbr: abbr.to_string(),
        };
        ScheduledGame {
            id: GameId::from_parts(date, home),
            date,
            away: team(away),
            home: team(home),
            final_score: score.map(|(a, h)| Score::new(a, h)),
            playoffs: false,
        }
    }

    #[test]
    fn test_cumulative_wins_sorted_by_date() {
        let schedule = vec![
            game(5, "MIL", "MIA", Some((100, 90))),
            game(2, "BOS", "MIL", Some((110, 100))),
            game(3, "MIL", "BRK", Some((120, 99))),
            game(4, "BOS", "BRK", Some((101, 99))),
            game(9, "MIL", "BOS", None),
        ];
        let series = WinSeries::from_schedule("MIL", &schedule);

        assert_eq!(series.games(), 3);
        assert_eq!(series.wins(), 2);
        let wins: Vec<u32> = series.points.iter().map(|(_, w)| *w).collect();
        assert_eq!(wins, vec![0, 1, 2]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2021, 1, 2));
    }

    #[test]
    fn test_playoff_games_not_counted() {
        let mut playoff = game(20, "MIL", "MIA", Some((110, 100)));
        playoff.playoffs = true;
        let schedule = vec![game(2, "MIL", "BOS", Some((101, 99))), playoff];
        let series = WinSeries::from_schedule("MIL", &schedule);

        assert_eq!(series.wins(), 1);
        assert_eq!(series.games(), 1);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2021, 1, 2));
    }

    #[test]
    fn test_team_without_games() {
        let series = WinSeries::from_schedule("UTA", &[]);
        assert_eq!(series.wins(), 0);
        assert_eq!(series.games(), 0);
        assert_eq!(series.last_date(), None);
    }
}
