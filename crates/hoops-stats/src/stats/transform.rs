//! Play-by-play to score series

use serde::Serialize;

use crate::error::DataError;
use crate::models::{
    EventKind, GameEvent, OVERTIME_SECONDS, QUARTER_SECONDS, REGULATION_PERIODS, Score,
    period_length,
};

/// Score of both teams at a point of elapsed game time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Elapsed game time in minutes
    pub minute: f64,
    pub away: u32,
    pub home: u32,
}

impl SeriesPoint {
    /// Away minus home
    pub fn differential(&self) -> i32 {
        self.away as i32 - self.home as i32
    }
}

/// Running score of a game, starting at tip-off
///
/// Built once per game by [`DerivedSeries::from_events`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSeries {
    points: Vec<SeriesPoint>,
}

impl DerivedSeries {
    /// Derive the series from a game's play-by-play.
    ///
    /// The result holds a tip-off point followed by one point per
    /// [`EventKind::ScoreChange`] event, or nothing when there are no events.
    /// Every event must carry its resulting score.
    pub fn from_events(events: &[GameEvent]) -> Result<Self, DataError> {
        let timeline = timeline(events)?;
        if timeline.is_empty() {
            return Ok(Self { points: Vec::new() });
        }

        let mut points = vec![SeriesPoint {
            minute: 0.0,
            away: 0,
            home: 0,
        }];
        points.extend(
            events
                .iter()
                .zip(&timeline)
                .filter(|(event, _)| event.kind == EventKind::ScoreChange)
                .map(|(_, entry)| SeriesPoint {
                    minute: entry.seconds / 60.0,
                    away: entry.score.away,
                    home: entry.score.home,
                }),
        );

        Ok(Self { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Elapsed minutes of the last point
    pub fn last_minute(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.minute)
    }

    /// Highest score either team reached
    pub fn max_score(&self) -> u32 {
        self.points.iter().map(|p| p.away.max(p.home)).max().unwrap_or(0)
    }

    /// Smallest and largest differential, both including zero
    pub fn differential_range(&self) -> (i32, i32) {
        self.points
            .iter()
            .map(SeriesPoint::differential)
            .fold((0, 0), |(lo, hi), d| (lo.min(d), hi.max(d)))
    }

    /// Highest score either team reached strictly before `minute`
    pub fn max_score_before(&self, minute: f64) -> u32 {
        self.points
            .iter()
            .take_while(|p| p.minute < minute)
            .map(|p| p.away.max(p.home))
            .max()
            .unwrap_or(0)
    }

    /// Minutes at which periods end, below the last point of the game
    pub fn period_breaks(&self) -> Vec<f64> {
        period_breaks(self.last_minute())
    }
}

/// Period ends before `until` minutes: 12, 24, 36, 48, then every 5 minutes
pub fn period_breaks(until: f64) -> Vec<f64> {
    let regulation = (1..=u32::from(REGULATION_PERIODS)).map(|q| f64::from(q * QUARTER_SECONDS) / 60.0);
    let regulation_end = f64::from(u32::from(REGULATION_PERIODS) * QUARTER_SECONDS) / 60.0;
    let overtime = (1..).map(move |ot: u32| regulation_end + f64::from(ot * OVERTIME_SECONDS) / 60.0);
    regulation
        .chain(overtime)
        .take_while(|&minute| minute < until)
        .collect()
}

/// Validated elapsed time and score of one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimelineEntry {
    /// Elapsed game time in seconds
    pub seconds: f64,
    pub score: Score,
}

/// Elapsed time and score of every event, rejecting malformed input
pub(crate) fn timeline(events: &[GameEvent]) -> Result<Vec<TimelineEntry>, DataError> {
    let mut entries: Vec<TimelineEntry> = Vec::with_capacity(events.len());

    for (index, event) in events.iter().enumerate() {
        if event.period == 0 {
            return Err(DataError::InvalidPeriod {
                index,
                period: event.period,
            });
        }
        let score = event.score.ok_or(DataError::MissingScore { index })?;

        let length = period_length(event.period);
        if event.clock > length {
            return Err(DataError::ClockOutOfRange {
                index,
                period: event.period,
                remaining: event.clock.to_string(),
                length: length.to_string(),
            });
        }

        let before: u32 = (1..event.period).map(|p| period_length(p).tenths()).sum();
        let tenths = before + length.tenths() - event.clock.tenths();
        let seconds = f64::from(tenths) / 10.0;

        if entries.last().is_some_and(|last| seconds < last.seconds) {
            return Err(DataError::OutOfOrder { index });
        }
        entries.push(TimelineEntry { seconds, score });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameClock;

    fn event(period: u8, clock: &str, kind: EventKind, score: Option<(u32, u32)>) -> GameEvent {
        GameEvent {
            period,
            clock: clock.parse().unwrap(),
            kind,
            description: String::new(),
            score: score.map(|(a, h)| Score::new(a, h)),
        }
    }

    fn scoring(period: u8, clock: &str, away: u32, home: u32) -> GameEvent {
        event(period, clock, EventKind::ScoreChange, Some((away, home)))
    }

    #[test]
    fn test_empty_game_yields_empty_series() {
        let series = DerivedSeries::from_events(&[]).unwrap();
        assert!(series.is_empty());
        assert!(series.period_breaks().is_empty());
        assert_eq!(series.max_score(), 0);
    }

    #[test]
    fn test_one_point_per_score_change_plus_tip_off() {
        let events = vec![
            scoring(1, "11:41.0", 2, 0),
            event(1, "11:20.0", EventKind::Foul, Some((2, 0))),
            scoring(1, "10:58.5", 2, 3),
            event(2, "11:30.0", EventKind::Substitution, Some((2, 3))),
            scoring(2, "6:00.0", 4, 3),
        ];
        let series = DerivedSeries::from_events(&events).unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series.points()[0], SeriesPoint { minute: 0.0, away: 0, home: 0 });
        assert!((series.points()[1].minute - 19.0 / 60.0).abs() < 1e-9);
        assert_eq!(series.points()[2].differential(), -1);
        assert!((series.last_minute() - 18.0).abs() < 1e-9);
        assert!(series.points().windows(2).all(|w| w[0].minute <= w[1].minute));
    }

    #[test]
    fn test_events_without_score_changes_keep_tip_off() {
        let events = vec![event(1, "12:00.0", EventKind::Other, Some((0, 0)))];
        let series = DerivedSeries::from_events(&events).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_missing_score_is_data_error() {
        let events = vec![
            scoring(1, "11:41.0", 2, 0),
            event(1, "11:00.0", EventKind::Foul, None),
        ];
        assert_eq!(
            DerivedSeries::from_events(&events),
            Err(DataError::MissingScore { index: 1 })
        );
    }

    #[test]
    fn test_multiple_overtimes() {
        let events = vec![
            scoring(1, "11:00.0", 2, 0),
            scoring(4, "0:00.0", 100, 100),
            scoring(5, "2:30.0", 103, 100),
            scoring(6, "0:01.0", 110, 110),
            scoring(7, "0:00.0", 120, 118),
        ];
        let series = DerivedSeries::from_events(&events).unwrap();

        let minutes: Vec<f64> = series.points().iter().map(|p| p.minute).collect();
        assert!((minutes[2] - 48.0).abs() < 1e-9);
        assert!((minutes[3] - 50.5).abs() < 1e-9);
        assert!((minutes[4] - (58.0 - 1.0 / 60.0)).abs() < 1e-9);
        assert!((minutes[5] - 63.0).abs() < 1e-9);
        assert_eq!(series.period_breaks(), vec![12.0, 24.0, 36.0, 48.0, 53.0, 58.0]);
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        let events = vec![scoring(2, "5:00.0", 30, 28), scoring(1, "1:00.0", 28, 28)];
        assert_eq!(
            DerivedSeries::from_events(&events),
            Err(DataError::OutOfOrder { index: 1 })
        );
    }

    #[test]
    fn test_invalid_period_and_clock_rejected() {
        let events = vec![scoring(0, "5:00.0", 2, 0)];
        assert_eq!(
            DerivedSeries::from_events(&events),
            Err(DataError::InvalidPeriod { index: 0, period: 0 })
        );

        let mut overtime = scoring(5, "5:00.0", 2, 0);
        overtime.clock = GameClock::from_seconds(400);
        assert!(matches!(
            DerivedSeries::from_events(&[overtime]),
            Err(DataError::ClockOutOfRange { index: 0, period: 5, .. })
        ));
    }

    #[test]
    fn test_max_score_before_break() {
        let events = vec![
            scoring(1, "0:10.0", 30, 25),
            scoring(2, "11:00.0", 30, 27),
            scoring(2, "0:00.0", 55, 60),
        ];
        let series = DerivedSeries::from_events(&events).unwrap();
        assert_eq!(series.max_score_before(12.0), 30);
        assert_eq!(series.max_score_before(24.0), 30);
        assert_eq!(series.max_score(), 60);
        assert_eq!(series.differential_range(), (-5, 5));
    }

    #[test]
    fn test_period_breaks_regulation() {
        assert_eq!(period_breaks(48.0), vec![12.0, 24.0, 36.0]);
        assert_eq!(period_breaks(48.5), vec![12.0, 24.0, 36.0, 48.0]);
        assert!(period_breaks(0.0).is_empty());
    }
}
