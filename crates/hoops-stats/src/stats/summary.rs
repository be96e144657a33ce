//! Game flow numbers: ties, lead changes, largest lead, time in the lead

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use super::transform::timeline;
use crate::error::DataError;
use crate::models::GameEvent;

/// One of the two teams of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Away,
    Home,
}

/// Game flow summary derived from the play-by-play
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    /// Distinct tied scores after tip-off
    pub ties: u32,
    pub lead_changes: u32,
    pub largest_lead: u32,
    /// Team that held the largest lead first
    pub largest_lead_side: Option<Side>,
    pub away_led_seconds: f64,
    pub home_led_seconds: f64,
}

fn leader(differential: i32) -> Option<Side> {
    match differential.cmp(&0) {
        Ordering::Greater => Some(Side::Away),
        Ordering::Less => Some(Side::Home),
        Ordering::Equal => None,
    }
}

impl GameSummary {
    pub fn from_events(events: &[GameEvent]) -> Result<Self, DataError> {
        let timeline = timeline(events)?;

        let ties = timeline
            .iter()
            .map(|entry| entry.score)
            .filter(|score| score.away > 0 && score.away == score.home)
            .collect::<HashSet<_>>()
            .len() as u32;

        let mut lead_changes = 0;
        let mut last_leader = None;
        for entry in &timeline {
            if let Some(side) = leader(entry.score.differential()) {
                if last_leader.is_some_and(|last| last != side) {
                    lead_changes += 1;
                }
                last_leader = Some(side);
            }
        }

        let mut largest_lead = 0;
        let mut largest_lead_side = None;
        for entry in &timeline {
            let lead = entry.score.differential().unsigned_abs();
            if lead > largest_lead {
                largest_lead = lead;
                largest_lead_side = leader(entry.score.differential());
            }
        }

        // Each interval belongs to whoever leads after the event opening it
        let mut away_led_seconds = 0.0;
        let mut home_led_seconds = 0.0;
        for pair in timeline.windows(2) {
            let duration = pair[1].seconds - pair[0].seconds;
            match leader(pair[0].score.differential()) {
                Some(Side::Away) => away_led_seconds += duration,
                Some(Side::Home) => home_led_seconds += duration,
                None => {}
            }
        }

        Ok(Self {
            ties,
            lead_changes,
            largest_lead,
            largest_lead_side,
            away_led_seconds,
            home_led_seconds,
        })
    }
}
