//! Bot engine
//!
//! Coordinates fetching, transforming, rendering and posting for one run.

pub mod bot;
pub mod report;

pub use bot::{GameBot, GameSelection, season_for};
pub use report::{GameOutcome, OutcomeStatus, SeasonPost};
