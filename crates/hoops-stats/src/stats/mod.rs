//! Statistics derived from fetched game data

pub mod season;
pub mod summary;
pub mod transform;

pub use season::WinSeries;
pub use summary::{GameSummary, Side};
pub use transform::{DerivedSeries, SeriesPoint, period_breaks};
