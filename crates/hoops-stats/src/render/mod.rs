//! Static chart rendering
//!
//! Game charts plot a [`DerivedSeries`]; the season chart plots a
//! [`WinSeries`]. Both render to PNG or SVG at a fixed size.

mod charts;
pub mod fonts;

use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::config::{BotConfig, ChartKind, ImageFormat};
use crate::error::{HoopsError, Result};
use crate::models::{ScheduledGame, Score};
use crate::stats::{DerivedSeries, WinSeries};

pub use charts::{AWAY_COLOR, HOME_COLOR};

/// Chart width in pixels (5.05 in at 300 dpi)
pub const IMAGE_WIDTH: u32 = 1515;
/// Chart height in pixels (2.85 in at 300 dpi)
pub const IMAGE_HEIGHT: u32 = 855;

/// A rendered chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Legend and title text of a game chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLabels {
    pub title: String,
    /// "Team, score"
    pub away: String,
    pub home: String,
    pub away_abbr: String,
}

impl GameLabels {
    pub fn for_game(game: &ScheduledGame, final_score: Score) -> Self {
        Self {
            title: game.date.format("%Y-%m-%d").to_string(),
            away: format!("{}, {}", game.away.name, final_score.away),
            home: format!("{}, {}", game.home.name, final_score.home),
            away_abbr: game.away.abbr.clone(),
        }
    }
}

/// Title and markers of a season chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonLabels {
    /// "rank. team, wins in games"
    pub title: String,
    pub injury_dates: Vec<NaiveDate>,
}

impl SeasonLabels {
    pub fn new(rank: usize, team_name: &str, wins: &WinSeries, injury_dates: Vec<NaiveDate>) -> Self {
        Self {
            title: format!("{rank}. {team_name}, {} in {}", wins.wins(), wins.games()),
            injury_dates,
        }
    }
}

/// Renders charts into the output directory
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    format: ImageFormat,
    chart_kind: ChartKind,
    output_dir: PathBuf,
    text: bool,
}

impl PlotRenderer {
    /// Renderer for a bot run; registers the chart font
    pub fn new(config: &BotConfig) -> Self {
        Self {
            format: config.image_format,
            chart_kind: config.chart_kind,
            output_dir: config.output_dir.clone(),
            text: fonts::ensure_font(config.font_path.as_deref()),
        }
    }

    /// Renderer that draws lines only, independent of installed fonts
    pub fn without_text(format: ImageFormat, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format,
            chart_kind: ChartKind::Scores,
            output_dir: output_dir.into(),
            text: false,
        }
    }

    pub fn with_chart_kind(mut self, kind: ChartKind) -> Self {
        self.chart_kind = kind;
        self
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn draws_text(&self) -> bool {
        self.text
    }

    /// Render a game chart to `<output_dir>/<stem>.<ext>`
    #[instrument(skip(self, series, labels), fields(points = series.len()))]
    pub fn render_game(&self, series: &DerivedSeries, labels: &GameLabels, stem: &str) -> Result<RenderedImage> {
        let chart = match self.chart_kind {
            ChartKind::Scores => Chart::Scores(series, labels),
            ChartKind::Differential => Chart::Differential(series, labels),
        };
        self.render(&chart, stem)
    }

    /// Render a season win chart to `<output_dir>/<stem>.<ext>`
    #[instrument(skip(self, wins, labels), fields(team = %wins.team_abbr))]
    pub fn render_season(&self, wins: &WinSeries, labels: &SeasonLabels, stem: &str) -> Result<RenderedImage> {
        self.render(&Chart::Season(wins, labels), stem)
    }

    fn render(&self, chart: &Chart<'_>, stem: &str) -> Result<RenderedImage> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{stem}.{}", self.format.extension()));

        let bytes = match self.format {
            ImageFormat::Png => {
                {
                    let root = BitMapBackend::new(&path, (IMAGE_WIDTH, IMAGE_HEIGHT)).into_drawing_area();
                    charts::draw(&root, chart, self.text).map_err(render_error)?;
                    root.present().map_err(render_error)?;
                }
                std::fs::read(&path)?
            }
            ImageFormat::Svg => {
                let mut svg = String::new();
                {
                    let root = SVGBackend::with_string(&mut svg, (IMAGE_WIDTH, IMAGE_HEIGHT)).into_drawing_area();
                    charts::draw(&root, chart, self.text).map_err(render_error)?;
                    root.present().map_err(render_error)?;
                }
                std::fs::write(&path, &svg)?;
                svg.into_bytes()
            }
        };

        debug!("Rendered {} ({} bytes)", path.display(), bytes.len());
        Ok(RenderedImage {
            format: self.format,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            path,
            bytes,
        })
    }
}

/// What to draw
pub(crate) enum Chart<'a> {
    Scores(&'a DerivedSeries, &'a GameLabels),
    Differential(&'a DerivedSeries, &'a GameLabels),
    Season(&'a WinSeries, &'a SeasonLabels),
}

fn render_error(err: impl std::fmt::Display) -> HoopsError {
    HoopsError::RenderError(err.to_string())
}

/// File stem for a game's chart, e.g. `202105220MIL`
pub fn game_stem(game: &ScheduledGame) -> String {
    game.id.as_str().to_string()
}

/// Remove a rendered image from disk
pub fn discard(image: &RenderedImage) -> Result<()> {
    remove_file(&image.path)
}

fn remove_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
