//! Chart drawing, generic over the plotters backend

use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::fonts::FONT_FAMILY;
use super::{Chart, GameLabels, SeasonLabels};
use crate::stats::{DerivedSeries, WinSeries};

/// Away team blue
pub const AWAY_COLOR: RGBColor = RGBColor(0x1d, 0x42, 0x8a);
/// Home team red
pub const HOME_COLOR: RGBColor = RGBColor(0xc8, 0x10, 0x2e);
/// Period break lines
const BREAK_COLOR: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);

const TITLE_SIZE: u32 = 44;
const LABEL_SIZE: u32 = 30;
const LINE_WIDTH: u32 = 4;

pub(crate) type DrawResult<DB> =
    Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Regulation length, the minimum x range of game charts
const GAME_MINUTES: f64 = 48.0;

pub(crate) fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, chart: &Chart<'_>, text: bool) -> DrawResult<DB> {
    match chart {
        Chart::Scores(series, labels) => draw_scores(root, series, labels, text),
        Chart::Differential(series, labels) => draw_differential(root, series, labels, text),
        Chart::Season(wins, labels) => draw_season(root, wins, labels, text),
    }
}

fn chart_builder<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    title: &str,
    text: bool,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder.margin(24);
    if text {
        builder
            .caption(title, (FONT_FAMILY, TITLE_SIZE))
            .x_label_area_size(70)
            .y_label_area_size(90);
    }
    builder
}

/// Running scores of both teams with period breaks
fn draw_scores<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &DerivedSeries,
    labels: &GameLabels,
    text: bool,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let x_max = series.last_minute().max(GAME_MINUTES);
    let y_max = f64::from(series.max_score()) * 1.05 + 1.0;
    let mut chart = chart_builder(root, &labels.title, text).build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    if text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc("Minutes")
            .y_desc("Points")
            .label_style((FONT_FAMILY, LABEL_SIZE))
            .axis_desc_style((FONT_FAMILY, LABEL_SIZE))
            .draw()?;
    }

    chart.draw_series(series.period_breaks().into_iter().map(|minute| {
        let top = f64::from(series.max_score_before(minute));
        PathElement::new(vec![(minute, 0.0), (minute, top)], BREAK_COLOR.stroke_width(2))
    }))?;

    for (label, color, away) in [(&labels.away, AWAY_COLOR, true), (&labels.home, HOME_COLOR, false)] {
        chart
            .draw_series(LineSeries::new(
                series
                    .points()
                    .iter()
                    .map(move |p| (p.minute, f64::from(if away { p.away } else { p.home }))),
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(LINE_WIDTH))
            });
    }

    if text {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.0))
            .border_style(&TRANSPARENT)
            .label_font((FONT_FAMILY, LABEL_SIZE))
            .draw()?;
    }

    Ok(())
}

/// Away minus home over time with a zero baseline
fn draw_differential<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &DerivedSeries,
    labels: &GameLabels,
    text: bool,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let x_max = series.last_minute().max(GAME_MINUTES);
    let (lo, hi) = series.differential_range();
    let y_range = f64::from(lo) - 3.0..f64::from(hi) + 3.0;
    let mut chart = chart_builder(root, &labels.title, text).build_cartesian_2d(0f64..x_max, y_range)?;

    if text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc("Minutes")
            .y_desc(format!("{} lead", labels.away_abbr))
            .label_style((FONT_FAMILY, LABEL_SIZE))
            .axis_desc_style((FONT_FAMILY, LABEL_SIZE))
            .draw()?;
    }

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (x_max, 0.0)],
        BREAK_COLOR.stroke_width(2),
    )))?;
    chart.draw_series(series.period_breaks().into_iter().map(|minute| {
        PathElement::new(
            vec![(minute, f64::from(lo)), (minute, f64::from(hi))],
            BREAK_COLOR.stroke_width(2),
        )
    }))?;

    chart
        .draw_series(LineSeries::new(
            series.points().iter().map(|p| (p.minute, f64::from(p.differential()))),
            AWAY_COLOR.stroke_width(LINE_WIDTH),
        ))?
        .label(format!("{} - {}", labels.away, labels.home))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], AWAY_COLOR.stroke_width(LINE_WIDTH)));

    if text {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.0))
            .border_style(&TRANSPARENT)
            .label_font((FONT_FAMILY, LABEL_SIZE))
            .draw()?;
    }

    Ok(())
}

/// Cumulative wins over the season with injury dates marked
fn draw_season<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    wins: &WinSeries,
    labels: &SeasonLabels,
    text: bool,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let first = wins.first_date().unwrap_or(NaiveDate::MIN);
    let day = |date: NaiveDate| (date - first).num_days() as f64;
    let x_max = wins.last_date().map_or(1.0, |last| day(last).max(1.0));
    let y_max = f64::from(wins.wins()) + 1.0;
    let mut chart = chart_builder(root, &labels.title, text).build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    if text {
        let month_label = |d: &f64| (first + Duration::days(*d as i64)).format("%b").to_string();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_label_formatter(&month_label)
            .label_style((FONT_FAMILY, LABEL_SIZE))
            .draw()?;
    }

    let total = f64::from(wins.wins());
    chart.draw_series(
        labels
            .injury_dates
            .iter()
            .filter(|date| wins.first_date().is_some_and(|first| **date > first))
            .map(|date| {
                let x = day(*date).min(x_max);
                PathElement::new(vec![(x, 0.0), (x, total)], HOME_COLOR.stroke_width(2))
            }),
    )?;

    chart.draw_series(LineSeries::new(
        wins.points.iter().map(|(date, w)| (day(*date), f64::from(*w))),
        AWAY_COLOR.stroke_width(LINE_WIDTH),
    ))?;

    Ok(())
}
