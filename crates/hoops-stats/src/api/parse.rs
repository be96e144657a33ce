//! HTML parsing for basketball-reference.com pages
//!
//! The site hides some tables inside HTML comments, so every page goes through
//! [`document`] which strips comment markers before parsing.

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::error::DataError;
use crate::models::{
    BoxScore, ConferenceStandings, EventKind, GameClock, GameEvent, GameId, Injury, PlayerLine,
    ScheduledGame, Score, TeamBox, TeamTotals,
};
use crate::teams;

/// Date format used in schedule and injury tables, e.g. "Sat, May 22, 2021"
const TABLE_DATE_FORMAT: &str = "%a, %b %d, %Y";

static INJURY_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<status>[^(]+?)\s*\((?P<injury>[^)]*)\)").expect("injury note regex")
});

static PERIOD_ROW_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^q(?P<period>\d+)$").expect("period id regex"));

/// Parse a page, exposing tables that are commented out
pub fn document(html: &str) -> Html {
    Html::parse_document(&html.replace("<!--", "").replace("-->", ""))
}

fn selector(css: &str) -> Result<Selector, DataError> {
    Selector::parse(css).map_err(|_| DataError::InvalidSelector(css.to_string()))
}

fn table<'a>(doc: &'a Html, id: &str) -> Result<ElementRef<'a>, DataError> {
    let css = format!("table#{id}");
    doc.select(&selector(&css)?)
        .next()
        .ok_or_else(|| DataError::MissingTable(id.to_string()))
}

/// Whitespace-normalized text of an element
fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Child cell with the given `data-stat` attribute
fn stat_cell<'a>(row: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .find(|cell| cell.value().attr("data-stat") == Some(name))
}

fn stat_text(row: ElementRef<'_>, name: &str) -> Option<String> {
    stat_cell(row, name).map(text)
}

fn is_header_row(row: ElementRef<'_>) -> bool {
    row.value()
        .attr("class")
        .is_some_and(|class| class.split_whitespace().any(|c| c == "thead"))
}

fn malformed(table: &str, reason: impl Into<String>) -> DataError {
    DataError::MalformedRow {
        table: table.to_string(),
        reason: reason.into(),
    }
}

fn parse_table_date(value: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(value.trim(), TABLE_DATE_FORMAT)
        .map_err(|_| DataError::InvalidDate(value.to_string()))
}

/// Links to the monthly schedule pages of a season
pub fn parse_schedule_months(html: &str) -> Result<Vec<String>, DataError> {
    let doc = document(html);
    let links = selector("div.filter a")?;
    Ok(doc
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains("_games-"))
        .map(str::to_string)
        .collect())
}

/// Games of a monthly schedule page
///
/// Rows after the "Playoffs" separator are flagged as playoff games.
pub fn parse_schedule(html: &str) -> Result<Vec<ScheduledGame>, DataError> {
    const TABLE: &str = "schedule";
    let doc = document(html);
    let rows = selector("tbody tr")?;
    let mut games = Vec::new();
    let mut playoffs = false;

    for row in table(&doc, TABLE)?.select(&rows) {
        if is_header_row(row) {
            if text(row).contains("Playoffs") {
                playoffs = true;
            }
            continue;
        }

        let date = stat_text(row, "date_game").ok_or_else(|| malformed(TABLE, "no date"))?;
        let date = parse_table_date(&date)?;
        let away = stat_text(row, "visitor_team_name")
            .ok_or_else(|| malformed(TABLE, "no visitor"))?;
        let home =
            stat_text(row, "home_team_name").ok_or_else(|| malformed(TABLE, "no home team"))?;
        let away = teams::team(&away)?;
        let home = teams::team(&home)?;

        let points = |name: &str| -> Result<Option<u32>, DataError> {
            match stat_text(row, name).filter(|v| !v.is_empty()) {
                Some(value) => value
                    .parse()
                    .map(Some)
                    .map_err(|_| malformed(TABLE, format!("{name} '{value}'"))),
                None => Ok(None),
            }
        };
        let final_score = match (points("visitor_pts")?, points("home_pts")?) {
            (Some(a), Some(h)) => Some(Score::new(a, h)),
            _ => None,
        };

        let id = stat_cell(row, "box_score_text")
            .and_then(|cell| cell.children().filter_map(ElementRef::wrap).next())
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| href.rsplit('/').next())
            .and_then(|file| file.strip_suffix(".html"))
            .map_or_else(|| GameId::from_parts(date, &home.abbr), GameId::new);

        games.push(ScheduledGame {
            id,
            date,
            away,
            home,
            final_score,
            playoffs,
        });
    }

    debug!("Parsed {} scheduled games", games.len());
    Ok(games)
}

/// Play-by-play events of one game
///
/// Only rows with the full six columns are events. Period changes are read
/// from the `q<n>` row ids, or from "Start of ..." rows when ids are absent.
pub fn parse_play_by_play(html: &str) -> Result<Vec<GameEvent>, DataError> {
    const TABLE: &str = "pbp";
    let doc = document(html);
    let rows = selector("tr")?;
    let cells = selector("td")?;

    let mut events = Vec::new();
    let mut period: u8 = 0;
    let mut marker_pending = false;
    let mut previous = Score::default();

    for row in table(&doc, TABLE)?.select(&rows) {
        if let Some(caps) = row.value().attr("id").and_then(|id| PERIOD_ROW_ID.captures(id)) {
            period = caps["period"]
                .parse()
                .map_err(|_| malformed(TABLE, "period marker"))?;
            marker_pending = true;
            continue;
        }

        let row_cells: Vec<_> = row.select(&cells).collect();
        match row_cells.len() {
            6 => {
                marker_pending = false;
                let clock: GameClock = text(row_cells[0]).parse()?;
                let score_text = text(row_cells[3]);
                let score = if score_text.is_empty() {
                    None
                } else {
                    Some(score_text.parse::<Score>()?)
                };
                let description = [text(row_cells[1]), text(row_cells[5])]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" / ");
                let kind = match score {
                    Some(score) if score != previous => EventKind::ScoreChange,
                    _ => EventKind::from_description(&description),
                };
                if let Some(score) = score {
                    previous = score;
                }
                events.push(GameEvent {
                    period,
                    clock,
                    kind,
                    description,
                    score,
                });
            }
            2 if text(row_cells[1]).starts_with("Start of") => {
                if marker_pending {
                    marker_pending = false;
                } else {
                    period = period.saturating_add(1);
                }
            }
            _ => {}
        }
    }

    debug!("Parsed {} play-by-play events", events.len());
    Ok(events)
}

fn parse_totals(row: ElementRef<'_>, table_id: &str) -> Result<TeamTotals, DataError> {
    let get = |name: &str| -> Result<u32, DataError> {
        let value = stat_text(row, name).ok_or_else(|| malformed(table_id, format!("no {name}")))?;
        if value.is_empty() {
            return Ok(0);
        }
        value
            .parse()
            .map_err(|_| malformed(table_id, format!("{name} '{value}'")))
    };

    Ok(TeamTotals {
        fg: get("fg")?,
        fga: get("fga")?,
        fg3: get("fg3")?,
        fg3a: get("fg3a")?,
        ft: get("ft")?,
        fta: get("fta")?,
        orb: get("orb")?,
        drb: get("drb")?,
        trb: get("trb")?,
        ast: get("ast")?,
        stl: get("stl")?,
        blk: get("blk")?,
        tov: get("tov")?,
        pf: get("pf")?,
        pts: get("pts")?,
    })
}

fn parse_team_box(doc: &Html, abbr: &str) -> Result<TeamBox, DataError> {
    let table_id = format!("box-{abbr}-game-basic");
    let basic = table(doc, &table_id)?;
    let body_rows = selector("tbody tr")?;
    let foot_rows = selector("tfoot tr")?;

    let mut players = Vec::new();
    for row in basic.select(&body_rows) {
        // Did not play, suspended, etc.
        if is_header_row(row) || stat_cell(row, "reason").is_some() {
            continue;
        }
        let name = stat_text(row, "player").ok_or_else(|| malformed(&table_id, "no player"))?;
        let minutes = stat_text(row, "mp").unwrap_or_default();
        players.push(PlayerLine {
            name,
            team: abbr.to_string(),
            minutes,
            stats: parse_totals(row, &table_id)?,
        });
    }

    let totals_row = basic
        .select(&foot_rows)
        .next()
        .ok_or_else(|| malformed(&table_id, "no team totals"))?;

    Ok(TeamBox {
        abbr: abbr.to_string(),
        players,
        totals: parse_totals(totals_row, &table_id)?,
    })
}

/// Basic box score of both teams
pub fn parse_box_score(html: &str, away_abbr: &str, home_abbr: &str) -> Result<BoxScore, DataError> {
    let doc = document(html);
    Ok(BoxScore {
        away: parse_team_box(&doc, away_abbr)?,
        home: parse_team_box(&doc, home_abbr)?,
    })
}

/// Split an injury note such as "Out (Knee) - The Bucks announced..."
fn split_injury_note(note: &str) -> (String, String) {
    if let Some(caps) = INJURY_NOTE.captures(note) {
        return (caps["status"].trim().to_string(), caps["injury"].trim().to_string());
    }
    let status = note.split(" - ").next().unwrap_or(note).trim();
    (status.to_string(), String::new())
}

/// Current league injury report
pub fn parse_injury_report(html: &str) -> Result<Vec<Injury>, DataError> {
    const TABLE: &str = "injuries";
    let doc = document(html);
    let rows = selector("tbody tr")?;
    let mut injuries = Vec::new();

    for row in table(&doc, TABLE)?.select(&rows) {
        if is_header_row(row) {
            continue;
        }
        let player = stat_text(row, "player").ok_or_else(|| malformed(TABLE, "no player"))?;
        let team = stat_text(row, "team_name").ok_or_else(|| malformed(TABLE, "no team"))?;
        let date = stat_text(row, "date_update").ok_or_else(|| malformed(TABLE, "no date"))?;
        let note = stat_text(row, "note").unwrap_or_default();
        let (status, injury) = split_injury_note(&note);

        injuries.push(Injury {
            player,
            team_abbr: teams::team(&team)?.abbr,
            date: parse_table_date(&date)?,
            status,
            injury,
        });
    }

    Ok(injuries)
}

/// Eastern and Western conference standings
pub fn parse_standings(html: &str) -> Result<Vec<ConferenceStandings>, DataError> {
    let doc = document(html);
    let rows = selector("tbody tr")?;
    let link = selector("a")?;
    let mut standings = Vec::new();

    for (id, conference) in [("confs_standings_E", "Eastern"), ("confs_standings_W", "Western")] {
        let mut teams_in_order = Vec::new();
        for row in table(&doc, id)?.select(&rows) {
            if is_header_row(row) {
                continue;
            }
            let cell = stat_cell(row, "team_name").ok_or_else(|| malformed(id, "no team"))?;
            // Link text drops the playoff marker and seed suffix
            let name = cell
                .select(&link)
                .next()
                .map_or_else(|| text(cell), text);
            let name = name.trim_end_matches(|c: char| !c.is_alphanumeric()).trim();
            let name = name.split(" (").next().unwrap_or(name);
            teams_in_order.push(teams::team(name)?);
        }
        standings.push(ConferenceStandings {
            conference: conference.to_string(),
            teams: teams_in_order,
        });
    }

    Ok(standings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = r#"
<html><body>
<div class="filter">
  <div><a href="/leagues/NBA_2021_games-april.html">April</a></div>
  <div><a href="/leagues/NBA_2021_games-may.html">May</a></div>
  <div><a href="/leagues/NBA_2021_standings.html">Standings</a></div>
</div>
<table id="schedule"><thead><tr><th>Date</th></tr></thead>
<tbody>
<tr>
  <th data-stat="date_game"><a href="/x">Sun, May 16, 2021</a></th>
  <td data-stat="visitor_team_name"><a href="/teams/MIA/2021.html">Miami Heat</a></td>
  <td data-stat="visitor_pts">120</td>
  <td data-stat="home_team_name"><a href="/teams/DET/2021.html">Detroit Pistons</a></td>
  <td data-stat="home_pts">107</td>
  <td data-stat="box_score_text"><a href="/boxscores/202105160DET.html">Box Score</a></td>
</tr>
<tr class="thead"><th colspan="10">Playoffs</th></tr>
<tr>
  <th data-stat="date_game">Sat, May 22, 2021</th>
  <td data-stat="visitor_team_name">Miami Heat</td>
  <td data-stat="visitor_pts">107</td>
  <td data-stat="home_team_name">Milwaukee Bucks</td>
  <td data-stat="home_pts">109</td>
  <td data-stat="box_score_text"><a href="/boxscores/202105220MIL.html">Box Score</a></td>
</tr>
<tr>
  <th data-stat="date_game">Mon, May 24, 2021</th>
  <td data-stat="visitor_team_name">Miami Heat</td>
  <td data-stat="visitor_pts"></td>
  <td data-stat="home_team_name">Milwaukee Bucks</td>
  <td data-stat="home_pts"></td>
  <td data-stat="box_score_text"></td>
</tr>
</tbody></table>
</body></html>"#;

    const PLAY_BY_PLAY: &str = r#"
<table id="pbp">
<tr id="q1"><th colspan="6">1st Q</th></tr>
<tr class="thead"><th>Time</th><th>MIA</th><th></th><th>Score</th><th></th><th>MIL</th></tr>
<tr><td>12:00.0</td><td colspan="5">Start of 1st quarter</td></tr>
<tr><td>11:41.0</td><td>B. Adebayo makes 2-pt jump shot</td><td>+2</td><td>2-0</td><td></td><td></td></tr>
<tr><td>11:20.0</td><td></td><td></td><td>2-0</td><td></td><td>Shooting foul by B. Lopez</td></tr>
<tr><td>10:58.5</td><td></td><td></td><td>2-3</td><td>+3</td><td>K. Middleton makes 3-pt jump shot</td></tr>
<tr id="q2"><th colspan="6">2nd Q</th></tr>
<tr><td>12:00.0</td><td colspan="5">Start of 2nd quarter</td></tr>
<tr><td>11:30.0</td><td>T. Herro enters the game for J. Butler</td><td></td><td>2-3</td><td></td><td></td></tr>
</table>"#;

    #[test]
    fn test_parse_schedule_months() {
        let months = parse_schedule_months(SCHEDULE).unwrap();
        assert_eq!(
            months,
            vec!["/leagues/NBA_2021_games-april.html", "/leagues/NBA_2021_games-may.html"]
        );
    }

    #[test]
    fn test_parse_schedule() {
        let games = parse_schedule(SCHEDULE).unwrap();
        assert_eq!(games.len(), 3);

        let first = &games[0];
        assert_eq!(first.id.as_str(), "202105160DET");
        assert_eq!(first.away.abbr, "MIA");
        assert_eq!(first.home.abbr, "DET");
        assert_eq!(first.final_score, Some(Score::new(120, 107)));
        assert!(!first.playoffs);

        let second = &games[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2021, 5, 22).unwrap());
        assert!(second.playoffs);

        let unplayed = &games[2];
        assert_eq!(unplayed.final_score, None);
        assert_eq!(unplayed.id.as_str(), "202105240MIL");
    }

    #[test]
    fn test_parse_schedule_former_team_names() {
        let html = r#"<table id="schedule"><tbody>
<tr>
  <th data-stat="date_game">Wed, Dec 12, 2012</th>
  <td data-stat="visitor_team_name">Charlotte Bobcats</td>
  <td data-stat="visitor_pts">98</td>
  <td data-stat="home_team_name">New Orleans Hornets</td>
  <td data-stat="home_pts">94</td>
  <td data-stat="box_score_text"><a href="/boxscores/201212120NOH.html">Box Score</a></td>
</tr>
</tbody></table>"#;
        let games = parse_schedule(html).unwrap();

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].away.abbr, "CHA");
        assert_eq!(games[0].home.abbr, "NOH");
        assert_eq!(games[0].id.as_str(), "201212120NOH");
        assert_eq!(games[0].final_score, Some(Score::new(98, 94)));
    }

    #[test]
    fn test_parse_schedule_missing_table() {
        let err = parse_schedule("<html><body></body></html>").unwrap_err();
        assert_eq!(err, DataError::MissingTable("schedule".to_string()));
    }

    #[test]
    fn test_parse_play_by_play() {
        let events = parse_play_by_play(PLAY_BY_PLAY).unwrap();
        assert_eq!(events.len(), 4);

        assert_eq!(events[0].period, 1);
        assert_eq!(events[0].kind, EventKind::ScoreChange);
        assert_eq!(events[0].score, Some(Score::new(2, 0)));
        assert_eq!(events[0].clock, GameClock::from_seconds(701));

        assert_eq!(events[1].kind, EventKind::Foul);
        assert_eq!(events[2].kind, EventKind::ScoreChange);
        assert_eq!(events[2].clock, GameClock::from_tenths(6585));

        assert_eq!(events[3].period, 2);
        assert_eq!(events[3].kind, EventKind::Substitution);
    }

    #[test]
    fn test_parse_play_by_play_without_row_ids() {
        let html = PLAY_BY_PLAY.replace(" id=\"q1\"", "").replace(" id=\"q2\"", "");
        let events = parse_play_by_play(&html).unwrap();
        assert_eq!(events[0].period, 1);
        assert_eq!(events[3].period, 2);
    }

    #[test]
    fn test_parse_play_by_play_missing_score_is_none() {
        let html = PLAY_BY_PLAY.replace("<td>2-3</td><td>+3</td>", "<td></td><td>+3</td>");
        let events = parse_play_by_play(&html).unwrap();
        assert_eq!(events[2].score, None);
    }

    #[test]
    fn test_parse_play_by_play_bad_score_is_error() {
        let html = PLAY_BY_PLAY.replace("<td>2-3</td><td>+3</td>", "<td>2_3</td><td>+3</td>");
        assert_eq!(
            parse_play_by_play(&html),
            Err(DataError::InvalidScore("2_3".to_string()))
        );
    }

    fn box_table(abbr: &str, player: &str, pts: u32) -> String {
        let stats = |pts: u32| {
            format!(
                r#"<td data-stat="mp">36:12</td><td data-stat="fg">9</td><td data-stat="fga">18</td>
<td data-stat="fg3">2</td><td data-stat="fg3a">6</td><td data-stat="ft">4</td><td data-stat="fta">5</td>
<td data-stat="orb">1</td><td data-stat="drb">7</td><td data-stat="trb">8</td><td data-stat="ast">5</td>
<td data-stat="stl">1</td><td data-stat="blk">0</td><td data-stat="tov">3</td><td data-stat="pf">2</td>
<td data-stat="pts">{pts}</td>"#
            )
        };
        format!(
            r#"<table id="box-{abbr}-game-basic"><tbody>
<tr><th data-stat="player"><a href="/p">{player}</a></th>{}</tr>
<tr class="thead"><th>Reserves</th></tr>
<tr><th data-stat="player">Bench Guy</th><td data-stat="reason">Did Not Play</td></tr>
</tbody><tfoot><tr><th data-stat="player">Team Totals</th>{}</tr></tfoot></table>"#,
            stats(pts),
            stats(100)
        )
    }

    #[test]
    fn test_parse_box_score() {
        let html = format!(
            "<html><body>{}<!--{}--></body></html>",
            box_table("MIA", "Jimmy Butler", 25),
            box_table("MIL", "Khris Middleton", 31)
        );
        let box_score = parse_box_score(&html, "MIA", "MIL").unwrap();

        assert_eq!(box_score.away.players.len(), 1);
        assert_eq!(box_score.away.players[0].name, "Jimmy Butler");
        assert_eq!(box_score.away.players[0].stats.pts, 25);
        assert_eq!(box_score.home.players[0].stats.pts, 31);
        assert_eq!(box_score.home.totals.pts, 100);
        assert_eq!(box_score.home.totals.drb, 7);
        assert_eq!(box_score.players().count(), 2);
    }

    #[test]
    fn test_parse_box_score_missing_team() {
        let html = box_table("MIA", "Jimmy Butler", 25);
        assert_eq!(
            parse_box_score(&html, "MIA", "MIL"),
            Err(DataError::MissingTable("box-MIL-game-basic".to_string()))
        );
    }

    #[test]
    fn test_parse_injury_report() {
        let html = r#"<table id="injuries"><tbody>
<tr><th data-stat="player"><a href="/p">Giannis Antetokounmpo</a></th>
<td data-stat="team_name"><a href="/t">Milwaukee Bucks</a></td>
<td data-stat="date_update">Fri, May 21, 2021</td>
<td data-stat="note">Day To Day (Knee) - Antetokounmpo is questionable for Saturday.</td></tr>
<tr><th data-stat="player">Victor Oladipo</th>
<td data-stat="team_name">Miami Heat</td>
<td data-stat="date_update">Thu, May 20, 2021</td>
<td data-stat="note">Out For Season - Oladipo had surgery.</td></tr>
</tbody></table>"#;
        let injuries = parse_injury_report(html).unwrap();
        assert_eq!(injuries.len(), 2);
        assert_eq!(injuries[0].team_abbr, "MIL");
        assert_eq!(injuries[0].status, "Day To Day");
        assert_eq!(injuries[0].injury, "Knee");
        assert_eq!(injuries[1].status, "Out For Season");
        assert_eq!(injuries[1].injury, "");
        assert_eq!(injuries[1].date, NaiveDate::from_ymd_opt(2021, 5, 20).unwrap());
    }

    #[test]
    fn test_parse_standings() {
        let conference = |id: &str, teams: &[&str]| {
            let rows: String = teams
                .iter()
                .map(|t| {
                    format!(r#"<tr class="full_table"><th data-stat="team_name"><a href="/t">{t}</a>* <span>(1)</span></th></tr>"#)
                })
                .collect();
            format!(r#"<table id="{id}"><tbody>{rows}</tbody></table>"#)
        };
        let html = format!(
            "{}<!--{}-->",
            conference("confs_standings_E", &["Philadelphia 76ers", "Brooklyn Nets"]),
            conference("confs_standings_W", &["Utah Jazz"])
        );
        let standings = parse_standings(&html).unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].conference, "Eastern");
        assert_eq!(standings[0].teams[1].abbr, "BRK");
        assert_eq!(standings[1].teams[0].name, "Utah Jazz");
    }
}
