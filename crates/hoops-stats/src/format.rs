//! Post texts of a game thread and the season thread

use std::fmt::Write;

use crate::models::{BoxScore, Injury, PlayerLine, ScheduledGame, Score, TeamTotals};
use crate::stats::GameSummary;

/// Two injury posts are merged when together they stay within this many characters
pub const MERGED_INJURIES_LIMIT: usize = 278;

/// Sent instead of team stats when the game has no box score
pub const NO_BOX_SCORE: &str = "Sorry, no box scores for this game 🤷";

/// Player categories, in post order
const LEADER_STATS: [(&str, fn(&TeamTotals) -> u32); 5] = [
    ("PTS", |s| s.pts),
    ("TRB", |s| s.trb),
    ("AST", |s| s.ast),
    ("STL", |s| s.stl),
    ("BLK", |s| s.blk),
];

/// `#MIAvsMIL 105:104 on 2021-05-22`; first line of a game thread and the
/// marker searched for when checking for duplicates
pub fn game_marker(game: &ScheduledGame, score: Score) -> String {
    format!(
        "#{}vs{} {}:{} on {}",
        game.away.abbr,
        game.home.abbr,
        score.away,
        score.home,
        game.date.format("%Y-%m-%d")
    )
}

/// Main post: marker followed by the game flow numbers
pub fn summary_text(game: &ScheduledGame, score: Score, summary: &GameSummary) -> String {
    format!(
        "{}\nTies: {}\nLead changes: {}\nLargest lead: {}\n{} led: ~{}\n{} led: ~{}",
        game_marker(game, score),
        summary.ties,
        summary.lead_changes,
        summary.largest_lead,
        game.away.abbr,
        minutes_seconds(summary.away_led_seconds),
        game.home.abbr,
        minutes_seconds(summary.home_led_seconds),
    )
}

/// `m:ss`, seconds truncated
pub fn minutes_seconds(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Shooting, rebounding and other totals as `away / home`
pub fn team_stats_text(box_score: Option<&BoxScore>) -> String {
    let Some(box_score) = box_score else {
        return NO_BOX_SCORE.to_string();
    };
    let (a, h) = (&box_score.away.totals, &box_score.home.totals);

    let mut lines = vec![
        format!("FG: {} of {} / {} of {}", a.fg, a.fga, h.fg, h.fga),
        format!("3P: {} of {} / {} of {}", a.fg3, a.fg3a, h.fg3, h.fg3a),
        format!("FT: {} of {} / {} of {}", a.ft, a.fta, h.ft, h.fta),
        format!("DRB: {} of {} / {} of {}", a.drb, a.drb + a.orb, h.drb, h.drb + h.orb),
    ];
    for (stat, away, home) in [
        ("AST", a.ast, h.ast),
        ("STL", a.stl, h.stl),
        ("BLK", a.blk, h.blk),
        ("TOV", a.tov, h.tov),
        ("PF", a.pf, h.pf),
    ] {
        lines.push(format!("{stat}: {away} / {home}"));
    }
    lines.join("\n")
}

/// Top three players of both teams in each category
pub fn top_players_text(box_score: &BoxScore) -> String {
    let players: Vec<&PlayerLine> = box_score.players().collect();

    let mut text = String::new();
    for (stat, value) in LEADER_STATS {
        let mut ranked = players.clone();
        ranked.sort_by_key(|player| std::cmp::Reverse(value(&player.stats)));
        let leaders = ranked
            .iter()
            .take(3)
            .map(|player| format!("{} {}", shorten(&player.name), value(&player.stats)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(text, "{stat}: {leaders}");
    }
    text.trim_end().to_string()
}

/// "LeBron James" -> "L. James"; short or all-caps first names such as
/// "OG" or "CJ" and single names are kept
pub fn shorten(name: &str) -> String {
    let mut parts = name.split(' ');
    let first = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return name.to_string();
    }

    let first = if first.chars().count() > 2 && first.chars().any(char::is_lowercase) {
        first.chars().next().map(|c| format!("{c}.")).unwrap_or_default()
    } else {
        first.to_string()
    };

    std::iter::once(first.as_str())
        .chain(rest)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `G. Antetokounmpo Out 2021-05-20 Knee`
pub fn injury_line(injury: &Injury) -> String {
    format!(
        "{} {} {} {}",
        shorten(&injury.player),
        injury.status,
        injury.date.format("%Y-%m-%d"),
        injury.injury
    )
}

/// Injury posts of a game: one block per team with entries dated on or
/// before the game, merged into a single post when short enough
pub fn injury_posts(game: &ScheduledGame, injuries: &[Injury]) -> Vec<String> {
    let mut posts: Vec<String> = [&game.away.abbr, &game.home.abbr]
        .into_iter()
        .filter_map(|abbr| {
            let lines: Vec<String> = injuries
                .iter()
                .filter(|injury| &injury.team_abbr == abbr && injury.date <= game.date)
                .map(injury_line)
                .collect();
            (!lines.is_empty()).then(|| format!("{abbr}:\n{}", lines.join("\n")))
        })
        .collect();

    if let [away, home] = posts.as_slice() {
        if away.chars().count() + home.chars().count() <= MERGED_INJURIES_LIMIT {
            posts = vec![format!("{away}\n{home}")];
        }
    }
    posts
}

/// Injury lines of one team for the season thread
pub fn team_injuries_text(team_abbr: &str, injuries: &[Injury]) -> String {
    injuries
        .iter()
        .filter(|injury| injury.team_abbr == team_abbr)
        .map(injury_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Last post of a game thread
pub fn source_text(url: &str) -> String {
    format!("Source & more data: {url}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameId, Team, TeamBox};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, day).unwrap()
    }

    fn game() -> ScheduledGame {
        ScheduledGame {
            id: GameId::from_parts(date(22), "MIL"),
            date: date(22),
            away: Team {
                name: "Miami Heat".to_string(),
                abbr: "MIA".to_string(),
            },
            home: Team {
                name: "Milwaukee Bucks".to_string(),
                abbr: "MIL".to_string(),
            },
            final_score: Some(Score::new(107, 109)),
            playoffs: true,
        }
    }

    fn player(name: &str, team: &str, pts: u32, trb: u32, ast: u32) -> PlayerLine {
        PlayerLine {
            name: name.to_string(),
            team: team.to_string(),
            minutes: "30:00".to_string(),
            stats: TeamTotals {
                pts,
                trb,
                ast,
                ..TeamTotals::default()
            },
        }
    }

    fn injury(player: &str, team: &str, day: u32) -> Injury {
        Injury {
            player: player.to_string(),
            team_abbr: team.to_string(),
            date: date(day),
            status: "Out".to_string(),
            injury: "Knee".to_string(),
        }
    }

    #[test]
    fn test_summary_text() {
        let summary = GameSummary {
            ties: 3,
            lead_changes: 5,
            largest_lead: 12,
            largest_lead_side: None,
            away_led_seconds: 754.9,
            home_led_seconds: 2041.0,
        };
        let text = summary_text(&game(), Score::new(107, 109), &summary);
        assert_eq!(
            text,
            "#MIAvsMIL 107:109 on 2021-05-22\nTies: 3\nLead changes: 5\nLargest lead: 12\n\
             MIA led: ~12:34\nMIL led: ~34:01"
        );
    }

    #[test]
    fn test_team_stats_text() {
        let totals = TeamTotals {
            fg: 40,
            fga: 85,
            orb: 10,
            drb: 30,
            ast: 25,
            ..TeamTotals::default()
        };
        let box_score = BoxScore {
            away: TeamBox {
                abbr: "MIA".to_string(),
                players: vec![],
                totals,
            },
            home: TeamBox {
                abbr: "MIL".to_string(),
                players: vec![],
                totals: TeamTotals::default(),
            },
        };

        let text = team_stats_text(Some(&box_score));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "FG: 40 of 85 / 0 of 0");
        assert_eq!(lines[3], "DRB: 30 of 40 / 0 of 0");
        assert_eq!(lines[4], "AST: 25 / 0");
        assert_eq!(lines.len(), 9);
        assert_eq!(team_stats_text(None), NO_BOX_SCORE);
    }

    #[test]
    fn test_top_players_text() {
        let box_score = BoxScore {
            away: TeamBox {
                abbr: "MIA".to_string(),
                players: vec![player("Jimmy Butler", "MIA", 30, 8, 9), player("Bam Adebayo", "MIA", 20, 12, 4)],
                totals: TeamTotals::default(),
            },
            home: TeamBox {
                abbr: "MIL".to_string(),
                players: vec![
                    player("Giannis Antetokounmpo", "MIL", 31, 13, 5),
                    player("Jrue Holiday", "MIL", 18, 4, 10),
                ],
                totals: TeamTotals::default(),
            },
        };

        let text = top_players_text(&box_score);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "PTS: G. Antetokounmpo 31, J. Butler 30, B. Adebayo 20");
        assert_eq!(lines[1], "TRB: G. Antetokounmpo 13, B. Adebayo 12, J. Butler 8");
        assert_eq!(lines[2], "AST: J. Holiday 10, J. Butler 9, G. Antetokounmpo 5");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("LeBron James"), "L. James");
        assert_eq!(shorten("OG Anunoby"), "OG Anunoby");
        assert_eq!(shorten("CJ McCollum"), "CJ McCollum");
        assert_eq!(shorten("PJ Tucker"), "PJ Tucker");
        assert_eq!(shorten("Karl-Anthony Towns"), "K. Towns");
        assert_eq!(shorten("Gary Payton II"), "G. Payton II");
        assert_eq!(shorten("Nenê"), "Nenê");
    }

    #[test]
    fn test_injury_posts_merge_when_short() {
        let injuries = vec![
            injury("Victor Oladipo", "MIA", 10),
            injury("Donte DiVincenzo", "MIL", 20),
            injury("Future Guy", "MIL", 25),
            injury("Other Team", "BOS", 10),
        ];
        let posts = injury_posts(&game(), &injuries);
        assert_eq!(
            posts,
            vec!["MIA:\nV. Oladipo Out 2021-05-10 Knee\nMIL:\nD. DiVincenzo Out 2021-05-20 Knee".to_string()]
        );
    }

    #[test]
    fn test_injury_posts_stay_split_when_long() {
        let injuries: Vec<Injury> = (0..8)
            .flat_map(|i| {
                [
                    injury(&format!("Player Number{i}"), "MIA", 1),
                    injury(&format!("Player Number{i}"), "MIL", 1),
                ]
            })
            .collect();
        let posts = injury_posts(&game(), &injuries);
        assert_eq!(posts.len(), 2);
        assert!(posts[0].starts_with("MIA:\n"));
        assert!(posts[1].starts_with("MIL:\n"));
        assert!(injury_posts(&game(), &[]).is_empty());
    }

    #[test]
    fn test_team_injuries_and_source() {
        let injuries = vec![injury("Khris Middleton", "MIL", 1), injury("Bam Adebayo", "MIA", 1)];
        assert_eq!(team_injuries_text("MIL", &injuries), "K. Middleton Out 2021-05-01 Knee");
        assert_eq!(team_injuries_text("BOS", &injuries), "");
        assert_eq!(
            source_text("https://www.basketball-reference.com/boxscores/pbp/202105220MIL.html"),
            "Source & more data: https://www.basketball-reference.com/boxscores/pbp/202105220MIL.html"
        );
    }

    #[test]
    fn test_minutes_seconds() {
        assert_eq!(minutes_seconds(0.0), "0:00");
        assert_eq!(minutes_seconds(59.9), "0:59");
        assert_eq!(minutes_seconds(3725.0), "62:05");
    }
}
