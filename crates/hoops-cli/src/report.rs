//! Run summaries printed after a run

use comfy_table::Table;
use hoops_stats::{GameOutcome, SeasonPost};

pub fn games_table(outcomes: &[GameOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Game", "Marker", "Status", "Posts", "Thread"]);
    for outcome in outcomes {
        table.add_row(vec![
            outcome.game_id.to_string(),
            outcome.marker.clone(),
            outcome.status.to_string(),
            outcome.posts.len().to_string(),
            outcome.thread().map(ToString::to_string).unwrap_or_default(),
        ]);
    }
    table
}

pub fn season_table(posts: &[SeasonPost]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Conference", "Rank", "Team", "Record", "Post"]);
    for post in posts {
        table.add_row(vec![
            post.conference.clone(),
            post.rank.to_string(),
            post.team_abbr.clone(),
            format!("{} in {}", post.wins, post.games),
            post.post.to_string(),
        ]);
    }
    table
}
