//! Outcome types of a bot run

use serde::Serialize;

use crate::models::GameId;
use crate::publish::PostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeStatus {
    /// Thread posted
    Posted,
    /// Marker found among recent posts, nothing posted
    AlreadyPosted,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Posted => write!(f, "posted"),
            Self::AlreadyPosted => write!(f, "already posted"),
        }
    }
}

/// What happened to one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    pub game_id: GameId,
    pub marker: String,
    pub status: OutcomeStatus,
    /// Posts of the thread, first post first
    pub posts: Vec<PostId>,
}

impl GameOutcome {
    pub fn skipped(game_id: GameId, marker: String) -> Self {
        Self {
            game_id,
            marker,
            status: OutcomeStatus::AlreadyPosted,
            posts: Vec::new(),
        }
    }

    /// First post of the thread
    pub fn thread(&self) -> Option<&PostId> {
        self.posts.first()
    }
}

/// One post of the season thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonPost {
    pub conference: String,
    pub rank: usize,
    pub team_abbr: String,
    pub wins: u32,
    pub games: usize,
    pub post: PostId,
}
