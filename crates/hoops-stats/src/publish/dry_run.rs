//! Publisher that writes posts to disk

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

use super::{Post, PostId, Publisher};
use crate::error::Result;

/// Writes each post as `dry-run-NNN.txt` (plus a copy of its image) into a
/// directory and hands out sequential ids. Never touches the network.
#[derive(Debug)]
pub struct DryRunPublisher {
    dir: PathBuf,
    char_limit: usize,
    posted: Mutex<Vec<String>>,
}

impl DryRunPublisher {
    pub fn new(dir: impl Into<PathBuf>, char_limit: usize) -> Self {
        Self {
            dir: dir.into(),
            char_limit,
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Texts published so far, in order
    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().map(|posted| posted.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn publish(&self, post: Post) -> Result<PostId> {
        std::fs::create_dir_all(&self.dir)?;

        let text = hoops_utils::truncate_chars(&post.text, self.char_limit).to_string();
        let mut posted = self
            .posted
            .lock()
            .map_err(|_| crate::error::HoopsError::ApiError("dry-run log poisoned".to_string()))?;
        let id = PostId(format!("dry-run-{:03}", posted.len() + 1));

        let mut record = String::new();
        if let Some(reply_to) = &post.reply_to {
            record.push_str(&format!("reply-to: {reply_to}\n"));
        }
        if let Some(quote) = &post.quote {
            record.push_str(&format!("quote: {quote}\n"));
        }
        if let Some(image) = &post.image {
            let copy = self.dir.join(format!("{id}.{}", image.format.extension()));
            std::fs::write(&copy, &image.bytes)?;
            record.push_str(&format!("image: {}\n", copy.display()));
        }
        record.push('\n');
        record.push_str(&text);
        record.push('\n');

        std::fs::write(self.dir.join(format!("{id}.txt")), record)?;
        info!("[dry run] {id}: {}", text.lines().next().unwrap_or_default());

        posted.push(text);
        Ok(id)
    }
}
