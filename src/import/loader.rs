//! Load pipeline: drain a posts source, keep the most viewed questions,
//! and replace the collection contents with them.

use super::posts::PostsSource;
use super::source::{ImportError, LoadStats};
use crate::store::{Store, StoreError};
use crate::types::Question;
use crate::util::clip_line;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::BufRead;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by the load pipeline
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives one load run end to end
pub struct Loader {
    top_n: usize,
    quiet: bool,
}

impl Loader {
    pub fn new(top_n: usize) -> Self {
        Self { top_n, quiet: false }
    }

    /// Suppress the interactive progress spinner
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Parse every row, rank by view count, and overwrite the collection
    /// with the selection. The collection is only touched after the whole
    /// file has parsed cleanly.
    pub async fn run<R: BufRead>(
        &self,
        store: &Store,
        mut source: PostsSource<R>,
    ) -> Result<LoadStats, LoadError> {
        let started = Instant::now();
        let progress = self.spinner();

        let mut records = Vec::new();
        for outcome in &mut source {
            let question = outcome?;
            if let Some(pb) = &progress {
                pb.inc(1);
                pb.set_message(clip_line(&question.title, 40));
            }
            records.push(question);
        }

        let rows_read = source.rows_read();
        let replies_skipped = source.replies_skipped();
        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }
        info!(
            "Parsed {} rows: {} questions, {} replies skipped",
            rows_read,
            records.len(),
            replies_skipped
        );

        let selected = select_top_n(records, self.top_n);
        info!("Selected top {} questions by view count", selected.len());

        let documents_deleted = store.delete_all().await?;
        let documents_inserted = store.insert_all(&selected).await?;

        Ok(LoadStats {
            rows_read,
            replies_skipped,
            records_selected: selected.len(),
            documents_deleted,
            documents_inserted,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        })
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {pos} rows  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Some(pb)
    }
}

/// Keep the `n` records with the highest view counts, most viewed first
pub fn select_top_n(mut records: Vec<Question>, n: usize) -> Vec<Question> {
    records.sort_unstable_by(|a, b| b.view_count.cmp(&a.view_count));
    records.truncate(n);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(id: &str, view_count: i64) -> Question {
        let now = Utc::now();
        Question {
            id: id.to_string(),
            title: format!("Question {id}"),
            body: "<p>body</p>".to_string(),
            tags: vec!["rust".to_string()],
            score: 1,
            view_count,
            answer_count: 0,
            comment_count: 0,
            creation_date: now,
            last_activity_date: now,
            content_license: "CC BY-SA 4.0".to_string(),
            owner_user_id: "1".to_string(),
            accepted_answer_id: None,
        }
    }

    #[test]
    fn ranks_by_view_count_descending() {
        let records = vec![question("a", 10), question("b", 300), question("c", 20)];
        let selected = select_top_n(records, 10);
        let ids: Vec<&str> = selected.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn truncates_to_the_requested_size() {
        let records = (0..50).map(|i| question(&i.to_string(), i)).collect();
        let selected = select_top_n(records, 10);
        assert_eq!(selected.len(), 10);
        assert_eq!(selected[0].view_count, 49);
        assert_eq!(selected[9].view_count, 40);
    }

    #[test]
    fn keeps_everything_when_fewer_than_n() {
        let records = vec![question("a", 1), question("b", 2)];
        assert_eq!(select_top_n(records, 10_000).len(), 2);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_top_n(Vec::new(), 10_000).is_empty());
    }
}
