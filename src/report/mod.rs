//! Report pipeline
//!
//! Runs aggregation and filter queries over the questions collection and
//! renders the resulting title lists as paginated PDF documents.

mod pdf;
mod queries;

pub use pdf::{PdfRenderer, NO_RESULTS_LINE};
pub use queries::{mean_view_count, titles_above, titles_matching, TitleRow};

use thiserror::Error;

/// Errors surfaced by the report pipeline
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Collection is empty; nothing to report")]
    EmptyCollection,

    #[error("Report query '{operation}' failed: {source}")]
    Query {
        operation: &'static str,
        source: mongodb::error::Error,
    },

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
