//! Posts import pipeline
//!
//! Turns a StackExchange Posts.xml export into the contents of the
//! questions collection:
//!
//! ```text
//! Posts.xml ──> PostsSource ──> select_top_n ──> Store
//!               (parse rows)    (rank by views)  (replace collection)
//! ```
//!
//! Parsing is strict: a malformed row aborts the run before anything in
//! the collection is touched.

mod loader;
mod posts;
mod source;

pub use loader::{select_top_n, LoadError, Loader};
pub use posts::PostsSource;
pub use source::{ImportError, LoadStats};
