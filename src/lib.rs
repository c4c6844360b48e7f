//! Postdex: StackExchange posts loader and report generator
//!
//! Loads the most viewed questions of a StackExchange Posts.xml export
//! into MongoDB, then renders PDF reports over the stored collection:
//! - Strict streaming XML parsing into typed question records
//! - Top-N selection by view count with full collection replacement
//! - Aggregation-backed reports (above-average views, keyword matches)
//! - Paginated PDF output with a fixed page layout

pub mod config;
pub mod import;
pub mod logging;
pub mod report;
pub mod store;
pub mod types;
pub mod util;

pub use config::Config;
pub use types::Question;
