//! Aggregation and filter queries backing the reports

use super::ReportError;
use crate::store::Store;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use serde::Deserialize;
use tracing::debug;

/// Projection row carrying only a question title
#[derive(Debug, Clone, Deserialize)]
pub struct TitleRow {
    pub title: String,
}

/// Mean view count across the whole collection.
///
/// Fails with [`ReportError::EmptyCollection`] when there are no
/// questions to average over.
pub async fn mean_view_count(store: &Store) -> Result<f64, ReportError> {
    let pipeline = vec![doc! {
        "$group": {
            "_id": null,
            "avgViewCount": { "$avg": "$viewCount" },
        }
    }];

    let mut cursor = store
        .questions()
        .aggregate(pipeline)
        .await
        .map_err(|source| ReportError::Query { operation: "aggregate", source })?;

    let group = cursor
        .try_next()
        .await
        .map_err(|source| ReportError::Query { operation: "aggregate", source })?
        .ok_or(ReportError::EmptyCollection)?;

    // $avg yields null only when no values were seen
    group
        .get_f64("avgViewCount")
        .map_err(|_| ReportError::EmptyCollection)
}

/// Titles of questions viewed more often than `threshold`
pub async fn titles_above(store: &Store, threshold: f64) -> Result<Vec<String>, ReportError> {
    let filter = doc! { "viewCount": { "$gt": threshold } };
    collect_titles(store, filter, "find above threshold").await
}

/// Titles containing any of the keywords, case-insensitively
pub async fn titles_matching(
    store: &Store,
    keywords: &[String],
) -> Result<Vec<String>, ReportError> {
    let pattern = keyword_pattern(keywords);
    let filter = doc! { "title": { "$regex": &pattern, "$options": "i" } };
    collect_titles(store, filter, "find by keyword").await
}

/// Alternation pattern over the keywords, with regex metacharacters escaped
fn keyword_pattern(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|")
}

async fn collect_titles(
    store: &Store,
    filter: Document,
    operation: &'static str,
) -> Result<Vec<String>, ReportError> {
    let cursor = store
        .questions_as::<TitleRow>()
        .find(filter)
        .projection(doc! { "title": 1, "_id": 0 })
        .await
        .map_err(|source| ReportError::Query { operation, source })?;

    let rows: Vec<TitleRow> = cursor
        .try_collect()
        .await
        .map_err(|source| ReportError::Query { operation, source })?;

    debug!("Query '{}' matched {} titles", operation, rows.len());
    Ok(rows.into_iter().map(|row| row.title).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn joins_keywords_into_an_alternation() {
        let pattern = keyword_pattern(&keywords(&["pug", "wig", "yak"]));
        assert_eq!(pattern, "pug|wig|yak");
    }

    #[test]
    fn escapes_regex_metacharacters() {
        let pattern = keyword_pattern(&keywords(&["c++", "f#"]));
        assert_eq!(pattern, r"c\+\+|f\#");
    }

    #[test]
    fn pattern_matches_case_insensitively() {
        let pattern = keyword_pattern(&keywords(&["mug", "zap"]));
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .unwrap();

        assert!(re.is_match("Favorite Mug rack designs"));
        assert!(re.is_match("how to ZAP a PRAM"));
        assert!(!re.is_match("Best ceramic cup?"));
    }
}
