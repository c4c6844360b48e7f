//! Core data types shared by the loader and report pipelines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a question, as carried by the source export
pub type QuestionId = String;

/// A top-level question as persisted in the store.
///
/// Serde field names follow the collection's document schema (camelCase),
/// so the struct round-trips through the driver without manual BSON
/// assembly. Timestamps serialize to native BSON datetimes, which carry
/// millisecond precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub score: i64,
    pub view_count: i64,
    pub answer_count: i64,
    pub comment_count: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub creation_date: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_activity_date: DateTime<Utc>,
    pub content_license: String,
    pub owner_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_answer_id: Option<QuestionId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_question() -> Question {
        Question {
            id: "4".to_string(),
            title: "Convert Decimal to Double?".to_string(),
            body: "<p>I want to convert a decimal to a double.</p>".to_string(),
            tags: vec!["c#".to_string(), "floating-point".to_string()],
            score: 786,
            view_count: 64479,
            answer_count: 13,
            comment_count: 2,
            creation_date: Utc.with_ymd_and_hms(2008, 7, 31, 21, 42, 52).unwrap(),
            last_activity_date: Utc.with_ymd_and_hms(2019, 7, 19, 1, 39, 54).unwrap(),
            content_license: "CC BY-SA 4.0".to_string(),
            owner_user_id: "8".to_string(),
            accepted_answer_id: Some("7".to_string()),
        }
    }

    #[test]
    fn serializes_to_camel_case_document() {
        let doc = bson::to_document(&sample_question()).unwrap();

        assert_eq!(doc.get_str("id").unwrap(), "4");
        assert_eq!(doc.get_i64("viewCount").unwrap(), 64479);
        assert_eq!(doc.get_i64("answerCount").unwrap(), 13);
        assert_eq!(doc.get_str("contentLicense").unwrap(), "CC BY-SA 4.0");
        assert_eq!(doc.get_str("ownerUserId").unwrap(), "8");
        assert_eq!(doc.get_str("acceptedAnswerId").unwrap(), "7");
        assert!(doc.get_datetime("creationDate").is_ok());
        assert!(doc.get_datetime("lastActivityDate").is_ok());
    }

    #[test]
    fn missing_accepted_answer_is_omitted() {
        let mut question = sample_question();
        question.accepted_answer_id = None;
        let doc = bson::to_document(&question).unwrap();
        assert!(!doc.contains_key("acceptedAnswerId"));
    }

    #[test]
    fn round_trips_through_bson() {
        let question = sample_question();
        let doc = bson::to_document(&question).unwrap();
        let back: Question = bson::from_document(doc).unwrap();
        assert_eq!(back, question);
    }
}
