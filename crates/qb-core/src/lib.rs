//! qa-board/crates/qb-core/src/lib.rs
//!
//! The central domain types and interface definitions for the Q&A board.

pub mod models;
pub mod traits;
pub mod error;
pub mod defaults;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
pub use defaults::*;


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(answer: Option<Answer>) -> Question {
        Question {
            id: QuestionId::new("1"),
            title: "Header broken on mobile".to_string(),
            content: "The menu overlaps the logo".to_string(),
            category: Category::Helsinki,
            author: "Yamada".to_string(),
            date: date(2025, 6, 20),
            answer,
            tumblr_url: String::new(),
            tumblr_tags: Vec::new(),
        }
    }

    #[test]
    fn test_answered_question_serializes_flat() {
        let q = sample(Some(Answer { text: "Check the media query".into(), date: date(2025, 6, 21) }));
        let json = serde_json::to_value(&q).unwrap();

        assert_eq!(json["answered"], true);
        assert_eq!(json["answer"], "Check the media query");
        assert_eq!(json["answerDate"], "2025-06-21");
        assert_eq!(json["date"], "2025-06-20");
        assert!(json.get("tumblrUrl").is_none());
    }

    #[test]
    fn test_unanswered_question_omits_answer_fields() {
        let json = serde_json::to_value(sample(None)).unwrap();
        assert_eq!(json["answered"], false);
        assert!(json.get("answer").is_none());
        assert!(json.get("answerDate").is_none());
    }

    #[test]
    fn test_answered_without_answer_date_is_rejected() {
        let raw = serde_json::json!({
            "id": 3, "title": "t", "content": "c", "category": "Stockholm",
            "author": "a", "date": "2025-06-15", "answered": true, "answer": "x"
        });
        assert!(serde_json::from_value::<Question>(raw).is_err());
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let raw = serde_json::json!({
            "id": 1718900000123u64, "title": "t", "content": "c", "category": "Copenhagen",
            "author": "a", "date": "2025-06-15", "answered": false
        });
        let q: Question = serde_json::from_value(raw).unwrap();
        assert_eq!(q.id.as_str(), "1718900000123");
        assert_eq!(q.category, Category::Copenhagen);
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(" amsterdam ".parse::<Category>().unwrap(), Category::Amsterdam);
        assert!("Oslo".parse::<Category>().is_err());
    }

    #[test]
    fn test_new_question_names_first_missing_field() {
        let form = NewQuestion {
            title: "Fonts".into(),
            content: "   ".into(),
            category: String::new(),
            author: "Sato".into(),
        };
        match form.validate() {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "content is required"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_filter_matches_search_category_and_status() {
        let q = sample(None);
        assert!(Filter::new().with_search("HEADER").matches(&q));
        assert!(Filter::new().with_search("logo").matches(&q));
        assert!(!Filter::new().with_category(Some(Category::Amsterdam)).matches(&q));
        assert!(!Filter::new().with_status(StatusFilter::Answered).matches(&q));
        assert!(Filter::new().with_status(StatusFilter::Unanswered).matches(&q));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("Answered".parse::<StatusFilter>().unwrap(), StatusFilter::Answered);
        assert!("pending".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_account_summary_mentions_missing_history() {
        let summary = AccountSummary {
            blog_names: vec!["base-helsinki".into()],
            registration_time: Some("2020-01-01".into()),
            last_post_time: None,
        };
        let msg = ImportError::NoAccountPosts(summary).to_string();
        assert!(msg.contains("base-helsinki"));
        assert!(msg.contains("no post history"));
    }

    #[test]
    fn test_uuid_generator_yields_distinct_ids() {
        let ids = UuidV7Generator;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
