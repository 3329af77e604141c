//! # Normalizer
//!
//! Maps located records into [`Question`]s.

use qb_core::{
    Category, Clock, ImportError, ImportEvent, ImportObserver, NoopObserver, Question, QuestionId,
    SkipReason, SystemClock,
};
use serde_json::Value;

use crate::strategies::{self, Scan};
use crate::{category, dates, lookup, reconstruct, text};

const BODY_FIELDS: &[&str] = &["body", "content", "text", "summary"];
const TITLE_FIELDS: &[&str] = &["title", "summary"];
const TEXT_MARKER_FIELDS: &[&str] = &["type", "post_type"];
const CONVERTIBLE_TEXT_FIELDS: &[&str] = &["content", "body", "text", "title", "summary"];
const TAG_FIELDS: &[&str] = &["tags", "tag"];
const DATE_FIELDS: &[&str] = &["date", "timestamp", "created_at", "published_at", "updated_at"];
const AUTHOR_FIELDS: &[&str] = &["blog_name", "blog", "author", "user"];
const ID_FIELDS: &[&str] = &["id", "uuid", "slug"];
const URL_FIELDS: &[&str] = &["post_url", "url", "permalink"];

/// Characters of body text used as a title when the record has none.
const TITLE_PREVIEW_CHARS: usize = 50;

/// Tunables of the import mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Category when neither tags nor a reconstruction hint decide one
    pub default_category: Category,
    /// Author when the record names none
    pub placeholder_author: String,
    /// Prepended to the source identifier
    pub id_prefix: String,
    /// Most records rebuilt from dashboard history
    pub dashboard_limit: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            default_category: Category::Helsinki,
            placeholder_author: "Tumblrユーザー".to_string(),
            id_prefix: "tumblr_".to_string(),
            dashboard_limit: 20,
        }
    }
}

/// Turns export dumps of unknown shape into unanswered questions.
pub struct Normalizer {
    options: NormalizeOptions,
    clock: Box<dyn Clock>,
    observer: Box<dyn ImportObserver>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            clock: Box::new(SystemClock),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_observer(mut self, observer: impl ImportObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Parses `raw` and imports it; see [`Normalizer::import_document`].
    pub fn import_str(&self, raw: &str) -> Result<Vec<Question>, ImportError> {
        let document: Value = serde_json::from_str(raw)?;
        self.import_document(&document)
    }

    /// Board exports come back as-is, answers included. Anything else is normalized.
    pub fn import_document(&self, document: &Value) -> Result<Vec<Question>, ImportError> {
        if let Some(questions) = as_board_export(document) {
            tracing::info!(questions = questions.len(), "board export recognised");
            return Ok(questions);
        }
        self.normalize(document)
    }

    /// Locates the post collection and converts every convertible record, in source order.
    pub fn normalize(&self, document: &Value) -> Result<Vec<Question>, ImportError> {
        let scan = Scan {
            options: &self.options,
            observer: self.observer.as_ref(),
        };
        let Some(records) = strategies::locate(document, &scan)? else {
            let keys = document
                .as_object()
                .map(|root| root.keys().cloned().collect())
                .unwrap_or_default();
            return Err(ImportError::StructureNotFound { keys });
        };

        let questions: Vec<Question> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| self.convert(index, record))
            .collect();

        self.observer.on_event(&ImportEvent::Finished {
            converted: questions.len(),
            inspected: records.len(),
        });
        if questions.is_empty() {
            return Err(ImportError::NoContent { inspected: records.len() });
        }
        Ok(questions)
    }

    fn convert(&self, index: usize, record: &Value) -> Option<Question> {
        if !is_convertible(record) {
            self.skip(index, SkipReason::NotConvertible);
            return None;
        }

        let content = lookup::first_str(record, BODY_FIELDS)
            .map(text::strip_html)
            .unwrap_or_default();
        let title = match lookup::first_of(record, TITLE_FIELDS, |v| {
            lookup::non_empty_str(v).map(str::trim).filter(|t| !t.is_empty())
        }) {
            Some(title) => title.to_string(),
            None => text::truncate_chars(&content, TITLE_PREVIEW_CHARS),
        };
        if title.is_empty() && content.is_empty() {
            self.skip(index, SkipReason::Empty);
            return None;
        }

        let tags = lookup::first_of(record, TAG_FIELDS, lookup::string_list).unwrap_or_default();
        let category = category::infer_from_tags(&tags)
            .or_else(|| {
                lookup::first_str(record, &[reconstruct::CATEGORY_HINT_KEY]).and_then(|c| c.parse().ok())
            })
            .unwrap_or(self.options.default_category);
        let date = lookup::first_of(record, DATE_FIELDS, dates::parse_date_value)
            .unwrap_or_else(|| self.clock.today());
        let author = lookup::first_str(record, AUTHOR_FIELDS)
            .unwrap_or(self.options.placeholder_author.as_str())
            .to_string();
        let source_id = lookup::first_of(record, ID_FIELDS, lookup::scalar_text)
            .unwrap_or_else(|| index.to_string());
        let id = QuestionId::new(format!("{}{}", self.options.id_prefix, source_id));

        self.observer.on_event(&ImportEvent::RecordConverted { index, id: id.clone() });
        Some(Question {
            id,
            title,
            content,
            category,
            author,
            date,
            answer: None,
            tumblr_url: lookup::first_str(record, URL_FIELDS).unwrap_or_default().to_string(),
            tumblr_tags: tags,
        })
    }

    fn skip(&self, index: usize, reason: SkipReason) {
        self.observer.on_event(&ImportEvent::RecordSkipped { index, reason });
    }
}

/// A `text` type marker, or any non-empty body- or title-like string.
fn is_convertible(record: &Value) -> bool {
    lookup::first_of(record, TEXT_MARKER_FIELDS, |v| (v.as_str() == Some("text")).then_some(()))
        .is_some()
        || lookup::first_str(record, CONVERTIBLE_TEXT_FIELDS).is_some()
}

/// An array in which every element reads as an exported [`Question`].
/// `[]` is the export of an empty board.
fn as_board_export(document: &Value) -> Option<Vec<Question>> {
    document
        .as_array()?
        .iter()
        .map(|item| serde_json::from_value::<Question>(item.clone()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use qb_core::MockClock;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ImportEvent>>);

    impl ImportObserver for Recorder {
        fn on_event(&self, event: &ImportEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_today()
            .returning(|| NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        clock
    }

    fn normalizer() -> Normalizer {
        Normalizer::default().with_clock(fixed_clock())
    }

    #[test]
    fn test_reference_example() {
        let doc = json!({"posts":[{"type":"text","title":"Header broken on mobile","body":"<p>Help</p>","tags":["responsive"],"date":"2025-06-20"}]});
        let questions = normalizer().normalize(&doc).unwrap();

        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.title, "Header broken on mobile");
        assert_eq!(q.content, "Help");
        assert_eq!(q.category, Category::Helsinki);
        assert_eq!(q.date, NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        assert!(!q.is_answered());
        assert_eq!(q.id.as_str(), "tumblr_0");
        assert_eq!(q.author, "Tumblrユーザー");
        assert_eq!(q.tumblr_tags, vec!["responsive".to_string()]);
    }

    #[test]
    fn test_empty_object_lists_no_keys() {
        match normalizer().normalize(&json!({})) {
            Err(ImportError::StructureNotFound { keys }) => assert!(keys.is_empty()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_structure_not_found_lists_root_keys_in_order() {
        match normalizer().normalize(&json!({ "zeta": 1, "alpha": "x" })) {
            Err(ImportError::StructureNotFound { keys }) => assert_eq!(keys, vec!["zeta", "alpha"]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_title_falls_back_to_truncated_body() {
        let body = format!("<div>{}</div>", "あ".repeat(60));
        let doc = json!({ "posts": [{ "body": body }] });
        let q = &normalizer().normalize(&doc).unwrap()[0];
        assert_eq!(q.title, format!("{}...", "あ".repeat(50)));
        assert_eq!(q.content.chars().count(), 60);
    }

    #[test]
    fn test_records_without_title_or_body_are_skipped() {
        let doc = json!({ "posts": [
            { "type": "text", "title": "kept" },
            { "type": "text", "body": "<p></p>" },
            { "type": "photo", "photos": [] },
            { "type": "text" }
        ]});
        let recorder = Arc::new(Recorder::default());
        let questions = normalizer().with_observer(recorder.clone()).normalize(&doc).unwrap();

        assert_eq!(questions.len(), 1);
        let events = recorder.0.lock().unwrap();
        assert!(events.contains(&ImportEvent::RecordSkipped { index: 1, reason: SkipReason::Empty }));
        assert!(events.contains(&ImportEvent::RecordSkipped { index: 2, reason: SkipReason::NotConvertible }));
        assert!(events.contains(&ImportEvent::RecordSkipped { index: 3, reason: SkipReason::Empty }));
        assert_eq!(events.last(), Some(&ImportEvent::Finished { converted: 1, inspected: 4 }));
    }

    #[test]
    fn test_no_convertible_records_is_no_content() {
        let doc = json!({ "posts": [{ "type": "photo" }, { "type": "video" }] });
        match normalizer().normalize(&doc) {
            Err(ImportError::NoContent { inspected }) => assert_eq!(inspected, 2),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_timestamp_only() {
        let doc = json!({ "posts": [{ "title": "t", "timestamp": 1718884800 }] });
        let q = &normalizer().normalize(&doc).unwrap()[0];
        assert_eq!(q.date, NaiveDate::from_ymd_opt(2024, 6, 20).unwrap());
    }

    #[test]
    fn test_unparseable_date_falls_through_to_next_field() {
        let doc = json!({ "posts": [{ "title": "t", "date": "someday", "created_at": "2024-02-03" }] });
        let q = &normalizer().normalize(&doc).unwrap()[0];
        assert_eq!(q.date, NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
    }

    #[test]
    fn test_no_date_uses_clock() {
        let doc = json!({ "posts": [{ "title": "t" }] });
        let q = &normalizer().normalize(&doc).unwrap()[0];
        assert_eq!(q.date, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
    }

    #[test]
    fn test_author_and_id_fallbacks() {
        let doc = json!({ "posts": [
            { "title": "a", "blog": "base-copenhagen", "uuid": "u-1" },
            { "title": "b", "user": "someone", "slug": "slug-b" },
            { "title": "c", "id": 721000000000000001u64, "blog_name": "shop" }
        ]});
        let qs = normalizer().normalize(&doc).unwrap();
        assert_eq!((qs[0].author.as_str(), qs[0].id.as_str()), ("base-copenhagen", "tumblr_u-1"));
        assert_eq!((qs[1].author.as_str(), qs[1].id.as_str()), ("someone", "tumblr_slug-b"));
        assert_eq!(qs[2].id.as_str(), "tumblr_721000000000000001");
        assert_eq!(qs[2].author, "shop");
    }

    #[test]
    fn test_category_hint_loses_to_tags() {
        let hint = reconstruct::CATEGORY_HINT_KEY;
        let doc = json!({ "posts": [
            { "title": "a", hint: "Amsterdam", "tags": ["minimal"] },
            { "title": "b", hint: "Amsterdam", "tags": ["css"] },
            { "title": "c", hint: "Oslo" }
        ]});
        let qs = normalizer().normalize(&doc).unwrap();
        assert_eq!(qs[0].category, Category::Stockholm);
        assert_eq!(qs[1].category, Category::Amsterdam);
        assert_eq!(qs[2].category, Category::Helsinki);
    }

    #[test]
    fn test_source_category_field_is_ignored() {
        let doc = json!({ "posts": [{ "type": "text", "title": "t", "body": "b", "category": "Amsterdam" }] });
        let q = &normalizer().normalize(&doc).unwrap()[0];
        assert_eq!(q.category, Category::Helsinki);
    }

    #[test]
    fn test_blank_title_falls_back_to_body() {
        let doc = json!({ "posts": [
            { "type": "text", "title": "   ", "body": "<p>Real question body</p>" },
            { "type": "text", "title": " ", "summary": "Short summary" }
        ]});
        let qs = normalizer().normalize(&doc).unwrap();
        assert_eq!(qs[0].title, "Real question body");
        assert_eq!(qs[0].content, "Real question body");
        assert_eq!(qs[1].title, "Short summary");
    }

    #[test]
    fn test_blank_title_without_body_is_skipped() {
        let doc = json!({ "posts": [{ "type": "text", "title": "  \n " }, { "title": "kept" }] });
        let qs = normalizer().normalize(&doc).unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].title, "kept");
    }

    #[test]
    fn test_empty_board_export_imports_nothing() {
        assert_eq!(normalizer().import_str("[]").unwrap(), Vec::<Question>::new());
        assert!(matches!(
            normalizer().normalize(&json!([])),
            Err(ImportError::StructureNotFound { .. })
        ));
    }

    #[test]
    fn test_options_change_defaults() {
        let options = NormalizeOptions {
            default_category: Category::Copenhagen,
            placeholder_author: "guest".into(),
            id_prefix: "src:".into(),
            dashboard_limit: 20,
        };
        let doc = json!({ "posts": [{ "title": "t" }] });
        let q = &Normalizer::new(options).with_clock(fixed_clock()).normalize(&doc).unwrap()[0];
        assert_eq!((q.category, q.author.as_str(), q.id.as_str()), (Category::Copenhagen, "guest", "src:0"));
    }

    #[test]
    fn test_provenance_fields() {
        let doc = json!({ "posts": [{ "title": "t", "url": "https://x.tumblr.com/post/9", "tag": "モダン" }] });
        let q = &normalizer().normalize(&doc).unwrap()[0];
        assert_eq!(q.tumblr_url, "https://x.tumblr.com/post/9");
        assert_eq!(q.tumblr_tags, vec!["モダン".to_string()]);
        assert_eq!(q.category, Category::Copenhagen);
    }

    #[test]
    fn test_import_str_reports_parse_errors() {
        assert!(matches!(normalizer().import_str("{not json"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_strategy_events_are_reported() {
        let recorder = Arc::new(Recorder::default());
        let doc = json!({ "response": { "posts": [{ "title": "t" }] } });
        normalizer().with_observer(recorder.clone()).normalize(&doc).unwrap();

        let events = recorder.0.lock().unwrap();
        assert_eq!(events[0], ImportEvent::StrategyMissed { strategy: "root.posts" });
        assert_eq!(events[1], ImportEvent::StrategyMatched { strategy: "response.posts", records: 1 });
    }
}
