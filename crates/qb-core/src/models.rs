//! # Domain Models
//!
//! These structs represent the core entities of the Q&A board.
//! A `Question` owns its `Answer`; there is no separate answer entity.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Opaque identifier of a question.
///
/// Older exports carry numeric ids, so deserialization accepts both JSON
/// strings and numbers and keeps the textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(id),
            RawId::Number(id) => Self(id.to_string()),
        })
    }
}

/// The design theme a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Helsinki,
    Stockholm,
    Copenhagen,
    Amsterdam,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Helsinki,
        Category::Stockholm,
        Category::Copenhagen,
        Category::Amsterdam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Helsinki => "Helsinki",
            Category::Stockholm => "Stockholm",
            Category::Copenhagen => "Copenhagen",
            Category::Amsterdam => "Amsterdam",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::ValidationError(format!("unknown category '{}'", wanted)))
    }
}

/// A staff reply to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub date: NaiveDate,
}

/// The central entity: one support question, optionally answered.
///
/// Serialized flat (`answered`, `answer`, `answerDate`) through [`QuestionRecord`];
/// the `Option<Answer>` makes "answered without an answer" unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub author: String,
    pub date: NaiveDate,
    pub answer: Option<Answer>,
    /// Source permalink for imported questions, empty otherwise
    pub tumblr_url: String,
    /// Source tags for imported questions, display-only
    pub tumblr_tags: Vec<String>,
}

impl Question {
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    /// Same question under a different id; used when merging imports.
    pub fn with_id(self, id: QuestionId) -> Self {
        Self { id, ..self }
    }
}

/// Wire shape of a [`Question`], as found in board exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub author: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub answered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tumblr_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tumblr_tags: Vec<String>,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = AppError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let answer = match (record.answered, record.answer, record.answer_date) {
            (true, Some(text), Some(date)) => Some(Answer { text, date }),
            (true, _, _) => {
                return Err(AppError::ValidationError(format!(
                    "question {} is marked answered but lacks answer or answerDate",
                    record.id
                )))
            }
            // Stray answer fields on an unanswered record are dropped.
            (false, _, _) => None,
        };

        Ok(Question {
            id: record.id,
            title: record.title,
            content: record.content,
            category: record.category,
            author: record.author,
            date: record.date,
            answer,
            tumblr_url: record.tumblr_url,
            tumblr_tags: record.tumblr_tags,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let (answer, answer_date) = match question.answer {
            Some(Answer { text, date }) => (Some(text), Some(date)),
            None => (None, None),
        };

        QuestionRecord {
            answered: answer.is_some(),
            id: question.id,
            title: question.title,
            content: question.content,
            category: question.category,
            author: question.author,
            date: question.date,
            answer,
            answer_date,
            tumblr_url: question.tumblr_url,
            tumblr_tags: question.tumblr_tags,
        }
    }
}

/// User-submitted form for a new question. Fields arrive as raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewQuestion {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
}

impl NewQuestion {
    /// Checks every required field and resolves the category.
    /// The error names the first missing field in form order.
    pub fn validate(&self) -> Result<Category, AppError> {
        let required = [
            ("title", &self.title),
            ("content", &self.content),
            ("category", &self.category),
            ("author", &self.author),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::ValidationError(format!("{} is required", field)));
        }
        self.category.parse()
    }
}

/// Answered-state selector of the board filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Answered,
    Unanswered,
}

impl StatusFilter {
    pub fn admits(&self, answered: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Answered => answered,
            StatusFilter::Unanswered => !answered,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "answered" => Ok(StatusFilter::Answered),
            "unanswered" => Ok(StatusFilter::Unanswered),
            other => Err(AppError::ValidationError(format!("unknown status '{}'", other))),
        }
    }
}

/// Transient view filter: search text, category and answered state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Case-insensitive substring matched against title and content
    pub search: String,
    /// `None` admits every category
    pub category: Option<Category>,
    pub status: StatusFilter,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn matches(&self, question: &Question) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = question.title.to_lowercase().contains(&needle)
            || question.content.to_lowercase().contains(&needle);
        let matches_category = self.category.map_or(true, |c| c == question.category);

        matches_search && matches_category && self.status.admits(question.is_answered())
    }
}

/// Aggregate counts shown in the board header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
}
