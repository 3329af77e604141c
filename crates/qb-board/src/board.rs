//! # Board
//!
//! The authoritative in-memory question list. Newest questions come first.

use qb_core::{
    Answer, AppError, BoardStats, Clock, Filter, IdGenerator, NewQuestion, Question, QuestionId,
    Result, SystemClock, UuidV7Generator,
};

use crate::seed;
use crate::session::ImportSession;

/// File name offered for board exports.
pub const EXPORT_FILE_NAME: &str = "qa-data.json";

pub struct Board {
    questions: Vec<Question>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Box::new(SystemClock), Box::new(UuidV7Generator))
    }
}

impl Board {
    pub fn new(clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            questions: Vec::new(),
            clock,
            ids,
        }
    }

    /// A board holding the sample questions.
    pub fn seeded(clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self::new(clock, ids).with_questions(seed::sample_questions())
    }

    /// Replaces the list wholesale, keeping the given ids. Used to restore a saved board.
    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Validates the form and prepends an unanswered question dated today.
    pub fn add_question(&mut self, form: NewQuestion) -> Result<&Question> {
        let category = form.validate()?;
        let question = Question {
            id: self.ids.next_id(),
            title: form.title,
            content: form.content,
            category,
            author: form.author,
            date: self.clock.today(),
            answer: None,
            tumblr_url: String::new(),
            tumblr_tags: Vec::new(),
        };
        tracing::info!(id = %question.id, category = %category, "question added");

        self.questions.insert(0, question);
        Ok(&self.questions[0])
    }

    /// Records (or overwrites) the answer to question `id`, dated today.
    pub fn answer_question(&mut self, id: &QuestionId, text: impl Into<String>) -> Result<&Question> {
        let today = self.clock.today();
        let question = self
            .questions
            .iter_mut()
            .find(|q| &q.id == id)
            .ok_or_else(|| AppError::NotFound("Question".to_string(), id.to_string()))?;

        if question.is_answered() {
            tracing::debug!(id = %id, "overwriting previous answer");
        }
        question.answer = Some(Answer { text: text.into(), date: today });
        Ok(question)
    }

    /// Prepends `records` in their given order, each under a fresh id.
    pub fn import_questions(&mut self, records: Vec<Question>) -> usize {
        let imported: Vec<Question> = records
            .into_iter()
            .map(|q| q.with_id(self.ids.next_id()))
            .collect();
        let count = imported.len();
        self.questions.splice(0..0, imported);

        tracing::info!(count, total = self.questions.len(), "questions imported");
        count
    }

    /// Merges the previewed records of `session` and resets it.
    pub fn commit_import(&mut self, session: &mut ImportSession) -> Result<usize> {
        let records = session
            .take_preview()
            .ok_or_else(|| AppError::Conflict("no import preview to commit".to_string()))?;
        Ok(self.import_questions(records))
    }

    /// Questions admitted by `filter`, in board order.
    pub fn filter(&self, filter: &Filter) -> Vec<&Question> {
        self.questions.iter().filter(|q| filter.matches(q)).collect()
    }

    pub fn stats(&self) -> BoardStats {
        let answered = self.questions.iter().filter(|q| q.is_answered()).count();
        BoardStats {
            total: self.questions.len(),
            answered,
            unanswered: self.questions.len() - answered,
        }
    }

    /// The full list as a pretty-printed JSON array.
    pub fn export_all(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.questions)?)
    }
}

/// Owned variant of [`Board::filter`] over any question slice.
pub fn filter_questions(questions: &[Question], filter: &Filter) -> Vec<Question> {
    questions.iter().filter(|q| filter.matches(q)).cloned().collect()
}
