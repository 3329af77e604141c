//! Shared fixtures for the integration tests.

use chrono::NaiveDate;
use qb_core::{MockClock, Question};
use serde_json::{json, Value};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A clock stuck on 2026-01-02.
pub fn fixed_clock() -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_today().returning(|| date(2026, 1, 2));
    clock
}

/// A text post in the platform's usual shape.
pub fn text_post(id: u64, title: &str, body: &str, tags: &[&str]) -> Value {
    json!({
        "type": "text",
        "id": id,
        "title": title,
        "body": body,
        "tags": tags,
        "blog_name": "base-helsinki",
        "post_url": format!("https://base-helsinki.tumblr.com/post/{}", id),
        "timestamp": 1718884800,
    })
}

/// Wraps `data` the way account exports wrap each section.
pub fn account_export(data: Value) -> Value {
    json!([{ "type": "account", "data": data }])
}

/// Question content with the id left out.
pub fn without_ids(questions: &[Question]) -> Vec<Question> {
    questions
        .iter()
        .map(|q| q.clone().with_id("".into()))
        .collect()
}
