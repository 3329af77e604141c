//! # Extraction Strategies
//!
//! Locating the post collection inside an arbitrary dump is an ordered table of
//! named strategies. Each one inspects the document and either yields the raw
//! records or passes. The first non-empty yield wins.

use qb_core::{AccountSummary, ImportError, ImportEvent, ImportObserver};
use serde_json::{Map, Value};

use crate::lookup;
use crate::normalizer::NormalizeOptions;
use crate::reconstruct;

/// Context shared by every strategy of one import attempt.
pub struct Scan<'a> {
    pub options: &'a NormalizeOptions,
    pub observer: &'a dyn ImportObserver,
}

pub type Locate = fn(&Value, &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError>;

/// One heuristic attempt at finding the records.
pub struct Strategy {
    pub name: &'static str,
    pub locate: Locate,
}

/// Applied to the document root.
pub const ROOT_STRATEGIES: &[Strategy] = &[
    Strategy { name: "root.posts", locate: root_posts },
    Strategy { name: "response.posts", locate: response_posts },
    Strategy { name: "export_wrappers", locate: export_wrappers },
    Strategy { name: "alternate_keys", locate: alternate_keys },
    Strategy { name: "nested_search", locate: nested_search },
];

/// Applied to the `data` object of each element of an array-shaped account export.
pub const WRAPPER_STRATEGIES: &[Strategy] = &[
    Strategy { name: "data.conventional_keys", locate: reconstruct::conventional_keys },
    Strategy { name: "data.highlighted_posts", locate: reconstruct::highlighted_posts },
    Strategy { name: "data.dashboard", locate: reconstruct::dashboard_history },
    Strategy { name: "data.ugcLinks", locate: reconstruct::ugc_links },
    Strategy { name: "data.property_scan", locate: reconstruct::property_scan },
];

/// Root keys that may hold the records directly when the usual ones are absent.
const ALTERNATE_KEYS: &[&str] = &["data", "items", "entries", "content", "tumblr_posts", "blog_posts"];

/// How many object levels the nested search descends.
const NESTED_SEARCH_DEPTH: usize = 3;

/// Runs `table` against `value`, reporting each outcome to the observer.
pub fn run(
    table: &[Strategy],
    value: &Value,
    scan: &Scan<'_>,
) -> Result<Option<(&'static str, Vec<Value>)>, ImportError> {
    for strategy in table {
        match (strategy.locate)(value, scan)? {
            Some(records) if !records.is_empty() => {
                scan.observer.on_event(&ImportEvent::StrategyMatched {
                    strategy: strategy.name,
                    records: records.len(),
                });
                return Ok(Some((strategy.name, records)));
            }
            _ => scan.observer.on_event(&ImportEvent::StrategyMissed { strategy: strategy.name }),
        }
    }
    Ok(None)
}

pub(crate) fn non_empty(records: Vec<Value>) -> Option<Vec<Value>> {
    (!records.is_empty()).then_some(records)
}

pub(crate) fn non_empty_array(value: Option<&Value>) -> Option<Vec<Value>> {
    value
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .cloned()
}

fn root_posts(root: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    Ok(non_empty_array(root.get("posts")))
}

fn response_posts(root: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    Ok(non_empty_array(root.get("response").and_then(|r| r.get("posts"))))
}

/// A root array of wrapper objects. Wrappers exposing `data` are searched with
/// [`WRAPPER_STRATEGIES`]; the first one with records wins. When no wrapper has
/// `data` the array itself is the collection.
fn export_wrappers(root: &Value, scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    let Some(items) = root.as_array() else {
        return Ok(None);
    };

    let mut empty_account: Option<&Map<String, Value>> = None;
    for (index, item) in items.iter().enumerate() {
        let Some(data) = item.get("data").filter(|d| d.is_object()) else {
            continue;
        };
        if let Some((strategy, records)) = run(WRAPPER_STRATEGIES, data, scan)? {
            tracing::debug!(index, strategy, records = records.len(), "posts found in export wrapper");
            return Ok(Some(records));
        }
        tracing::debug!(index, "export wrapper holds no posts");
        if empty_account.is_none() {
            empty_account = data.as_object();
        }
    }

    if let Some(account) = empty_account {
        return Err(ImportError::NoAccountPosts(account_summary(account)));
    }
    Ok(non_empty(items.clone()))
}

fn account_summary(data: &Map<String, Value>) -> AccountSummary {
    let blog_names = data
        .get("blog_names")
        .and_then(Value::as_array)
        .map(|blogs| {
            blogs
                .iter()
                .filter_map(|blog| match blog {
                    Value::String(name) => Some(name.clone()),
                    other => lookup::first_str(other, &["current_blog_name", "name"]).map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    AccountSummary {
        blog_names,
        registration_time: data.get("registration_time").and_then(lookup::scalar_text),
        last_post_time: data.get("last_post_time").and_then(lookup::scalar_text),
    }
}

fn alternate_keys(root: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    Ok(ALTERNATE_KEYS
        .iter()
        .find_map(|key| non_empty_array(root.get(*key))))
}

/// Breadth-first over nested objects, returning the first non-empty array
/// within [`NESTED_SEARCH_DEPTH`] levels of the root.
fn nested_search(root: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    let Some(object) = root.as_object() else {
        return Ok(None);
    };

    let mut frontier = vec![object];
    for depth in 1..=NESTED_SEARCH_DEPTH {
        let mut next = Vec::new();
        for map in frontier {
            for (key, value) in map {
                match value {
                    Value::Array(items) if !items.is_empty() => {
                        tracing::debug!(depth, key = %key, "nested array found");
                        return Ok(Some(items.clone()));
                    }
                    Value::Object(child) => next.push(child),
                    _ => {}
                }
            }
        }
        frontier = next;
    }
    Ok(None)
}

/// Runs [`ROOT_STRATEGIES`]; `None` means no collection exists anywhere.
pub fn locate(root: &Value, scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    Ok(run(ROOT_STRATEGIES, root, scan)?.map(|(_, records)| records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qb_core::NoopObserver;
    use serde_json::json;

    fn locate_with_defaults(root: &Value) -> Result<Option<Vec<Value>>, ImportError> {
        let options = NormalizeOptions::default();
        let scan = Scan { options: &options, observer: &NoopObserver };
        locate(root, &scan)
    }

    #[test]
    fn test_root_posts_first() {
        let root = json!({ "posts": [{ "id": 1 }], "response": { "posts": [{ "id": 2 }] } });
        assert_eq!(locate_with_defaults(&root).unwrap().unwrap(), vec![json!({ "id": 1 })]);
    }

    #[test]
    fn test_response_posts() {
        let root = json!({ "response": { "posts": [{ "id": 2 }] } });
        assert_eq!(locate_with_defaults(&root).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_posts_falls_through() {
        let root = json!({ "posts": [], "items": [{ "title": "x" }] });
        assert_eq!(locate_with_defaults(&root).unwrap().unwrap(), vec![json!({ "title": "x" })]);
    }

    #[test]
    fn test_nested_search_is_breadth_first() {
        let root = json!({
            "a": { "b": { "deep": [1] } },
            "c": { "shallow": [2] }
        });
        assert_eq!(locate_with_defaults(&root).unwrap().unwrap(), vec![json!(2)]);
    }

    #[test]
    fn test_nested_search_stops_after_three_levels() {
        let root = json!({ "a": { "b": { "c": { "d": [1] } } } });
        assert!(locate_with_defaults(&root).unwrap().is_none());
    }

    #[test]
    fn test_root_array_without_wrappers_is_the_collection() {
        let root = json!([{ "title": "a" }, { "title": "b" }]);
        assert_eq!(locate_with_defaults(&root).unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_wrapper_conventional_key() {
        let root = json!([
            { "type": "meta", "data": { "blog_posts": [{ "title": "from wrapper" }] } }
        ]);
        assert_eq!(
            locate_with_defaults(&root).unwrap().unwrap(),
            vec![json!({ "title": "from wrapper" })]
        );
    }

    #[test]
    fn test_wrapper_without_posts_reports_account() {
        let root = json!([{
            "data": {
                "blog_names": [{ "current_blog_name": "base-helsinki" }],
                "registration_time": "2019-04-01T00:00:00Z",
                "most_used_tags": []
            }
        }]);
        match locate_with_defaults(&root) {
            Err(ImportError::NoAccountPosts(summary)) => {
                assert_eq!(summary.blog_names, vec!["base-helsinki".to_string()]);
                assert_eq!(summary.registration_time.as_deref(), Some("2019-04-01T00:00:00Z"));
                assert_eq!(summary.last_post_time, None);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_later_wrapper_can_supply_posts() {
        let root = json!([
            { "name": "no data here" },
            { "data": { "posts": [{ "body": "b" }] } }
        ]);
        assert_eq!(locate_with_defaults(&root).unwrap().unwrap().len(), 1);
    }
}
