//! Wrapper-level strategies for array-shaped account exports.
//!
//! Besides plain lookups this holds the two reconstructions used when an
//! account export has no posts of its own: highlighted-post URLs and dashboard
//! view history. Both build best-effort records from URLs and keyword guesses.
//! Their titles, descriptions and dates are approximations, not source data.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use qb_core::{Category, ImportError};
use regex::Regex;
use serde_json::{json, Value};

use crate::lookup;
use crate::strategies::{non_empty, non_empty_array, Scan};
use crate::text;

/// Keys under `data` that conventionally hold posts, in priority order.
const CONVENTIONAL_KEYS: &[&str] = &[
    "posts",
    "blog_posts",
    "content",
    "tumblr_posts",
    "user_posts",
    "published_posts",
];

/// A sample element carrying any of these is taken for a post.
const POST_LIKE_FIELDS: &[&str] = &[
    "post_url",
    "content",
    "body",
    "text",
    "title",
    "type",
    "blog_name",
    "serve_time",
    "content_url",
];

/// Help-centre host that `ugcLinks` points at when the posts ship separately.
const EXTERNAL_DOWNLOAD_HOST: &str = "tumblr.zendesk.com";

/// Category of a rebuilt record, used when its tags decide none.
/// Only records built here carry it.
pub(crate) const CATEGORY_HINT_KEY: &str = "__category_hint";

/// Topic vocabulary for highlighted posts: title keywords and the description used.
const HIGHLIGHT_TOPICS: &[(&[&str], &str)] = &[
    (&["instagram", "インスタ"], "Instagram連携機能について。設定方法や表示に関する質問です。"),
    (&["apps", "アプリ"], "BASE Appsの機能追加や設定について。カスタム機能の実装に関する質問です。"),
    (&["バナー", "banner"], "バナー画像の設定や表示について。ヘッダーやフッターエリアのカスタマイズに関する質問です。"),
    (&["セット", "おすすめ"], "おすすめ商品やセット販売の表示機能について。商品ページのカスタマイズに関する質問です。"),
    (&["会員", "登録"], "会員登録機能について。ユーザー登録やログイン機能のカスタマイズに関する質問です。"),
    (&["メニュー", "ナビ"], "ナビゲーションメニューの設定について。メニュー項目の追加や表示に関する質問です。"),
    (&["about", "写真"], "Aboutページのレイアウトについて。写真の配置や表示方法に関する質問です。"),
];

/// Post ids grow over time; lower bounds of coarse id ranges and the date each stands for.
const POST_ID_BUCKETS: &[(u128, (i32, u32, u32))] = &[
    (780_000_000_000_000_000, (2024, 4, 15)),
    (770_000_000_000_000_000, (2024, 1, 15)),
];
const OLDEST_BUCKET: (i32, u32, u32) = (2023, 10, 15);

/// Blog-name keywords for dashboard entries, checked in order.
const DASHBOARD_BLOG_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Stockholm, &["design", "graphic"]),
    (Category::Copenhagen, &["bauhaus", "movement"]),
    (Category::Amsterdam, &["ak47", "creative"]),
];

static POST_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/post/(\d+)").expect("valid regex"));
static BLOG_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://([^./]+)\.tumblr\.com").expect("valid regex"));

pub fn conventional_keys(data: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    Ok(CONVENTIONAL_KEYS
        .iter()
        .find_map(|key| non_empty_array(data.get(*key))))
}

/// One record per URL in `highlighted_posts[].post_urls`.
pub fn highlighted_posts(data: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    let Some(items) = data.get("highlighted_posts").and_then(Value::as_array) else {
        return Ok(None);
    };

    let mut records = Vec::new();
    for item in items {
        let Some(blog) = lookup::first_str(item, &["blog_name"]) else {
            continue;
        };
        let urls = item
            .get("post_urls")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for (index, url) in urls.iter().filter_map(Value::as_str).enumerate() {
            records.push(highlighted_record(blog, url, index));
        }
    }

    if !records.is_empty() {
        tracing::debug!(records = records.len(), "rebuilt posts from highlighted post urls");
    }
    Ok(non_empty(records))
}

fn highlighted_record(blog: &str, url: &str, index: usize) -> Value {
    let title = title_from_url(url)
        .unwrap_or_else(|| format!("{} のハイライト投稿 {}", blog, index + 1));
    let body = topic_description(&title)
        .map(str::to_string)
        .unwrap_or_else(|| format!("この質問は {} ブログのハイライト投稿です。", blog));

    let mut record = json!({
        "type": "text",
        "id": format!("highlighted_{}_{}", blog, index),
        "post_url": url,
        "title": title,
        "body": body,
        "blog_name": blog,
        "tags": ["highlighted", blog.replacen("base-", "", 1), "base"],
        CATEGORY_HINT_KEY: highlight_category(blog).as_str(),
    });
    if let Some(date) = date_from_post_id(url) {
        record["date"] = json!(date.format("%Y-%m-%d").to_string());
    }
    record
}

/// Readable title from the URL slug, when the slug is long enough to carry one.
fn title_from_url(url: &str) -> Option<String> {
    let slug = url.rsplit('/').next()?;
    if slug.chars().count() <= 10 {
        return None;
    }
    let decoded = text::percent_decode(&slug.replace('-', " "))?;
    let length = decoded.chars().count();
    (length > 5 && length < 100).then(|| text::truncate_chars(&decoded, 60))
}

fn topic_description(title: &str) -> Option<&'static str> {
    let title = title.to_lowercase();
    HIGHLIGHT_TOPICS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, description)| *description)
}

fn highlight_category(blog: &str) -> Category {
    match blog {
        "base-stockholm" => Category::Stockholm,
        "base-copenhagen" => Category::Copenhagen,
        "base-amsterdam" => Category::Amsterdam,
        _ => Category::Helsinki,
    }
}

fn date_from_post_id(url: &str) -> Option<NaiveDate> {
    let id: u128 = POST_ID.captures(url)?.get(1)?.as_str().parse().ok()?;
    let (y, m, d) = POST_ID_BUCKETS
        .iter()
        .find(|(floor, _)| id > *floor)
        .map(|(_, date)| *date)
        .unwrap_or(OLDEST_BUCKET);
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Posts viewed on the dashboard, capped at `dashboard_limit` entries.
pub fn dashboard_history(data: &Value, scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    let Some(entries) = data.get("dashboard").and_then(Value::as_array) else {
        return Ok(None);
    };

    let records: Vec<Value> = entries
        .iter()
        .filter(|entry| entry.get("element_type").and_then(Value::as_str) == Some("post"))
        .filter_map(|entry| {
            let url = lookup::first_str(entry, &["content_url"]).filter(|u| *u != "\\N")?;
            let served = lookup::first_str(entry, &["serve_time"]).unwrap_or_default();
            Some((url, served))
        })
        .take(scan.options.dashboard_limit)
        .enumerate()
        .map(|(index, (url, served))| dashboard_record(index, url, served))
        .collect();

    if !records.is_empty() {
        tracing::debug!(records = records.len(), "rebuilt posts from dashboard history");
    }
    Ok(non_empty(records))
}

fn dashboard_record(index: usize, url: &str, served: &str) -> Value {
    let blog = BLOG_HOST
        .captures(url)
        .and_then(|c| c.get(1))
        .map_or("unknown", |m| m.as_str());

    json!({
        "type": "text",
        "id": format!("dashboard_{}", index),
        "post_url": url,
        "title": format!("{} ブログからの参考投稿 {}", blog, index + 1),
        "body": format!("この投稿は {} にダッシュボードで閲覧されました。元の投稿: {}", served, url),
        "date": served.split('T').next().unwrap_or_default(),
        "blog_name": format!("参考: {}", blog),
        "tags": ["dashboard", "reference", blog],
        CATEGORY_HINT_KEY: dashboard_category(blog).as_str(),
    })
}

fn dashboard_category(blog: &str) -> Category {
    DASHBOARD_BLOG_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| blog.contains(k)))
        .map_or(Category::Helsinki, |(category, _)| *category)
}

/// `ugcLinks` either carries posts or points at the help centre for a separate download.
pub fn ugc_links(data: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    let Some(links) = non_empty_array(data.get("ugcLinks")) else {
        return Ok(None);
    };
    if let Some(link) = links[0]
        .get("link")
        .and_then(Value::as_str)
        .filter(|link| link.contains(EXTERNAL_DOWNLOAD_HOST))
    {
        return Err(ImportError::ExternalLink(link.to_string()));
    }
    Ok(Some(links))
}

/// First array property whose sample element looks like a post.
pub fn property_scan(data: &Value, _scan: &Scan<'_>) -> Result<Option<Vec<Value>>, ImportError> {
    let Some(object) = data.as_object() else {
        return Ok(None);
    };
    Ok(object.iter().find_map(|(key, value)| {
        let items = value.as_array().filter(|items| !items.is_empty())?;
        let sample = items[0].as_object()?;
        POST_LIKE_FIELDS
            .iter()
            .any(|field| sample.contains_key(*field))
            .then(|| {
                tracing::debug!(key = %key, records = items.len(), "post-like property found");
                items.clone()
            })
    }))
}
