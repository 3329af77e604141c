//! Category inference from source tags.

use qb_core::Category;

/// Keyword groups checked in this order; the first group with a hit wins.
/// Each group lists the theme name, its katakana spelling and a style synonym.
const TAG_KEYWORDS: [(Category, &[&str]); 4] = [
    (Category::Helsinki, &["helsinki", "ヘルシンキ", "responsive", "レスポンシブ"]),
    (Category::Stockholm, &["stockholm", "ストックホルム", "minimal", "シンプル"]),
    (Category::Copenhagen, &["copenhagen", "コペンハーゲン", "modern", "モダン"]),
    (Category::Amsterdam, &["amsterdam", "アムステルダム", "creative", "クリエイティブ"]),
];

/// Matches the joined, lowercased tag list against the keyword groups.
pub fn infer_from_tags(tags: &[String]) -> Option<Category> {
    if tags.is_empty() {
        return None;
    }
    let joined = tags.join(" ").to_lowercase();
    TAG_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| joined.contains(k)))
        .map(|(category, _)| *category)
}
