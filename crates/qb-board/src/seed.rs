//! Sample questions a fresh board starts with.

use chrono::NaiveDate;
use qb_core::{Answer, Category, Question, QuestionId};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn sample(
    id: &str,
    title: &str,
    content: &str,
    category: Category,
    author: &str,
    asked: NaiveDate,
    answer: Option<Answer>,
) -> Question {
    Question {
        id: QuestionId::from(id),
        title: title.to_string(),
        content: content.to_string(),
        category,
        author: author.to_string(),
        date: asked,
        answer,
        tumblr_url: String::new(),
        tumblr_tags: Vec::new(),
    }
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        sample(
            "1",
            "スマホ表示でヘッダーメニューが崩れてしまいます",
            "レスポンシブデザインのテーマを使用していますが、スマートフォンで表示した時にヘッダーメニューが崩れてしまいます。CSSで修正方法を教えてください。",
            Category::Helsinki,
            "山田太郎",
            date(2025, 6, 20),
            Some(Answer {
                text: "CSSのメディアクエリを確認してみてください。@media (max-width: 768px) でスマホ用のスタイルが適用されているか確認し、ヘッダーメニューのflexboxプロパティを調整してください。".to_string(),
                date: date(2025, 6, 21),
            }),
        ),
        sample(
            "2",
            "商品画像のサムネイルサイズを変更したい",
            "商品一覧ページで表示される商品画像のサムネイルサイズを大きくしたいのですが、どのファイルを編集すればよいでしょうか？",
            Category::Stockholm,
            "田中花子",
            date(2025, 6, 18),
            Some(Answer {
                text: "テーマファイルのproduct-list.cssまたはstyle.cssで、.product-thumbnail クラスのwidth と height プロパティを調整してください。また、aspect-ratioも合わせて調整することをお勧めします。".to_string(),
                date: date(2025, 6, 19),
            }),
        ),
        sample(
            "3",
            "フォントを変更する方法について",
            "デフォルトのフォントから別のWebフォントに変更したいです。Google Fontsを使用する場合の手順を教えてください。",
            Category::Copenhagen,
            "佐藤次郎",
            date(2025, 6, 15),
            None,
        ),
    ]
}
