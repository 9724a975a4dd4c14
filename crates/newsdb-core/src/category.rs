//! Keyword-based topic detection and per-category recency lookup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::article::parse_date;
use crate::types::Document;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Health,
    Sports,
    Politics,
}

/// Priority order: the first category with a matching keyword wins.
static KEYWORDS: [(Category, &[&str]); 4] = [
    (Category::Technology, &["tech", "ai", "artificial intelligence", "gpt", "openai", "apple", "quantum", "ar", "vr"]),
    (Category::Health, &["health", "vaccine", "malaria", "cancer", "alzheimer", "medical", "who", "clinic"]),
    (Category::Sports, &["sport", "football", "soccer", "nba", "olympic", "gymnast", "ballon", "fifa", "lebron", "biles", "messi"]),
    (Category::Politics, &["politic", "un", "european union", "eu", "summit", "climate", "net-zero", "treaty", "cbdc", "alliance"]),
];

/// Keywords up to this length must match a whole word; longer ones must
/// start a word. Plain substring hits ("said" for `ai`) do not count.
const EXACT_WORD_MAX_LEN: usize = 3;

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Health => "health",
            Category::Sports => "sports",
            Category::Politics => "politics",
        }
    }

    pub fn matches(self, category: &str) -> bool {
        category.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn keyword_hits(words: &[String], keyword: &str) -> bool {
    let parts: Vec<&str> = keyword.split_whitespace().collect();
    if parts.len() > 1 {
        return words.windows(parts.len()).any(|w| w.iter().zip(&parts).all(|(a, b)| a == b));
    }
    if keyword.len() <= EXACT_WORD_MAX_LEN {
        words.iter().any(|w| w == keyword)
    } else {
        words.iter().any(|w| w.starts_with(keyword))
    }
}

/// Detect the topic of a free-text query. `None` means no boost applies.
pub fn classify(text: &str) -> Option<Category> {
    let words = words(text);
    if words.is_empty() { return None; }
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| keyword_hits(&words, k)))
        .map(|(category, _)| *category)
}

/// Up to `limit` documents of `category`, newest first. Documents with a
/// missing or unparseable date sort as the oldest; equal dates keep corpus order.
pub fn latest_in_category<D: AsRef<Document>>(documents: &[D], category: Category, limit: usize) -> Vec<&D> {
    let mut subset: Vec<(NaiveDate, &D)> = documents
        .iter()
        .filter_map(|d| {
            let doc: &Document = d.as_ref();
            category
                .matches(&doc.category)
                .then(|| (parse_date(&doc.published_date).unwrap_or(NaiveDate::MIN), d))
        })
        .collect();
    subset.sort_by(|a, b| b.0.cmp(&a.0));
    subset.into_iter().take(limit).map(|(_, d)| d).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, category: &str, date: &str) -> Document {
        Document {
            id: id.into(),
            title: id.into(),
            category: category.into(),
            published_date: date.into(),
            source: "Wire".into(),
            url: String::new(),
            content: String::new(),
        }
    }

    #[test]
    fn technology_outranks_sports() {
        assert_eq!(classify("Is AI changing football?"), Some(Category::Technology));
    }

    #[test]
    fn short_keywords_need_whole_words() {
        // "said" contains "ai", "under" contains "un"
        assert_eq!(classify("what was said under the bridge"), None);
        assert_eq!(classify("Tell me about Apple"), Some(Category::Technology));
    }

    #[test]
    fn long_keywords_only_match_word_starts() {
        assert_eq!(classify("unhealthy habits"), None);
        assert_eq!(classify("healthy habits"), Some(Category::Health));
        assert_eq!(classify("a sharp drop"), None);
    }

    #[test]
    fn stems_and_phrases() {
        assert_eq!(classify("latest political news"), Some(Category::Politics));
        assert_eq!(classify("the European Union budget"), Some(Category::Politics));
        assert_eq!(classify("Olympics opening ceremony"), Some(Category::Sports));
        assert_eq!(classify("new vaccine approved"), Some(Category::Health));
        assert_eq!(classify("net-zero pledges"), Some(Category::Politics));
        assert_eq!(classify(""), None);
    }

    #[test]
    fn latest_sorts_undated_last() {
        let docs = vec![
            doc("a", "Sports", "N/A"),
            doc("b", "sports", "2024-01-02"),
            doc("c", "health", "2024-05-01"),
            doc("d", "sports", "2024-03-01"),
            doc("e", "sports", "garbage"),
        ];
        let ids: Vec<&str> = latest_in_category(&docs, Category::Sports, 10).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "a", "e"]);
        assert_eq!(latest_in_category(&docs, Category::Sports, 1).len(), 1);
        assert!(latest_in_category(&docs, Category::Politics, 3).is_empty());
    }
}
