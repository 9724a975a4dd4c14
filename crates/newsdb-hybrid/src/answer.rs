//! Answer-ready context: the prompt block and the cited sources.
use serde::Serialize;

use newsdb_core::types::RankedDocument;

pub const NO_ARTICLES_MESSAGE: &str = "No articles in database yet. Please run the scraper first!";
pub const NO_INFORMATION_MESSAGE: &str =
    "I don't have information about that in my current news database. Try asking about technology, health, politics, or sports.";

const SYSTEM_PROMPT_RULES: &str = "You are an intelligent news assistant. Answer STRICTLY from the provided articles.

STRICT RULES:
1. ONLY use information from the provided articles - never invent or assume.
2. ALWAYS cite sources naturally in your response (e.g., \"According to Reuters...\" or \"The Guardian reports that...\").
3. Include specific details: dates, names, numbers, locations when mentioned.
4. If the answer is not in the articles, clearly say: \"I don't have information about that in my current news database.\"
5. Never make up or infer information not explicitly stated.
6. Be conversational but precise.
7. If multiple articles are relevant, synthesize information from 2-3 sources naturally.
8. When mentioning statistics or facts, reference the source.

Available news articles:
";

/// Citation metadata of one article used for an answer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceRef {
    pub title: String,
    pub category: String,
    pub date: String,
    pub source: String,
    pub url: String,
}

impl From<&RankedDocument> for SourceRef {
    fn from(ranked: &RankedDocument) -> Self {
        let d = &ranked.document;
        Self {
            title: d.title.clone(),
            category: d.category.clone(),
            date: d.published_date.clone(),
            source: d.source.clone(),
            url: d.url.clone(),
        }
    }
}

/// Everything an answer service needs for one question.
#[derive(Debug, Clone)]
pub struct AnswerContext {
    pub question: String,
    pub articles: Vec<RankedDocument>,
    pub context: String,
}

impl AnswerContext {
    pub fn sources(&self) -> Vec<SourceRef> { self.articles.iter().map(SourceRef::from).collect() }
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub response: String,
    pub sources: Vec<SourceRef>,
}

impl Answer {
    pub fn without_sources(response: &str) -> Self { Self { response: response.to_string(), sources: Vec::new() } }
}

/// Numbered `[Article N]` blocks joined by a blank line.
pub fn build_context(articles: &[RankedDocument]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, ranked)| {
            let d = &ranked.document;
            format!(
                "[Article {}]\nSource: {}\nTitle: {}\nCategory: {}\nDate: {}\nContent: {}\n",
                i + 1,
                d.source,
                d.title,
                d.category,
                d.published_date,
                d.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn system_prompt(context: &str) -> String { format!("{SYSTEM_PROMPT_RULES}{context}") }
