use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SUMMARY_FALLBACK: &str = "Summary unavailable due to an error.";

/// A news article as returned by the news provider. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub description: String,
    pub content: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Text handed to the summarizer: the description, or the content when
    /// the description is empty.
    pub fn body(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.content
        } else {
            &self.description
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: String,
    /// Classifier confidence in `[0, 1]`.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Summary {
    Generated(String),
    Fallback,
}

impl Summary {
    /// 显示用文本，失败时为固定提示
    pub fn text(&self) -> &str {
        match self {
            Summary::Generated(text) => text,
            Summary::Fallback => SUMMARY_FALLBACK,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Summary::Fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedArticle {
    #[serde(flatten)]
    pub article: Article,
    /// `None` when the classifier failed for this article.
    pub sentiment: Option<SentimentScore>,
    pub summary: Summary,
}
