//! Headline sentiment classifiers.
//!
//! `LexiconClassifier` works offline from a small financial word list.
//! `HuggingFaceClassifier` calls the hosted inference API and is used when a
//! token is configured.

use crate::clients::base::SentimentClassifier;
use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::models::news::SentimentScore;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub const POSITIVE: &str = "POSITIVE";
pub const NEGATIVE: &str = "NEGATIVE";
pub const NEUTRAL: &str = "NEUTRAL";

/// Word-list classifier for financial headlines
pub struct LexiconClassifier {
    positive_words: HashSet<&'static str>,
    negative_words: HashSet<&'static str>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    /// 创建基于词表的情绪分类器
    pub fn new() -> Self {
        Self {
            positive_words: Self::build_positive_lexicon(),
            negative_words: Self::build_negative_lexicon(),
        }
    }

    /// Score is `0.5 + 0.5 * |pos - neg| / (pos + neg + 1)`, so it stays in
    /// `[0.5, 1)` and grows with the margin between the two word counts.
    pub fn score(&self, text: &str) -> SentimentScore {
        let lower = text.to_lowercase();
        let (mut positive, mut negative) = (0usize, 0usize);

        for word in lower.split(|c: char| !c.is_alphanumeric() && c != '-') {
            if word.is_empty() {
                continue;
            }
            if self.positive_words.contains(word) {
                positive += 1;
            } else if self.negative_words.contains(word) {
                negative += 1;
            }
        }

        let margin = positive.abs_diff(negative) as f64;
        let score = 0.5 + 0.5 * margin / (positive + negative + 1) as f64;
        let label = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => POSITIVE,
            std::cmp::Ordering::Less => NEGATIVE,
            std::cmp::Ordering::Equal => NEUTRAL,
        };

        SentimentScore {
            label: label.to_string(),
            score,
        }
    }

    fn build_positive_lexicon() -> HashSet<&'static str> {
        [
            "beat", "beats", "surge", "surges", "soar", "soars", "jump", "jumps",
            "rally", "rallies", "gain", "gains", "rise", "rises", "up", "record",
            "growth", "grow", "grows", "strong", "stronger", "profit", "profits",
            "upgrade", "upgraded", "outperform", "outperforms", "bullish", "boost",
            "boosts", "win", "wins", "optimistic", "exceeds", "exceeded", "raise",
            "raises", "buy", "high", "higher", "tops", "expands", "expansion",
            "breakthrough", "success", "successful", "positive", "rebound",
        ]
        .into_iter()
        .collect()
    }

    fn build_negative_lexicon() -> HashSet<&'static str> {
        [
            "miss", "misses", "missed", "plunge", "plunges", "drop", "drops", "fall",
            "falls", "slump", "slumps", "sink", "sinks", "down", "loss", "losses",
            "weak", "weaker", "downgrade", "downgraded", "underperform", "bearish",
            "cut", "cuts", "lawsuit", "subpoena", "investigation", "recall", "layoffs",
            "decline", "declines", "warning", "warns", "sell", "low", "lower",
            "crash", "fears", "risk", "risks", "slowdown", "fined",
            "negative", "tumble", "tumbles", "bankruptcy", "fraud",
        ]
        .into_iter()
        .collect()
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify(&self, text: &str) -> Result<SentimentScore> {
        Ok(self.score(text))
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The API answers `[[{label, score}, ...]]` for a single input, older
/// deployments answer `[{label, score}, ...]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

fn best_label(response: InferenceResponse) -> Option<SentimentScore> {
    let candidates = match response {
        InferenceResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
        InferenceResponse::Flat(flat) => flat,
    };

    candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|best| SentimentScore {
            label: best.label.to_uppercase(),
            score: best.score.clamp(0.0, 1.0),
        })
}

/// Hosted text-classification model
pub struct HuggingFaceClassifier {
    client: Client,
    endpoint: String,
    token: String,
    model: String,
}

impl HuggingFaceClassifier {
    /// 创建 Hugging Face 托管模型分类器
    pub fn new(config: &Config, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(DashboardError::RequestError)?;

        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", config.huggingface_base_url, config.sentiment_model),
            token: token.to_string(),
            model: config.sentiment_model.clone(),
        })
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str) -> Result<SentimentScore> {
        debug!("Classifying with {}: {}", self.model, text);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(|e| DashboardError::SentimentFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::SentimentFailure(format!("Status {}: {}", status, body)));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::SentimentFailure(e.to_string()))?;

        best_label(parsed)
            .ok_or_else(|| DashboardError::SentimentFailure("No labels in response".to_string()))
    }
}
