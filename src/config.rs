use std::env;

use crate::errors::{DashboardError, Result};
use crate::models::stock::Period;

pub const NEWS_API_KEY_VAR: &str = "NEWSAPI_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const HF_API_TOKEN_VAR: &str = "HF_API_TOKEN";

/// 预测天数上限，超出部分按上限截断
pub const MAX_HORIZON_DAYS: u32 = 365;

pub struct Config {
    pub default_ticker: String,
    pub default_period: Period,
    pub horizon_days: u32,
    pub max_articles: usize,
    pub summary_model: String,
    pub sentiment_model: String,
    pub http_timeout_secs: u64,
    pub chart_base_url: String,
    pub news_base_url: String,
    pub openai_base_url: String,
    pub huggingface_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// 创建默认配置
    pub fn new() -> Self {
        Self {
            default_ticker: "AAPL".to_string(),
            default_period: Period::OneMonth,
            horizon_days: 7,
            max_articles: 5,
            summary_model: "gpt-4".to_string(),
            sentiment_model: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            http_timeout_secs: 30,
            chart_base_url: "https://query1.finance.yahoo.com".to_string(),
            news_base_url: "https://newsapi.org".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            huggingface_base_url: "https://api-inference.huggingface.co".to_string(),
        }
    }

    /// 设置预测天数，最多 `MAX_HORIZON_DAYS` 天
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days.min(MAX_HORIZON_DAYS);
        self
    }

    /// 设置新闻条数上限
    pub fn with_max_articles(mut self, max: usize) -> Self {
        self.max_articles = max;
        self
    }

    /// 设置摘要模型
    pub fn with_summary_model(mut self, model: &str) -> Self {
        self.summary_model = model.to_string();
        self
    }

    pub fn with_sentiment_model(mut self, model: &str) -> Self {
        self.sentiment_model = model.to_string();
        self
    }

    /// 设置 HTTP 请求超时（秒）
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    // 测试时指向本地 mock 服务
    pub fn with_chart_base_url(mut self, url: &str) -> Self {
        self.chart_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_news_base_url(mut self, url: &str) -> Self {
        self.news_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_openai_base_url(mut self, url: &str) -> Self {
        self.openai_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_huggingface_base_url(mut self, url: &str) -> Self {
        self.huggingface_base_url = url.trim_end_matches('/').to_string();
        self
    }
}

/// Provider secrets, read once at start-up.
#[derive(Clone)]
pub struct Credentials {
    pub news_api_key: String,
    pub openai_api_key: String,
    pub huggingface_token: Option<String>,
}

impl Credentials {
    /// Fails on the first missing required key.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 从任意查找函数读取密钥，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(DashboardError::MissingCredential(name))
        };

        Ok(Self {
            news_api_key: required(NEWS_API_KEY_VAR)?,
            openai_api_key: required(OPENAI_API_KEY_VAR)?,
            huggingface_token: lookup(HF_API_TOKEN_VAR).filter(|v| !v.trim().is_empty()),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("news_api_key", &"***")
            .field("openai_api_key", &"***")
            .field("huggingface_token", &self.huggingface_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.default_ticker, "AAPL");
        assert_eq!(config.horizon_days, 7);
        assert_eq!(config.max_articles, 5);
        assert_eq!(config.default_period, Period::OneMonth);
    }

    #[test]
    fn horizon_is_capped() {
        assert_eq!(Config::new().with_horizon_days(30).horizon_days, 30);
        let at_cap = Config::new().with_horizon_days(MAX_HORIZON_DAYS);
        assert_eq!(at_cap.horizon_days, MAX_HORIZON_DAYS);
        assert_eq!(Config::new().with_horizon_days(u32::MAX).horizon_days, MAX_HORIZON_DAYS);
    }

    #[test]
    fn model_and_timeout_overrides() {
        let config = Config::new()
            .with_summary_model("gpt-4o-mini")
            .with_sentiment_model("ProsusAI/finbert")
            .with_http_timeout_secs(5);
        assert_eq!(config.summary_model, "gpt-4o-mini");
        assert_eq!(config.sentiment_model, "ProsusAI/finbert");
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn base_urls_drop_trailing_slash() {
        let config = Config::new().with_news_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.news_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn missing_news_key_fails_fast() {
        let lookup = lookup_from(&[(OPENAI_API_KEY_VAR, "sk")]);
        let err = Credentials::from_lookup(lookup).unwrap_err();
        assert!(matches!(err, DashboardError::MissingCredential(NEWS_API_KEY_VAR)));
    }

    #[test]
    fn blank_openai_key_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (NEWS_API_KEY_VAR, "news"),
            (OPENAI_API_KEY_VAR, "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, DashboardError::MissingCredential(OPENAI_API_KEY_VAR)));
    }

    #[test]
    fn optional_huggingface_token() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (NEWS_API_KEY_VAR, "news"),
            (OPENAI_API_KEY_VAR, "sk-secret"),
        ]))
        .unwrap();
        assert!(creds.huggingface_token.is_none());
        assert!(!format!("{:?}", creds).contains("sk-secret"));
    }
}
