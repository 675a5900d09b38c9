use crate::errors::Result;
use crate::models::news::{Article, SentimentScore};
use crate::models::stock::{Bar, Period};
use async_trait::async_trait;

/// Source of daily price history
#[async_trait]
pub trait MarketDataClient {
    /// Name of the data provider, used in log lines
    fn provider_name(&self) -> &'static str;

    /// Fetch daily bars for the ticker over the period.
    /// An unknown ticker may yield either an empty vector or an error.
    async fn fetch_daily_bars(&self, ticker: &str, period: Period) -> Result<Vec<Bar>>;
}

/// Source of recent news articles
#[async_trait]
pub trait NewsClient {
    /// Fetch at most `limit` articles about the ticker, most recent first
    async fn fetch_articles(&self, ticker: &str, limit: usize) -> Result<Vec<Article>>;
}

#[async_trait]
pub trait SentimentClassifier {
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<SentimentScore>;
}

#[async_trait]
pub trait Summarizer {
    /// Summarize an article from its title and body text
    async fn summarize(&self, title: &str, body: &str) -> Result<String>;
}
