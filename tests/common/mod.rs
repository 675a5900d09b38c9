#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use stock_dashboard::{
    Article, Bar, DashboardError, MarketDataClient, NewsClient, Period, Result, SentimentClassifier,
    SentimentScore, Summarizer,
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn bar(day: &str, high: f64, low: f64, close: f64, volume: u64) -> Bar {
    Bar {
        date: date(day),
        open: close,
        high,
        low,
        close,
        volume,
    }
}

pub fn linear_bars() -> Vec<Bar> {
    vec![
        bar("2024-01-01", 101.0, 99.0, 100.0, 100),
        bar("2024-01-02", 103.0, 101.0, 102.0, 200),
        bar("2024-01-03", 105.0, 103.0, 104.0, 300),
    ]
}

pub fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        url: format!("https://news.example.com/{}", title.replace(' ', "-")),
        description: format!("About {}", title),
        content: String::new(),
        source: "Example Wire".to_string(),
        published_at: None,
    }
}

pub struct FakeMarketData {
    pub bars: Option<Vec<Bar>>,
    pub calls: AtomicUsize,
}

impl FakeMarketData {
    pub fn with_bars(bars: Vec<Bar>) -> Self {
        Self {
            bars: Some(bars),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            bars: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MarketDataClient for FakeMarketData {
    fn provider_name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_daily_bars(&self, _ticker: &str, _period: Period) -> Result<Vec<Bar>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bars
            .clone()
            .ok_or_else(|| DashboardError::MarketData("connection refused".to_string()))
    }
}

pub struct FakeNews {
    pub articles: Option<Vec<Article>>,
    pub calls: AtomicUsize,
}

impl FakeNews {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: Some(articles),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            articles: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NewsClient for FakeNews {
    async fn fetch_articles(&self, _ticker: &str, _limit: usize) -> Result<Vec<Article>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.articles
            .clone()
            .ok_or_else(|| DashboardError::NewsUnavailable("rateLimited".to_string()))
    }
}

/// Labels every title POSITIVE, except titles containing `fail_marker`.
pub struct FakeSentiment {
    pub fail_marker: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl FakeSentiment {
    pub fn new(fail_marker: Option<&'static str>) -> Self {
        Self {
            fail_marker,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SentimentClassifier for FakeSentiment {
    fn name(&self) -> &str {
        "fake"
    }

    async fn classify(&self, text: &str) -> Result<SentimentScore> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_marker {
            Some(marker) if text.contains(marker) => {
                Err(DashboardError::SentimentFailure("model not loaded".to_string()))
            }
            _ => Ok(SentimentScore {
                label: "POSITIVE".to_string(),
                score: 0.9,
            }),
        }
    }
}

/// Echoes the title, fails for titles containing `fail_marker`.
/// Earlier articles sleep longer so completion order differs from input order.
pub struct FakeSummarizer {
    pub fail_marker: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl FakeSummarizer {
    pub fn new(fail_marker: Option<&'static str>) -> Self {
        Self {
            fail_marker,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, title: &str, body: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
        tokio::time::sleep(Duration::from_millis(5 * (5u64.saturating_sub(n)))).await;
        match self.fail_marker {
            Some(marker) if title.contains(marker) => {
                Err(DashboardError::SummaryFailure("quota exceeded".to_string()))
            }
            _ => Ok(format!("Summary of {}: {}", title, body)),
        }
    }
}
