use thiserror::Error;

use crate::models::stock::Period;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("No price data available for {ticker} ({period})")]
    DataUnavailable { ticker: String, period: Period },

    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("News unavailable: {0}")]
    NewsUnavailable(String),

    #[error("Sentiment classification failed: {0}")]
    SentimentFailure(String),

    #[error("Summary failed: {0}")]
    SummaryFailure(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

// 用于从字符串创建错误
impl From<String> for DashboardError {
    fn from(s: String) -> Self {
        DashboardError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for DashboardError {
    fn from(s: &str) -> Self {
        DashboardError::Unknown(s.to_string())
    }
}
