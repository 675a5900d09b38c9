use crate::clients::base::NewsClient;
use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::models::news::Article;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Option<Vec<WireArticle>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    #[serde(default)]
    source: Option<WireSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireSource {
    #[serde(default)]
    name: Option<String>,
}

// 日期格式不对时只丢弃日期，不丢弃整条新闻
fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unparseable publishedAt {:?}: {}", raw, e);
            None
        }
    }
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        Article {
            title: wire.title.unwrap_or_default(),
            url: wire.url.unwrap_or_default(),
            description: wire.description.unwrap_or_default(),
            content: wire.content.unwrap_or_default(),
            source: wire.source.and_then(|s| s.name).unwrap_or_default(),
            published_at: wire.published_at.as_deref().and_then(parse_published_at),
        }
    }
}

/// NewsAPI `/v2/everything` client
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    /// 创建新闻客户端，`api_key` 通过 `X-Api-Key` 头发送
    pub fn new(config: &Config, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(DashboardError::RequestError)?;

        Ok(Self {
            client,
            base_url: config.news_base_url.clone(),
            api_key: api_key.to_string(),
        })
    }
}

fn parse_everything(text: &str) -> Result<Vec<Article>> {
    let response: EverythingResponse = serde_json::from_str(text)?;

    if response.status != "ok" {
        let code = response.code.unwrap_or_else(|| response.status.clone());
        let message = response.message.unwrap_or_default();
        return Err(DashboardError::NewsUnavailable(format!("{}: {}", code, message)));
    }

    Ok(response
        .articles
        .unwrap_or_default()
        .into_iter()
        .map(Article::from)
        .collect())
}

#[async_trait]
impl NewsClient for NewsApiClient {
    async fn fetch_articles(&self, ticker: &str, limit: usize) -> Result<Vec<Article>> {
        info!("获取 {} 的新闻", ticker);

        let page_size = limit.to_string();
        let response = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .query(&[
                ("q", ticker),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        // 错误响应也带 status/message 正文，统一交给 parse_everything
        let text = response.text().await?;
        let articles = parse_everything(&text)?;

        debug!("获取到 {} 条新闻", articles.len());
        Ok(articles)
    }
}
