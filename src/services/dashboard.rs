use crate::clients::base::{MarketDataClient, NewsClient, SentimentClassifier, Summarizer};
use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::models::dashboard::{DashboardResult, NO_NEWS_NOTICE};
use crate::models::news::{AnnotatedArticle, Article, Summary};
use crate::models::stock::{Period, PriceSeries, PriceStats};
use crate::services::projection::TrendProjector;
use crate::util;
use futures::future::join_all;
use log::{info, warn};
use std::sync::Arc;

/// 看板流水线：行情、统计、趋势预测与新闻注解合并为一个结果
pub struct DashboardPipeline {
    config: Config,
    market_data: Arc<dyn MarketDataClient + Send + Sync>,
    news: Arc<dyn NewsClient + Send + Sync>,
    sentiment: Arc<dyn SentimentClassifier + Send + Sync>,
    summarizer: Arc<dyn Summarizer + Send + Sync>,
}

// 代码只允许字母、数字和 `.^=-`，如 BRK-B、^GSPC、EURUSD=X
fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(DashboardError::InvalidInput("ticker is empty".to_string()));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-');
    if !ticker.chars().all(allowed) {
        return Err(DashboardError::InvalidInput(format!("invalid ticker: {:?}", raw.trim())));
    }
    Ok(ticker)
}

impl DashboardPipeline {
    /// 创建流水线，各数据源以 trait 对象注入
    pub fn new(
        config: Config,
        market_data: Arc<dyn MarketDataClient + Send + Sync>,
        news: Arc<dyn NewsClient + Send + Sync>,
        sentiment: Arc<dyn SentimentClassifier + Send + Sync>,
        summarizer: Arc<dyn Summarizer + Send + Sync>,
    ) -> Self {
        Self {
            config,
            market_data,
            news,
            sentiment,
            summarizer,
        }
    }

    /// Builds the dashboard for one ticker submission.
    ///
    /// Only missing price data is an error. News, sentiment and summary
    /// failures are recovered into the result.
    pub async fn build(&self, ticker: &str, period: Period) -> Result<DashboardResult> {
        let ticker = normalize_ticker(ticker)?;
        info!("Building dashboard for {} ({})", ticker, period);

        let price_series = self.fetch_price_series(&ticker, period).await?;
        let stats = PriceStats::from_series(&price_series).ok_or_else(|| {
            DashboardError::DataUnavailable {
                ticker: ticker.clone(),
                period,
            }
        })?;

        let projection = TrendProjector::project(&price_series, self.config.horizon_days);
        if projection.is_empty() {
            info!("No projection for {}: fewer than two usable closes", ticker);
        }

        let (articles, news_notice) = match self.fetch_articles(&ticker).await {
            Ok(articles) if !articles.is_empty() => (self.annotate_all(articles).await, None),
            Ok(_) => {
                info!("No articles returned for {}", ticker);
                (Vec::new(), Some(NO_NEWS_NOTICE.to_string()))
            }
            Err(e) => {
                warn!("News fetch failed for {}: {}", ticker, e);
                (Vec::new(), Some(NO_NEWS_NOTICE.to_string()))
            }
        };

        Ok(DashboardResult {
            ticker,
            period,
            price_series,
            stats,
            projection,
            articles,
            news_notice,
        })
    }

    async fn fetch_price_series(&self, ticker: &str, period: Period) -> Result<PriceSeries> {
        let unavailable = || DashboardError::DataUnavailable {
            ticker: ticker.to_string(),
            period,
        };

        let bars = self
            .market_data
            .fetch_daily_bars(ticker, period)
            .await
            .map_err(|e| {
                warn!(
                    "{} fetch failed for {} ({}): {}",
                    self.market_data.provider_name(),
                    ticker,
                    period,
                    e
                );
                unavailable()
            })?;

        let series = PriceSeries::new(ticker, bars);
        if series.is_empty() {
            warn!(
                "{} returned no bars for {} ({})",
                self.market_data.provider_name(),
                ticker,
                period
            );
            return Err(unavailable());
        }

        info!("Loaded {} bars for {}", series.len(), ticker);
        Ok(series)
    }

    async fn fetch_articles(&self, ticker: &str) -> Result<Vec<Article>> {
        let mut articles = self.news.fetch_articles(ticker, self.config.max_articles).await?;
        util::limit_articles(&mut articles, self.config.max_articles, ticker);
        Ok(articles)
    }

    // 各条新闻互不影响，join_all 保持原始顺序
    async fn annotate_all(&self, articles: Vec<Article>) -> Vec<AnnotatedArticle> {
        join_all(articles.into_iter().map(|article| self.annotate(article))).await
    }

    async fn annotate(&self, article: Article) -> AnnotatedArticle {
        let sentiment = match self.sentiment.classify(&article.title).await {
            Ok(score) => Some(score),
            Err(e) => {
                warn!(
                    "Sentiment ({}) failed for \"{}\": {}",
                    self.sentiment.name(),
                    article.title,
                    e
                );
                None
            }
        };

        let summary = match self.summarizer.summarize(&article.title, article.body()).await {
            Ok(text) => Summary::Generated(text),
            Err(e) => {
                warn!("Summary failed for \"{}\": {}", article.title, e);
                Summary::Fallback
            }
        };

        AnnotatedArticle {
            article,
            sentiment,
            summary,
        }
    }
}
