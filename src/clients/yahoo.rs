use crate::clients::base::MarketDataClient;
use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::models::stock::{Bar, Period};
use crate::util;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Option<ChartNode>,
}

#[derive(Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<MetaNode>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaNode {
    #[serde(default)]
    exchange_timezone_name: Option<String>,
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance 日线行情客户端
pub struct YahooChartClient {
    client: Client,
    base_url: String,
}

impl YahooChartClient {
    /// 创建新的 Yahoo 行情客户端
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(DashboardError::RequestError)?;

        Ok(Self {
            client,
            base_url: config.chart_base_url.clone(),
        })
    }
}

/// 代码作为单独的路径段追加，`#`、`?`、`/` 会被转义
fn chart_url(base_url: &str, ticker: &str) -> Result<Url> {
    let invalid = |reason: String| {
        DashboardError::MarketData(format!("Invalid base url {}: {}", base_url, reason))
    };
    let mut url = Url::parse(&format!("{}/v8/finance/chart/", base_url))
        .map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base".to_string()))?
        .pop_if_empty()
        .push(ticker);
    Ok(url)
}

/// Provider error carried by a chart payload, if any.
fn chart_error(text: &str) -> Option<String> {
    serde_json::from_str::<ChartEnvelope>(text)
        .ok()
        .and_then(|envelope| envelope.chart)
        .and_then(|chart| chart.error)
        .map(|error| format!("{}: {}", error.code, error.description))
}

/// Turns a chart payload into bars, skipping points with a missing OHLC value.
fn parse_chart(text: &str) -> Result<Vec<Bar>> {
    let envelope: ChartEnvelope = serde_json::from_str(text)?;
    let chart = envelope
        .chart
        .ok_or_else(|| DashboardError::MarketData("missing chart node".to_string()))?;

    if let Some(error) = chart.error {
        return Err(DashboardError::MarketData(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };
    let (tz_name, gmt_offset) = match &result.meta {
        Some(meta) => (meta.exchange_timezone_name.as_deref(), meta.gmtoffset),
        None => (None, None),
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let field = |values: &[Option<f64>]| values.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) = (
            field(&quote.open[..]),
            field(&quote.high[..]),
            field(&quote.low[..]),
            field(&quote.close[..]),
        ) else {
            debug!("跳过缺失数据的K线: {}", ts);
            continue;
        };

        bars.push(Bar {
            date: util::timestamp_to_exchange_date(ts, tz_name, gmt_offset)?,
            open,
            high,
            low,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or_default(),
        });
    }

    Ok(bars)
}

#[async_trait]
impl MarketDataClient for YahooChartClient {
    fn provider_name(&self) -> &'static str {
        "Yahoo Finance"
    }

    async fn fetch_daily_bars(&self, ticker: &str, period: Period) -> Result<Vec<Bar>> {
        info!("获取 {} 的 {} 日线数据", ticker, period);

        let response = self
            .client
            .get(chart_url(&self.base_url, ticker)?)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // 未知代码时 Yahoo 返回 404，但正文仍是带 error 的 chart 结构
        if !status.is_success() {
            let message = chart_error(&text).unwrap_or_else(|| format!("HTTP status {}", status));
            return Err(DashboardError::MarketData(message));
        }

        let bars = parse_chart(&text)?;
        debug!("获取到 {} 条K线记录", bars.len());
        Ok(bars)
    }
}
