use chrono::NaiveDate;
use serde::Serialize;

use crate::models::news::AnnotatedArticle;
use crate::models::stock::{Period, PriceSeries, PriceStats, ProjectedPoint};

pub const NO_NEWS_NOTICE: &str = "No news articles found or API limit reached.";

/// Everything the renderer needs for one ticker submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardResult {
    pub ticker: String,
    pub period: Period,
    pub price_series: PriceSeries,
    pub stats: PriceStats,
    pub projection: Vec<ProjectedPoint>,
    pub articles: Vec<AnnotatedArticle>,
    /// Set when the news section could not be filled.
    pub news_notice: Option<String>,
}

impl DashboardResult {
    /// Historical closes followed by projected closes, for the combined line chart.
    pub fn combined_closes(&self) -> Vec<(NaiveDate, f64)> {
        let mut combined = self.price_series.closes();
        combined.extend(self.projection.iter().map(|p| (p.date, p.projected_close)));
        combined
    }
}
