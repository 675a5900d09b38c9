// 公开导出的模块，供外部使用
pub mod models;
pub mod clients;
pub mod services;
pub mod errors;
pub mod config;
pub mod render;

#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use clients::base::{MarketDataClient, NewsClient, SentimentClassifier, Summarizer};
pub use config::{Config, Credentials};
pub use errors::{DashboardError, Result};
pub use models::dashboard::DashboardResult;
pub use models::news::{AnnotatedArticle, Article, SentimentScore, Summary};
pub use models::stock::{Bar, Period, PriceSeries, PriceStats, ProjectedPoint};
pub use services::dashboard::DashboardPipeline;
pub use services::projection::TrendProjector;
