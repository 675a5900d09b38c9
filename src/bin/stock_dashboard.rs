use stock_dashboard::clients::newsapi::NewsApiClient;
use stock_dashboard::clients::openai::OpenAiSummarizer;
use stock_dashboard::clients::sentiment::{HuggingFaceClassifier, LexiconClassifier};
use stock_dashboard::clients::yahoo::YahooChartClient;
use stock_dashboard::config::{Config, Credentials, MAX_HORIZON_DAYS};
use stock_dashboard::models::stock::Period;
use stock_dashboard::render;
use stock_dashboard::{DashboardPipeline, SentimentClassifier};

use anyhow::{bail, Context};
use clap::{App, Arg, ArgMatches};
use log::{error, info};
use std::sync::Arc;

/// 命令行默认值，`App` 借用其中的字符串
struct CliDefaults {
    config: Config,
    horizon: String,
    articles: String,
    timeout: String,
}

impl CliDefaults {
    fn new() -> Self {
        let config = Config::new();
        Self {
            horizon: config.horizon_days.to_string(),
            articles: config.max_articles.to_string(),
            timeout: config.http_timeout_secs.to_string(),
            config,
        }
    }
}

struct CliOptions {
    ticker: String,
    period: Period,
    rows: usize,
    json: bool,
    config: Config,
}

fn cli(defaults: &CliDefaults) -> App<'_> {
    App::new("Stock Dashboard")
        .version("1.0.0")
        .about("Price history, trend projection and news sentiment for a ticker")
        .arg(
            Arg::with_name("ticker")
                .short('t')
                .long("ticker")
                .value_name("TICKER")
                .help("Stock ticker to analyze")
                .takes_value(true)
                .default_value(&defaults.config.default_ticker),
        )
        .arg(
            Arg::with_name("period")
                .short('p')
                .long("period")
                .value_name("PERIOD")
                .help("Time frame of the price history")
                .takes_value(true)
                .possible_values(Period::ALL.map(|p| p.as_str()))
                .default_value(defaults.config.default_period.as_str()),
        )
        .arg(
            Arg::with_name("horizon")
                .long("horizon")
                .value_name("DAYS")
                .help("Number of calendar days to project")
                .takes_value(true)
                .default_value(&defaults.horizon),
        )
        .arg(
            Arg::with_name("articles")
                .long("articles")
                .value_name("COUNT")
                .help("Maximum number of news articles")
                .takes_value(true)
                .default_value(&defaults.articles),
        )
        .arg(
            Arg::with_name("rows")
                .long("rows")
                .value_name("ROWS")
                .help("Number of recent bars to print")
                .takes_value(true)
                .default_value("10"),
        )
        .arg(
            Arg::with_name("summary-model")
                .long("summary-model")
                .value_name("MODEL")
                .help("Chat model used for article summaries")
                .takes_value(true)
                .default_value(&defaults.config.summary_model),
        )
        .arg(
            Arg::with_name("sentiment-model")
                .long("sentiment-model")
                .value_name("MODEL")
                .help("Hosted sentiment model, used when HF_API_TOKEN is set")
                .takes_value(true)
                .default_value(&defaults.config.sentiment_model),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("HTTP timeout for every provider request")
                .takes_value(true)
                .default_value(&defaults.timeout),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Print the dashboard as JSON")
                .takes_value(false),
        )
}

// 数值参数解析失败时报错，不回退到默认值
fn parse_options(matches: &ArgMatches, defaults: &CliDefaults) -> anyhow::Result<CliOptions> {
    let value = |name: &str, fallback: &str| matches.value_of(name).unwrap_or(fallback).to_string();

    let period: Period = value("period", defaults.config.default_period.as_str()).parse()?;
    let horizon = value("horizon", &defaults.horizon)
        .parse::<u32>()
        .context("--horizon must be a non-negative integer")?;
    if horizon > MAX_HORIZON_DAYS {
        bail!("--horizon must be at most {} days", MAX_HORIZON_DAYS);
    }
    let max_articles = value("articles", &defaults.articles)
        .parse::<usize>()
        .context("--articles must be a non-negative integer")?;
    let rows = value("rows", "10")
        .parse::<usize>()
        .context("--rows must be a non-negative integer")?;
    let timeout = value("timeout", &defaults.timeout)
        .parse::<u64>()
        .context("--timeout must be a whole number of seconds")?;

    let config = Config::new()
        .with_horizon_days(horizon)
        .with_max_articles(max_articles)
        .with_summary_model(&value("summary-model", &defaults.config.summary_model))
        .with_sentiment_model(&value("sentiment-model", &defaults.config.sentiment_model))
        .with_http_timeout_secs(timeout);

    Ok(CliOptions {
        ticker: value("ticker", &defaults.config.default_ticker),
        period,
        rows,
        json: matches.is_present("json"),
        config,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let defaults = CliDefaults::new();
    let matches = cli(&defaults).get_matches();
    let options = parse_options(&matches, &defaults)?;

    // 缺少密钥时直接失败
    let credentials = Credentials::from_env()?;
    let config = options.config;

    let sentiment: Arc<dyn SentimentClassifier + Send + Sync> =
        match &credentials.huggingface_token {
            Some(token) => Arc::new(HuggingFaceClassifier::new(&config, token)?),
            None => Arc::new(LexiconClassifier::new()),
        };
    info!("Using sentiment classifier: {}", sentiment.name());

    let market_data = Arc::new(YahooChartClient::new(&config)?);
    let news = Arc::new(NewsApiClient::new(&config, &credentials.news_api_key)?);
    let summarizer = Arc::new(OpenAiSummarizer::new(&config, &credentials.openai_api_key)?);
    let pipeline = DashboardPipeline::new(config, market_data, news, sentiment, summarizer);

    let result = pipeline
        .build(&options.ticker, options.period)
        .await
        .map_err(|e| {
            error!("{}", e);
            e
        })?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::render_text(&result, options.rows));
    }

    Ok(())
}
