use std::fmt::Write;

use crate::models::dashboard::DashboardResult;
use crate::util;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One character per value, scaled between the series min and max.
pub fn sparkline(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(min) = finite.iter().copied().reduce(f64::min) else {
        return String::new();
    };
    let max = finite.iter().copied().fold(min, f64::max);
    let span = max - min;

    finite
        .iter()
        .map(|&v| {
            if span == 0.0 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let idx = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// Plain-text report: metrics, recent bars, projection and annotated news.
pub fn render_text(result: &DashboardResult, recent_rows: usize) -> String {
    let mut out = String::new();
    let bars = result.price_series.bars();

    let _ = writeln!(out, "Stock Info: {} - {}", result.ticker, result.period);
    let _ = writeln!(out, "{:-<72}", "");
    let _ = writeln!(out, "High:          ${:.2}", result.stats.high);
    let _ = writeln!(out, "Low:           ${:.2}", result.stats.low);
    let _ = writeln!(out, "Volume (Avg):  {}", util::format_thousands(result.stats.mean_volume));
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<12} {:<10} {:<10} {:<10} {:<10} {:<15}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    let _ = writeln!(out, "{:-<72}", "");
    let skip = bars.len().saturating_sub(recent_rows);
    for bar in &bars[skip..] {
        let _ = writeln!(
            out,
            "{:<12} {:<10.2} {:<10.2} {:<10.2} {:<10.2} {:<15}",
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            util::format_thousands(bar.volume as f64)
        );
    }
    if skip > 0 {
        let _ = writeln!(out, "... and {} earlier records", skip);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Projected Trend (Linear Regression)");
    if result.projection.is_empty() {
        let _ = writeln!(out, "Not enough data to project a trend.");
    } else {
        for point in &result.projection {
            let _ = writeln!(
                out,
                "{:<12} {:.2}",
                point.date.format("%Y-%m-%d").to_string(),
                point.projected_close
            );
        }
    }
    let closes: Vec<f64> = result.combined_closes().into_iter().map(|(_, c)| c).collect();
    let _ = writeln!(out, "Historical + Projected: {}", sparkline(&closes));
    let _ = writeln!(out);

    let _ = writeln!(out, "Recent News + Summary + Sentiment");
    if let Some(notice) = &result.news_notice {
        let _ = writeln!(out, "{}", notice);
    }
    for annotated in &result.articles {
        let article = &annotated.article;
        let _ = writeln!(out, "### {} ({})", article.title, article.url);
        if !article.source.is_empty() {
            match article.published_at {
                Some(at) => {
                    let stamp = at.format("%Y-%m-%d %H:%M UTC");
                    let _ = writeln!(out, "{} - {}", article.source, stamp);
                }
                None => {
                    let _ = writeln!(out, "{}", article.source);
                }
            }
        }
        match &annotated.sentiment {
            Some(s) => {
                let _ = writeln!(out, "Sentiment: {} (Score: {:.2})", s.label, s.score);
            }
            None => {
                let _ = writeln!(out, "Sentiment: unavailable");
            }
        }
        let _ = writeln!(out, "Summary: {}", annotated.summary.text());
        let _ = writeln!(out, "---");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::NO_NEWS_NOTICE;
    use crate::models::news::{AnnotatedArticle, Article, SentimentScore, Summary};
    use crate::models::stock::{Bar, Period, PriceSeries, PriceStats, ProjectedPoint};
    use chrono::NaiveDate;

    fn sample(articles: Vec<AnnotatedArticle>, news_notice: Option<String>) -> DashboardResult {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = PriceSeries::new(
            "AAPL",
            vec![Bar {
                date,
                open: 187.15,
                high: 188.44,
                low: 183.89,
                close: 185.64,
                volume: 82_488_700,
            }],
        );
        let stats = PriceStats::from_series(&series).unwrap();
        DashboardResult {
            ticker: "AAPL".to_string(),
            period: Period::OneMonth,
            price_series: series,
            stats,
            projection: vec![ProjectedPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                projected_close: 186.0,
            }],
            articles,
            news_notice,
        }
    }

    #[test]
    fn sparkline_scales_to_range() {
        assert_eq!(sparkline(&[1.0, 8.0]), "▁█");
        assert_eq!(sparkline(&[3.0, 3.0]), "▅▅");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn report_contains_metrics_and_notice() {
        let text = render_text(&sample(Vec::new(), Some(NO_NEWS_NOTICE.to_string())), 10);
        assert!(text.contains("High:          $188.44"));
        assert!(text.contains("Volume (Avg):  82,488,700"));
        assert!(text.contains("2024-01-03   186.00"));
        assert!(text.contains(NO_NEWS_NOTICE));
    }

    #[test]
    fn report_shows_fallback_and_missing_sentiment() {
        let articles = vec![
            AnnotatedArticle {
                article: Article {
                    title: "Apple beats".into(),
                    url: "https://example.com/1".into(),
                    ..Default::default()
                },
                sentiment: Some(SentimentScore {
                    label: "POSITIVE".into(),
                    score: 0.987,
                }),
                summary: Summary::Generated("Apple did well.".into()),
            },
            AnnotatedArticle {
                article: Article {
                    title: "Apple misses".into(),
                    ..Default::default()
                },
                sentiment: None,
                summary: Summary::Fallback,
            },
        ];

        let text = render_text(&sample(articles, None), 10);
        assert!(text.contains("Sentiment: POSITIVE (Score: 0.99)"));
        assert!(text.contains("Summary: Apple did well."));
        assert!(text.contains("Sentiment: unavailable"));
        assert!(text.contains("Summary: Summary unavailable due to an error."));
    }
}
