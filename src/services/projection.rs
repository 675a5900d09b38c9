//! Linear trend projection of closing prices.
//!
//! Dates are turned into day ordinals and a single-feature ordinary least
//! squares line is fitted to the closes. Future points are one per calendar
//! day after the last known bar, weekends included.

use chrono::NaiveDate;
use log::debug;

use crate::models::stock::{PriceSeries, ProjectedPoint};
use crate::util;

/// Fitted line, stored around the sample means to keep large ordinals from
/// eating the precision of the intercept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    mean_x: f64,
    mean_y: f64,
}

impl LinearFit {
    /// Ordinary least squares over `(x, y)` points.
    /// Returns `None` with fewer than two points or when every `x` is equal.
    pub fn fit(points: &[(i64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|&(x, _)| x as f64).sum::<f64>() / n;
        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n;

        let (mut sxy, mut sxx) = (0.0, 0.0);
        for &(x, y) in points {
            let dx = x as f64 - mean_x;
            sxy += dx * (y - mean_y);
            sxx += dx * dx;
        }

        if sxx == 0.0 {
            return None;
        }

        Some(Self {
            slope: sxy / sxx,
            mean_x,
            mean_y,
        })
    }

    /// 截距
    pub fn intercept(&self) -> f64 {
        self.mean_y - self.slope * self.mean_x
    }

    /// 计算 `x` 处的拟合值
    pub fn predict(&self, x: i64) -> f64 {
        self.mean_y + self.slope * (x as f64 - self.mean_x)
    }
}

/// 线性趋势预测器
pub struct TrendProjector;

impl TrendProjector {
    /// Projects `horizon_days` closes after the last bar with a finite close.
    ///
    /// Fails soft: fewer than two usable bars give an empty projection.
    pub fn project(series: &PriceSeries, horizon_days: u32) -> Vec<ProjectedPoint> {
        let valid: Vec<(NaiveDate, f64)> = series
            .bars()
            .iter()
            .filter(|b| b.close.is_finite())
            .map(|b| (b.date, b.close))
            .collect();

        let points: Vec<(i64, f64)> = valid
            .iter()
            .map(|&(date, close)| (util::date_to_ordinal(date), close))
            .collect();

        let (Some(fit), Some(&(last_date, _))) = (LinearFit::fit(&points), valid.last()) else {
            debug!(
                "Not enough valid closes to project {}: {} of {}",
                series.ticker,
                valid.len(),
                series.len()
            );
            return Vec::new();
        };

        debug!(
            "Trend for {}: slope {:.4}/day, intercept {:.4}",
            series.ticker,
            fit.slope,
            fit.intercept()
        );

        (1..=u64::from(horizon_days))
            .map_while(|i| util::add_days(last_date, i))
            .map(|date| ProjectedPoint {
                date,
                projected_close: fit.predict(util::date_to_ordinal(date)),
            })
            .collect()
    }
}
