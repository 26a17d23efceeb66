//! Null-skipping aggregates and the least-squares fit.

use serde::Serialize;

use super::error::QueryError;

/// Sum of the present values; `None` when there are none.
pub fn sum<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// Mean of the present values; `None` when there are none.
pub fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (total, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    (count > 0).then(|| total / count as f64)
}

/// Percent change from `previous` to `current`; undefined from zero.
pub fn percent_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let (previous, current) = (previous?, current?);
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

// ---------------------------------------------------------------------------
// Five-number summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

/// Quartiles by linear interpolation between closest ranks.
pub fn five_number_summary<I: IntoIterator<Item = Option<f64>>>(
    values: I,
) -> Option<FiveNumberSummary> {
    let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    Some(FiveNumberSummary {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
        count: sorted.len(),
    })
}

/// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Linear regression
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation; 0 when y is constant.
    pub r: f64,
    pub r_squared: f64,
    /// Number of pairs the fit used.
    pub n: usize,
}

impl Regression {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares of `ys` on `xs`, paired by position. Pairs with a
/// missing or non-finite side are ignored.
pub fn linear_regression(xs: &[Option<f64>], ys: &[Option<f64>]) -> Result<Regression, QueryError> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    if pairs.len() < 2 {
        return Err(QueryError::InsufficientData {
            required: 2,
            available: pairs.len(),
        });
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        return Err(QueryError::ZeroVariance);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };

    Ok(Regression {
        slope,
        intercept,
        r,
        r_squared: r * r,
        n: pairs.len(),
    })
}
