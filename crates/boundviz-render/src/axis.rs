//! Axis arithmetic shared by all panels.

/// Upper bound on major ticks before the spacing is coarsened.
const MAX_TICKS: usize = 50;

/// Shared horizontal frame of a figure: limits and major tick positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

impl Frame {
    /// Builds the frame from every x value drawn in the figure.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = match extent(values) {
            Some((min, max)) => widen_degenerate(min, max),
            None => (0.0, 0.01),
        };
        Self {
            min,
            max,
            ticks: ticks(min, max),
        }
    }
}

/// Min and max over the finite values, if any.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Identical limits cannot be drawn: `0` widens to `[0, 0.01]`, anything
/// else by 5% on both sides.
pub fn widen_degenerate(min: f64, max: f64) -> (f64, f64) {
    if min != max {
        return (min, max);
    }
    if max == 0.0 {
        return (0.0, 0.01);
    }
    let (a, b) = (0.95 * min, 1.05 * max);
    (a.min(b), a.max(b))
}

/// Vertical limits for a value panel, padded by 5% of the span.
pub fn value_limits(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (min, max) = match extent(values) {
        Some((min, max)) => widen_degenerate(min, max),
        None => return (0.0, 1.0),
    };
    let pad = max * 0.05 - min * 0.05;
    ((min - pad).max(f64::MIN), (max + pad).min(f64::MAX))
}

/// Tick spacing: the power of ten just below `max`, or `0.01` for non-positive ranges.
pub fn tick_base(max: f64) -> f64 {
    let base = if max > 0.0 {
        10f64.powi(max.log10().floor() as i32)
    } else {
        0.01
    };
    // subnormal maxima underflow to zero
    if base.is_normal() {
        base
    } else {
        0.01
    }
}

/// Major ticks: multiples of [`tick_base`] within `[min, max]`, plus `max`
/// rounded to the base's precision when that lands inside the range.
///
/// A span too wide to represent (e.g. `-1e308..1e308`) keeps the base of `max`.
pub fn ticks(min: f64, max: f64) -> Vec<f64> {
    let span = max - min;
    let mut base = tick_base(max);
    while span.is_finite() && span / base > MAX_TICKS as f64 {
        base *= 10.0;
    }
    let digits = -base.log10().round() as i32;
    let eps = base * 1e-9;

    let first = ((min - eps) / base).ceil() as i64;
    let last = ((max + eps) / base).floor() as i64;
    let mut ticks: Vec<f64> = (first..=last).map(|k| round_to(k as f64 * base, digits)).collect();

    let max_rounded = round_to(max, digits);
    if max_rounded >= min - eps
        && max_rounded <= max + eps
        && !ticks.iter().any(|t| (t - max_rounded).abs() <= eps)
    {
        ticks.push(max_rounded);
    }
    ticks
}

/// Rounds to `digits` decimal places; negative digits round to tens, hundreds, ...
fn round_to(value: f64, digits: i32) -> f64 {
    if digits >= 0 {
        let scale = 10f64.powi(digits);
        (value * scale).round() / scale
    } else {
        let scale = 10f64.powi(-digits);
        (value / scale).round() * scale
    }
}

/// Formats a tick like C's `%g`: six significant digits, no trailing zeros,
/// and a signed two-digit exponent (`1e+06`) outside `1e-4..1e6`.
pub fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if !(-4..6).contains(&exponent) {
        let mantissa = format!("{:.5e}", value);
        return match mantissa.split_once('e') {
            Some((m, e)) => {
                let e: i32 = e.parse().unwrap_or(exponent);
                let sign = if e < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", trim_zeros(m), sign, e.abs())
            }
            None => mantissa,
        };
    }
    let decimals = (5 - exponent).max(0) as usize;
    trim_zeros(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Splits a series at missing values into drawable runs.
pub fn segments(points: impl IntoIterator<Item = (f64, Option<f64>)>) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        match y.filter(|y| y.is_finite()) {
            Some(y) => current.push((x, y)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
