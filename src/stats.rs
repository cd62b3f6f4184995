// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Small descriptive statistics used by the detector and the analytics views.
//!
//! Inputs are short business series, so everything is computed directly
//! with closed-form sums.

use serde::Serialize;

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation around a precomputed `mean`.
///
/// Divides by `n`. Fewer than two points yield `0.0`.
pub fn std_dev(data: &[f64], mean: f64) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Number of standard deviations `value` lies from the mean of `data`.
///
/// Returns `0.0` when `data` has no spread, so a constant series never
/// looks anomalous.
///
/// # Example
///
/// ```rust
/// use tillbook::stats::z_score;
///
/// let data = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 1000.0];
/// assert!(z_score(1000.0, &data) > 2.5);
/// assert_eq!(z_score(10.0, &[10.0, 10.0, 10.0]), 0.0);
/// ```
pub fn z_score(value: f64, data: &[f64]) -> f64 {
    let m = mean(data);
    let sd = std_dev(data, m);
    if sd == 0.0 {
        return 0.0;
    }
    (value - m) / sd
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

/// Ordinary least squares fit of `y = slope * x + intercept`.
///
/// Fewer than two points, or points that all share one `x`, give a zero fit.
///
/// # Example
///
/// ```rust
/// use tillbook::stats::linear_regression;
///
/// let fit = linear_regression(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
/// assert!((fit.slope - 1.0).abs() < 1e-9);
/// assert!((fit.intercept - 1.0).abs() < 1e-9);
/// ```
pub fn linear_regression(points: &[(f64, f64)]) -> Regression {
    let zero = Regression {
        slope: 0.0,
        intercept: 0.0,
    };
    if points.len() < 2 {
        return zero;
    }
    let n = points.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in points {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }
    let denom = n * sxx - sx * sx;
    if denom == 0.0 {
        return zero;
    }
    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    Regression { slope, intercept }
}

/// Mean of a trailing window of daily net cash values.
pub fn moving_average(window: &[f64]) -> f64 {
    mean(window)
}
