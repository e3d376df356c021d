//! Numerical integration of sampled data on irregular grids.

use itertools::Itertools;

/// Integrate samples `y` taken at strictly increasing locations `x` with the
/// composite Simpson's rule for irregularly spaced data.
///
/// An odd number of intervals is closed with the irregular-grid end correction
/// and a single interval falls back to the trapezoid rule. Fewer than two
/// samples integrate to zero.
///
/// # Examples
/// ```
/// use pondx::simpson;
///
/// let x = [0.0, 1.0, 3.0];
/// let y: Vec<f64> = x.iter().map(|x| x * x).collect();
/// assert!((simpson(&x, &y) - 9.0).abs() < 1.0e-12);
/// ```
#[must_use]
pub fn simpson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    if n == 2 {
        return 0.5 * (x[1] - x[0]) * (y[0] + y[1]);
    }

    let intervals = n - 1;
    let paired = intervals - intervals % 2;
    let mut total: f64 = (0..=paired)
        .tuple_windows::<(_, _, _)>()
        .step_by(2)
        .map(|(i0, i1, i2)| {
            let h1 = x[i1] - x[i0];
            let h2 = x[i2] - x[i1];
            (h1 + h2) / 6.0
                * ((2.0 - h2 / h1) * y[i0]
                    + ((h1 + h2).powi(2) / (h1 * h2)) * y[i1]
                    + (2.0 - h1 / h2) * y[i2])
        })
        .sum();

    if intervals % 2 == 1 {
        let last = n - 1;
        let h1 = x[last - 1] - x[last - 2];
        let h2 = x[last] - x[last - 1];
        let alpha = (2.0 * h2 * h2 + 3.0 * h2 * h1) / (6.0 * (h1 + h2));
        let beta = (h2 * h2 + 3.0 * h2 * h1) / (6.0 * h1);
        let eta = h2.powi(3) / (6.0 * h1 * (h1 + h2));
        total += alpha * y[last] + beta * y[last - 1] - eta * y[last - 2];
    }
    total
}
