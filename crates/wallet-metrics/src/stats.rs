// In crates/wallet-metrics/src/stats.rs

//! Small numeric helpers shared by the metric passes. All of them return 0
//! where the statistic is undefined, never NaN.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn sharpe(values: &[f64]) -> f64 {
    let sd = std_dev(values);
    if sd > 0.0 { mean(values) / sd } else { 0.0 }
}

/// Pearson correlation of two equally long series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let (mx, my) = (mean(xs), mean(ys));
    let cov: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let sx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum::<f64>().sqrt();
    let sy: f64 = ys.iter().map(|y| (y - my).powi(2)).sum::<f64>().sqrt();
    if sx > 0.0 && sy > 0.0 { cov / (sx * sy) } else { 0.0 }
}

/// Largest peak-to-trough decline of the running sum of `changes`.
pub fn max_drawdown(changes: &[f64]) -> f64 {
    let mut equity = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut worst = 0.0_f64;
    for change in changes {
        equity += change;
        peak = peak.max(equity);
        worst = worst.max(peak - equity);
    }
    worst
}

/// Historical value-at-risk at `confidence` (e.g. 0.95), reported as a positive loss.
pub fn value_at_risk(values: &[f64], confidence: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let index = (((1.0 - confidence) * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    (-sorted[index]).max(0.0)
}
