//! Score selection and normalisation for the top-k ranking.

use std::cmp::Ordering;

/// Indices of the `k` largest scores, highest first.
///
/// Uses a stable sort, so equal scores keep ascending class-index order.
/// NaN sorts after every other value, `-inf` included. Returns fewer than `k`
/// indices when there are fewer than `k` scores.
pub fn top_k_indices(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (scores[a], scores[b]);
        sa.is_nan()
            .cmp(&sb.is_nan())
            .then_with(|| sb.partial_cmp(&sa).unwrap_or(Ordering::Equal))
    });
    order.truncate(k);
    order
}

/// Log-shifted softmax over the given scores only.
///
/// p_i = exp(log1p(s_i) - max_j log1p(s_j)) / sum_j exp(...)
///
/// This is not a calibrated posterior: it is normalised over the selected
/// scores, not over every class. A score of `+inf` dominates every finite
/// score, so `+inf` entries split the whole mass evenly. A score <= -1 or NaN
/// has no finite `log1p` and gets zero weight. If no score has a usable
/// `log1p`, the result is uniform.
pub fn log_shifted_softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return vec![];
    }

    let unbounded = scores.iter().filter(|s| **s == f64::INFINITY).count();
    if unbounded > 0 {
        let share = 1.0 / unbounded as f64;
        return scores
            .iter()
            .map(|s| if *s == f64::INFINITY { share } else { 0.0 })
            .collect();
    }

    let logs: Vec<f64> = scores
        .iter()
        .map(|s| {
            let l = s.ln_1p();
            if l.is_finite() { l } else { f64::NEG_INFINITY }
        })
        .collect();

    let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        let uniform = 1.0 / scores.len() as f64;
        return vec![uniform; scores.len()];
    }

    let exps: Vec<f64> = logs.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

/// Probability in [0, 1] → percentage rounded to 2 decimals.
///
/// Rounds the exact binary value of `probability * 100`, so 1.115 (stored as
/// 1.11499...) becomes 1.11.
pub fn to_percent(probability: f64) -> f64 {
    let percent = probability * 100.0;
    format!("{:.2}", percent).parse().unwrap_or(percent)
}
