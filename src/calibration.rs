//! Backtest metrics over binary home-win probabilities.

/// What actually happened in a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    AwayWin,
}

#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ReliabilityBin {
    pub bucket_start: f64,
    pub bucket_end: f64,
    pub count: usize,
    pub avg_pred: f64,
    pub actual_rate: f64,
}

/// Score a set of home-win probabilities against observed outcomes.
/// Mismatched or empty inputs yield the zero metrics rather than an error.
pub fn evaluate(probs: &[f64], outcomes: &[Outcome]) -> Metrics {
    if probs.is_empty() || probs.len() != outcomes.len() {
        return Metrics {
            samples: 0,
            brier: 0.0,
            log_loss: 0.0,
            accuracy: 0.0,
        };
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (p, outcome) in probs.iter().zip(outcomes) {
        let p = p.clamp(0.0, 1.0);
        let y = match outcome {
            Outcome::HomeWin => 1.0,
            Outcome::AwayWin => 0.0,
        };
        brier_sum += (p - y).powi(2);

        let actual_prob = if *outcome == Outcome::HomeWin { p } else { 1.0 - p };
        log_loss_sum += -actual_prob.clamp(1e-12, 1.0).ln();

        let picked_home = p >= 0.5;
        if picked_home == (*outcome == Outcome::HomeWin) {
            correct += 1;
        }
    }

    let n = probs.len() as f64;
    Metrics {
        samples: probs.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

/// Bucket predictions by stated probability and compare each bucket's
/// average claim against the observed home-win rate.
pub fn reliability_bins(probs: &[f64], outcomes: &[Outcome], bins: usize) -> Vec<ReliabilityBin> {
    let bins = bins.max(2);
    let mut counts = vec![0usize; bins];
    let mut pred_sum = vec![0.0_f64; bins];
    let mut actual_sum = vec![0.0_f64; bins];

    for (p, outcome) in probs.iter().zip(outcomes) {
        let p = p.clamp(0.0, 1.0);
        let idx = ((p * bins as f64).floor() as usize).min(bins - 1);
        counts[idx] += 1;
        pred_sum[idx] += p;
        if *outcome == Outcome::HomeWin {
            actual_sum[idx] += 1.0;
        }
    }

    let mut out = Vec::with_capacity(bins);
    for i in 0..bins {
        let count = counts[i];
        let (avg_pred, actual_rate) = if count > 0 {
            (pred_sum[i] / count as f64, actual_sum[i] / count as f64)
        } else {
            (0.0, 0.0)
        };
        out.push(ReliabilityBin {
            bucket_start: i as f64 / bins as f64,
            bucket_end: (i + 1) as f64 / bins as f64,
            count,
            avg_pred,
            actual_rate,
        });
    }
    out
}
