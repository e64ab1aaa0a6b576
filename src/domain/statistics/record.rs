use crate::domain::errors::StatisticsError;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};

/// Normal-approximation multiplier for the 95% interval.
pub const Z_95: f64 = 1.96;
/// Normal-approximation multiplier for the 99% interval.
pub const Z_99: f64 = 2.58;

/// Descriptive statistics for one metric within one run.
///
/// The confidence half-widths use fixed normal multipliers whatever the
/// trial count. With few trials a Student-t interval would be wider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub mean: f64,
    pub stddev: f64,
    pub n: usize,
    pub stderr: f64,
    pub ci95: f64,
    pub ci99: f64,
    pub min: f64,
    pub max: f64,
}

impl StatsRecord {
    /// Computes the record for one metric column.
    ///
    /// Variance is the unbiased sample variance (n - 1 denominator). A single
    /// trial, or trials that all measured the same value, have no spread:
    /// stddev, stderr and both intervals are exactly zero.
    pub fn from_samples(metric: &str, samples: &[f64]) -> Result<Self, StatisticsError> {
        let n = samples.len();
        if n == 0 {
            return Err(StatisticsError::EmptySample {
                metric: metric.to_string(),
            });
        }

        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });

        if n == 1 || min == max {
            return Ok(Self {
                mean: samples[0],
                stddev: 0.0,
                n,
                stderr: 0.0,
                ci95: 0.0,
                ci99: 0.0,
                min,
                max,
            });
        }

        let data = Data::new(samples.to_vec());
        let empty = || StatisticsError::EmptySample {
            metric: metric.to_string(),
        };
        let mean = data.mean().ok_or_else(empty)?;
        let stddev = data.std_dev().ok_or_else(empty)?;
        let stderr = stddev / (n as f64).sqrt();

        Ok(Self {
            mean,
            stddev,
            n,
            stderr,
            ci95: Z_95 * stderr,
            ci99: Z_99 * stderr,
            min,
            max,
        })
    }

    pub fn variance(&self) -> f64 {
        self.stddev * self.stddev
    }
}
