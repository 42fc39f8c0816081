//! Statistical threshold estimation
//!
//! Two interchangeable policies derive a scalar cutoff from the valid
//! sample values: a plain upper percentile, or an interquartile-range
//! outlier bound. Both are pure functions of (values, parameter) and
//! are safe to call concurrently for independent inputs.

use log::debug;

use crate::raster::errors::{HotspotError, HotspotResult};

/// Threshold policy selected by caller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdPolicy {
    /// Value at the given percentile of the valid samples, p in [0, 100]
    Percentile(f64),
    /// `Q3 + m * IQR` outlier bound with multiplier m >= 0
    IqrOutlier(f64),
}

impl ThresholdPolicy {
    /// Validate the policy parameter
    pub fn validate(&self) -> HotspotResult<()> {
        match *self {
            ThresholdPolicy::Percentile(p) => {
                if !(0.0..=100.0).contains(&p) {
                    return Err(HotspotError::InvalidParameter {
                        name: "percentile",
                        reason: format!("{} is outside [0, 100]", p),
                    });
                }
            }
            ThresholdPolicy::IqrOutlier(m) => {
                if !m.is_finite() || m < 0.0 {
                    return Err(HotspotError::InvalidParameter {
                        name: "iqr_multiplier",
                        reason: format!("{} is not a finite value >= 0", m),
                    });
                }
            }
        }
        Ok(())
    }

    /// Compute the threshold over the valid sample values
    ///
    /// # Arguments
    /// * `values` - Valid (finite, non-sentinel) sample values
    ///
    /// # Returns
    /// The scalar cutoff, or `EmptyValidData` for an empty input
    pub fn estimate(&self, values: &[f64]) -> HotspotResult<f64> {
        self.validate()?;

        if values.is_empty() {
            return Err(HotspotError::EmptyValidData);
        }

        let mut sorted: Vec<f64> = values.to_vec();
        sorted.sort_by(|a, b| {
            a.partial_cmp(b)
                .expect("non-finite values are excluded before estimation")
        });

        let threshold = match *self {
            ThresholdPolicy::Percentile(p) => percentile_of_sorted(&sorted, p),
            ThresholdPolicy::IqrOutlier(m) => {
                let q1 = percentile_of_sorted(&sorted, 25.0);
                let q3 = percentile_of_sorted(&sorted, 75.0);
                let iqr = q3 - q1;
                debug!("IQR bound: Q1={}, Q3={}, IQR={}, m={}", q1, q3, iqr, m);
                q3 + m * iqr
            }
        };

        debug!("Threshold {:?} over {} samples: {}", self, values.len(), threshold);
        Ok(threshold)
    }
}

/// Value at percentile `p` of an ascending-sorted slice
///
/// Standard linear interpolation between order statistics:
/// `index = p/100 * (n-1)`, interpolating between floor and ceil.
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
