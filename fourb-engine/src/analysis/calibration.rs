//! Athlete regression calibration
//!
//! Fits a personalized linear model mapping an athlete's four category
//! sub-scores to measured bat speed, via ordinary least squares on the
//! normal equations. The fitted model refines future projections until it
//! expires (90 days by default) or is overwritten by a recalibration.
//!
//! A degenerate system (collinear sub-scores) is a hard error, never a
//! silently zeroed coefficient: a zero coefficient is indistinguishable
//! from "this factor has no effect" in the interpretation text.

use chrono::Duration;
use fourb_common::models::{AthleteModel, Category, ModelQuality};
use fourb_common::params::CalibrationParams;
use fourb_common::time;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Unknowns in the fit: intercept + one slope per category
const TERMS: usize = 5;

/// Pivot magnitude below which the normal equations count as singular
const PIVOT_EPSILON: f64 = 1e-10;

/// Calibration errors
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Fewer historical swings than the fit requires
    #[error("Insufficient samples: calibration requires {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    /// NaN or infinite value in a sample
    #[error("Non-finite value in calibration sample {index}")]
    InvalidSample { index: usize },

    /// Normal equations have no unique solution
    #[error("Singular normal equations: pivot collapsed in column {column}; sub-scores are collinear")]
    SingularSystem { column: usize },
}

/// One historical observation: sub-scores and the speed they produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalibrationSample {
    /// Category sub-scores in order: brain, body, bat, ball
    pub scores: [f64; 4],
    /// Measured bat speed (mph)
    pub bat_speed_mph: f64,
}

/// Athlete regression calibrator
pub struct Calibrator {
    params: CalibrationParams,
}

impl Calibrator {
    /// Create a calibrator with the given parameters
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    /// Fit an athlete's model from historical samples
    ///
    /// # Arguments
    /// * `athlete_id` - upsert key for the resulting model
    /// * `samples` - historical (sub-scores, measured speed) pairs
    ///
    /// # Errors
    /// Returns `InsufficientSamples` below the configured minimum (the
    /// caller must not persist anything in that case), `InvalidSample`
    /// for non-finite inputs, and `SingularSystem` when the sub-scores
    /// are collinear.
    pub fn calibrate(
        &self,
        athlete_id: Uuid,
        samples: &[CalibrationSample],
    ) -> Result<AthleteModel, CalibrationError> {
        if samples.len() < self.params.min_samples {
            return Err(CalibrationError::InsufficientSamples {
                required: self.params.min_samples,
                actual: samples.len(),
            });
        }
        for (index, sample) in samples.iter().enumerate() {
            let finite = sample.bat_speed_mph.is_finite()
                && sample.scores.iter().all(|s| s.is_finite());
            if !finite {
                return Err(CalibrationError::InvalidSample { index });
            }
        }

        let coefficients = fit_least_squares(samples)?;
        let r_squared = r_squared(samples, &coefficients);
        let quality = self.quality_band(r_squared);
        let interpretation = self.interpret(&coefficients, r_squared, quality, samples.len());

        let calibrated_at = time::now();
        let expires_at = calibrated_at + Duration::days(self.params.expiry_days);

        debug!(
            %athlete_id,
            r_squared,
            quality = quality.as_str(),
            samples = samples.len(),
            "Athlete calibration complete"
        );

        Ok(AthleteModel {
            athlete_id,
            coefficients,
            r_squared,
            quality,
            sample_count: samples.len(),
            calibrated_at,
            expires_at,
            interpretation,
        })
    }

    fn quality_band(&self, r_squared: f64) -> ModelQuality {
        if r_squared > self.params.strong_r_squared {
            ModelQuality::Strong
        } else if r_squared > self.params.moderate_r_squared {
            ModelQuality::Moderate
        } else {
            ModelQuality::Weak
        }
    }

    /// Plain-language reading: headline fit quality, then one line per
    /// category as "+X.X mph per 10 points"
    fn interpret(
        &self,
        coefficients: &[f64; TERMS],
        r_squared: f64,
        quality: ModelQuality,
        sample_count: usize,
    ) -> Vec<String> {
        let mut lines = vec![format!(
            "{} model fit (R\u{b2} = {:.2} over {} swings)",
            quality.as_str(),
            r_squared,
            sample_count
        )];

        for (category, coefficient) in Category::all().iter().zip(&coefficients[1..]) {
            lines.push(format!(
                "{:+.1} mph per 10 points in {}",
                coefficient * 10.0,
                category.as_str()
            ));
        }

        lines
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CalibrationParams::default())
    }
}

/// OLS fit via the normal equations (XᵀX)β = Xᵀy
fn fit_least_squares(samples: &[CalibrationSample]) -> Result<[f64; TERMS], CalibrationError> {
    let mut xtx = [[0.0; TERMS]; TERMS];
    let mut xty = [0.0; TERMS];

    for sample in samples {
        let row = design_row(sample);
        for r in 0..TERMS {
            for c in 0..TERMS {
                xtx[r][c] += row[r] * row[c];
            }
            xty[r] += row[r] * sample.bat_speed_mph;
        }
    }

    solve(xtx, xty)
}

/// Design-matrix row: intercept term followed by the four sub-scores
fn design_row(sample: &CalibrationSample) -> [f64; TERMS] {
    [
        1.0,
        sample.scores[0],
        sample.scores[1],
        sample.scores[2],
        sample.scores[3],
    ]
}

/// Gaussian elimination with partial pivoting on the 5×5 augmented system
fn solve(mut a: [[f64; TERMS]; TERMS], mut b: [f64; TERMS]) -> Result<[f64; TERMS], CalibrationError> {
    for col in 0..TERMS {
        // Partial pivot: largest magnitude in this column at or below the diagonal
        let mut pivot = col;
        for row in col + 1..TERMS {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(CalibrationError::SingularSystem { column: col });
        }
        if pivot != col {
            a.swap(pivot, col);
            b.swap(pivot, col);
        }

        for row in col + 1..TERMS {
            let factor = a[row][col] / a[col][col];
            for k in col..TERMS {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = [0.0; TERMS];
    for col in (0..TERMS).rev() {
        let mut sum = b[col];
        for k in col + 1..TERMS {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }

    Ok(x)
}

/// R² against the sample mean, clamped to [0, 1]
///
/// A zero-variance target has nothing to explain; report 0 rather than a
/// numerically unstable ratio.
fn r_squared(samples: &[CalibrationSample], coefficients: &[f64; TERMS]) -> f64 {
    let mean_y = samples.iter().map(|s| s.bat_speed_mph).sum::<f64>() / samples.len() as f64;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for sample in samples {
        let row = design_row(sample);
        let predicted: f64 = row.iter().zip(coefficients).map(|(x, c)| x * c).sum();
        ss_res += (sample.bat_speed_mph - predicted).powi(2);
        ss_tot += (sample.bat_speed_mph - mean_y).powi(2);
    }

    if ss_tot <= f64::EPSILON {
        return 0.0;
    }
    (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Samples from a known linear function with deterministic jitter
    /// small enough to leave the fit essentially exact
    fn synthetic_samples(n: usize) -> Vec<CalibrationSample> {
        (0..n)
            .map(|i| {
                let brain = 40.0 + ((i * 7) % 13) as f64;
                let body = 50.0 + ((i * 5) % 11) as f64;
                let bat = 45.0 + ((i * 3) % 17) as f64;
                let ball = 55.0 + ((i * 11) % 7) as f64;
                let jitter = ((i % 3) as f64 - 1.0) * 0.005;
                let speed =
                    18.0 + 0.55 * brain + 0.30 * body + 0.12 * bat + 0.08 * ball + jitter;
                CalibrationSample {
                    scores: [brain, body, bat, ball],
                    bat_speed_mph: speed,
                }
            })
            .collect()
    }

    #[test]
    fn test_recovers_known_coefficients() {
        let calibrator = Calibrator::default();
        let samples = synthetic_samples(16);

        let model = calibrator.calibrate(Uuid::new_v4(), &samples).unwrap();

        let expected = [18.0, 0.55, 0.30, 0.12, 0.08];
        for (fitted, known) in model.coefficients.iter().zip(expected) {
            assert!(
                (fitted - known).abs() < 0.05,
                "fitted {} too far from known {}",
                fitted,
                known
            );
        }
        assert!(model.r_squared > 0.95);
        assert_eq!(model.quality, ModelQuality::Strong);
        assert_eq!(model.sample_count, 16);
    }

    #[test]
    fn test_insufficient_samples_names_counts() {
        let calibrator = Calibrator::default();
        let samples = synthetic_samples(4);

        match calibrator.calibrate(Uuid::new_v4(), &samples).unwrap_err() {
            CalibrationError::InsufficientSamples { required, actual } => {
                assert_eq!(required, 5);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collinear_scores_are_singular() {
        let calibrator = Calibrator::default();
        // Identical sub-scores every swing: every slope column is a
        // multiple of the intercept column
        let samples: Vec<CalibrationSample> = (0..8)
            .map(|i| CalibrationSample {
                scores: [50.0, 60.0, 55.0, 45.0],
                bat_speed_mph: 65.0 + i as f64,
            })
            .collect();

        assert!(matches!(
            calibrator.calibrate(Uuid::new_v4(), &samples).unwrap_err(),
            CalibrationError::SingularSystem { .. }
        ));
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let calibrator = Calibrator::default();
        let mut samples = synthetic_samples(8);
        samples[3].bat_speed_mph = f64::NAN;

        assert!(matches!(
            calibrator.calibrate(Uuid::new_v4(), &samples).unwrap_err(),
            CalibrationError::InvalidSample { index: 3 }
        ));
    }

    #[test]
    fn test_zero_variance_target_reports_zero_r_squared() {
        let calibrator = Calibrator::default();
        let samples: Vec<CalibrationSample> = synthetic_samples(8)
            .into_iter()
            .map(|mut s| {
                s.bat_speed_mph = 70.0;
                s
            })
            .collect();

        let model = calibrator.calibrate(Uuid::new_v4(), &samples).unwrap();
        assert_eq!(model.r_squared, 0.0);
        assert_eq!(model.quality, ModelQuality::Weak);
    }

    #[test]
    fn test_expiry_is_ninety_days_out() {
        let calibrator = Calibrator::default();
        let model = calibrator
            .calibrate(Uuid::new_v4(), &synthetic_samples(8))
            .unwrap();

        assert_eq!(model.expires_at - model.calibrated_at, Duration::days(90));
    }

    #[test]
    fn test_interpretation_reads_per_ten_points() {
        let calibrator = Calibrator::default();
        let model = calibrator
            .calibrate(Uuid::new_v4(), &synthetic_samples(16))
            .unwrap();

        assert_eq!(model.interpretation.len(), 5);
        assert!(model.interpretation[0].starts_with("Strong model fit"));
        // 0.55 per point -> +5.5 per 10 points in brain
        assert!(
            model.interpretation[1].contains("mph per 10 points in brain"),
            "got: {}",
            model.interpretation[1]
        );
        assert!(model.interpretation[1].starts_with("+5."));
    }

    #[test]
    fn test_prediction_round_trip() {
        let calibrator = Calibrator::default();
        let samples = synthetic_samples(16);
        let model = calibrator.calibrate(Uuid::new_v4(), &samples).unwrap();

        for sample in &samples {
            let predicted = model.predict(
                sample.scores[0],
                sample.scores[1],
                sample.scores[2],
                sample.scores[3],
            );
            assert!((predicted - sample.bat_speed_mph).abs() < 0.1);
        }
    }

    #[test]
    fn test_quality_banding() {
        let calibrator = Calibrator::default();
        assert_eq!(calibrator.quality_band(0.9), ModelQuality::Strong);
        assert_eq!(calibrator.quality_band(0.7), ModelQuality::Moderate);
        assert_eq!(calibrator.quality_band(0.5), ModelQuality::Moderate);
        assert_eq!(calibrator.quality_band(0.4), ModelQuality::Weak);
        assert_eq!(calibrator.quality_band(0.1), ModelQuality::Weak);
    }
}
