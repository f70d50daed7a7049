//! Per-sample salinity classification.
//!
//! Scoring is additive over two independent contributions, electrical
//! conductivity and chloride. Each contribution is tiered with strictly
//! greater-than comparisons, so a value sitting exactly on a threshold
//! stays in the lower tier.
//!
//! The resulting score doubles as the reported confidence. It is a rule
//! score, not a calibrated probability.

use crate::config::ClassifierThresholds;
use crate::model::{Classification, SalinityStatus};

/// Scores samples against a fixed set of thresholds.
#[derive(Debug, Clone, Default)]
pub struct SampleClassifier {
    thresholds: ClassifierThresholds,
}

impl SampleClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    /// Classifies a sample from EC (µS/cm) and chloride (mg/L).
    ///
    /// Inputs are expected to be non-negative; ingest rejects anything else
    /// before it gets here.
    pub fn classify(&self, ec: f64, cl: f64) -> Classification {
        let t = &self.thresholds;
        let score = self.tier_points(ec, t.ec_moderate_us_cm, t.ec_high_us_cm)
            .saturating_add(self.tier_points(cl, t.cl_moderate_mg_l, t.cl_high_mg_l));

        Classification {
            status: self.status_for(score),
            confidence: score.min(100),
        }
    }

    /// Maps a score onto a status using the configured cut-offs.
    pub fn status_for(&self, score: u8) -> SalinityStatus {
        if score >= self.thresholds.saline_min_score {
            SalinityStatus::Saline
        } else if score >= self.thresholds.slightly_saline_min_score {
            SalinityStatus::SlightlySaline
        } else {
            SalinityStatus::Fresh
        }
    }

    fn tier_points(&self, value: f64, moderate: f64, high: f64) -> u8 {
        if value > high {
            self.thresholds.high_points
        } else if value > moderate {
            self.thresholds.moderate_points
        } else {
            0
        }
    }
}

/// Classifies with the default thresholds.
pub fn classify(ec: f64, cl: f64) -> Classification {
    SampleClassifier::default().classify(ec, cl)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
