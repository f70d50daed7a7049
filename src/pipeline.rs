//! Screening pipeline.
//!
//! Two explicit passes over a `Dataset`:
//!
//! 1. **map**: each sample independently gets its meq/L values, ratios and
//!    classification (`assess_sample`).
//! 2. **reduce**: once every sample is done, the assessed population is
//!    summarised into the overall recommendation.
//!
//! Nothing is mutated in place; a run produces a fresh `Assessment`.

use std::path::Path;

use crate::assess::classifier::SampleClassifier;
use crate::assess::interpretation::Recommendation;
use crate::chemistry::ratios::compute_ratios;
use crate::chemistry::units::to_equivalents;
use crate::config::ScreeningConfig;
use crate::error::SalinityError;
use crate::ingest::table::load_dataset;
use crate::logging::{self, Stage};
use crate::model::{AssessedSample, Dataset, RejectedSample, Sample};

/// Everything one screening run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub extra_columns: Vec<String>,
    pub samples: Vec<AssessedSample>,
    /// Rows refused at ingest or conversion, in row order.
    pub rejected: Vec<RejectedSample>,
    pub recommendation: Recommendation,
}

impl Assessment {
    /// Rows seen in the input, assessed or not.
    pub fn total_rows(&self) -> usize {
        self.samples.len() + self.rejected.len()
    }
}

/// Derives every per-sample field. Fails only when a concentration is
/// negative or non-finite.
pub fn assess_sample(
    sample: &Sample,
    config: &ScreeningConfig,
    classifier: &SampleClassifier,
) -> Result<AssessedSample, RejectedSample> {
    let c = &sample.concentrations;
    let equivalents = to_equivalents(c, &config.ions).map_err(|(ion, reason)| RejectedSample {
        row: sample.row,
        column: ion.column().to_string(),
        raw: c.ion(ion).to_string(),
        reason,
    })?;
    let ratios = compute_ratios(&equivalents);
    let classification = classifier.classify(c.ec, c.cl);

    if !ratios.na_cl.is_defined() || !ratios.cl_hco3.is_defined() {
        logging::debug(
            Stage::Convert,
            Some(sample.row),
            "zero denominator, ratio left undefined",
        );
    }

    Ok(AssessedSample {
        sample: sample.clone(),
        equivalents,
        ratios,
        classification,
    })
}

/// Runs both passes over an in-memory dataset.
pub fn assess(dataset: &Dataset, config: &ScreeningConfig) -> Assessment {
    let classifier = SampleClassifier::new(config.classifier.clone());

    // map
    let mut samples = Vec::with_capacity(dataset.samples.len());
    let mut rejected = dataset.rejected.clone();
    for sample in &dataset.samples {
        match assess_sample(sample, config, &classifier) {
            Ok(assessed) => samples.push(assessed),
            Err(r) => {
                logging::log_rejection(Stage::Convert, &r);
                rejected.push(r);
            }
        }
    }
    rejected.sort_by_key(|r| r.row);

    logging::info(
        Stage::Classify,
        None,
        &format!("{} samples classified", samples.len()),
    );

    // reduce
    let recommendation = Recommendation::from_samples(&samples, &config.interpretation);
    logging::info(
        Stage::Interpret,
        None,
        &format!(
            "Overall recommendation: {} (saline {:.0}%, slightly saline {:.0}%)",
            recommendation.kind,
            recommendation.stats.saline_frac * 100.0,
            recommendation.stats.slight_frac * 100.0
        ),
    );
    logging::log_run_summary(samples.len() + rejected.len(), samples.len(), rejected.len());

    Assessment {
        extra_columns: dataset.extra_columns.clone(),
        samples,
        rejected,
        recommendation,
    }
}

/// Reads a CSV file and screens it. A missing required column aborts the
/// run before any sample is assessed.
pub fn assess_file(path: &Path, config: &ScreeningConfig) -> Result<Assessment, SalinityError> {
    let dataset = load_dataset(path)?;
    Ok(assess(&dataset, config))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::interpretation::RecommendationKind;
    use crate::error::InvalidValue;
    use crate::model::{Concentrations, Ratio, SalinityStatus};

    fn sample(row: usize, na: f64, cl: f64, hco3: f64, ec: f64) -> Sample {
        Sample {
            row,
            concentrations: Concentrations {
                na,
                ca: 40.0,
                mg: 24.3,
                cl,
                hco3,
                ec,
            },
            extra: Vec::new(),
        }
    }

    fn dataset(samples: Vec<Sample>) -> Dataset {
        Dataset {
            samples,
            ..Dataset::default()
        }
    }

    #[test]
    fn test_assess_sample_fills_every_field() {
        let config = ScreeningConfig::default();
        let classifier = SampleClassifier::default();
        let a = assess_sample(&sample(1, 23.0, 35.45, 61.0, 400.0), &config, &classifier)
            .expect("valid sample");
        assert_eq!(a.equivalents.na, 1.0);
        assert_eq!(a.ratios.na_cl, Ratio::Defined(1.0));
        assert_eq!(a.ratios.cl_hco3, Ratio::Defined(1.0));
        assert_eq!(a.classification.status, SalinityStatus::Fresh);
        assert_eq!(a.classification.confidence, 0);
    }

    #[test]
    fn test_zero_chloride_sample_is_still_classified() {
        let config = ScreeningConfig::default();
        let a = assess_sample(
            &sample(1, 50.0, 0.0, 61.0, 2000.0),
            &config,
            &SampleClassifier::default(),
        )
        .expect("zero chloride is valid");
        assert_eq!(a.ratios.na_cl, Ratio::Undefined);
        assert_eq!(a.classification.confidence, 50);
    }

    #[test]
    fn test_negative_concentration_is_rejected_not_classified() {
        let d = dataset(vec![
            sample(1, 23.0, 35.45, 61.0, 400.0),
            sample(2, 23.0, 35.45, -1.0, 400.0),
        ]);
        let result = assess(&d, &ScreeningConfig::default());
        assert_eq!(result.samples.len(), 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].row, 2);
        assert_eq!(result.rejected[0].column, "HCO3");
        assert_eq!(result.rejected[0].reason, InvalidValue::Negative);
        assert_eq!(result.recommendation.stats.sample_count, 1);
        assert_eq!(result.total_rows(), 2);
    }

    #[test]
    fn test_half_saline_population_with_unit_na_cl_is_seawater_intrusion() {
        let mut samples = Vec::new();
        for row in 1..=5 {
            // Na/Cl = 1.0 in meq terms; EC > 1500 and Cl > 250.
            samples.push(sample(row, 230.0, 354.5, 61.0, 2500.0));
        }
        for row in 6..=10 {
            samples.push(sample(row, 23.0, 35.45, 122.0, 400.0));
        }
        let result = assess(&dataset(samples), &ScreeningConfig::default());
        let stats = &result.recommendation.stats;
        assert_eq!(stats.saline_frac, 0.5);
        let median = stats.median_na_cl.expect("all ratios are defined");
        assert!((median - 1.0).abs() < 1e-9, "median Na/Cl {} should be ~1.0", median);
        assert_eq!(result.recommendation.kind, RecommendationKind::SeawaterIntrusion);
    }

    #[test]
    fn test_empty_dataset_is_insufficient_data() {
        let result = assess(&Dataset::default(), &ScreeningConfig::default());
        assert!(result.samples.is_empty());
        assert_eq!(result.recommendation.kind, RecommendationKind::InsufficientData);
    }
}
