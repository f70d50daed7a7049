//! Screening configuration: ion table and decision thresholds.
//!
//! Every constant the pipeline relies on lives here, in one immutable
//! structure passed to the converter, classifier and interpreter. The
//! defaults reproduce the reference screening rules; a TOML file may
//! override any table, e.g.
//!
//! ```toml
//! [classifier]
//! ec_high_us_cm = 2000.0
//!
//! [ions.cl]
//! molar_mass = 35.453
//! charge = 1
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SalinityError;
use crate::model::Ion;

// ---------------------------------------------------------------------------
// Ion table
// ---------------------------------------------------------------------------

/// Molar mass (g/mol) and absolute ionic charge used for mg/L → meq/L.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IonSpec {
    pub molar_mass: f64,
    pub charge: u32,
}

impl IonSpec {
    pub const fn new(molar_mass: f64, charge: u32) -> Self {
        Self { molar_mass, charge }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IonTable {
    pub na: IonSpec,
    pub ca: IonSpec,
    pub mg: IonSpec,
    pub cl: IonSpec,
    pub hco3: IonSpec,
}

impl Default for IonTable {
    fn default() -> Self {
        Self {
            na: IonSpec::new(23.0, 1),
            ca: IonSpec::new(40.0, 2),
            mg: IonSpec::new(24.3, 2),
            cl: IonSpec::new(35.45, 1),
            hco3: IonSpec::new(61.0, 1),
        }
    }
}

impl IonTable {
    pub fn spec(&self, ion: Ion) -> IonSpec {
        match ion {
            Ion::Na => self.na,
            Ion::Ca => self.ca,
            Ion::Mg => self.mg,
            Ion::Cl => self.cl,
            Ion::Hco3 => self.hco3,
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier thresholds
// ---------------------------------------------------------------------------

/// Per-sample scoring thresholds.
///
/// Each measurement contributes `high_points` when strictly above its high
/// threshold, `moderate_points` when strictly above its moderate threshold,
/// and nothing otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub ec_moderate_us_cm: f64,
    pub ec_high_us_cm: f64,
    pub cl_moderate_mg_l: f64,
    pub cl_high_mg_l: f64,
    pub moderate_points: u8,
    pub high_points: u8,
    /// Minimum score classified as Saline.
    pub saline_min_score: u8,
    /// Minimum score classified as Slightly Saline.
    pub slightly_saline_min_score: u8,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            ec_moderate_us_cm: 750.0,
            ec_high_us_cm: 1500.0,
            cl_moderate_mg_l: 100.0,
            cl_high_mg_l: 250.0,
            moderate_points: 25,
            high_points: 50,
            saline_min_score: 75,
            slightly_saline_min_score: 40,
        }
    }
}

// ---------------------------------------------------------------------------
// Interpretation thresholds
// ---------------------------------------------------------------------------

/// Population-level decision thresholds for the overall recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationThresholds {
    /// Fresh aquifer requires the saline fraction strictly below this...
    pub fresh_max_saline_frac: f64,
    /// ...and the slightly saline fraction strictly below this.
    pub fresh_max_slight_frac: f64,
    /// Saline fraction at or above which salinisation is widespread.
    pub widespread_min_saline_frac: f64,
    /// Inclusive Na/Cl window attributed to seawater intrusion.
    pub seawater_na_cl_min: f64,
    pub seawater_na_cl_max: f64,
}

impl Default for InterpretationThresholds {
    fn default() -> Self {
        Self {
            fresh_max_saline_frac: 0.2,
            fresh_max_slight_frac: 0.3,
            widespread_min_saline_frac: 0.4,
            seawater_na_cl_min: 0.85,
            seawater_na_cl_max: 1.15,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub ions: IonTable,
    pub classifier: ClassifierThresholds,
    pub interpretation: InterpretationThresholds,
}

impl ScreeningConfig {
    /// Parses a TOML document. Missing tables and keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SalinityError> {
        let config: ScreeningConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that would make conversion or scoring
    /// meaningless.
    pub fn validate(&self) -> Result<(), SalinityError> {
        for ion in Ion::ALL {
            let spec = self.ions.spec(ion);
            if !(spec.molar_mass.is_finite() && spec.molar_mass > 0.0) {
                return Err(SalinityError::Config(format!(
                    "molar mass for {} must be positive, got {}",
                    ion.column(),
                    spec.molar_mass
                )));
            }
            if spec.charge == 0 {
                return Err(SalinityError::Config(format!(
                    "charge for {} must be non-zero",
                    ion.column()
                )));
            }
        }

        let c = &self.classifier;
        if c.ec_moderate_us_cm >= c.ec_high_us_cm {
            return Err(SalinityError::Config(
                "ec_moderate_us_cm must be below ec_high_us_cm".to_string(),
            ));
        }
        if c.cl_moderate_mg_l >= c.cl_high_mg_l {
            return Err(SalinityError::Config(
                "cl_moderate_mg_l must be below cl_high_mg_l".to_string(),
            ));
        }
        if c.slightly_saline_min_score > c.saline_min_score {
            return Err(SalinityError::Config(
                "slightly_saline_min_score must not exceed saline_min_score".to_string(),
            ));
        }

        let i = &self.interpretation;
        if i.seawater_na_cl_min > i.seawater_na_cl_max {
            return Err(SalinityError::Config(
                "seawater_na_cl_min must not exceed seawater_na_cl_max".to_string(),
            ));
        }
        if i.fresh_max_saline_frac > i.widespread_min_saline_frac {
            return Err(SalinityError::Config(
                "fresh_max_saline_frac must not exceed widespread_min_saline_frac".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads and validates a screening config from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ScreeningConfig, SalinityError> {
    let text = fs::read_to_string(path)?;
    ScreeningConfig::from_toml_str(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
