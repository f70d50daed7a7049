//! Core data types for the groundwater salinisation screening service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It holds column names, measurement rows, derived values and results.
//! Apart from small accessors it contains no logic and no I/O.

use serde::Serialize;
use std::fmt;

use crate::error::InvalidValue;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_NA: &str = "Na";
pub const COL_CA: &str = "Ca";
pub const COL_MG: &str = "Mg";
pub const COL_CL: &str = "Cl";
pub const COL_HCO3: &str = "HCO3";
/// Electrical conductivity, µS/cm.
pub const COL_EC: &str = "EC";

/// Columns that must be present before any row is processed, in the order
/// they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 6] = [COL_NA, COL_CA, COL_MG, COL_CL, COL_HCO3, COL_EC];

pub const COL_NA_MEQ: &str = "Na_meq";
pub const COL_CA_MEQ: &str = "Ca_meq";
pub const COL_MG_MEQ: &str = "Mg_meq";
pub const COL_CL_MEQ: &str = "Cl_meq";
pub const COL_HCO3_MEQ: &str = "HCO3_meq";
pub const COL_NA_CL: &str = "Na_Cl";
pub const COL_CL_HCO3: &str = "Cl_HCO3";
pub const COL_STATUS: &str = "Salinity_Status";
pub const COL_CONFIDENCE: &str = "Confidence_%";

// ---------------------------------------------------------------------------
// Ions
// ---------------------------------------------------------------------------

/// Major ions converted to milliequivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ion {
    Na,
    Ca,
    Mg,
    Cl,
    Hco3,
}

impl Ion {
    pub const ALL: [Ion; 5] = [Ion::Na, Ion::Ca, Ion::Mg, Ion::Cl, Ion::Hco3];

    /// Input column carrying this ion's mg/L concentration.
    pub fn column(self) -> &'static str {
        match self {
            Ion::Na => COL_NA,
            Ion::Ca => COL_CA,
            Ion::Mg => COL_MG,
            Ion::Cl => COL_CL,
            Ion::Hco3 => COL_HCO3,
        }
    }
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// Raw measurements of one sample. Ions in mg/L, EC in µS/cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Concentrations {
    pub na: f64,
    pub ca: f64,
    pub mg: f64,
    pub cl: f64,
    pub hco3: f64,
    pub ec: f64,
}

impl Concentrations {
    pub fn ion(&self, ion: Ion) -> f64 {
        match ion {
            Ion::Na => self.na,
            Ion::Ca => self.ca,
            Ion::Mg => self.mg,
            Ion::Cl => self.cl,
            Ion::Hco3 => self.hco3,
        }
    }
}

/// One groundwater measurement row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// 1-based data row in the source table (header excluded).
    pub row: usize,
    pub concentrations: Concentrations,
    /// Values of non-required columns, aligned with `Dataset::extra_columns`.
    pub extra: Vec<String>,
}

/// A row refused during ingest or conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedSample {
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub reason: InvalidValue,
}

/// Samples sharing a common schema, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Non-required columns carried through to the export, in source order.
    pub extra_columns: Vec<String>,
    pub samples: Vec<Sample>,
    /// Rows that failed value validation while the table was read.
    pub rejected: Vec<RejectedSample>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Ion concentrations in meq/L.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equivalents {
    pub na: f64,
    pub ca: f64,
    pub mg: f64,
    pub cl: f64,
    pub hco3: f64,
}

/// A diagnostic ratio. `Undefined` when the denominator is zero, so no NaN
/// or infinity ever reaches statistics or output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Ratio::Defined(_))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{:.3}", v),
            Ratio::Undefined => write!(f, "undefined"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ratios {
    pub na_cl: Ratio,
    pub cl_hco3: Ratio,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Salinity status levels, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SalinityStatus {
    Fresh,
    SlightlySaline,
    Saline,
}

impl SalinityStatus {
    pub fn label(self) -> &'static str {
        match self {
            SalinityStatus::Fresh => "Fresh",
            SalinityStatus::SlightlySaline => "Slightly Saline",
            SalinityStatus::Saline => "Saline",
        }
    }
}

impl fmt::Display for SalinityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of scoring one sample.
///
/// `confidence` is the raw additive threshold score (0, 25, 50, 75 or 100),
/// not a calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: SalinityStatus,
    pub confidence: u8,
}

/// A sample with every derived field filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessedSample {
    pub sample: Sample,
    pub equivalents: Equivalents,
    pub ratios: Ratios,
    pub classification: Classification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_columns_match_ion_columns_plus_ec() {
        for ion in Ion::ALL {
            assert!(REQUIRED_COLUMNS.contains(&ion.column()));
        }
        assert_eq!(REQUIRED_COLUMNS.last(), Some(&COL_EC));
    }

    #[test]
    fn test_status_ordering_follows_severity() {
        assert!(SalinityStatus::Fresh < SalinityStatus::SlightlySaline);
        assert!(SalinityStatus::SlightlySaline < SalinityStatus::Saline);
    }

    #[test]
    fn test_undefined_ratio_has_no_value() {
        assert_eq!(Ratio::Undefined.value(), None);
        assert_eq!(Ratio::Defined(1.5).value(), Some(1.5));
        assert_eq!(Ratio::Undefined.to_string(), "undefined");
    }
}
