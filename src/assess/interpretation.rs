//! Population-level interpretation and management recommendation.
//!
//! The reduce step of the pipeline: per-sample results are summarised into
//! `PopulationStats`, and a fixed decision ladder picks one
//! `RecommendationKind`. Callers and tests key off the kind; the prose lives
//! in `RecommendationKind::text` and can be edited without touching the
//! decision logic.

use serde::Serialize;
use std::fmt;

use crate::config::InterpretationThresholds;
use crate::model::{AssessedSample, SalinityStatus};

// ---------------------------------------------------------------------------
// Recommendation kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    FreshAquifer,
    EarlySalinisation,
    SeawaterIntrusion,
    EvaporationIonExchange,
    ChlorideDominated,
    InsufficientData,
}

impl RecommendationKind {
    /// Stable identifier, suitable for reports and log lines.
    pub fn id(self) -> &'static str {
        match self {
            RecommendationKind::FreshAquifer => "fresh_aquifer",
            RecommendationKind::EarlySalinisation => "early_salinisation",
            RecommendationKind::SeawaterIntrusion => "seawater_intrusion",
            RecommendationKind::EvaporationIonExchange => "evaporation_ion_exchange",
            RecommendationKind::ChlorideDominated => "chloride_dominated",
            RecommendationKind::InsufficientData => "insufficient_data",
        }
    }

    /// Branch rank: 0 fresh, 1 early stage, 2 widespread.
    /// `InsufficientData` carries no severity.
    pub fn severity(self) -> Option<u8> {
        match self {
            RecommendationKind::FreshAquifer => Some(0),
            RecommendationKind::EarlySalinisation => Some(1),
            RecommendationKind::SeawaterIntrusion
            | RecommendationKind::EvaporationIonExchange
            | RecommendationKind::ChlorideDominated => Some(2),
            RecommendationKind::InsufficientData => None,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            RecommendationKind::FreshAquifer => {
                "Overall groundwater quality indicates a fresh aquifer with no significant \
                 salinisation impact. Current groundwater use is sustainable; however, \
                 periodic monitoring is recommended to detect future changes."
            }
            RecommendationKind::EarlySalinisation => {
                "The aquifer shows early-stage salinisation, with a mix of fresh and slightly \
                 saline samples. Preventive management measures such as regulated pumping, \
                 controlled abstraction, and regular hydrochemical monitoring are advised."
            }
            RecommendationKind::SeawaterIntrusion => {
                "A significant proportion of samples indicate salinisation with Na/Cl ratios \
                 close to unity, suggesting seawater intrusion. Immediate intervention is \
                 required, including reduction of groundwater abstraction near the coast, \
                 artificial recharge, and implementation of hydraulic control measures."
            }
            RecommendationKind::EvaporationIonExchange => {
                "Widespread salinisation is observed, likely influenced by evaporation and \
                 ion exchange processes. Groundwater is unsuitable for drinking purposes, \
                 and alternative water sources or blending strategies should be considered."
            }
            RecommendationKind::ChlorideDominated => {
                "The aquifer is affected by chloride-dominated salinity. Restriction of \
                 domestic usage and implementation of long-term salinity mitigation \
                 strategies are strongly recommended."
            }
            RecommendationKind::InsufficientData => {
                "Insufficient data to derive an overall recommendation."
            }
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Population statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationStats {
    pub sample_count: usize,
    pub fresh_count: usize,
    pub slightly_saline_count: usize,
    pub saline_count: usize,
    pub fresh_frac: f64,
    pub slight_frac: f64,
    pub saline_frac: f64,
    /// Median over samples with a defined Na/Cl ratio.
    pub median_na_cl: Option<f64>,
    /// Median over samples with a defined Cl/HCO3 ratio.
    pub median_cl_hco3: Option<f64>,
    pub max_ec: Option<f64>,
}

impl PopulationStats {
    /// Summarises assessed samples. Undefined ratios are left out of the
    /// medians; an empty population has zero fractions and no medians.
    pub fn from_samples(samples: &[AssessedSample]) -> Self {
        let count_of = |status: SalinityStatus| {
            samples
                .iter()
                .filter(|s| s.classification.status == status)
                .count()
        };
        let fresh_count = count_of(SalinityStatus::Fresh);
        let slightly_saline_count = count_of(SalinityStatus::SlightlySaline);
        let saline_count = count_of(SalinityStatus::Saline);

        let fraction = |n: usize| {
            if samples.is_empty() {
                0.0
            } else {
                n as f64 / samples.len() as f64
            }
        };

        let max_ec = samples
            .iter()
            .map(|s| s.sample.concentrations.ec)
            .fold(None, |acc: Option<f64>, ec| Some(acc.map_or(ec, |m| m.max(ec))));

        Self {
            sample_count: samples.len(),
            fresh_count,
            slightly_saline_count,
            saline_count,
            fresh_frac: fraction(fresh_count),
            slight_frac: fraction(slightly_saline_count),
            saline_frac: fraction(saline_count),
            median_na_cl: median(samples.iter().filter_map(|s| s.ratios.na_cl.value())),
            median_cl_hco3: median(samples.iter().filter_map(|s| s.ratios.cl_hco3.value())),
            max_ec,
        }
    }
}

/// Median of the given values; mean of the two middle values for an even
/// count. `None` when there are no values.
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Picks the recommendation for a population. First matching branch wins:
/// fresh, early stage, then widespread split by median Na/Cl.
pub fn interpret(stats: &PopulationStats, t: &InterpretationThresholds) -> RecommendationKind {
    if stats.sample_count == 0 {
        return RecommendationKind::InsufficientData;
    }

    if stats.saline_frac < t.fresh_max_saline_frac && stats.slight_frac < t.fresh_max_slight_frac {
        return RecommendationKind::FreshAquifer;
    }

    if stats.saline_frac < t.widespread_min_saline_frac {
        return RecommendationKind::EarlySalinisation;
    }

    match stats.median_na_cl {
        Some(m) if (t.seawater_na_cl_min..=t.seawater_na_cl_max).contains(&m) => {
            RecommendationKind::SeawaterIntrusion
        }
        Some(m) if m > t.seawater_na_cl_max => RecommendationKind::EvaporationIonExchange,
        Some(_) => RecommendationKind::ChlorideDominated,
        None => RecommendationKind::InsufficientData,
    }
}

/// The overall recommendation for one dataset, with the statistics behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub text: &'static str,
    pub stats: PopulationStats,
}

impl Recommendation {
    pub fn from_samples(samples: &[AssessedSample], t: &InterpretationThresholds) -> Self {
        let stats = PopulationStats::from_samples(samples);
        let kind = interpret(&stats, t);
        Self {
            kind,
            text: kind.text(),
            stats,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
