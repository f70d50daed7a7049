//! Salinity assessment: per-sample scoring and population interpretation.
//!
//! - `classifier` — EC/Cl threshold score and status for one sample.
//! - `interpretation` — population statistics and the overall recommendation.

pub mod classifier;
pub mod interpretation;
