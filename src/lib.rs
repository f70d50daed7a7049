//! Groundwater salinisation screening.
//!
//! Converts hydrochemical measurements to meq/L, derives Na/Cl and Cl/HCO3
//! ratios, scores each sample from EC and chloride, and turns the population
//! into one management recommendation.

pub mod assess;
pub mod chemistry;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;

pub use assess::interpretation::{Recommendation, RecommendationKind};
pub use config::ScreeningConfig;
pub use error::SalinityError;
pub use pipeline::{Assessment, assess, assess_file};
