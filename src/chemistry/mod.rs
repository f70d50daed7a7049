//! Hydrochemical conversions used before classification.
//!
//! Submodules:
//! - `units` — mg/L → meq/L conversion per ion.
//! - `ratios` — Na/Cl and Cl/HCO3 diagnostic ratios.

pub mod ratios;
pub mod units;
