//! Input adapters that turn hydrochemical tables into a `Dataset`.
//!
//! Submodules:
//! - `table` — CSV reading, required-column check and per-cell validation.

pub mod table;
