//! Hydrochemical table ingest.
//!
//! Reads a CSV with every column as text, checks that the required columns
//! exist (failing fast with the full list of missing names), then parses
//! each row. Rows with a missing, non-numeric, non-finite or negative
//! required value are set aside as `RejectedSample`s instead of being
//! classified on fabricated numbers.

use polars::prelude::*;
use std::path::Path;

use crate::error::{InvalidValue, SalinityError};
use crate::logging::{self, Stage};
use crate::model::{Concentrations, Dataset, REQUIRED_COLUMNS, RejectedSample, Sample};

// ============================================================================
// Reading
// ============================================================================

/// Reads a CSV file into a frame of string columns with trimmed headers.
pub fn read_csv(path: &Path) -> Result<DataFrame, SalinityError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

/// Reads and validates a CSV file in one step.
pub fn load_dataset(path: &Path) -> Result<Dataset, SalinityError> {
    logging::info(
        Stage::Ingest,
        None,
        &format!("Reading hydrochemical table {}", path.display()),
    );
    let df = read_csv(path)?;
    dataset_from_frame(&df)
}

// ============================================================================
// Validation
// ============================================================================

/// Required columns absent from the frame, in required order.
pub fn missing_columns(df: &DataFrame) -> Vec<String> {
    let present = df.get_column_names_str();
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.contains(*required))
        .map(|required| required.to_string())
        .collect()
}

/// Parses one cell of a required column.
pub fn parse_value(raw: Option<&str>) -> Result<f64, InvalidValue> {
    let text = raw.map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Err(InvalidValue::Missing);
    }
    let value: f64 = text.parse().map_err(|_| InvalidValue::NotNumeric)?;
    if !value.is_finite() {
        return Err(InvalidValue::NonFinite);
    }
    if value < 0.0 {
        return Err(InvalidValue::Negative);
    }
    Ok(value)
}

/// Builds a `Dataset` from a parsed frame.
///
/// Returns `SalinityError::Schema` before touching any row when a required
/// column is missing. Non-required columns are carried through as text.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset, SalinityError> {
    let missing = missing_columns(df);
    if !missing.is_empty() {
        logging::error(
            Stage::Ingest,
            None,
            &format!("Missing required columns: {:?}", missing),
        );
        return Err(SalinityError::Schema { missing });
    }

    let required = REQUIRED_COLUMNS
        .iter()
        .map(|name| df.column(name)?.cast(&DataType::String))
        .collect::<PolarsResult<Vec<Column>>>()?;
    let required_text = required
        .iter()
        .map(|c| c.str())
        .collect::<PolarsResult<Vec<&StringChunked>>>()?;

    let extra_columns: Vec<String> = df
        .get_column_names_str()
        .iter()
        .filter(|name| !REQUIRED_COLUMNS.contains(*name))
        .map(|name| name.to_string())
        .collect();
    let extra = extra_columns
        .iter()
        .map(|name| df.column(name)?.cast(&DataType::String))
        .collect::<PolarsResult<Vec<Column>>>()?;
    let extra_text = extra
        .iter()
        .map(|c| c.str())
        .collect::<PolarsResult<Vec<&StringChunked>>>()?;

    let mut dataset = Dataset {
        extra_columns,
        ..Dataset::default()
    };

    for i in 0..df.height() {
        let row = i + 1;
        match parse_row(&required_text, i) {
            Ok(values) => {
                let extra = extra_text
                    .iter()
                    .map(|col| col.get(i).unwrap_or("").to_string())
                    .collect();
                dataset.samples.push(Sample {
                    row,
                    concentrations: Concentrations {
                        na: values[0],
                        ca: values[1],
                        mg: values[2],
                        cl: values[3],
                        hco3: values[4],
                        ec: values[5],
                    },
                    extra,
                });
            }
            Err((column, raw, reason)) => {
                let rejected = RejectedSample {
                    row,
                    column: column.to_string(),
                    raw,
                    reason,
                };
                logging::log_rejection(Stage::Ingest, &rejected);
                dataset.rejected.push(rejected);
            }
        }
    }

    logging::debug(
        Stage::Ingest,
        None,
        &format!(
            "{} rows read, {} valid, {} rejected",
            df.height(),
            dataset.samples.len(),
            dataset.rejected.len()
        ),
    );

    Ok(dataset)
}

/// Parses the required values of row `i`, in `REQUIRED_COLUMNS` order.
/// Stops at the first invalid cell.
fn parse_row(
    columns: &[&StringChunked],
    i: usize,
) -> Result<[f64; 6], (&'static str, String, InvalidValue)> {
    let mut values = [0.0; 6];
    for (slot, (name, col)) in values
        .iter_mut()
        .zip(REQUIRED_COLUMNS.iter().zip(columns.iter()))
    {
        let raw = col.get(i);
        *slot = parse_value(raw)
            .map_err(|reason| (*name, raw.unwrap_or("").to_string(), reason))?;
    }
    Ok(values)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn full_frame() -> DataFrame {
        df!(
            "Well" => ["W1", "W2", "W3"],
            "Na" => ["23", "46", "-4"],
            "Ca" => ["40", "40", "40"],
            "Mg" => ["24.3", "24.3", "24.3"],
            "Cl" => ["35.45", "", "35.45"],
            "HCO3" => ["61", "61", "61"],
            "EC" => ["500", "900", "500"]
        )
        .expect("frame literal is well formed")
    }

    #[test]
    fn test_missing_hco3_is_reported_exactly() {
        let df = df!(
            "Na" => ["23"],
            "Ca" => ["40"],
            "Mg" => ["24.3"],
            "Cl" => ["35.45"],
            "EC" => ["500"]
        )
        .expect("frame literal is well formed");
        match dataset_from_frame(&df) {
            Err(SalinityError::Schema { missing }) => assert_eq!(missing, vec!["HCO3"]),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_columns_are_listed_in_required_order() {
        let df = df!("Well" => ["W1"], "Cl" => ["10"]).expect("frame literal is well formed");
        assert_eq!(
            missing_columns(&df),
            vec!["Na", "Ca", "Mg", "HCO3", "EC"]
        );
    }

    #[test]
    fn test_valid_rows_become_samples_and_bad_rows_are_rejected() {
        let dataset = dataset_from_frame(&full_frame()).expect("schema is complete");
        assert_eq!(dataset.extra_columns, vec!["Well"]);
        assert_eq!(dataset.samples.len(), 1);
        assert_eq!(dataset.samples[0].row, 1);
        assert_eq!(dataset.samples[0].concentrations.na, 23.0);
        assert_eq!(dataset.samples[0].extra, vec!["W1"]);

        assert_eq!(dataset.rejected.len(), 2);
        assert_eq!(dataset.rejected[0].row, 2);
        assert_eq!(dataset.rejected[0].column, "Cl");
        assert_eq!(dataset.rejected[0].reason, InvalidValue::Missing);
        assert_eq!(dataset.rejected[1].row, 3);
        assert_eq!(dataset.rejected[1].column, "Na");
        assert_eq!(dataset.rejected[1].raw, "-4");
        assert_eq!(dataset.rejected[1].reason, InvalidValue::Negative);
    }

    #[test]
    fn test_numeric_typed_columns_are_accepted() {
        let df = df!(
            "Na" => [23.0],
            "Ca" => [40.0],
            "Mg" => [24.3],
            "Cl" => [35.45],
            "HCO3" => [61.0],
            "EC" => [1200.0]
        )
        .expect("frame literal is well formed");
        let dataset = dataset_from_frame(&df).expect("schema is complete");
        assert_eq!(dataset.samples.len(), 1);
        assert_eq!(dataset.samples[0].concentrations.ec, 1200.0);
    }

    #[test]
    fn test_parse_value_reasons() {
        assert_eq!(parse_value(Some(" 12.5 ")), Ok(12.5));
        assert_eq!(parse_value(Some("0")), Ok(0.0));
        assert_eq!(parse_value(None), Err(InvalidValue::Missing));
        assert_eq!(parse_value(Some("  ")), Err(InvalidValue::Missing));
        assert_eq!(parse_value(Some("n/a")), Err(InvalidValue::NotNumeric));
        assert_eq!(parse_value(Some("NaN")), Err(InvalidValue::NonFinite));
        assert_eq!(parse_value(Some("inf")), Err(InvalidValue::NonFinite));
        assert_eq!(parse_value(Some("-0.1")), Err(InvalidValue::Negative));
    }
}
