//! Result export: enriched CSV, JSON run report and a plain-text table.
//!
//! The CSV keeps a fixed column order: passthrough columns as they appeared
//! in the input, the required measurements, then every derived column.
//! Undefined ratios are written as empty cells, never as NaN or inf.

use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use crate::assess::interpretation::Recommendation;
use crate::error::SalinityError;
use crate::logging::{self, Stage};
use crate::model::{
    AssessedSample, COL_CA, COL_CA_MEQ, COL_CL, COL_CL_HCO3, COL_CL_MEQ, COL_CONFIDENCE, COL_EC,
    COL_HCO3, COL_HCO3_MEQ, COL_MG, COL_MG_MEQ, COL_NA, COL_NA_CL, COL_NA_MEQ, COL_STATUS, Ratio,
    RejectedSample,
};
use crate::pipeline::Assessment;

/// Default file name for the enriched CSV.
pub const DEFAULT_RESULTS_FILE: &str = "salinisation_results.csv";

/// Measured and derived columns, in export order, following any
/// passthrough columns.
pub const RESULT_COLUMNS: [&str; 15] = [
    COL_NA,
    COL_CA,
    COL_MG,
    COL_CL,
    COL_HCO3,
    COL_EC,
    COL_NA_MEQ,
    COL_CA_MEQ,
    COL_MG_MEQ,
    COL_CL_MEQ,
    COL_HCO3_MEQ,
    COL_NA_CL,
    COL_CL_HCO3,
    COL_STATUS,
    COL_CONFIDENCE,
];

// ============================================================================
// CSV
// ============================================================================

/// Builds the enriched result table.
pub fn results_frame(assessment: &Assessment) -> Result<DataFrame, SalinityError> {
    let samples = assessment.samples.as_slice();
    let float_col = |name: &str, f: fn(&AssessedSample) -> f64| float_column(name, samples, f);
    let ratio_col = |name: &str, f: fn(&AssessedSample) -> Ratio| ratio_column(name, samples, f);

    let mut columns: Vec<Column> = assessment
        .extra_columns
        .iter()
        .enumerate()
        .map(|(k, name)| {
            let values: Vec<String> = samples
                .iter()
                .map(|s| s.sample.extra.get(k).cloned().unwrap_or_default())
                .collect();
            Column::new(name.as_str().into(), values.as_slice())
        })
        .collect();

    columns.extend([
        float_col(COL_NA, |s| s.sample.concentrations.na),
        float_col(COL_CA, |s| s.sample.concentrations.ca),
        float_col(COL_MG, |s| s.sample.concentrations.mg),
        float_col(COL_CL, |s| s.sample.concentrations.cl),
        float_col(COL_HCO3, |s| s.sample.concentrations.hco3),
        float_col(COL_EC, |s| s.sample.concentrations.ec),
        float_col(COL_NA_MEQ, |s| s.equivalents.na),
        float_col(COL_CA_MEQ, |s| s.equivalents.ca),
        float_col(COL_MG_MEQ, |s| s.equivalents.mg),
        float_col(COL_CL_MEQ, |s| s.equivalents.cl),
        float_col(COL_HCO3_MEQ, |s| s.equivalents.hco3),
        ratio_col(COL_NA_CL, |s| s.ratios.na_cl),
        ratio_col(COL_CL_HCO3, |s| s.ratios.cl_hco3),
    ]);

    let status: Vec<&str> = samples
        .iter()
        .map(|s| s.classification.status.label())
        .collect();
    let confidence: Vec<u32> = samples
        .iter()
        .map(|s| u32::from(s.classification.confidence))
        .collect();
    columns.push(Column::new(COL_STATUS.into(), status.as_slice()));
    columns.push(Column::new(COL_CONFIDENCE.into(), confidence.as_slice()));

    Ok(DataFrame::new(columns)?)
}

fn float_column(name: &str, samples: &[AssessedSample], f: fn(&AssessedSample) -> f64) -> Column {
    let values: Vec<f64> = samples.iter().map(f).collect();
    Column::new(name.into(), values.as_slice())
}

/// Undefined ratios become nulls, which the CSV writer emits as empty cells.
fn ratio_column(name: &str, samples: &[AssessedSample], f: fn(&AssessedSample) -> Ratio) -> Column {
    let values: Vec<Option<f64>> = samples.iter().map(|s| f(s).value()).collect();
    Column::new(name.into(), values.as_slice())
}

/// Renders the enriched table as CSV text.
pub fn results_csv_string(assessment: &Assessment) -> Result<String, SalinityError> {
    let mut df = results_frame(assessment)?;
    let mut buf: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)?;
    String::from_utf8(buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Writes the enriched table to `path`.
pub fn write_results_csv(assessment: &Assessment, path: &Path) -> Result<(), SalinityError> {
    let mut df = results_frame(assessment)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    logging::info(
        Stage::Export,
        None,
        &format!("Wrote {} rows to {}", df.height(), path.display()),
    );
    Ok(())
}

// ============================================================================
// JSON report
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub total_rows: usize,
    pub assessed_rows: usize,
    pub rejected_rows: usize,
    pub recommendation: &'a Recommendation,
    pub rejected: &'a [RejectedSample],
}

impl<'a> RunReport<'a> {
    pub fn new(assessment: &'a Assessment, input: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            input: input.to_string(),
            total_rows: assessment.total_rows(),
            assessed_rows: assessment.samples.len(),
            rejected_rows: assessment.rejected.len(),
            recommendation: &assessment.recommendation,
            rejected: &assessment.rejected,
        }
    }
}

pub fn write_report_json(report: &RunReport<'_>, path: &Path) -> Result<(), SalinityError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    logging::info(
        Stage::Export,
        None,
        &format!("Wrote run report to {}", path.display()),
    );
    Ok(())
}

// ============================================================================
// Text table
// ============================================================================

/// Per-sample summary (row, status, confidence, ratios) followed by the
/// overall recommendation.
pub fn render_table(assessment: &Assessment) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<16} {:>12}  {:>10}  {:>10}",
        "Row", COL_STATUS, COL_CONFIDENCE, COL_NA_CL, COL_CL_HCO3
    );
    for s in &assessment.samples {
        let _ = writeln!(
            out,
            "{:>5}  {:<16} {:>12}  {:>10}  {:>10}",
            s.sample.row,
            s.classification.status.label(),
            s.classification.confidence,
            s.ratios.na_cl.to_string(),
            s.ratios.cl_hco3.to_string()
        );
    }
    for r in &assessment.rejected {
        let _ = writeln!(
            out,
            "{:>5}  rejected: {} = '{}' ({})",
            r.row, r.column, r.raw, r.reason
        );
    }
    let rec = &assessment.recommendation;
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall recommendation [{}]:", rec.kind);
    let _ = writeln!(out, "{}", rec.text);
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreeningConfig;
    use crate::model::{Concentrations, Dataset, Sample};
    use crate::pipeline::assess;

    fn sample(row: usize, well: &str, na: f64, cl: f64, ec: f64) -> Sample {
        Sample {
            row,
            concentrations: Concentrations {
                na,
                ca: 40.0,
                mg: 24.3,
                cl,
                hco3: 61.0,
                ec,
            },
            extra: vec![well.to_string()],
        }
    }

    fn assessment() -> Assessment {
        let dataset = Dataset {
            extra_columns: vec!["Well".to_string()],
            samples: vec![
                sample(1, "W1", 23.0, 35.45, 400.0),
                sample(2, "W2", 46.0, 0.0, 1000.0),
            ],
            rejected: Vec::new(),
        };
        assess(&dataset, &ScreeningConfig::default())
    }

    #[test]
    fn test_frame_columns_are_in_fixed_order() {
        let df = results_frame(&assessment()).expect("frame builds");
        let names = df.get_column_names_str();
        assert_eq!(names[0], "Well");
        assert_eq!(&names[1..], &RESULT_COLUMNS[..]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_undefined_ratio_is_an_empty_cell() {
        let csv = results_csv_string(&assessment()).expect("csv renders");
        assert!(!csv.contains("NaN"), "csv must not contain NaN:\n{}", csv);
        assert!(!csv.contains("inf"), "csv must not contain inf:\n{}", csv);

        let mut lines = csv.lines();
        let header: Vec<&str> = lines.next().expect("header").split(',').collect();
        let na_cl = header
            .iter()
            .position(|h| *h == COL_NA_CL)
            .expect("Na_Cl column present");
        let _first = lines.next().expect("first row");
        let second: Vec<&str> = lines.next().expect("second row").split(',').collect();
        assert_eq!(second[0], "W2");
        assert_eq!(second[na_cl], "", "zero-chloride Na_Cl should be blank");
        assert_eq!(second.last(), Some(&"25"));
    }

    #[test]
    fn test_report_serialises_kind_identifier() {
        let a = assessment();
        let report = RunReport::new(&a, "wells.csv", Utc::now());
        let json = serde_json::to_value(&report).expect("report serialises");
        assert_eq!(json["recommendation"]["kind"], "fresh_aquifer");
        assert_eq!(json["total_rows"], 2);
        assert!(json["recommendation"]["stats"]["median_cl_hco3"].is_number());
    }

    #[test]
    fn test_render_table_marks_undefined_ratios() {
        let table = render_table(&assessment());
        assert!(table.contains("undefined"));
        assert!(table.contains("Overall recommendation [fresh_aquifer]"));
    }
}
