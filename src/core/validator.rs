//! Whole-table validation
//!
//! Checks the header layout, then scans every marker for genotype values
//! outside the scheme's legal domain. All offenders are collected before
//! failing so the input can be fixed in one pass.

use crate::core::error::{Num2HapError, SchemaError, ValidationError};
use crate::core::scheme::{coerce_cell, CellValue, Scheme};
use crate::core::table::{GenotypeTable, MarkerRecord, METADATA_COLUMNS, REQUIRED_COLUMNS};
use std::fmt;

/// Illegal values found in one marker row
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub marker_id: String,
    /// Distinct illegal values, ascending
    pub values: Vec<f64>,
}

/// Immutable result of one validation pass
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationReport {
    scheme: Scheme,
    markers_scanned: usize,
    violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn markers_scanned(&self) -> usize {
        self.markers_scanned
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Look up the violation recorded for a marker
    pub fn get(&self, marker_id: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.marker_id == marker_id)
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Format mismatch! Input data contains values inconsistent with scheme '{}'.",
            self.scheme
        )?;
        writeln!(f, "Affected markers and invalid values:")?;
        for violation in &self.violations {
            let values: Vec<String> = violation.values.iter().map(|v| format_value(*v)).collect();
            writeln!(f, "- {}: {}", violation.marker_id, values.join(", "))?;
        }
        write!(
            f,
            "\nFix: ensure your data matches the specified scheme or choose the other one."
        )
    }
}

/// Render integral values without a fractional part
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Mutable accumulator used during a single pass
struct ViolationCollector {
    scheme: Scheme,
    scanned: usize,
    violations: Vec<Violation>,
}

impl ViolationCollector {
    fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            scanned: 0,
            violations: Vec::new(),
        }
    }

    fn visit(&mut self, marker: &MarkerRecord) {
        self.scanned += 1;
        let values = illegal_values(marker, self.scheme);
        if !values.is_empty() {
            self.violations.push(Violation {
                marker_id: marker.id.clone(),
                values,
            });
        }
    }

    fn finish(self) -> ViolationReport {
        ViolationReport {
            scheme: self.scheme,
            markers_scanned: self.scanned,
            violations: self.violations,
        }
    }
}

/// Check that the header starts with SNP, CHR, POS, REF, ALT
pub fn check_schema<S: AsRef<str>>(columns: &[S]) -> Result<(), SchemaError> {
    let leading: Vec<&str> = columns
        .iter()
        .take(METADATA_COLUMNS)
        .map(|c| c.as_ref())
        .collect();
    if leading != REQUIRED_COLUMNS {
        return Err(SchemaError::LeadingColumns {
            found: leading.iter().map(|c| c.to_string()).collect(),
        });
    }
    Ok(())
}

/// Distinct numeric values in a row that the scheme does not allow
///
/// Non-numeric cells are skipped.
pub fn illegal_values(marker: &MarkerRecord, scheme: Scheme) -> Vec<f64> {
    let mut values: Vec<f64> = marker
        .genotypes
        .iter()
        .filter_map(|cell| match coerce_cell(cell) {
            CellValue::Number(v) if !scheme.is_legal(v) => Some(v),
            _ => None,
        })
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

/// Scan every marker and build the violation report
pub fn scan(table: &GenotypeTable, scheme: Scheme) -> ViolationReport {
    let mut collector = ViolationCollector::new(scheme);
    for marker in table.markers() {
        collector.visit(marker);
    }
    collector.finish()
}

/// Validate a table against a scheme
///
/// Schema problems fail before any row is inspected; illegal values fail
/// after the full scan with every offender listed.
pub fn validate(table: &GenotypeTable, scheme: Scheme) -> Result<ViolationReport, Num2HapError> {
    check_schema(table.columns())?;
    let report = scan(table, scheme);
    if !report.is_empty() {
        log::debug!(
            "{} of {} markers failed validation",
            report.violations().len(),
            report.markers_scanned()
        );
        return Err(ValidationError { report }.into());
    }
    log::info!("Validated {} markers against scheme {}", report.markers_scanned(), scheme);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: &str, cells: &[&str]) -> MarkerRecord {
        MarkerRecord::new(id, "1", "100", "A", "T", cells.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_check_schema_ok() {
        let columns = ["SNP", "CHR", "POS", "REF", "ALT", "S1"];
        assert!(check_schema(&columns).is_ok());
    }

    #[test]
    fn test_check_schema_wrong_name() {
        let columns = ["SNP", "CHR", "POS", "REF", "ALTERNATE", "S1"];
        let err = check_schema(&columns).unwrap_err();
        assert!(matches!(err, SchemaError::LeadingColumns { ref found } if found[4] == "ALTERNATE"));
    }

    #[test]
    fn test_check_schema_wrong_order() {
        let columns = ["CHR", "SNP", "POS", "REF", "ALT"];
        assert!(check_schema(&columns).is_err());
    }

    #[test]
    fn test_check_schema_too_few_columns() {
        let columns = ["SNP", "CHR", "POS"];
        assert!(check_schema(&columns).is_err());
    }

    #[test]
    fn test_illegal_values_sorted_distinct() {
        let m = marker("SNP1", &["3", "0", "5", "3", "-1", "NA", "abc"]);
        assert_eq!(illegal_values(&m, Scheme::ZeroOneTwo), vec![-1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_missing_sentinel_legal_in_both() {
        let m = marker("SNP1", &["-9", "-9"]);
        for scheme in Scheme::ALL {
            assert!(illegal_values(&m, scheme).is_empty());
        }
    }

    #[test]
    fn test_validate_collects_all_offenders() {
        let table = GenotypeTable::with_samples(
            &["S1", "S2"],
            vec![
                marker("SNP001", &["0", "1"]),
                marker("SNP007", &["3", "2"]),
                marker("SNP009", &["-1", "4"]),
            ],
        );
        let err = validate(&table, Scheme::ZeroOneTwo).unwrap_err();
        let Num2HapError::Validation(err) = err else {
            panic!("expected validation error");
        };
        let report = &err.report;
        assert_eq!(report.markers_scanned(), 3);
        assert_eq!(report.violations().len(), 2);
        assert_eq!(report.get("SNP007").unwrap().values, vec![3.0]);
        assert_eq!(report.get("SNP009").unwrap().values, vec![-1.0, 4.0]);

        let message = err.to_string();
        assert!(message.contains("- SNP007: 3"));
        assert!(message.contains("- SNP009: -1, 4"));
        assert!(message.contains("'0/1/2'"));
    }

    #[test]
    fn test_validate_schema_before_values() {
        let table = GenotypeTable::new(
            ["SNP", "CHR", "POS", "REF", "ALTERNATE", "S1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![marker("SNP007", &["3"])],
        );
        assert!(matches!(
            validate(&table, Scheme::ZeroOneTwo),
            Err(Num2HapError::Schema(_))
        ));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-1.0), "-1");
        assert_eq!(format_value(1.5), "1.5");
    }
}
