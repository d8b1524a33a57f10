//! Row translation
//!
//! Converts one marker's numeric genotype codes into two-letter allele
//! pairs using that marker's REF/ALT letters.

use crate::core::scheme::{coerce_cell, AlleleMap, CellValue, GenotypeClass, Scheme, MISSING_TOKEN};
use crate::core::table::MarkerRecord;

/// A cell that was non-missing but had no allele pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationAnomaly {
    /// Zero-based sample index within the row
    pub sample: usize,
    /// Raw input token
    pub value: String,
}

/// Translated cells of one marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedRow {
    pub genotypes: Vec<String>,
    /// Cells that were missing in the input
    pub missing: usize,
    /// Cells rendered as NA because they had no mapping
    pub anomalies: Vec<TranslationAnomaly>,
}

/// Outcome of translating a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTranslation<'a> {
    Pair(&'a str),
    Missing,
    Unmapped,
}

/// Translate one raw cell through a marker's allele map
#[inline]
pub fn translate_cell<'a>(map: &'a AlleleMap, token: &str) -> CellTranslation<'a> {
    match coerce_cell(token) {
        CellValue::Missing => CellTranslation::Missing,
        CellValue::Text => CellTranslation::Unmapped,
        CellValue::Number(value) => {
            let scheme = map.scheme();
            match scheme.code_of(value).and_then(|code| scheme.classify(code)) {
                Some(GenotypeClass::Missing) => CellTranslation::Missing,
                Some(class) => CellTranslation::Pair(map.pair(class)),
                None => CellTranslation::Unmapped,
            }
        }
    }
}

/// Translate every genotype cell of a marker
///
/// Unmapped cells become `NA` and are listed in
/// [`TranslatedRow::anomalies`] so callers can report or reject them.
pub fn translate_row(marker: &MarkerRecord, scheme: Scheme) -> TranslatedRow {
    let map = AlleleMap::new(scheme, &marker.ref_allele, &marker.alt_allele);
    let mut genotypes = Vec::with_capacity(marker.genotypes.len());
    let mut missing = 0;
    let mut anomalies = Vec::new();

    for (sample, token) in marker.genotypes.iter().enumerate() {
        match translate_cell(&map, token) {
            CellTranslation::Pair(pair) => genotypes.push(pair.to_string()),
            CellTranslation::Missing => {
                missing += 1;
                genotypes.push(MISSING_TOKEN.to_string());
            }
            CellTranslation::Unmapped => {
                anomalies.push(TranslationAnomaly {
                    sample,
                    value: token.clone(),
                });
                genotypes.push(MISSING_TOKEN.to_string());
            }
        }
    }

    TranslatedRow {
        genotypes,
        missing,
        anomalies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(ref_allele: &str, alt_allele: &str, cells: &[&str]) -> MarkerRecord {
        MarkerRecord::new(
            "SNP1",
            "1",
            "100",
            ref_allele,
            alt_allele,
            cells.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_translate_zero_one_two() {
        let row = translate_row(&marker("A", "T", &["0", "1", "2", "-9"]), Scheme::ZeroOneTwo);
        assert_eq!(row.genotypes, vec!["AA", "AT", "TT", "NA"]);
        assert_eq!(row.missing, 1);
        assert!(row.anomalies.is_empty());
    }

    #[test]
    fn test_translate_minus_one_zero_one() {
        let row = translate_row(
            &marker("G", "C", &["-1", "0", "1", "-9"]),
            Scheme::MinusOneZeroOne,
        );
        assert_eq!(row.genotypes, vec!["GG", "GC", "CC", "NA"]);
    }

    #[test]
    fn test_translate_decimal_spelling() {
        let row = translate_row(&marker("A", "G", &["1.0", " 2 "]), Scheme::ZeroOneTwo);
        assert_eq!(row.genotypes, vec!["AG", "GG"]);
    }

    #[test]
    fn test_already_missing_tokens() {
        let row = translate_row(&marker("A", "T", &["NA", "", "nan"]), Scheme::ZeroOneTwo);
        assert_eq!(row.genotypes, vec!["NA", "NA", "NA"]);
        assert_eq!(row.missing, 3);
        assert!(row.anomalies.is_empty());
    }

    #[test]
    fn test_unmapped_values_flagged() {
        let row = translate_row(&marker("A", "T", &["0", "7", "xyz"]), Scheme::ZeroOneTwo);
        assert_eq!(row.genotypes, vec!["AA", "NA", "NA"]);
        assert_eq!(row.missing, 0);
        assert_eq!(
            row.anomalies,
            vec![
                TranslationAnomaly { sample: 1, value: "7".to_string() },
                TranslationAnomaly { sample: 2, value: "xyz".to_string() },
            ]
        );
    }

    #[test]
    fn test_translate_cell() {
        let map = AlleleMap::new(Scheme::MinusOneZeroOne, "C", "G");
        assert_eq!(translate_cell(&map, "-1"), CellTranslation::Pair("CC"));
        assert_eq!(translate_cell(&map, "-9"), CellTranslation::Missing);
        assert_eq!(translate_cell(&map, "2"), CellTranslation::Unmapped);
    }
}
