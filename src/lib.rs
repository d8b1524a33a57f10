//! FastNum2Hap - Numeric genotype to HapMap diploid conversion
//!
//! Converts tables of numerically encoded genotypes (one row per marker,
//! one column per sample) into two-letter allele pairs built from each
//! marker's REF and ALT alleles.
//!
//! # Features
//!
//! - Two encoding schemes: `0/1/2` and `-1/0/1`, with `-9` as missing
//! - Whole-table validation that reports every offending marker at once
//! - Parallel batch translation with rayon, order preserved
//! - Support for compressed input (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use fast_num2hap::{convert_genotypes, ConvertOptions, Scheme};
//!
//! let options = ConvertOptions { scheme: Scheme::ZeroOneTwo, ..Default::default() };
//! let stats = convert_genotypes("genotypes.csv", "genotypes.hmp.csv", &options)?;
//! println!("{} markers converted", stats.markers);
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    AlleleMap, BatchConfig, ConversionError, ConversionStats, GenotypeClass, GenotypeTable,
    MarkerRecord, Num2HapError, SchemaError, Scheme, TableParseError, TranslationError,
    ValidationError, ViolationReport,
};
pub use crate::formats::{
    convert_genotypes, convert_table, read_numeric_table, validate_genotypes, ConvertOptions,
    OutputLayout,
};
