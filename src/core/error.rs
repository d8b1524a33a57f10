//! Error types for FastNum2Hap
//!
//! Defines all error types used throughout the library.

use crate::core::scheme::Scheme;
use crate::core::validator::ViolationReport;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FastNum2Hap operations
#[derive(Debug, Error)]
pub enum Num2HapError {
    /// Leading metadata columns missing or out of order
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Requested encoding scheme is not recognized
    #[error("Unsupported scheme '{0}': choose '0/1/2' or '-1/0/1'")]
    UnsupportedScheme(String),

    /// Genotype values outside the scheme's legal domain
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unmapped genotype value in strict mode
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Malformed table rows
    #[error("Parse error: {0}")]
    Parse(#[from] TableParseError),

    /// Batch dispatch and output errors
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural problems with the table header
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No header line at all
    #[error("Input table has no header line")]
    MissingHeader,

    /// First five columns differ from SNP, CHR, POS, REF, ALT
    #[error("Input file must have the first five columns as: [SNP, CHR, POS, REF, ALT], found [{}]", .found.join(", "))]
    LeadingColumns { found: Vec<String> },
}

/// Aggregated report of illegal genotype values
#[derive(Debug, Error)]
#[error("{report}")]
pub struct ValidationError {
    pub report: ViolationReport,
}

/// Errors raised while translating a row
#[derive(Debug, Error)]
pub enum TranslationError {
    /// A non-missing cell has no allele pair under the scheme
    #[error("marker {marker}, sample {sample}: value '{value}' has no genotype under scheme {scheme}")]
    Unmapped {
        marker: String,
        sample: String,
        value: String,
        scheme: Scheme,
    },
}

/// Errors that can occur while reading the numeric table
#[derive(Debug, Error)]
pub enum TableParseError {
    /// Row width differs from the header
    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Line is not valid UTF-8
    #[error("Invalid UTF-8 at line {line}")]
    InvalidUtf8 { line: usize },

    /// Any other delimited-text error
    #[error("Malformed table: {message}")]
    Malformed { message: String },

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during batch conversion and output
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Batch size of zero
    #[error("Batch size must be a positive integer")]
    InvalidBatchSize,

    /// Worker count of zero
    #[error("Worker count must be a positive integer")]
    InvalidThreads,

    /// Rayon pool construction failed
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),

    /// Output write error
    #[error("Failed to write output {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for FastNum2Hap operations
pub type Result<T> = std::result::Result<T, Num2HapError>;
