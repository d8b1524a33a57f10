//! Core genotype translation functionality
//!
//! This module contains the encoding schemes, the genotype table model,
//! the validator, the row translator and the batch coordinator.

pub mod batch;
mod error;
pub mod io;
pub mod scheme;
pub mod table;
pub mod translator;
pub mod validator;

pub use batch::{partition, run, BatchConfig, ConversionStats, DEFAULT_BATCH_SIZE, DEFAULT_THREADS};
pub use error::{
    ConversionError, Num2HapError, Result, SchemaError, TableParseError,
    TranslationError, ValidationError,
};
pub use io::{detect_compression, CompressionFormat, IoStrategy, OutputFile, SmartReader};
pub use scheme::{coerce_cell, AlleleMap, CellValue, GenotypeClass, Scheme, MISSING_CODE, MISSING_TOKEN};
pub use table::{GenotypeTable, MarkerRecord, METADATA_COLUMNS, REQUIRED_COLUMNS};
pub use translator::{translate_cell, translate_row, CellTranslation, TranslatedRow, TranslationAnomaly};
pub use validator::{check_schema, illegal_values, scan, validate, Violation, ViolationReport};
