//! File format adapters
//!
//! Reader for numeric genotype tables and writer for HapMap diploid output.

pub mod hapmap;
pub mod numeric;

pub use hapmap::{
    convert_genotypes, convert_table, default_output_path, validate_genotypes, write_table,
    ConvertOptions, OutputLayout, ValidationSummary,
};
pub use numeric::{detect_delimiter, read_numeric_file, read_numeric_table};
