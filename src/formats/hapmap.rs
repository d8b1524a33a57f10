//! HapMap diploid output and the conversion pipeline
//!
//! Loads a numeric table, validates it, translates it in parallel batches
//! and writes the diploid genotypes either as CSV mirroring the input
//! columns or as a tab-delimited `hmp.txt` file.

use crate::core::batch::{self, BatchConfig, ConversionStats, DEFAULT_BATCH_SIZE, DEFAULT_THREADS};
use crate::core::io::OutputFile;
use crate::core::scheme::{Scheme, MISSING_TOKEN};
use crate::core::table::GenotypeTable;
use crate::core::validator;
use crate::core::{ConversionError, Num2HapError};
use crate::formats::numeric::read_numeric_file;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Fixed leading columns of the HapMap `hmp.txt` layout
pub const HMP_COLUMNS: [&str; 11] = [
    "rs#", "alleles", "chrom", "pos", "strand", "assembly#", "center", "protLSID",
    "assayLSID", "panelLSID", "QCcode",
];

/// Output table layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Comma-separated, same header as the input
    #[default]
    Csv,
    /// Tab-separated HapMap with the 11 standard leading columns
    Hmp,
}

impl OutputLayout {
    pub fn delimiter(self) -> u8 {
        match self {
            OutputLayout::Csv => b',',
            OutputLayout::Hmp => b'\t',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputLayout::Csv => "hmp.csv",
            OutputLayout::Hmp => "hmp.txt",
        }
    }
}

/// Options for a full conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub scheme: Scheme,
    pub batch_size: usize,
    pub threads: usize,
    pub strict: bool,
    pub layout: OutputLayout,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            threads: DEFAULT_THREADS,
            strict: false,
            layout: OutputLayout::default(),
        }
    }
}

impl ConvertOptions {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            batch_size: self.batch_size,
            threads: self.threads,
            strict: self.strict,
        }
    }
}

/// Output path used when none is given: `<input stem>.hmp.csv` / `.hmp.txt`
pub fn default_output_path(input: &Path, layout: OutputLayout) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("output");
    let stem = [".gz", ".bz2"]
        .iter()
        .fold(name, |n, ext| n.strip_suffix(ext).unwrap_or(n));
    let stem = stem.rsplit_once('.').map(|(s, _)| s).unwrap_or(stem);
    input.with_file_name(format!("{}.{}", stem, layout.extension()))
}

/// Write a translated table in the requested layout
///
/// Fields containing the delimiter, quotes or line breaks are quoted.
pub fn write_table<W: Write>(
    writer: &mut W,
    table: &GenotypeTable,
    layout: OutputLayout,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(layout.delimiter())
        .from_writer(writer);

    match layout {
        OutputLayout::Csv => {
            wtr.write_record(table.columns())?;
            for marker in table.markers() {
                let fields = marker
                    .metadata()
                    .into_iter()
                    .chain(marker.genotypes.iter().map(String::as_str));
                wtr.write_record(fields)?;
            }
        }
        OutputLayout::Hmp => {
            let header = HMP_COLUMNS
                .iter()
                .copied()
                .chain(table.sample_names().iter().map(String::as_str));
            wtr.write_record(header)?;
            for marker in table.markers() {
                let alleles = format!("{}/{}", marker.ref_allele, marker.alt_allele);
                let fixed = [
                    marker.id.as_str(),
                    alleles.as_str(),
                    marker.chrom.as_str(),
                    marker.pos.as_str(),
                    "+",
                    MISSING_TOKEN,
                    MISSING_TOKEN,
                    MISSING_TOKEN,
                    MISSING_TOKEN,
                    MISSING_TOKEN,
                    MISSING_TOKEN,
                ];
                let fields = fixed
                    .into_iter()
                    .chain(marker.genotypes.iter().map(String::as_str));
                wtr.write_record(fields)?;
            }
        }
    }
    wtr.flush()
}

/// Validate and translate an in-memory table
pub fn convert_table(
    table: &GenotypeTable,
    options: &ConvertOptions,
) -> Result<(GenotypeTable, ConversionStats), Num2HapError> {
    validator::validate(table, options.scheme)?;
    batch::run(table, options.scheme, &options.batch_config())
}

/// Convert a numeric genotype file to HapMap diploid genotypes
///
/// Nothing is written unless loading, validation and translation all
/// succeed; a failed write removes the partial output.
pub fn convert_genotypes<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConversionStats, Num2HapError> {
    options.batch_config().check()?;
    let table = read_numeric_file(input.as_ref())?;
    let (converted, stats) = convert_table(&table, options)?;
    drop(table);

    let output = output.as_ref();
    log::info!("Writing {} markers to {:?}", converted.len(), output);
    let write_error = |source: io::Error| ConversionError::WriteError {
        path: output.to_path_buf(),
        source,
    };
    let mut sink = OutputFile::create(output).map_err(write_error)?;
    write_table(&mut sink, &converted, options.layout).map_err(write_error)?;
    sink.commit().map_err(write_error)?;

    Ok(stats)
}

/// Summary of a successful validation-only run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub markers: usize,
    pub samples: usize,
}

/// Check a numeric genotype file without producing output
pub fn validate_genotypes<P: AsRef<Path>>(
    input: P,
    scheme: Scheme,
) -> Result<ValidationSummary, Num2HapError> {
    let table = read_numeric_file(input)?;
    let report = validator::validate(&table, scheme)?;
    Ok(ValidationSummary {
        markers: report.markers_scanned(),
        samples: table.sample_count(),
    })
}
