//! FastNum2Hap CLI entry point
//!
//! Converts numeric genotype tables to HapMap diploid genotypes.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use fast_num2hap::core::{DEFAULT_BATCH_SIZE, DEFAULT_THREADS};
use fast_num2hap::formats::{self, default_output_path, ConvertOptions, OutputLayout};
use fast_num2hap::Scheme;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

/// Output layout (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum LayoutArg {
    /// Same columns as the input, comma-separated
    #[default]
    #[value(name = "csv")]
    Csv,
    /// Standard 11-column HapMap, tab-separated
    #[value(name = "hmp")]
    Hmp,
}

impl From<LayoutArg> for OutputLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Csv => OutputLayout::Csv,
            LayoutArg::Hmp => OutputLayout::Hmp,
        }
    }
}

#[derive(Parser)]
#[command(name = "fast-num2hap")]
#[command(about = "Convert numeric genotype tables to HapMap diploid format")]
#[command(version)]
#[command(author = "FastNum2Hap Contributors")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a numeric genotype file
    Convert {
        /// Input CSV/TSV file (SNP, CHR, POS, REF, ALT, samples...)
        input: PathBuf,
        /// Output file (default: <input>.hmp.csv or <input>.hmp.txt)
        output: Option<PathBuf>,
        /// Numeric encoding: '0/1/2' or '-1/0/1'
        #[arg(short = 's', long, default_value = "0/1/2", allow_hyphen_values = true, value_parser = Scheme::from_str)]
        scheme: Scheme,
        /// Number of markers per batch
        #[arg(short = 'b', long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Number of worker threads
        #[arg(short = 't', long, default_value_t = DEFAULT_THREADS)]
        threads: usize,
        /// Fail on values that have no genotype instead of writing NA
        #[arg(long)]
        strict: bool,
        /// Output layout: csv (mirror input) or hmp (HapMap hmp.txt)
        #[arg(long, default_value = "csv")]
        layout: LayoutArg,
    },
    /// Check a numeric genotype file without writing output
    Validate {
        /// Input CSV/TSV file
        input: PathBuf,
        /// Numeric encoding: '0/1/2' or '-1/0/1'
        #[arg(short = 's', long, default_value = "0/1/2", allow_hyphen_values = true, value_parser = Scheme::from_str)]
        scheme: Scheme,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    match cli.command {
        Commands::Convert { input, output, scheme, batch_size, threads, strict, layout } => {
            let layout: OutputLayout = layout.into();
            let output_path = output.unwrap_or_else(|| default_output_path(&input, layout));
            let options = ConvertOptions { scheme, batch_size, threads, strict, layout };

            eprintln!("Loading numeric genotype file: {:?}", input);
            eprintln!("Converting with scheme {} -> {:?}", scheme, output_path);
            let stats = formats::convert_genotypes(&input, &output_path, &options)?;

            eprintln!("\n=== Conversion Statistics ===");
            eprintln!("Markers:         {}", stats.markers);
            eprintln!("Samples:         {}", stats.samples);
            eprintln!("Batches:         {}", stats.batches);
            eprintln!("Missing cells:   {}", stats.missing);
            if stats.anomalies > 0 {
                eprintln!("Unmapped (NA):   {}", stats.anomalies);
            }
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Validate { input, scheme } => {
            eprintln!("Validating {:?} against scheme {}", input, scheme);
            let summary = formats::validate_genotypes(&input, scheme)?;

            eprintln!("\n=== Validation Passed ===");
            eprintln!("Markers:         {}", summary.markers);
            eprintln!("Samples:         {}", summary.samples);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
