//! Batch coordination
//!
//! Splits a validated table into contiguous groups of markers, translates
//! the groups on a fixed-size rayon pool and reassembles them by group
//! index, so output order never depends on completion order.

use crate::core::error::{ConversionError, Num2HapError, TranslationError};
use crate::core::scheme::Scheme;
use crate::core::table::{GenotypeTable, MarkerRecord};
use crate::core::translator::{translate_row, TranslationAnomaly};
use rayon::prelude::*;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of markers per dispatched group
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default number of parallel workers
pub const DEFAULT_THREADS: usize = 10;

/// Number of individual anomalies logged before only the total is reported
const ANOMALY_LOG_LIMIT: usize = 10;

/// Partitioning and dispatch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub threads: usize,
    /// Reject unmapped cells instead of rendering them as NA
    pub strict: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            threads: DEFAULT_THREADS,
            strict: false,
        }
    }
}

impl BatchConfig {
    pub fn check(&self) -> Result<(), ConversionError> {
        if self.batch_size == 0 {
            return Err(ConversionError::InvalidBatchSize);
        }
        if self.threads == 0 {
            return Err(ConversionError::InvalidThreads);
        }
        Ok(())
    }
}

/// Conversion statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub markers: usize,
    pub samples: usize,
    pub batches: usize,
    /// Cells that were missing in the input
    pub missing: usize,
    /// Cells rendered as NA without a mapping
    pub anomalies: usize,
}

/// Translated output of one group
struct Batch {
    index: usize,
    markers: Vec<MarkerRecord>,
    missing: usize,
    anomalies: Vec<(usize, TranslationAnomaly)>,
}

/// Split `len` markers into contiguous ranges of at most `batch_size`
pub fn partition(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    let batch_size = batch_size.max(1);
    (0..len)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(len))
        .collect()
}

/// Translate every marker of one group
fn translate_batch(
    index: usize,
    range: Range<usize>,
    table: &GenotypeTable,
    scheme: Scheme,
    strict: bool,
) -> Result<Batch, TranslationError> {
    let offset = range.start;
    let markers = &table.markers()[range];
    let mut translated = Vec::with_capacity(markers.len());
    let mut missing = 0;
    let mut anomalies = Vec::new();

    for (i, marker) in markers.iter().enumerate() {
        let row = translate_row(marker, scheme);
        if strict {
            if let Some(anomaly) = row.anomalies.first() {
                return Err(TranslationError::Unmapped {
                    marker: marker.id.clone(),
                    sample: sample_label(table, anomaly.sample),
                    value: anomaly.value.clone(),
                    scheme,
                });
            }
        }
        missing += row.missing;
        anomalies.extend(row.anomalies.into_iter().map(|a| (offset + i, a)));
        translated.push(marker.with_genotypes(row.genotypes));
    }

    Ok(Batch {
        index,
        markers: translated,
        missing,
        anomalies,
    })
}

fn sample_label(table: &GenotypeTable, sample: usize) -> String {
    table
        .sample_names()
        .get(sample)
        .cloned()
        .unwrap_or_else(|| format!("#{}", sample + 1))
}

/// Translate a validated table in parallel groups
///
/// The returned table has the same header, marker order and sample order
/// as the input. Any group failure aborts the whole run.
pub fn run(
    table: &GenotypeTable,
    scheme: Scheme,
    config: &BatchConfig,
) -> Result<(GenotypeTable, ConversionStats), Num2HapError> {
    config.check()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| ConversionError::ThreadPool(e.to_string()))?;

    let ranges = partition(table.len(), config.batch_size);
    let total = ranges.len();
    let done = AtomicUsize::new(0);
    log::info!(
        "Dispatching {} markers in {} batches of up to {} on {} workers",
        table.len(),
        total,
        config.batch_size,
        config.threads
    );

    let batches: Vec<Batch> = pool.install(|| {
        ranges
            .par_iter()
            .enumerate()
            .map(|(index, range)| -> Result<Batch, TranslationError> {
                let batch = translate_batch(index, range.clone(), table, scheme, config.strict)?;
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Batch {}/{} done ({} markers)", finished, total, batch.markers.len());
                Ok(batch)
            })
            .collect::<Result<Vec<_>, TranslationError>>()
    })?;

    // Slots are keyed by group index, never by completion order
    let mut slots: Vec<Option<Batch>> = (0..total).map(|_| None).collect();
    for batch in batches {
        let index = batch.index;
        slots[index] = Some(batch);
    }

    let mut stats = ConversionStats {
        markers: table.len(),
        samples: table.sample_count(),
        batches: total,
        ..Default::default()
    };
    let mut markers = Vec::with_capacity(table.len());
    for batch in slots.into_iter().flatten() {
        stats.missing += batch.missing;
        for (marker, anomaly) in &batch.anomalies {
            if stats.anomalies < ANOMALY_LOG_LIMIT {
                log::warn!(
                    "Unmapped value '{}' at marker {}, sample {}: written as NA",
                    anomaly.value,
                    table.markers()[*marker].id,
                    sample_label(table, anomaly.sample)
                );
            }
            stats.anomalies += 1;
        }
        markers.extend(batch.markers);
    }

    if stats.anomalies > ANOMALY_LOG_LIMIT {
        log::warn!("{} unmapped values in total were written as NA", stats.anomalies);
    }

    Ok((GenotypeTable::new(table.columns().to_vec(), markers), stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n: usize) -> GenotypeTable {
        let markers = (0..n)
            .map(|i| {
                let code = (i % 3).to_string();
                MarkerRecord::new(
                    format!("SNP{:03}", i),
                    "1",
                    (i * 100).to_string(),
                    "A",
                    "C",
                    vec![code.clone(), "-9".to_string(), code],
                )
            })
            .collect();
        GenotypeTable::with_samples(&["S1", "S2", "S3"], markers)
    }

    #[test]
    fn test_partition_sizes() {
        let ranges = partition(250, 100);
        assert_eq!(ranges, vec![0..100, 100..200, 200..250]);
    }

    #[test]
    fn test_partition_exact_and_empty() {
        assert_eq!(partition(200, 100), vec![0..100, 100..200]);
        assert!(partition(0, 100).is_empty());
        assert_eq!(partition(3, 10), vec![0..3]);
    }

    #[test]
    fn test_config_check() {
        assert!(BatchConfig::default().check().is_ok());
        let zero_batch = BatchConfig { batch_size: 0, ..Default::default() };
        assert!(matches!(zero_batch.check(), Err(ConversionError::InvalidBatchSize)));
        let zero_threads = BatchConfig { threads: 0, ..Default::default() };
        assert!(matches!(zero_threads.check(), Err(ConversionError::InvalidThreads)));
    }

    #[test]
    fn test_run_preserves_order() {
        let input = table(250);
        let config = BatchConfig { batch_size: 100, threads: 4, strict: false };
        let (output, stats) = run(&input, Scheme::ZeroOneTwo, &config).unwrap();

        assert_eq!(stats.batches, 3);
        assert_eq!(stats.markers, 250);
        assert_eq!(stats.missing, 250);
        assert_eq!(stats.anomalies, 0);
        assert_eq!(output.columns(), input.columns());
        for (a, b) in input.markers().iter().zip(output.markers()) {
            assert_eq!(a.id, b.id);
        }
        assert_eq!(output.markers()[1].genotypes, vec!["AC", "NA", "AC"]);
    }

    #[test]
    fn test_run_strict_rejects_unmapped() {
        let markers = vec![MarkerRecord::new("SNP1", "1", "1", "A", "T", vec!["x".to_string()])];
        let input = GenotypeTable::with_samples(&["S1"], markers);
        let config = BatchConfig { strict: true, ..Default::default() };
        let err = run(&input, Scheme::ZeroOneTwo, &config).unwrap_err();
        assert!(matches!(
            err,
            Num2HapError::Translation(TranslationError::Unmapped { ref marker, ref sample, .. })
                if marker == "SNP1" && sample == "S1"
        ));
    }

    #[test]
    fn test_run_strict_fails_in_last_batch() {
        let mut markers = table(250).markers().to_vec();
        markers[230].genotypes[2] = "x".to_string();
        let input = GenotypeTable::with_samples(&["S1", "S2", "S3"], markers);
        let config = BatchConfig { batch_size: 100, threads: 4, strict: true };
        let err = run(&input, Scheme::ZeroOneTwo, &config).unwrap_err();
        assert!(matches!(
            err,
            Num2HapError::Translation(TranslationError::Unmapped { ref marker, ref sample, .. })
                if marker == "SNP230" && sample == "S3"
        ));
    }

    #[test]
    fn test_run_lenient_counts_unmapped() {
        let markers = vec![MarkerRecord::new("SNP1", "1", "1", "A", "T", vec!["x".to_string(), "0".to_string()])];
        let input = GenotypeTable::with_samples(&["S1", "S2"], markers);
        let (output, stats) = run(&input, Scheme::ZeroOneTwo, &BatchConfig::default()).unwrap();
        assert_eq!(output.markers()[0].genotypes, vec!["NA", "AA"]);
        assert_eq!(stats.anomalies, 1);
    }

    #[test]
    fn test_run_empty_table() {
        let input = GenotypeTable::with_samples(&["S1"], Vec::new());
        let (output, stats) = run(&input, Scheme::ZeroOneTwo, &BatchConfig::default()).unwrap();
        assert!(output.is_empty());
        assert_eq!(stats.batches, 0);
    }
}
