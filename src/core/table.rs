//! Marker records and the genotype table
//!
//! One row per marker, one column per sample. The first five columns carry
//! marker metadata; every column after them is a sample, identified by
//! position.

/// Required leading columns, in order
pub const REQUIRED_COLUMNS: [&str; 5] = ["SNP", "CHR", "POS", "REF", "ALT"];

/// Number of leading metadata columns
pub const METADATA_COLUMNS: usize = REQUIRED_COLUMNS.len();

/// A single marker row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRecord {
    pub id: String,
    pub chrom: String,
    pub pos: String,
    pub ref_allele: String,
    pub alt_allele: String,
    /// One cell per sample, in table column order
    pub genotypes: Vec<String>,
}

impl MarkerRecord {
    pub fn new(
        id: impl Into<String>,
        chrom: impl Into<String>,
        pos: impl Into<String>,
        ref_allele: impl Into<String>,
        alt_allele: impl Into<String>,
        genotypes: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            chrom: chrom.into(),
            pos: pos.into(),
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
            genotypes,
        }
    }

    /// Copy of the metadata with a new set of genotype cells
    pub fn with_genotypes(&self, genotypes: Vec<String>) -> Self {
        Self {
            id: self.id.clone(),
            chrom: self.chrom.clone(),
            pos: self.pos.clone(),
            ref_allele: self.ref_allele.clone(),
            alt_allele: self.alt_allele.clone(),
            genotypes,
        }
    }

    /// Metadata fields in column order
    pub fn metadata(&self) -> [&str; METADATA_COLUMNS] {
        [
            self.id.as_str(),
            self.chrom.as_str(),
            self.pos.as_str(),
            self.ref_allele.as_str(),
            self.alt_allele.as_str(),
        ]
    }
}

/// Ordered markers sharing one sample-column ordering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenotypeTable {
    columns: Vec<String>,
    markers: Vec<MarkerRecord>,
}

impl GenotypeTable {
    pub fn new(columns: Vec<String>, markers: Vec<MarkerRecord>) -> Self {
        Self { columns, markers }
    }

    /// Build a table with the standard metadata header and the given samples
    pub fn with_samples<S: AsRef<str>>(samples: &[S], markers: Vec<MarkerRecord>) -> Self {
        let columns = REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(samples.iter().map(|s| s.as_ref().to_string()))
            .collect();
        Self::new(columns, markers)
    }

    /// Full header, metadata columns included
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Sample column names (sixth column onward)
    pub fn sample_names(&self) -> &[String] {
        self.columns.get(METADATA_COLUMNS..).unwrap_or(&[])
    }

    pub fn sample_count(&self) -> usize {
        self.sample_names().len()
    }

    pub fn markers(&self) -> &[MarkerRecord] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sample_names() {
        let table = GenotypeTable::with_samples(&["S1", "S2"], Vec::new());
        assert_eq!(table.columns().len(), 7);
        assert_eq!(table.sample_names(), &["S1".to_string(), "S2".to_string()]);
        assert_eq!(table.sample_count(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_sample_names_short_header() {
        let table = GenotypeTable::new(cells(&["SNP", "CHR"]), Vec::new());
        assert!(table.sample_names().is_empty());
    }

    #[test]
    fn test_with_genotypes_keeps_metadata() {
        let marker = MarkerRecord::new("SNP1", "1", "100", "A", "T", cells(&["0", "1"]));
        let translated = marker.with_genotypes(cells(&["AA", "AT"]));
        assert_eq!(translated.metadata(), marker.metadata());
        assert_eq!(translated.genotypes, cells(&["AA", "AT"]));
    }
}
