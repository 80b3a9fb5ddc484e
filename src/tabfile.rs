//! Length-matrix (tabfile) parsing
//!
//! The tabfile is whitespace-delimited: a header row naming the sample
//! column and every locus, then one row per sample with the assembled
//! sequence length for each locus. Length 0 means assembly failed for
//! that sample and locus.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Per-sample, per-locus sequence lengths, loaded once per run.
#[derive(Debug, Clone)]
pub struct LengthMatrix {
    pub sample_column: String,
    pub loci: Vec<String>,
    pub samples: Vec<String>,
    lengths: Vec<Vec<u64>>,
}

impl LengthMatrix {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read tabfile {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("malformed tabfile {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());
        let header = match lines.next() {
            Some(header) => header,
            None => bail!("tabfile is empty"),
        };
        let mut columns = header.split_whitespace().map(str::to_string);
        let sample_column = columns.next().expect("non-blank line has a first field");
        let loci: Vec<String> = columns.collect();
        if loci.is_empty() {
            bail!("tabfile header names no loci");
        }

        let mut samples = Vec::new();
        let mut lengths = Vec::new();
        for (index, line) in lines.enumerate() {
            let row_number = index + 2;
            let mut fields = line.split_whitespace();
            let sample = fields.next().expect("non-blank line has a first field");
            let row = fields
                .map(|field| {
                    field.parse::<u64>().with_context(|| {
                        format!("row {row_number} ({sample}): invalid length value '{field}'")
                    })
                })
                .collect::<Result<Vec<u64>>>()?;
            if row.len() != loci.len() {
                bail!(
                    "row {row_number} ({sample}): expected {} length values, found {}",
                    loci.len(),
                    row.len()
                );
            }
            samples.push(sample.to_string());
            lengths.push(row);
        }
        Ok(LengthMatrix {
            sample_column,
            loci,
            samples,
            lengths,
        })
    }

    /// Number of samples missing each locus (length exactly 0), in locus
    /// column order.
    pub fn zero_counts(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.loci.len()];
        for row in &self.lengths {
            for (count, &length) in counts.iter_mut().zip(row) {
                if length == 0 {
                    *count += 1;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABFILE: &str = "Species L1 L2 L3\n\
                           sampleA 120 0 300\n\
                           sampleB 110 0 290\n\
                           sampleC 0 250 310\n";

    #[test]
    fn test_parse_header_and_rows() {
        let matrix = LengthMatrix::parse(TABFILE).unwrap();
        assert_eq!(matrix.sample_column, "Species");
        assert_eq!(matrix.loci, vec!["L1", "L2", "L3"]);
        assert_eq!(matrix.samples, vec!["sampleA", "sampleB", "sampleC"]);
    }

    #[test]
    fn test_zero_counts() {
        let matrix = LengthMatrix::parse(TABFILE).unwrap();
        assert_eq!(matrix.zero_counts(), vec![1, 2, 0]);
    }

    #[test]
    fn test_rejects_short_row() {
        let err = LengthMatrix::parse("Species L1 L2\nsampleA 120\n").unwrap_err();
        assert!(format!("{err:#}").contains("sampleA"));
    }

    #[test]
    fn test_rejects_non_integer_cell() {
        let err = LengthMatrix::parse("Species L1\nsampleA abc\n").unwrap_err();
        assert!(format!("{err:#}").contains("abc"));
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(LengthMatrix::parse("").is_err());
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = LengthMatrix::from_path("no/such/tabfile.txt").unwrap_err();
        assert!(format!("{err:#}").contains("no/such/tabfile.txt"));
    }
}
