//! FASTA parsing for per-locus sequence files and contig files
//!
//! Records are headerless: a record starts at a `>` marker line whose
//! remainder is the sample identifier, followed by zero or more content
//! lines that are concatenated in file order into one sequence string.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// One sequence record: the sample named on the marker line and its
/// concatenated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub sample: String,
    pub sequence: String,
}

/// Read and parse a FASTA file, preserving record order.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read sequence file {}", path.display()))?;
    parse_fasta(&content).with_context(|| format!("malformed sequence file {}", path.display()))
}

/// Parse FASTA text into records. Line-wrapped sequences are joined in
/// original order; blank lines are skipped.
pub fn parse_fasta(content: &str) -> Result<Vec<FastaRecord>> {
    let mut records: Vec<FastaRecord> = Vec::new();
    for line in content.lines() {
        if let Some(header) = line.strip_prefix('>') {
            let sample = header.trim();
            if sample.is_empty() {
                bail!("record marker with no sample identifier");
            }
            records.push(FastaRecord {
                sample: sample.to_string(),
                sequence: String::new(),
            });
        } else {
            let fragment = line.trim();
            if fragment.is_empty() {
                continue;
            }
            match records.last_mut() {
                Some(record) => record.sequence.push_str(fragment),
                None => bail!("sequence content before first record marker"),
            }
        }
    }
    Ok(records)
}

/// Count sequence records in a contig file. One record means a paralog
/// warning for this locus was spurious; two or more means it was real.
pub fn count_records<P: AsRef<Path>>(path: P) -> Result<usize> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read contig file {}", path.display()))?;
    Ok(content.lines().filter(|line| line.starts_with('>')).count())
}
