//! Per-species sequence-length statistics across a chosen locus set
//!
//! Each retained locus contributes one sequence per sample; samples are
//! inner-joined across loci so every output row summarizes a complete
//! set of per-locus lengths.

use crate::fasta::{self, FastaRecord};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const FASTA_EXTENSION: &str = "FNA";

/// How a query restricts the locus set by name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Keep loci whose name starts with at least one query prefix.
    Enrichment,
    /// Keep loci whose name starts with none of the query prefixes.
    Depletion,
}

impl QueryMode {
    pub fn from_arg(arg: &str) -> Result<Self> {
        match arg {
            "enrichment" => Ok(QueryMode::Enrichment),
            "depletion" => Ok(QueryMode::Depletion),
            other => bail!("unknown querytype '{other}', expected 'enrichment' or 'depletion'"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryMode::Enrichment => "enrichment",
            QueryMode::Depletion => "depletion",
        }
    }
}

/// A name-prefix filter: one or more prefixes plus the filter direction.
#[derive(Debug, Clone)]
pub struct Query {
    pub prefixes: Vec<String>,
    pub mode: QueryMode,
}

impl Query {
    pub fn new(query: &str, mode: QueryMode) -> Result<Self> {
        let prefixes: Vec<String> = query.split_whitespace().map(str::to_string).collect();
        if prefixes.is_empty() {
            bail!("query is empty");
        }
        Ok(Query { prefixes, mode })
    }

    pub fn matches(&self, locus: &str) -> bool {
        let hit = self
            .prefixes
            .iter()
            .any(|prefix| locus.starts_with(prefix.as_str()));
        match self.mode {
            QueryMode::Enrichment => hit,
            QueryMode::Depletion => !hit,
        }
    }
}

/// Read the target-locus list: whitespace-delimited names, no header.
pub fn read_locus_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read locus list {}", path.display()))?;
    let loci: Vec<String> = content.split_whitespace().map(str::to_string).collect();
    if loci.is_empty() {
        bail!("locus list {} names no loci", path.display());
    }
    Ok(loci)
}

/// Listed loci split by whether `{locus}.FNA` exists in the directory.
#[derive(Debug, Clone)]
pub struct DiscoveredLoci {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

pub fn locus_file_path(directory: &Path, locus: &str) -> PathBuf {
    directory.join(format!("{locus}.{FASTA_EXTENSION}"))
}

pub fn discover_loci(directory: &Path, loci: &[String]) -> DiscoveredLoci {
    let mut present = Vec::new();
    let mut missing = Vec::new();
    for locus in loci {
        if locus_file_path(directory, locus).is_file() {
            present.push(locus.clone());
        } else {
            missing.push(locus.clone());
        }
    }
    DiscoveredLoci { present, missing }
}

pub fn apply_query(loci: Vec<String>, query: Option<&Query>) -> Vec<String> {
    match query {
        Some(query) => loci.into_iter().filter(|l| query.matches(l)).collect(),
        None => loci,
    }
}

/// One locus's parsed sequence file.
#[derive(Debug, Clone)]
pub struct LocusTable {
    pub locus: String,
    pub records: Vec<FastaRecord>,
}

pub fn load_locus_tables(directory: &Path, loci: &[String]) -> Result<Vec<LocusTable>> {
    loci.iter()
        .map(|locus| {
            let records = fasta::read_fasta(locus_file_path(directory, locus))?;
            Ok(LocusTable {
                locus: locus.clone(),
                records,
            })
        })
        .collect()
}

/// A sample present in every selected locus, with its per-locus lengths.
#[derive(Debug, Clone)]
pub struct JoinedSample {
    pub species: String,
    pub lengths: Vec<usize>,
}

/// Inner join on sample identifier: a sample survives only if present in
/// every locus table. Output order follows the first table's records.
pub fn join_loci(tables: &[LocusTable]) -> Result<Vec<JoinedSample>> {
    let (first, rest) = match tables.split_first() {
        Some(parts) => parts,
        None => bail!("no loci left to join"),
    };
    let rest_maps: Vec<HashMap<&str, usize>> = rest
        .iter()
        .map(|table| {
            table
                .records
                .iter()
                .map(|record| (record.sample.as_str(), record.sequence.len()))
                .collect()
        })
        .collect();

    let mut joined = Vec::new();
    for record in &first.records {
        let mut lengths = vec![record.sequence.len()];
        let mut complete = true;
        for map in &rest_maps {
            match map.get(record.sample.as_str()) {
                Some(&length) => lengths.push(length),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            joined.push(JoinedSample {
                species: record.sample.clone(),
                lengths,
            });
        }
    }
    if joined.is_empty() {
        bail!("no sample is present in every selected locus; the statistics table would be empty");
    }
    Ok(joined)
}

/// One output row of the statistics table.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesStatsRow {
    pub species: String,
    pub mean: f64,
    pub max: u64,
    pub min: u64,
    pub sum: u64,
    pub median: f64,
}

/// Summarize one joined sample's per-locus lengths. `lengths` is
/// non-empty by construction of the join.
pub fn summarize(sample: &JoinedSample) -> SpeciesStatsRow {
    let lengths = &sample.lengths;
    let sum: u64 = lengths.iter().map(|&l| l as u64).sum();
    let max = lengths.iter().copied().max().unwrap_or(0) as u64;
    let min = lengths.iter().copied().min().unwrap_or(0) as u64;
    let mean = sum as f64 / lengths.len() as f64;

    let mut sorted = lengths.clone();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    };

    SpeciesStatsRow {
        species: sample.species.clone(),
        mean,
        max,
        min,
        sum,
        median,
    }
}

/// Output path embedding the query and query type, with literal
/// `noquery` / `notype` slots when no filter was applied.
pub fn output_path(directory: &Path, query: Option<&Query>) -> PathBuf {
    let (query_slot, type_slot) = match query {
        Some(query) => (query.prefixes.join(" "), query.mode.as_str().to_string()),
        None => ("noquery".to_string(), "notype".to_string()),
    };
    directory.join(format!("speciesstats_{query_slot}_{type_slot}.csv"))
}
