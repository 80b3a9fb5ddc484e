//! Locus filtering: missing-data partition and paralog reclassification
//!
//! Upstream assembly emits a per-sample list of loci suspected of being
//! paralogous. A warning is only real if the locus assembled into more
//! than one contig for that sample, so each warned locus is checked
//! against its contig file and reclassified as a true or false paralog.

use crate::fasta;
use crate::tabfile::LengthMatrix;
use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const WARNING_LIST_FILENAME: &str = "genes_with_paralog_warnings.txt";

/// Thresholds for both filters; also embedded in every output filename.
#[derive(Debug, Clone, Copy)]
pub struct FilterThresholds {
    pub missing_data: u64,
    pub paralog_cutoff: u64,
}

/// Which of the two filters a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Zeroes,
    Paralogs,
    Both,
}

impl FilterMode {
    pub fn from_arg(arg: &str) -> Result<Self> {
        match arg {
            "zeroes" => Ok(FilterMode::Zeroes),
            "paralogs" => Ok(FilterMode::Paralogs),
            "both" => Ok(FilterMode::Both),
            other => bail!("unknown function '{other}', expected 'zeroes', 'paralogs', or 'both'"),
        }
    }

    pub fn runs_zeroes(self) -> bool {
        matches!(self, FilterMode::Zeroes | FilterMode::Both)
    }

    pub fn runs_paralogs(self) -> bool {
        matches!(self, FilterMode::Paralogs | FilterMode::Both)
    }
}

/// Loci split by whether their missing-data count stayed within the
/// threshold. The two lists partition the locus universe.
#[derive(Debug, Clone)]
pub struct MissingDataPartition {
    pub complete: Vec<String>,
    pub incomplete: Vec<String>,
}

pub fn partition_by_missing_data(matrix: &LengthMatrix, threshold: u64) -> MissingDataPartition {
    let mut complete = Vec::new();
    let mut incomplete = Vec::new();
    for (locus, zeroes) in matrix.loci.iter().zip(matrix.zero_counts()) {
        if zeroes <= threshold {
            complete.push(locus.clone());
        } else {
            incomplete.push(locus.clone());
        }
    }
    MissingDataPartition {
        complete,
        incomplete,
    }
}

/// Outcome of reclassifying one sample's paralog warnings. The true and
/// false lists are subsets of the raw warning list, in warning order;
/// `unknown` holds warned loci absent from the tabfile universe.
#[derive(Debug, Clone)]
pub struct SampleParalogs {
    pub sample: String,
    pub true_paralogs: Vec<String>,
    pub false_paralogs: Vec<String>,
    pub unknown: Vec<String>,
}

pub fn warning_list_path(directory: &Path, sample: &str) -> PathBuf {
    directory.join(sample).join(WARNING_LIST_FILENAME)
}

pub fn contig_path(directory: &Path, sample: &str, locus: &str) -> PathBuf {
    directory
        .join(sample)
        .join(locus)
        .join(format!("{locus}_contigs.fasta"))
}

/// Reclassify one sample's paralog warnings by counting contigs: one
/// contig record means the warning was spurious.
pub fn reclassify_sample(
    directory: &Path,
    sample: &str,
    universe: &HashSet<&str>,
) -> Result<SampleParalogs> {
    let warning_path = warning_list_path(directory, sample);
    let content = fs::read_to_string(&warning_path).with_context(|| {
        format!(
            "failed to read paralog warning list for sample {sample}: {}",
            warning_path.display()
        )
    })?;

    let mut true_paralogs = Vec::new();
    let mut false_paralogs = Vec::new();
    let mut unknown = Vec::new();
    for locus in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !universe.contains(locus) {
            unknown.push(locus.to_string());
            continue;
        }
        let contig_file = contig_path(directory, sample, locus);
        let contigs = fasta::count_records(&contig_file)
            .with_context(|| format!("sample {sample}, locus {locus}"))?;
        if contigs == 1 {
            false_paralogs.push(locus.to_string());
        } else {
            true_paralogs.push(locus.to_string());
        }
    }
    Ok(SampleParalogs {
        sample: sample.to_string(),
        true_paralogs,
        false_paralogs,
        unknown,
    })
}

/// Aggregate true paralogs across samples and keep the low-incidence
/// ones: a locus is dropped only when it is a true paralog in more
/// samples than the cutoff. First-seen order is preserved.
pub fn corrected_paralogs(per_sample: &[SampleParalogs], cutoff: u64) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for sample in per_sample {
        for locus in &sample.true_paralogs {
            if !counts.contains_key(locus.as_str()) {
                order.push(locus);
            }
            *counts.entry(locus).or_insert(0) += 1;
        }
    }
    order
        .into_iter()
        .filter(|locus| counts[locus] <= cutoff)
        .map(str::to_string)
        .collect()
}

/// Set difference preserving the order of `base`.
pub fn subtract(base: &[String], remove: &[String]) -> Vec<String> {
    let remove: HashSet<&str> = remove.iter().map(String::as_str).collect();
    base.iter()
        .filter(|locus| !remove.contains(locus.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_paralogs(sample: &str, true_paralogs: &[&str]) -> SampleParalogs {
        SampleParalogs {
            sample: sample.to_string(),
            true_paralogs: true_paralogs.iter().map(|s| s.to_string()).collect(),
            false_paralogs: Vec::new(),
            unknown: Vec::new(),
        }
    }

    fn write_file(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = fs::File::create(path).unwrap();
        write!(file, "{content}").unwrap();
    }

    #[test]
    fn test_partition_covers_universe() {
        let matrix = LengthMatrix::parse(
            "Species L1 L2\nsampleA 120 0\nsampleB 110 0\nsampleC 0 250\n",
        )
        .unwrap();
        let partition = partition_by_missing_data(&matrix, 1);
        assert_eq!(partition.complete, vec!["L1"]);
        assert_eq!(partition.incomplete, vec!["L2"]);

        let mut combined = partition.complete.clone();
        combined.extend(partition.incomplete.clone());
        combined.sort();
        let mut universe = matrix.loci.clone();
        universe.sort();
        assert_eq!(combined, universe);
    }

    #[test]
    fn test_partition_threshold_zero() {
        let matrix =
            LengthMatrix::parse("Species L1 L2\nsampleA 120 0\nsampleB 110 200\n").unwrap();
        let partition = partition_by_missing_data(&matrix, 0);
        assert_eq!(partition.complete, vec!["L1"]);
        assert_eq!(partition.incomplete, vec!["L2"]);
    }

    #[test]
    fn test_reclassify_by_contig_count() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(&warning_list_path(root, "S1"), "L1\nL2\n");
        write_file(&contig_path(root, "S1", "L1"), ">c1\nAAA\n");
        write_file(&contig_path(root, "S1", "L2"), ">c1\nAAA\n>c2\nCCC\n>c3\nGGG\n");

        let universe: HashSet<&str> = ["L1", "L2"].into_iter().collect();
        let result = reclassify_sample(root, "S1", &universe).unwrap();
        assert_eq!(result.true_paralogs, vec!["L2"]);
        assert_eq!(result.false_paralogs, vec!["L1"]);
        assert!(result.unknown.is_empty());
    }

    #[test]
    fn test_reclassify_skips_loci_outside_universe() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(&warning_list_path(root, "S1"), "L1\nL99\n");
        write_file(&contig_path(root, "S1", "L1"), ">c1\nAAA\n>c2\nCCC\n");

        let universe: HashSet<&str> = ["L1", "L2"].into_iter().collect();
        let result = reclassify_sample(root, "S1", &universe).unwrap();
        assert_eq!(result.true_paralogs, vec!["L1"]);
        assert!(result.false_paralogs.is_empty());
        assert_eq!(result.unknown, vec!["L99"]);
    }

    #[test]
    fn test_reclassify_missing_warning_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let universe = HashSet::new();
        let err = reclassify_sample(dir.path(), "S1", &universe).unwrap_err();
        assert!(format!("{err:#}").contains("S1"));
    }

    #[test]
    fn test_reclassify_missing_contig_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(&warning_list_path(root, "S1"), "L1\n");
        let universe: HashSet<&str> = ["L1"].into_iter().collect();
        let err = reclassify_sample(root, "S1", &universe).unwrap_err();
        assert!(format!("{err:#}").contains("L1"));
    }

    #[test]
    fn test_corrected_paralogs_cutoff_direction() {
        // L1 is a true paralog in 2 samples, L2 in 1; cutoff 1 keeps only
        // the low-incidence locus.
        let per_sample = vec![
            sample_paralogs("S1", &["L1", "L2"]),
            sample_paralogs("S2", &["L1"]),
        ];
        assert_eq!(corrected_paralogs(&per_sample, 1), vec!["L2"]);
        assert_eq!(corrected_paralogs(&per_sample, 2), vec!["L1", "L2"]);
        assert!(corrected_paralogs(&per_sample, 0).is_empty());
    }

    #[test]
    fn test_subtract() {
        let base: Vec<String> = ["L1", "L2", "L3"].iter().map(|s| s.to_string()).collect();
        let remove: Vec<String> = ["L2", "L4"].iter().map(|s| s.to_string()).collect();
        assert_eq!(subtract(&base, &remove), vec!["L1", "L3"]);
    }

    #[test]
    fn test_mode_parsing() {
        assert!(FilterMode::from_arg("both").unwrap().runs_zeroes());
        assert!(FilterMode::from_arg("both").unwrap().runs_paralogs());
        assert!(!FilterMode::from_arg("zeroes").unwrap().runs_paralogs());
        assert!(!FilterMode::from_arg("paralogs").unwrap().runs_zeroes());
        assert!(FilterMode::from_arg("neither").is_err());
    }
}
