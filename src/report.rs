//! CSV output writing
//!
//! Every output is written once at the end of its stage; existing files
//! are overwritten.

use crate::filter::FilterThresholds;
use crate::stats::SpeciesStatsRow;
use anyhow::{Context, Result};
use csv::Writer;
use std::path::{Path, PathBuf};

/// Build `{name}_{missing_data}_{paralog_cutoff}.csv` under `directory`.
pub fn suffixed_path(directory: &Path, name: &str, thresholds: FilterThresholds) -> PathBuf {
    directory.join(format!(
        "{name}_{}_{}.csv",
        thresholds.missing_data, thresholds.paralog_cutoff
    ))
}

/// Write a single-column locus list with a header row.
pub fn write_locus_list(path: &Path, loci: &[String]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["locus"])?;
    for locus in loci {
        writer.write_record([locus.as_str()])?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write the species statistics table; the header row comes from the
/// row struct's field names.
pub fn write_stats_table(path: &Path, rows: &[SpeciesStatsRow]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
