//! Hybpost Sequence Filter Tool
//!
//! Filters candidate loci from a target-capture assembly run by missing-data
//! counts and by paralog warnings corrected against actual contig counts.

use anyhow::Result;
use clap::{Arg, Command};
use hybpost_tools::filter::{self, FilterMode, FilterThresholds};
use hybpost_tools::report;
use hybpost_tools::tabfile::LengthMatrix;
use std::collections::HashSet;
use std::path::PathBuf;

fn main() -> Result<()> {
    let matches = Command::new("hybpost-sequence-filter")
        .version("0.1.0")
        .about("Filter candidate loci by missing data and corrected paralog warnings")
        .arg(
            Arg::new("directory")
                .long("directory")
                .value_name("DIR")
                .help("Directory with one assembly output folder per sample")
                .required(true),
        )
        .arg(
            Arg::new("tabfile")
                .long("tabfile")
                .value_name("FILE")
                .help("Whitespace-delimited matrix of per-sample locus lengths")
                .required(true),
        )
        .arg(
            Arg::new("function")
                .long("function")
                .value_name("MODE")
                .help("Which filter to run: 'zeroes', 'paralogs', or 'both'")
                .default_value("both"),
        )
        .arg(
            Arg::new("missingdata")
                .long("missingdata")
                .value_name("N")
                .help("How many samples may lack a locus before it is dropped")
                .default_value("0"),
        )
        .arg(
            Arg::new("paralog_cutoff")
                .long("paralog_cutoff")
                .value_name("N")
                .help("How many samples may hold a locus as a true paralog before it is dropped")
                .default_value("1"),
        )
        .get_matches();

    // Parse arguments
    let directory = PathBuf::from(matches.get_one::<String>("directory").unwrap());
    let tabfile = PathBuf::from(matches.get_one::<String>("tabfile").unwrap());
    let mode = FilterMode::from_arg(matches.get_one::<String>("function").unwrap())?;
    let missing_data: u64 = matches.get_one::<String>("missingdata").unwrap().parse()?;
    let paralog_cutoff: u64 = matches
        .get_one::<String>("paralog_cutoff")
        .unwrap()
        .parse()?;
    let thresholds = FilterThresholds {
        missing_data,
        paralog_cutoff,
    };

    println!("🧬 Hybpost Sequence Filter Tool");
    println!("Directory: {}", directory.display());
    println!("Tabfile: {}", tabfile.display());
    println!(
        "Missing data threshold: {}, Paralog cutoff: {}",
        thresholds.missing_data, thresholds.paralog_cutoff
    );

    if !directory.exists() || !directory.is_dir() {
        anyhow::bail!("Directory does not exist: {}", directory.display());
    }

    let matrix = LengthMatrix::from_path(&tabfile)?;
    let partition = filter::partition_by_missing_data(&matrix, thresholds.missing_data);

    if mode.runs_zeroes() {
        report::write_locus_list(
            &report::suffixed_path(&directory, "Genes_NoMissingData", thresholds),
            &partition.complete,
        )?;
        report::write_locus_list(
            &report::suffixed_path(&directory, "Genes_MissingData", thresholds),
            &partition.incomplete,
        )?;
        println!("Loci without missing data: {}", partition.complete.len());
        println!("Loci with missing data: {}", partition.incomplete.len());
    }

    if mode.runs_paralogs() {
        let universe: HashSet<&str> = matrix.loci.iter().map(String::as_str).collect();

        println!("📊 Correcting paralog warnings for {} samples...", matrix.samples.len());
        let mut per_sample = Vec::new();
        for sample in &matrix.samples {
            let result = filter::reclassify_sample(&directory, sample, &universe)?;
            for locus in &result.unknown {
                eprintln!(
                    "⚠️ {sample}: warned locus '{locus}' is not in the tabfile, skipping"
                );
            }
            let sample_dir = directory.join(sample);
            report::write_locus_list(
                &report::suffixed_path(&sample_dir, "Paralogs_Corrected", thresholds),
                &result.true_paralogs,
            )?;
            report::write_locus_list(
                &report::suffixed_path(&sample_dir, "False_Paralogs", thresholds),
                &result.false_paralogs,
            )?;
            per_sample.push(result);
        }

        let corrected = filter::corrected_paralogs(&per_sample, thresholds.paralog_cutoff);
        report::write_locus_list(
            &report::suffixed_path(&directory, "Total_Paralogs_Corrected", thresholds),
            &corrected,
        )?;

        if mode == FilterMode::Both {
            let final_candidates = filter::subtract(&partition.complete, &corrected);
            report::write_locus_list(
                &report::suffixed_path(&directory, "Genes_NoMissingData_NoParalogs", thresholds),
                &final_candidates,
            )?;
            println!("Final candidate loci: {}", final_candidates.len());
        }

        let no_paralogs = filter::subtract(&matrix.loci, &corrected);
        report::write_locus_list(
            &report::suffixed_path(&directory, "Genes_NoParalogs", thresholds),
            &no_paralogs,
        )?;
        println!("Loci without paralogs: {}", no_paralogs.len());
    }

    println!("✅ Filtering complete!");
    Ok(())
}
