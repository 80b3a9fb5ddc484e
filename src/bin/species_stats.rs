//! Hybpost Species Stats Tool
//!
//! Computes per-species sequence-length statistics (mean, max, min, sum,
//! median) across a chosen set of locus sequence files.

use anyhow::Result;
use clap::{Arg, Command};
use hybpost_tools::report;
use hybpost_tools::stats::{self, Query, QueryMode};
use std::path::PathBuf;

fn main() -> Result<()> {
    let matches = Command::new("hybpost-species-stats")
        .version("0.1.0")
        .about("Per-species sequence-length statistics across selected loci")
        .arg(
            Arg::new("txtfile")
                .short('t')
                .long("txtfile")
                .alias("tf")
                .value_name("FILE")
                .help("Whitespace-delimited list of target locus names, no header")
                .required(true),
        )
        .arg(
            Arg::new("directory")
                .short('d')
                .long("directory")
                .value_name("DIR")
                .help("Directory containing one {locus}.FNA sequence file per locus")
                .required(true),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("PREFIXES")
                .help("Space-separated name prefixes to filter loci by (e.g. \"CAL LFY WAXY\")"),
        )
        .arg(
            Arg::new("querytype")
                .long("querytype")
                .alias("qt")
                .value_name("TYPE")
                .help("'enrichment' keeps loci matching the query, 'depletion' keeps the rest"),
        )
        .get_matches();

    // Parse arguments
    let txtfile = PathBuf::from(matches.get_one::<String>("txtfile").unwrap());
    let directory = PathBuf::from(matches.get_one::<String>("directory").unwrap());
    let query = match (
        matches.get_one::<String>("query"),
        matches.get_one::<String>("querytype"),
    ) {
        (Some(query), Some(querytype)) => Some(Query::new(query, QueryMode::from_arg(querytype)?)?),
        (None, None) => None,
        (Some(_), None) => anyhow::bail!("--querytype is required when --query is given"),
        (None, Some(_)) => anyhow::bail!("--query is required when --querytype is given"),
    };

    println!("🧬 Hybpost Species Stats Tool");
    println!("Locus list: {}", txtfile.display());
    println!("Directory: {}", directory.display());
    if let Some(query) = &query {
        println!(
            "Query ({}): {}",
            query.mode.as_str(),
            query.prefixes.join(" ")
        );
    }

    if !directory.exists() || !directory.is_dir() {
        anyhow::bail!("Directory does not exist: {}", directory.display());
    }

    let listed = stats::read_locus_list(&txtfile)?;
    let discovered = stats::discover_loci(&directory, &listed);
    for locus in &discovered.missing {
        eprintln!(
            "⚠️ listed locus '{locus}' has no .FNA file in {}, skipping",
            directory.display()
        );
    }
    if discovered.present.is_empty() {
        anyhow::bail!(
            "none of the {} listed loci have a sequence file in {}",
            listed.len(),
            directory.display()
        );
    }

    let retained = stats::apply_query(discovered.present, query.as_ref());
    if retained.is_empty() {
        anyhow::bail!("no loci remain after applying the query filter");
    }
    println!("📊 Computing statistics across {} loci...", retained.len());

    let tables = stats::load_locus_tables(&directory, &retained)?;
    let joined = stats::join_loci(&tables)?;
    let rows: Vec<_> = joined.iter().map(stats::summarize).collect();

    let destination = stats::output_path(&directory, query.as_ref());
    report::write_stats_table(&destination, &rows)?;

    println!("✅ Calculations complete!");
    println!("📈 Species in every locus: {}", rows.len());
    println!("💾 Data written to {}", destination.display());
    Ok(())
}
