//! Hybpost Tools
//!
//! Post-processing tools for target-capture assembly output (HybPiper-style
//! directory layouts).
//!
//! This library provides shared functionality for:
//! - Filtering candidate loci by missing data and corrected paralog warnings
//! - Per-species sequence-length statistics across a chosen locus set

pub mod fasta;
pub mod filter;
pub mod report;
pub mod stats;
pub mod tabfile;
