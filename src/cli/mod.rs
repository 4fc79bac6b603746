//! Command-line parsing for the dataset builder.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the fetch/merge code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid-data", version, about = "Regional COVID-19 dataset builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the merged daily dataset from the snapshot history and the
    /// population reference, and write it as one wide CSV.
    Fetch(FetchArgs),
    /// Fetch the RKI case/death history and write the pivoted per-date table.
    Rki(RkiArgs),
}

/// Options for building the merged dataset.
#[derive(Debug, Parser, Clone)]
pub struct FetchArgs {
    /// First day of the dataset (inclusive), as YYYY-MM-DD.
    #[arg(long, default_value = "2020-01-01")]
    pub start_date: NaiveDate,

    /// Last day of the dataset (inclusive); defaults to the current date.
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Region reference CSV (Bundesland, Einwohner columns).
    #[arg(long, default_value = "bundeslaender.csv")]
    pub reference: PathBuf,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "dataset.csv")]
    pub output: PathBuf,
}

/// Options for fetching the pivoted RKI history.
#[derive(Debug, Parser, Clone)]
pub struct RkiArgs {
    /// Restrict fetching to one region (exact label, e.g. "Hamburg").
    ///
    /// The pivoted output keeps every region column either way; regions
    /// that were not fetched stay zero.
    #[arg(long)]
    pub region: Option<String>,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "rki-history.csv")]
    pub output: PathBuf,
}
