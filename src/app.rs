//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - runs the requested pipeline
//! - writes the CSV outputs
//! - prints summaries

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FetchArgs, RkiArgs};
use crate::domain::{FetchConfig, Region, RkiConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `covid-data` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // We want `covid-data` and `covid-data --start-date ...` to behave like
    // `covid-data fetch ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the one-command UX of the dataset builder.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Rki(args) => handle_rki(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = fetch_config_from_args(&args);
    let run = pipeline::run_fetch(&config)?;

    crate::io::export::write_dataset_csv(&config.output_path, &run.dataset)?;
    println!(
        "{}",
        crate::report::format_fetch_summary(&run.dataset, &run.reference, &config.output_path)
    );
    Ok(())
}

fn handle_rki(args: RkiArgs) -> Result<(), AppError> {
    let config = rki_config_from_args(&args)?;
    let run = pipeline::run_rki(&config)?;

    crate::io::export::write_pivoted_csv(&config.output_path, &run.table)?;
    println!(
        "{}",
        crate::report::format_rki_summary(
            &run.table,
            run.infection_rows,
            run.death_rows,
            &config.output_path
        )
    );
    Ok(())
}

pub fn fetch_config_from_args(args: &FetchArgs) -> FetchConfig {
    FetchConfig {
        start_date: args.start_date,
        end_date: args.end_date,
        reference_path: args.reference.clone(),
        output_path: args.output.clone(),
    }
}

pub fn rki_config_from_args(args: &RkiArgs) -> Result<RkiConfig, AppError> {
    let region = args.region.as_deref().map(resolve_region).transpose()?;
    Ok(RkiConfig {
        region,
        output_path: args.output.clone(),
    })
}

/// Resolve a `--region` value against the exact source spellings.
fn resolve_region(label: &str) -> Result<Region, AppError> {
    Region::from_label(label).ok_or_else(|| {
        let known: Vec<&str> = Region::ALL.iter().map(|r| r.label()).collect();
        AppError::new(
            2,
            format!("Unknown region `{label}`. Expected one of: {}.", known.join(", ")),
        )
    })
}

/// Rewrite argv so `covid-data` defaults to `covid-data fetch`.
///
/// Rules:
/// - `covid-data`                     -> `covid-data fetch`
/// - `covid-data --start-date ...`    -> `covid-data fetch --start-date ...`
/// - `covid-data --help/--version`    -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fetch".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fetch" | "rki");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fetch flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fetch".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocations_default_to_fetch() {
        assert_eq!(args(&["covid-data", "fetch"]), rewrite_args(args(&["covid-data"])));
        assert_eq!(
            args(&["covid-data", "fetch", "--start-date", "2020-03-01"]),
            rewrite_args(args(&["covid-data", "--start-date", "2020-03-01"]))
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        for list in [
            &["covid-data", "rki"][..],
            &["covid-data", "fetch", "-o", "x.csv"][..],
            &["covid-data", "--help"][..],
            &["covid-data", "-V"][..],
        ] {
            assert_eq!(args(list), rewrite_args(args(list)));
        }
    }

    #[test]
    fn fetch_defaults_parse() {
        let cli = crate::cli::Cli::parse_from(["covid-data", "fetch"]);
        let Command::Fetch(fetch) = cli.command else {
            panic!("expected the fetch subcommand");
        };
        let config = fetch_config_from_args(&fetch);
        assert_eq!(
            config.start_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(config.end_date, None);
        assert_eq!(config.reference_path, PathBuf::from("bundeslaender.csv"));
        assert_eq!(config.output_path, PathBuf::from("dataset.csv"));
    }

    #[test]
    fn region_arguments_resolve_exactly() {
        let cli = crate::cli::Cli::parse_from(["covid-data", "rki", "--region", "Hamburg"]);
        let Command::Rki(rki) = cli.command else {
            panic!("expected the rki subcommand");
        };
        let config = rki_config_from_args(&rki).unwrap();
        assert_eq!(config.region, Some(Region::Hamburg));
        assert_eq!(config.output_path, PathBuf::from("rki-history.csv"));
    }

    #[test]
    fn unknown_regions_list_the_valid_labels() {
        let err = resolve_region("hamburg").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Hamburg"));
        assert!(err.to_string().contains("Baden-Württemberg"));
    }
}
