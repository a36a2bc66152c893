//! Output options and reporting shared by the gene and variant subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use varanno_core::{OutputFormat, OutputSpec, write_records};
use varanno_ensembl::{BatchOutcome, ItemFailure};

/// Adds the output arguments every subcommand takes.
pub fn add_output_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("output")
            .long("output")
            .short('o')
            .help("Output file path for results (default: stdout)"),
    )
    .arg(
        Arg::new("format")
            .long("format")
            .short('f')
            .value_parser(["csv", "json"])
            .default_value("csv")
            .help("Output format: csv or json (default: csv)"),
    )
    .arg(
        Arg::new("verbose")
            .long("verbose")
            .short('v')
            .action(ArgAction::SetTrue)
            .help("Enable verbose output"),
    )
    .arg(
        Arg::new("fields")
            .long("fields")
            .help("Comma-separated list of fields to include in output"),
    )
}

/// Builds the [`OutputSpec`] from the parsed output arguments.
pub fn output_spec(matches: &ArgMatches) -> Result<OutputSpec> {
    let format = matches
        .get_one::<String>("format")
        .expect("format has a default")
        .parse::<OutputFormat>()?;

    let fields = matches.get_one::<String>("fields").map(|list| {
        list.split(',')
            .map(|field| field.trim().to_string())
            .filter(|field| !field.is_empty())
            .collect::<Vec<_>>()
    });

    let destination = matches.get_one::<String>("output").map(PathBuf::from);

    Ok(OutputSpec {
        format,
        fields,
        destination,
    })
}

/// Prints one line per failed item to stderr; verbose mode includes the
/// structured error detail.
pub fn report_failures(failures: &[ItemFailure], verbose: bool) {
    for failure in failures {
        if verbose {
            eprintln!("Error processing {}: {:?}", failure.input, failure.error);
        } else {
            eprintln!("Error processing {}: {}", failure.input, failure.error);
        }
    }
}

/// Writes the batch's records per the output spec. A write failure is fatal
/// to the whole run.
pub fn write_output(outcome: &BatchOutcome, spec: &OutputSpec) -> Result<()> {
    if outcome.records.is_empty() {
        eprintln!("No results found.");
        return Ok(());
    }

    write_records(&outcome.records, spec).context("Failed to write output")?;

    if let Some(path) = &spec.destination {
        println!("Results saved to {}", path.display());
    }
    Ok(())
}

/// Exit code convention: 0 all succeeded, 2 partial success, 1 nothing
/// succeeded.
pub fn exit_code(outcome: &BatchOutcome) -> i32 {
    if outcome.all_succeeded() {
        0
    } else if outcome.records.is_empty() {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_convention() {
        let full = BatchOutcome {
            records: vec![Default::default()],
            failures: vec![],
        };
        assert_eq!(exit_code(&full), 0);

        let partial = BatchOutcome {
            records: vec![Default::default()],
            failures: vec![ItemFailure {
                index: 1,
                input: "UNKNOWNGENE".to_string(),
                error: varanno_core::AnnotError::NotFound("UNKNOWNGENE".to_string()),
            }],
        };
        assert_eq!(exit_code(&partial), 2);

        let empty = BatchOutcome {
            records: vec![],
            failures: vec![ItemFailure {
                index: 0,
                input: "UNKNOWNGENE".to_string(),
                error: varanno_core::AnnotError::NotFound("UNKNOWNGENE".to_string()),
            }],
        };
        assert_eq!(exit_code(&empty), 1);
    }
}
