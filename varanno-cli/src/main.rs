mod common;
mod gene;
mod variant;

use anyhow::Result;
use clap::Command;
use clap::error::ErrorKind;

use varanno_core::consts::{GENE_CMD, VARIANT_CMD};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "varanno";
    pub const BIN_NAME: &str = "varanno";
}

const EXIT_CODE_HELP: &str = "Exit codes:
  0  all items succeeded
  2  some items failed, others succeeded
  1  fatal error, or no item succeeded";

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Retrieves gene and genetic-variant annotations from the Ensembl REST API and writes them as CSV or JSON.")
        .after_help(EXIT_CODE_HELP)
        .subcommand_required(true)
        .subcommand(gene::cli::create_gene_cli())
        .subcommand(variant::cli::create_variant_cli())
}

/// Exit code for a parse error: help and version displays are not failures;
/// everything else (bad usage) is fatal, so it never collides with the
/// partial-success code 2.
fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = match app.try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            let code = usage_exit_code(&err);
            err.print()?;
            std::process::exit(code);
        }
    };

    let code = match matches.subcommand() {
        //
        // GENE ANNOTATION
        //
        Some((GENE_CMD, matches)) => gene::handlers::run_gene(matches)?,

        //
        // VARIANT ANNOTATION
        //
        Some((VARIANT_CMD, matches)) => variant::handlers::run_variant(matches)?,

        _ => unreachable!("Subcommand not found"),
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
