pub use varanno_core::consts::GENE_CMD;

use clap::{Arg, ArgAction, Command};

use crate::common::add_output_args;

pub fn create_gene_cli() -> Command {
    add_output_args(
        Command::new(GENE_CMD)
            .about("Annotate genes by symbol from the Ensembl REST API")
            .arg(
                Arg::new("symbols")
                    .num_args(1..)
                    .required(true)
                    .help("Gene symbol(s) to annotate"),
            )
            .arg(
                Arg::new("species")
                    .long("species")
                    .default_value("human")
                    .help("Species (default: human)"),
            )
            .arg(
                Arg::new("include-transcripts")
                    .long("include-transcripts")
                    .action(ArgAction::SetTrue)
                    .help("Include transcript information"),
            )
            .arg(
                Arg::new("include-phenotypes")
                    .long("include-phenotypes")
                    .action(ArgAction::SetTrue)
                    .help("Include phenotype associations"),
            ),
    )
}
