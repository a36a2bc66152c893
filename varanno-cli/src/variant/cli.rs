pub use varanno_core::consts::VARIANT_CMD;

use clap::{Arg, ArgAction, Command};

use crate::common::add_output_args;

pub fn create_variant_cli() -> Command {
    add_output_args(
        Command::new(VARIANT_CMD)
            .about("Annotate variants by locus from the Ensembl REST API")
            .arg(
                Arg::new("loci")
                    .num_args(1..)
                    .required(true)
                    .help("Variant locus/loci to annotate, in format chr:position:ref:alt"),
            )
            .arg(
                Arg::new("assembly")
                    .long("assembly")
                    .value_parser(["GRCh37", "GRCh38"])
                    .default_value("GRCh38")
                    .help("Genome assembly (default: GRCh38)"),
            )
            .arg(
                Arg::new("include-populations")
                    .long("include-populations")
                    .action(ArgAction::SetTrue)
                    .help("Include all population frequencies"),
            ),
    )
}
