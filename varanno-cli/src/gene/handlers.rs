use anyhow::Result;
use clap::ArgMatches;

use varanno_ensembl::{EnsemblClient, GeneQuery, QuerySpec, run_batch};

use crate::common::{exit_code, output_spec, report_failures, write_output};

/// Execute the `gene` subcommand and return the process exit code.
pub fn run_gene(matches: &ArgMatches) -> Result<i32> {
    let symbols: Vec<String> = matches
        .get_many::<String>("symbols")
        .expect("At least one gene symbol is required")
        .cloned()
        .collect();
    let species = matches
        .get_one::<String>("species")
        .expect("species has a default")
        .clone();
    let include_transcripts = matches.get_flag("include-transcripts");
    let include_phenotypes = matches.get_flag("include-phenotypes");
    let verbose = matches.get_flag("verbose");
    let spec = output_spec(matches)?;

    let specs: Vec<(usize, QuerySpec)> = symbols
        .iter()
        .enumerate()
        .map(|(index, symbol)| {
            (
                index,
                QuerySpec::Gene(GeneQuery {
                    symbol: symbol.clone(),
                    species: species.clone(),
                    include_transcripts,
                    include_phenotypes,
                }),
            )
        })
        .collect();

    let client = EnsemblClient::builder().finish();
    let outcome = run_batch(&client, &specs, verbose);

    report_failures(&outcome.failures, verbose);
    write_output(&outcome, &spec)?;
    Ok(exit_code(&outcome))
}
