use anyhow::Result;
use clap::ArgMatches;

use varanno_core::Locus;
use varanno_ensembl::{Assembly, EnsemblClient, ItemFailure, QuerySpec, VariantQuery, run_batch};

use crate::common::{exit_code, output_spec, report_failures, write_output};

/// Execute the `variant` subcommand and return the process exit code.
pub fn run_variant(matches: &ArgMatches) -> Result<i32> {
    let loci: Vec<String> = matches
        .get_many::<String>("loci")
        .expect("At least one locus is required")
        .cloned()
        .collect();
    let assembly: Assembly = matches
        .get_one::<String>("assembly")
        .expect("assembly has a default")
        .parse()?;
    let include_populations = matches.get_flag("include-populations");
    let verbose = matches.get_flag("verbose");
    let spec = output_spec(matches)?;

    // Malformed loci fail here, before any network call is made.
    let mut specs: Vec<(usize, QuerySpec)> = Vec::new();
    let mut parse_failures: Vec<ItemFailure> = Vec::new();
    for (index, raw) in loci.iter().enumerate() {
        match raw.parse::<Locus>() {
            Ok(locus) => specs.push((
                index,
                QuerySpec::Variant(VariantQuery {
                    locus,
                    assembly,
                    include_populations,
                }),
            )),
            Err(error) => parse_failures.push(ItemFailure {
                index,
                input: raw.clone(),
                error,
            }),
        }
    }

    let client = EnsemblClient::for_assembly(assembly);
    let mut outcome = run_batch(&client, &specs, verbose);
    outcome.failures.extend(parse_failures);
    outcome.failures.sort_by_key(|failure| failure.index);

    report_failures(&outcome.failures, verbose);
    write_output(&outcome, &spec)?;
    Ok(exit_code(&outcome))
}
