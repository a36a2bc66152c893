//! Sequential batch driver.
//!
//! Items move Pending -> Fetching -> Succeeded | Failed, with no transition
//! back. A failed item is recorded and the run continues; the final records
//! hold only successes, in input order.

use indicatif::{ProgressBar, ProgressStyle};

use varanno_core::{AnnotError, FlatRecord};

use super::client::EnsemblClient;
use super::query::QuerySpec;

/// Seam between the batch driver and the annotation source, so batch
/// semantics are testable without a network.
pub trait Annotate {
    fn annotate(&self, spec: &QuerySpec) -> Result<FlatRecord, AnnotError>;
}

impl Annotate for EnsemblClient {
    fn annotate(&self, spec: &QuerySpec) -> Result<FlatRecord, AnnotError> {
        match spec {
            QuerySpec::Gene(query) => self.annotate_gene(query).map(|r| r.flatten()),
            QuerySpec::Variant(query) => self.annotate_variant(query).map(|r| r.flatten()),
        }
    }
}

/// One failed batch item.
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the item in the original input.
    pub index: usize,
    /// The user-supplied input (symbol or locus).
    pub input: String,
    pub error: AnnotError,
}

/// Results of a batch run: succeeded records in input order, plus the
/// failures encountered along the way.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<FlatRecord>,
    pub failures: Vec<ItemFailure>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

///
/// Annotate each spec in order, one outstanding request at a time,
/// continuing past per-item failures.
///
/// The progress bar is hidden unless `show_progress` is set.
///
pub fn run_batch(
    source: &impl Annotate,
    specs: &[(usize, QuerySpec)],
    show_progress: bool,
) -> BatchOutcome {
    let bar = if show_progress {
        let bar = ProgressBar::new(specs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut outcome = BatchOutcome::default();
    for (index, spec) in specs {
        bar.set_message(spec.label());
        match source.annotate(spec) {
            Ok(record) => outcome.records.push(record),
            Err(error) => {
                log::warn!("failed to annotate {}: {}", spec.label(), error);
                outcome.failures.push(ItemFailure {
                    index: *index,
                    input: spec.label(),
                    error,
                });
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::GeneQuery;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    /// Annotation stub that fails for a fixed set of symbols.
    struct StubSource {
        failing: Vec<&'static str>,
    }

    impl Annotate for StubSource {
        fn annotate(&self, spec: &QuerySpec) -> Result<FlatRecord, AnnotError> {
            let label = spec.label();
            if self.failing.contains(&label.as_str()) {
                return Err(AnnotError::NotFound(label));
            }
            let mut record = FlatRecord::new();
            record.push("gene_symbol", json!(label));
            Ok(record)
        }
    }

    fn gene_specs(symbols: &[&str]) -> Vec<(usize, QuerySpec)> {
        symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| {
                (
                    i,
                    QuerySpec::Gene(GeneQuery {
                        symbol: symbol.to_string(),
                        species: "human".to_string(),
                        include_transcripts: false,
                        include_phenotypes: false,
                    }),
                )
            })
            .collect()
    }

    #[rstest]
    fn test_output_order_matches_input_order() {
        let source = StubSource { failing: vec![] };
        let specs = gene_specs(&["BRCA1", "TP53", "EGFR"]);

        let outcome = run_batch(&source, &specs, false);

        let symbols: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r.get("gene_symbol").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(symbols, vec!["BRCA1", "TP53", "EGFR"]);
        assert!(outcome.all_succeeded());
    }

    #[rstest]
    fn test_failure_does_not_halt_batch() {
        let source = StubSource {
            failing: vec!["UNKNOWNGENE"],
        };
        let specs = gene_specs(&["BRCA1", "UNKNOWNGENE", "TP53"]);

        let outcome = run_batch(&source, &specs, false);

        let symbols: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r.get("gene_symbol").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(symbols, vec!["BRCA1", "TP53"]);

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
        assert_eq!(outcome.failures[0].input, "UNKNOWNGENE");
        assert!(matches!(outcome.failures[0].error, AnnotError::NotFound(_)));
    }

    #[rstest]
    fn test_all_items_failing_yields_no_records() {
        let source = StubSource {
            failing: vec!["A", "B"],
        };
        let specs = gene_specs(&["A", "B"]);

        let outcome = run_batch(&source, &specs, false);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures.len(), 2);
    }
}
