use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::AnnotError;

///
/// A variant locus of the fixed shape `chromosome:position:reference:alternate`,
/// e.g. `chr17:41245466:G:A`. A leading `chr` prefix on the chromosome is
/// accepted and stripped.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Locus {
    pub chrom: String,
    pub position: u64,
    pub reference: String,
    pub alternate: String,
}

impl Locus {
    ///
    /// Single-base region string for overlap and VEP endpoints (`chr:pos-pos`).
    ///
    pub fn region(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.position, self.position)
    }
}

impl FromStr for Locus {
    type Err = AnnotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 {
            return Err(AnnotError::Validation(format!(
                "locus '{}' must have exactly four colon-separated fields (chr:position:ref:alt)",
                s
            )));
        }

        let chrom = parts[0]
            .strip_prefix("chr")
            .unwrap_or(parts[0])
            .to_string();
        if chrom.is_empty() {
            return Err(AnnotError::Validation(format!(
                "locus '{}' has an empty chromosome field",
                s
            )));
        }

        let position = parts[1].parse::<u64>().map_err(|_| {
            AnnotError::Validation(format!(
                "locus '{}' has a non-numeric position '{}'",
                s, parts[1]
            ))
        })?;

        if parts[2].is_empty() || parts[3].is_empty() {
            return Err(AnnotError::Validation(format!(
                "locus '{}' has an empty reference or alternate allele",
                s
            )));
        }

        Ok(Locus {
            chrom,
            position,
            reference: parts[2].to_string(),
            alternate: parts[3].to_string(),
        })
    }
}

impl Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chrom, self.position, self.reference, self.alternate
        )
    }
}
