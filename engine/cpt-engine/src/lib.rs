//! Genome encoding, phenotype construction, and fitness evaluation for
//! the two-voice counterpoint generator.

#![forbid(unsafe_code)]

mod errors;
mod fitness;
mod gene_file;
mod genome;
mod phenotype;

pub use errors::GeneError;
pub use fitness::{evaluate, explain, Explanation, ExplanationKind};
pub use gene_file::GeneFile;
pub use genome::{AlleleRange, Genome, BOFF_LUT, CF_SLOT, CP_BLOCK};
pub use phenotype::{phenotype, Modes, CANTUS_FIRMUS, CONTRAPUNCTUS};
