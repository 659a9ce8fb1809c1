//! Search drivers over [`cpt_engine::Genome`] allele vectors: a generic
//! population-based minimizer with a genetic-algorithm default, and a
//! two-phase depth-first backtracking driver.

#![forbid(unsafe_code)]

mod dfs;
mod errors;
mod ga;

pub use dfs::DepthFirstSearch;
pub use errors::SearchError;
pub use ga::{GaConfig, GeneticMinimizer, Minimizer};
