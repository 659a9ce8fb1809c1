use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Generate and evaluate two-voice Gregorian counterpoint.
#[derive(Parser, Debug)]
#[command(name = "cpt-cli", version, about = "Two-voice Gregorian counterpoint generator")]
pub struct Cli {
    /// Seed for every RNG this run touches (population init, DFS shuffles).
    #[arg(long, default_value_t = 0)]
    pub random_seed: u64,

    /// Number of bars in the generated tune.
    #[arg(long, default_value_t = 14)]
    pub tune_length: usize,

    /// GA population size.
    #[arg(long, default_value_t = 500)]
    pub pop_size: usize,

    /// Maximum fitness evaluations before giving up.
    #[arg(long, default_value_t = 1_000_000)]
    pub max_evals: usize,

    /// Maximum GA generations before giving up.
    #[arg(long, default_value_t = 1000)]
    pub max_generations: usize,

    /// Read a cantus firmus from a notation file, or `-` for stdin.
    #[arg(long, value_name = "FILE|-")]
    pub cantus_firmus: Option<String>,

    /// Import a gene file instead of searching (JSON, or trace text
    /// via `--gene-format trace`).
    #[arg(long, value_name = "PATH")]
    pub gene_file: Option<PathBuf>,

    /// Gene-file format for `--gene-file` and the written trace.
    #[arg(long, value_enum, default_value_t = GeneFormat::Json)]
    pub gene_format: GeneFormat,

    /// Write the resulting tune's notation here (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Append the search trace (imported or found genome) to this path.
    #[arg(long, value_name = "PATH")]
    pub trace_file: Option<PathBuf>,

    /// Transpose the finished tune by this many fifths.
    #[arg(long, default_value_t = 0)]
    pub transpose: i32,

    /// Transpose only the cantus firmus (when supplied externally) by
    /// this many fifths before searching.
    #[arg(long, default_value_t = 0)]
    pub transpose_cf: i32,

    /// Use the depth-first backtracking driver instead of the GA.
    #[arg(long)]
    pub optimize_depth_first: bool,

    /// Use differential evolution instead of a genetic algorithm
    /// (accepted for CLI-surface compatibility; DE is not a distinct
    /// backend here, the GA minimizer is reused).
    #[arg(long)]
    pub use_de: bool,

    /// DE/GA crossover probability.
    #[arg(long, default_value_t = 0.9)]
    pub de_crossover: f64,

    /// DE/GA mutation rate.
    #[arg(long, default_value_t = 0.02)]
    pub de_mutation: f64,

    /// Which rule battery to check against.
    #[arg(long, value_enum, default_value_t = ChecksArg::Default)]
    pub checks: ChecksArg,

    /// Allow soft (ugliness-only) violations during DFS pruning.
    #[arg(long)]
    pub allow_ugliness: bool,

    /// Skip melody-CF rule checks (only valid with `--cantus-firmus`).
    #[arg(long)]
    pub no_check_cf: bool,

    /// Skip the last-four-bars CF feasibility pre-check (accepted for
    /// CLI-surface compatibility; this workspace folds that check into
    /// the ordinary phase-2 search rather than running it separately,
    /// so this flag has no independent effect).
    #[arg(long)]
    pub no_cf_feasibility: bool,

    /// Print the per-pair rule explanation for the final tune.
    #[arg(long)]
    pub explain_cp_cf: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(long)]
    pub verbose: bool,

    /// Apply clamping to out-of-range gene-file alleles (the default);
    /// pass `--do-not-fix-gene` to surface them as an error instead.
    #[arg(long, conflicts_with = "do_not_fix_gene")]
    pub fix_gene: bool,

    /// Reject (rather than clamp) out-of-range gene-file alleles.
    #[arg(long)]
    pub do_not_fix_gene: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum GeneFormat {
    Json,
    Trace,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ChecksArg {
    Default,
    Special,
}

impl ChecksArg {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ChecksArg::Default => "default",
            ChecksArg::Special => "special",
        }
    }
}
