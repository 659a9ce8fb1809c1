mod args;
mod cf_io;
mod errors;
mod gene_io;
mod report;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use cpt_engine::{evaluate, explain, phenotype, Genome, Modes};
use cpt_modes::{GregorianMode, ModeName};
use cpt_rules::Battery;
use cpt_score::Voice;
use cpt_search::{DepthFirstSearch, GaConfig, GeneticMinimizer, Minimizer, SearchError};
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::errors::CliError;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<CliError>().is_some_and(|e| matches!(e, CliError::Infeasible(_))) => {
            println!("{err}");
            Ok(())
        }
        Err(err) => {
            if err.downcast_ref::<CliError>().is_some() {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn modes() -> Modes {
    Modes { cf: GregorianMode::plagal(ModeName::Dorian), cp: GregorianMode::authentic(ModeName::Dorian) }
}

fn battery_for(cli: &Cli) -> Battery {
    cpt_rules::named(cli.checks.label()).unwrap_or_else(cpt_rules::default_battery)
}

fn run(cli: &Cli) -> Result<()> {
    if cli.no_check_cf && cli.cantus_firmus.is_none() {
        return Err(CliError::InvalidArgument("--no-check-cf requires --cantus-firmus".to_owned()).into());
    }
    let fix_gene = !cli.do_not_fix_gene;

    let cantus_firmus: Option<Voice> = cli
        .cantus_firmus
        .as_deref()
        .map(|source| cf_io::read_cantus_firmus(source, cli.transpose_cf))
        .transpose()
        .context("failed to load the supplied cantus firmus")?;
    let has_cantus_firmus = cantus_firmus.is_some();
    let modes = modes();
    let check_cf = !cli.no_check_cf;

    let (mut tune, genome) = if let Some(path) = &cli.gene_file {
        let genome = gene_io::read_genome(path, cli.gene_format, cli.tune_length, has_cantus_firmus, fix_gene)?;
        let tune = phenotype(&genome, &modes, cantus_firmus.as_ref(), None).context("failed to decode the imported gene file")?;
        (tune, genome)
    } else if cli.optimize_depth_first {
        run_dfs(cli, &modes, cantus_firmus)?
    } else {
        run_ga(cli, &modes, cantus_firmus.as_ref())?
    };

    if let Some(path) = &cli.trace_file {
        let command_line: Vec<String> = std::env::args().collect();
        gene_io::write_genome(path, cli.gene_format, &genome, cli.tune_length, has_cantus_firmus, Some(&command_line.join(" ")))
            .context("failed to write the search trace")?;
    }

    if cli.transpose != 0 {
        tune.transpose(cli.transpose);
    }

    let mut battery = battery_for(cli);
    if cli.explain_cp_cf {
        let (score, log) = explain(&tune, &mut battery, check_cf).context("failed to explain the final tune")?;
        println!("Fitness: {score:.6}");
        report::print_explanation(&log);
    } else {
        let score = evaluate(&tune, &mut battery, check_cf).context("failed to evaluate the final tune")?;
        println!("Fitness: {score:.6}");
    }

    let notation = cpt_score::emit(&tune);
    match &cli.output_file {
        Some(path) => fs::write(path, &notation).with_context(|| format!("failed to write output to {}", path.display()))?,
        None => println!("{notation}"),
    }

    Ok(())
}

fn run_dfs(cli: &Cli, modes: &Modes, cantus_firmus: Option<Voice>) -> Result<(cpt_score::Tune, Genome)> {
    let battery = battery_for(cli);
    let mut dfs = DepthFirstSearch::new(modes.clone(), battery, cli.random_seed);
    dfs.check_cf = !cli.no_check_cf;
    dfs.allow_ugliness = cli.allow_ugliness;

    match dfs.run(cli.tune_length, cantus_firmus) {
        Ok((tune, genome)) => Ok((tune, genome)),
        Err(SearchError::NoCantusFirmus) => {
            Err(CliError::Infeasible("no cantus firmus satisfies the melody rules for this seed and length".to_owned()).into())
        }
        Err(SearchError::NoContrapunctus) => {
            Err(CliError::Infeasible("no contrapunctus satisfies the melody and harmony rules for this seed and length".to_owned()).into())
        }
        Err(SearchError::InfeasibleCantusFirmus) => {
            Err(CliError::Infeasible("no contrapunctus is feasible for the supplied cantus firmus".to_owned()).into())
        }
        Err(SearchError::Gene(e)) => Err(e.into()),
    }
}

fn run_ga(cli: &Cli, modes: &Modes, cantus_firmus: Option<&Voice>) -> Result<(cpt_score::Tune, Genome)> {
    let has_cantus_firmus = cantus_firmus.is_some();
    let template = Genome::new(cli.tune_length, has_cantus_firmus).context("cannot build a genome for the requested tune length")?;

    let config = GaConfig {
        population_size: cli.pop_size,
        max_generations: cli.max_generations,
        max_evaluations: cli.max_evals,
        mutation_rate: cli.de_mutation,
        tournament_size: 3,
        random_seed: cli.random_seed,
    };
    let mut minimizer = GeneticMinimizer::new(config);
    let mut fit_battery = battery_for(cli);
    let check_cf = !cli.no_check_cf;
    let modes_owned = modes.clone();

    let (genome, best) = minimizer.minimize(&template, |candidate| {
        phenotype(candidate, &modes_owned, cantus_firmus, None)
            .ok()
            .and_then(|tune| evaluate(&tune, &mut fit_battery, check_cf).ok())
            .unwrap_or(f64::INFINITY)
    });

    if !best.is_finite() {
        return Err(CliError::Infeasible("the genetic search never produced a valid tune".to_owned()).into());
    }
    let tune = phenotype(&genome, modes, cantus_firmus, None).context("failed to decode the evolved genome")?;
    Ok((tune, genome))
}
