//! A generic population-based minimizer over [`Genome`] allele vectors,
//! plus one concrete genetic-algorithm implementation.

use cpt_engine::Genome;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A fitness-minimizing search over fixed-length integer allele
/// vectors. The counterpoint fitness function (badness · ugliness,
/// both `≥ 1`) reaches its optimum at exactly `1.0`.
pub trait Minimizer {
    /// Search starting from `template`'s allele ranges (its own
    /// values are not otherwise used — every individual is
    /// independently randomized), returning the best genome found and
    /// its fitness.
    fn minimize<F>(&mut self, template: &Genome, fitness: F) -> (Genome, f64)
    where
        F: FnMut(&Genome) -> f64;
}

/// Configuration for [`GeneticMinimizer`].
#[derive(Debug, Clone, Copy)]
pub struct GaConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Hard cap on the number of generations evolved.
    pub max_generations: usize,
    /// Hard cap on the number of fitness evaluations performed.
    pub max_evaluations: usize,
    /// Per-allele mutation probability.
    pub mutation_rate: f64,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Random seed; the same seed and configuration reproduce the same
    /// search trace.
    pub random_seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self { population_size: 500, max_generations: 1000, max_evaluations: 1_000_000, mutation_rate: 0.02, tournament_size: 3, random_seed: 0 }
    }
}

/// A generational genetic algorithm: tournament selection, uniform
/// crossover, per-allele mutation, and elitism (the best individual
/// always survives to the next generation).
#[derive(Debug)]
pub struct GeneticMinimizer {
    config: GaConfig,
    rng: StdRng,
}

impl GeneticMinimizer {
    /// Build a minimizer seeded from `config.random_seed`.
    #[must_use]
    pub fn new(config: GaConfig) -> Self {
        Self { rng: StdRng::seed_from_u64(config.random_seed), config }
    }

    fn random_individual(&mut self, template: &Genome) -> Genome {
        let mut g = template.clone();
        g.randomize(&mut self.rng);
        g
    }

    fn tournament_select<'a>(&mut self, population: &'a [(Genome, f64)]) -> &'a Genome {
        let mut best_idx = self.rng.gen_range(0..population.len());
        for _ in 1..self.config.tournament_size {
            let idx = self.rng.gen_range(0..population.len());
            if population[idx].1 < population[best_idx].1 {
                best_idx = idx;
            }
        }
        &population[best_idx].0
    }

    fn crossover(&mut self, a: &Genome, b: &Genome) -> Genome {
        let mut child = a.clone();
        for i in 0..child.len() {
            if self.rng.gen_bool(0.5) {
                child.set_allele(i, b.allele(i));
            }
        }
        child
    }

    fn mutate(&mut self, genome: &mut Genome) {
        for i in 0..genome.len() {
            if self.rng.gen_bool(self.config.mutation_rate) {
                let range = genome.range(i);
                genome.set_allele(i, self.rng.gen_range(range.min..=range.max));
            }
        }
    }
}

impl Minimizer for GeneticMinimizer {
    fn minimize<F>(&mut self, template: &Genome, mut fitness: F) -> (Genome, f64)
    where
        F: FnMut(&Genome) -> f64,
    {
        let mut evaluations = 0usize;
        let mut population: Vec<(Genome, f64)> = (0..self.config.population_size)
            .map(|_| {
                let g = self.random_individual(template);
                let f = fitness(&g);
                (g, f)
            })
            .collect();
        evaluations += population.len();

        let mut best = population.iter().min_by(|a, b| a.1.total_cmp(&b.1)).cloned().expect("population_size > 0");

        for generation in 0..self.config.max_generations {
            if best.1 <= 1.0 || evaluations >= self.config.max_evaluations {
                break;
            }
            tracing::debug!(generation, best_fitness = best.1, evaluations, "generation complete");

            let mut next: Vec<(Genome, f64)> = Vec::with_capacity(population.len());
            next.push(best.clone());

            while next.len() < population.len() && evaluations < self.config.max_evaluations {
                let parent_a = self.tournament_select(&population).clone();
                let parent_b = self.tournament_select(&population).clone();
                let mut child = self.crossover(&parent_a, &parent_b);
                self.mutate(&mut child);
                let f = fitness(&child);
                evaluations += 1;
                if f < best.1 {
                    best = (child.clone(), f);
                }
                next.push((child, f));
            }
            population = next;
            population.shuffle(&mut self.rng);
        }

        tracing::info!(evaluations, best_fitness = best.1, "search finished");
        best
    }
}
