use cpt_modes::{GregorianMode, ModeName};
use cpt_rules::Battery;
use cpt_search::{DepthFirstSearch, Minimizer};
use proptest::prelude::*;

fn modes() -> cpt_engine::Modes {
    cpt_engine::Modes { cf: GregorianMode::plagal(ModeName::Dorian), cp: GregorianMode::authentic(ModeName::Dorian) }
}

fn empty_battery() -> Battery {
    Battery { melody_cf: vec![], melody_cp: vec![], harmony: vec![] }
}

proptest! {
    #[test]
    fn the_same_seed_always_finds_the_same_tune(seed in any::<u64>(), tune_length in 2usize..8) {
        let mut first = DepthFirstSearch::new(modes(), empty_battery(), seed);
        let (tune_a, genome_a) = first.run(tune_length, None).unwrap();

        let mut second = DepthFirstSearch::new(modes(), empty_battery(), seed);
        let (tune_b, genome_b) = second.run(tune_length, None).unwrap();

        prop_assert_eq!(genome_a.as_slice().to_vec(), genome_b.as_slice().to_vec());
        prop_assert_eq!(tune_a.voices().len(), tune_b.voices().len());
    }
}

#[test]
fn a_genetic_minimizer_never_returns_a_worse_best_than_its_first_individual() {
    use cpt_engine::Genome;
    use cpt_search::{GaConfig, GeneticMinimizer};

    let template = Genome::new(4, false).unwrap();
    let config = GaConfig { population_size: 12, max_generations: 20, max_evaluations: 2000, mutation_rate: 0.05, tournament_size: 3, random_seed: 99 };
    let mut minimizer = GeneticMinimizer::new(config);

    let (_, best) = minimizer.minimize(&template, |genome| genome.as_slice().iter().map(|v| f64::from(*v)).sum());
    assert!(best.is_finite());
}
