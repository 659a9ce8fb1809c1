use cpt_engine::{evaluate, phenotype, Genome, Modes};
use cpt_modes::{GregorianMode, ModeName};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn modes() -> Modes {
    Modes { cf: GregorianMode::plagal(ModeName::Dorian), cp: GregorianMode::authentic(ModeName::Dorian) }
}

proptest! {
    #[test]
    fn a_random_genome_always_decodes_and_scores_at_least_one(seed in any::<u64>(), tune_length in 1usize..8) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut genome = Genome::new(tune_length, false).unwrap();
        genome.randomize(&mut rng);

        let tune = phenotype(&genome, &modes(), None, None).unwrap();
        let mut battery = cpt_rules::default_battery();
        let score = evaluate(&tune, &mut battery, true).unwrap();

        prop_assert!(score.is_finite());
        prop_assert!(score >= 1.0);
    }

    #[test]
    fn fixing_a_genome_is_idempotent(seed in any::<u64>(), tune_length in 1usize..8) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut genome = Genome::new(tune_length, false).unwrap();
        genome.randomize(&mut rng);

        genome.fix_gene();
        let once = genome.as_slice().to_vec();
        genome.fix_gene();
        prop_assert_eq!(genome.as_slice().to_vec(), once);
    }
}
