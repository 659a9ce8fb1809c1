use cpt_pitch::{halftone, Halftone, Key};
use proptest::prelude::*;

fn arb_base_halftone() -> impl Strategy<Value = Halftone> {
    prop_oneof![
        Just(halftone("C")),
        Just(halftone("D")),
        Just(halftone("E")),
        Just(halftone("F")),
        Just(halftone("G")),
        Just(halftone("A")),
        Just(halftone("B")),
    ]
}

proptest! {
    #[test]
    fn octave_shift_round_trips(ht in arb_base_halftone(), n in -4i32..4) {
        let shifted = ht.transpose_octaves(n).transpose_octaves(-n);
        prop_assert_eq!(shifted, ht);
    }

    #[test]
    fn enharmonic_equivalent_is_involutive(ht in arb_base_halftone(), n in -3i32..3) {
        let accidented = ht.transpose_fifth(n, &Key::new(0));
        let back = accidented.enharmonic_equivalent().enharmonic_equivalent();
        prop_assert_eq!(back, accidented);
    }

    #[test]
    fn transpose_preserves_pitch_class_mod_twelve(ht in arb_base_halftone(), steps in -24i32..24) {
        let key = Key::new(0);
        let moved = ht.transpose(steps, &key);
        let expected = (ht.offset() + steps).rem_euclid(12);
        prop_assert_eq!(moved.offset().rem_euclid(12), expected);
    }
}
