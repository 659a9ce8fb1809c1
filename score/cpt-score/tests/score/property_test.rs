use cpt_pitch::{halftone, Key};
use cpt_score::{emit, parse, BarObjectKind, Fraction, Meter, Tune};
use proptest::prelude::*;

fn arb_tone_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("C"), Just("D"), Just("E"), Just("F"), Just("G"), Just("A"), Just("B")]
}

fn single_tone_voice(name: &str) -> Tune {
    let mut tune = Tune::new(Meter { numerator: 4, denominator: 4 }, Key::new(0), Fraction::new(1, 4));
    let idx = tune.add_voice("1");
    tune.voices_mut()[idx].add_bar(4);
    tune.voices_mut()[idx].add(0, BarObjectKind::Tone(halftone(name)), 4, false).unwrap();
    tune
}

proptest! {
    #[test]
    fn transposing_twice_matches_transposing_by_the_sum(name in arb_tone_name(), a in -11i32..11, b in -11i32..11) {
        let mut stepwise = single_tone_voice(name);
        stepwise.transpose(a);
        stepwise.transpose(b);

        let mut combined = single_tone_voice(name);
        combined.transpose(a + b);

        let stepwise_tone = stepwise.voices()[0].bars()[0].objects()[0].halftone().cloned();
        let combined_tone = combined.voices()[0].bars()[0].objects()[0].halftone().cloned();
        prop_assert_eq!(stepwise_tone, combined_tone);
    }

    #[test]
    fn emit_then_parse_preserves_every_tone_offset(name in arb_tone_name(), steps in -24i32..24) {
        let mut tune = single_tone_voice(name);
        tune.transpose(steps);

        let text = emit(&tune);
        let parsed = parse(&text).unwrap();

        let original = tune.voices()[0].bars()[0].objects()[0].halftone().unwrap().offset();
        let roundtripped = parsed.voices()[0].bars()[0].objects()[0].halftone().unwrap().offset();
        prop_assert_eq!(roundtripped, original);
    }
}
