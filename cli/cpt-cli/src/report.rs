//! Text rendering of the final tune's fitness and rule explanations.

use cpt_engine::{Explanation, ExplanationKind};

/// Print one line per rule firing recorded by [`cpt_engine::explain`].
pub fn print_explanation(log: &[Explanation]) {
    if log.is_empty() {
        println!("No rule violations.");
        return;
    }
    for entry in log {
        let kind = match entry.kind {
            ExplanationKind::MelodyCf => "melody(cf)",
            ExplanationKind::MelodyCp => "melody(cp)",
            ExplanationKind::Harmony => "harmony",
        };
        println!(
            "  bar {:>3} obj {:>2} [{kind}] {} -> badness {:.3} ugliness {:.3}",
            entry.cp_object.bar, entry.cp_object.obj, entry.rule, entry.result.badness, entry.result.ugliness
        );
    }
}
