//! Static tables backing [`crate::halftone::Halftone`] arithmetic.
//!
//! Transcribed from the two-octave symbol table, enharmonic map, and
//! circle-of-fifths tables of the original `contrapunctus` implementation
//! (`examples/original_source/contrapunctus/tune.py`).

use std::collections::HashMap;
use std::sync::OnceLock;

/// `(name, offset)` for the two canonical octaves. `A` is offset `0`.
pub(crate) const SYMBOLS: &[(&str, i32)] = &[
    ("_C", -10), ("C", -9), ("^C", -8),
    ("_D", -8), ("D", -7), ("^D", -6),
    ("_E", -6), ("E", -5), ("^E", -4),
    ("_F", -5), ("F", -4), ("^F", -3),
    ("_G", -3), ("G", -2), ("^G", -1),
    ("_A", -1), ("A", 0), ("^A", 1),
    ("_B", 1), ("B", 2), ("^B", 3),
    ("_c", 2), ("c", 3), ("^c", 4),
    ("_d", 4), ("d", 5), ("^d", 6),
    ("_e", 6), ("e", 7), ("^e", 8),
    ("_f", 7), ("f", 8), ("^f", 9),
    ("_g", 9), ("g", 10), ("^g", 11),
    ("_a", 11), ("a", 12), ("^a", 13),
    ("_b", 13), ("b", 14), ("^b", 15),
];

/// Enharmonic equivalents for the canonical low octave (plus their reverse).
pub(crate) const ENHARMONICS: &[(&str, &str)] = &[
    ("^B,", "C"),
    ("^C", "_D"),
    ("_C", "B,"),
    ("^D", "_E"),
    ("^E", "F"),
    ("_F", "E"),
    ("^F", "_G"),
    ("^G", "_A"),
    ("^A", "_B"),
    ("^B", "c"),
    ("_c", "B"),
    // reverse of every entry whose value carries an accidental
    ("_D", "^C"),
    ("_E", "^D"),
    ("_G", "^F"),
    ("_A", "^G"),
    ("_B", "^A"),
];

pub(crate) const FIFTH_UP: &[(&str, &str)] = &[
    ("C", "G"), ("^C", "^G"),
    ("D", "A"), ("^D", "^A"),
    ("E", "B"),
    ("F", "c"), ("^F", "^c"),
    ("_G", "_d"), ("G", "d"), ("^G", "^d"),
    ("A", "e"), ("^A", "^e"),
    ("B", "^f"),
    ("c", "g"), ("^c", "^g"),
    ("d", "a"), ("^d", "^a"),
    ("e", "b"),
    ("f", "c'"), ("^f", "^c'"),
    ("_g", "_d'"), ("g", "d'"), ("^g", "^d'"),
    ("a", "e'"), ("^a", "^e'"),
    ("b", "^f'"),
];

pub(crate) const FIFTH_DOWN: &[(&str, &str)] = &[
    ("C", "F,"),
    ("_D", "_G,"), ("D", "G,"),
    ("_E", "_A,"), ("E", "A,"),
    ("F", "_B,"), ("^F", "B,"),
    ("_G", "_C"), ("G", "C"),
    ("_A", "_D"), ("A", "D"),
    ("_B", "_E"), ("B", "E"),
    ("c", "F"),
    ("d", "G"), ("_d", "_G"),
    ("e", "A"), ("_e", "_A"),
    ("f", "_B"), ("^f", "b"),
    ("_g", "_c"), ("g", "c"),
    ("_a", "_d"), ("a", "d"),
    ("_b", "_e"), ("b", "e"),
];

fn build_inv(table: &'static [(&'static str, &'static str)], exclude_prefix: char) -> HashMap<&'static str, &'static str> {
    let mut inv = HashMap::new();
    for &(k, v) in table {
        if v.starts_with(exclude_prefix) {
            continue;
        }
        inv.insert(v, k);
    }
    inv
}

pub(crate) fn fifth_up_inv() -> &'static HashMap<&'static str, &'static str> {
    static INV: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    INV.get_or_init(|| build_inv(FIFTH_UP, '_'))
}

pub(crate) fn fifth_down_inv() -> &'static HashMap<&'static str, &'static str> {
    static INV: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    INV.get_or_init(|| build_inv(FIFTH_DOWN, '^'))
}

pub(crate) fn lookup(table: &[(&str, &str)], name: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}

pub(crate) fn symbol_offset(stem: &str) -> Option<i32> {
    SYMBOLS.iter().find(|(k, _)| *k == stem).map(|(_, v)| *v)
}

pub(crate) fn enharmonic_lookup(name: &str) -> Option<&'static str> {
    ENHARMONICS.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}
