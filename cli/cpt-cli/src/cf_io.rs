//! Reading an externally-supplied cantus firmus from a notation file
//! (or stdin) and optionally transposing it before the search starts.

use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};
use cpt_score::Voice;

/// Parse `source` (a path, or `-` for stdin) as notation text and pull
/// out its first voice as the cantus firmus.
pub fn read_cantus_firmus(source: &str, transpose_steps: i32) -> Result<Voice> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read cantus firmus from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read cantus firmus file {source}"))?
    };

    let tune = cpt_score::parse(&text).with_context(|| format!("failed to parse cantus firmus notation from {source}"))?;
    let Some(mut voice) = tune.voices().first().cloned() else {
        bail!("cantus firmus file {source} declares no voices");
    };

    if transpose_steps != 0 {
        voice.transpose(transpose_steps, tune.key());
    }
    Ok(voice)
}
