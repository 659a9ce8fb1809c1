//! Gene-file import/export, dispatching on `--gene-format`.

use std::path::Path;

use anyhow::{Context, Result};
use cpt_engine::{Genome, GeneFile};

use crate::args::GeneFormat;

/// Read a gene file in the requested format and rebuild a [`Genome`]
/// from it, clamping out-of-range alleles unless `fix` is `false`.
pub fn read_genome(path: &Path, format: GeneFormat, tune_length: usize, has_cantus_firmus: bool, fix: bool) -> Result<Genome> {
    let file = match format {
        GeneFormat::Json => GeneFile::read(path).with_context(|| format!("failed to read gene file {}", path.display()))?,
        GeneFormat::Trace => GeneFile::read_trace(path, tune_length, has_cantus_firmus)
            .with_context(|| format!("failed to read gene trace {}", path.display()))?,
    };

    let genome = file.to_genome().context("gene file alleles do not match the requested tune shape")?;
    if !fix && genome.as_slice() != file.alleles.as_slice() {
        anyhow::bail!("gene file {} has out-of-range alleles and --do-not-fix-gene was given", path.display());
    }
    Ok(genome)
}

/// Write `genome` out in the requested format.
pub fn write_genome(path: &Path, format: GeneFormat, genome: &Genome, tune_length: usize, has_cantus_firmus: bool, command_line: Option<&str>) -> Result<()> {
    let file = GeneFile::from_genome(genome, tune_length, has_cantus_firmus);
    match format {
        GeneFormat::Json => file.write(path).with_context(|| format!("failed to write gene file {}", path.display())),
        GeneFormat::Trace => file.write_trace(path, command_line).with_context(|| format!("failed to write gene trace {}", path.display())),
    }
}
