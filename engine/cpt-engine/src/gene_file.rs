//! Gene files: a serializable snapshot of a [`Genome`], round-tripped
//! either through `serde_json` or through the original tool's
//! line-oriented `%# <start>: [v0],...` search-trace format.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::GeneError;
use crate::genome::Genome;

/// An on-disk snapshot of a [`Genome`]: enough to reconstruct its slot
/// layout (`tune_length`, `has_cantus_firmus`) plus the raw allele
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneFile {
    /// Total length of the tune the genome was built for, in bars.
    pub tune_length: usize,
    /// Whether the cantus firmus was supplied externally (and so
    /// contributes no alleles of its own).
    pub has_cantus_firmus: bool,
    /// Allele values, in slot order.
    pub alleles: Vec<i32>,
}

impl GeneFile {
    /// Snapshot `genome` for `tune_length`/`has_cantus_firmus` it was
    /// built with.
    #[must_use]
    pub fn from_genome(genome: &Genome, tune_length: usize, has_cantus_firmus: bool) -> Self {
        Self { tune_length, has_cantus_firmus, alleles: genome.as_slice().to_vec() }
    }

    /// Rebuild a [`Genome`] from this snapshot, clamping every allele
    /// to its legal range.
    ///
    /// # Errors
    /// Returns [`GeneError::TuneTooShort`] if `tune_length` can't hold
    /// any searched bars, or [`GeneError::AlleleCountMismatch`] if the
    /// stored allele count doesn't match the shape implied by
    /// `tune_length`/`has_cantus_firmus`.
    pub fn to_genome(&self) -> Result<Genome, GeneError> {
        let mut genome = Genome::new(self.tune_length, self.has_cantus_firmus)?;
        if self.alleles.len() != genome.len() {
            return Err(GeneError::AlleleCountMismatch { found: self.alleles.len(), expected: genome.len(), tune_length: self.tune_length });
        }
        for (i, &v) in self.alleles.iter().enumerate() {
            genome.set_allele(i, v);
        }
        genome.fix_gene();
        Ok(genome)
    }

    /// Read and parse a gene file.
    ///
    /// # Errors
    /// Propagates I/O and JSON-parse failures.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, GeneError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Serialize and write a gene file.
    ///
    /// # Errors
    /// Propagates I/O and JSON-serialize failures.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), GeneError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Render this snapshot as the original tool's search-trace format:
    /// `%# <start-index>: [v0],[v1],...` lines, 16 alleles per line.
    #[must_use]
    pub fn to_trace(&self) -> String {
        let mut out = String::new();
        for (line_no, chunk) in self.alleles.chunks(TRACE_LINE_WIDTH).enumerate() {
            let start = line_no * TRACE_LINE_WIDTH;
            let values: Vec<String> = chunk.iter().map(|v| format!("[{v}]")).collect();
            out.push_str(&format!("%# {start}: {}\n", values.join(",")));
        }
        out
    }

    /// Parse a search-trace text (as produced by [`Self::to_trace`]),
    /// ignoring any leading command-line comment line that doesn't
    /// start with `%#`.
    ///
    /// # Errors
    /// Returns [`GeneError::InvalidTrace`] if a `%#` line is malformed,
    /// or [`GeneError::AlleleCountMismatch`] if the recovered allele
    /// count doesn't match the shape implied by `tune_length`/
    /// `has_cantus_firmus`.
    pub fn from_trace(text: &str, tune_length: usize, has_cantus_firmus: bool) -> Result<Self, GeneError> {
        let mut alleles = Vec::new();
        for line in text.lines() {
            let Some(rest) = line.strip_prefix("%#") else { continue };
            let (start_str, values_str) =
                rest.split_once(':').ok_or_else(|| GeneError::InvalidTrace(line.to_owned()))?;
            let start: usize =
                start_str.trim().parse().map_err(|_| GeneError::InvalidTrace(line.to_owned()))?;
            if start != alleles.len() {
                return Err(GeneError::InvalidTrace(line.to_owned()));
            }
            for token in values_str.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                let token = token.strip_prefix('[').and_then(|t| t.strip_suffix(']'));
                let Some(token) = token else { return Err(GeneError::InvalidTrace(line.to_owned())) };
                let value: i32 = token.parse().map_err(|_| GeneError::InvalidTrace(line.to_owned()))?;
                alleles.push(value);
            }
        }
        let expected = Genome::new(tune_length, has_cantus_firmus)?.len();
        if alleles.len() != expected {
            return Err(GeneError::AlleleCountMismatch { found: alleles.len(), expected, tune_length });
        }
        Ok(Self { tune_length, has_cantus_firmus, alleles })
    }

    /// Read and parse a search-trace file.
    ///
    /// # Errors
    /// Propagates I/O failures and [`Self::from_trace`]'s errors.
    pub fn read_trace(path: impl AsRef<Path>, tune_length: usize, has_cantus_firmus: bool) -> Result<Self, GeneError> {
        let text = fs::read_to_string(path)?;
        Self::from_trace(&text, tune_length, has_cantus_firmus)
    }

    /// Write this snapshot as a search-trace file, optionally preceded
    /// by the command line that produced it.
    ///
    /// # Errors
    /// Propagates I/O failures.
    pub fn write_trace(&self, path: impl AsRef<Path>, command_line: Option<&str>) -> Result<(), GeneError> {
        let mut text = String::new();
        if let Some(cmd) = command_line {
            text.push_str(&format!("% {cmd}\n"));
        }
        text.push_str(&self.to_trace());
        fs::write(path, text)?;
        Ok(())
    }
}

/// Allele values per trace line, matching the original tool's fixed
/// line width.
const TRACE_LINE_WIDTH: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut genome = Genome::new(8, false).unwrap();
        genome.set_allele(0, 3);
        let file = GeneFile::from_genome(&genome, 8, false);
        let text = serde_json::to_string(&file).unwrap();
        let back: GeneFile = serde_json::from_str(&text).unwrap();
        assert_eq!(back, file);
        let rebuilt = back.to_genome().unwrap();
        assert_eq!(rebuilt.allele(0), 3);
    }

    #[test]
    fn clamps_out_of_range_alleles_on_import() {
        let mut file = GeneFile { tune_length: 8, has_cantus_firmus: false, alleles: vec![0; Genome::new(8, false).unwrap().len()] };
        file.alleles[0] = 999;
        let genome = file.to_genome().unwrap();
        assert_eq!(genome.allele(0), genome.range(0).max);
    }

    #[test]
    fn rejects_wrong_allele_count() {
        let file = GeneFile { tune_length: 8, has_cantus_firmus: false, alleles: vec![0; 3] };
        assert!(matches!(file.to_genome(), Err(GeneError::AlleleCountMismatch { .. })));
    }

    #[test]
    fn round_trips_through_the_trace_format() {
        let genome = Genome::new(8, false).unwrap();
        let file = GeneFile::from_genome(&genome, 8, false);
        let trace = file.to_trace();
        assert!(trace.lines().all(|l| l.starts_with("%# ")));
        let back = GeneFile::from_trace(&trace, 8, false).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn trace_parsing_skips_a_leading_command_line_comment() {
        let genome = Genome::new(8, false).unwrap();
        let file = GeneFile::from_genome(&genome, 8, false);
        let mut text = String::from("% cpt-cli --tune-length 8\n");
        text.push_str(&file.to_trace());
        let back = GeneFile::from_trace(&text, 8, false).unwrap();
        assert_eq!(back, file);
    }
}
