//! Genome discovery and loading
//!
//! Genomes are plain text files of nucleotides. Loading strips whitespace and
//! line breaks, upper-cases the text and rejects anything outside {A, C, G, T},
//! so the primitives in [`crate::algos`] only ever see clean sequence.

use crate::error::{BioAlgosError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The DNA alphabet accepted in genome files
pub const NUCLEOTIDES: [char; 4] = ['A', 'C', 'G', 'T'];

/// Default extension of genome files
pub const DEFAULT_EXTENSION: &str = "txt";

/// A validated, whitespace-free, upper-case DNA sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    sequence: String,
}

impl Genome {
    /// Clean and validate raw genome text
    ///
    /// Spaces, tabs, `\r` and `\n` are removed and the rest is upper-cased.
    /// The position reported for an invalid character is its offset in the
    /// cleaned sequence.
    pub fn parse(text: &str) -> Result<Self> {
        let sequence: String = text
            .chars()
            .filter(|c| !matches!(c, ' ' | '\n' | '\r' | '\t'))
            .flat_map(char::to_uppercase)
            .collect();

        if let Some((position, base)) = sequence
            .chars()
            .enumerate()
            .find(|(_, c)| !NUCLEOTIDES.contains(c))
        {
            return Err(BioAlgosError::invalid_nucleotide(base, position));
        }

        Ok(Self { sequence })
    }

    /// Read and validate a genome file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        // Undecodable bytes become U+FFFD and fail alphabet validation
        let bytes = fs::read(path)?;
        let genome = Self::parse(&String::from_utf8_lossy(&bytes))?;
        debug!(path = %path.display(), length = genome.len(), "Loaded genome");
        Ok(genome)
    }

    pub fn as_str(&self) -> &str {
        &self.sequence
    }

    /// Number of nucleotides
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Length and base composition
    pub fn stats(&self) -> GenomeStats {
        let mut counts = [0usize; 4];
        for base in self.sequence.bytes() {
            match base {
                b'A' => counts[0] += 1,
                b'C' => counts[1] += 1,
                b'G' => counts[2] += 1,
                b'T' => counts[3] += 1,
                _ => {}
            }
        }

        GenomeStats {
            length: self.len(),
            a: counts[0],
            c: counts[1],
            g: counts[2],
            t: counts[3],
        }
    }
}

/// Basic composition statistics of a genome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomeStats {
    pub length: usize,
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
}

impl GenomeStats {
    /// Fraction of G and C bases, 0.0 for an empty genome
    pub fn gc_content(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        (self.g + self.c) as f64 / self.length as f64
    }
}

impl fmt::Display for GenomeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Length: {} nucleotides", self.length)?;
        writeln!(f, "A: {}", self.a)?;
        writeln!(f, "C: {}", self.c)?;
        writeln!(f, "G: {}", self.g)?;
        writeln!(f, "T: {}", self.t)?;
        write!(f, "GC content: {:.2}%", self.gc_content() * 100.0)
    }
}

/// List the genome files in `dir`, sorted by file name
///
/// A file matches when its lower-cased name ends with `.{extension}`.
/// Directories are skipped.
pub fn find_genome_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(BioAlgosError::GenomesDirMissing(dir.to_path_buf()));
    }

    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(&suffix) {
            files.push(entry.path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), found = files.len(), "Scanned for genome files");
    Ok(files)
}

/// Display name of a genome file (its final path component)
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_cleans_sequence() {
        let genome = Genome::parse("acg t\r\nGG\tta\n").unwrap();
        assert_eq!(genome.as_str(), "ACGTGGTA");
        assert_eq!(genome.len(), 8);
    }

    #[test]
    fn test_parse_empty() {
        let genome = Genome::parse(" \n\n").unwrap();
        assert!(genome.is_empty());
        assert_eq!(genome.stats().gc_content(), 0.0);
    }

    #[test]
    fn test_parse_rejects_invalid_base() {
        match Genome::parse("AC GN") {
            Err(BioAlgosError::InvalidNucleotide { base, position }) => {
                assert_eq!(base, 'N');
                assert_eq!(position, 3);
            }
            other => panic!("Expected InvalidNucleotide, got {:?}", other),
        }

        assert!(Genome::parse(">chr1\nACGT").is_err());
        assert!(Genome::parse("ACGU").is_err());
    }

    #[test]
    fn test_stats() {
        let stats = Genome::parse("AACGTTTG").unwrap().stats();
        assert_eq!(stats.length, 8);
        assert_eq!((stats.a, stats.c, stats.g, stats.t), (2, 1, 2, 3));
        assert!((stats.gc_content() - 0.375).abs() < 1e-9);
        assert!(stats.to_string().contains("GC content: 37.50%"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gattaca").unwrap();
        writeln!(file, "GATTACA").unwrap();
        file.flush().unwrap();

        let genome = Genome::from_file(file.path()).unwrap();
        assert_eq!(genome.as_str(), "GATTACAGATTACA");
    }

    #[test]
    fn test_from_file_with_non_utf8_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'A', b'C', 0xFF, b'G']).unwrap();
        file.flush().unwrap();

        match Genome::from_file(file.path()) {
            Err(BioAlgosError::InvalidNucleotide { base, position }) => {
                assert_eq!(base, char::REPLACEMENT_CHARACTER);
                assert_eq!(position, 2);
            }
            other => panic!("Expected InvalidNucleotide, got {:?}", other),
        }
    }

    #[test]
    fn test_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Genome::from_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, BioAlgosError::Io(_)));
    }

    #[test]
    fn test_find_genome_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "ACGT").unwrap();
        fs::write(dir.path().join("A.TXT"), "ACGT").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let files = find_genome_files(dir.path(), "txt").unwrap();
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["A.TXT", "b.txt"]);
    }

    #[test]
    fn test_find_genome_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = find_genome_files(dir.path().join("genomes"), DEFAULT_EXTENSION).unwrap_err();
        assert!(matches!(err, BioAlgosError::GenomesDirMissing(_)));
    }
}
