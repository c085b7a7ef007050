//! Error handling for bioalgos
//!
//! The sequence primitives in [`crate::algos`] never fail; every error here
//! comes from the layers around them: reading genome files, parsing user
//! input, loading configuration and setting up logging.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for genome loading, configuration and the interactive shell
#[derive(Error, Debug)]
pub enum BioAlgosError {
    /// I/O errors (genome files, config files, terminal streams)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The genomes directory does not exist
    #[error("Genomes folder {0} does not exist")]
    GenomesDirMissing(PathBuf),

    /// The genomes directory exists but holds no genome files
    #[error("No genome files found in {0}")]
    NoGenomeFiles(PathBuf),

    /// A genome contains a character outside {A, C, G, T}
    #[error("Invalid nucleotide '{base}' found in genome at position {position}")]
    InvalidNucleotide { base: char, position: usize },

    /// A pattern-based operation was asked for with an empty pattern
    #[error("Pattern cannot be empty")]
    EmptyPattern,

    /// A k-mer size that is not strictly positive
    #[error("k must be greater than 0 (got {0})")]
    InvalidK(i64),

    /// Parse error for numeric or other user-supplied data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The tracing subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl BioAlgosError {
    /// Create an InvalidNucleotide error
    pub fn invalid_nucleotide(base: char, position: usize) -> Self {
        Self::InvalidNucleotide { base, position }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a Logging error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging(message.into())
    }
}

/// Result type alias for bioalgos operations
pub type Result<T> = std::result::Result<T, BioAlgosError>;
