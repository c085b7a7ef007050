//! Exact-match string analysis of DNA sequences: pattern counting, k-mer
//! frequencies, reverse complements and pattern positions, plus the genome
//! loader and interactive shell built around them.

pub mod algos;
pub mod cli;
pub mod config;
pub mod error;
pub mod genome;
pub mod logging;
pub mod session;

pub use algos::{
    FrequencyTable, count_occurrences, find_all_positions, frequency_table, max_frequency,
    most_frequent_in, most_frequent_substrings, reverse_complement,
};
pub use error::{BioAlgosError, Result};
pub use genome::{Genome, GenomeStats};
