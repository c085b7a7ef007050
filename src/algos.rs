//! Elementary sequence-analysis primitives
//!
//! Every function here is pure: it borrows the genome and pattern, allocates
//! its own result and never fails. Size parameters that make no sense (an
//! empty pattern, a pattern longer than the genome, `k == 0`, `k` longer than
//! the genome) produce empty or zero results instead of errors.
//!
//! Genomes are expected to be ASCII nucleotide text as produced by
//! [`crate::genome::Genome`]. Offsets are zero-based byte offsets.

use std::collections::HashMap;

/// Fixed seeds so identical inputs always build identically ordered tables
const HASH_SEED: u64 = 0x51f3b5b8;
const HASH_SEED2: u64 = 0x9e3779b9;

/// Occurrence count of every k-mer in a genome, keyed by slices of that genome
pub type FrequencyTable<'a> = HashMap<&'a str, usize, ahash::RandomState>;

/// Number of times `pattern` occurs in `genome`, overlaps included
///
/// An empty pattern never matches.
pub fn count_occurrences(genome: &str, pattern: &str) -> usize {
    if pattern.is_empty() || pattern.len() > genome.len() {
        return 0;
    }

    genome
        .as_bytes()
        .windows(pattern.len())
        .filter(|window| *window == pattern.as_bytes())
        .count()
}

/// Create an empty frequency table with the crate's deterministic hasher
pub fn new_frequency_table<'a>(capacity: usize) -> FrequencyTable<'a> {
    let hasher = ahash::RandomState::with_seeds(HASH_SEED, HASH_SEED2, 0, 0);
    HashMap::with_capacity_and_hasher(capacity, hasher)
}

/// Count every k-mer of `genome`
///
/// Returns an empty table when `k == 0` or `k > genome.len()`.
pub fn frequency_table(genome: &str, k: usize) -> FrequencyTable<'_> {
    if k == 0 || k > genome.len() {
        return new_frequency_table(0);
    }

    let windows = genome.len() - k + 1;
    let mut table = new_frequency_table(windows);
    for start in 0..windows {
        // Only fails off a char boundary, which nucleotide text never has
        if let Some(kmer) = genome.get(start..start + k) {
            *table.entry(kmer).or_insert(0) += 1;
        }
    }
    table
}

/// Highest count in the table, or 0 for an empty table
pub fn max_frequency(table: &FrequencyTable<'_>) -> usize {
    table.values().copied().max().unwrap_or(0)
}

/// All k-mers that share the highest count in `genome`
///
/// The order of the returned k-mers is unspecified and may differ between
/// genomes; treat the result as a set. Empty when `k` is invalid.
pub fn most_frequent_substrings(genome: &str, k: usize) -> Vec<&str> {
    most_frequent_in(&frequency_table(genome, k))
}

/// Keys of `table` whose count equals [`max_frequency`], in unspecified order
pub fn most_frequent_in<'a>(table: &FrequencyTable<'a>) -> Vec<&'a str> {
    let maximum = max_frequency(table);
    table
        .iter()
        .filter(|&(_, &count)| count == maximum)
        .map(|(&kmer, _)| kmer)
        .collect()
}

/// Watson-Crick complement of a single base; anything else becomes `N`
pub fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        _ => 'N',
    }
}

/// Reverse complement of a nucleotide string
///
/// The output has as many characters as the input. Characters outside
/// {A, C, G, T} are tolerated and come out as `N`.
pub fn reverse_complement(pattern: &str) -> String {
    pattern.chars().rev().map(complement).collect()
}

/// Start offsets of every occurrence of `pattern` in `genome`, ascending
///
/// Uses the same matching rules as [`count_occurrences`], so the length of
/// the result always equals that count.
pub fn find_all_positions(pattern: &str, genome: &str) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > genome.len() {
        return Vec::new();
    }

    genome
        .as_bytes()
        .windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| *window == pattern.as_bytes())
        .map(|(offset, _)| offset)
        .collect()
}
