use crate::algos;
use crate::config::{AppConfig, ConfigOverrides};
use crate::error::{BioAlgosError, Result};
use crate::genome::Genome;
use crate::logging::LogLevel;
use crate::session::{self, Session};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Elementary string analysis of DNA sequences")]
pub struct Cli {
    /// configuration file (.toml, .yaml, .yml or .json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// folder scanned for genome files
    #[arg(long)]
    pub genomes_dir: Option<PathBuf>,

    /// log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// emit logs as JSON
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// pick a genome and analyse it from a menu (default)
    Interactive,

    /// count overlapping occurrences of a pattern
    Count {
        /// genome file
        #[arg(long)]
        genome: PathBuf,
        /// pattern to count
        #[arg(long)]
        pattern: String,
    },

    /// most frequent k-mers of a genome
    Frequent {
        /// genome file
        #[arg(long)]
        genome: PathBuf,
        /// k-mer size
        #[arg(short, long, value_parser = session::parse_k, allow_hyphen_values = true)]
        k: usize,
    },

    /// zero-based start offsets of every occurrence of a pattern
    Positions {
        /// genome file
        #[arg(long)]
        genome: PathBuf,
        /// pattern to locate
        #[arg(long)]
        pattern: String,
    },

    /// reverse complement of a pattern
    Revcomp {
        /// pattern to reverse complement
        #[arg(long)]
        pattern: String,
    },

    /// length and base composition of a genome
    Info {
        /// genome file
        #[arg(long)]
        genome: PathBuf,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            genomes_dir: self.genomes_dir.clone(),
            log_level: self.log_level,
            json_logs: self.json_logs,
        }
    }
}

/// Run the interactive menu on stdin/stdout
pub fn run_interactive(config: &AppConfig) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::discover(stdin.lock(), stdout.lock(), config.session.clone())?;
    session.run()
}

/// Execute one non-interactive command, writing its result to `out`
pub fn run_command<W: Write>(command: &Command, config: &AppConfig, out: &mut W) -> Result<()> {
    match command {
        Command::Interactive => run_interactive(config),
        Command::Count { genome, pattern } => {
            let genome = Genome::from_file(genome)?;
            let pattern = non_empty(pattern)?;
            let count = algos::count_occurrences(genome.as_str(), pattern);
            info!(pattern, count, "Counted pattern");
            writeln!(out, "{}", count)?;
            Ok(())
        }
        Command::Frequent { genome, k } => {
            let genome = Genome::from_file(genome)?;
            let table = algos::frequency_table(genome.as_str(), *k);
            if table.is_empty() {
                writeln!(out, "No {}-mers: k is longer than the genome ({} nucleotides).", k, genome.len())?;
                return Ok(());
            }

            let max_count = algos::max_frequency(&table);
            let mut kmers = algos::most_frequent_in(&table);
            kmers.sort_unstable();
            info!(k, max_count, found = kmers.len(), "Found most frequent k-mers");
            for kmer in kmers {
                writeln!(out, "{}\t{}", kmer, max_count)?;
            }
            Ok(())
        }
        Command::Positions { genome, pattern } => {
            let genome = Genome::from_file(genome)?;
            let pattern = non_empty(pattern)?;
            let positions = algos::find_all_positions(pattern, genome.as_str());
            info!(pattern, matches = positions.len(), "Located pattern");
            if positions.is_empty() {
                writeln!(out, "No matches found.")?;
            } else {
                writeln!(out, "{}", session::format_positions(&positions, config.session.max_display_positions))?;
            }
            Ok(())
        }
        Command::Revcomp { pattern } => {
            writeln!(out, "{}", algos::reverse_complement(pattern.trim()))?;
            Ok(())
        }
        Command::Info { genome } => {
            let genome = Genome::from_file(genome)?;
            writeln!(out, "{}", genome.stats())?;
            Ok(())
        }
    }
}

fn non_empty(pattern: &str) -> Result<&str> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(BioAlgosError::EmptyPattern);
    }
    Ok(pattern)
}
