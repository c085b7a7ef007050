//! Interactive genome analysis shell
//!
//! A [`Session`] owns everything the menu loop needs: the discovered genome
//! files, the genome currently loaded and the input/output streams. It is
//! generic over its streams so it can be driven from stdin/stdout or from
//! in-memory buffers.

use crate::algos;
use crate::config::SessionSettings;
use crate::error::{BioAlgosError, Result};
use crate::genome::{self, Genome};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A genome together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedGenome {
    pub path: PathBuf,
    pub genome: Genome,
}

impl LoadedGenome {
    pub fn name(&self) -> String {
        genome::display_name(&self.path)
    }
}

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SwitchGenome,
    PatternCount,
    FrequentSubstrings,
    GenomeInfo,
    PatternMatching,
    ReverseComplement,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = BioAlgosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(MenuChoice::SwitchGenome),
            "2" => Ok(MenuChoice::PatternCount),
            "3" => Ok(MenuChoice::FrequentSubstrings),
            "4" => Ok(MenuChoice::GenomeInfo),
            "5" => Ok(MenuChoice::PatternMatching),
            "6" => Ok(MenuChoice::ReverseComplement),
            "q" | "Q" => Ok(MenuChoice::Quit),
            other => Err(BioAlgosError::parse(format!("Unknown menu choice: {}", other))),
        }
    }
}

const MENU: &str = "\
=== Genome Analysis Options ===
1. Switch Genome - Load a different genome file
2. Pattern Count - Count occurrences of a specific pattern
3. Frequent Substrings - Find most frequent k-mers
4. Genome Info - Show basic genome stats
5. Pattern Matching - Find location of patterns in a genome
6. Reverse Complement - Reverse complement a pattern
q. Quit
";

/// Parse a k-mer size typed by the user
pub fn parse_k(input: &str) -> Result<usize> {
    let k: i64 = input
        .trim()
        .parse()
        .map_err(|_| BioAlgosError::parse("Invalid number. Please enter a valid integer."))?;
    if k <= 0 {
        return Err(BioAlgosError::InvalidK(k));
    }
    usize::try_from(k).map_err(|_| BioAlgosError::parse(format!("k is too large: {}", k)))
}

/// State of one interactive run
pub struct Session<R, W> {
    input: R,
    output: W,
    settings: SessionSettings,
    genome_files: Vec<PathBuf>,
    current: Option<LoadedGenome>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, settings: SessionSettings, genome_files: Vec<PathBuf>) -> Self {
        Self {
            input,
            output,
            settings,
            genome_files,
            current: None,
        }
    }

    /// Create a session over the genome files found in `settings.genomes_dir`
    pub fn discover(input: R, output: W, settings: SessionSettings) -> Result<Self> {
        let files = genome::find_genome_files(&settings.genomes_dir, &settings.file_extension)?;
        info!(dir = %settings.genomes_dir.display(), files = files.len(), "Discovered genome files");
        Ok(Self::new(input, output, settings, files))
    }

    pub fn genome_files(&self) -> &[PathBuf] {
        &self.genome_files
    }

    pub fn current_genome(&self) -> Option<&LoadedGenome> {
        self.current.as_ref()
    }

    /// Give back the output stream
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu loop until the user quits or input ends
    ///
    /// Fails with [`BioAlgosError::NoGenomeFiles`] when there is nothing to
    /// load; I/O errors on the session's own streams are propagated.
    pub fn run(&mut self) -> Result<()> {
        if self.genome_files.is_empty() {
            writeln!(
                self.output,
                "No genome files found in the '{}' folder. Add some '.{}' files to get started!",
                self.settings.genomes_dir.display(),
                self.settings.file_extension
            )?;
            return Err(BioAlgosError::NoGenomeFiles(self.settings.genomes_dir.clone()));
        }

        match self.select_and_load()? {
            Some(loaded) => self.current = Some(loaded),
            None => {
                writeln!(self.output, "No file selected. Exiting.")?;
                return Ok(());
            }
        }

        loop {
            write!(self.output, "{}\nEnter your choice ('q' to quit): ", MENU)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(_) => {
                    writeln!(self.output, "Invalid choice, try again.\n")?;
                    continue;
                }
            };
            debug!(?choice, "Menu selection");

            match choice {
                MenuChoice::SwitchGenome => self.switch_genome()?,
                MenuChoice::PatternCount => self.pattern_count()?,
                MenuChoice::FrequentSubstrings => self.frequent_substrings()?,
                MenuChoice::GenomeInfo => self.genome_info()?,
                MenuChoice::PatternMatching => self.pattern_matching()?,
                MenuChoice::ReverseComplement => self.reverse_complement()?,
                MenuChoice::Quit => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    /// Next trimmed line of input, None at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn select_file(&mut self) -> Result<Option<PathBuf>> {
        writeln!(self.output, "=== Available Genome Files ===")?;
        for (i, file) in self.genome_files.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, genome::display_name(file))?;
        }
        writeln!(self.output)?;

        let count = self.genome_files.len();
        loop {
            write!(self.output, "Select a genome file (1-{}): ", count)?;
            self.output.flush()?;

            let Some(choice) = self.read_line()? else {
                return Ok(None);
            };

            match choice.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(Some(self.genome_files[n - 1].clone())),
                _ => writeln!(self.output, "Invalid choice. Please enter a number between 1 and {}.\n", count)?,
            }
        }
    }

    fn select_and_load(&mut self) -> Result<Option<LoadedGenome>> {
        let Some(path) = self.select_file()? else {
            return Ok(None);
        };

        match Genome::from_file(&path) {
            Ok(genome) => {
                let loaded = LoadedGenome { path, genome };
                writeln!(
                    self.output,
                    "Loaded genome from '{}' with {} nucleotides\n",
                    loaded.name(),
                    loaded.genome.len()
                )?;
                info!(file = %loaded.name(), length = loaded.genome.len(), "Genome loaded");
                Ok(Some(loaded))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load genome");
                writeln!(self.output, "Error loading genome: {}\n", e)?;
                Ok(None)
            }
        }
    }

    fn switch_genome(&mut self) -> Result<()> {
        if let Some(loaded) = self.select_and_load()? {
            let unchanged = self.current.as_ref().is_some_and(|current| current.path == loaded.path);
            if !unchanged {
                self.current = Some(loaded);
            }
        }
        Ok(())
    }

    /// Prompt for a pattern; None when input ends or the pattern is empty
    fn read_pattern(&mut self) -> Result<Option<String>> {
        writeln!(self.output, "Enter the pattern to search for: ")?;
        self.output.flush()?;

        match self.read_line()? {
            None => Ok(None),
            Some(pattern) if pattern.is_empty() => {
                writeln!(self.output, "Pattern cannot be empty.\n")?;
                Ok(None)
            }
            Some(pattern) => Ok(Some(pattern)),
        }
    }

    fn read_k(&mut self) -> Result<Option<usize>> {
        write!(self.output, "Enter k-mer size (k): ")?;
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(None);
        };

        match parse_k(&line) {
            Ok(k) => Ok(Some(k)),
            Err(BioAlgosError::InvalidK(_)) => {
                writeln!(self.output, "k must be greater than 0.\n")?;
                Ok(None)
            }
            Err(_) => {
                writeln!(self.output, "Invalid number. Please enter a valid integer.\n")?;
                Ok(None)
            }
        }
    }

    fn pattern_count(&mut self) -> Result<()> {
        let Some(pattern) = self.read_pattern()? else {
            return Ok(());
        };
        let Some(loaded) = &self.current else {
            return Ok(());
        };

        let count = algos::count_occurrences(loaded.genome.as_str(), &pattern);
        debug!(%pattern, count, "Pattern count");
        writeln!(self.output, "Pattern '{}' appears {} times in the genome\n", pattern, count)?;
        Ok(())
    }

    fn frequent_substrings(&mut self) -> Result<()> {
        let Some(k) = self.read_k()? else {
            return Ok(());
        };
        let Some(loaded) = &self.current else {
            return Ok(());
        };
        let sequence = loaded.genome.as_str();

        let table = algos::frequency_table(sequence, k);
        let mut kmers = algos::most_frequent_in(&table);
        if kmers.is_empty() {
            writeln!(
                self.output,
                "\nNo {}-mers: k is longer than the genome ({} nucleotides).\n",
                k,
                sequence.len()
            )?;
            return Ok(());
        }

        let max_count = algos::max_frequency(&table);
        kmers.sort_unstable();
        debug!(k, max_count, found = kmers.len(), "Frequent substrings");

        writeln!(self.output, "\nMost frequent {}-mers (appearing {} times):", k, max_count)?;
        for kmer in &kmers {
            writeln!(self.output, "- {}", kmer)?;
        }
        writeln!(self.output, "\nFound {} most frequent {}-mers\n", kmers.len(), k)?;
        Ok(())
    }

    fn genome_info(&mut self) -> Result<()> {
        let Some(loaded) = &self.current else {
            return Ok(());
        };

        writeln!(self.output, "\n=== Genome Statistics ===")?;
        writeln!(self.output, "File: {}", loaded.name())?;
        writeln!(self.output, "{}\n", loaded.genome.stats())?;
        Ok(())
    }

    fn pattern_matching(&mut self) -> Result<()> {
        let Some(pattern) = self.read_pattern()? else {
            return Ok(());
        };
        let Some(loaded) = &self.current else {
            return Ok(());
        };

        let positions = algos::find_all_positions(&pattern, loaded.genome.as_str());
        debug!(%pattern, matches = positions.len(), "Pattern matching");
        writeln!(
            self.output,
            "Pattern '{}' appears at the following positions in the genome\n",
            pattern
        )?;

        if positions.is_empty() {
            writeln!(self.output, "No matches found.\n")?;
            return Ok(());
        }

        writeln!(self.output, "{}", format_positions(&positions, self.settings.max_display_positions))?;
        writeln!(self.output, "\nTotal matches: {}\n", positions.len())?;
        Ok(())
    }

    fn reverse_complement(&mut self) -> Result<()> {
        writeln!(self.output, "Enter the pattern to reverse complement: ")?;
        self.output.flush()?;

        let Some(pattern) = self.read_line()? else {
            return Ok(());
        };
        if pattern.is_empty() {
            writeln!(self.output, "Pattern cannot be empty.\n")?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Reverse complement of '{}': {}\n",
            pattern,
            algos::reverse_complement(&pattern)
        )?;
        Ok(())
    }
}

/// Space-separated offsets, truncated to `limit` entries when `limit > 0`
pub fn format_positions(positions: &[usize], limit: usize) -> String {
    let shown = if limit > 0 { positions.len().min(limit) } else { positions.len() };
    let mut text = positions[..shown]
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    if shown < positions.len() {
        text.push_str(&format!(" ... ({} more)", positions.len() - shown));
    }
    text
}
