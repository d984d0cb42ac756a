//! Command-line argument parsing.
//!
//! Usage:
//!   bf                              run a program read from stdin
//!   bf -f <file>                    run a program from a file
//!   bf -c <input> <output>          convert a program to C
//!   bf -h                           display help

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{find_config_file, ConfigError, EngineConfig, EofPolicy};

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "bf",
    version,
    about = "MiniBf: a simple Brainfuck interpreter",
    after_help = "With neither -f nor -c, the program is read from standard input and executed."
)]
pub struct CliArgs {
    /// Execute Brainfuck code from a file.
    #[arg(short = 'f', long = "file", value_name = "FILE", conflicts_with = "convert")]
    pub file: Option<PathBuf>,

    /// Convert Brainfuck code to C code.
    #[arg(
        short = 'c',
        long = "convert",
        num_args = 2,
        action = ArgAction::Set,
        value_names = ["INPUT", "OUTPUT"]
    )]
    pub convert: Option<Vec<PathBuf>>,

    /// Config file to load instead of searching the default locations.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of tape cells.
    #[arg(long, value_name = "CELLS")]
    pub tape_size: Option<usize>,

    /// Largest accepted program, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_program_len: Option<usize>,

    /// What `,` does at end of input.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub eof: Option<EofMode>,

    /// Byte stored by `,` at end of input (implies `--eof sentinel`).
    #[arg(long, value_name = "BYTE")]
    pub eof_value: Option<u8>,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// `--eof` choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EofMode {
    /// Leave the cell untouched.
    Unchanged,
    /// Store the `--eof-value` byte (255 unless given).
    Sentinel,
}

/// Sentinel used by `--eof sentinel` without `--eof-value`.
pub const DEFAULT_EOF_SENTINEL: u8 = 255;

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Read the whole program from stdin and run it.
    Stdin,
    /// Run the program in this file.
    File(PathBuf),
    /// Transpile `input` to C in `output`.
    Convert { input: PathBuf, output: PathBuf },
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`, exiting with usage on error.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Parse a slice of argument strings, not including the program name
/// (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse_from(std::iter::once("bf").chain(argv.iter().map(String::as_str)))
}

impl CliArgs {
    pub fn mode(&self) -> Mode {
        if let Some([input, output]) = self.convert.as_deref() {
            return Mode::Convert {
                input: input.clone(),
                output: output.clone(),
            };
        }
        match &self.file {
            Some(path) => Mode::File(path.clone()),
            None => Mode::Stdin,
        }
    }

    /// Log filter for `-v` repetitions: warn, info, debug, then trace.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Build the effective engine configuration.
    ///
    /// Precedence: built-in defaults → config file → command-line flags.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let path = self.config.clone().or_else(find_config_file);
        let base = match path {
            Some(p) => EngineConfig::load_file(&p)?,
            None => EngineConfig::default(),
        };
        self.apply_overrides(base)
    }

    /// Layer the command-line flags over `config`.
    pub fn apply_overrides(&self, mut config: EngineConfig) -> Result<EngineConfig, ConfigError> {
        if let Some(n) = self.tape_size {
            config.tape_size = n;
        }
        if let Some(n) = self.max_program_len {
            config.max_program_len = n;
        }
        match (self.eof, self.eof_value) {
            (Some(EofMode::Unchanged), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "--eof-value cannot be combined with --eof unchanged".into(),
                ));
            }
            (Some(EofMode::Unchanged), None) => config.eof = EofPolicy::Unchanged,
            (Some(EofMode::Sentinel), v) => {
                config.eof = EofPolicy::Sentinel(v.unwrap_or(DEFAULT_EOF_SENTINEL));
            }
            (None, Some(v)) => config.eof = EofPolicy::Sentinel(v),
            (None, None) => {}
        }
        config.validate()?;
        Ok(config)
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Whether `path` names standard output (`-`) rather than a file.
pub fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

// ── Tests ─────────────────────────────────────────────────────────────────────
