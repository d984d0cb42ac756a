//! Engine configuration and the `config.toml` loader.
//!
//! Every key is optional; missing keys keep their defaults:
//!
//! | Key | Default | Meaning |
//! |-----|---------|---------|
//! | `tape_size` | `30000` | number of cells on the tape |
//! | `max_program_len` | `30000` | largest accepted source, in bytes |
//! | `eof` | `"unchanged"` | end-of-input policy, or `{ sentinel = <byte> }` |
//!
//! Command-line flags are applied on top of the file by the binary.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Tape length used when nothing else is configured.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// Source length limit used when nothing else is configured.
pub const DEFAULT_MAX_PROGRAM_LEN: usize = 30_000;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BF_CONFIG";

// ── Public types ──────────────────────────────────────────────────────────────

/// What the input instruction (`,`) does once the input stream is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EofPolicy {
    /// Leave the current cell untouched.
    #[default]
    Unchanged,
    /// Store this byte in the current cell.  `255` matches what C's
    /// `getchar()` leaves behind when its `EOF` is truncated to a byte.
    Sentinel(u8),
}

/// Settings shared by the interpreter and the transpiler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub tape_size: usize,
    pub max_program_len: usize,
    pub eof: EofPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            max_program_len: DEFAULT_MAX_PROGRAM_LEN,
            eof: EofPolicy::default(),
        }
    }
}

/// A config file could not be loaded or holds unusable values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl EngineConfig {
    /// Parse a TOML config string and check the result.
    pub fn load_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file from disk.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::load_str(&s)?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tape_size == 0 {
            return Err(ConfigError::Invalid("tape_size must be at least 1".into()));
        }
        if self.max_program_len == 0 {
            return Err(ConfigError::Invalid("max_program_len must be at least 1".into()));
        }
        Ok(())
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Locate the config file to load when none was named on the command line.
///
/// Priority: `$BF_CONFIG` → `<platform config dir>/config.toml` →
/// `./.bfrc.toml`.  `$BF_CONFIG` is returned even if it does not exist, so a
/// typo surfaces as an error instead of being silently ignored.
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    let platform = directories::ProjectDirs::from("", "", "bf")
        .map(|dirs| dirs.config_dir().join("config.toml"));
    platform
        .into_iter()
        .chain(std::iter::once(PathBuf::from(".bfrc.toml")))
        .find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = EngineConfig::load_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.tape_size, 30_000);
        assert_eq!(cfg.max_program_len, 30_000);
        assert_eq!(cfg.eof, EofPolicy::Unchanged);
    }

    #[test]
    fn sizes_override() {
        let cfg = EngineConfig::load_str("tape_size = 64\nmax_program_len = 128\n").unwrap();
        assert_eq!(cfg.tape_size, 64);
        assert_eq!(cfg.max_program_len, 128);
    }

    #[test]
    fn eof_unchanged_string() {
        let cfg = EngineConfig::load_str(r#"eof = "unchanged""#).unwrap();
        assert_eq!(cfg.eof, EofPolicy::Unchanged);
    }

    #[test]
    fn eof_sentinel_table() {
        let cfg = EngineConfig::load_str("eof = { sentinel = 255 }").unwrap();
        assert_eq!(cfg.eof, EofPolicy::Sentinel(255));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = EngineConfig::load_str("circular_tape = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn sentinel_out_of_byte_range_rejected() {
        assert!(EngineConfig::load_str("eof = { sentinel = 256 }").is_err());
    }

    #[test]
    fn zero_tape_rejected() {
        let err = EngineConfig::load_str("tape_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err:?}");
    }

    #[test]
    fn zero_program_limit_rejected() {
        assert!(EngineConfig::load_str("max_program_len = 0").is_err());
    }

    #[test]
    fn load_file_reads_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "tape_size = 10").unwrap();
        let cfg = EngineConfig::load_file(f.path()).unwrap();
        assert_eq!(cfg.tape_size, 10);
    }

    #[test]
    fn load_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
        assert!(err.to_string().contains("nope.toml"));
    }
}
