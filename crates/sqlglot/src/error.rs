//! Configuration-level error taxonomy (spec §4.7, §7).

use std::fmt;

/// Why a dialect lookup failed. The only kind today, mirroring the
/// teacher's single-variant error types that leave room to grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownDialect(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownDialect(name) => write!(f, "unknown dialect {name:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
