// Configuration errors; any of these leaves the remapper inactive

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error parsing map on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{kind} pattern error on line {line}: {source}")]
    Pattern {
        line: usize,
        kind: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("section {section}: match pattern required")]
    MissingMatch { section: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no configuration file found (tried {})", tried.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    NotFound { tried: Vec<PathBuf> },

    #[error("EV_JOY_REMAP_ENABLE pattern error: {0}")]
    EnablePattern(#[source] regex::Error),

    #[error("No sections enabled for remapper; disabled")]
    NoSectionsEnabled,
}

impl ConfigError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
