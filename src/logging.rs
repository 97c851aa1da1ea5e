// Diagnostic log: file or stderr, level from the environment

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::paths::{ENV_LOG, ENV_LOG_LEVEL, env_value};

pub const DEFAULT_LEVEL: &str = "info";

/// Truncate and log to `path` (e.g. `/dev/tty`); stderr when unset or unopenable.
pub fn log_writer(path: Option<&str>) -> BoxMakeWriter {
    match path.map(File::create) {
        Some(Ok(file)) => BoxMakeWriter::new(Mutex::new(file)),
        _ => BoxMakeWriter::new(std::io::stderr),
    }
}

pub fn level_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber. A host that already installed one keeps it.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level_filter(env_value(ENV_LOG_LEVEL).as_deref()))
        .with_writer(log_writer(env_value(ENV_LOG).as_deref()))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info};

    fn capture(directive: Option<&str>) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remap.log");
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(level_filter(directive))
            .with_writer(log_writer(path.to_str()))
            .with_ansi(false)
            .with_target(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            info!("Installed event device remapper");
            debug!("closing 7");
        });
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn default_level_is_info() {
        let text = capture(None);
        assert!(text.contains("Installed event device remapper"));
        assert!(!text.contains("closing 7"));
    }

    #[test]
    fn directive_raises_level() {
        assert!(capture(Some("debug")).contains("closing 7"));
    }
}
