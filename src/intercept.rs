// Process-wide remapper state and the interception entry points

pub mod host;
pub mod pipelines;
pub mod real;
pub mod registry;

#[cfg(not(test))]
mod hooks;

#[cfg(test)]
pub mod fake;

use std::sync::{Arc, OnceLock};

use tracing::{error, info};

use crate::config::{ConfigError, Section, load_sections};
use crate::device::MismatchLog;
use registry::Registry;

/// Compiled sections plus the descriptors captured so far.
pub struct Remapper {
    pub sections: Vec<Arc<Section>>,
    /// Some enabled section rejects devices no section matches.
    pub drop_unmatched: bool,
    pub registry: Registry,
    pub mismatches: MismatchLog,
}

impl Remapper {
    pub fn new(sections: Vec<Section>) -> Self {
        let drop_unmatched = sections.iter().any(|s| s.drop_unmatched_devices);
        Self {
            sections: sections.into_iter().map(Arc::new).collect(),
            drop_unmatched,
            registry: Registry::default(),
            mismatches: MismatchLog::default(),
        }
    }
}

static REMAPPER: OnceLock<Remapper> = OnceLock::new();

/// Load the configuration and activate interception. On any configuration
/// error the remapper stays inactive and every hook passes straight through.
pub fn install() -> bool {
    let sections = match load_sections() {
        Ok(sections) => sections,
        Err(e @ ConfigError::NotFound { .. }) => {
            info!("{e}; remapper inactive");
            return false;
        }
        Err(e) => {
            error!("{e}; remapper inactive");
            return false;
        }
    };
    info!("{} remap section(s) enabled", sections.len());
    REMAPPER.set(Remapper::new(sections)).is_ok()
}

/// `None` until [`install`] has finished, and forever after a failed install.
pub fn state() -> Option<&'static Remapper> {
    REMAPPER.get()
}
