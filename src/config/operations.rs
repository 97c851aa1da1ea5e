// Locate, read and compile the configuration file

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use regex::Regex;
use tracing::debug;

use super::error::ConfigError;
use super::parser::compile;
use super::types::Section;
use crate::paths::{CONFIG_CANDIDATES, ENV_ENABLE, env_value};

/// Read the first candidate that exists.
pub fn read_config(candidates: &[PathBuf]) -> Result<(PathBuf, String), ConfigError> {
    for path in candidates {
        match fs::read_to_string(path) {
            Ok(text) => return Ok((path.clone(), text)),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.clone(),
                    source,
                });
            }
        }
    }
    Err(ConfigError::NotFound {
        tried: candidates.to_vec(),
    })
}

/// Keep only sections whose name (`""` when unnamed) matches `pattern`.
pub fn enabled_sections(
    sections: Vec<Section>,
    pattern: Option<&str>,
) -> Result<Vec<Section>, ConfigError> {
    let Some(pattern) = pattern else {
        return Ok(sections);
    };
    let enable = Regex::new(pattern).map_err(ConfigError::EnablePattern)?;
    let enabled: Vec<Section> = sections
        .into_iter()
        .filter(|s| enable.is_match(s.name.as_deref().unwrap_or("")))
        .collect();
    if enabled.is_empty() {
        return Err(ConfigError::NoSectionsEnabled);
    }
    Ok(enabled)
}

/// Full startup load: search list, compile, `EV_JOY_REMAP_ENABLE` filter.
pub fn load_sections() -> Result<Vec<Section>, ConfigError> {
    let (path, text) = read_config(&CONFIG_CANDIDATES)?;
    debug!("Reading remap configuration from {}", path.display());
    let sections = compile(&text)?;
    enabled_sections(sections, env_value(ENV_ENABLE).as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.conf");
        let present = dir.path().join("present.conf");
        let mut file = fs::File::create(&present).unwrap();
        writeln!(file, "match pad").unwrap();

        let (path, text) = read_config(&[missing, present.clone()]).unwrap();
        assert_eq!(path, present);
        assert_eq!(text, "match pad\n");
    }

    #[test]
    fn nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.conf");
        match read_config(&[missing.clone()]) {
            Err(ConfigError::NotFound { tried }) => assert_eq!(tried, vec![missing]),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn unreadable_candidate_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory exists but cannot be read as text
        assert!(matches!(
            read_config(&[dir.path().to_path_buf()]),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn enable_filter_by_section_name() {
        let text = "match a\nsection pad\nmatch b\nsection wheel\nmatch c\n";
        let all = compile(text).unwrap();
        assert_eq!(enabled_sections(all.clone(), None).unwrap().len(), 3);

        let only = enabled_sections(all.clone(), Some("^pad$")).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name.as_deref(), Some("pad"));

        let unnamed = enabled_sections(all.clone(), Some("^$")).unwrap();
        assert_eq!(unnamed[0].name, None);

        assert!(matches!(
            enabled_sections(all.clone(), Some("nothing")),
            Err(ConfigError::NoSectionsEnabled)
        ));
        assert!(matches!(
            enabled_sections(all, Some("(")),
            Err(ConfigError::EnablePattern(_))
        ));
    }
}
