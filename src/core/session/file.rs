use crate::core::config::data::{path_display, Config};
use crate::core::config::io::{project_dirs, write_atomically, ConfigError};
use crate::core::recency::RecencyLog;
use crate::core::session::draft::SessionDrafts;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur when loading the session file.
#[derive(Debug)]
pub enum SessionError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Read { path, source } => {
                write!(f, "Failed to read session at {}: {}", path_display(path), source)
            }
            SessionError::Parse { path, source } => {
                write!(f, "Failed to parse session at {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for SessionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SessionError::Read { source, .. } => Some(source),
            SessionError::Parse { source, .. } => Some(source),
        }
    }
}

/// Everything that outlives one CLI invocation: drafts, the pinned flag, and
/// recency stamps. Selections themselves are rebuilt from the drafts.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub drafts: SessionDrafts,
    #[serde(default)]
    pub recency: RecencyLog,
}

impl SessionFile {
    pub fn load_from_path(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| SessionError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        write_atomically(path, &contents)
    }

    /// `session_file` from the config, else `session.toml` in the data dir.
    pub fn resolve_path(config: &Config) -> Result<PathBuf, ConfigError> {
        match &config.session_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("session.toml")),
        }
    }
}
