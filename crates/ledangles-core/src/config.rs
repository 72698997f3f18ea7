//! `ledangles.toml` settings.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::PartFilter;
use crate::normalize::{Normalization, SplitParams};
use crate::spiral::SpiralLayout;

pub const CONFIG_FILE_NAME: &str = "ledangles.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeKind {
    #[default]
    Raw,
    Wrap,
    Split,
}

/// Settings left unset fall back to [`PartFilter::default`] and to the
/// normalization each caller asks for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Designator prefix of the parts to analyze.
    pub prefix: Option<String>,
    /// Designators to leave out even when the prefix matches.
    pub exclude: Option<Vec<String>>,
    pub normalize: Option<NormalizeKind>,
    pub split: SplitParams,
    pub spirals: SpiralLayout,
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `ledangles.toml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Part filter with unset fields taken from the default LED filter.
    pub fn filter(&self) -> PartFilter {
        let defaults = PartFilter::default();
        PartFilter {
            prefix: self.prefix.clone().unwrap_or(defaults.prefix),
            exclude: self.exclude.clone().unwrap_or(defaults.exclude),
        }
    }

    /// The part filter, but only when a prefix or exclusion list was set.
    pub fn explicit_filter(&self) -> Option<PartFilter> {
        (self.prefix.is_some() || self.exclude.is_some()).then(|| self.filter())
    }

    /// Normalization policy, [`NormalizeKind::Raw`] when unset.
    pub fn normalization(&self) -> Normalization {
        self.normalization_or(NormalizeKind::default())
    }

    pub fn normalization_or(&self, fallback: NormalizeKind) -> Normalization {
        match self.normalize.unwrap_or(fallback) {
            NormalizeKind::Raw => Normalization::Raw,
            NormalizeKind::Wrap => Normalization::Wrap,
            NormalizeKind::Split => self.split.into(),
        }
    }
}
