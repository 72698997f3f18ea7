use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use ledangles_core::{board, extract_file, Config, NormalizeKind, Placements};
use log::debug;
use std::path::{Path, PathBuf};

use crate::style;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeArg {
    /// Angles as found on the board
    Raw,
    /// Wrap into (-180, 180]
    Wrap,
    /// Lift steep negative angles of the first LEDs by a full turn
    Split,
}

impl From<NormalizeArg> for NormalizeKind {
    fn from(arg: NormalizeArg) -> Self {
        match arg {
            NormalizeArg::Raw => NormalizeKind::Raw,
            NormalizeArg::Wrap => NormalizeKind::Wrap,
            NormalizeArg::Split => NormalizeKind::Split,
        }
    }
}

/// Options shared by every command that reads placements.
#[derive(Args, Debug, Default, Clone)]
pub struct LoadArgs {
    /// Settings file. When omitted, ./ledangles.toml is used if it exists
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Keep only designators starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Leave out this designator. Repeat to exclude several; replaces the
    /// configured list
    #[arg(long, value_name = "DESIGNATOR")]
    pub exclude: Vec<String>,

    /// How rotation angles are normalized before output. Defaults to `raw`
    /// for grep dumps and `split` for board files
    #[arg(long, value_enum)]
    pub normalize: Option<NormalizeArg>,
}

impl LoadArgs {
    /// The config file (given or discovered) with command-line overrides on top.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::discover(&std::env::current_dir()?)?,
        };

        if let Some(prefix) = &self.prefix {
            config.prefix = Some(prefix.clone());
        }
        if !self.exclude.is_empty() {
            config.exclude = Some(self.exclude.clone());
        }
        if let Some(normalize) = self.normalize {
            config.normalize = Some(normalize.into());
        }

        debug!("Effective config: {config:?}");
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Scan,
    Board,
}

impl Source {
    /// Grep dumps are listed as found; board angles get the spiral fix-up.
    pub fn default_normalization(self) -> NormalizeKind {
        match self {
            Source::Scan => NormalizeKind::Raw,
            Source::Board => NormalizeKind::Split,
        }
    }
}

/// Read, filter, and normalize placements from `path`.
///
/// Board files always go through the part filter. Grep dumps keep every
/// record unless a prefix or exclusion list was set.
pub fn load(path: &Path, source: Source, config: &Config) -> Result<Placements> {
    let placements = match source {
        Source::Scan => {
            let all = extract_file(path)
                .with_context(|| format!("Failed to scan {}", path.display()))?;
            match config.explicit_filter() {
                Some(filter) => filter.apply(&all),
                None => all,
            }
        }
        Source::Board => board::load_file(path, &config.filter())
            .with_context(|| format!("Failed to load board {}", path.display()))?,
    };

    let normalization = config.normalization_or(source.default_normalization());
    debug!("Normalizing {} placements with {normalization:?}", placements.len());
    Ok(normalization.apply(&placements))
}

pub fn print_listing(placements: &Placements) {
    for record in placements {
        println!("{record}");
    }
}

pub fn print_summary(path: &Path, placements: &Placements) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if placements.is_empty() {
        eprintln!("{} {}: no LEDs found", style::warning(), file_name.bold());
    } else {
        eprintln!(
            "{} {} ({} LEDs)",
            style::success(),
            file_name.green().bold(),
            placements.len()
        );
    }
}
