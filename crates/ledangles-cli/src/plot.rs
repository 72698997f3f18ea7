use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use ledangles_core::group_spirals;
use ledangles_plot::PlotKind;
use std::path::{Path, PathBuf};

use crate::load::{self, LoadArgs, Source};
use crate::style;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindArg {
    /// Rotation against LED number, one trace per spiral
    #[default]
    Scatter,
    /// Rotations around a circle, one ring per spiral
    Polar,
    /// LED positions on the board
    Positions,
}

impl From<KindArg> for PlotKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Scatter => PlotKind::Scatter,
            KindArg::Polar => PlotKind::Polar,
            KindArg::Positions => PlotKind::Positions,
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(about = "Plot LED rotations grouped by spiral")]
pub struct PlotArgs {
    /// The .kicad_pcb file, or a grep dump when --scan is given
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Treat the input as a grep dump instead of a board file
    #[arg(long)]
    pub scan: bool,

    /// Which plot to draw
    #[arg(long, value_enum, default_value_t = KindArg::Scatter)]
    pub kind: KindArg,

    /// SVG file to write. Defaults to <FILE stem>-<kind>.svg next to the input
    #[arg(short, long, value_name = "SVG", value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub load: LoadArgs,
}

pub fn execute(args: PlotArgs) -> Result<()> {
    let config = args.load.resolve()?;
    let source = if args.scan { Source::Scan } else { Source::Board };
    let placements = load::load(&args.input, source, &config)?;
    load::print_summary(&args.input, &placements);

    let kind = PlotKind::from(args.kind);
    let spirals = group_spirals(&placements, &config.spirals);
    let document = ledangles_plot::render(kind, &spirals, &config.spirals);

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.input, kind));
    ledangles_plot::save(&document, &output)?;

    eprintln!(
        "{} {} plot written to {}",
        style::success(),
        kind,
        output.display().to_string().green().bold()
    );
    Ok(())
}

fn default_output(input: &Path, kind: PlotKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledangles".to_string());
    input.with_file_name(format!("{stem}-{kind}.svg"))
}
