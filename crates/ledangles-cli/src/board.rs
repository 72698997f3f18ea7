use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::load::{self, LoadArgs, Source};

#[derive(Args, Debug, Clone)]
#[command(about = "Read LED placements from a KiCad board file")]
pub struct BoardArgs {
    /// The .kicad_pcb file
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    #[command(flatten)]
    pub load: LoadArgs,
}

pub fn execute(args: BoardArgs) -> Result<()> {
    let config = args.load.resolve()?;
    let placements = load::load(&args.input, Source::Board, &config)?;

    load::print_listing(&placements);
    load::print_summary(&args.input, &placements);
    Ok(())
}
