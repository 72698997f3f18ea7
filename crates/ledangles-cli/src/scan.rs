use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::load::{self, LoadArgs, Source};

#[derive(Args, Debug, Clone)]
#[command(about = "Extract LED placements from `grep -A1 '(at '` output")]
pub struct ScanArgs {
    /// Text dump with `(at x y angle)` lines followed by reference lines
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    #[command(flatten)]
    pub load: LoadArgs,
}

pub fn execute(args: ScanArgs) -> Result<()> {
    let config = args.load.resolve()?;
    let placements = load::load(&args.input, Source::Scan, &config)?;

    load::print_listing(&placements);
    load::print_summary(&args.input, &placements);
    Ok(())
}
