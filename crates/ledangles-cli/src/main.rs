use clap::{Parser, Subcommand};

mod board;
mod load;
mod plot;
mod scan;
mod style;

#[derive(Parser)]
#[command(name = "ledangles")]
#[command(about = "Rotation report for the LED spirals of a KiCad board", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List placements found in a grep dump of a board file
    #[command(alias = "s")]
    Scan(scan::ScanArgs),

    /// List placements read directly from a .kicad_pcb file
    #[command(alias = "b")]
    Board(board::BoardArgs),

    /// Render LED rotations as an SVG plot
    #[command(alias = "p")]
    Plot(plot::PlotArgs),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => scan::execute(args),
        Commands::Board(args) => board::execute(args),
        Commands::Plot(args) => plot::execute(args),
    }
}
