//! CLI entry point for diffing canvas tiles against templates

use clap::Parser;
use tilediff::io::cli::{Cli, TileProcessor};
use tilediff::io::logging;

fn main() -> tilediff::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let mut processor = TileProcessor::new(cli)?;
    processor.process()?;
    Ok(())
}
