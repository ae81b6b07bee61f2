//! Command-line inspection of a Doxygen XML output directory.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
