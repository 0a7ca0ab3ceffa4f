use clap::Parser;

use ecopack_cli::Cli;

fn main() -> anyhow::Result<()> {
    ecopack_observability::init();
    Cli::parse().run()
}
