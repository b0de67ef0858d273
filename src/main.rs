use anyhow::Result;
use bankea::cli::Cli;
use bankea::logging::init_logging;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.run()
}
