use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

mod cli_bin;

use cli_bin::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let stdout = std::io::stdout();
    cli_bin::commands::execute(cli, stdout.lock())?;
    Ok(())
}

/// `RUST_LOG` wins over the verbosity flags when set
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
