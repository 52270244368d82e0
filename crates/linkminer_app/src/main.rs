mod cli;
mod config;
mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    platform::logging::initialize(cli.log);

    let file_config = match cli.config.as_deref() {
        Some(path) => config::load(path)?,
        None => config::FileConfig::default(),
    };
    let settings = config::resolve(&cli, file_config)?;

    platform::run_app(settings)
}
