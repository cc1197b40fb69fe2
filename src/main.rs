//! webdavfs command-line entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use webdavfs::cli::{self, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.output.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.remote.to_config()?;
    let fs = webdavfs::connect(config)?;
    let stdout = std::io::stdout();
    cli::run(&fs, &args.command, &mut stdout.lock())
}
