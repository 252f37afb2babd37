use clap::Parser;
use broad_trails::{app, cli::Args};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{:?}", args);
    app::run(args)
}
