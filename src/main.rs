use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use std::path::PathBuf;

use connect4_engine::AppConfig;

mod logger;
mod terminal;

/// Two-player Connect 4 in the terminal
#[derive(Parser, Debug)]
#[command(name = "connect4_duel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "connect4.toml")]
    config: PathBuf,

    /// Seconds per turn, overrides the configuration file
    #[arg(short, long)]
    time_per_turn: Option<u32>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    // collect warnings from loading the configuration too
    logger::init(LevelFilter::Warn)?;

    let mut config = AppConfig::load_or_default(&args.config)?;
    if let Some(time_per_turn) = args.time_per_turn {
        config.game.time_per_turn = time_per_turn;
        config.validate()?;
    }
    log::set_max_level(config.log.level);

    terminal::run(&config.game)
}
