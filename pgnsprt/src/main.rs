use std::process::ExitCode;

use clap::Parser;
use pgnsprt::config::Args;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();
    ExitCode::from(pgnsprt::exit_status(&pgnsprt::run(&args)))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// cargo run -p pgnsprt -r -- --elo0 0 --elo1 5 games/*.pgn
// cat games.pgn | cargo run -p pgnsprt -r -- --player1 dev --games 2000
