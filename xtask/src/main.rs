mod findup;
mod matrix;
mod sh;

use clap::{Parser, Subcommand};

/// xtask command-line interface
#[derive(Parser)]
#[command(name = "xtask", version, about = "Bootcode auxiliary tasks")]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build or check every package for every Arm target listed in `matrix.yaml`
    Matrix(matrix::MatrixArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Matrix(args) => matrix::run(args),
    };

    if let Err(e) = result {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
