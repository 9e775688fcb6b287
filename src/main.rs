use clap::Parser;
use std::process::ExitCode;
use xtaconv::Cli;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
