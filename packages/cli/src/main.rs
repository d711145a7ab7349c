//! Main entry point for the jwtsmith CLI

mod cli;
mod logging;

use clap::Parser;
use cli::Cli;
use logging::LoggingTransformer;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    LoggingTransformer::init();

    let cli = Cli::parse();
    let result = cli.run().await;
    let output = cli.render(&result);

    match result {
        Ok(_) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(_) if cli.json => {
            println!("{output}");
            ExitCode::FAILURE
        }
        Err(_) => {
            eprintln!("{output}");
            ExitCode::FAILURE
        }
    }
}
