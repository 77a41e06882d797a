//! jokester-e2e - provision, verify, and tear down the jokester function

use std::process::ExitCode;

use clap::Parser;

use jokester_e2e::cli::{Cli, error_code};
use jokester_e2e::{logging, output};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json = cli.json;

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                match output::json::format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
