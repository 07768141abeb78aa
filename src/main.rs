use std::process::ExitCode;

use clap::Parser;

use pocketpp::app::{failure_message, App};
use pocketpp::cli::Cli;
use pocketpp::config::Config;
use pocketpp::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the config file, so load errors go straight to stderr
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Error: failed to set up logging: {}", e);
        return ExitCode::FAILURE;
    }

    let app = match App::new(config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout();
    match app.handle_command(cli.command.clone(), &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, command = ?cli.command, "Command failed");
            println!("{}", failure_message(&cli.command, &e));
            ExitCode::FAILURE
        }
    }
}
