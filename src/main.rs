use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use letterbox::config::{load_config, print_schema};
use letterbox::startup;
use letterbox::utils::logger::init_logging;

#[derive(Parser, Debug)]
#[command(name = "letterbox", version, about = "Notes client session and navigation server")]
struct Args {
    /// YAML configuration file.
    #[arg(long, env = "LETTERBOX_CONFIG", default_value = "./config.yaml")]
    config: PathBuf,

    /// Print the configuration JSON schema and exit.
    #[arg(long)]
    schema: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if args.schema {
        print_schema();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Error loading configuration from {}: {}",
                args.config.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match startup::run(Arc::new(config)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
