use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jira_describe::cli::Args;
use jira_describe::{app, ui, Error};

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(args.log_level().into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || app::run(args));

    match result {
        Ok(_) => {}
        Err(Error::Cancelled) => {
            println!("\nShutting down...");
            process::exit(Error::Cancelled.exit_code());
        }
        Err(err) => {
            ui::error(&err.to_string());
            process::exit(err.exit_code());
        }
    }
}
