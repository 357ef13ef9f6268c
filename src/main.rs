// ABOUTME: Entry point for the rollout CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use rollout::config::{self, Config};
use rollout::error::{Error, Result};
use rollout::output::Output;
use rollout::release::Task;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());
    let errors = Output::new(cli.output_mode());

    if let Err(e) = run(cli, output).await {
        report_error(&errors, &e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init {
            service,
            artifact,
            force,
        } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, service.as_deref(), artifact.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Release(args) => {
            let config = load_config(config_path, args.destination.as_deref())?;
            commands::run_task(Task::Release, config, &args, output).await
        }
        Commands::Stop(args) => {
            let config = load_config(config_path, args.destination.as_deref())?;
            commands::run_task(Task::Stop, config, &args, output).await
        }
        Commands::Copy(args) => {
            let config = load_config(config_path, args.destination.as_deref())?;
            commands::run_task(Task::Copy, config, &args, output).await
        }
        Commands::Start(args) => {
            let config = load_config(config_path, args.destination.as_deref())?;
            commands::run_task(Task::Start, config, &args, output).await
        }
        Commands::Status { destination } => {
            let config = load_config(config_path, destination.as_deref())?;
            commands::status(config, output).await
        }
        Commands::Plan {
            task,
            target_dir,
            destination,
        } => {
            let config = load_config(config_path, destination.as_deref())?;
            commands::plan(task, config, target_dir.as_deref(), output)
        }
    }
}

fn load_config(path: Option<&Path>, destination: Option<&str>) -> Result<Config> {
    let config = match path {
        Some(path) if !path.exists() => return Err(Error::ConfigNotFound(path.to_path_buf())),
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    // Apply destination overrides if specified
    match destination {
        Some(dest) => config.for_destination(dest),
        None => Ok(config),
    }
}

/// Print the error and whatever the failing command wrote.
fn report_error(output: &Output, error: &Error) {
    if let Error::Release(e) = error
        && let Some(process) = e.process_error()
    {
        output.command_output("stdout", process.stdout());
        output.command_output("stderr", process.stderr());
    }
    output.error(&error.to_string());
}
