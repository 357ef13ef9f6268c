// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use rollout::output::OutputMode;
use rollout::release::Task;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollout")]
#[command(about = "Stop a service, replace its artifact, and start it again")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: rollout.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskArgs {
    /// Deployment directory (overrides the config file)
    #[arg(short, long)]
    pub target_dir: Option<PathBuf>,

    /// Target destination (defined in config)
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Break an existing release lock
    #[arg(long)]
    pub force: bool,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new rollout.yml configuration file
    Init {
        /// Service name as known to the service manager
        #[arg(long)]
        service: Option<String>,

        /// Path to the built artifact
        #[arg(long)]
        artifact: Option<String>,

        /// Overwrite an existing rollout.yml
        #[arg(long)]
        force: bool,
    },

    /// Stop the service, copy the artifact, and start the service
    Release(TaskArgs),

    /// Stop the service
    Stop(TaskArgs),

    /// Stop the service and copy the artifact
    Copy(TaskArgs),

    /// Stop, copy, and start (same steps as release)
    Start(TaskArgs),

    /// Show whether the service is running
    Status {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },

    /// Show the commands a task would run, without running them
    Plan {
        /// Task to plan: stop, copy, start, or release
        #[arg(default_value = "release")]
        task: Task,

        /// Deployment directory (overrides the config file)
        #[arg(short, long)]
        target_dir: Option<PathBuf>,

        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },
}
