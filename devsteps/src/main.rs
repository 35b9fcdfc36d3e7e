//! Project bootstrap and CI helper steps.
//!
//! `devsteps run git-root composer-install load-env composer-test` executes
//! the named steps in order inside one process, so variables loaded by
//! `load-env` reach every command spawned afterwards. The first failing step
//! ends the run with a non-zero exit code.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devsteps::context::StepContext;
use devsteps::core::error::StepError;
use devsteps::core::step::{BootstrapPolicy, Step};
use devsteps::exit_codes;
use devsteps::io::config::{DEFAULT_CONFIG_FILE, DevstepsConfig, load_config, render_config};
use devsteps::io::executor::SystemExecutor;
use devsteps::logging;
use devsteps::steps::StepRunner;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "devsteps",
    version,
    about = "Project bootstrap and CI helper steps"
)]
struct Cli {
    /// Configuration file (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override whether `bootstrap` requires its script to exist.
    #[arg(long, global = true, value_enum)]
    bootstrap_policy: Option<BootstrapPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run steps in the given order, stopping at the first failure.
    Run {
        #[arg(required = true, value_enum)]
        steps: Vec<Step>,
    },
    /// List available steps.
    List,
    /// Print the effective configuration as TOML.
    Config,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        let code = match err.downcast_ref::<StepError>() {
            Some(step_err) => {
                debug!(kind = %step_err.kind(), "step failed");
                exit_codes::for_error(step_err)
            }
            None => exit_codes::FAILURE,
        };
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = effective_config(&cli)?;
    match cli.command {
        Command::Run { steps } => cmd_run(&config, &steps),
        Command::List => {
            cmd_list();
            Ok(())
        }
        Command::Config => cmd_config(&config),
    }
}

fn effective_config(cli: &Cli) -> Result<DevstepsConfig> {
    let mut config = load_config(&cli.config)?;
    if let Some(policy) = cli.bootstrap_policy {
        config.scripts.bootstrap_policy = policy;
    }
    Ok(config)
}

fn cmd_run(config: &DevstepsConfig, steps: &[Step]) -> Result<()> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let mut ctx = StepContext::new(cwd);
    let executor = SystemExecutor::new(config.command_timeout());
    let mut runner = StepRunner::new(&executor, config, io::stdout());
    runner.run_sequence(steps, &mut ctx)?;
    Ok(())
}

fn cmd_list() {
    let width = Step::ALL
        .iter()
        .map(|step| step.name().len())
        .max()
        .unwrap_or(0);
    for step in Step::ALL {
        println!("{:width$}  {}", step.name(), step.summary());
    }
}

fn cmd_config(config: &DevstepsConfig) -> Result<()> {
    print!("{}", render_config(config)?);
    Ok(())
}
