use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use github_oidc_trust::{config_schema, TrustPolicyBuilder};
use log::{debug, info};

mod stack;

use stack::StackArgs;

#[derive(Parser, Debug)]
#[command(
    name = "github-oidc-trust",
    version,
    about = "Declare the IAM OIDC provider and deploy role that GitHub Actions workflows assume"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the declared provider registration and deploy role as JSON
    Plan {
        #[command(flatten)]
        stack: StackArgs,
    },
    /// Print or write the CloudFormation template for the stack
    Synth {
        #[command(flatten)]
        stack: StackArgs,

        /// Write the template to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the derived subject patterns, one per line
    Patterns {
        #[command(flatten)]
        stack: StackArgs,
    },
    /// Print the JSON schema of the stack configuration file
    Schema,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Plan { stack } => {
            let config = stack.resolve()?;
            let builder = TrustPolicyBuilder::for_stack(&config);
            let plan = builder.plan_stack(&config);
            println!("{}", plan.state.to_json_pretty()?);
        }
        Commands::Synth { stack, output } => {
            let config = stack.resolve()?;
            let builder = TrustPolicyBuilder::for_stack(&config);
            let template = builder.synth(&config).to_json_pretty()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{template}\n"))
                        .with_context(|| format!("Failed to write template to {}", path.display()))?;
                    info!("Wrote template to {}", path.display());
                }
                None => println!("{template}"),
            }
        }
        Commands::Patterns { stack } => {
            let config = stack.resolve()?;
            let builder = TrustPolicyBuilder::for_stack(&config);
            let plan = builder.plan_stack(&config);
            for pattern in &plan.state.deploy_role.condition.patterns {
                println!("{pattern}");
            }
        }
        Commands::Schema => {
            let schema = serde_json::to_string_pretty(&config_schema())
                .context("Failed to serialize configuration schema")?;
            println!("{schema}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("{:?}", cli.command);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
