//! delambda: safely tear down VPC-attached AWS Lambda functions
//!
//! Detaches functions from their VPC (disabling IPv6 dual-stack first when
//! needed), deletes them, and cleans up their CloudWatch Logs log groups,
//! either one function at a time or for a whole CloudFormation stack.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use delambda::aws::AwsError;
use delambda::config::{AwsConfig, CliConfig, Target};
use delambda::output::{self, OutputFormat};
use delambda::teardown::WriterSink;
use delambda::{TeardownEngine, discovery};
use delambda_common::TeardownOptions;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "delambda")]
#[command(about = "Safely tear down VPC-attached AWS Lambda functions")]
#[command(version)]
struct Args {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct GlobalArgs {
    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    /// AWS profile to use
    #[arg(long, global = true, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl From<GlobalArgs> for CliConfig {
    fn from(args: GlobalArgs) -> Self {
        Self {
            aws: AwsConfig {
                region: args.region,
                profile: args.profile,
            },
            verbose: args.verbose,
        }
    }
}

/// A single function or a whole stack
#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["lambda", "stack"])))]
struct TargetArgs {
    /// Lambda function name
    #[arg(long)]
    lambda: Option<String>,

    /// CloudFormation stack name
    #[arg(long)]
    stack: Option<String>,
}

impl TargetArgs {
    fn into_target(self) -> Result<Target> {
        Target::from_flags(self.lambda, self.stack)
            .context("exactly one of --lambda or --stack is required")
    }
}

#[derive(clap::Args, Debug)]
struct DeleteArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Keep the function's CloudWatch Logs log group
    #[arg(long)]
    without_logs: bool,

    /// Delete without detaching from the VPC first
    #[arg(long)]
    no_detach: bool,

    /// Do not disable IPv6 dual-stack before detaching
    #[arg(long)]
    keep_ipv6: bool,
}

impl From<&DeleteArgs> for TeardownOptions {
    fn from(args: &DeleteArgs) -> Self {
        Self {
            detach_network: !args.no_detach,
            disable_ipv6: !args.keep_ipv6,
            delete_logs: !args.without_logs,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List Lambda functions and their VPC attachment
    List {
        /// Only list functions in this CloudFormation stack
        #[arg(long)]
        stack: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Detach functions from their VPC without deleting them
    Detach {
        #[command(flatten)]
        target: TargetArgs,

        /// Do not disable IPv6 dual-stack before detaching
        #[arg(long)]
        keep_ipv6: bool,
    },

    /// Detach and delete functions, and their log groups
    Delete(DeleteArgs),

    /// Delete a CloudWatch Logs log group
    DeleteLogs {
        /// Log group name, e.g. /aws/lambda/my-function
        log_group: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if let Some(hint) = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<AwsError>())
        .and_then(AwsError::suggestion)
    {
        let _ = writeln!(stderr, "  \x1b[36mHint:\x1b[0m {hint}");
    }

    // Only print backtrace hint if not already showing
    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    } else {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\n\x1b[2mBacktrace:\x1b[0m\n{backtrace}");
        }
    }
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_directives()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Command {
    /// Whether Ctrl-C should stop at the next step boundary instead of
    /// killing the process outright
    fn stops_gracefully(&self) -> bool {
        matches!(self, Command::Detach { .. } | Command::Delete(_))
    }
}

/// Cancel `token` on the first Ctrl-C so polling and batches stop at the next
/// boundary. A second Ctrl-C exits immediately.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, stopping after the current step (Ctrl-C again to abort)");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted again, aborting");
            std::process::exit(130);
        }
    });
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let config = CliConfig::from(args.global);
    init_tracing(&config);

    if let Some(profile) = &config.aws.profile {
        info!(profile = %profile, "Using AWS profile");
    }

    let aws = config.aws.load().await;
    info!(region = ?aws.region(), "Loaded AWS configuration");

    // Other commands keep the default SIGINT behaviour
    let cancel = CancellationToken::new();
    if args.command.stops_gracefully() {
        cancel_on_ctrl_c(cancel.clone());
    }

    let engine = TeardownEngine::from_context(&aws, WriterSink::stdout()).with_cancellation(cancel);

    match args.command {
        Command::List { stack, format } => {
            let functions = match &stack {
                Some(stack) => {
                    discovery::list_stack_functions(engine.functions(), engine.stacks(), stack)
                        .await
                        .with_context(|| format!("failed to list functions in stack {stack}"))?
                }
                None => discovery::list_functions(engine.functions())
                    .await
                    .context("failed to list functions")?,
            };

            if format == OutputFormat::Table {
                if functions.is_empty() {
                    println!("No Lambda functions found");
                    return Ok(());
                }
                println!("Found {} Lambda function(s):\n", functions.len());
            }
            println!("{}", output::render(&functions, format)?);
        }

        Command::Detach { target, keep_ipv6 } => match target.into_target()? {
            Target::Function(name) => {
                engine
                    .detach_one(&name, !keep_ipv6)
                    .await
                    .with_context(|| format!("failed to detach VPC from {name}"))?;
                println!("Successfully detached VPC from {name}");
            }
            Target::Stack(stack) => {
                engine
                    .detach_group(&stack, !keep_ipv6)
                    .await
                    .with_context(|| format!("failed to detach VPC in stack {stack}"))?;
                println!("Successfully detached VPC from all functions in stack {stack}");
            }
        },

        Command::Delete(delete_args) => {
            let options = TeardownOptions::from(&delete_args);
            match delete_args.target.into_target()? {
                Target::Function(name) => {
                    engine
                        .teardown_one(&name, options)
                        .await
                        .with_context(|| format!("failed to delete function {name}"))?;
                    println!("\nSuccessfully deleted function {name}");
                }
                Target::Stack(stack) => {
                    engine
                        .teardown_group(&stack, options)
                        .await
                        .with_context(|| format!("failed to delete functions in stack {stack}"))?;
                    println!("\nSuccessfully deleted all functions in stack {stack}");
                }
            }
        }

        Command::DeleteLogs { log_group } => {
            engine
                .delete_log_group(&log_group)
                .await
                .with_context(|| format!("failed to delete log group {log_group}"))?;
            println!("Successfully deleted log group {log_group}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_delete_flags_map_to_options() {
        let args = Args::parse_from(["delambda", "delete", "--lambda", "fn", "--keep-ipv6"]);
        let Command::Delete(delete) = args.command else {
            panic!("expected delete");
        };
        assert_eq!(
            TeardownOptions::from(&delete),
            TeardownOptions {
                detach_network: true,
                disable_ipv6: false,
                delete_logs: true,
            }
        );

        let args = Args::parse_from([
            "delambda",
            "delete",
            "--stack",
            "s",
            "--without-logs",
            "--no-detach",
        ]);
        let Command::Delete(delete) = args.command else {
            panic!("expected delete");
        };
        let options = TeardownOptions::from(&delete);
        assert!(!options.detach_network);
        assert!(!options.delete_logs);
        assert!(!options.should_disable_ipv6());
    }

    #[test]
    fn test_target_group_is_exclusive() {
        assert!(Args::try_parse_from(["delambda", "detach"]).is_err());
        assert!(
            Args::try_parse_from(["delambda", "detach", "--lambda", "a", "--stack", "b"]).is_err()
        );
        assert!(Args::try_parse_from(["delambda", "detach", "--stack", "b"]).is_ok());
    }

    #[test]
    fn test_only_mutating_commands_trap_ctrl_c() {
        let stops = |argv: &[&str]| {
            Args::parse_from(argv.iter().copied())
                .command
                .stops_gracefully()
        };

        assert!(stops(&["delambda", "delete", "--lambda", "fn"]));
        assert!(stops(&["delambda", "detach", "--stack", "s"]));
        assert!(!stops(&["delambda", "list"]));
        assert!(!stops(&["delambda", "delete-logs", "/aws/lambda/fn"]));
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let args = Args::parse_from([
            "delambda",
            "delete-logs",
            "/aws/lambda/fn",
            "--region",
            "eu-west-1",
            "-v",
        ]);
        let config = CliConfig::from(args.global);
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert!(config.verbose);
    }
}
