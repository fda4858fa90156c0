// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use slice_scanner_runtime::cli;
use slice_scanner_runtime::config::CollectorConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slicescan",
    about = "Slice Scanner: pizza catalog extraction from vendor ordering sites",
    version,
    after_help = "Run 'slicescan <command> --help' for details on each command.\nRun 'slicescan' with no command to start the schedule."
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one extraction over every vendor
    Run {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run extractions on a cron schedule until interrupted
    Schedule {
        #[command(flatten)]
        output: OutputArgs,
        /// Cron expression with seconds field (overrides SLICE_SCANNER_SCHEDULE)
        #[arg(long)]
        cron: Option<String>,
        /// Wait for the first fire time instead of running immediately
        #[arg(long)]
        no_run_on_start: bool,
    },
    /// Print vendor registrations as JSON
    Vendors,
    /// Print upcoming fire times of the schedule
    Next {
        /// Cron expression (defaults to the configured schedule)
        #[arg(long)]
        cron: Option<String>,
        /// Number of fire times to print
        #[arg(long, default_value = "5")]
        count: usize,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// JSONL catalog path (overrides SLICE_SCANNER_CATALOG)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Chromium executable (overrides SLICE_SCANNER_CHROMIUM_PATH)
    #[arg(long)]
    chromium: Option<PathBuf>,
}

impl OutputArgs {
    fn apply(self, config: &mut CollectorConfig) {
        if let Some(catalog) = self.catalog {
            config.catalog_path = catalog;
        }
        if let Some(chromium) = self.chromium {
            config.chromium_path = Some(chromium);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = CollectorConfig::from_env();
    let result = match cli.command {
        None => cli::collect::schedule(&config).await,
        Some(Commands::Run { output }) => {
            output.apply(&mut config);
            cli::collect::run(&config).await
        }
        Some(Commands::Schedule {
            output,
            cron,
            no_run_on_start,
        }) => {
            output.apply(&mut config);
            if let Some(cron) = cron {
                config.schedule = cron;
            }
            if no_run_on_start {
                config.run_on_start = false;
            }
            cli::collect::schedule(&config).await
        }
        Some(Commands::Vendors) => cli::vendors_cmd::run(&config),
        Some(Commands::Next { cron, count }) => {
            cli::next_cmd::run(cron.as_deref().unwrap_or(&config.schedule), count)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "slicescan", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
