//! Pricing Forms Entry Point

use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use forms_client::HttpPricingClient;
use forms_gui::headless::parse_key_val;
use forms_gui::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pricing Forms - option and bond pricers in the terminal
#[derive(Parser, Debug)]
#[command(name = "forms-gui")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "PRICING_FORMS_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL the endpoint paths are joined onto
    #[arg(long, global = true)]
    script_root: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log file (the TUI only logs when one is set)
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// What to do when a radio group has no selection (submit, block)
    #[arg(long, global = true)]
    missing_selection: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive terminal forms (default)
    Tui,
    /// Price an option once and print the results
    Option(FormArgs),
    /// Price a bond once and print the results
    Bond(FormArgs),
}

#[derive(Args, Debug)]
struct FormArgs {
    /// Input field value, repeatable (e.g. --set strikePrice=105)
    #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_key_val)]
    values: Vec<(String, String)>,

    /// Radio button to check (e.g. --check call)
    #[arg(long = "check", value_name = "ID")]
    checks: Vec<String>,
}

impl From<&Cli> for CliArgs {
    fn from(cli: &Cli) -> Self {
        CliArgs {
            config_file: cli.config.clone(),
            script_root: cli.script_root.clone(),
            log_level: cli.log_level.clone(),
            log_file: cli.log_file.clone(),
            missing_selection: cli.missing_selection.clone(),
        }
    }
}

impl From<FormArgs> for FormInput {
    fn from(args: FormArgs) -> Self {
        FormInput {
            values: args.values,
            checks: args.checks,
        }
    }
}

fn env_filter(log_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level))
}

/// Tracing for the TUI: never the terminal it draws on
fn init_tui_tracing(config: &GuiConfig) -> Result<(), GuiError> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(env_filter(config.log_level.as_filter_str()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| GuiError::logging(e.to_string()))
}

/// Tracing for headless runs: stderr, so stdout only carries results
fn init_headless_tracing(config: &GuiConfig) -> Result<(), GuiError> {
    tracing_subscriber::registry()
        .with(env_filter(config.log_level.as_filter_str()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| GuiError::logging(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&CliArgs::from(&cli))?;
    let service = Arc::new(HttpPricingClient::new(config.endpoints.clone()));

    let (kind, args) = match cli.command {
        None | Some(Commands::Tui) => {
            init_tui_tracing(&config)?;
            tracing::info!(
                script_root = %service.endpoints().script_root,
                missing_selection = %config.missing_selection,
                "Starting pricing forms TUI"
            );

            let mut app = TuiApp::new(&config, service)?;
            app.run().await?;
            return Ok(());
        }
        Some(Commands::Option(args)) => (FormKind::Option, args),
        Some(Commands::Bond(args)) => (FormKind::Bond, args),
    };

    init_headless_tracing(&config)?;
    let input = FormInput::from(args);
    let (page, _) = run_form(kind, &input, &config, service.as_ref()).await?;
    print!("{}", render_page_text(&page));

    Ok(())
}
