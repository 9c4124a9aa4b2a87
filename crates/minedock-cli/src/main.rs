//! minedock - Minecraft server control panel

use anyhow::Context;
use clap::{Parser, Subcommand};
use minedock_cli::commands;
use minedock_cli::selector::{select_container, SelectionContext};
use minedock_config::{ClientConfig, SERVER_ENV};
use minedock_core::{notice_channel, ControlPanel, CreateForm, EnvPair, NoticeSender};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "minedock")]
#[command(author, version, about = "Minecraft Server Control Panel", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Backend origin, e.g. http://127.0.0.1:8080
    #[arg(long, global = true, env = SERVER_ENV)]
    server: Option<String>,

    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List servers
    List,

    /// Start a server
    Start {
        /// Server name or ID (interactive selection if not specified)
        container: Option<String>,
    },

    /// Stop a server
    Stop {
        /// Server name or ID (interactive selection if not specified)
        container: Option<String>,
    },

    /// Create a new server
    Create {
        /// Server name
        #[arg(long)]
        name: String,
        /// Host port to publish
        #[arg(long)]
        port: String,
        /// Host directory mounted as the server's data
        #[arg(long)]
        data_path: Option<String>,
        /// Image to run (backend default if not specified)
        #[arg(long)]
        image: Option<String>,
        /// Environment variable, KEY=VALUE (repeatable)
        #[arg(short, long = "env", value_parser = EnvPair::parse)]
        env: Vec<EnvPair>,
    },

    /// Follow a server's console output
    Logs {
        /// Server name or ID (interactive selection if not specified)
        container: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write the configuration file if it does not exist yet
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal; only plain commands log to stderr
    if cli.command.is_some() {
        let filter = if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => ClientConfig::config_path()?,
    };
    let config = ClientConfig::load_from(&config_path)?.with_origin(cli.server.clone());
    config
        .validate()
        .context("Invalid backend origin (check --server, MINEDOCK_SERVER or the config file)")?;

    let Some(command) = cli.command else {
        let (notices, rx) = notice_channel();
        let panel = ControlPanel::connect(&config, notices)?;
        minedock_tui::run(panel, config, rx).await?;
        return Ok(());
    };

    if let Commands::Config { init } = command {
        return commands::config(&config, &config_path, init);
    }

    let panel = ControlPanel::connect(&config, NoticeSender::detached())?;
    dispatch(&panel, command).await
}

async fn dispatch(panel: &ControlPanel, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => commands::list(panel).await,
        Commands::Start { container } => {
            let target = resolve(panel, container, SelectionContext::Startable, "Start which server?").await?;
            commands::start(panel, &target).await
        }
        Commands::Stop { container } => {
            let target = resolve(panel, container, SelectionContext::Running, "Stop which server?").await?;
            commands::stop(panel, &target).await
        }
        Commands::Create {
            name,
            port,
            data_path,
            image,
            env,
        } => {
            let form = CreateForm {
                name,
                port,
                data_path: data_path.unwrap_or_default(),
                image: image.unwrap_or_default(),
                env,
            };
            commands::create(panel, form).await
        }
        Commands::Logs { container } => {
            let target = resolve(panel, container, SelectionContext::Any, "Follow which server?").await?;
            commands::logs(panel, &target).await
        }
        Commands::Config { .. } => Ok(()),
    }
}

/// Use the given name or ID, or ask interactively
async fn resolve(
    panel: &ControlPanel,
    container: Option<String>,
    context: SelectionContext,
    prompt: &str,
) -> anyhow::Result<String> {
    if let Some(name) = container {
        return Ok(name);
    }
    let containers = panel.registry().fetch().await?;
    select_container(&containers, context, prompt)
}
