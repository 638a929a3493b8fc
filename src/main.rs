use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "staclog")]
#[command(about = "Log correlation and indexing pipeline for STAC updater runtimes", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one encoded batch envelope (from FILE or stdin)
    Process {
        /// File holding the encoded envelope; stdin when omitted
        file: Option<PathBuf>,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staclog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config_path = staclog::config::resolve_config_path(cli.config.as_deref());

    match cli.command {
        Some(Commands::Process { file }) => {
            staclog::cli::process::process(config_path, file).await?;
        }
        None => {
            // Default behavior is to process stdin
            staclog::cli::process::process(config_path, None).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { stdout } => {
                staclog::cli::config::init(stdout)?;
            }
        },
    }

    Ok(())
}
