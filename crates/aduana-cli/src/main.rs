//! CLI application for DIAN commercial-invoice compliance checks.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, requirements, suggest, validate};

/// DIAN invoice compliance - Check commercial invoices against import requirements
#[derive(Parser)]
#[command(name = "aduana")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Consult the advisory service (needs the API key environment variable)
    #[arg(long, global = true)]
    ai: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single invoice file
    Validate(validate::ValidateArgs),

    /// Validate many invoice files
    Batch(batch::BatchArgs),

    /// Show the mandatory invoice content
    Requirements(requirements::RequirementsArgs),

    /// Suggest a correction for a field
    Suggest(suggest::SuggestArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Validate(args) => validate::run(args, config_path, cli.ai).await,
        Commands::Batch(args) => batch::run(args, config_path, cli.ai).await,
        Commands::Requirements(args) => requirements::run(args).await,
        Commands::Suggest(args) => suggest::run(args, config_path, cli.ai).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
