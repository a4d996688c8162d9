//! nodepath — operator CLI for the node path scheduling policy.
//!
//! ```text
//! nodepath --db paths.redb config put --file config.json
//! nodepath --db paths.redb simulate --node node-a --node node-b
//! nodepath --db paths.redb watch --interval 10
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "nodepath",
    about = "Node path scheduling policy — configuration and dry runs",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Document store database file.
    #[arg(long, global = true, default_value = "nodepath.redb")]
    db: PathBuf,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or store the node path configuration document
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run one scheduling pass for a pod against the given nodes
    Simulate {
        /// Candidate node name (repeatable)
        #[arg(short, long = "node")]
        nodes: Vec<String>,
        /// Pod as namespace/name
        #[arg(short, long, default_value = "default/simulated")]
        pod: String,
        /// Plugin arguments JSON file
        #[arg(short, long)]
        args: Option<PathBuf>,
    },
    /// Periodically reload the configuration and log changes until ctrl-c
    Watch {
        /// Seconds between reloads
        #[arg(short, long, default_value = "30")]
        interval: u64,
        /// Plugin arguments JSON file
        #[arg(short, long)]
        args: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a configuration file and store it
    Put {
        /// Configuration JSON file
        #[arg(short, long)]
        file: PathBuf,
        #[command(flatten)]
        location: commands::config::Location,
    },
    /// Print the stored configuration
    Show {
        #[command(flatten)]
        location: commands::config::Location,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Put { file, location } => {
                commands::config::put(&cli.db, &file, &location)
            }
            ConfigAction::Show { location, format } => {
                commands::config::show(&cli.db, &location, &format)
            }
        },
        Commands::Simulate { nodes, pod, args } => {
            commands::simulate::run(&cli.db, &nodes, &pod, args.as_deref())
        }
        Commands::Watch { interval, args } => {
            commands::watch::run(&cli.db, interval, args.as_deref()).await
        }
    }
}

fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,nodepath=debug"))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
