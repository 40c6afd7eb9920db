use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use truenavi_cli::commands::edge::{EdgeCommand, handle_edge_command};
use truenavi_cli::commands::node::{NodeCommand, handle_node_command};
use truenavi_cli::commands::route::handle_route_command;
use truenavi_cli::commands::stats::handle_stats;
use truenavi_cli::output::{Console, OutputFormat};
use truenavi_cli::terminal::ColorPalette;
use truenavi_lib::SqliteStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "TrueNavi navigation graph utilities")]
struct Cli {
    /// Path to the SQLite database. Created on first use.
    #[arg(long, global = true, env = "TRUENAVI_DB_PATH", default_value = "truenavi.db")]
    db: PathBuf,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Disable ANSI colors in text output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage nodes.
    #[command(subcommand)]
    Node(NodeCommand),
    /// Manage edges.
    #[command(subcommand)]
    Edge(EdgeCommand),
    /// Compute the shortest route between two nodes (ids or names).
    Route {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
    /// Show node and edge counts and the graph version.
    Stats,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let store = open_store(&cli.db)?;
    let palette = if cli.no_color {
        ColorPalette::plain()
    } else {
        ColorPalette::detect()
    };
    let mut console = Console::new(io::stdout().lock(), cli.format, palette);

    match cli.command {
        Command::Node(command) => handle_node_command(&store, command, &mut console),
        Command::Edge(command) => handle_edge_command(&store, command, &mut console),
        Command::Route { from, to } => handle_route_command(&store, &from, &to, &mut console),
        Command::Stats => handle_stats(&store, &mut console),
    }
}

fn open_store(path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(path)
        .with_context(|| format!("failed to open navigation store at {}", path.display()))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
