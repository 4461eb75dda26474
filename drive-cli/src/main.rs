// SPDX-License-Identifier: AGPL-3.0-or-later
//! MiniDrive CLI
//!
//! A quota-bounded personal file store over a per-user storage folder.

mod commands;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use drive_core::DriveResult;
use drive_store::DriveConfig;

#[derive(Parser)]
#[command(name = "minidrive")]
#[command(author, version, about = "MiniDrive - quota-bounded personal file store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage user (one root folder per user)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Config file path
    #[arg(short, long, global = true, default_value = "minidrive.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries of a folder
    #[command(alias = "dir")]
    Ls {
        /// Folder to list, relative to the storage root
        #[arg(default_value = ".")]
        path: String,

        /// Keep only names containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,

        /// Long format with kind, size, and modification time
        #[arg(short, long)]
        long: bool,
    },

    /// Create a folder
    Mkdir {
        /// Folder path to create, relative to the storage root
        path: String,
    },

    /// Upload a local file into the store
    Put {
        /// Local file to upload
        source: PathBuf,

        /// Destination folder inside the store (defaults to the root)
        folder: Option<String>,

        /// Store under this name instead of the source file name
        #[arg(long = "as")]
        dest_name: Option<String>,
    },

    /// Download a stored file to a local path
    Get {
        /// Stored file, relative to the storage root
        name: String,

        /// Local destination path
        dest: PathBuf,
    },

    /// Delete a file or folder (folders recursively)
    Rm {
        /// Entry to delete, relative to the storage root
        path: String,
    },

    /// Preview a file (text inline, images scaled, the rest via the
    /// system opener)
    Open {
        /// Stored file, relative to the storage root
        path: String,
    },

    /// Show quota usage for the storage root
    Quota,

    /// Interactive session with a navigation cursor
    Shell,

    /// Register a user in the configured credential file
    Adduser {
        /// Username to register
        username: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> DriveResult<()> {
    let config = DriveConfig::load(&cli.config).await?;
    let user = cli.user.as_deref();

    match cli.command {
        Commands::Ls { path, filter, long } => {
            commands::ls(&config, user, &path, filter.as_deref(), long, cli.verbose).await
        }
        Commands::Mkdir { path } => commands::mkdir(&config, user, &path).await,
        Commands::Put {
            source,
            folder,
            dest_name,
        } => {
            commands::put(
                &config,
                user,
                &source,
                folder.as_deref(),
                dest_name.as_deref(),
            )
            .await
        }
        Commands::Get { name, dest } => commands::get(&config, user, &name, &dest).await,
        Commands::Rm { path } => commands::rm(&config, user, &path).await,
        Commands::Open { path } => commands::open(&config, user, &path).await,
        Commands::Quota => commands::quota(&config, user).await,
        Commands::Shell => shell::run(&config, user).await,
        Commands::Adduser { username } => commands::adduser(&config, &username).await,
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
