//! branchkit - branch and remote management over the git CLI
//!
//! Run with `branchkit --help` for usage.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use branchkit::{
    config::Config,
    git::{GitVersion, ProcessExecutor, Repository},
    parse_namespace_resource_name, APP_NAME, VERSION,
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Branch and remote management over the git CLI")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Repository to operate on (default: current directory)
    #[arg(short = 'C', long = "repo", global = true)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change local branches
    #[command(subcommand)]
    Branch(BranchCommand),

    /// Inspect references
    #[command(subcommand)]
    Ref(RefCommand),

    /// Manage remotes
    #[command(subcommand)]
    Remote(RemoteCommand),

    /// Split a namespace/resource/name token
    Resolve {
        /// Token such as `name`, `kind/name` or `ns/kind/name`
        token: String,

        /// Namespace used when the token doesn't name one
        #[arg(short, long)]
        namespace: Option<String>,

        /// Resource kind used when the token leaves it implicit
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Show the detected git version
    Version,

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum BranchCommand {
    /// List local branches in git's order
    List {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show the branch HEAD points at
    Current,

    /// Exit 0 if the branch exists, 1 otherwise
    Exists { name: String },

    /// Point HEAD at a branch
    SetDefault { name: String },
}

#[derive(Subcommand)]
enum RefCommand {
    /// Exit 0 if the full reference exists, 1 otherwise
    Exists { name: String },
}

#[derive(Subcommand)]
enum RemoteCommand {
    /// Register a remote
    Add {
        name: String,
        url: String,

        /// Fetch from the remote right away
        #[arg(short, long)]
        fetch: bool,
    },

    /// Remove a remote
    Remove { name: String },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use info level for our crate, warn for dependencies
        EnvFilter::new("info").add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

/// Print the outcome of an existence check and exit non-zero when absent
fn report_exists(what: &str, exists: bool) {
    if exists {
        println!("{what} exists");
    } else {
        println!("{what} not found");
        std::process::exit(1);
    }
}

async fn open_repo(config: &Config, path: Option<PathBuf>) -> Result<Repository<ProcessExecutor>> {
    let path = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    Ok(Repository::open(path, config.executor()).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    setup_logging(cli.debug || config.debug, config.log_file.as_deref())?;
    debug!("{} v{}", APP_NAME, VERSION);

    match cli.command {
        Commands::Branch(command) => {
            let repo = open_repo(&config, cli.repo).await?;
            match command {
                BranchCommand::List { json } => {
                    let branches = repo.branches().await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&branches)?);
                    } else {
                        for branch in branches {
                            println!("{branch}");
                        }
                    }
                }
                BranchCommand::Current => {
                    let branch = repo.head_branch().await?;
                    println!("{}", branch.name);
                }
                BranchCommand::Exists { name } => {
                    let exists = repo.branch_exists(&name).await;
                    report_exists(&format!("Branch '{name}'"), exists);
                }
                BranchCommand::SetDefault { name } => {
                    repo.set_default_branch(&name).await?;
                    info!("Default branch set to {}", name);
                }
            }
        }

        Commands::Ref(RefCommand::Exists { name }) => {
            let repo = open_repo(&config, cli.repo).await?;
            let exists = repo.reference_exists(&name).await;
            report_exists(&format!("Reference '{name}'"), exists);
        }

        Commands::Remote(command) => {
            let repo = open_repo(&config, cli.repo).await?;
            match command {
                RemoteCommand::Add { name, url, fetch } => {
                    repo.add_remote(&name, &url, fetch).await?;
                }
                RemoteCommand::Remove { name } => {
                    repo.remove_remote(&name).await?;
                }
            }
        }

        Commands::Resolve {
            token,
            namespace,
            kind,
        } => {
            let default_namespace = namespace.unwrap_or_else(|| config.default_namespace.clone());
            let Some(parsed) = parse_namespace_resource_name(&token, &default_namespace) else {
                eprintln!("Invalid token '{}': expected name, kind/name or ns/kind/name", token);
                std::process::exit(2);
            };

            let resource = match kind.as_deref() {
                Some(default_kind) => parsed.resource_or(default_kind).to_string(),
                None => parsed.resource.clone(),
            };
            println!("namespace: {}", parsed.namespace);
            println!("resource:  {}", resource);
            println!("name:      {}", parsed.name);
        }

        Commands::Version => {
            let version = GitVersion::detect(&config.executor()).await?;
            println!("git {}", version);
        }

        Commands::Config { init } => {
            if init {
                config.save()?;
                println!(
                    "Configuration initialized at {:?}",
                    Config::config_file_path()?
                );
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                println!("\nConfig file: {:?}", Config::config_file_path()?);
            }
        }
    }

    Ok(())
}
