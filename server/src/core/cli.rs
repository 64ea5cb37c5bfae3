use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_BOOTSTRAP_TOKEN, ENV_CACHE_MAX_ENTRIES, ENV_CACHE_TTL_SECS, ENV_CONFIG, ENV_DB_PATH,
    ENV_DEBUG, ENV_HOST, ENV_NO_AUTH, ENV_PORT, ENV_SESSION_TTL_HOURS,
};

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(version, about = "Listings directory server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Disable admin authentication (for development)
    #[arg(long, global = true, env = ENV_NO_AUTH)]
    pub no_auth: bool,

    /// Enable debug mode (verbose request logging)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Fixed bootstrap token instead of a random one per start
    #[arg(long, global = true, env = ENV_BOOTSTRAP_TOKEN, hide_env_values = true)]
    pub bootstrap_token: Option<String>,

    /// Admin session lifetime in hours
    #[arg(long, global = true, env = ENV_SESSION_TTL_HOURS)]
    pub session_ttl_hours: Option<u32>,

    /// SQLite database file (defaults to the data directory)
    #[arg(long, global = true, env = ENV_DB_PATH)]
    pub db_path: Option<String>,

    /// Maximum entries in the reference-data cache
    #[arg(long, global = true, env = ENV_CACHE_MAX_ENTRIES)]
    pub cache_max_entries: Option<u64>,

    /// Default TTL for cached reference data, in seconds
    #[arg(long, global = true, env = ENV_CACHE_TTL_SECS)]
    pub cache_ttl_secs: Option<u64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Load demo cities and districts into the database
    Seed,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete local data directory (database, secrets). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auth: bool,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub bootstrap_token: Option<String>,
    pub session_ttl_hours: Option<u32>,
    pub db_path: Option<String>,
    pub cache_max_entries: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        no_auth: cli.no_auth,
        debug: cli.debug,
        config: cli.config,
        bootstrap_token: cli.bootstrap_token,
        session_ttl_hours: cli.session_ttl_hours,
        db_path: cli.db_path,
        cache_max_entries: cli.cache_max_entries,
        cache_ttl_secs: cli.cache_ttl_secs,
    };
    (config, cli.command)
}
