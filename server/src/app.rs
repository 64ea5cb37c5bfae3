//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands, SystemCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::secret::SecretManager;
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::SqliteService;
use crate::data::cache::CacheService;
use crate::data::sqlite::seed::seed_demo_cities;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub secrets: SecretManager,
    pub database: Arc<SqliteService>,
    pub cache: Arc<CacheService>,
    pub auth: Arc<AuthManager>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::System {
                command: system_cmd,
            }) => {
                return Self::handle_system_command(system_cmd);
            }
            Some(Commands::Seed) => return Self::seed(&cli_config).await,
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;
        let secrets = SecretManager::init(&storage).await?;

        let cache = Arc::new(CacheService::new(&config.cache));
        let database = Arc::new(
            SqliteService::init(&storage, &config.database)
                .await
                .context("Failed to initialize database")?,
        );
        let auth = Arc::new(AuthManager::init(&secrets, &config.auth).await?);
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            secrets,
            database,
            cache,
            auth,
        })
    }

    /// Load demo cities and districts, then exit
    async fn seed(cli: &CliConfig) -> Result<()> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;
        let database = SqliteService::init(&storage, &config.database)
            .await
            .context("Failed to initialize database")?;

        let created = seed_demo_cities(database.pool())
            .await
            .context("Failed to seed demo cities")?;
        if let Err(e) = database.checkpoint().await {
            tracing::warn!("SQLite checkpoint failed: {}", e);
        }
        database.close().await;

        println!(
            "Seeded {} cities into {}",
            created,
            SqliteService::db_path(&storage, &config.database).display()
        );
        Ok(())
    }

    fn handle_system_command(cmd: SystemCommands) -> Result<()> {
        match cmd {
            SystemCommands::Prune { yes } => Self::prune_data(yes),
        }
    }

    fn prune_data(skip_confirm: bool) -> Result<()> {
        let data_dir = AppStorage::resolve_data_dir();

        if !data_dir.exists() {
            println!(
                "Nothing to prune. Data directory does not exist: {}",
                data_dir.display()
            );
            return Ok(());
        }

        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        println!("This will permanently delete the local data directory:");
        println!("  {}", data_dir.display());
        println!();
        println!(
            "Every listing, city and the session signing key will be lost. \
             Stop the server first."
        );

        if !skip_confirm {
            print!("\nContinue? [y/N] ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
                println!("Aborted.");
                return Ok(());
            }
        }

        std::fs::remove_dir_all(&data_dir)
            .with_context(|| format!("Failed to delete data directory: {}", data_dir.display()))?;
        println!("Pruned: {}", data_dir.display());
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Signal handlers go first so Ctrl+C during startup still shuts down cleanly
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        let bootstrap_token = app.auth.is_enabled().then(|| app.auth.bootstrap_token());
        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            bootstrap_token,
            &app.storage.data_dir().display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        if !app.shutdown.is_triggered() {
            tracing::warn!("HTTP server stopped without a shutdown signal");
        }
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_checkpoint_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
