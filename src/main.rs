//! read-frog - 配置迁移与翻译缓存维护命令行工具

use std::io::Read;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use read_frog::cache::{self, CacheMaintenance, RedbCacheStore};
use read_frog::config::{
    Config, ConfigStore, LoadSource, MigrationRegistry, PersistedConfig, UnknownVersionPolicy,
};
use read_frog::settings::{MaintenanceSettings, SettingsManager};
use read_frog::storage::LocalDb;
use read_frog::{logging, FrogError};

#[derive(Parser)]
#[command(name = "read-frog")]
#[command(version, about = "Read Frog config migration and translation cache maintenance")]
struct Cli {
    /// Local database path (overrides settings)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Maintenance settings file (TOML or JSON)
    #[arg(long, global = true)]
    settings: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a config blob to the current schema version and print it
    Migrate {
        /// Version of the input when it is a bare config blob (e.g. v009)
        #[arg(long)]
        from: Option<String>,
        /// Input file; reads stdin when omitted or "-"
        input: Option<String>,
    },
    /// Load, migrate and persist the stored config, then print it
    Config {
        /// Replace a config that cannot be migrated with the default config
        #[arg(long)]
        reset_on_unknown: bool,
    },
    /// Delete translation cache entries older than the retention period
    Sweep {
        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,
    },
    /// Print translation cache statistics
    Stats {
        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,
    },
    /// Run scheduled cache maintenance until interrupted
    Daemon,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let Cli {
        db,
        settings: settings_path,
        command,
    } = Cli::parse();
    let current_settings = || load_settings(settings_path.as_deref(), db.as_deref());

    match command {
        Commands::Migrate { from, input } => {
            let registry = MigrationRegistry::builtin();
            let envelope = read_input(input.as_deref())?;
            let persisted = match from {
                Some(tag) => PersistedConfig {
                    schema_version: tag,
                    config: envelope,
                },
                None => PersistedConfig::from_value(envelope)?,
            };

            let outcome = registry.run(&persisted.schema_version, persisted.config)?;
            Config::from_blob(outcome.config())?;

            let (version, config) = outcome.into_parts();
            print_json(&PersistedConfig::new(version, config))?;
        }

        Commands::Config { reset_on_unknown } => {
            let settings = current_settings()?;
            let policy = if reset_on_unknown {
                UnknownVersionPolicy::ResetToDefault
            } else {
                settings.on_unknown_version
            };

            let store = ConfigStore::new(LocalDb::open(settings.db_path())?);
            let loaded = store.initialize(policy)?;

            print_json(&json!({
                "schemaVersion": loaded.version,
                "source": describe_source(&loaded.source),
                "config": loaded.config.to_blob(),
            }))?;
        }

        Commands::Sweep { now } => {
            let settings = current_settings()?;
            let store = RedbCacheStore::new(LocalDb::open(settings.db_path())?);
            let retention = settings.retention_policy().retention;
            let report = cache::sweep(&store, parse_now(now.as_deref())?, retention)?;
            print_json(&report)?;
        }

        Commands::Stats { now } => {
            let settings = current_settings()?;
            let store = RedbCacheStore::new(LocalDb::open(settings.db_path())?);
            let retention = settings.retention_policy().retention;
            let report = cache::stats(&store, parse_now(now.as_deref())?, retention)?;
            print_json(&report)?;
        }

        Commands::Daemon => {
            let settings = current_settings()?;
            let db = LocalDb::open(settings.db_path())?;

            let loaded = ConfigStore::new(db.clone()).initialize(settings.on_unknown_version)?;
            tracing::info!("配置已就绪: {} ({})", loaded.version, describe_source(&loaded.source));

            let store = Arc::new(RedbCacheStore::new(db));
            let (handle, task) = CacheMaintenance::new(store, settings.retention_policy()).spawn();

            tokio::signal::ctrl_c().await?;
            tracing::info!("收到中断信号，正在停止");
            handle.shutdown().await;
            task.await?;
        }
    }

    Ok(())
}

fn load_settings(path: Option<&str>, db: Option<&str>) -> Result<MaintenanceSettings, FrogError> {
    let mut settings = SettingsManager::with_file(path)?.into_settings();
    if let Some(db) = db {
        settings.db_path = db.to_string();
    }
    Ok(settings)
}

fn read_input(path: Option<&str>) -> Result<Value, FrogError> {
    let content = match path {
        None | Some("-") => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    Ok(serde_json::from_str(&content)?)
}

fn parse_now(value: Option<&str>) -> Result<DateTime<Utc>, FrogError> {
    match value {
        None => Ok(Utc::now()),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|time| time.with_timezone(&Utc))
            .map_err(|e| FrogError::ParseError(format!("无效的时间 {:?}: {}", value, e))),
    }
}

fn describe_source(source: &LoadSource) -> String {
    match source {
        LoadSource::FreshInstall => "fresh-install".to_string(),
        LoadSource::UpToDate => "up-to-date".to_string(),
        LoadSource::Migrated { from } => format!("migrated-from-{}", from),
        LoadSource::Reset { reason } => format!("reset: {}", reason),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), FrogError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
