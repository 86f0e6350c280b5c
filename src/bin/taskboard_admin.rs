//! Operator commands for a taskboard deployment.
//!
//! Usage:
//!
//! ```text
//! taskboard-admin promote <username>
//! taskboard-admin demote <username>
//! taskboard-admin regions
//! ```
//!
//! `promote` and `demote` grant or revoke the administrator role and need
//! `DATABASE_URL` to point at a migrated database. `regions` prints
//! the region catalog read from `TASKBOARD_REGIONS_PATH`, falling back to
//! `data/regions.json` and then to the single built-in region.

use camino::Utf8Path;
use mockable::DefaultClock;
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use taskboard::account::adapters::postgres::PostgresUserRepository;
use taskboard::account::domain::Role;
use taskboard::account::services::{AccountError, RoleService};
use taskboard::catalog::domain::{DEFAULT_REGIONS_PATH, RegionCatalog};
use taskboard::config::{AppConfig, ConfigError};
use taskboard::persistence::build_pool;
use taskboard::telemetry::{TelemetryError, init_tracing};
use thiserror::Error;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
enum AdminError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    SetRole { username: String, role: Role },
    Regions,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, AdminError> {
        match args {
            [command, username] if command == "promote" => Ok(Self::SetRole {
                username: username.clone(),
                role: Role::Admin,
            }),
            [command, username] if command == "demote" => Ok(Self::SetRole {
                username: username.clone(),
                role: Role::User,
            }),
            [command] if command == "regions" => Ok(Self::Regions),
            _ => Err(AdminError::InvalidArgs(
                "expected 'promote <username>', 'demote <username>' or 'regions'".to_owned(),
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    let config = AppConfig::from_env()?;
    match init_tracing(&config.telemetry) {
        Ok(()) | Err(TelemetryError::AlreadyInitialised) => {}
        Err(err) => return Err(err.into()),
    }

    let mut stdout = io::stdout().lock();
    match command {
        Command::SetRole { username, role } => {
            let pool = build_pool(&config.database);
            let repository = Arc::new(PostgresUserRepository::new(pool));
            let service = RoleService::new(repository, Arc::new(DefaultClock));
            let user = service.set_role(&username, role).await?;
            writeln!(stdout, "{} is now {}", user.username(), role.as_str())?;
        }
        Command::Regions => {
            let path = config
                .regions_path
                .as_deref()
                .unwrap_or_else(|| Utf8Path::new(DEFAULT_REGIONS_PATH));
            let catalog = RegionCatalog::load_or_fallback(path);
            for name in catalog.names() {
                writeln!(stdout, "{name}")?;
            }
        }
    }
    Ok(())
}
