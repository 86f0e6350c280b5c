//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Every context's adapter holds a [`PgPool`] and funnels its Diesel calls
//! through [`run_blocking`], so the async services never block a runtime
//! worker on database I/O.

use crate::config::DatabaseConfig;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Repository errors that can wrap an arbitrary persistence failure.
pub trait PersistenceFailure: Sized {
    /// Wraps a lower-level error.
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

/// Builds a connection pool from configuration.
///
/// The pool connects lazily, so this succeeds without a reachable database.
#[must_use]
pub fn build_pool(config: &DatabaseConfig) -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
    Pool::builder()
        .max_size(config.max_pool_size)
        .min_idle(Some(config.min_idle))
        .connection_timeout(config.connection_timeout)
        .build_unchecked(manager)
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// # Errors
///
/// Returns whatever `f` returns, or a wrapped pool/join failure.
pub async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure + Send + 'static,
{
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(E::from_persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(E::from_persistence)?
}

/// Converts a row count into the `i64` Diesel uses for `LIMIT`/`OFFSET`.
#[must_use]
pub fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Converts a `COUNT(*)` result back into `u64`.
#[must_use]
pub fn from_sql_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Builds an `ILIKE` substring pattern, escaping `%`, `_` and `\`.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len().saturating_add(2));
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Returns `true` when a database error was raised by `constraint`.
#[must_use]
pub fn violates(info: &dyn diesel::result::DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}
