//! Application configuration.
//!
//! Every setting has a default that matches the marketplace's historical
//! behaviour, so an empty environment yields a working local configuration.

use crate::pagination::PageRequest;
use camino::Utf8PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable overriding the connection pool size.
pub const POOL_SIZE_VAR: &str = "TASKBOARD_DB_POOL_SIZE";
/// Environment variable overriding the minimum idle connections.
pub const MIN_IDLE_VAR: &str = "TASKBOARD_DB_MIN_IDLE";
/// Environment variable overriding the connection timeout in seconds.
pub const TIMEOUT_VAR: &str = "TASKBOARD_DB_TIMEOUT_SECS";
/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_VAR: &str = "TASKBOARD_LOG";
/// Environment variable pointing at the region catalogue JSON file.
pub const REGIONS_PATH_VAR: &str = "TASKBOARD_REGIONS_PATH";

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// Name of the offending variable.
        variable: &'static str,
        /// Raw value that failed to parse.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_pool_size: u32,
    /// Minimum number of idle connections kept open.
    pub min_idle: u32,
    /// How long to wait for a pooled connection.
    pub connection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/taskboard".to_owned(),
            max_pool_size: 5,
            min_idle: 1,
            connection_timeout: Duration::from_secs(10),
        }
    }
}

/// Page sizes and listing limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    /// Tasks per page on the public board and "my tasks".
    pub tasks_per_page: u32,
    /// Tasks per page in the moderation queue.
    pub admin_tasks_per_page: u32,
    /// Users per page in user moderation.
    pub admin_users_per_page: u32,
    /// Maximum page links rendered in user moderation.
    pub admin_users_page_links: u32,
    /// Articles per page in the admin list.
    pub admin_articles_per_page: u32,
    /// Articles per page on the public blog.
    pub articles_per_page: u32,
    /// Static pages per page in the admin list.
    pub admin_pages_per_page: u32,
    /// Number of ratings shown on a user's rating list.
    pub user_ratings_limit: u32,
    /// Number of related articles shown beside an article.
    pub related_articles_limit: u32,
}

/// Paged listings with a configurable size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    /// Open tasks on the public board and the author's own tasks.
    Tasks,
    /// The moderation queue.
    AdminTasks,
    /// User moderation.
    AdminUsers,
    /// Articles in the admin list.
    AdminArticles,
    /// The public blog.
    Articles,
    /// Static pages in the admin list.
    AdminPages,
}

impl ListingConfig {
    /// Historical marketplace limits.
    pub const DEFAULT: Self = Self {
        tasks_per_page: 10,
        admin_tasks_per_page: 10,
        admin_users_per_page: 20,
        admin_users_page_links: 10,
        admin_articles_per_page: 10,
        articles_per_page: 12,
        admin_pages_per_page: 10,
        user_ratings_limit: 50,
        related_articles_limit: 3,
    };

    /// Returns the page size configured for `listing`.
    #[must_use]
    pub const fn page_size(&self, listing: Listing) -> u32 {
        match listing {
            Listing::Tasks => self.tasks_per_page,
            Listing::AdminTasks => self.admin_tasks_per_page,
            Listing::AdminUsers => self.admin_users_per_page,
            Listing::AdminArticles => self.admin_articles_per_page,
            Listing::Articles => self.articles_per_page,
            Listing::AdminPages => self.admin_pages_per_page,
        }
    }

    /// Builds the request for `listing` from a raw `page` query value.
    #[must_use]
    pub fn page_request(&self, listing: Listing, raw_page: Option<&str>) -> PageRequest {
        PageRequest::from_query(raw_page, self.page_size(listing))
    }

    /// Returns the cap on rendered page links for `listing`, if any.
    #[must_use]
    pub const fn page_links(&self, listing: Listing) -> Option<u32> {
        match listing {
            Listing::AdminUsers => Some(self.admin_users_page_links),
            Listing::Tasks
            | Listing::AdminTasks
            | Listing::AdminArticles
            | Listing::Articles
            | Listing::AdminPages => None,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `taskboard=debug`.
    pub filter: String,
    /// Whether to emit ANSI colours.
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            ansi: false,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Listing settings.
    pub listing: ListingConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
    /// Optional path to the region catalogue JSON file.
    pub regions_path: Option<Utf8PathBuf>,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable does not
    /// parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = non_blank(lookup(DATABASE_URL_VAR)) {
            config.database.url = url;
        }
        if let Some(raw) = non_blank(lookup(POOL_SIZE_VAR)) {
            config.database.max_pool_size = parse_positive(POOL_SIZE_VAR, &raw)?;
        }
        if let Some(raw) = non_blank(lookup(MIN_IDLE_VAR)) {
            config.database.min_idle = parse_number(MIN_IDLE_VAR, &raw)?;
        }
        if let Some(raw) = non_blank(lookup(TIMEOUT_VAR)) {
            let seconds = parse_positive(TIMEOUT_VAR, &raw)?;
            config.database.connection_timeout = Duration::from_secs(u64::from(seconds));
        }
        if let Some(filter) = non_blank(lookup(LOG_FILTER_VAR)) {
            config.telemetry.filter = filter;
        }
        config.regions_path = non_blank(lookup(REGIONS_PATH_VAR)).map(Utf8PathBuf::from);

        if config.database.min_idle > config.database.max_pool_size {
            return Err(ConfigError::InvalidValue {
                variable: MIN_IDLE_VAR,
                value: config.database.min_idle.to_string(),
                reason: format!(
                    "must not exceed the pool size of {}",
                    config.database.max_pool_size
                ),
            });
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn parse_number(variable: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.parse::<u32>().map_err(|err| ConfigError::InvalidValue {
        variable,
        value: raw.to_owned(),
        reason: err.to_string(),
    })
}

fn parse_positive(variable: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let value = parse_number(variable, raw)?;
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            variable,
            value: raw.to_owned(),
            reason: "must be greater than zero".to_owned(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, Listing, ListingConfig, POOL_SIZE_VAR};
    use crate::pagination::Page;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[rstest]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(|_| None).expect("defaults load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database.max_pool_size, 5);
        assert_eq!(config.listing.tasks_per_page, 10);
        assert_eq!(config.listing.admin_users_per_page, 20);
        assert_eq!(config.listing.articles_per_page, 12);
    }

    #[rstest]
    #[case(Listing::Tasks, 10)]
    #[case(Listing::AdminUsers, 20)]
    #[case(Listing::Articles, 12)]
    #[case(Listing::AdminPages, 10)]
    fn page_requests_use_the_listing_size(#[case] listing: Listing, #[case] size: u32) {
        let request = ListingConfig::DEFAULT.page_request(listing, Some("3"));
        assert_eq!(request.size(), size);
        assert_eq!(request.number(), 3);
        assert_eq!(
            ListingConfig::DEFAULT.page_request(listing, Some("abc")).number(),
            1
        );
    }

    #[rstest]
    fn only_the_user_list_caps_page_links() {
        let listing = ListingConfig::DEFAULT;
        let request = listing.page_request(Listing::AdminUsers, None);
        let users: Page<u8> = Page::new(Vec::new(), request, 1_000);

        let links = users.page_numbers(listing.page_links(Listing::AdminUsers));
        assert_eq!(links.len(), 10);
        assert_eq!(listing.page_links(Listing::Tasks), None);
    }

    #[rstest]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/market"),
            ("TASKBOARD_DB_POOL_SIZE", "12"),
            ("TASKBOARD_DB_TIMEOUT_SECS", "3"),
            ("TASKBOARD_LOG", "taskboard=debug"),
            ("TASKBOARD_REGIONS_PATH", "/etc/taskboard/regions.json"),
        ]))
        .expect("overrides load");

        assert_eq!(config.database.url, "postgres://db/market");
        assert_eq!(config.database.max_pool_size, 12);
        assert_eq!(config.database.connection_timeout, Duration::from_secs(3));
        assert_eq!(config.telemetry.filter, "taskboard=debug");
        assert_eq!(
            config.regions_path.as_deref().map(camino::Utf8Path::as_str),
            Some("/etc/taskboard/regions.json")
        );
    }

    #[rstest]
    #[case("many")]
    #[case("0")]
    #[case("-1")]
    fn invalid_pool_size_is_rejected(#[case] raw: &str) {
        let result = AppConfig::from_lookup(lookup_from(&[(POOL_SIZE_VAR, raw)]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { variable, .. }) if variable == POOL_SIZE_VAR
        ));
    }

    #[rstest]
    fn min_idle_above_pool_size_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("TASKBOARD_DB_POOL_SIZE", "2"),
            ("TASKBOARD_DB_MIN_IDLE", "3"),
        ]));
        assert!(result.is_err());
    }

    #[rstest]
    fn blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "   ")]))
            .expect("blank values fall back to defaults");
        assert_eq!(config.database.url, "postgres://localhost/taskboard");
    }
}
