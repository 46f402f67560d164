use std::{env, error::Error, time::Duration};

use async_trait::async_trait;
use model::{fix::Fix, window::TimeWindow};
use tracking::database::{
    Database, DatabaseAutocommit, DatabaseOperations, Result, TrackRepo,
};

pub mod data_model;
pub mod queries;

pub enum DatabaseConnectionInfo {
    /// A complete `postgres://` url.
    Url(String),
    Parts {
        username: String,
        password: String,
        hostname: String,
        port: u16,
        database: String,
    },
}

impl DatabaseConnectionInfo {
    /// Reads `DB_DSN` if set, otherwise the `DATABASE_*` variables.
    pub fn from_env() -> Option<Self> {
        if let Some(dsn) = env::var("DB_DSN").ok().filter(|dsn| !dsn.is_empty()) {
            return Some(Self::Url(dsn));
        }

        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self::Parts {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Parts {
                username,
                password,
                hostname,
                port,
                database,
            } => format!(
                "postgres://{}:{}@{}:{}/{}",
                username, password, hostname, port, database
            ),
        }
    }
}

/// How often, and how far apart, connecting is attempted on startup.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Defaults overridden by `DB_CONNECT_ATTEMPTS` and `DB_CONNECT_DELAY_SECS`.
    pub fn from_env() -> Self {
        let default = Self::default();
        let attempts = env::var("DB_CONNECT_ATTEMPTS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|attempts| *attempts > 0)
            .unwrap_or(default.attempts);
        let delay = env::var("DB_CONNECT_DELAY_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(default.delay);
        Self { attempts, delay }
    }
}

#[derive(Debug, Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseOperations for PgDatabaseAutocommit {}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    /// Connects with a single attempt.
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> core::result::Result<Self, Box<dyn Error>> {
        let retry = RetryConfig {
            attempts: 1,
            ..Default::default()
        };
        Self::connect_with_retry(database_connection_info, retry).await
    }

    /// Connects, retrying on failure as configured. Migrations run once a
    /// connection is up; a failing migration is not retried.
    pub async fn connect_with_retry(
        database_connection_info: DatabaseConnectionInfo,
        retry: RetryConfig,
    ) -> core::result::Result<Self, Box<dyn Error>> {
        let url = database_connection_info.postgres_url();
        let mut attempt = 1;
        let pool = loop {
            match sqlx::postgres::PgPool::connect(&url).await {
                Ok(pool) => break pool,
                Err(why) if attempt < retry.attempts => {
                    log::warn!(
                        "database connection attempt {}/{} failed: {}",
                        attempt,
                        retry.attempts,
                        why
                    );
                    attempt += 1;
                    tokio::time::sleep(retry.delay).await;
                }
                Err(why) => {
                    return Err(format!(
                        "db connect failed after {} attempts: {}",
                        retry.attempts, why
                    )
                    .into())
                }
            }
        };

        log::info!("connected to database after {} attempt(s)", attempt);
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }
}

impl Database for PgDatabase {
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }
}

#[async_trait]
impl TrackRepo for PgDatabaseAutocommit {
    async fn append(&mut self, fix: Fix) -> Result<()> {
        queries::track_point::insert(&self.pool, fix).await
    }

    async fn ordered_fixes(
        &mut self,
        device_id: &str,
        window: TimeWindow,
    ) -> Result<Vec<Fix>> {
        queries::track_point::get_ordered(&self.pool, device_id, window).await
    }

    async fn aggregated_line(
        &mut self,
        device_id: &str,
        window: TimeWindow,
    ) -> Result<Option<String>> {
        queries::track_point::get_line_geojson(&self.pool, device_id, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_from_parts() {
        let info = DatabaseConnectionInfo::Parts {
            username: "tracker".to_owned(),
            password: "secret".to_owned(),
            hostname: "db".to_owned(),
            port: 5432,
            database: "trajectory".to_owned(),
        };
        assert_eq!(
            info.postgres_url(),
            "postgres://tracker:secret@db:5432/trajectory"
        );
    }

    #[test]
    fn dsn_is_used_verbatim() {
        let info = DatabaseConnectionInfo::Url(
            "postgres://u:p@localhost/track?sslmode=disable".to_owned(),
        );
        assert_eq!(
            info.postgres_url(),
            "postgres://u:p@localhost/track?sslmode=disable"
        );
    }
}
