use anyhow::{Context, Result};
use sqlx::{Connection, PgConnection};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use tokio::time::sleep;

use super::unique_name;

const POSTGRES_PORT: u16 = 5432;

#[derive(Clone, Debug)]
pub struct PostgresConfig {
    image: String,
    tag: String,
    user: String,
    password: String,
    db_name: String,
}

impl PostgresConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            image: "postgres".to_string(),
            tag: "18".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            db_name: "postgres".to_string(),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposable Postgres instance for integration tests; stops with the handle.
pub struct PostgresContainer {
    _container: ContainerAsync<GenericImage>,
    host_port: u16,
    config: PostgresConfig,
}

impl PostgresContainer {
    /// Start a Postgres container with the default config on `network`.
    ///
    /// # Errors
    /// Returns an error if the container fails to start or the port cannot be
    /// resolved.
    pub async fn start(network: &str) -> Result<Self> {
        Self::start_with_config(network, PostgresConfig::new()).await
    }

    /// # Errors
    /// Returns an error if the container fails to start or the port cannot be
    /// resolved.
    pub async fn start_with_config(network: &str, config: PostgresConfig) -> Result<Self> {
        super::runtime::ensure_container_runtime()?;
        let image = GenericImage::new(&config.image, &config.tag)
            .with_exposed_port(POSTGRES_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", &config.user)
            .with_env_var("POSTGRES_PASSWORD", &config.password)
            .with_env_var("POSTGRES_DB", &config.db_name)
            .with_network(network)
            .with_container_name(unique_name("postgres"));

        let container = image
            .start()
            .await
            .context("Failed to start Postgres container")?;
        let host_port = container
            .get_host_port_ipv4(POSTGRES_PORT.tcp())
            .await
            .context("Failed to resolve Postgres host port")?;

        Ok(Self {
            _container: container,
            host_port,
            config,
        })
    }

    #[must_use]
    pub fn admin_dsn(&self) -> String {
        format!(
            "postgres://{}:{}@127.0.0.1:{}/{}?sslmode=disable",
            self.config.user, self.config.password, self.host_port, self.config.db_name
        )
    }

    /// Wait until Postgres accepts connections.
    ///
    /// # Errors
    /// Returns an error if Postgres does not become ready after retries.
    pub async fn wait_until_ready(&self) -> Result<()> {
        let dsn = self.admin_dsn();
        let mut attempts = 0;

        loop {
            match PgConnection::connect(&dsn).await {
                Ok(connection) => {
                    drop(connection);
                    return Ok(());
                }
                Err(err) => {
                    attempts += 1;
                    if attempts >= 20 {
                        return Err(err).context("Postgres did not become ready");
                    }
                    sleep(Duration::from_millis(250)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_config_defaults_are_expected() {
        let config = PostgresConfig::new();
        assert_eq!(config.image, "postgres");
        assert_eq!(config.tag, "18");
        assert_eq!(config.user, "postgres");
        assert_eq!(config.password, "postgres");
        assert_eq!(config.db_name, "postgres");
    }
}
