use crate::Result;
use folio_core::Retention;
use folio_storage::{ConnectPolicy, MySqlRepository};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;

/// Credentials and image for a disposable folio MySQL store.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlConfig {
    #[builder(default = "8.4".to_string(), setter(into))]
    tag: String,
    #[builder(default = "folio".to_string(), setter(into))]
    database: String,
    #[builder(default = "folio".to_string(), setter(into))]
    username: String,
    #[builder(default = "folio".to_string(), setter(into))]
    password: String,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A MySQL container holding the folio schema.
///
/// The entrypoint runs a throwaway server on port 0 while it creates the
/// user database, so readiness waits for the log line of the real server.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MySqlConfig,
}

impl MySqlServer {
    pub async fn new(config: MySqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr(format!("port: {MYSQL_PORT}")))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", "root")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn database_url(&self) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(MYSQL_PORT).await?;
        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            self.config.username, self.config.password, host, port, self.config.database
        ))
    }

    /// Connects a repository with `retention` and creates its tables.
    pub async fn repository(&self, retention: Retention) -> Result<MySqlRepository> {
        let url = self.database_url().await?;
        let policy = ConnectPolicy::builder()
            .attempts(10)
            .initial_backoff(Duration::from_millis(250))
            .max_backoff(Duration::from_secs(1))
            .op_timeout(Duration::from_secs(10))
            .build();

        let repository = MySqlRepository::connect(&url, retention, &policy).await?;
        repository.migrate().await?;
        Ok(repository)
    }
}
