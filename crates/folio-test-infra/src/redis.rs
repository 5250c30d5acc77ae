use crate::Result;
use folio_core::Retention;
use folio_storage::{ConnectPolicy, RedisRepository};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

const REDIS_PORT: u16 = 6379;

/// Test fixture for a disposable standalone Redis server.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
}

impl RedisServer {
    pub async fn new() -> Result<Self> {
        let container = GenericImage::new("redis", "8.6.0")
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;
        Ok(Self { container })
    }

    pub async fn redis_url(&self) -> Result<String> {
        let host = match self.container.get_host().await?.to_string().as_str() {
            "localhost" => String::from("127.0.0.1"),
            host => host.to_string(),
        };
        let port = self.container.get_host_port_ipv4(REDIS_PORT).await?;
        Ok(format!("redis://{host}:{port}"))
    }

    /// Connects a repository whose keys expire after `retention`.
    pub async fn repository(&self, retention: Retention) -> Result<RedisRepository> {
        let url = self.redis_url().await?;
        let policy = ConnectPolicy::builder()
            .attempts(10)
            .initial_backoff(Duration::from_millis(200))
            .build();

        Ok(RedisRepository::connect(&url, retention, &policy).await?)
    }
}
