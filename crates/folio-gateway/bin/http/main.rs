mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use folio_core::{Clock, ContactRepository, Repository, Retention, SystemClock};
use folio_gateway::sweeper::spawn_expiry_sweeper;
use folio_gateway::{App, AppState};
use folio_generator::RandomGenerator;
use folio_redirector::RedirectorService;
use folio_shortener::{ShortenerService, ShortenerSettings};
use folio_storage::{ConnectPolicy, InMemoryRepository, MySqlRepository, RedisRepository};
use folio_telemetry::TelemetryConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _telemetry = folio_telemetry::init(
        &TelemetryConfig::builder()
            .service_name("folio-gateway")
            .format(config.log_format.into())
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        retention_days = config.retention_days,
        "starting folio gateway"
    );

    let retention = Retention::from_days(config.retention_days);
    let policy = ConnectPolicy::builder()
        .attempts(config.connect_attempts)
        .op_timeout(Duration::from_millis(config.store_timeout_ms))
        .build();

    match config.storage {
        StorageBackendArg::InMemory => {
            let repository = InMemoryRepository::with_retention(retention);
            run(&config, Arc::new(repository), retention).await
        }
        StorageBackendArg::Mysql => {
            let database_url = config
                .database_url
                .as_deref()
                .context("database url is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(database_url, retention, &policy)
                .await
                .context("failed to connect to mysql")?;
            repository
                .migrate()
                .await
                .context("failed to create mysql tables")?;
            run(&config, Arc::new(repository), retention).await
        }
        StorageBackendArg::Redis => {
            let database_url = config
                .database_url
                .as_deref()
                .context("database url is required when storage backend is redis")?;
            let repository = RedisRepository::connect(database_url, retention, &policy)
                .await
                .context("failed to connect to redis")?;
            run(&config, Arc::new(repository), retention).await
        }
    }
}

async fn run<R>(config: &CLI, repository: Arc<R>, retention: Retention) -> anyhow::Result<()>
where
    R: Repository + ContactRepository,
{
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let shortener = ShortenerService::with_clock(
        repository.clone(),
        RandomGenerator::with_length(config.code_length),
        ShortenerSettings::builder()
            .base_url(config.public_base_url.clone())
            .max_attempts(config.max_attempts)
            .build(),
        clock.clone(),
    );
    let redirector = RedirectorService::with_clock(repository.clone(), retention, clock.clone());
    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        repository.clone(),
        clock.clone(),
    );

    let sweeper = (config.purge_interval_secs > 0).then(|| {
        spawn_expiry_sweeper(
            repository.clone(),
            clock.clone(),
            Duration::from_secs(config.purge_interval_secs),
        )
    });

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %config.listen_addr, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    repository.close().await;
    info!("folio gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
