mod cli;

use crate::cli::{CacheBackendArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use shortlink_cache::{MokaUrlCache, NoopUrlCache, RedisUrlCache, UrlCache};
use shortlink_generator::{FlakeGenerator, FlakeSettings, Obfuscator};
use shortlink_proto_schema::v1::url_service_server::UrlServiceServer;
use shortlink_server::grpc::UrlGrpcServer;
use shortlink_server::http::{App, AppState};
use shortlink_server::telemetry;
use shortlink_service::{ResolutionService, ServiceSettings, UrlResolver};
use shortlink_storage::{InMemoryStore, PostgresStore, UrlStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tonic::transport::Server;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _telemetry = telemetry::init(config.log_format.into(), config.otlp_endpoint.as_deref())?;

    info!(
        grpc_listen_addr = %config.grpc_listen_addr,
        http_listen_addr = %config.http_listen_addr,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        worker_id = config.worker_id,
        "starting shortlink server"
    );

    let store = build_store(&config).await?;
    let cache = build_cache(&config).await?;
    let generator = FlakeGenerator::new(
        FlakeSettings::builder().worker_id(config.worker_id).build(),
        Obfuscator::default(),
    )
    .context("invalid code generator settings")?;
    let settings = ServiceSettings::builder()
        .create_attempts(config.create_attempts)
        .build();

    let resolver: Arc<dyn UrlResolver> = Arc::new(ResolutionService::with_settings(
        store, cache, generator, settings,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let grpc = run_grpc(config.grpc_listen_addr, resolver.clone(), shutdown_rx.clone());
    let http = run_http(config.http_listen_addr, resolver, shutdown_rx);
    let signal = async {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
        Ok::<_, anyhow::Error>(())
    };

    tokio::try_join!(grpc, http, signal)?;

    info!("shortlink server stopped");
    Ok(())
}

async fn build_store(config: &CLI) -> anyhow::Result<Arc<dyn UrlStore>> {
    match config.storage {
        StorageBackendArg::InMemory => Ok(Arc::new(InMemoryStore::new())),
        StorageBackendArg::Postgres => {
            let dsn = config
                .database_dsn
                .as_deref()
                .context("database dsn is required when storage backend is postgres")?;
            let store = PostgresStore::connect(dsn, config.database_max_connections)
                .await
                .context("failed to connect to postgres")?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}

async fn build_cache(config: &CLI) -> anyhow::Result<Arc<dyn UrlCache>> {
    match config.cache {
        CacheBackendArg::None => Ok(Arc::new(NoopUrlCache::new())),
        CacheBackendArg::InMemory => Ok(Arc::new(MokaUrlCache::new())),
        CacheBackendArg::Redis => {
            let cache = RedisUrlCache::connect(&config.redis_url, config.redis_key_prefix.as_str())
                .await
                .context("failed to connect to redis")?;
            Ok(Arc::new(cache))
        }
    }
}

async fn run_grpc(
    listen_addr: SocketAddr,
    resolver: Arc<dyn UrlResolver>,
    shutdown: watch::Receiver<()>,
) -> anyhow::Result<()> {
    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<UrlServiceServer<UrlGrpcServer>>()
        .await;

    info!(listen_addr = %listen_addr, "gRPC server listening");
    Server::builder()
        .add_service(health_service)
        .add_service(UrlServiceServer::new(UrlGrpcServer::new(resolver)))
        .serve_with_shutdown(listen_addr, wait_for_shutdown(shutdown))
        .await
        .context("gRPC server failed")
}

async fn run_http(
    listen_addr: SocketAddr,
    resolver: Arc<dyn UrlResolver>,
    shutdown: watch::Receiver<()>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind http listener on {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, App::router(AppState::new(resolver)))
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .context("HTTP server failed")
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<()>) {
    let _ = shutdown.changed().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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
