use anyhow::Context;
use std::sync::Arc;
use todos::{
    api::routes::create_router,
    auth::{jwt::TokenService, password::PasswordHasher},
    cli::Cli,
    utils::config::{Config, LogConfig, LogFormat},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", log.level)));

    let registry = tracing_subscriber::registry().with(filter);
    match log.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::warn!(error = %e, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    Config::load_dotenv(cli.env_file.as_deref())?;
    let mut config = Config::from_env().context("invalid configuration")?;
    cli.apply(&mut config);

    init_tracing(&config.log);
    tracing::info!(?config, "starting todo-server");

    let tokens = Arc::new(
        TokenService::new(&config.auth.jwt_secret, config.auth.token_lifetime())
            .context("invalid token settings")?,
    );
    let hasher = PasswordHasher::new(
        config.auth.password_hash_cost,
        config.auth.password_hash_memory_kib,
    )
    .context("invalid password hash settings")?;

    let provider = config.database.provider();
    let db = Arc::new(
        provider
            .create_client()
            .await
            .with_context(|| format!("failed to open database {}", provider))?,
    );
    tracing::info!(database = %provider, "database ready");

    let state = AppState::new(db.clone(), db, tokens, hasher);
    let app = create_router(state);

    let listener = config.server.bind().await.with_context(|| {
        format!(
            "failed to bind {}:{}",
            config.server.host, config.server.port
        )
    })?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
