use std::{fs::OpenOptions, sync::Mutex};

use migration::{AccountsMigrator, LedgersMigrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use settings::Database;

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;
    init_tracing(&settings.app)?;

    let server = settings.server;
    let accounts = connect(&server.accounts_database).await?;
    AccountsMigrator::up(&accounts, None).await?;
    let ledgers = connect(&server.ledgers_database).await?;
    LedgersMigrator::up(&ledgers, None).await?;
    tracing::info!("databases ready");

    let engine = engine::Engine::builder()
        .accounts_database(accounts.clone())
        .ledgers_database(ledgers.clone())
        .build()
        .await?;
    let tokens = server::TokenService::new(&server.jwt_secret);

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, server.port)).await?;
    if let Err(err) = server::run_with_listener(engine, tokens, listener, shutdown_signal()).await
    {
        tracing::error!("server failed: {err}");
    }

    accounts.close().await?;
    ledgers.close().await?;
    tracing::info!("shut down");
    Ok(())
}

fn init_tracing(app: &settings::App) -> Result<(), BoxError> {
    let filter = format!(
        "fortune_tracker={level},server={level},engine={level}",
        level = app.level
    );
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &app.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.init(),
    }
    Ok(())
}

async fn connect(config: &Database) -> Result<DatabaseConnection, BoxError> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };
    Ok(sea_orm::Database::connect(url).await?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
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
                tracing::error!("failed to listen for SIGTERM: {err}");
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
    tracing::info!("shutdown signal received");
}
