use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sea_orm::EntityTrait;
use tokio::signal;
use tracing::{error, info};

use inventory_tracker as app;
use app::{
    entities::{item, user::Role},
    services::{search::SearchIndex, users::CreateUser},
};

#[derive(Parser)]
#[command(name = "inventory-tracker", about = "Inventory tracking service", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Rebuild the search index from the database
    Reindex,
    /// Create a Superuser account
    CreateSuperuser(CreateSuperuserArgs),
}

#[derive(Args)]
struct CreateSuperuserArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = app::config::load_config().context("failed to load configuration")?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db_pool = app::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => {
            app::db::run_migrations(&db_pool).await?;
            info!("migrations applied");
            Ok(())
        }
        Commands::Reindex => {
            let search = SearchIndex::open(&cfg.search.index_dir, &cfg.search.stop_words)?;
            let items = item::Entity::find().all(&db_pool).await?;
            search.rebuild(&items).await?;
            info!(count = items.len(), "search index rebuilt");
            Ok(())
        }
        Commands::CreateSuperuser(args) => {
            if cfg.auto_migrate {
                app::db::run_migrations(&db_pool).await?;
            }
            let users = app::services::users::UserService::new(Arc::new(db_pool));
            let created = users
                .create(CreateUser {
                    username: args.username,
                    first_name: String::new(),
                    last_name: String::new(),
                    email: args.email,
                    password: args.password,
                    role: Role::Superuser,
                })
                .await?;
            info!(user_id = created.id, username = %created.username, "superuser created");
            Ok(())
        }
        Commands::Serve => serve(cfg, db_pool).await,
    }
}

async fn serve(cfg: app::config::AppConfig, db_pool: app::db::DbPool) -> anyhow::Result<()> {
    if cfg.auto_migrate {
        app::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let search = Arc::new(
        SearchIndex::open(&cfg.search.index_dir, &cfg.search.stop_words)
            .context("failed to open the search index")?,
    );
    if search.num_docs() == 0 {
        // Fresh index directory; seed it from the database.
        let items = item::Entity::find().all(&db_pool).await?;
        if !items.is_empty() {
            search.rebuild(&items).await?;
        }
    }

    let logger = app::logging::setup_logger(app::logging::LoggerConfig::default());
    let logging = Arc::new(app::logging::LoggingState::new(logger));

    let port = cfg.port;
    let host: std::net::IpAddr = cfg
        .host
        .parse()
        .with_context(|| format!("invalid host address {}", cfg.host))?;
    let state = app::AppState::new(Arc::new(db_pool), cfg, search);
    let router = app::app_router(state, logging);

    let addr = SocketAddr::from((host, port));
    info!("inventory-tracker listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
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
