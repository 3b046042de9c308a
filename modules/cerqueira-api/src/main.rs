use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cerqueira_api::feed::FeedService;
use cerqueira_api::jwt::JwtService;
use cerqueira_api::store::{MemoryStore, PgStore, SiteStore};
use cerqueira_api::{build_router, AppState};
use cerqueira_common::{Config, TokenResolver};
use instagram_graph::GraphClient;

#[derive(Parser)]
#[command(name = "api", about = "Cerqueira Psicologia site API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a signed admin token for the protected routes
    IssueToken {
        #[arg(long)]
        sub: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::IssueToken { sub, email, hours } => {
            let jwt = JwtService::new(&config.jwt_secret);
            let token = jwt.create_token(&sub, email.as_deref(), chrono::Duration::hours(hours))?;
            println!("{token}");
            Ok(())
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("cerqueira=info".parse()?);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let mut client = GraphClient::with_timeout(Duration::from_secs(config.instagram_timeout_secs))?;
    if let Some(base) = &config.instagram_api_base {
        client = client.with_base_url(base.as_str());
    }

    let feed = FeedService::new(
        client,
        TokenResolver::new(config.instagram_access_token.clone()),
    )
    .with_credential_check(config.instagram_validate_token);

    let store: Arc<dyn SiteStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set; site config and contact messages are kept in memory");
            Arc::new(MemoryStore::seeded())
        }
    };

    let state = Arc::new(AppState {
        feed,
        jwt: JwtService::new(&config.jwt_secret),
        store,
    });
    let app = build_router(state);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Cerqueira API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
}
