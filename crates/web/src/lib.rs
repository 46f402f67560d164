pub use crate::common::RouteResult;

use std::{env, net::SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracking::{client::Client, database::Database};

pub mod api;
pub mod common;

#[derive(Debug, Clone)]
pub struct WebState<D: Database> {
    pub tracking_client: Client<D>,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl WebConfig {
    /// Reads `PORT`, falling back to 8080.
    pub fn from_env() -> Self {
        match env::var("PORT") {
            Ok(port) if !port.is_empty() => match port.parse() {
                Ok(port) => Self { port },
                Err(why) => {
                    log::warn!("ignoring invalid PORT {:?}: {}", port, why);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

pub fn router<D: Database>(state: WebState<D>) -> Router {
    Router::new().nest_service("/api", api::routes(state)).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

pub async fn start_web_server<D: Database>(
    state: WebState<D>,
    config: WebConfig,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.address()).await?;
    log::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(why) = tokio::signal::ctrl_c().await {
            log::error!("could not listen for ctrl-c: {}", why);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(why) => {
                log::error!("could not listen for SIGTERM: {}", why);
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
    log::info!("shutting down");
}
