//! Server lifecycle: bind, serve, shut down.

use std::fmt;
use std::net::SocketAddr;
use std::pin::Pin;

use futures::prelude::*;
use tokio::net::TcpListener;

use crate::axum_factory::make_axum_router;
use crate::configuration::Configuration;
use crate::error::RouterError;

type ShutdownFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Specifies when the router's HTTP server should gracefully shutdown
#[non_exhaustive]
pub enum ShutdownKind {
    /// No graceful shutdown
    None,

    /// A custom shutdown future.
    Custom(ShutdownFuture),

    /// Watch for Ctl-C signal.
    CtrlC,
}

impl fmt::Debug for ShutdownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownKind::None => write!(f, "None"),
            ShutdownKind::Custom(_) => write!(f, "Custom"),
            ShutdownKind::CtrlC => write!(f, "CtrlC"),
        }
    }
}

impl ShutdownKind {
    /// Convert this shutdown hook into a future. Allows for unified handling later.
    fn into_future(self) -> ShutdownFuture {
        match self {
            ShutdownKind::None => future::pending::<()>().boxed(),
            ShutdownKind::Custom(future) => future,
            ShutdownKind::CtrlC => {
                #[cfg(not(unix))]
                {
                    async {
                        if let Err(err) = tokio::signal::ctrl_c().await {
                            tracing::error!("failed to install CTRL+C signal handler: {err}");
                            future::pending::<()>().await;
                        }
                    }
                    .boxed()
                }

                #[cfg(unix)]
                {
                    async {
                        let mut terminate = match tokio::signal::unix::signal(
                            tokio::signal::unix::SignalKind::terminate(),
                        ) {
                            Ok(terminate) => terminate,
                            Err(err) => {
                                tracing::error!("failed to install SIGTERM signal handler: {err}");
                                let _ = tokio::signal::ctrl_c().await;
                                return;
                            }
                        };
                        tokio::select! {
                            _ = tokio::signal::ctrl_c() => {},
                            _ = terminate.recv() => {},
                        }
                    }
                    .boxed()
                }
            }
        }
    }
}

/// The entry point for running the gateway.
///
/// ```no_run
/// use rickmorty_router::Configuration;
/// use rickmorty_router::GatewayRouter;
/// use rickmorty_router::ShutdownKind;
/// # #[tokio::main]
/// # async fn main() -> Result<(), rickmorty_router::error::RouterError> {
/// GatewayRouter::builder()
///     .configuration(Configuration::default())
///     .shutdown(ShutdownKind::CtrlC)
///     .build()
///     .serve()
///     .await
/// # }
/// ```
#[derive(Debug)]
pub struct GatewayRouter {
    configuration: Configuration,
    shutdown: ShutdownKind,
}

#[buildstructor::buildstructor]
impl GatewayRouter {
    /// Build a new router. Without a shutdown hook the server runs until the process ends.
    #[builder]
    pub fn new(configuration: Configuration, shutdown: Option<ShutdownKind>) -> Self {
        Self {
            configuration,
            shutdown: shutdown.unwrap_or(ShutdownKind::None),
        }
    }
}

impl GatewayRouter {
    /// Bind the configured address and serve until shutdown.
    pub async fn serve(self) -> Result<(), RouterError> {
        let listener = TcpListener::bind(self.configuration.server.listen)
            .await
            .map_err(RouterError::ServerCreationError)?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener, for instance one bound to port 0.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), RouterError> {
        let router = make_axum_router(&self.configuration)?;
        let address: SocketAddr = listener
            .local_addr()
            .map_err(RouterError::ServerCreationError)?;

        tracing::info!(
            upstream = %self.configuration.upstream.url,
            "GraphQL endpoint exposed at http://{}{} 🚀",
            address,
            self.configuration.server.path
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(self.shutdown.into_future())
            .await
            .map_err(RouterError::ServeError)?;

        tracing::info!("stopped");
        Ok(())
    }
}
