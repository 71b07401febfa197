//! Management server lifecycle.
//!
//! `new` validates configuration, `start` binds the listener and registers
//! the router, `shutdown` deregisters (stops accepting, drains in-flight
//! requests within the grace period) and then releases the kernel handle.
//! A released server cannot be restarted.

use crate::domain::config::{ConfigError, ManagementConfig};
use crate::http::{build_router, AppState};
use crate::ports::outbound::BrokerKernel;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server already running")]
    AlreadyRunning,

    #[error("server not running")]
    NotRunning,

    #[error("kernel handle already released")]
    KernelReleased,

    #[error("server error: {0}")]
    Serve(String),
}

struct Running {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

pub struct ManagementServer {
    config: ManagementConfig,
    kernel: Option<Arc<dyn BrokerKernel>>,
    running: Option<Running>,
}

impl ManagementServer {
    /// Create a server over `kernel`. Nothing is bound until [`start`](Self::start).
    pub fn new(config: ManagementConfig, kernel: Arc<dyn BrokerKernel>) -> Result<Self, ServerError> {
        config.validate()?;
        Ok(Self {
            config,
            kernel: Some(kernel),
            running: None,
        })
    }

    pub fn config(&self) -> &ManagementConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    /// Bind and start serving. Returns the bound address, which differs from
    /// the configured one when port 0 was requested.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.running.is_some() {
            return Err(ServerError::AlreadyRunning);
        }
        let kernel = self.kernel.as_ref().ok_or(ServerError::KernelReleased)?;

        let state = AppState::new(Arc::clone(kernel), &self.config);
        let router = build_router(state, &self.config.cors);

        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let bound = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(addr = %bound, prefix = %self.config.api.prefix, "management API listening");
        self.running = Some(Running {
            addr: bound,
            shutdown_tx,
            handle,
        });
        Ok(bound)
    }

    /// Stop accepting, drain, then release the kernel.
    pub async fn shutdown(&mut self) -> Result<(), ServerError> {
        let Running {
            addr,
            shutdown_tx,
            mut handle,
        } = self.running.take().ok_or(ServerError::NotRunning)?;

        info!(addr = %addr, "management API shutting down");
        let _ = shutdown_tx.send(());

        let grace = self.config.shutdown.grace_period();
        let outcome = match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(ServerError::Serve(e.to_string())),
            Ok(Err(e)) => Err(ServerError::Serve(e.to_string())),
            Err(_) => {
                warn!(grace_ms = grace.as_millis() as u64, "drain timed out; aborting connections");
                handle.abort();
                Ok(())
            }
        };

        self.kernel = None;
        info!("management API stopped, kernel released");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBrokerKernel;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn local_config() -> ManagementConfig {
        let mut config = ManagementConfig::default();
        config.http.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.http.port = 0;
        config.shutdown.grace_period_ms = 1_000;
        config
    }

    fn server() -> ManagementServer {
        let kernel = Arc::new(InMemoryBrokerKernel::with_protocols(["amqp"]));
        ManagementServer::new(local_config(), kernel).unwrap()
    }

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = local_config();
        config.api.prefix = "mb/api".into();
        let kernel = Arc::new(InMemoryBrokerKernel::new());
        let result = ManagementServer::new(config, kernel);
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let mut server = server();
        let addr = server.start().await.unwrap();
        assert!(server.is_running());
        assert_eq!(server.local_addr(), Some(addr));

        let response = get(addr, "/mb/api/protocol-types").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("amqp"));

        server.shutdown().await.unwrap();
        assert!(!server.is_running());
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut server = server();
        server.start().await.unwrap();
        assert!(matches!(server.start().await, Err(ServerError::AlreadyRunning)));
        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_kernel_released_after_shutdown() {
        let mut server = server();
        server.start().await.unwrap();
        server.shutdown().await.unwrap();
        assert!(matches!(server.start().await, Err(ServerError::KernelReleased)));
        assert!(matches!(server.shutdown().await, Err(ServerError::NotRunning)));
    }
}
