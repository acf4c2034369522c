//! Server startup and management

use std::net::SocketAddr;
use std::sync::Arc;

use clipvault_rpc::ClipvaultApiServer;
use clipvault_store::ClipStore;
use jsonrpsee::server::{Server, ServerHandle};
use tracing::info;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::handler::RpcHandler;
use crate::identity::IdentityPolicy;
use crate::{Result, ServerError};

/// The Clipvault server
pub struct ClipvaultServer {
    config: ServerConfig,
    catalog: Arc<Catalog>,
    identity: IdentityPolicy,
    handle: Option<ServerHandle>,
    local_addr: Option<SocketAddr>,
}

impl ClipvaultServer {
    /// Create a server, opening the store named by the configuration
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        let store = config.open_store().await?;
        Ok(Self::with_store(config, store))
    }

    /// Create a server over an already opened store
    pub fn with_store(config: ServerConfig, store: Arc<dyn ClipStore>) -> Self {
        let catalog = Arc::new(Catalog::new(store, config.upload.clone()));
        let identity = config.identity_policy();
        Self {
            config,
            catalog,
            identity,
            handle: None,
            local_addr: None,
        }
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Start the server
    pub async fn start(&mut self) -> Result<()> {
        let server = Server::builder()
            .build(&self.config.addr)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        let local_addr = server
            .local_addr()
            .map_err(|e| ServerError::Server(e.to_string()))?;

        let handler = RpcHandler::new(Arc::clone(&self.catalog), self.identity.clone());
        let methods = handler.into_rpc();

        info!("Starting Clipvault server on {}", local_addr);
        self.handle = Some(server.start(methods));
        self.local_addr = Some(local_addr);

        Ok(())
    }

    /// Stop the server
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            handle.stop().map_err(|e| ServerError::Server(e.to_string()))?;
            info!("Clipvault server stopped");
        }
        Ok(())
    }

    /// Wait for the server to finish
    pub async fn wait(&self) {
        if let Some(ref handle) = self.handle {
            handle.clone().stopped().await;
        }
    }

    /// The configured address
    pub fn addr(&self) -> SocketAddr {
        self.config.addr
    }

    /// The bound address once started; differs from `addr` for port 0
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// The HTTP URL clients should connect to once started
    pub fn url(&self) -> Option<String> {
        self.local_addr.map(|addr| format!("http://{}", addr))
    }
}

/// Start a server and run it until shutdown
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let mut server = ClipvaultServer::from_config(config).await?;
    server.start().await?;

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await.map_err(ServerError::Io)?;

    info!("Shutting down...");
    server.stop().await?;

    Ok(())
}
