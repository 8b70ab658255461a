//! Chainlist server.
//!
//! Serves one shared linked list over HTTP/1.1 and JSON for the visualizer.
//!
//! ## Architecture
//!
//! ```text
//! chainlist-server
//!   ├─ Server             (tokio listener, one task per connection)
//!   ├─ serve_connection   (read → decode → handle → encode → write)
//!   ├─ http               (HTTP/1.1 codec)
//!   ├─ ApiDriver          (sans-IO routing + validation, owns the list)
//!   └─ LinkedList         (chainlist-core)
//! ```
//!
//! The list is owned by the [`ApiDriver`], which the server shares between
//! connection tasks as `Arc<Mutex<ApiDriver>>`. Each request holds the lock
//! for exactly one operation plus the snapshot that follows it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod driver;
mod error;
pub mod http;
mod transport;

use std::{future::Future, net::SocketAddr};

use chainlist_core::LinkedList;
pub use client::ApiClient;
pub use driver::{ApiCommand, ApiDriver, ApiReply, Route};
pub use error::ServerError;
use tokio::net::TcpListener;
pub use transport::{ConnectionLimits, SharedDriver, serve_connection, shared};

/// Upper bound accepted for `max_body_bytes`. Bodies are buffered whole, so
/// the limit has to stay well inside what one request may allocate.
pub const MAX_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Server configuration for the production runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRuntimeConfig {
    /// Address to bind to (e.g., "0.0.0.0:5000")
    pub bind_address: String,
    /// Values appended to the list at startup, in order
    pub initial_values: Vec<i64>,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// `Access-Control-Allow-Origin` value sent with every response
    pub allow_origin: String,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            initial_values: vec![1, 2, 3],
            max_body_bytes: ConnectionLimits::default().max_body_bytes,
            allow_origin: "*".to_string(),
        }
    }
}

impl ServerRuntimeConfig {
    /// Check values that would only fail later at runtime.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.max_body_bytes == 0 {
            return Err(ServerError::Config("max_body_bytes must be positive".to_string()));
        }
        if self.max_body_bytes > MAX_BODY_LIMIT {
            return Err(ServerError::Config(format!(
                "max_body_bytes {} exceeds {MAX_BODY_LIMIT}",
                self.max_body_bytes
            )));
        }
        if self.allow_origin.is_empty() || self.allow_origin.contains(['\r', '\n']) {
            return Err(ServerError::Config(format!(
                "invalid allow_origin {:?}",
                self.allow_origin
            )));
        }
        Ok(())
    }

    /// Driver holding a freshly seeded list.
    pub fn build_driver(&self) -> ApiDriver {
        let list = LinkedList::from_values(self.initial_values.iter().copied());
        ApiDriver::new(list).with_allow_origin(self.allow_origin.clone())
    }

    /// Limits applied to every connection.
    pub fn limits(&self) -> ConnectionLimits {
        ConnectionLimits { max_body_bytes: self.max_body_bytes }
    }
}

/// Production chainlist server.
pub struct Server {
    /// Bound listener
    listener: TcpListener,
    /// Driver shared with every connection task
    driver: SharedDriver,
    /// Per-connection limits
    limits: ConnectionLimits,
}

impl Server {
    /// Create and bind a new server.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The configuration is invalid
    /// - Binding to the address fails
    pub async fn bind(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let driver = shared(config.build_driver());
        let listener = TcpListener::bind(&config.bind_address).await?;

        Ok(Self { listener, driver, limits: config.limits() })
    }

    /// Handle to the shared driver.
    pub fn driver(&self) -> SharedDriver {
        SharedDriver::clone(&self.driver)
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server, accepting connections forever.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server until `shutdown` completes.
    ///
    /// Connections already being served finish on their own tasks.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<(), ServerError> {
        tracing::info!("Server starting on {}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Server shutting down");
                    return Ok(());
                },
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::debug!("New connection from {}", peer);
                        let driver = SharedDriver::clone(&self.driver);
                        let limits = self.limits;

                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(stream, driver, limits).await {
                                tracing::debug!("Connection {} error: {}", peer, e);
                            }
                        });
                    },
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                    },
                },
            }
        }
    }
}
