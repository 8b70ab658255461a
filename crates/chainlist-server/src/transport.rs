//! Connection handling.
//!
//! One task per connection. Each task reads bytes, decodes as many requests
//! as are buffered, and answers them in order. The driver is locked for the
//! duration of a single request, which makes every API operation atomic with
//! respect to all connections.
//!
//! The function is generic over the stream so the same code runs on tokio
//! sockets in production and on simulated sockets in tests.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};

use crate::{
    driver::ApiDriver,
    error::ServerError,
    http::{self, HttpResponse},
};

/// Driver shared by every connection of a server.
pub type SharedDriver = Arc<Mutex<ApiDriver>>;

/// Wrap a driver for sharing.
pub fn shared(driver: ApiDriver) -> SharedDriver {
    Arc::new(Mutex::new(driver))
}

/// Per-connection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self { max_body_bytes: 64 * 1024 }
    }
}

/// Serve requests on one connection until the peer closes it, asks to close
/// it, or sends something that cannot be framed.
pub async fn serve_connection<S>(
    mut stream: S,
    driver: SharedDriver,
    limits: ConnectionLimits,
) -> Result<(), ServerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut inbound = BytesMut::with_capacity(4096);
    let mut outbound = BytesMut::with_capacity(4096);

    loop {
        match http::decode_request(&mut inbound, limits.max_body_bytes) {
            Ok(Some(request)) => {
                let keep_alive = request.keep_alive();
                let mut response = {
                    let mut driver = driver.lock().await;
                    driver.handle(&request)
                };
                tracing::debug!("{} {} -> {}", request.method, request.path, response.status);

                if !keep_alive {
                    response = response.with_header("Connection", "close");
                }
                write_response(&mut stream, &mut outbound, &response).await?;

                if !keep_alive {
                    break;
                }
                continue;
            },
            Ok(None) => {},
            Err(e) => {
                tracing::warn!("Rejecting request: {}", e);
                let response = driver.lock().await.reject(&e).with_header("Connection", "close");
                write_response(&mut stream, &mut outbound, &response).await?;
                break;
            },
        }

        let read = stream.read_buf(&mut inbound).await?;
        if read == 0 {
            if !inbound.is_empty() {
                tracing::debug!("Peer closed with {} bytes of a partial request", inbound.len());
            }
            break;
        }
    }

    let _ = stream.shutdown().await;
    Ok(())
}

async fn write_response<S>(
    stream: &mut S,
    buf: &mut BytesMut,
    response: &HttpResponse,
) -> Result<(), ServerError>
where
    S: AsyncWrite + Unpin,
{
    buf.clear();
    response.encode(buf);
    stream.write_all(buf).await?;
    stream.flush().await?;
    Ok(())
}
