//! Minimal API client.
//!
//! Speaks the same codec as the server over any async stream. Used by the
//! integration tests and the simulation harness; also handy for scripting
//! against a running server.

use bytes::BytesMut;
use chainlist_proto::{
    ApiResponse, DELETE_PATH, DeleteRequest, INSERT_PATH, InsertRequest, LIST_PATH, Position,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    error::ServerError,
    http::{HttpRequest, HttpResponse, Method, StatusCode},
};

/// Upper bound on response bodies the client will buffer.
const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Keep-alive API client over a single connection.
#[derive(Debug)]
pub struct ApiClient<S> {
    stream: S,
    host: String,
    buf: BytesMut,
}

impl<S> ApiClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a connected stream. `host` goes into the `Host` header.
    pub fn new(stream: S, host: impl Into<String>) -> Self {
        Self { stream, host: host.into(), buf: BytesMut::with_capacity(4096) }
    }

    /// Send a raw request and wait for its response.
    pub async fn send(&mut self, request: HttpRequest) -> Result<HttpResponse, ServerError> {
        let request = request.with_header("Host", self.host.clone());
        let mut out = BytesMut::new();
        request.encode(&mut out);
        self.stream.write_all(&out).await?;
        self.stream.flush().await?;

        loop {
            if let Some(response) = HttpResponse::decode(&mut self.buf, MAX_RESPONSE_BYTES)? {
                return Ok(response);
            }
            if self.stream.read_buf(&mut self.buf).await? == 0 {
                return Err(ServerError::Transport(
                    "connection closed before response completed".to_string(),
                ));
            }
        }
    }

    /// Send a request and decode the JSON envelope.
    pub async fn call(
        &mut self,
        request: HttpRequest,
    ) -> Result<(StatusCode, ApiResponse), ServerError> {
        let response = self.send(request).await?;
        let body = ApiResponse::from_json(&response.body)?;
        Ok((response.status, body))
    }

    /// `GET /api/linkedlist`
    pub async fn list(&mut self) -> Result<(StatusCode, ApiResponse), ServerError> {
        self.call(HttpRequest::new(Method::Get, LIST_PATH)).await
    }

    /// `POST /api/linkedlist/insert`
    pub async fn insert(
        &mut self,
        value: i64,
        position: Position,
    ) -> Result<(StatusCode, ApiResponse), ServerError> {
        let body = serde_json::to_vec(&InsertRequest::new(value, position))?;
        self.call(HttpRequest::new(Method::Post, INSERT_PATH).with_json(body)).await
    }

    /// `DELETE /api/linkedlist/delete`
    pub async fn delete(&mut self, value: i64) -> Result<(StatusCode, ApiResponse), ServerError> {
        let body = serde_json::to_vec(&DeleteRequest::new(value))?;
        self.call(HttpRequest::new(Method::Delete, DELETE_PATH).with_json(body)).await
    }
}
