//! API driver
//!
//! Sans-IO request handling: takes a decoded [`HttpRequest`], applies it to
//! the list, and returns the [`HttpResponse`] to send. The driver owns the
//! list; the transport decides how the driver is shared between connections.
//!
//! ## Routes
//!
//! | Method   | Path                     | Effect                          |
//! |----------|--------------------------|---------------------------------|
//! | `GET`    | `/api/linkedlist`        | snapshot                        |
//! | `POST`   | `/api/linkedlist/insert` | insert at start or end          |
//! | `DELETE` | `/api/linkedlist/delete` | delete first node with value    |
//! | `OPTIONS`| any of the above         | CORS preflight, `204`           |
//!
//! Bodies are validated completely before the list is touched, so a
//! rejected request never mutates anything.

use chainlist_core::{LinkedList, ListError};
use chainlist_proto::{
    ApiResponse, DELETE_PATH, DeleteRequest, INSERT_PATH, InsertRequest, LIST_PATH, NodeView,
    ValidationError,
};

use crate::http::{HttpError, HttpRequest, HttpResponse, Method, StatusCode};

const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Known API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /api/linkedlist`
    List,
    /// `POST /api/linkedlist/insert`
    Insert,
    /// `DELETE /api/linkedlist/delete`
    Delete,
}

impl Route {
    /// Match a request path.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            LIST_PATH => Some(Self::List),
            INSERT_PATH => Some(Self::Insert),
            DELETE_PATH => Some(Self::Delete),
            _ => None,
        }
    }

    /// The one method this route serves (besides preflight).
    pub fn method(self) -> Method {
        match self {
            Self::List => Method::Get,
            Self::Insert => Method::Post,
            Self::Delete => Method::Delete,
        }
    }
}

/// A validated operation, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    /// Read the current snapshot.
    Snapshot,
    /// Insert a value.
    Insert(InsertRequest),
    /// Delete the first node holding a value.
    Delete(DeleteRequest),
}

impl ApiCommand {
    /// Validate a request body for a route.
    pub fn parse(route: Route, body: &[u8]) -> Result<Self, ValidationError> {
        match route {
            Route::List => Ok(Self::Snapshot),
            Route::Insert => InsertRequest::from_json(body).map(Self::Insert),
            Route::Delete => DeleteRequest::from_json(body).map(Self::Delete),
        }
    }
}

/// Outcome of applying a command: the status and envelope to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    /// HTTP status.
    pub status: StatusCode,
    /// JSON envelope.
    pub body: ApiResponse,
}

impl ApiReply {
    fn success(data: Vec<NodeView>) -> Self {
        Self { status: StatusCode::Ok, body: ApiResponse::success(data) }
    }

    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: ApiResponse::error(message) }
    }
}

impl From<ValidationError> for ApiReply {
    fn from(err: ValidationError) -> Self {
        Self::error(StatusCode::BadRequest, err.to_string())
    }
}

impl From<ListError> for ApiReply {
    fn from(err: ListError) -> Self {
        match err {
            ListError::NotFound { .. } => Self::error(StatusCode::NotFound, err.to_string()),
        }
    }
}

/// Owns the list and turns requests into responses.
#[derive(Debug)]
pub struct ApiDriver {
    list: LinkedList,
    allow_origin: String,
}

impl ApiDriver {
    /// Create a driver around an existing list. CORS allows any origin.
    pub fn new(list: LinkedList) -> Self {
        Self { list, allow_origin: "*".to_string() }
    }

    /// Set the `Access-Control-Allow-Origin` value.
    #[must_use]
    pub fn with_allow_origin(mut self, origin: impl Into<String>) -> Self {
        self.allow_origin = origin.into();
        self
    }

    /// The list as it is now.
    pub fn list(&self) -> &LinkedList {
        &self.list
    }

    /// Handle one decoded request.
    pub fn handle(&mut self, request: &HttpRequest) -> HttpResponse {
        let Some(route) = Route::from_path(&request.path) else {
            tracing::debug!("No route for {} {}", request.method, request.path);
            let reply = ApiReply::error(
                StatusCode::NotFound,
                format!("No route for {}", request.path),
            );
            return self.respond(&reply);
        };

        if request.method == Method::Options {
            return self.with_cors(
                HttpResponse::empty(StatusCode::NoContent)
                    .with_header("Access-Control-Allow-Methods", ALLOWED_METHODS)
                    .with_header("Access-Control-Allow-Headers", ALLOWED_HEADERS)
                    .with_header("Access-Control-Max-Age", "86400"),
            );
        }

        if request.method != route.method() {
            let reply = ApiReply::error(
                StatusCode::MethodNotAllowed,
                format!("Method {} not allowed on {}", request.method, request.path),
            );
            return self
                .respond(&reply)
                .with_header("Allow", format!("{}, OPTIONS", route.method()));
        }

        let reply = match ApiCommand::parse(route, &request.body) {
            Ok(command) => self.apply(command),
            Err(e) => {
                tracing::debug!("Rejected {} {}: {}", request.method, request.path, e);
                ApiReply::from(e)
            },
        };
        self.respond(&reply)
    }

    /// Apply a validated command to the list.
    pub fn apply(&mut self, command: ApiCommand) -> ApiReply {
        match command {
            ApiCommand::Snapshot => ApiReply::success(self.list.snapshot()),
            ApiCommand::Insert(InsertRequest { value, position }) => {
                self.list.insert(value, position);
                tracing::info!("Inserted {} at {}", value, position);
                ApiReply::success(self.list.snapshot())
            },
            ApiCommand::Delete(DeleteRequest { value }) => match self.list.delete_by_value(value) {
                Ok(()) => {
                    tracing::info!("Deleted {}", value);
                    ApiReply::success(self.list.snapshot())
                },
                Err(e) => {
                    tracing::debug!("Delete failed: {}", e);
                    ApiReply::from(e)
                },
            },
        }
    }

    /// Response for a request that could not be framed.
    pub fn reject(&self, err: &HttpError) -> HttpResponse {
        self.respond(&ApiReply::error(err.status(), err.to_string()))
    }

    fn respond(&self, reply: &ApiReply) -> HttpResponse {
        self.with_cors(HttpResponse::json(reply.status, &reply.body))
    }

    fn with_cors(&self, response: HttpResponse) -> HttpResponse {
        response.with_header("Access-Control-Allow-Origin", self.allow_origin.clone())
    }
}
