//! Response envelope.

use serde::{Deserialize, Serialize};

use crate::NodeView;

/// Envelope wrapping every API response body.
///
/// Serialized with an internal `status` tag, so a success reads
/// `{"status":"success","data":[...]}` and a failure reads
/// `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    /// Operation applied; carries the list as it is now.
    Success {
        /// Snapshot after the operation.
        data: Vec<NodeView>,
    },

    /// Operation refused; the list is unchanged.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl ApiResponse {
    /// Success envelope around a snapshot.
    pub fn success(data: Vec<NodeView>) -> Self {
        Self::Success { data }
    }

    /// Error envelope with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    /// Whether this is a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Snapshot carried by a success envelope.
    pub fn data(&self) -> Option<&[NodeView]> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    /// Message carried by an error envelope.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }

    /// Encode as a JSON body.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
