//! Update protocol types
//!
//! These mirror the envelope shape the bridge delivers on the tenant update
//! channel.

use serde::{Deserialize, Serialize};

/// Kind of change carried by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateType {
    Post,
    Put,
    Delete,
}

/// Body of an inbound update envelope, as delivered by the bridge
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UpdateBody {
    /// Kind of change
    #[serde(rename = "type")]
    pub kind: UpdateType,

    /// Numeric entity id the update refers to
    pub id: u64,

    /// Content payload, present for POST/PUT
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

/// A tenant-scoped change notification handed to the consumer callback
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMessage {
    /// Kind of change
    pub kind: UpdateType,

    /// Numeric entity id the update refers to
    pub id: u64,

    /// Content payload
    ///
    /// Passed through as received for POST and PUT. Always `None` for DELETE,
    /// even when the envelope carries a content field; consumers must not
    /// assume presence.
    pub content: Option<serde_json::Value>,
}

impl UpdateMessage {
    /// Build the callback payload from an envelope body, applying the DELETE
    /// content-omission policy
    pub fn from_body(body: UpdateBody) -> Self {
        let content = match body.kind {
            UpdateType::Delete => None,
            UpdateType::Post | UpdateType::Put => body.content,
        };
        Self {
            kind: body.kind,
            id: body.id,
            content,
        }
    }
}

/// Out-of-band failure descriptor the transport may report alongside a
/// delivery
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusError {
    /// Numeric failure code
    pub failure_code: i64,

    /// Failure category reported by the bus
    pub failure_type: String,

    /// Human-readable message
    pub message: String,
}
