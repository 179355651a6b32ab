//! Narrow interface onto the external event-bus bridge
//!
//! The bridge transport is an external collaborator: it owns the wire
//! protocol, keep-alive pings, and the reconnect/backoff cycle. This crate
//! only configures it (see [`BridgeConfig`](crate::BridgeConfig)) and drives
//! it through the traits below. Concrete implementations are supplied by the
//! embedding application; tests use an in-memory one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::messages::BusError;

/// Handler invoked by the bridge for each message on a registered address
///
/// Receives the raw inbound envelope and the failure descriptor the transport
/// reported alongside it, if any.
pub type BridgeHandler = Arc<dyn Fn(serde_json::Value, Option<BusError>) + Send + Sync>;

/// An open bridge connection
#[async_trait]
pub trait EventBusBridge: Send + Sync {
    /// Enable or disable automatic reconnection for this connection
    fn enable_reconnect(&self, enabled: bool);

    /// Register a message handler on a bus address
    async fn register_handler(&self, address: &str, handler: BridgeHandler) -> Result<()>;

    /// Close the connection
    async fn close(&self) -> Result<()>;
}

/// Factory that opens bridge connections
#[async_trait]
pub trait BridgeConnector: Send + Sync {
    /// Open a connection to `url` with the given transport configuration
    ///
    /// Resolves once the transport has reported "open"; fails with a
    /// transport-setup error otherwise. Must not leave a half-initialized
    /// connection behind on failure.
    async fn open(
        &self,
        url: &str,
        config: &crate::config::BridgeConfig,
    ) -> Result<Arc<dyn EventBusBridge>>;
}
