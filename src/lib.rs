//! Itembus Rust Client
//!
//! A tenant-scoped subscription client for the itembus event-bus bridge.
//! Authenticating decodes a JWT against a locally stored signing key to derive
//! the company the session belongs to; connecting opens the bridge transport,
//! forwards the reconnect/keep-alive configuration, and registers a handler on
//! the company's update channel (`items.updates.<company>`). Inbound bus
//! envelopes are translated into typed [`UpdateMessage`] callback invocations.
//!
//! The bridge transport itself (wire protocol, ping/pong, exponential-backoff
//! reconnects) is an external collaborator consumed through the
//! [`BridgeConnector`]/[`EventBusBridge`] traits; this crate only configures
//! and drives it.
//!
//! # Example
//!
//! ```ignore
//! use itembus_client::{ClientOptions, ItemsClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Any implementation of the bridge traits; supplied by the embedding
//!     // application.
//!     let connector = Arc::new(my_bridge::Connector::new());
//!
//!     let options = ClientOptions::new()
//!         .ping_interval(10_000)
//!         .reconnect_delay(500, 30_000);
//!
//!     let client = ItemsClient::authenticate(
//!         connector,
//!         "wss://bus.example.com/eventbus",
//!         std::env::var("ITEMBUS_TOKEN")?.as_str(),
//!         Some(options),
//!     )
//!     .await?;
//!
//!     client.on_item_update(|update, error| {
//!         println!("item {} changed: {:?} (error: {:?})", update.id, update.kind, error);
//!     });
//!
//!     client.connect().await?;
//!     // ... receive updates ...
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
mod bridge;
mod client;
mod config;
mod error;
mod messages;

pub use bridge::{BridgeConnector, BridgeHandler, EventBusBridge};
pub use client::{updates_address, ItemsClient, SessionState, UpdateHandler, UPDATES_ADDRESS_PREFIX};
pub use config::{BridgeConfig, ClientOptions};
pub use error::{ItembusError, Result};
pub use messages::{BusError, UpdateBody, UpdateMessage, UpdateType};
