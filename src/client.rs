//! Items session implementation

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::auth;
use crate::bridge::{BridgeConnector, BridgeHandler, EventBusBridge};
use crate::config::{BridgeConfig, ClientOptions};
use crate::error::{ItembusError, Result};
use crate::messages::{BusError, UpdateBody, UpdateMessage};

/// Fixed prefix of the tenant update channel
pub const UPDATES_ADDRESS_PREFIX: &str = "items";

/// Bus address carrying item updates for a company
pub fn updates_address(company: &str) -> String {
    format!("{UPDATES_ADDRESS_PREFIX}.updates.{company}")
}

/// Lifecycle state of an items session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, not yet connected
    Created,
    /// Transport setup in progress
    Connecting,
    /// Connected with the update handler registered
    Open,
    /// Torn down; terminal, the session is not reusable
    Closed,
}

/// Consumer callback for item updates
pub type UpdateHandler = Arc<dyn Fn(UpdateMessage, Option<BusError>) + Send + Sync>;

struct ClientInner {
    url: String,
    company: String,
    options: Option<ClientOptions>,
    connector: Arc<dyn BridgeConnector>,
    state: Mutex<SessionState>,
    bridge: Mutex<Option<Arc<dyn EventBusBridge>>>,
    callback: Mutex<Option<UpdateHandler>>,
}

/// A tenant-scoped items session on the event-bus bridge
///
/// Created through [`ItemsClient::authenticate`], which verifies the token
/// and derives the company the session subscribes for. Cheaply cloneable;
/// clones share the same session.
#[derive(Clone)]
pub struct ItemsClient {
    inner: Arc<ClientInner>,
}

impl ItemsClient {
    /// Authenticate and build a not-yet-connected session
    ///
    /// Reads the signing key from its well-known path
    /// ([`auth::DEFAULT_KEY_PATH`]), verifies `token`, and derives the tenant
    /// the session will subscribe for. Fails without creating a session when
    /// the key is unreadable or the token does not verify.
    pub async fn authenticate(
        connector: Arc<dyn BridgeConnector>,
        base_url: &str,
        token: &str,
        options: Option<ClientOptions>,
    ) -> Result<Self> {
        let key = auth::load_signing_key(auth::DEFAULT_KEY_PATH).await?;
        Self::authenticate_with_key(connector, base_url, token, &key, options)
    }

    /// Authenticate with key material supplied by the caller
    ///
    /// Same contract as [`ItemsClient::authenticate`] without the well-known
    /// key file read.
    pub fn authenticate_with_key(
        connector: Arc<dyn BridgeConnector>,
        base_url: &str,
        token: &str,
        key: &str,
        options: Option<ClientOptions>,
    ) -> Result<Self> {
        let company = auth::verify_token(token, key)?;
        info!(%company, "authenticated");

        Ok(Self {
            inner: Arc::new(ClientInner {
                url: format!("{base_url}?token={token}"),
                company,
                options,
                connector,
                state: Mutex::new(SessionState::Created),
                bridge: Mutex::new(None),
                callback: Mutex::new(None),
            }),
        })
    }

    /// The tenant this session is scoped to
    pub fn company(&self) -> &str {
        &self.inner.company
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.inner.state.lock()
    }

    /// Open the bridge connection and subscribe to the tenant update channel
    ///
    /// Opens the transport with the configuration mapped from the session's
    /// [`ClientOptions`] (transport defaults when absent), enables automatic
    /// reconnection, and registers the dispatch handler on
    /// `items.updates.<company>`. Resolves only after that registration
    /// succeeds; any setup failure closes the session for good.
    pub async fn connect(&self) -> Result<()> {
        if let Some(opts) = &self.inner.options {
            opts.validate()?;
        }

        {
            let mut state = self.inner.state.lock();
            match *state {
                SessionState::Created => *state = SessionState::Connecting,
                SessionState::Connecting | SessionState::Open => {
                    return Err(ItembusError::AlreadyConnected)
                }
                SessionState::Closed => return Err(ItembusError::Closed),
            }
        }

        match self.setup_transport().await {
            Ok(bridge) => {
                *self.inner.bridge.lock() = Some(bridge);
                *self.inner.state.lock() = SessionState::Open;
                info!(company = %self.inner.company, "session open");
                Ok(())
            }
            Err(e) => {
                *self.inner.state.lock() = SessionState::Closed;
                Err(e)
            }
        }
    }

    async fn setup_transport(&self) -> Result<Arc<dyn EventBusBridge>> {
        let config = BridgeConfig::from_options(self.inner.options.as_ref());

        debug!(url = %self.inner.url, "opening bridge");
        let bridge = self.inner.connector.open(&self.inner.url, &config).await?;
        bridge.enable_reconnect(true);

        let inner = self.inner.clone();
        let handler: BridgeHandler =
            Arc::new(move |envelope, error| inner.dispatch(envelope, error));

        let address = updates_address(&self.inner.company);
        if let Err(e) = bridge.register_handler(&address, handler).await {
            // Don't leave a half-initialized transport behind
            let _ = bridge.close().await;
            return Err(e);
        }
        debug!(%address, "update handler registered");

        Ok(bridge)
    }

    /// Close the bridge connection
    ///
    /// With no active transport handle (never connected, or already closed)
    /// this reports the misuse and returns [`ItembusError::NotConnected`]
    /// instead of crashing.
    pub async fn disconnect(&self) -> Result<()> {
        let bridge = self.inner.bridge.lock().take();
        match bridge {
            Some(bridge) => {
                *self.inner.state.lock() = SessionState::Closed;
                bridge.close().await?;
                info!(company = %self.inner.company, "session closed");
                Ok(())
            }
            None => {
                warn!(company = %self.inner.company, "disconnect without an active transport");
                Err(ItembusError::NotConnected)
            }
        }
    }

    /// Register the consumer callback for item updates
    ///
    /// Single-slot, last registration wins: a new callback silently replaces
    /// the previous one and receives all subsequent deliveries. Messages
    /// delivered while no callback is registered are reported and dropped,
    /// never buffered.
    pub fn on_item_update<F>(&self, callback: F)
    where
        F: Fn(UpdateMessage, Option<BusError>) + Send + Sync + 'static,
    {
        *self.inner.callback.lock() = Some(Arc::new(callback));
    }
}

impl ClientInner {
    /// Translate one inbound envelope into a callback invocation
    ///
    /// Runs synchronously within the transport's delivery notification; no
    /// buffering or backpressure is added here.
    fn dispatch(&self, envelope: serde_json::Value, error: Option<BusError>) {
        let callback = self.callback.lock().clone();
        let Some(callback) = callback else {
            warn!(company = %self.company, "update dropped: no callback registered");
            return;
        };

        let Some(body) = envelope.get("body").cloned() else {
            warn!(company = %self.company, "update dropped: envelope has no body");
            return;
        };

        match serde_json::from_value::<UpdateBody>(body) {
            Ok(body) => callback(UpdateMessage::from_body(body), error),
            Err(e) => {
                warn!(company = %self.company, "update dropped: malformed body: {e}")
            }
        }
    }
}
