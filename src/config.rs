//! Configuration for the itembus client
//!
//! `ClientOptions` is the consumer-facing set of keep-alive and reconnection
//! knobs; `BridgeConfig` is the wire-facing object handed to the bridge
//! connector. The bridge expects a fixed configuration schema, so the
//! serialized field names in `BridgeConfig` must not change.

use serde::Serialize;

use crate::error::{ItembusError, Result};

/// Keep-alive and reconnection options for an items session
///
/// All durations are in milliseconds. Options are immutable once handed to a
/// session; omitting them entirely makes the transport apply its own defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Interval between keep-alive pings
    pub ping_interval: u64,

    /// Maximum number of reconnect attempts; `None` means unlimited
    pub reconnect_attempts_max: Option<u32>,

    /// Minimum delay before a reconnect attempt
    pub reconnect_delay_min: u64,

    /// Maximum delay between reconnect attempts
    pub reconnect_delay_max: u64,

    /// Exponent applied to the backoff growth between attempts
    pub reconnect_exponent: u32,

    /// Jitter applied to reconnect delays, in `[0, 1]`
    pub randomization_factor: f64,
}

impl ClientOptions {
    /// Create options populated with the transport's documented defaults
    pub fn new() -> Self {
        Self {
            ping_interval: 5000,
            reconnect_attempts_max: None,
            reconnect_delay_min: 1000,
            reconnect_delay_max: 5000,
            reconnect_exponent: 2,
            randomization_factor: 0.5,
        }
    }

    /// Set the keep-alive ping interval in milliseconds
    pub fn ping_interval(mut self, millis: u64) -> Self {
        self.ping_interval = millis;
        self
    }

    /// Cap the number of reconnect attempts
    pub fn reconnect_attempts_max(mut self, attempts: u32) -> Self {
        self.reconnect_attempts_max = Some(attempts);
        self
    }

    /// Set the reconnect delay range in milliseconds
    pub fn reconnect_delay(mut self, min: u64, max: u64) -> Self {
        self.reconnect_delay_min = min;
        self.reconnect_delay_max = max;
        self
    }

    /// Set the exponential backoff exponent
    pub fn reconnect_exponent(mut self, exponent: u32) -> Self {
        self.reconnect_exponent = exponent;
        self
    }

    /// Set the reconnect jitter factor (must be in `[0, 1]`)
    pub fn randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    /// Check option ranges; called by the session before opening the bridge
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(ItembusError::Configuration(format!(
                "randomization factor {} is outside [0, 1]",
                self.randomization_factor
            )));
        }
        Ok(())
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration object handed to the bridge at construction
///
/// Field names follow the bridge's expected schema exactly; absent fields are
/// omitted so the transport falls back to its own defaults.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(
        rename = "vertxbus_ping_interval",
        skip_serializing_if = "Option::is_none"
    )]
    pub ping_interval: Option<u64>,

    #[serde(
        rename = "vertxbus_reconnect_attempts_max",
        skip_serializing_if = "Option::is_none"
    )]
    pub reconnect_attempts_max: Option<u32>,

    #[serde(
        rename = "vertxbus_reconnect_delay_min",
        skip_serializing_if = "Option::is_none"
    )]
    pub reconnect_delay_min: Option<u64>,

    #[serde(
        rename = "vertxbus_reconnect_delay_max",
        skip_serializing_if = "Option::is_none"
    )]
    pub reconnect_delay_max: Option<u64>,

    #[serde(
        rename = "vertxbus_reconnect_exponent",
        skip_serializing_if = "Option::is_none"
    )]
    pub reconnect_exponent: Option<u32>,

    #[serde(
        rename = "vertxbus_randomization_factor",
        skip_serializing_if = "Option::is_none"
    )]
    pub randomization_factor: Option<f64>,
}

impl BridgeConfig {
    /// Map client options field-by-field onto the bridge schema
    ///
    /// `None` produces an empty object, leaving every transport default in
    /// place.
    pub fn from_options(options: Option<&ClientOptions>) -> Self {
        match options {
            Some(opts) => Self {
                ping_interval: Some(opts.ping_interval),
                reconnect_attempts_max: opts.reconnect_attempts_max,
                reconnect_delay_min: Some(opts.reconnect_delay_min),
                reconnect_delay_max: Some(opts.reconnect_delay_max),
                reconnect_exponent: Some(opts.reconnect_exponent),
                randomization_factor: Some(opts.randomization_factor),
            },
            None => Self::default(),
        }
    }
}
