//! Anonymous usage reporting.
//!
//! One event is sent after each successful fetch. The send runs on a
//! detached task that nobody awaits: if the process exits first the event is
//! simply lost, and any error is discarded.

use std::sync::Arc;

use serde::Serialize;

use crate::registry::PackRegistry;
use crate::types::SourceUsed;

/// Environment variable that disables telemetry when set to `1`.
pub const ENV_NO_TELEMETRY: &str = "PACKS_NO_TELEMETRY";

/// A single usage event, in registry wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    /// Pack identifier as resolved.
    pub pack: String,
    /// Fetch mechanism label.
    pub source: String,
    /// Requested pack version, empty for GitHub sources.
    pub version: String,
    pub cli_version: String,
    pub os: String,
    pub arch: String,
}

impl TelemetryEvent {
    /// Build an event for the running binary.
    pub fn new(pack: &str, source: SourceUsed, version: Option<&str>) -> Self {
        Self {
            pack: pack.to_owned(),
            source: source.as_str().to_owned(),
            version: version.unwrap_or_default().to_owned(),
            cli_version: env!("CARGO_PKG_VERSION").to_owned(),
            os: std::env::consts::OS.to_owned(),
            arch: std::env::consts::ARCH.to_owned(),
        }
    }
}

/// Send `event` on a detached task.
///
/// Returns immediately. Errors here are intentionally discarded.
pub fn report_detached(registry: Arc<dyn PackRegistry>, event: TelemetryEvent) {
    if tokio::runtime::Handle::try_current().is_err() {
        tracing::debug!("no async runtime, skipping telemetry");
        return;
    }

    tokio::spawn(async move {
        if let Err(e) = registry.telemetry(&event).await {
            tracing::debug!(error = %e, pack = %event.pack, "telemetry dropped");
        }
    });
}
