//! Inter-task shared state
//!
//! All three tasks communicate through one static telemetry store of
//! lock-free atomic cells; there are no channels and no blocking. The
//! network task writes stats, the sensor task writes readings and the
//! display mode, and the render task takes a snapshot every frame.

use lumistat_core::telemetry::TelemetryStore;

/// The process-wide telemetry store
pub static TELEMETRY: TelemetryStore = TelemetryStore::new();
