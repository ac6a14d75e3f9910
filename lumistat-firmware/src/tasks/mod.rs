//! Embassy async tasks
//!
//! Each task runs on its own period and communicates only through the
//! shared telemetry store.

pub mod render;
pub mod sensor;
#[cfg(feature = "wifi")]
pub mod stats_rx;

pub use render::render_task;
pub use sensor::sensor_task;
#[cfg(feature = "wifi")]
pub use stats_rx::stats_rx_task;
