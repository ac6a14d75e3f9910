//! The process-wide telemetry store.
//!
//! Three independently clocked tasks touch this state: network ingest
//! writes stats and the packet timestamp, the sensor task writes
//! environment readings and the mode, and the render task reads a
//! snapshot every frame. Each field is written by exactly one task
//! role, so plain atomic cells with relaxed ordering are sufficient:
//! the render task only needs to observe values no older than the last
//! completed write, and cross-field atomicity of a stats update is
//! explicitly not required for a monitoring display.

use portable_atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use lumistat_protocol::StatsPayload;

use crate::mode::DisplayMode;

/// A packet older than this no longer counts as "connected"
pub const STALE_PACKET_MS: u64 = 7_000;

/// Plausible room temperature, degrees Celsius (exclusive bounds)
const TEMP_RANGE_C: (f32, f32) = (-50.0, 100.0);
/// Plausible relative humidity, percent (inclusive bounds)
const HUMIDITY_RANGE_PCT: (f32, f32) = (0.0, 100.0);

/// Sentinel for "no packet received yet"
const NEVER: u64 = u64::MAX;

/// Quiet NaN bit pattern; fields start as NaN so an absent sensor
/// renders as a neutral mood and a zero readout instead of garbage.
const NAN_BITS: u32 = 0x7fc0_0000;

/// An f32 stored as its bit pattern in an atomic cell
struct MetricCell(portable_atomic::AtomicU32);

impl MetricCell {
    const fn new(bits: u32) -> Self {
        Self(portable_atomic::AtomicU32::new(bits))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Snapshot of everything one rendered frame depends on
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct View {
    pub mode: DisplayMode,
    /// Reported load percentages (smoothing targets)
    pub cpu: f32,
    pub gpu: f32,
    pub ram: f32,
    /// Room readings; NaN when never measured
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub internal_temp_c: f32,
    /// Wall clock from the last stats payload carrying one
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Link up and a fresh packet seen recently
    pub connected: bool,
}

/// Synchronized holder of the latest telemetry.
///
/// One static instance lives for the whole runtime; every accessor
/// takes `&self` and is callable from any task.
pub struct TelemetryStore {
    cpu: MetricCell,
    gpu: MetricCell,
    ram: MetricCell,
    temperature_c: MetricCell,
    humidity_pct: MetricCell,
    internal_temp_c: MetricCell,
    hour: AtomicU8,
    minute: AtomicU8,
    second: AtomicU8,
    last_packet_ms: AtomicU64,
    link_up: AtomicBool,
    mode: AtomicU8,
}

impl TelemetryStore {
    /// Create an empty store: no packet, link down, sensors unread,
    /// Ambient mode.
    pub const fn new() -> Self {
        Self {
            cpu: MetricCell::new(0),
            gpu: MetricCell::new(0),
            ram: MetricCell::new(0),
            temperature_c: MetricCell::new(NAN_BITS),
            humidity_pct: MetricCell::new(NAN_BITS),
            internal_temp_c: MetricCell::new(0),
            hour: AtomicU8::new(0),
            minute: AtomicU8::new(0),
            second: AtomicU8::new(0),
            last_packet_ms: AtomicU64::new(NEVER),
            link_up: AtomicBool::new(false),
            mode: AtomicU8::new(DisplayMode::Ambient.to_raw()),
        }
    }

    /// Apply a decoded stats payload (network ingest task).
    ///
    /// Stats fields are written wholesale; the clock only moves when
    /// the payload carried a valid time.
    pub fn apply_stats(&self, payload: &StatsPayload, now_ms: u64) {
        self.cpu.store(payload.cpu);
        self.ram.store(payload.mem);
        self.gpu.store(payload.gpu);
        if let Some(time) = payload.time {
            self.hour.store(time.hour, Ordering::Relaxed);
            self.minute.store(time.minute, Ordering::Relaxed);
            self.second.store(time.second, Ordering::Relaxed);
        }
        self.last_packet_ms.store(now_ms, Ordering::Relaxed);
    }

    /// Record a room temperature reading; implausible or NaN readings
    /// leave the previous value in place. Returns whether it was taken.
    pub fn record_temperature(&self, reading: f32) -> bool {
        let plausible = reading > TEMP_RANGE_C.0 && reading < TEMP_RANGE_C.1;
        if plausible {
            self.temperature_c.store(reading);
        }
        plausible
    }

    /// Record a humidity reading with the same retention rule
    pub fn record_humidity(&self, reading: f32) -> bool {
        let plausible = reading >= HUMIDITY_RANGE_PCT.0 && reading <= HUMIDITY_RANGE_PCT.1;
        if plausible {
            self.humidity_pct.store(reading);
        }
        plausible
    }

    /// Record the microcontroller's own die temperature
    pub fn record_internal_temp(&self, reading: f32) {
        self.internal_temp_c.store(reading);
    }

    /// Mark the network link up or down
    pub fn set_link_up(&self, up: bool) {
        self.link_up.store(up, Ordering::Relaxed);
    }

    /// The staleness heuristic: link up and the last decoded packet
    /// arrived less than [`STALE_PACKET_MS`] ago. There is no explicit
    /// disconnect event from the network layer; this predicate is
    /// evaluated fresh once per render tick.
    pub fn connected(&self, now_ms: u64) -> bool {
        if !self.link_up.load(Ordering::Relaxed) {
            return false;
        }
        let last = self.last_packet_ms.load(Ordering::Relaxed);
        last != NEVER && now_ms.saturating_sub(last) < STALE_PACKET_MS
    }

    /// Current display mode
    pub fn mode(&self) -> DisplayMode {
        DisplayMode::from_raw(self.mode.load(Ordering::Relaxed))
    }

    /// Step to the next mode (sensor task, on a debounced touch edge)
    /// and return it
    pub fn advance_mode(&self) -> DisplayMode {
        let next = self.mode().next();
        self.mode.store(next.to_raw(), Ordering::Relaxed);
        next
    }

    /// Take the per-frame snapshot (render task)
    pub fn view(&self, now_ms: u64) -> View {
        View {
            mode: self.mode(),
            cpu: self.cpu.load(),
            gpu: self.gpu.load(),
            ram: self.ram.load(),
            temperature_c: self.temperature_c.load(),
            humidity_pct: self.humidity_pct.load(),
            internal_temp_c: self.internal_temp_c.load(),
            hour: self.hour.load(Ordering::Relaxed),
            minute: self.minute.load(Ordering::Relaxed),
            second: self.second.load(Ordering::Relaxed),
            connected: self.connected(now_ms),
        }
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumistat_protocol::TimeOfDay;

    fn payload(cpu: f32, mem: f32, gpu: f32) -> StatsPayload {
        StatsPayload {
            cpu,
            mem,
            gpu,
            time: Some(TimeOfDay {
                hour: 13,
                minute: 45,
                second: 2,
            }),
        }
    }

    #[test]
    fn test_apply_stats_updates_targets_and_clock() {
        let store = TelemetryStore::new();
        store.apply_stats(&payload(55.0, 40.0, 12.0), 1_000);

        let view = store.view(1_000);
        assert_eq!(view.cpu, 55.0);
        assert_eq!(view.ram, 40.0);
        assert_eq!(view.gpu, 12.0);
        assert_eq!((view.hour, view.minute, view.second), (13, 45, 2));
    }

    #[test]
    fn test_payload_without_time_keeps_previous_clock() {
        let store = TelemetryStore::new();
        store.apply_stats(&payload(1.0, 2.0, 3.0), 0);

        let timeless = StatsPayload {
            cpu: 9.0,
            mem: 9.0,
            gpu: 9.0,
            time: None,
        };
        store.apply_stats(&timeless, 500);

        let view = store.view(500);
        assert_eq!(view.cpu, 9.0);
        assert_eq!((view.hour, view.minute, view.second), (13, 45, 2));
    }

    #[test]
    fn test_connected_requires_link_and_fresh_packet() {
        let store = TelemetryStore::new();

        // Nothing received yet.
        store.set_link_up(true);
        assert!(!store.connected(0));

        store.apply_stats(&payload(0.0, 0.0, 0.0), 1_000);
        assert!(store.connected(1_000));
        assert!(store.connected(1_000 + STALE_PACKET_MS - 1));
        assert!(!store.connected(1_000 + STALE_PACKET_MS));
        assert!(!store.connected(1_000 + STALE_PACKET_MS + 1_000));

        // Link down overrides recency.
        store.set_link_up(false);
        assert!(!store.connected(1_001));
    }

    #[test]
    fn test_environment_retention() {
        let store = TelemetryStore::new();

        assert!(store.view(0).temperature_c.is_nan());
        assert!(store.view(0).humidity_pct.is_nan());

        assert!(store.record_temperature(22.5));
        assert!(store.record_humidity(50.0));
        assert_eq!(store.view(0).temperature_c, 22.5);
        assert_eq!(store.view(0).humidity_pct, 50.0);

        // Implausible readings leave the last good value untouched.
        assert!(!store.record_temperature(f32::NAN));
        assert!(!store.record_temperature(150.0));
        assert!(!store.record_temperature(-60.0));
        assert!(!store.record_humidity(100.5));
        assert!(!store.record_humidity(-0.1));
        assert!(!store.record_humidity(f32::NAN));
        assert_eq!(store.view(0).temperature_c, 22.5);
        assert_eq!(store.view(0).humidity_pct, 50.0);
    }

    #[test]
    fn test_humidity_bounds_are_inclusive() {
        let store = TelemetryStore::new();
        assert!(store.record_humidity(0.0));
        assert!(store.record_humidity(100.0));
        assert_eq!(store.view(0).humidity_pct, 100.0);
    }

    #[test]
    fn test_mode_advances_cyclically() {
        let store = TelemetryStore::new();
        assert_eq!(store.mode(), DisplayMode::Ambient);
        assert_eq!(store.advance_mode(), DisplayMode::PcStats);
        assert_eq!(store.advance_mode(), DisplayMode::Clock);
        assert_eq!(store.advance_mode(), DisplayMode::Ambient);
    }
}
