//! Display mode cycle and touch-input debouncing.

/// What the panel is currently showing.
///
/// The touch input cycles through the modes in a fixed order; nothing
/// else changes the mode and no mode is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Room comfort: mood icon plus temperature/humidity readouts
    #[default]
    Ambient,
    /// CPU/GPU/RAM load bars (or rain while telemetry is stale)
    PcStats,
    /// Wall clock received with the stats payload
    Clock,
}

impl DisplayMode {
    /// The successor in the fixed cycle
    pub const fn next(self) -> Self {
        match self {
            Self::Ambient => Self::PcStats,
            Self::PcStats => Self::Clock,
            Self::Clock => Self::Ambient,
        }
    }

    /// Human-readable name for log lines
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ambient => "Ambient",
            Self::PcStats => "PC Stats",
            Self::Clock => "Clock",
        }
    }

    /// Stable wire/storage representation
    pub const fn to_raw(self) -> u8 {
        match self {
            Self::Ambient => 0,
            Self::PcStats => 1,
            Self::Clock => 2,
        }
    }

    /// Inverse of [`Self::to_raw`]; unknown values fall back to Ambient
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::PcStats,
            2 => Self::Clock,
            _ => Self::Ambient,
        }
    }
}

/// Rising-edge detector for the sampled touch line.
///
/// The line is sampled on a fixed period, so a single held press
/// produces one edge and one mode transition no matter how long the
/// finger stays down.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchDebounce {
    last_level: bool,
}

impl TouchDebounce {
    /// Create a detector that treats the line as initially released
    pub const fn new() -> Self {
        Self { last_level: false }
    }

    /// Feed one sample; returns true exactly on released-to-pressed
    /// transitions.
    pub fn rising_edge(&mut self, level: bool) -> bool {
        let edge = level && !self.last_level;
        self.last_level = level;
        edge
    }
}
