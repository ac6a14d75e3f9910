//! Rain animation, shown in the stats mode while telemetry is stale.
//!
//! A fixed pool of drops falls down the panel. Movement runs on its own
//! cadence, independent of the render tick: `advance` is called every
//! frame but only moves the drops once per [`MOVE_PERIOD_MS`], so
//! retuning the frame rate never changes how fast the rain falls.

use rand_core::RngCore;

use crate::frame::{Frame, HEIGHT};

/// Size of the drop pool
pub const DROP_COUNT: usize = 8;

/// Milliseconds between movement ticks
pub const MOVE_PERIOD_MS: u64 = 100;

/// Per-movement-tick chance (percent) that an inactive drop spawns
const SPAWN_PERCENT: u32 = 15;

/// Leftmost column of each 2-column spawn group, matching the three
/// bar positions of the stats mode
const COLUMN_GROUPS: [i32; 3] = [0, 3, 6];

#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Drop {
    x: i32,
    y: i32,
    active: bool,
}

/// The falling-drops animation state
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rain {
    drops: [Drop; DROP_COUNT],
    last_move_ms: Option<u64>,
}

impl Rain {
    /// Create an animation with every drop inactive
    pub const fn new() -> Self {
        Self {
            drops: [Drop {
                x: 0,
                y: 0,
                active: false,
            }; DROP_COUNT],
            last_move_ms: None,
        }
    }

    /// Advance the animation if a movement period has elapsed.
    ///
    /// Safe to call every render tick; movement happens at most once
    /// per [`MOVE_PERIOD_MS`].
    pub fn advance(&mut self, now_ms: u64, rng: &mut impl RngCore) {
        match self.last_move_ms {
            Some(last) if now_ms.saturating_sub(last) < MOVE_PERIOD_MS => return,
            _ => {}
        }
        self.last_move_ms = Some(now_ms);
        self.step(rng);
    }

    /// One movement tick: active drops fall a row, inactive drops may
    /// spawn at the top.
    fn step(&mut self, rng: &mut impl RngCore) {
        for drop in &mut self.drops {
            if drop.active {
                drop.y -= 1;
                if drop.y < 0 {
                    drop.active = false;
                }
            } else if rng.next_u32() % 100 < SPAWN_PERCENT {
                let group = COLUMN_GROUPS[(rng.next_u32() % 3) as usize];
                drop.x = group + (rng.next_u32() % 2) as i32;
                drop.y = HEIGHT - 1;
                drop.active = true;
            }
        }
    }

    /// Draw all active drops; called every render tick
    pub fn draw(&self, frame: &mut Frame) {
        for drop in self.drops.iter().filter(|drop| drop.active) {
            frame.set_pixel(drop.x, drop.y, true);
        }
    }

    /// Number of currently active drops
    pub fn active_count(&self) -> usize {
        self.drops.iter().filter(|drop| drop.active).count()
    }
}
