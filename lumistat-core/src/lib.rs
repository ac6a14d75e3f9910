//! Board-agnostic core logic for the Lumistat telemetry panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - The 8x32 pixel surface and its logical-to-physical mapping
//! - Icon and numeral rendering primitives
//! - The display mode cycle and touch debouncing
//! - The synchronized telemetry store and connected predicate
//! - Metric smoothing (exponential moving average)
//! - The rain animation shown while telemetry is stale
//! - Per-mode frame composition

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod draw;
pub mod frame;
pub mod glyphs;
pub mod mode;
pub mod rain;
pub mod scene;
pub mod smoothing;
pub mod telemetry;
