//! Stats Datagram Protocol
//!
//! This crate defines the application-layer payload carried by the UDP
//! datagrams a PC-side broadcaster sends to the panel. The payload is a
//! small JSON object:
//!
//! ```text
//! {"cpu":55.0,"mem":40.0,"gpu":12.0,"time":"13:45:02"}
//! ```
//!
//! The decoder is deliberately a field scanner, not a general JSON
//! parser - the panel only ever extracts three numeric fields and one
//! time string, and a malformed datagram must degrade to a no-op
//! rather than an error path that could stall ingest.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod payload;

pub use payload::{decode, DecodeError, StatsPayload, TimeOfDay, MAX_PAYLOAD_LEN};
