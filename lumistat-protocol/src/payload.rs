//! Decoding of the stats datagram payload.
//!
//! Field semantics:
//! - `cpu`, `mem`, `gpu`: load percentages, 0-100. A missing or
//!   unparsable field decodes as 0.0.
//! - `time`: wall-clock `"HH:MM:SS"`. Missing or malformed decodes as
//!   `None`; the panel keeps showing the previously received time.
//!
//! Only a payload that is not a JSON object at all (or not UTF-8) is a
//! decode error; the caller drops it and retains prior telemetry.

/// Maximum accepted payload length in bytes.
///
/// Matches the receive buffer of the broadcaster side; anything longer
/// is not a stats datagram.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Errors that can occur while decoding a stats payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload is not valid UTF-8
    InvalidUtf8,
    /// Payload does not look like a JSON object
    NotAnObject,
    /// Payload exceeds [`MAX_PAYLOAD_LEN`]
    TooLong,
}

/// Wall-clock time of day as reported by the broadcaster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    /// Parse a `"HH:MM:SS"` string.
    ///
    /// Returns `None` for anything that is not three colon-separated
    /// in-range numbers.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.splitn(3, ':');
        let hour: u8 = parts.next()?.trim().parse().ok()?;
        let minute: u8 = parts.next()?.trim().parse().ok()?;
        let second: u8 = parts.next()?.trim().parse().ok()?;

        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }

        Some(Self {
            hour,
            minute,
            second,
        })
    }
}

/// A decoded stats datagram
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsPayload {
    /// CPU load percentage (0.0 when absent)
    pub cpu: f32,
    /// Memory load percentage (0.0 when absent)
    pub mem: f32,
    /// GPU load percentage (0.0 when absent)
    pub gpu: f32,
    /// Wall-clock time, if the broadcaster included a valid one
    pub time: Option<TimeOfDay>,
}

/// Decode a raw datagram payload.
///
/// # Errors
/// Returns a [`DecodeError`] when the payload cannot be a stats object
/// at all. Individual missing fields are not errors (see module docs).
pub fn decode(raw: &[u8]) -> Result<StatsPayload, DecodeError> {
    if raw.len() > MAX_PAYLOAD_LEN {
        return Err(DecodeError::TooLong);
    }

    let text = core::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8)?;
    let text = text.trim();

    if !text.starts_with('{') || !text.ends_with('}') {
        return Err(DecodeError::NotAnObject);
    }

    Ok(StatsPayload {
        cpu: number_field(text, "cpu").unwrap_or(0.0),
        mem: number_field(text, "mem").unwrap_or(0.0),
        gpu: number_field(text, "gpu").unwrap_or(0.0),
        time: string_field(text, "time").and_then(TimeOfDay::parse),
    })
}

/// Find the value text following `"name":`, with optional whitespace
/// around the colon.
fn field_value<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let mut search = text;
    loop {
        let key_start = search.find('"')?;
        let after_quote = &search[key_start + 1..];
        let key_end = after_quote.find('"')?;
        let key = &after_quote[..key_end];
        let rest = after_quote[key_end + 1..].trim_start();

        if let Some(value) = rest.strip_prefix(':') {
            if key == name {
                return Some(value.trim_start());
            }
            // Skip past this key's colon and keep scanning.
            search = value;
        } else {
            // The quoted span was a string value, not a key.
            search = &after_quote[key_end + 1..];
        }
    }
}

/// Extract a numeric field, `None` when absent or unparsable.
fn number_field(text: &str, name: &str) -> Option<f32> {
    let value = field_value(text, name)?;
    let end = value
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Extract a quoted string field, `None` when absent or unquoted.
fn string_field<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let value = field_value(text, name)?;
    let inner = value.strip_prefix('"')?;
    let end = inner.find('"')?;
    Some(&inner[..end])
}
