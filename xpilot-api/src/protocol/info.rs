//! Expensive bulk row: low-frequency aircraft text fields.
//!
//! One row per aircraft in the `xpilot/bulk/expensive` byte array. 72
//! bytes, little-endian key followed by fixed-width text fields:
//!
//! | offset | size | field |
//! |--------|------|-------|
//! | 0      | 8    | entity key (u64) |
//! | 8      | 8    | call sign |
//! | 16     | 8    | model ICAO type designator |
//! | 24     | 8    | operator ICAO code |
//! | 32     | 8    | origin airport |
//! | 40     | 8    | destination airport |
//! | 48     | 24   | CSL model name |
//!
//! Text originates from an untrusted external buffer, so every field is
//! bounded at its fixed width, cut at the first NUL, and lossy-decoded as
//! UTF-8 on ingestion.

use super::{field, RowError};

const OFF_KEY: usize = 0;
const OFF_CALL_SIGN: usize = 8;
const OFF_MODEL_ICAO: usize = 16;
const OFF_OPERATOR_ICAO: usize = 24;
const OFF_ORIGIN: usize = 32;
const OFF_DESTINATION: usize = 40;
const OFF_CSL_MODEL: usize = 48;

const SHORT_FIELD: usize = 8;
const CSL_FIELD: usize = 24;

/// Textual per-aircraft data, refreshed on the expensive-pull throttle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoRow {
    /// Numeric entity key naming this aircraft for its reported lifetime.
    pub key: u64,
    /// Call sign, e.g. `"DLH2KB"`. Empty when the provider has none yet.
    pub call_sign: String,
    /// ICAO type designator, e.g. `"A320"`.
    pub model_icao: String,
    /// ICAO operator code, e.g. `"DLH"`.
    pub operator_icao: String,
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub destination: String,
    /// Name of the CSL model used to render the aircraft.
    pub csl_model: String,
}

impl InfoRow {
    /// Row size in bytes.
    pub const SIZE: usize = 72;

    /// Decode one row from the head of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, RowError> {
        if buf.len() < Self::SIZE {
            return Err(RowError::Truncated {
                expected: Self::SIZE,
                actual: buf.len(),
            });
        }

        Ok(Self {
            key: u64::from_le_bytes(field(buf, OFF_KEY)),
            call_sign: text_field(buf, OFF_CALL_SIGN, SHORT_FIELD),
            model_icao: text_field(buf, OFF_MODEL_ICAO, SHORT_FIELD),
            operator_icao: text_field(buf, OFF_OPERATOR_ICAO, SHORT_FIELD),
            origin: text_field(buf, OFF_ORIGIN, SHORT_FIELD),
            destination: text_field(buf, OFF_DESTINATION, SHORT_FIELD),
            csl_model: text_field(buf, OFF_CSL_MODEL, CSL_FIELD),
        })
    }
}

/// Read a fixed-width text field: bounded at `len`, cut at the first NUL,
/// lossy-decoded as UTF-8.
fn text_field(buf: &[u8], offset: usize, len: usize) -> String {
    let raw = &buf[offset..offset + len];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(len);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
