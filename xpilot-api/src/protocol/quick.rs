//! Quick bulk row: high-frequency numeric aircraft state.
//!
//! One row per aircraft in the `xpilot/bulk/quick` byte array. 64 bytes,
//! little-endian:
//!
//! | offset | size | field |
//! |--------|------|-------|
//! | 0      | 8    | entity key (u64) |
//! | 8      | 8    | latitude, degrees (f64) |
//! | 16     | 8    | longitude, degrees (f64) |
//! | 24     | 8    | altitude MSL, feet (f64) |
//! | 32     | 4    | true heading, degrees (f32) |
//! | 36     | 4    | ground track, degrees (f32) |
//! | 40     | 4    | ground speed, knots (f32) |
//! | 44     | 4    | vertical speed, feet/minute (f32) |
//! | 48     | 4    | transponder code (u32) |
//! | 52     | 4    | multiplayer slot, 0 = none (i32) |
//! | 56     | 4    | flags (u32) |
//! | 60     | 4    | reserved |

use super::{field, RowError};

const OFF_KEY: usize = 0;
const OFF_LATITUDE: usize = 8;
const OFF_LONGITUDE: usize = 16;
const OFF_ALTITUDE: usize = 24;
const OFF_HEADING: usize = 32;
const OFF_TRACK: usize = 36;
const OFF_GROUND_SPEED: usize = 40;
const OFF_VERTICAL_SPEED: usize = 44;
const OFF_SQUAWK: usize = 48;
const OFF_MULTIPLAYER_SLOT: usize = 52;
const OFF_FLAGS: usize = 56;

/// Numeric per-aircraft state, refreshed every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuickRow {
    /// Numeric entity key naming this aircraft for its reported lifetime.
    pub key: u64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude MSL in feet.
    pub altitude_ft: f64,
    /// True heading in degrees.
    pub heading: f32,
    /// Ground track in degrees.
    pub track: f32,
    /// Ground speed in knots.
    pub ground_speed_kt: f32,
    /// Vertical speed in feet per minute.
    pub vertical_speed_fpm: f32,
    /// Transponder code.
    pub squawk: u32,
    /// Rendering slot this aircraft occupies; 0 means none.
    pub multiplayer_slot: i32,
    /// Status flags, see [`QuickRow::on_ground`].
    pub flags: u32,
}

impl QuickRow {
    /// Row size in bytes.
    pub const SIZE: usize = 64;

    /// Flag bit: aircraft is on the ground.
    const FLAG_ON_GROUND: u32 = 1 << 0;

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
            latitude: f64::from_le_bytes(field(buf, OFF_LATITUDE)),
            longitude: f64::from_le_bytes(field(buf, OFF_LONGITUDE)),
            altitude_ft: f64::from_le_bytes(field(buf, OFF_ALTITUDE)),
            heading: f32::from_le_bytes(field(buf, OFF_HEADING)),
            track: f32::from_le_bytes(field(buf, OFF_TRACK)),
            ground_speed_kt: f32::from_le_bytes(field(buf, OFF_GROUND_SPEED)),
            vertical_speed_fpm: f32::from_le_bytes(field(buf, OFF_VERTICAL_SPEED)),
            squawk: u32::from_le_bytes(field(buf, OFF_SQUAWK)),
            multiplayer_slot: i32::from_le_bytes(field(buf, OFF_MULTIPLAYER_SLOT)),
            flags: u32::from_le_bytes(field(buf, OFF_FLAGS)),
        })
    }

    /// Whether the aircraft is on the ground.
    pub fn on_ground(&self) -> bool {
        self.flags & Self::FLAG_ON_GROUND != 0
    }
}
