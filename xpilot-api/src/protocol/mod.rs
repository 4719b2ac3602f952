//! Bulk-transfer wire rows.
//!
//! The provider publishes two byte-array dataRefs carrying fixed-layout
//! per-aircraft rows:
//!
//! - `xpilot/bulk/quick` - [`QuickRow`], the high-frequency numeric state
//!   (position, vectors, transponder, multiplayer slot), refreshed every
//!   cycle;
//! - `xpilot/bulk/expensive` - [`InfoRow`], the low-frequency text fields
//!   (call sign, model, route), refreshed on a throttle.
//!
//! Rows are decoded explicitly from byte slices (never overlaid on
//! memory), with every multi-byte field little-endian. Both row types
//! carry the numeric entity key at offset 0; [`entity_key`] renders it as
//! the canonical map key.

mod info;
mod key;
mod quick;

pub use info::InfoRow;
pub use key::{entity_key, MIN_KEY_DIGITS};
pub use quick::QuickRow;

use thiserror::Error;

/// Error decoding a bulk row from the provider's byte buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    /// The byte slice is shorter than one full row.
    #[error("bulk row truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Fixed-size byte window at `offset`, for `from_le_bytes`. Callers bound
/// the slice length before use.
pub(crate) fn field<const N: usize>(buf: &[u8], offset: usize) -> [u8; N] {
    std::array::from_fn(|i| buf[offset + i])
}
