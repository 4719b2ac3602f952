//! Host simulator interface.
//!
//! The adapter runs inside a flight-simulator process and talks to the
//! provider plugin exclusively through the host's named data slots
//! ("dataRefs") and its plugin registry. This module defines that surface
//! as a trait so the tracker can run against the real plugin SDK in
//! production and a scriptable mock in tests.
//!
//! All methods are infallible by contract: a missing or unreadable slot
//! yields the type's default value, never an error. The provider loading
//! late (or unloading mid-session) is an expected steady state, not a
//! failure.

/// Opaque handle to a resolved dataRef.
///
/// Values are assigned by the host and carry no meaning beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataRefHandle(pub u64);

/// Capability bitmask the host reports for a dataRef.
///
/// A slot may be published with any combination of representations; this
/// crate works with a fixed subset ([`DataRefTypes::USEFUL`]). Exotic
/// representations fall outside the mask and leave the slot unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataRefTypes(u32);

impl DataRefTypes {
    /// No usable representation.
    pub const UNKNOWN: Self = Self(0);

    /// 32-bit integer reads and writes.
    pub const INT: Self = Self(1 << 0);

    /// 32-bit float reads and writes.
    pub const FLOAT: Self = Self(1 << 1);

    /// Raw byte-array range reads.
    pub const BYTES: Self = Self(1 << 2);

    /// The fixed set of representations this crate can work with.
    pub const USEFUL: Self = Self(Self::INT.0 | Self::FLOAT.0 | Self::BYTES.0);

    /// Build from a raw host-reported bitmask.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Intersection of two capability sets.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// True if no capability is present.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every capability in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for DataRefTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for DataRefTypes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersect(rhs)
    }
}

/// Host-mediated access to named data slots and the plugin registry.
///
/// Implemented over the simulator's plugin SDK in production. The tracker
/// only ever calls these synchronously from the frame callback; nothing
/// here suspends or blocks.
pub trait SimHost {
    /// Look up a dataRef by name. `None` if the host knows no such slot.
    fn find_dataref(&self, name: &str) -> Option<DataRefHandle>;

    /// Capability set the host reports for `handle`.
    fn dataref_types(&self, handle: DataRefHandle) -> DataRefTypes;

    /// Read the slot's integer value. 0 if not readable as an integer.
    fn get_int(&self, handle: DataRefHandle) -> i32;

    /// Read the slot's float value. 0.0 if not readable as a float.
    fn get_float(&self, handle: DataRefHandle) -> f32;

    /// Copy up to `dest.len()` bytes of the slot's backing array, starting
    /// at `offset`, into `dest`; returns the number of bytes copied (which
    /// may be fewer than requested). With `dest = None`, returns the
    /// byte size the provider reports for the slot instead: the size
    /// negotiation probe issued before every bulk transfer.
    fn get_bytes(&self, handle: DataRefHandle, dest: Option<&mut [u8]>, offset: usize) -> usize;

    /// Set the slot's integer value. Ignored if the slot is not writable.
    fn set_int(&self, handle: DataRefHandle, value: i32);

    /// Set the slot's float value. Ignored if the slot is not writable.
    fn set_float(&self, handle: DataRefHandle, value: f32);

    /// Whether a plugin with the given signature is currently loaded.
    fn is_plugin_loaded(&self, signature: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_useful_mask_covers_scalar_and_bytes() {
        assert!(DataRefTypes::USEFUL.contains(DataRefTypes::INT));
        assert!(DataRefTypes::USEFUL.contains(DataRefTypes::FLOAT));
        assert!(DataRefTypes::USEFUL.contains(DataRefTypes::BYTES));
    }

    #[test]
    fn test_intersect_drops_exotic_bits() {
        // A slot reporting int plus some representation we don't handle
        let reported = DataRefTypes::from_bits(DataRefTypes::INT.bits() | (1 << 7));
        let usable = reported.intersect(DataRefTypes::USEFUL);

        assert_eq!(usable, DataRefTypes::INT);
        assert!(!usable.is_empty());
    }

    #[test]
    fn test_exotic_only_slot_is_empty_after_masking() {
        let reported = DataRefTypes::from_bits(1 << 7);
        assert!(reported.intersect(DataRefTypes::USEFUL).is_empty());
    }

    #[test]
    fn test_bit_ops() {
        let both = DataRefTypes::INT | DataRefTypes::FLOAT;
        assert!(both.contains(DataRefTypes::INT));
        assert!(both.contains(DataRefTypes::FLOAT));
        assert!(!both.contains(DataRefTypes::BYTES));
        assert_eq!(both & DataRefTypes::FLOAT, DataRefTypes::FLOAT);
    }

    #[test]
    fn test_unknown_is_empty() {
        assert!(DataRefTypes::UNKNOWN.is_empty());
        assert_eq!(DataRefTypes::default(), DataRefTypes::UNKNOWN);
    }
}
