//! Lazily-bound accessor for one named data slot.
//!
//! A [`DataRef`] is safe to construct and query before the provider plugin
//! exists: every access retries the name lookup until the slot is bound to
//! a usable type set, and until then reads return defaults and writes
//! no-op. Repeated lookups are cheap, and the provider may well load after
//! the consumer started.
//!
//! # Design
//!
//! The binding is an explicit two-state value rather than a nullable
//! handle: `Unresolved` or `Bound { handle, types }`, where `types` is the
//! host-reported capability set intersected with the fixed useful-types
//! mask. A slot bound with an empty type set is treated the same as an
//! unresolved one and is retried on the next access.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::host::{DataRefHandle, DataRefTypes, SimHost};

/// Binding state of a [`DataRef`].
#[derive(Debug, Clone, Copy)]
enum Binding {
    /// Name lookup has not succeeded yet.
    Unresolved,
    /// Lookup succeeded. `types` may be empty if the slot only offers
    /// representations outside [`DataRefTypes::USEFUL`].
    Bound {
        handle: DataRefHandle,
        types: DataRefTypes,
    },
}

/// Typed accessor for one named data slot.
///
/// One instance per distinct slot name, held by the owner that reads it,
/// never function-local static state.
pub struct DataRef {
    name: String,
    host: Arc<dyn SimHost>,
    binding: Binding,
}

impl DataRef {
    /// Create an accessor for `name`. No lookup happens until first use.
    pub fn new(host: Arc<dyn SimHost>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host,
            binding: Binding::Unresolved,
        }
    }

    /// The slot name, fixed at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve if needed. `Some` only when bound with a usable type set.
    fn resolve(&mut self) -> Option<(DataRefHandle, DataRefTypes)> {
        if let Binding::Bound { handle, types } = self.binding {
            if !types.is_empty() {
                return Some((handle, types));
            }
        }

        // Unresolved, or bound to a useless type set: the provider may
        // have (re)loaded since the last attempt, so look up again.
        let handle = match self.host.find_dataref(&self.name) {
            Some(handle) => handle,
            None => {
                trace!(name = %self.name, "dataref not found");
                return None;
            }
        };

        let types = self
            .host
            .dataref_types(handle)
            .intersect(DataRefTypes::USEFUL);
        self.binding = Binding::Bound { handle, types };

        if types.is_empty() {
            debug!(name = %self.name, "dataref found but offers no usable type");
            None
        } else {
            debug!(name = %self.name, "dataref bound");
            Some((handle, types))
        }
    }

    /// Whether the slot is bound to a usable type. Resolves lazily; the
    /// lazy resolution is the only side effect.
    pub fn is_valid(&mut self) -> bool {
        self.resolve().is_some()
    }

    /// The slot's integer value, or 0 while the slot is unavailable.
    pub fn get_int(&mut self) -> i32 {
        match self.resolve() {
            Some((handle, _)) => self.host.get_int(handle),
            None => 0,
        }
    }

    /// The slot's float value, or 0.0 while the slot is unavailable.
    pub fn get_float(&mut self) -> f32 {
        match self.resolve() {
            Some((handle, _)) => self.host.get_float(handle),
            None => 0.0,
        }
    }

    /// Copy up to `dest.len()` bytes from the slot's backing array,
    /// starting at `offset`; returns bytes copied, 0 while the slot is
    /// unavailable. With `dest = None`, returns the provider-reported
    /// slot size instead (size negotiation). This is the batch-transfer
    /// primitive all bulk fetches build on.
    pub fn get_bytes(&mut self, dest: Option<&mut [u8]>, offset: usize) -> usize {
        match self.resolve() {
            Some((handle, _)) => self.host.get_bytes(handle, dest, offset),
            None => 0,
        }
    }

    /// Set the slot's integer value. No-op while the slot is unavailable.
    pub fn set_int(&mut self, value: i32) {
        if let Some((handle, _)) = self.resolve() {
            self.host.set_int(handle, value);
        }
    }

    /// Set the slot's float value. No-op while the slot is unavailable.
    pub fn set_float(&mut self, value: f32) {
        if let Some((handle, _)) = self.resolve() {
            self.host.set_float(handle, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Slot contents for the fake host.
    #[derive(Clone, Default)]
    struct FakeSlot {
        types: DataRefTypes,
        int: i32,
        float: f32,
        bytes: Vec<u8>,
    }

    /// Minimal scriptable host: slots can appear or change type after the
    /// accessor was constructed, mimicking a provider that loads late.
    #[derive(Default)]
    struct FakeHost {
        slots: RefCell<Vec<(String, FakeSlot)>>,
    }

    impl FakeHost {
        fn add_slot(&self, name: &str, slot: FakeSlot) {
            self.slots.borrow_mut().push((name.to_string(), slot));
        }

        fn set_types(&self, name: &str, types: DataRefTypes) {
            let mut slots = self.slots.borrow_mut();
            let entry = slots.iter_mut().find(|(n, _)| n == name).unwrap();
            entry.1.types = types;
        }
    }

    impl SimHost for FakeHost {
        fn find_dataref(&self, name: &str) -> Option<DataRefHandle> {
            self.slots
                .borrow()
                .iter()
                .position(|(n, _)| n == name)
                .map(|i| DataRefHandle(i as u64))
        }

        fn dataref_types(&self, handle: DataRefHandle) -> DataRefTypes {
            self.slots.borrow()[handle.0 as usize].1.types
        }

        fn get_int(&self, handle: DataRefHandle) -> i32 {
            self.slots.borrow()[handle.0 as usize].1.int
        }

        fn get_float(&self, handle: DataRefHandle) -> f32 {
            self.slots.borrow()[handle.0 as usize].1.float
        }

        fn get_bytes(&self, handle: DataRefHandle, dest: Option<&mut [u8]>, offset: usize) -> usize {
            let slots = self.slots.borrow();
            let bytes = &slots[handle.0 as usize].1.bytes;
            match dest {
                None => bytes.len(),
                Some(dest) => {
                    let available = bytes.len().saturating_sub(offset);
                    let n = dest.len().min(available);
                    dest[..n].copy_from_slice(&bytes[offset..offset + n]);
                    n
                }
            }
        }

        fn set_int(&self, handle: DataRefHandle, value: i32) {
            self.slots.borrow_mut()[handle.0 as usize].1.int = value;
        }

        fn set_float(&self, handle: DataRefHandle, value: f32) {
            self.slots.borrow_mut()[handle.0 as usize].1.float = value;
        }

        fn is_plugin_loaded(&self, _signature: &str) -> bool {
            false
        }
    }

    fn int_slot(value: i32) -> FakeSlot {
        FakeSlot {
            types: DataRefTypes::INT,
            int: value,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_slot_reads_defaults() {
        let host = Arc::new(FakeHost::default());
        let mut dr = DataRef::new(host, "xpilot/num_aircraft");

        assert!(!dr.is_valid());
        assert_eq!(dr.get_int(), 0);
        assert_eq!(dr.get_float(), 0.0);
        assert_eq!(dr.get_bytes(None, 0), 0);

        let mut buf = [0u8; 8];
        assert_eq!(dr.get_bytes(Some(&mut buf), 0), 0);
    }

    #[test]
    fn test_write_to_missing_slot_is_noop() {
        let host = Arc::new(FakeHost::default());
        let mut dr = DataRef::new(host, "xpilot/ai_controlled");

        // Must not panic, must leave the accessor unresolved
        dr.set_int(1);
        dr.set_float(1.0);
        assert!(!dr.is_valid());
    }

    #[test]
    fn test_late_binding_when_provider_loads() {
        let host = Arc::new(FakeHost::default());
        let mut dr = DataRef::new(Arc::clone(&host) as Arc<dyn SimHost>, "xpilot/num_aircraft");

        assert_eq!(dr.get_int(), 0, "no provider yet");

        // Provider loads after the accessor was constructed
        host.add_slot("xpilot/num_aircraft", int_slot(7));

        assert!(dr.is_valid(), "next access should retry the lookup");
        assert_eq!(dr.get_int(), 7);
    }

    #[test]
    fn test_useless_type_set_is_retried() {
        let host = Arc::new(FakeHost::default());
        host.add_slot(
            "xpilot/bulk/quick",
            FakeSlot {
                types: DataRefTypes::from_bits(1 << 7), // exotic only
                ..Default::default()
            },
        );

        let mut dr = DataRef::new(Arc::clone(&host) as Arc<dyn SimHost>, "xpilot/bulk/quick");
        assert!(!dr.is_valid(), "exotic-only slot is unusable");

        // The slot is republished with a representation we handle
        host.set_types("xpilot/bulk/quick", DataRefTypes::BYTES);
        assert!(dr.is_valid(), "accessor retries while bound uselessly");
    }

    #[test]
    fn test_scalar_read_write_round_trip() {
        let host = Arc::new(FakeHost::default());
        host.add_slot("xpilot/ai_controlled", int_slot(0));

        let mut dr = DataRef::new(Arc::clone(&host) as Arc<dyn SimHost>, "xpilot/ai_controlled");
        assert_eq!(dr.get_int(), 0);

        dr.set_int(1);
        assert_eq!(dr.get_int(), 1);
    }

    #[test]
    fn test_byte_range_reads() {
        let host = Arc::new(FakeHost::default());
        host.add_slot(
            "xpilot/bulk/quick",
            FakeSlot {
                types: DataRefTypes::BYTES,
                bytes: (0u8..32).collect(),
                ..Default::default()
            },
        );

        let mut dr = DataRef::new(Arc::clone(&host) as Arc<dyn SimHost>, "xpilot/bulk/quick");

        // Size probe
        assert_eq!(dr.get_bytes(None, 0), 32);

        // Ranged read
        let mut buf = [0u8; 8];
        assert_eq!(dr.get_bytes(Some(&mut buf), 4), 8);
        assert_eq!(buf, [4, 5, 6, 7, 8, 9, 10, 11]);

        // Short read past the end
        let mut buf = [0u8; 16];
        assert_eq!(dr.get_bytes(Some(&mut buf), 24), 8);
    }
}
