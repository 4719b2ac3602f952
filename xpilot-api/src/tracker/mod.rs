//! Bulk synchronization engine.
//!
//! Mirrors the provider's externally-owned aircraft list into an owned
//! map, once per simulator frame:
//!
//! 1. **Availability gate**: no provider plugin, AI traffic not under
//!    its control, an invalid bulk slot, or a zero count evicts every
//!    record.
//! 2. **Quick pull**: batched numeric rows; unseen entity keys create
//!    records through the caller's factory.
//! 3. **Expensive pull**: batched text rows, only when the quick pull
//!    created records or the throttle interval elapsed.
//! 4. **Sweep**: records whose key did not appear this cycle are moved
//!    into the caller's removed list (or dropped).
//!
//! The provider never signals removal explicitly; non-appearance in a
//! quick pull is the only retirement signal. All failure modes degrade to
//! an empty or unchanged map so the consumer keeps rendering smoothly
//! while the provider loads, unloads, or stalls.

mod config;

pub use config::{
    TrackerConfig, DEFAULT_BATCH_SIZE, DEFAULT_INFO_INTERVAL, MAX_BATCH_SIZE, MIN_BATCH_SIZE,
};

use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::aircraft::{Aircraft, AircraftMap};
use crate::dataref::DataRef;
use crate::host::SimHost;
use crate::protocol::{entity_key, InfoRow, QuickRow};

/// Plugin signature the provider registers with the host.
pub const XPILOT_PLUGIN_SIGNATURE: &str = "org.vatsim.xpilot";

/// Whether the provider has taken control of AI traffic.
const DR_AI_CONTROLLED: &str = "xpilot/ai_controlled";
/// Number of aircraft currently available for bulk pull.
const DR_NUM_AIRCRAFT: &str = "xpilot/num_aircraft";
/// Numeric per-aircraft rows.
const DR_BULK_QUICK: &str = "xpilot/bulk/quick";
/// Text per-aircraft rows.
const DR_BULK_EXPENSIVE: &str = "xpilot/bulk/expensive";

/// Factory invoked exactly once per newly discovered entity key.
pub type AircraftFactory = Box<dyn Fn() -> Aircraft>;

/// Pull-based mirror of the provider's aircraft list.
///
/// Single-threaded by design: `refresh` runs to completion on the
/// caller's thread and is expected once per simulation cycle. The map and
/// its records are exclusively owned by the tracker except during the
/// move into the caller's removed list.
///
/// # Usage
///
/// ```ignore
/// let mut tracker = AircraftTracker::with_defaults(host);
///
/// // Once per frame:
/// let mut removed = Vec::new();
/// for aircraft in tracker.refresh(Some(&mut removed)).values() {
///     println!("{} at {:?}", aircraft.label(), aircraft.position());
/// }
/// for gone in removed.drain(..) {
///     println!("{} left", gone.label());
/// }
/// ```
pub struct AircraftTracker {
    host: Arc<dyn SimHost>,
    ai_controlled: DataRef,
    num_aircraft: DataRef,
    bulk_quick: DataRef,
    bulk_expensive: DataRef,
    aircraft: AircraftMap,
    factory: AircraftFactory,
    batch_size: usize,
    info_interval: Duration,
    last_info_fetch: Option<Instant>,
}

impl AircraftTracker {
    /// Create a tracker over `host`.
    ///
    /// `factory` constructs each new record; it is called exactly once
    /// per entity key the provider reports for the first time. One
    /// accessor per named slot is created here and lives as long as the
    /// tracker. The configured batch size is clamped to
    /// [[`MIN_BATCH_SIZE`], [`MAX_BATCH_SIZE`]].
    pub fn new(host: Arc<dyn SimHost>, config: TrackerConfig, factory: AircraftFactory) -> Self {
        Self {
            ai_controlled: DataRef::new(Arc::clone(&host), DR_AI_CONTROLLED),
            num_aircraft: DataRef::new(Arc::clone(&host), DR_NUM_AIRCRAFT),
            bulk_quick: DataRef::new(Arc::clone(&host), DR_BULK_QUICK),
            bulk_expensive: DataRef::new(Arc::clone(&host), DR_BULK_EXPENSIVE),
            host,
            aircraft: AircraftMap::new(),
            factory,
            batch_size: config.batch_size.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE),
            info_interval: config.info_interval,
            last_info_fetch: None,
        }
    }

    /// Tracker with default configuration and plain [`Aircraft`] records.
    pub fn with_defaults(host: Arc<dyn SimHost>) -> Self {
        Self::new(host, TrackerConfig::default(), Box::new(Aircraft::new))
    }

    /// Whether the provider plugin is currently loaded.
    pub fn is_provider_available(&self) -> bool {
        self.host.is_plugin_loaded(XPILOT_PLUGIN_SIGNATURE)
    }

    /// Whether the provider has taken control of AI traffic.
    pub fn is_ai_controlled(&mut self) -> bool {
        self.ai_controlled.get_int() != 0
    }

    /// Number of aircraft the provider reports for bulk pull.
    pub fn aircraft_count(&mut self) -> i32 {
        self.num_aircraft.get_int()
    }

    /// The live map, unchanged since the last refresh.
    pub fn aircraft(&self) -> &AircraftMap {
        &self.aircraft
    }

    /// First aircraft occupying the given multiplayer slot.
    ///
    /// Slot 0 is the reserved "no slot" value; looking it up always
    /// yields `None` without scanning, since idle records all report 0.
    pub fn find_by_multiplayer_slot(&self, slot: i32) -> Option<&Aircraft> {
        if slot < 1 {
            return None;
        }
        self.aircraft
            .values()
            .find(|ac| ac.multiplayer_slot() == slot)
    }

    /// Synchronize the map with the provider and return it.
    ///
    /// Evicted records are moved into `removed` when given, otherwise
    /// dropped. Entries may be mutated or removed in place across calls,
    /// so callers must not retain the map beyond the next refresh without
    /// copying.
    pub fn refresh(&mut self, removed: Option<&mut Vec<Aircraft>>) -> &AircraftMap {
        self.refresh_at(Instant::now(), removed)
    }

    /// [`refresh`](Self::refresh) with an explicit clock, for
    /// deterministic control of the expensive-pull throttle in tests.
    pub fn refresh_at(
        &mut self,
        now: Instant,
        mut removed: Option<&mut Vec<Aircraft>>,
    ) -> &AircraftMap {
        let count = self.available_count();
        if count <= 0 {
            // Sole removal path when the provider disappears entirely,
            // indistinguishable from it never having been available.
            if !self.aircraft.is_empty() {
                debug!(evicted = self.aircraft.len(), "provider gone, clearing aircraft");
            }
            for (_, ac) in self.aircraft.drain() {
                if let Some(out) = removed.as_deref_mut() {
                    out.push(ac);
                }
            }
            return &self.aircraft;
        }
        let count = count as usize;

        // The update flag is the removal detector: anything still false
        // after the quick pull was not reported this cycle.
        for ac in self.aircraft.values_mut() {
            ac.reset_updated();
        }

        let added = self.fetch_quick(count);

        let throttle_due = self
            .last_info_fetch
            .map_or(true, |last| now.duration_since(last) >= self.info_interval);
        if added || throttle_due {
            self.fetch_info(count);
            self.last_info_fetch = Some(now);
        }

        // Sweep: evict everything the quick pull did not touch.
        let gone: Vec<String> = self
            .aircraft
            .iter()
            .filter(|(_, ac)| !ac.is_updated())
            .map(|(key, _)| key.clone())
            .collect();
        for key in gone {
            if let Some(ac) = self.aircraft.remove(&key) {
                debug!(key = %key, "aircraft no longer reported");
                if let Some(out) = removed.as_deref_mut() {
                    out.push(ac);
                }
            }
        }

        &self.aircraft
    }

    /// Reported aircraft count, or 0 unless the provider is loaded, has
    /// AI traffic under control, and both bulk slots are usable.
    fn available_count(&mut self) -> i32 {
        if !self.is_provider_available() {
            return 0;
        }
        if self.ai_controlled.get_int() == 0 {
            return 0;
        }
        if !self.bulk_quick.is_valid() || !self.bulk_expensive.is_valid() {
            return 0;
        }
        self.num_aircraft.get_int()
    }

    /// Pull all quick rows, creating records for unseen keys. Returns
    /// whether any record was created.
    fn fetch_quick(&mut self, count: usize) -> bool {
        let aircraft = &mut self.aircraft;
        let factory = &self.factory;
        let mut added = false;

        fetch_rows(
            &mut self.bulk_quick,
            count,
            self.batch_size,
            QuickRow::SIZE,
            |bytes| match QuickRow::decode(bytes) {
                Ok(row) => {
                    let record = match aircraft.entry(entity_key(row.key)) {
                        Entry::Occupied(entry) => entry.into_mut(),
                        Entry::Vacant(entry) => {
                            debug!(key = %entry.key(), "new aircraft");
                            added = true;
                            entry.insert(factory())
                        }
                    };
                    if !record.apply_quick(&row) {
                        warn!(key = row.key, "quick row rejected by its record");
                    }
                }
                Err(err) => warn!(error = %err, "skipping undecodable quick row"),
            },
        );

        added
    }

    /// Pull all expensive rows into existing records. Rows for unknown
    /// keys are skipped; only quick rows create records.
    fn fetch_info(&mut self, count: usize) {
        let aircraft = &mut self.aircraft;

        fetch_rows(
            &mut self.bulk_expensive,
            count,
            self.batch_size,
            InfoRow::SIZE,
            |bytes| match InfoRow::decode(bytes) {
                Ok(row) => match aircraft.get_mut(&entity_key(row.key)) {
                    Some(record) => {
                        if !record.apply_info(&row) {
                            trace!(key = row.key, "text row rejected by its record");
                        }
                    }
                    None => trace!(key = row.key, "text row for unknown aircraft"),
                },
                Err(err) => warn!(error = %err, "skipping undecodable text row"),
            },
        );
    }
}

/// Pull `count` rows of `row_size` bytes from `dataref` in batches of
/// `batch` rows, invoking `apply` per received row.
///
/// The size probe runs before every transfer: another client speaking a
/// different protocol version may have talked to the provider since our
/// last call. The initial protocol version defines both sides to agree on
/// row layout, so a mismatch is only logged and the transfer proceeds
/// with the local layout.
///
/// Each batch reads `batch * row_size` bytes at byte offset
/// `batch_start * row_size`; a short read yields fewer rows and a read
/// returning none ends the pull early.
fn fetch_rows(
    dataref: &mut DataRef,
    count: usize,
    batch: usize,
    row_size: usize,
    mut apply: impl FnMut(&[u8]),
) {
    let provider_row_size = dataref.get_bytes(None, 0);
    if provider_row_size != 0 && provider_row_size != row_size {
        warn!(
            dataref = dataref.name(),
            provider_row_size,
            local_row_size = row_size,
            "bulk row size mismatch, proceeding with local layout"
        );
    }

    let mut buf = vec![0u8; batch * row_size];
    let mut index = 0;
    while index < count {
        let received = dataref.get_bytes(Some(&mut buf), index * row_size);
        let rows = (received / row_size).min(batch);
        if rows == 0 {
            trace!(dataref = dataref.name(), index, "bulk pull returned no rows");
            break;
        }

        for i in 0..rows {
            apply(&buf[i * row_size..(i + 1) * row_size]);
        }

        index += batch;
    }
}
