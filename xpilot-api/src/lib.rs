//! Client for the xPilot bulk traffic dataRefs.
//!
//! xPilot (plugin signature `org.vatsim.xpilot`) injects online-network
//! traffic into the simulator and republishes the aircraft it is
//! simulating through a pair of bulk byte-array dataRefs. This crate
//! mirrors that externally-owned list into an owned, typed map a consumer
//! plugin can walk every frame, with create/update/retire semantics
//! handled by a per-cycle synchronization pass.
//!
//! # Architecture
//!
//! - [`host`] - the simulator surface the crate consumes (dataRef lookup,
//!   scalar and byte-range access, plugin registry), as a trait.
//! - [`dataref`] - lazily-bound accessor for one named slot; valid only
//!   once bound to a usable type, retried on every access until then.
//! - [`protocol`] - the fixed-layout bulk rows and the hex entity-key
//!   encoding.
//! - [`aircraft`] - one tracked record: write-once identity, numeric and
//!   text payload snapshots, per-cycle update flag.
//! - [`tracker`] - the synchronization engine: availability gate, batched
//!   two-tier pulls, removal sweep.
//!
//! # Usage
//!
//! ```ignore
//! use xpilot_api::AircraftTracker;
//!
//! let mut tracker = AircraftTracker::with_defaults(host);
//!
//! // Once per simulation frame:
//! let mut removed = Vec::new();
//! for aircraft in tracker.refresh(Some(&mut removed)).values() {
//!     draw_traffic_label(aircraft.position(), &aircraft.label());
//! }
//! ```
//!
//! The tracker degrades rather than fails: before the provider loads (or
//! after it unloads) every refresh returns an empty map, and reads of
//! missing slots yield defaults. No call into this crate panics.

pub mod aircraft;
pub mod dataref;
pub mod host;
pub mod protocol;
pub mod tracker;

pub use aircraft::{Aircraft, AircraftMap};
pub use dataref::DataRef;
pub use host::{DataRefHandle, DataRefTypes, SimHost};
pub use protocol::{entity_key, InfoRow, QuickRow, RowError, MIN_KEY_DIGITS};
pub use tracker::{
    AircraftFactory, AircraftTracker, TrackerConfig, DEFAULT_BATCH_SIZE, DEFAULT_INFO_INTERVAL,
    MAX_BATCH_SIZE, MIN_BATCH_SIZE, XPILOT_PLUGIN_SIGNATURE,
};
