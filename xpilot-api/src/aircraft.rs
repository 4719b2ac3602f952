//! One tracked aircraft.
//!
//! Records are created by the tracker when a previously-unseen entity key
//! shows up in a quick bulk row, updated wholesale on every successful
//! payload application, and retired by the removal sweep when a cycle
//! passes without the key appearing. The provider never sends an explicit
//! "removed" signal.
//!
//! A record's identity (`key`/`key_num`) is fixed by the first quick
//! payload it receives and never changes afterwards; payloads carrying a
//! different key are rejected and leave the record untouched.

use std::collections::HashMap;

use crate::protocol::{entity_key, InfoRow, QuickRow};

/// Map from canonical (hex) entity key to the owned aircraft record.
///
/// This is both the live view handed to the consumer and the working set
/// for reconciliation; iteration order is not significant.
pub type AircraftMap = HashMap<String, Aircraft>;

/// One aircraft currently simulated by the provider.
#[derive(Debug, Default)]
pub struct Aircraft {
    /// Canonical hex key; empty until the first quick payload arrives,
    /// then fixed for the record's lifetime.
    key: String,
    /// Raw numeric key backing `key`, for O(1) match checks on updates.
    key_num: u64,
    /// Most recent numeric payload.
    quick: QuickRow,
    /// Most recent text payload.
    info: InfoRow,
    /// Whether any payload was applied in the current refresh cycle.
    updated: bool,
}

impl Aircraft {
    /// A record with no identity yet. The tracker's factory default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a quick (numeric) payload.
    ///
    /// The first application fixes the record's identity from the row's
    /// key. Afterwards, rows carrying a different key return `false` and
    /// leave the record unchanged.
    pub fn apply_quick(&mut self, row: &QuickRow) -> bool {
        if self.key.is_empty() {
            self.key_num = row.key;
            self.key = entity_key(row.key);
        } else if row.key != self.key_num {
            return false;
        }

        self.quick = *row;
        self.updated = true;
        true
    }

    /// Apply an expensive (text) payload.
    ///
    /// Never assigns identity; a record always receives a quick payload
    /// first. Rows whose key does not match are rejected, which guards
    /// against misaligned rows if the two bulk slots ever desynchronize.
    pub fn apply_info(&mut self, row: &InfoRow) -> bool {
        if self.key.is_empty() || row.key != self.key_num {
            return false;
        }

        self.info = row.clone();
        self.updated = true;
        true
    }

    /// Canonical hex key; empty before the first quick payload.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw numeric entity key.
    pub fn key_num(&self) -> u64 {
        self.key_num
    }

    /// Most recent numeric payload.
    pub fn quick(&self) -> &QuickRow {
        &self.quick
    }

    /// Most recent text payload.
    pub fn info(&self) -> &InfoRow {
        &self.info
    }

    /// (latitude, longitude) in degrees.
    pub fn position(&self) -> (f64, f64) {
        (self.quick.latitude, self.quick.longitude)
    }

    /// Altitude MSL in feet.
    pub fn altitude_ft(&self) -> f64 {
        self.quick.altitude_ft
    }

    /// True heading in degrees.
    pub fn heading(&self) -> f32 {
        self.quick.heading
    }

    /// Ground track in degrees.
    pub fn track(&self) -> f32 {
        self.quick.track
    }

    /// Ground speed in knots.
    pub fn ground_speed_kt(&self) -> f32 {
        self.quick.ground_speed_kt
    }

    /// Vertical speed in feet per minute.
    pub fn vertical_speed_fpm(&self) -> f32 {
        self.quick.vertical_speed_fpm
    }

    /// Transponder code.
    pub fn squawk(&self) -> u32 {
        self.quick.squawk
    }

    /// Whether the aircraft is on the ground.
    pub fn on_ground(&self) -> bool {
        self.quick.on_ground()
    }

    /// Rendering slot this aircraft occupies; 0 means none. Assigned by
    /// the provider, read-only here.
    pub fn multiplayer_slot(&self) -> i32 {
        self.quick.multiplayer_slot
    }

    /// Call sign, empty until the first expensive pull delivers one.
    pub fn call_sign(&self) -> &str {
        &self.info.call_sign
    }

    /// ICAO type designator.
    pub fn model_icao(&self) -> &str {
        &self.info.model_icao
    }

    /// ICAO operator code.
    pub fn operator_icao(&self) -> &str {
        &self.info.operator_icao
    }

    /// Origin airport code.
    pub fn origin(&self) -> &str {
        &self.info.origin
    }

    /// Destination airport code.
    pub fn destination(&self) -> &str {
        &self.info.destination
    }

    /// Name of the CSL model rendering the aircraft.
    pub fn csl_model(&self) -> &str {
        &self.info.csl_model
    }

    /// Whether a payload was applied in the current refresh cycle.
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Clear the per-cycle update flag. Called by the tracker at the
    /// start of every refresh.
    pub(crate) fn reset_updated(&mut self) {
        self.updated = false;
    }

    /// Human-readable label: identifier, type, route.
    ///
    /// Call sign (or the key when there is none yet), the model ICAO in
    /// parentheses when known, and `origin-destination` with `?` for a
    /// missing leg when either end is known.
    pub fn label(&self) -> String {
        let mut out = if self.info.call_sign.is_empty() {
            self.key.clone()
        } else {
            self.info.call_sign.clone()
        };

        if !self.info.model_icao.is_empty() {
            out.push_str(" (");
            out.push_str(&self.info.model_icao);
            out.push(')');
        }

        if !self.info.origin.is_empty() || !self.info.destination.is_empty() {
            out.push(' ');
            out.push_str(if self.info.origin.is_empty() {
                "?"
            } else {
                &self.info.origin
            });
            out.push('-');
            out.push_str(if self.info.destination.is_empty() {
                "?"
            } else {
                &self.info.destination
            });
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(key: u64) -> QuickRow {
        QuickRow {
            key,
            latitude: 53.5,
            longitude: 10.0,
            ..Default::default()
        }
    }

    fn info(key: u64) -> InfoRow {
        InfoRow {
            key,
            call_sign: "DLH2KB".into(),
            model_icao: "A320".into(),
            origin: "EDDH".into(),
            destination: "EDDM".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_quick_payload_fixes_identity() {
        let mut ac = Aircraft::new();
        assert!(ac.key().is_empty());

        assert!(ac.apply_quick(&quick(0x3C4DD2)));
        assert_eq!(ac.key(), "3C4DD2");
        assert_eq!(ac.key_num(), 0x3C4DD2);
        assert!(ac.is_updated());
    }

    #[test]
    fn test_quick_payload_with_wrong_key_is_rejected() {
        let mut ac = Aircraft::new();
        assert!(ac.apply_quick(&quick(0x3C4DD2)));
        ac.reset_updated();

        let mut other = quick(0xABCDEF);
        other.latitude = 1.0;
        assert!(!ac.apply_quick(&other));

        // Record unchanged: key, payload, update flag
        assert_eq!(ac.key(), "3C4DD2");
        assert_eq!(ac.position(), (53.5, 10.0));
        assert!(!ac.is_updated());
    }

    #[test]
    fn test_quick_payload_overwrites_wholesale() {
        let mut ac = Aircraft::new();
        assert!(ac.apply_quick(&quick(7)));

        let mut next = quick(7);
        next.latitude = 54.0;
        next.ground_speed_kt = 140.0;
        assert!(ac.apply_quick(&next));

        assert_eq!(ac.position(), (54.0, 10.0));
        assert_eq!(ac.ground_speed_kt(), 140.0);
    }

    #[test]
    fn test_info_payload_requires_matching_key() {
        let mut ac = Aircraft::new();
        assert!(ac.apply_quick(&quick(7)));

        assert!(!ac.apply_info(&info(8)), "mismatched key must be rejected");
        assert!(ac.call_sign().is_empty());

        assert!(ac.apply_info(&info(7)));
        assert_eq!(ac.call_sign(), "DLH2KB");
    }

    #[test]
    fn test_info_payload_before_identity_is_rejected() {
        // A fresh record has key_num 0; an info row for entity key 0 must
        // still not attach before a quick payload set the identity.
        let mut ac = Aircraft::new();
        assert!(!ac.apply_info(&info(0)));
        assert!(!ac.is_updated());
    }

    #[test]
    fn test_update_flag_lifecycle() {
        let mut ac = Aircraft::new();
        assert!(!ac.is_updated());

        assert!(ac.apply_quick(&quick(7)));
        assert!(ac.is_updated());

        ac.reset_updated();
        assert!(!ac.is_updated());

        assert!(ac.apply_info(&info(7)));
        assert!(ac.is_updated());
    }

    #[test]
    fn test_label_with_full_info() {
        let mut ac = Aircraft::new();
        assert!(ac.apply_quick(&quick(0x3C4DD2)));
        assert!(ac.apply_info(&info(0x3C4DD2)));

        assert_eq!(ac.label(), "DLH2KB (A320) EDDH-EDDM");
    }

    #[test]
    fn test_label_falls_back_to_key() {
        let mut ac = Aircraft::new();
        assert!(ac.apply_quick(&quick(0x3C4DD2)));

        assert_eq!(ac.label(), "3C4DD2");
    }

    #[test]
    fn test_label_with_partial_route() {
        let mut ac = Aircraft::new();
        assert!(ac.apply_quick(&quick(7)));

        let mut row = info(7);
        row.origin = String::new();
        assert!(ac.apply_info(&row));

        assert_eq!(ac.label(), "DLH2KB (A320) ?-EDDM");
    }
}
