use std::collections::HashSet;

use crate::domain::utils::id::Callsign;

/// Bookkeeping for one clock hour of one capacity counter.
///
/// The capacity itself is not stored: it depends on the capacity event in force
/// at the candidate instant and is supplied by the caller on every check.
#[derive(Debug, Clone, Default)]
pub struct HourSlot {
    /// Number of flights committed to this hour.
    pub load: u32,

    /// Callsigns committed to this hour. Used to reject double bookings.
    pub callsigns: HashSet<Callsign>,
}

impl HourSlot {
    pub fn has_room(&self, capacity: u32) -> bool {
        self.load < capacity
    }

    /// Inserts a flight into the hour, updating the load.
    ///
    /// # Returns
    /// `true` if the callsign was newly inserted; `false` if it was already present.
    pub fn insert_flight(&mut self, callsign: &Callsign) -> bool {
        if self.callsigns.insert(callsign.clone()) {
            self.load += 1;
            true
        } else {
            log::warn!("Attempted to book flight {} twice into the same hour. Load was not updated.", callsign);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_room() {
        let mut slot = HourSlot::default();
        assert!(slot.has_room(1));

        assert!(slot.insert_flight(&Callsign::new("VN100")));
        assert_eq!(slot.load, 1);
        assert!(!slot.has_room(1));
        assert!(slot.has_room(2));
    }

    #[test]
    fn test_duplicate_insert_is_ignored() {
        let mut slot = HourSlot::default();
        assert!(slot.insert_flight(&Callsign::new("VN100")));
        assert!(!slot.insert_flight(&Callsign::new("VN100")));
        assert_eq!(slot.load, 1);
    }

    #[test]
    fn test_zero_capacity_never_has_room() {
        let slot = HourSlot::default();
        assert!(!slot.has_room(0));
    }
}
