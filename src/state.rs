// MIT License
// Rust port of the node.js ad2usb module

//! Named state slots with change-triggered notification.
//!
//! Every diffed topic in the library goes through [`StateStore::set_bool`] or
//! [`StateStore::set_text`]; these are the only call sites that publish
//! deduplicated events, so a subscriber sees at most one notification per
//! actual state transition no matter how often the keypad repeats itself.

use std::collections::HashMap;

use tracing::trace;

use crate::event::{AlarmEvent, EventSender};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SlotValue {
    Bool(bool),
    Text(String),
}

/// Holds the last known value for every tracked flag and publishes an event
/// when a value changes.
///
/// Slots are created lazily on first set and never evicted. For RF sensors
/// this means the map grows with the number of distinct serials seen; that is
/// bounded by the installation's sensor count in practice.
pub struct StateStore {
    slots: HashMap<String, SlotValue>,
    event_tx: EventSender,
}

impl StateStore {
    pub fn new(event_tx: EventSender) -> Self {
        Self {
            slots: HashMap::new(),
            event_tx,
        }
    }

    /// Update a boolean slot. If the value differs from the stored one (a
    /// first set always counts as a change), store it, publish the event
    /// produced by `make_event`, and return true. Otherwise return false and
    /// publish nothing.
    pub fn set_bool(
        &mut self,
        name: &str,
        value: bool,
        make_event: impl FnOnce(bool) -> AlarmEvent,
    ) -> bool {
        self.set(name, SlotValue::Bool(value), || make_event(value))
    }

    /// Update a text slot with the same change-triggered semantics as
    /// [`set_bool`](Self::set_bool).
    pub fn set_text(
        &mut self,
        name: &str,
        value: &str,
        make_event: impl FnOnce(&str) -> AlarmEvent,
    ) -> bool {
        self.set(name, SlotValue::Text(value.to_string()), || make_event(value))
    }

    fn set(
        &mut self,
        name: &str,
        value: SlotValue,
        make_event: impl FnOnce() -> AlarmEvent,
    ) -> bool {
        let changed = self.slots.get(name) != Some(&value);
        if changed {
            trace!("state change: {} -> {:?}", name, value);
            self.slots.insert(name.to_string(), value);
            let _ = self.event_tx.send(make_event());
        }
        changed
    }

    /// Read a boolean slot. None if the slot was never set or holds text.
    pub fn bool_slot(&self, name: &str) -> Option<bool> {
        match self.slots.get(name) {
            Some(SlotValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Publish an event without touching any slot. Used for the non-diffed
    /// topics (raw sections, beep counts, sent signals, decode errors).
    pub fn publish(&self, event: AlarmEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::event_channel;
    use tokio::sync::broadcast::error::TryRecvError;

    fn drain(rx: &mut crate::event::EventReceiver) -> Vec<AlarmEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(e) => events.push(e),
                Err(TryRecvError::Empty) => return events,
                Err(e) => panic!("event channel broken: {}", e),
            }
        }
    }

    #[test]
    fn test_first_set_notifies() {
        let (tx, mut rx) = event_channel(16);
        let mut store = StateStore::new(tx);
        assert!(store.set_bool("power", false, AlarmEvent::Power));
        assert_eq!(drain(&mut rx), vec![AlarmEvent::Power(false)]);
    }

    #[test]
    fn test_identical_values_notify_once() {
        let (tx, mut rx) = event_channel(16);
        let mut store = StateStore::new(tx);
        assert!(store.set_bool("chimeMode", true, AlarmEvent::ChimeMode));
        assert!(!store.set_bool("chimeMode", true, AlarmEvent::ChimeMode));
        assert!(!store.set_bool("chimeMode", true, AlarmEvent::ChimeMode));
        assert_eq!(drain(&mut rx), vec![AlarmEvent::ChimeMode(true)]);
    }

    #[test]
    fn test_transition_on_third_set() {
        let (tx, mut rx) = event_channel(16);
        let mut store = StateStore::new(tx);
        store.set_bool("batteryLow", false, AlarmEvent::BatteryLow);
        store.set_bool("batteryLow", false, AlarmEvent::BatteryLow);
        assert!(store.set_bool("batteryLow", true, AlarmEvent::BatteryLow));
        assert_eq!(
            drain(&mut rx),
            vec![AlarmEvent::BatteryLow(false), AlarmEvent::BatteryLow(true)]
        );
    }

    #[test]
    fn test_text_slot_diffed() {
        let (tx, mut rx) = event_channel(16);
        let mut store = StateStore::new(tx);
        assert!(store.set_text("fault", "008", |c| AlarmEvent::Fault(c.to_string())));
        assert!(!store.set_text("fault", "008", |c| AlarmEvent::Fault(c.to_string())));
        assert!(store.set_text("fault", "012", |c| AlarmEvent::Fault(c.to_string())));
        assert_eq!(
            drain(&mut rx),
            vec![
                AlarmEvent::Fault("008".to_string()),
                AlarmEvent::Fault("012".to_string())
            ]
        );
    }

    #[test]
    fn test_slots_independent() {
        let (tx, mut rx) = event_channel(16);
        let mut store = StateStore::new(tx);
        store.set_bool("loop:0102532:1", true, |ok| AlarmEvent::RfLoop {
            serial: "0102532".to_string(),
            loop_no: 1,
            ok,
        });
        store.set_bool("loop:0102532:2", true, |ok| AlarmEvent::RfLoop {
            serial: "0102532".to_string(),
            loop_no: 2,
            ok,
        });
        assert_eq!(drain(&mut rx).len(), 2);
        assert_eq!(store.bool_slot("loop:0102532:1"), Some(true));
        assert_eq!(store.bool_slot("loop:0102532:3"), None);
    }

    #[test]
    fn test_publish_is_not_diffed() {
        let (tx, mut rx) = event_channel(16);
        let store = StateStore::new(tx);
        store.publish(AlarmEvent::Beep(2));
        store.publish(AlarmEvent::Beep(2));
        assert_eq!(drain(&mut rx).len(), 2);
    }
}
