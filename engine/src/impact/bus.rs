//! Impact Event Bus
//!
//! Decouples whatever knocks into the ground from the renderer that draws
//! the ripple. Emitters and subscribers only share the bus.

use std::sync::mpsc::{self, Receiver, Sender};

/// A ground contact before it has been stamped with field time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactEvent {
    pub x: f32,
    pub z: f32,
    pub strength: f32,
}

/// Default strength for emitters that don't care.
pub const DEFAULT_IMPACT_STRENGTH: f32 = 0.9;

#[derive(Default)]
pub struct ImpactBus {
    subscribers: Vec<Sender<ImpactEvent>>,
}

impl ImpactBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<ImpactEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Broadcast an impact; returns how many subscribers received it.
    pub fn emit(&mut self, x: f32, z: f32, strength: f32) -> usize {
        let event = ImpactEvent { x, z, strength };
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_subscribers_receive() {
        let mut bus = ImpactBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        assert_eq!(bus.emit(1.0, 2.0, 0.5), 2);
        assert_eq!(a.try_recv().unwrap(), ImpactEvent { x: 1.0, z: 2.0, strength: 0.5 });
        assert_eq!(b.try_recv().unwrap().x, 1.0);
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let mut bus = ImpactBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.emit(0.0, 0.0, DEFAULT_IMPACT_STRENGTH), 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }
}
