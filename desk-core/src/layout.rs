use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Page-wide layout changes that require widget groups to be rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChange {
    FullWidthToggled,
    Resized,
}

/// Fan-out point for layout changes.
///
/// Each page owns a [`LayoutSubscription`]; dropping it unsubscribes.
#[derive(Debug, Clone, Default)]
pub struct LayoutNotifier {
    subscribers: Rc<RefCell<Vec<UnboundedSender<LayoutChange>>>>,
}

impl LayoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> LayoutSubscription {
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.borrow_mut().push(tx);
        LayoutSubscription { receiver: rx }
    }

    /// Deliver `change` to every live subscriber; returns how many received it
    pub fn notify(&self, change: LayoutChange) -> usize {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|tx| tx.unbounded_send(change).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

#[derive(Debug)]
pub struct LayoutSubscription {
    receiver: UnboundedReceiver<LayoutChange>,
}

impl LayoutSubscription {
    /// Take every change delivered since the last call
    pub fn drain(&mut self) -> Vec<LayoutChange> {
        let mut changes = Vec::new();
        while let Ok(change) = self.receiver.try_recv() {
            changes.push(change);
        }
        changes
    }
}
