//! Editor notifications and the listener registry.
//!
//! The host subscribes once and keeps the returned [`Subscription`] to
//! unsubscribe later. Listeners are called synchronously, in subscription
//! order, after the mutation they describe has completed.

use serde::{Deserialize, Serialize};

use crate::floor::FloorIndex;
use crate::session::ModeKind;

/// Something the host may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Placements on this floor changed and it needs a redraw.
    PlacementsChanged { floor: FloorIndex },
    /// An operation on this floor was rejected (overlap or bounds).
    InvalidOperation { floor: FloorIndex },
    /// The editing mode changed.
    ModeChanged { mode: ModeKind },
}

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&EditorEvent) + Send>;

#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(Subscription, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&EditorEvent) + Send + 'static,
    {
        let handle = Subscription(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, Box::new(listener)));
        handle
    }

    /// Returns `false` if the handle was already unsubscribed.
    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
