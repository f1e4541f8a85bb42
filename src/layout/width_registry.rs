use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

/// Element id to last measured pixel width, in first-registration order.
pub type WidthSnapshot = IndexMap<String, u32>;

pub type WidthObserver = Box<dyn FnMut(&WidthSnapshot)>;

/// Registry shared by every widget on one screen.
pub type SharedWidthRegistry = Rc<RefCell<LayoutWidthRegistry>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Keyed registry of measured element widths with change notification.
///
/// Entries are created on first registration, updated afterwards and never
/// removed; the registry lives as long as its screen. Observers must not
/// reach back into the registry while being notified.
#[derive(Default)]
pub struct LayoutWidthRegistry {
    widths: WidthSnapshot,
    observers: Vec<(SubscriptionId, WidthObserver)>,
    next_subscription: u64,
}

impl LayoutWidthRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedWidthRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Stores `width` for `element_id` and notifies every observer with the
    /// full snapshot.
    pub fn register_width(&mut self, element_id: &str, width: u32) {
        match self.widths.get_mut(element_id) {
            Some(existing) => *existing = width,
            None => {
                self.widths.insert(element_id.to_owned(), width);
            }
        }
        trace!(element_id, width, observers = self.observers.len(), "width registered");
        for (_, observer) in &mut self.observers {
            observer(&self.widths);
        }
    }

    #[must_use]
    pub fn width(&self, element_id: &str) -> Option<u32> {
        self.widths.get(element_id).copied()
    }

    #[must_use]
    pub fn snapshot(&self) -> &WidthSnapshot {
        &self.widths
    }

    /// Delivers the current snapshot immediately, then every later one until
    /// `unsubscribe` is called with the returned id.
    pub fn subscribe(
        &mut self,
        mut observer: impl FnMut(&WidthSnapshot) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        observer(&self.widths);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(known, _)| *known != id);
        before != self.observers.len()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl fmt::Debug for LayoutWidthRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutWidthRegistry")
            .field("widths", &self.widths)
            .field("observers", &self.observers.len())
            .finish()
    }
}
