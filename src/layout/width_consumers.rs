use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::{LayoutWidthRegistry, SubscriptionId, WidthSnapshot};

/// Write side of an element whose geometry follows registered widths.
pub trait LayoutElement {
    fn applied_width(&self) -> Option<u32>;
    fn apply_width(&mut self, width: u32);
    fn applied_offset(&self) -> Option<f64>;
    fn apply_offset(&mut self, offset: f64);
}

/// Sizes an element to the widest of its named peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchMaxWidth {
    peers: Vec<String>,
}

impl MatchMaxWidth {
    #[must_use]
    pub fn new<I, T>(peers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            peers: peers.into_iter().map(Into::into).collect(),
        }
    }

    /// Widest registered peer; unregistered peers are skipped.
    #[must_use]
    pub fn compute(&self, snapshot: &WidthSnapshot) -> Option<u32> {
        self.peers
            .iter()
            .filter_map(|peer| snapshot.get(peer).copied())
            .filter(|width| *width > 0)
            .max()
    }

    /// Returns `true` when the element's width was written.
    pub fn apply<E: LayoutElement + ?Sized>(
        &self,
        snapshot: &WidthSnapshot,
        element: &mut E,
    ) -> bool {
        let Some(width) = self.compute(snapshot) else {
            return false;
        };
        if element.applied_width() == Some(width) {
            return false;
        }
        trace!(width, "applying matched max width");
        element.apply_width(width);
        true
    }

    /// Keeps `element` in sync with `registry` until unsubscribed.
    pub fn attach<E: LayoutElement + 'static>(
        self,
        registry: &mut LayoutWidthRegistry,
        element: Rc<RefCell<E>>,
    ) -> SubscriptionId {
        registry.subscribe(move |snapshot| {
            self.apply(snapshot, &mut *element.borrow_mut());
        })
    }
}

/// Offsets an element so it sits centered against a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterOnPeer {
    own: String,
    peer: String,
}

impl CenterOnPeer {
    #[must_use]
    pub fn new(own: impl Into<String>, peer: impl Into<String>) -> Self {
        Self {
            own: own.into(),
            peer: peer.into(),
        }
    }

    /// `(peer - own) / 2` once both widths are registered and positive.
    #[must_use]
    pub fn compute(&self, snapshot: &WidthSnapshot) -> Option<f64> {
        let own = snapshot.get(&self.own).copied().filter(|width| *width > 0)?;
        let peer = snapshot.get(&self.peer).copied().filter(|width| *width > 0)?;
        Some((f64::from(peer) - f64::from(own)) / 2.0)
    }

    pub fn apply<E: LayoutElement + ?Sized>(
        &self,
        snapshot: &WidthSnapshot,
        element: &mut E,
    ) -> bool {
        let Some(offset) = self.compute(snapshot) else {
            return false;
        };
        if element.applied_offset() == Some(offset) {
            return false;
        }
        trace!(offset, "applying centering offset");
        element.apply_offset(offset);
        true
    }

    pub fn attach<E: LayoutElement + 'static>(
        self,
        registry: &mut LayoutWidthRegistry,
        element: Rc<RefCell<E>>,
    ) -> SubscriptionId {
        registry.subscribe(move |snapshot| {
            self.apply(snapshot, &mut *element.borrow_mut());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CenterOnPeer, LayoutElement, MatchMaxWidth};
    use crate::layout::WidthSnapshot;

    #[derive(Default)]
    struct Element {
        width: Option<u32>,
        offset: Option<f64>,
        writes: usize,
    }

    impl LayoutElement for Element {
        fn applied_width(&self) -> Option<u32> {
            self.width
        }

        fn apply_width(&mut self, width: u32) {
            self.width = Some(width);
            self.writes += 1;
        }

        fn applied_offset(&self) -> Option<f64> {
            self.offset
        }

        fn apply_offset(&mut self, offset: f64) {
            self.offset = Some(offset);
            self.writes += 1;
        }
    }

    fn snapshot(entries: &[(&str, u32)]) -> WidthSnapshot {
        entries
            .iter()
            .map(|(id, width)| ((*id).to_owned(), *width))
            .collect()
    }

    #[test]
    fn max_of_peers_skips_unregistered_and_is_idempotent() {
        let consumer = MatchMaxWidth::new(["peerA", "peerB"]);
        let mut element = Element::default();
        let widths = snapshot(&[("peerA", 120), ("other", 500)]);

        assert_eq!(consumer.compute(&widths), Some(120));
        assert!(consumer.apply(&widths, &mut element));
        assert!(!consumer.apply(&widths, &mut element));
        assert_eq!(element.writes, 1);
        assert_eq!(element.width, Some(120));
    }

    #[test]
    fn centering_needs_both_widths() {
        let consumer = CenterOnPeer::new("label", "bar");
        let mut element = Element::default();

        assert!(!consumer.apply(&snapshot(&[("bar", 200)]), &mut element));
        assert!(consumer.apply(&snapshot(&[("bar", 200), ("label", 150)]), &mut element));
        assert_eq!(element.offset, Some(25.0));
        assert!(consumer.apply(&snapshot(&[("bar", 100), ("label", 150)]), &mut element));
        assert_eq!(element.offset, Some(-25.0));
        assert!(!consumer.apply(&snapshot(&[("bar", 100), ("label", 150)]), &mut element));
    }
}
