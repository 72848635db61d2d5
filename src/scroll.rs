//! Scroll-direction tracking shared by every reveal region.
//!
//! A single [`ScrollHub`] owns the only [`ScrollTracker`] on the page, so all
//! subscribers observe the same direction for a given scroll event.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Direction of the most recent scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    Up,
    Down,
    /// No scroll event has been observed since the baseline was taken.
    #[default]
    None,
}

/// Compares consecutive vertical offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollTracker {
    last_offset: f64,
    direction: ScrollDirection,
}

impl ScrollTracker {
    /// Start tracking from the offset sampled when observation begins.
    pub fn new(baseline: f64) -> Self {
        Self {
            last_offset: baseline,
            direction: ScrollDirection::None,
        }
    }

    /// Record a new offset and return the direction relative to the previous one.
    ///
    /// Equal offsets count as `Down`; only a strictly smaller offset is `Up`.
    pub fn observe(&mut self, offset: f64) -> ScrollDirection {
        self.direction = if offset < self.last_offset {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        };
        self.last_offset = offset;
        self.direction
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn last_offset(&self) -> f64 {
        self.last_offset
    }
}

/// Directions derived from a run of offsets; the first offset is the baseline.
pub fn directions_from_offsets(offsets: &[f64]) -> Vec<ScrollDirection> {
    let Some((&baseline, rest)) = offsets.split_first() else {
        return Vec::new();
    };
    let mut tracker = ScrollTracker::new(baseline);
    rest.iter().map(|&offset| tracker.observe(offset)).collect()
}

/// One published scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSample {
    pub offset: f64,
    pub direction: ScrollDirection,
}

type Callback = Rc<dyn Fn(ScrollSample)>;

#[derive(Default)]
struct HubInner {
    tracker: ScrollTracker,
    latest: ScrollSample,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

/// Process-wide scroll publisher.
///
/// Cloning the hub yields another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct ScrollHub {
    inner: Rc<RefCell<HubInner>>,
}

impl ScrollHub {
    pub fn new(baseline: f64) -> Self {
        let inner = HubInner {
            tracker: ScrollTracker::new(baseline),
            latest: ScrollSample {
                offset: baseline,
                direction: ScrollDirection::None,
            },
            ..HubInner::default()
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Derive the direction for `offset` and deliver it to every subscriber.
    pub fn publish(&self, offset: f64) -> ScrollSample {
        let (sample, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let direction = inner.tracker.observe(offset);
            let sample = ScrollSample { offset, direction };
            inner.latest = sample;
            let callbacks: Vec<(u64, Callback)> = inner
                .subscribers
                .iter()
                .map(|(id, cb)| (*id, Rc::clone(cb)))
                .collect();
            (sample, callbacks)
        };
        // The borrow is released so callbacks may (un)subscribe. A subscriber
        // cancelled earlier in this dispatch is skipped.
        for (id, cb) in callbacks {
            if self.is_subscribed(id) {
                cb(sample);
            }
        }
        sample
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.inner.borrow().subscribers.iter().any(|(sid, _)| *sid == id)
    }

    pub fn subscribe(&self, callback: impl Fn(ScrollSample) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        Subscription {
            hub: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn latest(&self) -> ScrollSample {
        self.inner.borrow().latest
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Disposer returned by [`ScrollHub::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    id: Option<u64>,
}

impl Subscription {
    pub fn cancel(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(inner) = self.hub.upgrade() {
            inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.hub.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn directions_use_first_offset_as_baseline() {
        assert_eq!(
            directions_from_offsets(&[0.0, 50.0, 30.0]),
            vec![ScrollDirection::Down, ScrollDirection::Up]
        );
    }

    #[test]
    fn short_runs_yield_no_directions() {
        assert!(directions_from_offsets(&[]).is_empty());
        assert!(directions_from_offsets(&[120.0]).is_empty());
    }

    #[test]
    fn unchanged_offset_reads_as_down() {
        let mut tracker = ScrollTracker::new(40.0);
        assert_eq!(tracker.direction(), ScrollDirection::None);
        assert_eq!(tracker.observe(40.0), ScrollDirection::Down);
        assert_eq!(tracker.last_offset(), 40.0);
    }

    #[test]
    fn every_subscriber_sees_the_same_sample() {
        let hub = ScrollHub::new(100.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<_> = (0..3)
            .map(|_| {
                let seen = Rc::clone(&seen);
                hub.subscribe(move |s| seen.borrow_mut().push(s))
            })
            .collect();

        let sample = hub.publish(60.0);
        assert_eq!(sample.direction, ScrollDirection::Up);
        assert_eq!(*seen.borrow(), vec![sample; 3]);
        assert_eq!(hub.latest(), sample);
        drop(subs);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = ScrollHub::new(0.0);
        let hits = Rc::new(Cell::new(0));
        let mut sub = {
            let hits = Rc::clone(&hits);
            hub.subscribe(move |_| hits.set(hits.get() + 1))
        };
        hub.publish(10.0);
        sub.cancel();
        sub.cancel();
        hub.publish(20.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(hub.subscriber_count(), 0);
        assert!(!sub.is_active());
    }

    #[test]
    fn callback_may_unsubscribe_during_dispatch() {
        let hub = ScrollHub::new(0.0);
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner_slot = Rc::clone(&slot);
        let sub = hub.subscribe(move |_| {
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        hub.publish(5.0);
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(6.0);
    }

    #[test]
    fn peer_cancelled_mid_dispatch_is_skipped() {
        let hub = ScrollHub::new(0.0);
        let peer_hits = Rc::new(Cell::new(0));
        let peer_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let canceller = {
            let peer_slot = Rc::clone(&peer_slot);
            hub.subscribe(move |_| {
                peer_slot.borrow_mut().take();
            })
        };
        let peer = {
            let peer_hits = Rc::clone(&peer_hits);
            hub.subscribe(move |_| peer_hits.set(peer_hits.get() + 1))
        };
        *peer_slot.borrow_mut() = Some(peer);

        hub.publish(5.0);
        assert_eq!(peer_hits.get(), 0);
        assert_eq!(hub.subscriber_count(), 1);
        drop(canceller);
    }

    #[test]
    fn callback_may_subscribe_during_dispatch() {
        let hub = ScrollHub::new(0.0);
        let nested: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let late_hits = Rc::new(Cell::new(0));

        let outer = {
            let hub_handle = hub.clone();
            let nested = Rc::clone(&nested);
            let late_hits = Rc::clone(&late_hits);
            hub.subscribe(move |_| {
                if nested.borrow().is_empty() {
                    let late_hits = Rc::clone(&late_hits);
                    let sub = hub_handle.subscribe(move |_| late_hits.set(late_hits.get() + 1));
                    nested.borrow_mut().push(sub);
                }
            })
        };

        hub.publish(5.0);
        assert_eq!(hub.subscriber_count(), 2);
        assert_eq!(late_hits.get(), 0);

        hub.publish(9.0);
        assert_eq!(late_hits.get(), 1);
        assert_eq!(hub.subscriber_count(), 2);

        nested.borrow_mut().clear();
        drop(outer);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = ScrollHub::new(0.0);
        let mut sub = hub.subscribe(|_| {});
        drop(hub);
        assert!(!sub.is_active());
        sub.cancel();
    }
}
