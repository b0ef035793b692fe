// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Size;

#[derive(Debug, Default)]
struct Slot {
    pending: Cell<bool>,
    latest: Cell<Size>,
}

/// Ambient layout-change signal.
///
/// Stands for the surface whose size changes can move the frame: typically
/// the whole document or window, not the frame itself, because sibling
/// layout (sidebars opening and closing) resizes the frame without it being
/// the resize target. The host calls [`ResizeSignal::notify`] whenever that
/// surface changes.
///
/// Observers are held weakly; dropping a [`ResizeWatcher`] unregisters it.
///
/// ```rust
/// use kurbo::Size;
/// use understory_fit::ResizeSignal;
///
/// let body = ResizeSignal::new();
/// let mut watcher = body.observe();
///
/// body.notify(Size::new(1024.0, 768.0));
/// body.notify(Size::new(1280.0, 800.0));
///
/// // Only the latest size is reported, once.
/// assert_eq!(watcher.take(), Some(Size::new(1280.0, 800.0)));
/// assert_eq!(watcher.take(), None);
///
/// drop(watcher);
/// assert_eq!(body.observer_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ResizeSignal {
    observers: RefCell<Vec<Weak<Slot>>>,
}

impl ResizeSignal {
    /// Creates a signal with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts observing this signal.
    ///
    /// The returned guard stays registered until it is dropped or
    /// [`ResizeWatcher::disconnect`]ed.
    #[must_use]
    pub fn observe(&self) -> ResizeWatcher {
        let slot = Rc::new(Slot::default());
        let mut observers = self.observers.borrow_mut();
        observers.retain(|o| o.strong_count() > 0);
        observers.push(Rc::downgrade(&slot));
        ResizeWatcher { slot: Some(slot) }
    }

    /// Records a layout change for every live observer.
    ///
    /// Observers that have not consumed an earlier notification are simply
    /// overwritten with `size`.
    pub fn notify(&self, size: Size) {
        self.observers.borrow_mut().retain(|o| match o.upgrade() {
            Some(slot) => {
                slot.latest.set(size);
                slot.pending.set(true);
                true
            }
            None => false,
        });
    }

    /// Returns the number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }
}

/// Registration on a [`ResizeSignal`].
///
/// Notifications coalesce: however many arrive between two calls to
/// [`ResizeWatcher::take`], only the latest is reported.
#[derive(Debug)]
pub struct ResizeWatcher {
    slot: Option<Rc<Slot>>,
}

impl ResizeWatcher {
    /// Returns the latest surface size if a change arrived since the last call.
    pub fn take(&mut self) -> Option<Size> {
        let slot = self.slot.as_ref()?;
        slot.pending.replace(false).then(|| slot.latest.get())
    }

    /// Returns `true` if a change is waiting to be taken.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.as_ref().is_some_and(|s| s.pending.get())
    }

    /// Stops observing. Further notifications are ignored.
    pub fn disconnect(&mut self) {
        self.slot = None;
    }

    /// Returns `true` while still registered.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::ResizeSignal;

    #[test]
    fn each_watcher_sees_the_change() {
        let signal = ResizeSignal::new();
        let mut a = signal.observe();
        let mut b = signal.observe();
        assert_eq!(signal.observer_count(), 2);

        signal.notify(Size::new(10.0, 20.0));
        assert!(a.is_pending());
        assert_eq!(a.take(), Some(Size::new(10.0, 20.0)));
        assert_eq!(b.take(), Some(Size::new(10.0, 20.0)));
        assert!(!a.is_pending());
    }

    #[test]
    fn disconnect_stops_delivery_and_releases_slot() {
        let signal = ResizeSignal::new();
        let mut watcher = signal.observe();
        watcher.disconnect();
        assert!(!watcher.is_connected());
        assert_eq!(signal.observer_count(), 0);

        signal.notify(Size::new(1.0, 1.0));
        assert_eq!(watcher.take(), None);
    }

    #[test]
    fn dropped_watchers_are_pruned() {
        let signal = ResizeSignal::new();
        for _ in 0..8 {
            let _watcher = signal.observe();
        }
        let _live = signal.observe();
        signal.notify(Size::new(5.0, 5.0));
        assert_eq!(signal.observer_count(), 1);
        assert_eq!(signal.observers.borrow().len(), 1);
    }
}
