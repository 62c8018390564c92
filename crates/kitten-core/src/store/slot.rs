// ── Whole-object slot ──
//
// One aggregate held behind a `watch` channel. Writers swap in a complete
// new value; readers get `Arc` snapshots that never change under them.

use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::SlotStream;

pub(crate) struct Slot<T: Send + Sync + 'static> {
    tx: watch::Sender<Option<Arc<T>>>,
}

impl<T: Send + Sync + 'static> Slot<T> {
    pub(crate) fn empty() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub(crate) fn with_value(value: T) -> Self {
        let (tx, _) = watch::channel(Some(Arc::new(value)));
        Self { tx }
    }

    /// Replace the held value wholesale and notify subscribers.
    pub(crate) fn replace(&self, value: T) {
        self.tx.send_replace(Some(Arc::new(value)));
    }

    pub(crate) fn snapshot(&self) -> Option<Arc<T>> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> SlotStream<T> {
        SlotStream::new(self.tx.subscribe())
    }
}

impl<T: Clone + Send + Sync + 'static> Slot<T> {
    /// Edit the held value in place. Outstanding snapshots keep the old
    /// value (copy-on-write). Does nothing on an empty slot.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_if_modified(|slot| match slot {
            Some(value) => {
                f(Arc::make_mut(value));
                true
            }
            None => false,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_whole_value() {
        let slot = Slot::empty();
        assert!(slot.snapshot().is_none());

        slot.replace(vec![1, 2, 3]);
        let before = slot.snapshot().unwrap();
        slot.replace(vec![9]);

        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*slot.snapshot().unwrap(), vec![9]);
    }

    #[test]
    fn modify_is_copy_on_write() {
        let slot = Slot::with_value(vec![1]);
        let held = slot.snapshot().unwrap();
        slot.modify(|v| v.push(2));

        assert_eq!(*held, vec![1]);
        assert_eq!(*slot.snapshot().unwrap(), vec![1, 2]);
    }

    #[test]
    fn modify_on_empty_slot_is_noop() {
        let slot: Slot<Vec<u8>> = Slot::empty();
        slot.modify(|v| v.push(1));
        assert!(slot.snapshot().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let slot = Slot::empty();
        let mut stream = slot.subscribe();
        assert!(stream.current().is_none());

        slot.replace(String::from("first"));
        let got = stream.changed().await.unwrap();
        assert_eq!(got.as_str(), "first");
        assert_eq!(stream.current().unwrap().as_str(), "first");
    }
}
