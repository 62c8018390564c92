// ── Reactive slot streams ──
//
// Subscription handle for one aggregate in the ViewStore.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

/// A subscription to one whole-object slot.
///
/// Provides point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`. Empty
/// slots (nothing fetched yet) are skipped.
pub struct SlotStream<T: Send + Sync + 'static> {
    current: Option<Arc<T>>,
    receiver: watch::Receiver<Option<Arc<T>>>,
}

impl<T: Send + Sync + 'static> SlotStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Option<Arc<T>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot as of creation or the last `changed()`.
    pub fn current(&self) -> Option<&Arc<T>> {
        self.current.as_ref()
    }

    /// Latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Option<Arc<T>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement. Returns `None` once the store is dropped.
    pub async fn changed(&mut self) -> Option<Arc<T>> {
        loop {
            self.receiver.changed().await.ok()?;
            if let Some(snap) = self.receiver.borrow_and_update().clone() {
                self.current = Some(Arc::clone(&snap));
                return Some(snap);
            }
        }
    }

    /// Convert into a `Stream` yielding every populated snapshot, starting
    /// with the current one.
    pub fn into_stream(self) -> impl Stream<Item = Arc<T>> + Send + 'static {
        WatchStream::new(self.receiver).filter_map(std::convert::identity)
    }
}
