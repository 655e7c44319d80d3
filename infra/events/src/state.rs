use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::trace;

/// Stream of state values: the current one first, then every change.
pub type StateStream<T> = WatchStream<T>;

/// A latest-value cell that any number of observers can follow.
///
/// Clones share the same cell.
#[derive(Debug)]
pub struct StateCell<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self { sender: Arc::clone(&self.sender) }
    }
}

impl<T> StateCell<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender: Arc::new(sender) }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Stores `value`, notifying observers only if it differs from the current one.
    ///
    /// Returns the previous value.
    pub fn set(&self, value: T) -> T {
        let mut previous = None;
        self.sender.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            previous = Some(std::mem::replace(current, value.clone()));
            true
        });
        match previous {
            Some(previous) => {
                trace!(state = std::any::type_name::<T>(), "State changed");
                previous
            },
            None => value,
        }
    }

    /// Applies `update` and notifies observers if it reports a change.
    pub fn update(&self, update: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(update)
    }

    /// Follows the cell: yields the current value immediately, then each change.
    #[must_use]
    pub fn subscribe(&self) -> StateStream<T> {
        WatchStream::new(self.sender.subscribe())
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
