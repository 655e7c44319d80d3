use crate::error::EventBusError;
use crate::subscription::Subscription;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// A safe default for the per-subscriber backlog warning.
pub const DEFAULT_CAPACITY: usize = 128;
const MIN_CAPACITY: usize = 1;

/// What happens to the broadcast once a failure has been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// The failure is final. Every current subscriber receives it once, every
    /// later subscriber receives it once on subscription, and further items are dropped.
    #[default]
    Terminal,
    /// Current subscribers receive the failure and end; the broadcaster then
    /// opens a fresh channel for later subscribers.
    Restart,
}

#[derive(Debug, Clone)]
pub(crate) enum Signal<T, E> {
    Item(T),
    Failed(E),
}

#[derive(Debug)]
struct Subscriber<T, E> {
    sender: mpsc::UnboundedSender<Signal<T, E>>,
    backlog: Arc<AtomicUsize>,
}

#[derive(Debug)]
enum Channel<T, E> {
    Open { subscribers: Vec<Subscriber<T, E>>, generation: u64 },
    Failed(E),
}

/// A hot, multicast channel: every live subscriber sees each item exactly
/// once, in publish order. Nothing is replayed to late subscribers.
///
/// Delivery is lossless. A subscriber that falls behind keeps its backlog;
/// once that backlog reaches `capacity` items a warning is logged.
///
/// Clones share the same underlying channel.
#[derive(Debug)]
pub struct Broadcaster<T, E> {
    channel: Arc<Mutex<Channel<T, E>>>,
    capacity: usize,
    mode: FailureMode,
}

impl<T, E> Clone for Broadcaster<T, E> {
    fn clone(&self) -> Self {
        Self { channel: Arc::clone(&self.channel), capacity: self.capacity, mode: self.mode }
    }
}

impl<T, E> Broadcaster<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a broadcaster that warns once a subscriber has `capacity` items queued.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use pbill_event_bus::{Broadcaster, FailureMode};
    ///
    /// # fn main() -> Result<(), pbill_event_bus::EventBusError> {
    /// let updates = Broadcaster::<u32, String>::new(16, FailureMode::Terminal)?;
    /// assert_eq!(updates.subscriber_count(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(capacity: usize, mode: FailureMode) -> Result<Self, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        Ok(Self {
            channel: Arc::new(Mutex::new(Channel::Open { subscribers: Vec::new(), generation: 0 })),
            capacity,
            mode,
        })
    }

    /// Returns a new handle on the current broadcast.
    ///
    /// Repeated calls return independent receivers of the same channel.
    ///
    /// # Examples
    /// ```rust
    /// use pbill_event_bus::{Broadcaster, FailureMode};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), pbill_event_bus::EventBusError> {
    /// let updates = Broadcaster::<u32, String>::new(16, FailureMode::Terminal)?;
    /// let mut first = updates.subscribe();
    /// let mut second = updates.subscribe();
    /// updates.publish(7);
    /// assert_eq!(first.recv().await, Some(Ok(7)));
    /// assert_eq!(second.recv().await, Some(Ok(7)));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T, E> {
        match &mut *self.channel.lock() {
            Channel::Open { subscribers, .. } => {
                let (sender, receiver) = mpsc::unbounded_channel();
                let backlog = Arc::new(AtomicUsize::new(0));
                subscribers.push(Subscriber { sender, backlog: Arc::clone(&backlog) });
                Subscription::live(receiver, backlog)
            },
            Channel::Failed(error) => Subscription::failed(error.clone()),
        }
    }

    /// Delivers `item` to every current subscriber.
    ///
    /// Returns the number of subscribers reached. Publishing without subscribers,
    /// or after a terminal failure, drops the item.
    pub fn publish(&self, item: T) -> usize {
        let mut channel = self.channel.lock();
        let Channel::Open { subscribers, generation } = &mut *channel else {
            warn!(
                item = std::any::type_name::<T>(),
                "Item dropped: broadcast already ended with a failure"
            );
            return 0;
        };

        let capacity = self.capacity;
        subscribers.retain(|subscriber| {
            if subscriber.sender.send(Signal::Item(item.clone())).is_err() {
                return false;
            }
            let backlog = subscriber.backlog.fetch_add(1, Ordering::Relaxed) + 1;
            if backlog == capacity {
                warn!(
                    item = std::any::type_name::<T>(),
                    backlog,
                    "Subscriber is falling behind; items stay queued until it catches up"
                );
            }
            true
        });

        let count = subscribers.len();
        if count == 0 {
            trace!(
                item = std::any::type_name::<T>(),
                generation = *generation,
                "Item dropped: no active subscribers"
            );
        } else {
            trace!(
                item = std::any::type_name::<T>(),
                generation = *generation,
                count,
                "Item dispatched"
            );
        }
        count
    }

    /// Delivers `error` to every current subscriber and ends their subscriptions.
    ///
    /// Returns the number of subscribers reached. What later subscribers see
    /// depends on the [`FailureMode`].
    pub fn fail(&self, error: E) -> usize {
        let mut channel = self.channel.lock();
        let (reached, generation) = match &mut *channel {
            Channel::Open { subscribers, generation } => {
                let reached = std::mem::take(subscribers)
                    .into_iter()
                    .filter(|s| s.sender.send(Signal::Failed(error.clone())).is_ok())
                    .count();
                (reached, *generation)
            },
            Channel::Failed(_) => {
                warn!(
                    error = std::any::type_name::<E>(),
                    "Failure dropped: broadcast already ended with a failure"
                );
                return 0;
            },
        };

        match self.mode {
            FailureMode::Terminal => {
                debug!(generation, reached, "Broadcast ended with a terminal failure");
                *channel = Channel::Failed(error);
            },
            FailureMode::Restart => {
                let next = generation.wrapping_add(1);
                debug!(generation, next, reached, "Broadcast failed; opened a fresh channel");
                *channel = Channel::Open { subscribers: Vec::new(), generation: next };
            },
        }
        drop(channel);
        reached
    }

    /// Number of live subscriptions on the current channel.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match &*self.channel.lock() {
            Channel::Open { subscribers, .. } => {
                subscribers.iter().filter(|s| !s.sender.is_closed()).count()
            },
            Channel::Failed(_) => 0,
        }
    }

    /// `true` once a terminal failure has been published.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(&*self.channel.lock(), Channel::Failed(_))
    }

    #[must_use]
    pub const fn mode(&self) -> FailureMode {
        self.mode
    }
}

fn validate_capacity(capacity: usize) -> Result<usize, EventBusError> {
    if capacity < MIN_CAPACITY {
        return Err(EventBusError::InvalidCapacity {
            message: format!("capacity must be >= {MIN_CAPACITY}").into(),
            context: None,
        });
    }
    Ok(capacity)
}
