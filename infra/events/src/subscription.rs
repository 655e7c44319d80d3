use crate::broadcaster::Signal;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll, ready};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::StreamExt as _;

#[derive(Debug)]
enum State<T, E> {
    Live { receiver: mpsc::UnboundedReceiver<Signal<T, E>>, backlog: Arc<AtomicUsize> },
    Failed(E),
    Done,
}

/// One subscriber's view of a [`crate::Broadcaster`].
///
/// Yields `Ok(item)` for every item published while it is alive and at most
/// one `Err(error)`, after which the stream ends. Items are never skipped.
#[derive(Debug)]
pub struct Subscription<T, E> {
    state: State<T, E>,
}

impl<T, E> Subscription<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) const fn live(
        receiver: mpsc::UnboundedReceiver<Signal<T, E>>,
        backlog: Arc<AtomicUsize>,
    ) -> Self {
        Self { state: State::Live { receiver, backlog } }
    }

    pub(crate) const fn failed(error: E) -> Self {
        Self { state: State::Failed(error) }
    }

    /// `true` once the stream has yielded its last value.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<T, E> Subscription<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + Unpin + 'static,
{
    /// Receive the next value, returning `None` once the subscription has ended.
    pub async fn recv(&mut self) -> Option<Result<T, E>> {
        self.next().await
    }
}

impl<T, E> Stream for Subscription<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + Unpin + 'static,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let (receiver, backlog) = match &mut this.state {
            State::Live { receiver, backlog } => (receiver, backlog),
            State::Failed(_) => {
                return match std::mem::replace(&mut this.state, State::Done) {
                    State::Failed(error) => Poll::Ready(Some(Err(error))),
                    _ => Poll::Ready(None),
                };
            },
            State::Done => return Poll::Ready(None),
        };

        match ready!(receiver.poll_recv(cx)) {
            Some(Signal::Item(item)) => {
                backlog.fetch_sub(1, Ordering::Relaxed);
                Poll::Ready(Some(Ok(item)))
            },
            Some(Signal::Failed(error)) => {
                this.state = State::Done;
                Poll::Ready(Some(Err(error)))
            },
            None => {
                this.state = State::Done;
                Poll::Ready(None)
            },
        }
    }
}
