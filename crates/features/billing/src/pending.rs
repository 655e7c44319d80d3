use futures_util::stream::{self, Once};
use pbill_kernel::domain::OperationError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::debug;

/// Creates a linked completer/handle pair.
///
/// `abandoned` is what the handle resolves to if the completer is dropped
/// without being used.
pub(crate) fn pending<T, E>(
    operation: &'static str,
    abandoned: E,
) -> (Completer<T, E>, Pending<T, E>) {
    let (sender, receiver) = oneshot::channel();
    let handle = Pending { inner: Inner::Waiting { receiver, abandoned: Some(abandoned) } };
    (Completer { sender, operation }, handle)
}

#[derive(Debug)]
enum Inner<T, E> {
    Ready(Option<Result<T, E>>),
    Waiting { receiver: oneshot::Receiver<Result<T, E>>, abandoned: Option<E> },
}

/// The result of a single asynchronous SDK call.
///
/// Resolves exactly once, to a value or an error. Dropping it does not cancel
/// the SDK call; the late result is discarded. Polling again after it resolved
/// never yields another value.
#[must_use = "a pending result does nothing unless awaited or turned into a stream"]
#[derive(Debug)]
pub struct Pending<T, E = OperationError> {
    inner: Inner<T, E>,
}

// Fields are never pinned structurally.
impl<T, E> Unpin for Pending<T, E> {}

impl<T, E> Pending<T, E> {
    /// A handle that is already resolved.
    pub const fn ready(result: Result<T, E>) -> Self {
        Self { inner: Inner::Ready(Some(result)) }
    }

    /// A single-item stream yielding this result.
    pub fn into_stream(self) -> Once<Self> {
        stream::once(self)
    }
}

impl<T, E> Future for Pending<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = &mut self.get_mut().inner;
        let output = match inner {
            Inner::Ready(result) => return result.take().map_or(Poll::Pending, Poll::Ready),
            Inner::Waiting { receiver, abandoned } => match Pin::new(receiver).poll(cx) {
                Poll::Ready(Ok(result)) => result,
                Poll::Ready(Err(_)) => match abandoned.take() {
                    Some(error) => Err(error),
                    None => return Poll::Pending,
                },
                Poll::Pending => return Poll::Pending,
            },
        };
        *inner = Inner::Ready(None);
        Poll::Ready(output)
    }
}

/// The producing half of a [`Pending`]; consumed by its single use.
#[derive(Debug)]
pub(crate) struct Completer<T, E = OperationError> {
    sender: oneshot::Sender<Result<T, E>>,
    operation: &'static str,
}

impl<T, E> Completer<T, E> {
    pub(crate) fn complete(self, result: Result<T, E>) {
        if self.sender.send(result).is_err() {
            debug!(operation = self.operation, "Result dropped: caller is no longer waiting");
        }
    }

    /// `true` while the matching handle is still alive.
    pub(crate) fn is_awaited(&self) -> bool {
        !self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_completed_value_is_delivered() {
        let (completer, handle) = pending::<u8, &str>("test", "abandoned");
        completer.complete(Ok(7));
        assert_eq!(handle.await, Ok(7));
    }

    #[tokio::test]
    async fn test_dropped_completer_resolves_to_abandoned() {
        let (completer, handle) = pending::<u8, &str>("test", "abandoned");
        drop(completer);
        assert_eq!(handle.await, Err("abandoned"));
    }

    #[tokio::test]
    async fn test_stream_yields_exactly_one_item() {
        let items: Vec<_> = Pending::<u8, &str>::ready(Err("nope")).into_stream().collect().await;
        assert_eq!(items, vec![Err("nope")]);
    }

    #[tokio::test]
    async fn test_polling_after_completion_stays_pending() {
        let (completer, mut handle) = pending::<u8, &str>("test", "abandoned");
        completer.complete(Ok(1));

        assert_eq!((&mut handle).await, Ok(1));
        let again = std::future::poll_fn(|cx| Poll::Ready(Pin::new(&mut handle).poll(cx))).await;
        assert!(again.is_pending());
    }

    #[tokio::test]
    async fn test_polling_after_abandonment_stays_pending() {
        let (completer, mut handle) = pending::<u8, &str>("test", "abandoned");
        drop(completer);

        assert_eq!((&mut handle).await, Err("abandoned"));
        let again = std::future::poll_fn(|cx| Poll::Ready(Pin::new(&mut handle).poll(cx))).await;
        assert!(again.is_pending());
    }

    #[test]
    fn test_completer_sees_dropped_handle() {
        let (completer, handle) = pending::<u8, &str>("test", "abandoned");
        assert!(completer.is_awaited());
        drop(handle);
        assert!(!completer.is_awaited());
        completer.complete(Ok(1));
    }
}
