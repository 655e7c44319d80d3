//! # Event Bus
//!
//! Hot multicast channels and latest-value cells for bridging callback-driven
//! sources into async consumers.
//!
//! ## Overview
//!
//! * [`Broadcaster`]: lossless fan-out of a single producer to any number of
//!   subscribers. No replay; at most one failure per subscriber, after which
//!   its stream ends. [`FailureMode`] decides whether a failure is final.
//! * [`StateCell`]: the latest value of some state, observable as a stream.
//!
//! Producers never block: publishing is a synchronous, non-waiting call that is
//! safe from any thread, which makes it usable directly inside foreign callbacks.
//!
//! # Example
//!
//! ```rust
//! use pbill_event_bus::{Broadcaster, EventBusError, FailureMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EventBusError> {
//!     let updates = Broadcaster::<u64, String>::new(8, FailureMode::Terminal)?;
//!
//!     let mut rx = updates.subscribe();
//!     updates.publish(42);
//!     updates.fail("listener crashed".to_owned());
//!
//!     assert_eq!(rx.recv().await, Some(Ok(42)));
//!     assert_eq!(rx.recv().await, Some(Err("listener crashed".to_owned())));
//!     assert_eq!(rx.recv().await, None);
//!     Ok(())
//! }
//! ```

mod broadcaster;
mod error;
mod state;
mod subscription;

pub use broadcaster::{Broadcaster, DEFAULT_CAPACITY, FailureMode};
pub use error::{EventBusError, EventBusErrorExt};
pub use state::{StateCell, StateStream};
pub use subscription::Subscription;
