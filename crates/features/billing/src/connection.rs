use crate::pending::{Completer, Pending, pending};
use crate::sdk::{BillingClient, ClientStateListener};
use parking_lot::Mutex;
use pbill_event_bus::{StateCell, StateStream};
use pbill_kernel::domain::{
    BillingResult, ConnectionFailure, ConnectionResult, ConnectionState, ErrorKind,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

type Attempt = Completer<ConnectionResult, ConnectionFailure>;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    attempt: Option<Attempt>,
}

#[derive(Debug)]
struct Shared {
    state: StateCell<ConnectionState>,
    slot: Mutex<Slot>,
}

/// Drives the client's connection lifecycle and exposes it as observable state.
///
/// Every attempt gets a generation number. Callbacks that belong to an older
/// attempt, or that arrive after their attempt already resolved, change nothing.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    shared: Arc<Shared>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: StateCell::new(ConnectionState::Disconnected),
                slot: Mutex::new(Slot::default()),
            }),
        }
    }

    /// Starts a connection attempt on `client`.
    ///
    /// Resolves with the setup result, or fails if setup reports a non-ok code
    /// or the service disconnects first. While another attempt is still awaited
    /// this resolves to [`ConnectionFailure::InProgress`] without touching the SDK.
    pub fn connect<C: BillingClient>(
        &self,
        client: &C,
    ) -> Pending<ConnectionResult, ConnectionFailure> {
        let (completer, handle) = pending("connection", ConnectionFailure::Disconnected);

        let generation = {
            let mut slot = self.shared.slot.lock();
            if slot.attempt.as_ref().is_some_and(Completer::is_awaited) {
                warn!(generation = slot.generation, "Connection attempt already in progress");
                return Pending::ready(Err(ConnectionFailure::InProgress));
            }
            slot.generation = slot.generation.wrapping_add(1);
            slot.attempt = Some(completer);
            self.shared.state.set(ConnectionState::Connecting);
            slot.generation
        };

        info!(generation, "Starting billing connection");
        let listener = AttemptListener { shared: Arc::clone(&self.shared), generation };
        client.start_connection(Arc::new(listener));
        handle
    }

    /// Ends the SDK connection. A still-pending attempt resolves to
    /// [`ConnectionFailure::Disconnected`].
    pub fn disconnect<C: BillingClient>(&self, client: &C) {
        let attempt = {
            let mut slot = self.shared.slot.lock();
            slot.generation = slot.generation.wrapping_add(1);
            self.shared.state.set(ConnectionState::Disconnected);
            slot.attempt.take()
        };

        info!("Ending billing connection");
        client.end_connection();

        if let Some(attempt) = attempt {
            attempt.complete(Err(ConnectionFailure::Disconnected));
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.state.get()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// The current state first, then every change.
    #[must_use]
    pub fn observe(&self) -> StateStream<ConnectionState> {
        self.shared.state.subscribe()
    }
}

#[derive(Debug)]
struct AttemptListener {
    shared: Arc<Shared>,
    generation: u64,
}

impl AttemptListener {
    /// Takes the attempt if this listener still owns the current generation.
    fn claim(&self, slot: &mut Slot) -> Option<Option<Attempt>> {
        if slot.generation != self.generation {
            debug!(
                generation = self.generation,
                current = slot.generation,
                "Ignoring callback from a superseded connection attempt"
            );
            return None;
        }
        Some(slot.attempt.take())
    }
}

impl ClientStateListener for AttemptListener {
    fn on_billing_setup_finished(&self, result: BillingResult) {
        let kind = ErrorKind::from(result.code);
        let attempt = {
            let mut slot = self.shared.slot.lock();
            let Some(Some(attempt)) = self.claim(&mut slot) else {
                debug!(generation = self.generation, %kind, "Ignoring repeated setup callback");
                return;
            };
            let state = if kind.is_ok() {
                ConnectionState::Connected
            } else {
                ConnectionState::Failed(kind)
            };
            self.shared.state.set(state);
            attempt
        };

        if kind.is_ok() {
            info!(generation = self.generation, "Billing client connected");
            attempt.complete(Ok(ConnectionResult { kind }));
        } else {
            warn!(
                generation = self.generation,
                code = result.code.value(),
                %kind,
                "Billing setup failed"
            );
            attempt.complete(Err(ConnectionFailure::from_result(&result)));
        }
    }

    fn on_billing_service_disconnected(&self) {
        let attempt = {
            let mut slot = self.shared.slot.lock();
            let Some(attempt) = self.claim(&mut slot) else {
                return;
            };
            self.shared.state.set(ConnectionState::Dropped);
            attempt
        };

        match attempt {
            Some(attempt) => {
                warn!(generation = self.generation, "Billing service disconnected before setup");
                attempt.complete(Err(ConnectionFailure::Disconnected));
            },
            None => warn!(generation = self.generation, "Billing service disconnected"),
        }
    }
}
