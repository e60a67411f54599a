// ── Entity state controller ──
//
// One controller per entity type. Operations publish `Loading` right away,
// run the service call on the tokio runtime, then apply the outcome to the
// item list and the loading state.
//
// Every operation takes a ticket. Only the newest ticket may settle `loading`
// to `Idle`. A list result is dropped only when a newer refresh has begun;
// records created, updated, or deleted while it was in flight are replayed
// on top of it. A stale create/update/delete still lands in `items` because
// the server has already accepted it.
//
// A stale failure is never dropped. It shows at once when nothing newer is
// pending, otherwise it waits for the newest operation and shows if that one
// succeeds. Nothing is applied once the controller is disposed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vreg_api::{Entity, EntityService, KeyOf, ListQuery};

use crate::error::CoreError;
use crate::loading::{LoadingState, Operation};
use crate::store::{EntityList, EntitySnapshot};

/// Reactive `{ items, loading }` state for one backend collection.
///
/// Cheaply cloneable; clones share the same state.
pub struct EntityController<S: EntityService> {
    inner: Arc<ControllerInner<S>>,
}

struct ControllerInner<S: EntityService> {
    service: S,
    items: EntityList<S::Entity>,
    loading: watch::Sender<LoadingState>,
    /// Last issued operation ticket.
    latest: AtomicU64,
    /// Failure of a superseded operation, shown once the newest one succeeds.
    deferred: Mutex<Option<CoreError>>,
    disposed: CancellationToken,
}

impl<S: EntityService> Clone for EntityController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EntityService> EntityController<S> {
    pub fn new(service: S) -> Self {
        let (loading, _) = watch::channel(LoadingState::Idle);
        Self {
            inner: Arc::new(ControllerInner {
                service,
                items: EntityList::new(),
                loading,
                latest: AtomicU64::new(0),
                deferred: Mutex::new(None),
                disposed: CancellationToken::new(),
            }),
        }
    }

    pub fn service(&self) -> &S {
        &self.inner.service
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Reload the list; on success `items` is replaced wholesale, keeping
    /// any mutation that landed while the request was in flight.
    pub fn refresh(&self, query: ListQuery<S::Filter>) -> JoinHandle<()> {
        let Some(ticket) = self.begin(Operation::Refresh) else {
            return tokio::spawn(async {});
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.service.list(&query).await;
            if result.is_err() {
                inner.items.abandon_reload(ticket);
            }
            inner.settle(ticket, Operation::Refresh, result, |inner, items| {
                if !inner.items.finish_reload(ticket, items) {
                    debug!(ticket, "discarding {} list, a newer refresh began", S::Entity::PLURAL);
                }
            });
        })
    }

    /// Create a record; the server's copy is inserted at the front of `items`.
    pub fn create(&self, body: S::Create) -> JoinHandle<()> {
        let Some(ticket) = self.begin(Operation::Create) else {
            return tokio::spawn(async {});
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.service.create(&body).await;
            inner.settle(ticket, Operation::Create, result, |inner, created| {
                inner.items.prepend(created);
            });
        })
    }

    /// Update the record at `key`; the server's copy replaces it in place.
    pub fn update(&self, key: KeyOf<S>, body: S::Update) -> JoinHandle<()> {
        let Some(ticket) = self.begin(Operation::Update) else {
            return tokio::spawn(async {});
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.service.update(&key, &body).await;
            inner.settle(ticket, Operation::Update, result, |inner, updated| {
                if !inner.items.replace(updated) {
                    debug!(%key, "updated {} is not in the list", S::Entity::SINGULAR);
                }
            });
        })
    }

    pub fn delete(&self, key: KeyOf<S>) -> JoinHandle<()> {
        let Some(ticket) = self.begin(Operation::Delete) else {
            return tokio::spawn(async {});
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.service.delete(&key).await;
            inner.settle(ticket, Operation::Delete, result, |inner, ()| {
                inner.items.remove(&key);
            });
        })
    }

    // ── State access ─────────────────────────────────────────────────

    pub fn loading(&self) -> LoadingState {
        self.inner.loading.borrow().clone()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<LoadingState> {
        self.inner.loading.subscribe()
    }

    pub fn items(&self) -> EntitySnapshot<S::Entity> {
        self.inner.items.snapshot()
    }

    pub fn subscribe_items(&self) -> watch::Receiver<EntitySnapshot<S::Entity>> {
        self.inner.items.subscribe()
    }

    pub fn get(&self, key: &KeyOf<S>) -> Option<Arc<S::Entity>> {
        self.inner.items.get(key)
    }

    /// Clear a displayed error. Leaves `Idle` and `Loading` untouched.
    pub fn dismiss_error(&self) {
        self.inner.loading.send_if_modified(|state| {
            if matches!(state, LoadingState::Error(_)) {
                *state = LoadingState::Idle;
                true
            } else {
                false
            }
        });
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Detach the controller from its owner. In-flight requests run to
    /// completion but their results are ignored; new operations are no-ops.
    pub fn dispose(&self) {
        self.inner.disposed.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.is_cancelled()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Issue a ticket and publish the progress message.
    fn begin(&self, operation: Operation) -> Option<u64> {
        if self.is_disposed() {
            debug!(?operation, "controller disposed, ignoring operation");
            return None;
        }
        let mut ticket = 0;
        // The ticket is issued under the loading lock so that issue order and
        // publish order agree.
        self.inner.loading.send_modify(|state| {
            ticket = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
            if operation == Operation::Refresh {
                self.inner.items.begin_reload(ticket);
            }
            *state = LoadingState::Loading(operation.message::<S::Entity>());
        });
        Some(ticket)
    }
}

impl<S: EntityService> ControllerInner<S> {
    fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Apply a finished operation.
    ///
    /// `apply` runs on success (it decides for itself what a stale ticket
    /// means for `items`). `loading` settles only for the newest ticket; a
    /// stale failure is shown or deferred according to what is pending.
    fn settle<T>(
        &self,
        ticket: u64,
        operation: Operation,
        result: Result<T, vreg_api::Error>,
        apply: impl FnOnce(&Self, T),
    ) {
        if self.disposed.is_cancelled() {
            debug!(ticket, ?operation, "controller disposed, dropping result");
            return;
        }

        let failure = match result {
            Ok(value) => {
                apply(self, value);
                None
            }
            Err(err) => {
                let err = CoreError::from(err);
                debug!(ticket, ?operation, error = %err, "operation failed");
                Some(err)
            }
        };

        self.loading.send_if_modified(|state| {
            let mut deferred = self.deferred.lock().unwrap_or_else(PoisonError::into_inner);
            if self.is_current(ticket) {
                *state = match failure {
                    Some(err) => {
                        *deferred = None;
                        LoadingState::Error(err)
                    }
                    None => deferred.take().map_or(LoadingState::Idle, LoadingState::Error),
                };
                return true;
            }

            let Some(err) = failure else {
                debug!(ticket, ?operation, "stale completion, loading left as is");
                return false;
            };
            match state {
                LoadingState::Loading(_) => {
                    debug!(ticket, ?operation, "stale failure held until newer work settles");
                    *deferred = Some(err);
                    false
                }
                LoadingState::Idle => {
                    *state = LoadingState::Error(err);
                    true
                }
                LoadingState::Error(_) => false,
            }
        });
    }
}

impl<S: EntityService> std::fmt::Debug for EntityController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityController")
            .field("entity", &S::Entity::PLURAL)
            .field("items", &self.inner.items.len())
            .field("loading", &*self.inner.loading.borrow())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
