// ── Keyed query cache ──
//
// Stale-while-revalidate cache for server reads. Values are type-erased so
// one cache holds lists, single entities and the current user. Concurrent
// reads of a key share one in-flight future; invalidation bumps a per-kind
// epoch so fetches started before it never write back.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use catalog_api::{EntityId, ResourceKind};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::error::CoreError;

type AnyValue = Arc<dyn Any + Send + Sync>;
type InFlight = Shared<BoxFuture<'static, Result<AnyValue, CoreError>>>;

/// Identifies one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `list(page)`. `None` is the unfiltered list.
    List {
        kind: ResourceKind,
        page: Option<u32>,
    },
    /// `list_by_page(page)`.
    Page { kind: ResourceKind, page: u32 },
    Item { kind: ResourceKind, id: EntityId },
    CurrentUser,
    /// `GET /api/users`.
    Users,
    /// `GET /api/users/{id}`.
    User { id: String },
}

impl QueryKey {
    /// The invalidation scope. `None` is the session scope.
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::List { kind, .. } | Self::Page { kind, .. } | Self::Item { kind, .. } => {
                Some(*kind)
            }
            Self::CurrentUser | Self::Users | Self::User { .. } => None,
        }
    }
}

struct CacheEntry {
    value: AnyValue,
    fetched_at: Instant,
}

struct CacheInner {
    entries: DashMap<QueryKey, CacheEntry>,
    in_flight: DashMap<QueryKey, InFlight>,
    epochs: DashMap<Option<ResourceKind>, u64>,
    stale_after: Duration,
}

/// Cheaply cloneable handle to a shared cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.len())
            .field("in_flight", &self.inner.in_flight.len())
            .field("stale_after", &self.inner.stale_after)
            .finish()
    }
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: DashMap::new(),
                in_flight: DashMap::new(),
                epochs: DashMap::new(),
                stale_after,
            }),
        }
    }

    /// Read `key`, fetching on a miss.
    ///
    /// A fresh hit returns the cached value. A stale hit returns it too and
    /// starts a background refetch. A miss joins any in-flight fetch for the
    /// key or starts one.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        if let Some((value, fetched_at)) = self.cached(&key) {
            if let Ok(typed) = value.downcast::<T>() {
                if fetched_at.elapsed() >= self.inner.stale_after {
                    debug!(?key, "stale hit, revalidating");
                    let refetch = self.start(key.clone(), fetch);
                    tokio::spawn(async move {
                        if let Err(e) = refetch.await {
                            warn!(?key, error = %e, "revalidation failed, keeping stale value");
                        }
                    });
                } else {
                    trace!(?key, "cache hit");
                }
                return Ok(typed);
            }
        }

        let value = self.start(key, fetch).await?;
        value
            .downcast::<T>()
            .map_err(|_| CoreError::Internal("cached value has an unexpected type".into()))
    }

    /// The cached value for `key`, ignoring staleness.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.cached(key)
            .and_then(|(value, _)| value.downcast::<T>().ok())
    }

    /// Store a value directly, as if it had just been fetched.
    pub fn set<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        self.inner.entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop every entry of `kind` and detach its in-flight fetches.
    pub fn invalidate(&self, kind: ResourceKind) {
        self.invalidate_scope(Some(kind));
    }

    /// Drop the cached current user and staff accounts.
    pub fn invalidate_session(&self) {
        self.invalidate_scope(None);
    }

    /// Drop everything.
    pub fn clear(&self) {
        let scopes: Vec<_> = self
            .inner
            .entries
            .iter()
            .map(|e| e.key().kind())
            .chain(self.inner.in_flight.iter().map(|e| e.key().kind()))
            .collect();
        for scope in scopes {
            self.bump(scope);
        }
        self.inner.entries.clear();
        self.inner.in_flight.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn cached(&self, key: &QueryKey) -> Option<(AnyValue, Instant)> {
        self.inner
            .entries
            .get(key)
            .map(|e| (Arc::clone(&e.value), e.fetched_at))
    }

    fn epoch(&self, scope: Option<ResourceKind>) -> u64 {
        self.inner.epochs.get(&scope).map_or(0, |e| *e)
    }

    fn bump(&self, scope: Option<ResourceKind>) {
        *self.inner.epochs.entry(scope).or_insert(0) += 1;
    }

    fn invalidate_scope(&self, scope: Option<ResourceKind>) {
        self.bump(scope);
        self.inner.entries.retain(|k, _| k.kind() != scope);
        self.inner.in_flight.retain(|k, _| k.kind() != scope);
        debug!(?scope, "invalidated");
    }

    /// Join the in-flight fetch for `key` or register a new one.
    fn start<T, F, Fut>(&self, key: QueryKey, fetch: F) -> InFlight
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        // Read before locking the in-flight slot; `complete` takes the locks
        // in the opposite order.
        let epoch = self.epoch(key.kind());
        match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(existing) => {
                trace!(?key, "joining in-flight fetch");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                let inner = Arc::clone(&self.inner);
                let future = async move {
                    let result = fetch().await.map(|v| Arc::new(v) as AnyValue);
                    inner.complete(key, epoch, &result);
                    result
                }
                .boxed()
                .shared();
                slot.insert(future.clone());
                future
            }
        }
    }
}

impl CacheInner {
    /// Publish a finished fetch unless its scope was invalidated meanwhile.
    fn complete(&self, key: QueryKey, epoch: u64, result: &Result<AnyValue, CoreError>) {
        let scope = key.kind();
        // Held across the write so an invalidation cannot slip in between.
        let current = self.epochs.get(&scope);
        if current.as_deref().copied().unwrap_or(0) != epoch {
            debug!(?key, "discarding result from before invalidation");
            return;
        }
        if let Ok(value) = result {
            self.entries.insert(
                key.clone(),
                CacheEntry {
                    value: Arc::clone(value),
                    fetched_at: Instant::now(),
                },
            );
        }
        self.in_flight.remove(&key);
        drop(current);
    }
}
