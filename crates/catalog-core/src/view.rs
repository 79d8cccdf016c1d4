// ── Management view state machine ──
//
// Headless counterpart of one entity's admin screen. Holds the loaded list
// for the selected page filter and the current dialog phase, and publishes
// every change as a `ViewSnapshot` on a `watch` channel.
//
// Loads are tagged with a generation. Only the newest load may write the
// list, so switching filters quickly never shows a superseded response.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use catalog_api::{CatalogEntity, EntityId, Resource};
use tokio::sync::watch;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::pages;
use crate::paging::{ListQuery, PageSlice, Searchable, paginate};
use crate::validate::Validate;

/// Dialog phase of a management view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
    Adding,
    Editing(EntityId),
    Deleting(EntityId),
    Failed { message: String },
}

impl Phase {
    /// A create, edit or delete dialog is open.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Adding | Self::Editing(_) | Self::Deleting(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("loading"),
            Self::Loaded => f.write_str("idle"),
            Self::Adding => f.write_str("adding"),
            Self::Editing(id) => write!(f, "editing {id}"),
            Self::Deleting(id) => write!(f, "deleting {id}"),
            Self::Failed { .. } => f.write_str("failed"),
        }
    }
}

/// Everything a renderer needs, published on every change.
#[derive(Debug, Clone)]
pub struct ViewSnapshot<E> {
    pub phase: Phase,
    /// Server-side page filter. `None` lists everything.
    pub page: Option<u32>,
    pub items: Arc<Vec<E>>,
    /// Most recent failure, cleared by the next success.
    pub error: Option<CoreError>,
    /// Generation of the load that produced `items`.
    pub generation: u64,
}

impl<E> ViewSnapshot<E> {
    pub fn find(&self, id: EntityId) -> Option<&E>
    where
        E: CatalogEntity,
    {
        self.items.iter().find(|e| e.id() == id)
    }

    /// Client-side search and pagination over the loaded list.
    pub fn visible(&self, query: &ListQuery) -> PageSlice<E>
    where
        E: Searchable + Clone,
    {
        paginate(&self.items, query)
    }
}

pub struct ManagementView<R: Resource> {
    catalog: Catalog,
    state: watch::Sender<ViewSnapshot<R::Entity>>,
    generation: AtomicU64,
}

impl<R: Resource> fmt::Debug for ManagementView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = self.state.borrow();
        f.debug_struct("ManagementView")
            .field("kind", &R::KIND)
            .field("phase", &snap.phase)
            .field("page", &snap.page)
            .field("items", &snap.items.len())
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ManagementView<R> {
    /// A view in `Loading` on the kind's default page. Call `load` to fetch.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_page(catalog, pages::default_page(R::KIND))
    }

    pub fn with_page(catalog: Catalog, page: Option<u32>) -> Self {
        let (state, _) = watch::channel(ViewSnapshot {
            phase: Phase::Loading,
            page,
            items: Arc::new(Vec::new()),
            error: None,
            generation: 0,
        });
        Self {
            catalog,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<R::Entity>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot<R::Entity> {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase.clone()
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Load the list for `page`, superseding any load still in flight.
    ///
    /// A superseded load returns `Ok` without touching the view.
    pub async fn load(&self, page: Option<u32>) -> Result<(), CoreError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.page = page;
            if !s.phase.is_busy() {
                s.phase = Phase::Loading;
            }
        });

        let result = self.catalog.list::<R>(page).await;

        // Checked under the channel lock so a newer load or a local
        // mutation cannot land between the check and the write.
        let mut applied = false;
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            applied = true;
            s.generation = generation;
            match &result {
                Ok(items) => {
                    s.items = Arc::clone(items);
                    s.error = None;
                    if !s.phase.is_busy() {
                        s.phase = Phase::Loaded;
                    }
                }
                Err(err) => {
                    s.items = Arc::new(Vec::new());
                    s.error = Some(err.clone());
                    if !s.phase.is_busy() {
                        s.phase = Phase::Failed {
                            message: err.to_string(),
                        };
                    }
                }
            }
            true
        });

        if !applied {
            debug!(kind = %R::KIND, generation, "discarding superseded load");
            return Ok(());
        }
        result.map(|_| ())
    }

    /// Switch the page filter and reload.
    pub async fn select_page(&self, page: u32) -> Result<(), CoreError> {
        self.load(Some(page)).await
    }

    /// Reload the current page filter.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let page = self.state.borrow().page;
        self.load(page).await
    }

    // ── Dialogs ──────────────────────────────────────────────────────

    pub fn open_add(&self) -> Result<(), CoreError> {
        self.transition("add", |s| {
            s.phase = Phase::Adding;
            Ok(())
        })
    }

    /// Open the edit dialog for a loaded entity.
    pub fn open_edit(&self, id: EntityId) -> Result<(), CoreError> {
        self.transition("edit", |s| {
            Self::require_loaded(s, id)?;
            s.phase = Phase::Editing(id);
            Ok(())
        })
    }

    /// Ask for confirmation before deleting a loaded entity.
    pub fn request_delete(&self, id: EntityId) -> Result<(), CoreError> {
        self.transition("delete", |s| {
            Self::require_loaded(s, id)?;
            s.phase = Phase::Deleting(id);
            Ok(())
        })
    }

    /// Close any open dialog.
    pub fn cancel(&self) {
        self.state.send_if_modified(|s| {
            if s.phase.is_busy() {
                s.phase = Phase::Loaded;
                true
            } else {
                false
            }
        });
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create from the add dialog. On success the entity joins the list and
    /// the dialog closes; on failure the dialog stays open.
    pub async fn submit_create(&self, payload: &R::Create) -> Result<R::Entity, CoreError>
    where
        R::Create: Validate,
    {
        self.expect_phase("create", |p| matches!(p, Phase::Adding))?;

        match self.catalog.create::<R>(payload).await {
            Ok(created) => {
                self.commit(|s| {
                    upsert(&mut s.items, created.clone());
                    s.error = None;
                    s.phase = Phase::Loaded;
                });
                Ok(created)
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Save the edit dialog. The updated entity replaces the old one.
    pub async fn submit_update(&self, payload: &R::Update) -> Result<R::Entity, CoreError>
    where
        R::Update: Validate,
    {
        let Phase::Editing(id) = self.phase() else {
            return Err(self.busy("update"));
        };

        match self.catalog.update::<R>(id, payload).await {
            Ok(updated) => {
                self.commit(|s| {
                    upsert(&mut s.items, updated.clone());
                    s.error = None;
                    s.phase = Phase::Loaded;
                });
                Ok(updated)
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Delete the entity awaiting confirmation.
    ///
    /// The dialog closes either way; on failure the item stays in the list.
    pub async fn confirm_delete(&self) -> Result<(), CoreError> {
        let Phase::Deleting(id) = self.phase() else {
            return Err(self.busy("confirm delete"));
        };

        let result = self.catalog.delete::<R>(id).await;
        match &result {
            Ok(()) => self.commit(|s| {
                Arc::make_mut(&mut s.items).retain(|e| e.id() != id);
                s.error = None;
                s.phase = Phase::Loaded;
            }),
            Err(err) => self.state.send_modify(|s| {
                s.error = Some(err.clone());
                s.phase = Phase::Loaded;
            }),
        }
        result
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Apply a successful mutation to the local list. Takes a new
    /// generation under the same lock, so loads started earlier are
    /// discarded when they finish.
    fn commit(&self, f: impl FnOnce(&mut ViewSnapshot<R::Entity>)) {
        self.state.send_modify(|s| {
            s.generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            f(s);
        });
    }

    /// Apply `f` unless a dialog is already open.
    fn transition(
        &self,
        action: &str,
        f: impl FnOnce(&mut ViewSnapshot<R::Entity>) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let mut outcome = Ok(());
        self.state.send_if_modified(|s| {
            if s.phase.is_busy() {
                outcome = Err(CoreError::Busy {
                    action: action.to_owned(),
                    phase: s.phase.to_string(),
                });
                return false;
            }
            outcome = f(s);
            outcome.is_ok()
        });
        outcome
    }

    fn require_loaded(s: &ViewSnapshot<R::Entity>, id: EntityId) -> Result<(), CoreError> {
        if s.find(id).is_some() {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                resource: R::KIND.singular().to_owned(),
                id: id.to_string(),
            })
        }
    }

    fn expect_phase(&self, action: &str, ok: impl Fn(&Phase) -> bool) -> Result<(), CoreError> {
        if ok(&self.state.borrow().phase) {
            Ok(())
        } else {
            Err(self.busy(action))
        }
    }

    fn busy(&self, action: &str) -> CoreError {
        CoreError::Busy {
            action: action.to_owned(),
            phase: self.state.borrow().phase.to_string(),
        }
    }

    /// Remember a failed mutation without leaving the dialog.
    fn record(&self, err: CoreError) -> CoreError {
        self.state.send_modify(|s| s.error = Some(err.clone()));
        err
    }
}

/// Replace the entity with the same id, or append it.
fn upsert<E: CatalogEntity>(items: &mut Arc<Vec<E>>, entity: E) {
    let items = Arc::make_mut(items);
    match items.iter_mut().find(|e| e.id() == entity.id()) {
        Some(existing) => *existing = entity,
        None => items.push(entity),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use catalog_api::Brand;

    fn brand(id: u64) -> Brand {
        Brand {
            id: EntityId(id),
            img: format!("/uploads/{id}.png"),
            order: None,
        }
    }

    #[test]
    fn upsert_appends_new_and_replaces_existing() {
        let mut items = Arc::new(vec![brand(1), brand(2)]);

        upsert(&mut items, brand(3));
        let mut changed = brand(2);
        changed.order = Some(5);
        upsert(&mut items, changed);

        let ids: Vec<u64> = items.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(items[1].order, Some(5));
    }

    #[test]
    fn busy_phases() {
        assert!(Phase::Adding.is_busy());
        assert!(Phase::Deleting(EntityId(1)).is_busy());
        assert!(!Phase::Loaded.is_busy());
        assert!(!Phase::Failed { message: "x".into() }.is_busy());
    }
}
