// ── Ordered reactive entity list ──
//
// Keeps a controller's records in display order, unique by natural key, and
// pushes every change to subscribers through a `watch` channel.
//
// A reload opens a window. Records created, updated, or deleted while the
// window is open are journaled and replayed onto the server's list when it
// lands, so a mutation confirmed before the list arrives is not lost. Only
// the newest reload may land.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tokio::sync::watch;
use vreg_api::Entity;

type Entries<E> = IndexMap<<E as Entity>::Key, Arc<E>>;

/// Immutable view of an [`EntityList`] at one point in time.
///
/// Cheap to clone; iteration follows list order.
pub struct EntitySnapshot<E: Entity> {
    entries: Arc<Entries<E>>,
}

impl<E: Entity> EntitySnapshot<E> {
    fn empty() -> Self {
        Self {
            entries: Arc::new(IndexMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &E::Key) -> Option<&Arc<E>> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<E>> + '_ {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &E::Key> + '_ {
        self.entries.keys()
    }

    /// Owned copies of every record, in order.
    pub fn to_vec(&self) -> Vec<E> {
        self.entries.values().map(|e| E::clone(e)).collect()
    }
}

impl<E: Entity> Clone for EntitySnapshot<E> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<E: Entity> fmt::Debug for EntitySnapshot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

// ── Changes ─────────────────────────────────────────────────────────

enum Change<E: Entity> {
    Prepended(E),
    Replaced(E),
    Removed(E::Key),
}

impl<E: Entity> Change<E> {
    /// Apply to `entries` and return the record it displaced. A replace or
    /// remove of a missing key changes nothing and leaves `entries` shared.
    fn apply(&self, entries: &mut Arc<Entries<E>>) -> Option<Arc<E>> {
        match self {
            Self::Prepended(item) => {
                let key = item.key();
                let map = Arc::make_mut(entries);
                let previous = map.shift_remove(&key);
                map.shift_insert(0, key, Arc::new(item.clone()));
                previous
            }
            Self::Replaced(item) => {
                let key = item.key();
                if !entries.contains_key(&key) {
                    return None;
                }
                Arc::make_mut(entries).insert(key, Arc::new(item.clone()))
            }
            Self::Removed(key) => {
                if !entries.contains_key(key) {
                    return None;
                }
                Arc::make_mut(entries).shift_remove(key)
            }
        }
    }
}

/// The reload currently outstanding and the changes applied since it began.
struct ReloadWindow<E: Entity> {
    ticket: Option<u64>,
    journal: Vec<Change<E>>,
}

// ── List ────────────────────────────────────────────────────────────

/// Ordered sequence of records, unique by [`Entity::key`].
///
/// Every mutation publishes a fresh [`EntitySnapshot`]; mutations that change
/// nothing do not wake subscribers.
pub struct EntityList<E: Entity> {
    snapshot: watch::Sender<EntitySnapshot<E>>,
    window: Mutex<ReloadWindow<E>>,
}

impl<E: Entity> Default for EntityList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityList<E> {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(EntitySnapshot::empty());
        Self {
            snapshot,
            window: Mutex::new(ReloadWindow {
                ticket: None,
                journal: Vec::new(),
            }),
        }
    }

    // ── Reloads ──────────────────────────────────────────────────────

    /// Open a reload window for `ticket`, superseding any earlier reload.
    pub fn begin_reload(&self, ticket: u64) {
        let mut window = self.lock_window();
        window.ticket = Some(ticket);
        window.journal.clear();
    }

    /// Replace the whole list with the result of reload `ticket`, then replay
    /// the changes made since it began.
    ///
    /// Returns `false` (and changes nothing) when a newer reload has begun
    /// since. A key repeated in `items` keeps its first position and its last
    /// value.
    pub fn finish_reload(&self, ticket: u64, items: Vec<E>) -> bool {
        let mut window = self.lock_window();
        if window.ticket != Some(ticket) {
            return false;
        }

        let mut entries = IndexMap::with_capacity(items.len());
        for item in items {
            entries.insert(item.key(), Arc::new(item));
        }
        let mut entries = Arc::new(entries);
        for change in window.journal.drain(..) {
            change.apply(&mut entries);
        }
        window.ticket = None;

        self.snapshot.send_replace(EntitySnapshot { entries });
        true
    }

    /// Close the window of a failed reload. The list keeps its contents.
    pub fn abandon_reload(&self, ticket: u64) {
        let mut window = self.lock_window();
        if window.ticket == Some(ticket) {
            window.ticket = None;
            window.journal.clear();
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Insert at the front. An existing record with the same key is moved.
    pub fn prepend(&self, item: E) {
        self.mutate(Change::Prepended(item));
    }

    /// Replace the record with the same key in place. Returns `false` (and
    /// leaves the list alone) when no such record exists.
    pub fn replace(&self, item: E) -> bool {
        self.mutate(Change::Replaced(item)).is_some()
    }

    /// Remove the record with `key`, preserving the order of the rest.
    pub fn remove(&self, key: &E::Key) -> Option<Arc<E>> {
        self.mutate(Change::Removed(key.clone()))
    }

    fn mutate(&self, change: Change<E>) -> Option<Arc<E>> {
        let mut window = self.lock_window();
        let mut displaced = None;
        self.snapshot.send_if_modified(|snap| {
            displaced = change.apply(&mut snap.entries);
            displaced.is_some() || matches!(change, Change::Prepended(_))
        });
        if window.ticket.is_some() {
            window.journal.push(change);
        }
        displaced
    }

    fn lock_window(&self) -> MutexGuard<'_, ReloadWindow<E>> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn get(&self, key: &E::Key) -> Option<Arc<E>> {
        self.snapshot.borrow().get(key).cloned()
    }

    pub fn snapshot(&self) -> EntitySnapshot<E> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EntitySnapshot<E>> {
        self.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use vreg_api::Vehicle;

    use super::*;

    fn vehicle(number: &str, model: &str) -> Vehicle {
        Vehicle {
            number: number.into(),
            brand: "Toyota".into(),
            model: model.into(),
        }
    }

    fn numbers(list: &EntityList<Vehicle>) -> Vec<String> {
        list.snapshot().keys().cloned().collect()
    }

    fn loaded(items: Vec<Vehicle>) -> EntityList<Vehicle> {
        let list = EntityList::new();
        list.begin_reload(1);
        assert!(list.finish_reload(1, items));
        list
    }

    #[test]
    fn reload_keeps_server_order() {
        let list = loaded(vec![vehicle("B", "x"), vehicle("A", "y"), vehicle("C", "z")]);
        assert_eq!(numbers(&list), ["B", "A", "C"]);
    }

    #[test]
    fn reload_collapses_duplicate_keys() {
        let list = loaded(vec![vehicle("A", "old"), vehicle("B", "x"), vehicle("A", "new")]);

        assert_eq!(numbers(&list), ["A", "B"]);
        assert_eq!(list.get(&"A".into()).unwrap().model, "new");
    }

    #[test]
    fn superseded_reload_does_not_land() {
        let list = loaded(vec![vehicle("A", "x")]);
        list.begin_reload(2);
        list.begin_reload(3);

        assert!(!list.finish_reload(2, vec![vehicle("OLD", "x")]));
        assert_eq!(numbers(&list), ["A"]);
        assert!(list.finish_reload(3, vec![vehicle("NEW", "y")]));
        assert_eq!(numbers(&list), ["NEW"]);
    }

    #[test]
    fn changes_during_reload_are_replayed() {
        let list = loaded(vec![vehicle("A", "x"), vehicle("B", "y")]);
        list.begin_reload(2);
        list.prepend(vehicle("NEW", "n"));
        list.replace(vehicle("C", "changed"));
        list.remove(&"A".into());

        assert!(list.finish_reload(
            2,
            vec![vehicle("A", "x"), vehicle("B", "y"), vehicle("C", "z")]
        ));

        assert_eq!(numbers(&list), ["NEW", "B", "C"]);
        assert_eq!(list.get(&"C".into()).unwrap().model, "changed");
    }

    #[test]
    fn journal_is_dropped_once_reload_lands() {
        let list = loaded(vec![]);
        list.begin_reload(2);
        list.prepend(vehicle("A", "x"));
        assert!(list.finish_reload(2, vec![]));

        list.begin_reload(3);
        assert!(list.finish_reload(3, vec![vehicle("B", "y")]));
        assert_eq!(numbers(&list), ["B"]);
    }

    #[test]
    fn abandoned_reload_keeps_contents() {
        let list = loaded(vec![vehicle("A", "x")]);
        list.begin_reload(2);
        list.prepend(vehicle("B", "y"));
        list.abandon_reload(2);

        assert_eq!(numbers(&list), ["B", "A"]);
        assert!(!list.finish_reload(2, vec![]));
    }

    #[test]
    fn prepend_puts_newest_first() {
        let list = loaded(vec![vehicle("A", "x")]);
        list.prepend(vehicle("B", "y"));
        assert_eq!(numbers(&list), ["B", "A"]);
    }

    #[test]
    fn prepend_moves_existing_key() {
        let list = loaded(vec![vehicle("A", "x"), vehicle("B", "y")]);
        list.prepend(vehicle("B", "z"));

        assert_eq!(numbers(&list), ["B", "A"]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(&"B".into()).unwrap().model, "z");
    }

    #[test]
    fn replace_keeps_position() {
        let list = loaded(vec![vehicle("A", "x"), vehicle("B", "y"), vehicle("C", "z")]);

        assert!(list.replace(vehicle("B", "updated")));
        assert_eq!(numbers(&list), ["A", "B", "C"]);
        assert_eq!(list.get(&"B".into()).unwrap().model, "updated");
    }

    #[test]
    fn replace_unknown_key_is_a_no_op() {
        let list = loaded(vec![vehicle("A", "x")]);
        let mut rx = list.subscribe();
        rx.borrow_and_update();

        assert!(!list.replace(vehicle("Z", "y")));
        assert_eq!(numbers(&list), ["A"]);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let list = loaded(vec![vehicle("A", "x"), vehicle("B", "y"), vehicle("C", "z")]);

        let removed = list.remove(&"B".into()).unwrap();
        assert_eq!(removed.number, "B");
        assert_eq!(numbers(&list), ["A", "C"]);
        assert!(list.remove(&"B".into()).is_none());
    }

    #[test]
    fn snapshots_are_isolated_from_later_changes() {
        let list = loaded(vec![vehicle("A", "x")]);
        let before = list.snapshot();

        list.prepend(vehicle("B", "y"));
        list.remove(&"A".into());

        assert_eq!(before.to_vec(), vec![vehicle("A", "x")]);
        assert_eq!(numbers(&list), ["B"]);
    }

    #[test]
    fn subscribers_see_mutations() {
        let list = EntityList::new();
        let mut rx = list.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        list.prepend(vehicle("A", "x"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
