//! Main store implementation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use siplog_types::{LogRecord, Window};

use crate::error::{Error, Result};
use crate::events::{StoreEvent, SubscriberSet, SubscriptionId};
use crate::snapshot::SnapshotStore;
use crate::stats::Summary;

/// Options for a [`Store`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Quiet period after the last mutation before a snapshot is written.
    ///
    /// Rapid sequential edits inside this interval coalesce into a single
    /// save. Default: 400 ms.
    pub debounce: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
        }
    }
}

impl StoreOptions {
    /// Options with a specific debounce interval.
    pub fn with_debounce(debounce: Duration) -> Self {
        Self { debounce }
    }
}

/// Canonical owner of one domain's record collection.
///
/// The store is the single writer: every mutation goes through [`add`],
/// [`update`], [`remove`], or [`clear`], executes synchronously against
/// the in-memory collection, notifies subscribers, and schedules a
/// debounced snapshot write in the background. Reads hand out owned
/// snapshots and never touch persistence.
///
/// `Store` is a cheap cloneable handle over shared state; construct one
/// per domain at startup and pass clones to collaborators. Mutations are
/// serialized through one internal lock, so handles may be used from
/// multiple tasks.
///
/// Snapshot writes run on the ambient Tokio runtime: construct and mutate
/// the store inside one.
///
/// [`add`]: Store::add
/// [`update`]: Store::update
/// [`remove`]: Store::remove
/// [`clear`]: Store::clear
pub struct Store<R: LogRecord> {
    inner: Arc<Inner<R>>,
    debounce: Duration,
}

struct Inner<R: LogRecord> {
    state: Mutex<State<R>>,
    subscribers: Mutex<SubscriberSet<R>>,
    adapter: Box<dyn SnapshotStore<R>>,
}

struct State<R> {
    records: Vec<R>,
    /// Bumped on every mutation; a snapshot save carries the generation it
    /// observed, so a stale save can never mark newer mutations clean.
    generation: u64,
    saved_generation: u64,
    pending: Option<CancellationToken>,
}

impl<R: LogRecord> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            debounce: self.debounce,
        }
    }
}

impl<R: LogRecord> Store<R> {
    /// Open a store over the given snapshot adapter.
    ///
    /// Loads synchronously; a missing or corrupt snapshot yields an empty
    /// collection (the adapter's fail-open contract), never an error.
    pub fn open<S>(adapter: S, options: StoreOptions) -> Self
    where
        S: SnapshotStore<R> + 'static,
    {
        let records = adapter.load();
        debug!("loaded {} records from snapshot", records.len());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    records,
                    generation: 0,
                    saved_generation: 0,
                    pending: None,
                }),
                subscribers: Mutex::new(SubscriberSet::new()),
                adapter: Box::new(adapter),
            }),
            debounce: options.debounce,
        }
    }

    // === CRUD ===

    /// Add a record built from `fields` with a freshly generated id.
    ///
    /// Always succeeds: ids are store-generated, so no uniqueness conflict
    /// is possible. Returns the created record.
    pub fn add(&self, fields: R::Fields) -> R {
        let record = R::build(Uuid::new_v4(), fields);
        {
            let mut state = self.state();
            state.records.push(record.clone());
            state.generation += 1;
        }
        self.notify(&StoreEvent::Added(record.clone()));
        self.schedule_save();
        record
    }

    /// Replace the mutable fields of the record with the given id.
    ///
    /// The id is preserved. Returns [`Error::NotFound`] if no such record
    /// exists; the collection is untouched in that case.
    pub fn update(&self, id: Uuid, fields: R::Fields) -> Result<R> {
        let record = {
            let mut state = self.state();
            let Some(slot) = state.records.iter_mut().find(|record| record.id() == id) else {
                return Err(Error::NotFound(id));
            };
            let record = R::build(id, fields);
            *slot = record.clone();
            state.generation += 1;
            record
        };
        self.notify(&StoreEvent::Updated(record.clone()));
        self.schedule_save();
        Ok(record)
    }

    /// Remove the record with the given id, if present.
    ///
    /// Idempotent: returns whether a removal occurred, and an absent id is
    /// not an error.
    pub fn remove(&self, id: Uuid) -> bool {
        {
            let mut state = self.state();
            let before = state.records.len();
            state.records.retain(|record| record.id() != id);
            if state.records.len() == before {
                return false;
            }
            state.generation += 1;
        }
        self.notify(&StoreEvent::Removed(id));
        self.schedule_save();
        true
    }

    /// Empty the collection and remove the persisted snapshot.
    pub fn clear(&self) {
        let generation = {
            let mut state = self.state();
            if let Some(token) = state.pending.take() {
                token.cancel();
            }
            state.records.clear();
            state.generation += 1;
            state.generation
        };
        self.notify(&StoreEvent::Cleared);
        match self.inner.adapter.clear() {
            Ok(()) => {
                let mut state = self.state();
                if state.saved_generation < generation {
                    state.saved_generation = generation;
                }
            }
            Err(err) => {
                // The stale snapshot is still on disk; overwrite it instead.
                warn!("failed to remove persisted snapshot: {}", err);
                self.schedule_save();
            }
        }
    }

    // === Reads ===

    /// Owned snapshot of the full collection, in insertion order.
    ///
    /// Mutating the returned vector does not affect the store.
    pub fn all(&self) -> Vec<R> {
        self.state().records.clone()
    }

    /// The record with the given id, if present.
    pub fn get(&self, id: Uuid) -> Option<R> {
        self.state()
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Records whose timestamp falls inside `window`, newest first.
    pub fn query(&self, window: Window) -> Vec<R> {
        let mut matched: Vec<R> = self
            .state()
            .records
            .iter()
            .filter(|record| window.contains(record.recorded_at()))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.recorded_at().cmp(&a.recorded_at()));
        matched
    }

    /// Aggregates over the records inside `window`.
    pub fn summary(&self, window: Window) -> Summary {
        Summary::of(&self.query(window))
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.state().records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.state().records.is_empty()
    }

    /// Whether mutations are waiting to be persisted.
    pub fn is_dirty(&self) -> bool {
        let state = self.state();
        state.generation != state.saved_generation
    }

    // === Change notification ===

    /// Register a callback invoked synchronously after every mutation,
    /// before the persistence timer is (re)scheduled.
    ///
    /// Returns a token for [`unsubscribe`](Store::unsubscribe).
    pub fn subscribe(
        &self,
        callback: impl Fn(&StoreEvent<R>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers().subscribe(Arc::new(callback))
    }

    /// Detach a subscriber. Returns whether the token was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers().unsubscribe(id)
    }

    // === Persistence ===

    /// Cancel any pending debounce timer and persist the current
    /// collection now, if dirty.
    ///
    /// Failures are logged and leave the store dirty, like any other save.
    pub fn flush(&self) {
        let generation = {
            let mut state = self.state();
            if let Some(token) = state.pending.take() {
                token.cancel();
            }
            state.generation
        };
        self.persist(generation);
    }

    /// Restart the debounce timer. Called after every mutation, so a burst
    /// of edits collapses into one save of the final state.
    fn schedule_save(&self) {
        let token = CancellationToken::new();
        let generation = {
            let mut state = self.state();
            if let Some(previous) = state.pending.take() {
                previous.cancel();
            }
            state.pending = Some(token.clone());
            state.generation
        };

        let store = self.clone();
        let delay = self.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => store.persist(generation),
            }
        });
    }

    /// Write the snapshot observed at `generation`.
    ///
    /// A no-op if the store has moved past that generation (a newer timer
    /// owns the save) or has already persisted it.
    fn persist(&self, generation: u64) {
        let snapshot = {
            let mut state = self.state();
            if state.generation != generation || state.saved_generation >= generation {
                return;
            }
            state.pending = None;
            state.records.clone()
        };
        match self.inner.adapter.save(&snapshot) {
            Ok(()) => {
                let mut state = self.state();
                if state.saved_generation < generation {
                    state.saved_generation = generation;
                }
                debug!("saved snapshot of {} records", snapshot.len());
            }
            Err(err) => {
                warn!("snapshot save failed: {}; keeping changes in memory", err);
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, State<R>> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribers(&self) -> MutexGuard<'_, SubscriberSet<R>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Invoke current subscribers with the registry lock released, so a
    /// callback may itself subscribe or mutate.
    fn notify(&self, event: &StoreEvent<R>) {
        let callbacks = self.subscribers().callbacks();
        for callback in callbacks {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemorySnapshot;
    use crate::stats;

    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use siplog_types::{Drink, DrinkFields, DrinkKind};
    use time::OffsetDateTime;
    use time::macros::datetime;

    fn espresso_at(date: OffsetDateTime) -> DrinkFields {
        DrinkFields {
            date,
            ml: 250,
            price: 300.0,
            place: "Home".to_string(),
            kind: DrinkKind::Espresso,
        }
    }

    fn open_memory() -> (Arc<MemorySnapshot>, Store<Drink>) {
        let snapshot = Arc::new(MemorySnapshot::new());
        let store = Store::open(Arc::clone(&snapshot), StoreOptions::default());
        (snapshot, store)
    }

    #[tokio::test]
    async fn add_generates_unique_ids() {
        let (_, store) = open_memory();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let drink = store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));
            assert!(seen.insert(drink.id), "duplicate id {}", drink.id);
        }
        assert_eq!(store.len(), 100);
    }

    #[tokio::test]
    async fn update_preserves_id_and_replaces_fields() {
        let (_, store) = open_memory();
        let drink = store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));

        let updated = store
            .update(
                drink.id,
                DrinkFields {
                    date: drink.date,
                    ml: 400,
                    price: 450.0,
                    place: "Office".to_string(),
                    kind: DrinkKind::Latte,
                },
            )
            .unwrap();

        assert_eq!(updated.id, drink.id);
        assert_eq!(updated.ml, 400);
        assert_eq!(updated.kind, DrinkKind::Latte);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(drink.id), Some(updated));
        assert_eq!(store.get(Uuid::new_v4()), None);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_changes_nothing() {
        let (_, store) = open_memory();
        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));
        let before = store.all();

        let result = store.update(Uuid::new_v4(), espresso_at(datetime!(2025-02-01 09:00:00 UTC)));
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(store.all(), before);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (_, store) = open_memory();
        let drink = store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));

        assert!(store.remove(drink.id));
        assert!(!store.remove(drink.id));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn all_returns_a_detached_snapshot() {
        let (_, store) = open_memory();
        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));

        let mut snapshot = store.all();
        snapshot.clear();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn query_filters_by_month_and_sorts_newest_first() {
        let (_, store) = open_memory();
        let espresso = store.add(espresso_at(datetime!(2025-01-15 10:00:00 UTC)));
        let latte = store.add(DrinkFields {
            date: datetime!(2025-01-20 10:00:00 UTC),
            ml: 400,
            price: 450.0,
            place: "Cafe".to_string(),
            kind: DrinkKind::Latte,
        });
        store.add(espresso_at(datetime!(2025-02-02 10:00:00 UTC)));

        let january = store.query("2025-01".parse().unwrap());
        assert_eq!(january, vec![latte, espresso]);

        let summary = store.summary("2025-01".parse().unwrap());
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_quantity, 650.0);
        assert_eq!(summary.total_spent, 750.0);
    }

    #[tokio::test]
    async fn month_queries_partition_the_year() {
        let (_, store) = open_memory();
        store.add(espresso_at(datetime!(2025-01-01 00:00:00 UTC)));
        store.add(espresso_at(datetime!(2025-01-31 23:59:59 UTC)));
        store.add(espresso_at(datetime!(2025-06-10 12:00:00 UTC)));
        store.add(espresso_at(datetime!(2025-12-31 23:00:00 UTC)));
        store.add(espresso_at(datetime!(2024-12-31 23:59:59 UTC)));
        store.add(espresso_at(datetime!(2026-01-01 00:00:00 UTC)));

        let year: HashSet<Uuid> = store
            .query(Window::Year(2025))
            .iter()
            .map(|drink| drink.id)
            .collect();
        assert_eq!(year.len(), 4);

        let mut by_month = HashSet::new();
        let mut total = 0;
        for window in Window::months_of(2025) {
            let month = store.query(window);
            total += month.len();
            by_month.extend(month.iter().map(|drink| drink.id));
        }
        // The twelve months cover the year exactly once: no overlap, no gap.
        assert_eq!(by_month, year);
        assert_eq!(total, year.len());
    }

    #[tokio::test]
    async fn all_time_aggregates_match_the_full_collection() {
        let (_, store) = open_memory();
        store.add(espresso_at(datetime!(2024-06-01 08:00:00 UTC)));
        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));

        let via_query = store.summary(Window::AllTime);
        assert_eq!(via_query.total_spent, stats::total_spent(&store.all()));
        assert_eq!(via_query.count, store.len());
    }

    #[test]
    fn open_loads_existing_snapshot() {
        let snapshot = Arc::new(MemorySnapshot::new());
        let seeded = vec![
            Drink::build(Uuid::new_v4(), espresso_at(datetime!(2025-01-15 08:00:00 UTC))),
            Drink::build(Uuid::new_v4(), espresso_at(datetime!(2025-01-16 08:00:00 UTC))),
        ];
        SnapshotStore::save(snapshot.as_ref(), &seeded).unwrap();

        let store: Store<Drink> = Store::open(Arc::clone(&snapshot), StoreOptions::default());
        assert_eq!(store.all(), seeded);
        assert!(!store.is_dirty());
    }

    #[test]
    fn open_survives_a_corrupt_snapshot() {
        let snapshot = Arc::new(MemorySnapshot::new());
        snapshot.set_raw(&b"[{\"id\": \"not quite"[..]);

        let store: Store<Drink> = Store::open(Arc::clone(&snapshot), StoreOptions::default());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_coalesces_rapid_mutations_into_one_save() {
        let (snapshot, store) = open_memory();
        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));
        store.add(espresso_at(datetime!(2025-01-15 09:00:00 UTC)));
        store.add(espresso_at(datetime!(2025-01-15 10:00:00 UTC)));

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(snapshot.save_count(), 1);
        assert!(!store.is_dirty());
        let persisted: Vec<Drink> = snapshot.load();
        assert_eq!(persisted, store.all());
    }

    #[tokio::test(start_paused = true)]
    async fn new_mutation_restarts_the_debounce_timer() {
        let (snapshot, store) = open_memory();
        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));

        tokio::time::sleep(Duration::from_millis(300)).await;
        store.add(espresso_at(datetime!(2025-01-15 09:00:00 UTC)));

        // 600 ms after the first mutation, but only 300 ms after the second.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(snapshot.save_count(), 0);
        assert!(store.is_dirty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(snapshot.save_count(), 1);
        let persisted: Vec<Drink> = snapshot.load();
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_persists_immediately_and_cancels_the_timer() {
        let (snapshot, store) = open_memory();
        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));

        store.flush();
        assert_eq!(snapshot.save_count(), 1);
        assert!(!store.is_dirty());

        // The cancelled timer must not fire a second save.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(snapshot.save_count(), 1);
    }

    /// Snapshot store that fails its first `failures` saves.
    struct FlakySnapshot {
        inner: MemorySnapshot,
        failures: AtomicUsize,
    }

    impl FlakySnapshot {
        fn failing(failures: usize) -> Self {
            Self {
                inner: MemorySnapshot::new(),
                failures: AtomicUsize::new(failures),
            }
        }
    }

    impl SnapshotStore<Drink> for FlakySnapshot {
        fn load(&self) -> Vec<Drink> {
            self.inner.load()
        }

        fn save(&self, records: &[Drink]) -> crate::Result<()> {
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                    left.checked_sub(1)
                })
                .is_ok()
            {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.save(records)
        }

        fn clear(&self) -> crate::Result<()> {
            SnapshotStore::<Drink>::clear(&self.inner)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_leaves_the_store_dirty_for_retry() {
        let snapshot = Arc::new(FlakySnapshot::failing(1));
        let store: Store<Drink> = Store::open(Arc::clone(&snapshot), StoreOptions::default());

        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(snapshot.inner.save_count(), 0);
        assert!(store.is_dirty());

        // The next mutation schedules a fresh save that succeeds.
        store.add(espresso_at(datetime!(2025-01-15 09:00:00 UTC)));
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(snapshot.inner.save_count(), 1);
        assert!(!store.is_dirty());
        let persisted: Vec<Drink> = snapshot.inner.load();
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties_the_store_and_the_snapshot() {
        let (snapshot, store) = open_memory();
        store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));
        store.flush();
        assert!(snapshot.raw().is_some());

        store.clear();
        assert!(store.is_empty());
        assert!(!store.is_dirty());
        assert!(snapshot.raw().is_none());

        // No debounced save resurrects the cleared snapshot.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(snapshot.raw().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_every_mutation_in_order() {
        let (_, store) = open_memory();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let token = store.subscribe(move |event| {
            let tag = match event {
                StoreEvent::Added(_) => "added",
                StoreEvent::Updated(_) => "updated",
                StoreEvent::Removed(_) => "removed",
                StoreEvent::Cleared => "cleared",
            };
            sink.lock().unwrap().push(tag);
        });

        let drink = store.add(espresso_at(datetime!(2025-01-15 08:00:00 UTC)));
        store
            .update(drink.id, espresso_at(datetime!(2025-01-15 09:00:00 UTC)))
            .unwrap();
        store.remove(drink.id);
        store.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["added", "updated", "removed", "cleared"]
        );

        assert!(store.unsubscribe(token));
        assert!(!store.unsubscribe(token));
        store.add(espresso_at(datetime!(2025-01-15 10:00:00 UTC)));
        assert_eq!(seen.lock().unwrap().len(), 4);
    }
}
