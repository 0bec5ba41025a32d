//! In-memory patient record store.
//!
//! Holds the authoritative ordered sequence of records and implements every data operation the
//! HTTP layer exposes:
//!
//! - insert with defaulting of `id`, `createdAt` and `lastUpdate`
//! - full listing in insertion order
//! - lookup by `id` (primary key) and by `requestId` (secondary key)
//! - shallow-merge update with a server-authoritative `lastUpdate`
//! - removal by position
//!
//! All lookups return the *first* match in insertion order; ids are not guaranteed unique once
//! callers supply their own.
//!
//! ## Concurrency
//!
//! The sequence sits behind a [`RwLock`]. Reads share the lock, and each mutating operation holds
//! the write lock from lookup to completion, so no caller observes a half-applied operation.
//!
//! ## Pure Data Operations
//!
//! Nothing here knows about HTTP. Status codes and response bodies belong in `api-rest`.

use crate::clock::{timestamp_now, Clock, SystemClock};
use crate::config::{CoreConfig, IdPolicy};
use crate::constants::{CREATED_AT_FIELD, ID_FIELD, LAST_UPDATE_FIELD};
use crate::error::{PatientError, PatientResult};
use crate::record::Record;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<Record>,
    /// Highest integer id ever held. Only consulted by [`IdPolicy::Monotonic`].
    highest_id: i64,
}

impl StoreState {
    fn position_of(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.has_id(id))
    }

    fn next_id(&self, policy: IdPolicy) -> i64 {
        match policy {
            IdPolicy::Count => self.records.len() as i64 + 1,
            IdPolicy::Monotonic => self
                .highest_id
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_unused_id()),
        }
    }

    /// Smallest positive id no stored record holds. Only reached once `i64::MAX` has been seen.
    fn lowest_unused_id(&self) -> i64 {
        let taken: HashSet<i64> = self.records.iter().filter_map(Record::id).collect();
        (1..=i64::MAX)
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or(i64::MAX)
    }

    fn observe_id(&mut self, record: &Record) {
        if let Some(id) = record.id() {
            self.highest_id = self.highest_id.max(id);
        }
    }
}

/// Process-wide patient record store.
///
/// Construct one at startup and share it (typically behind an `Arc`) with the request handlers.
/// Tests construct isolated instances freely.
pub struct PatientStore {
    cfg: CoreConfig,
    clock: Arc<dyn Clock>,
    state: RwLock<StoreState>,
}

impl std::fmt::Debug for PatientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientStore")
            .field("cfg", &self.cfg)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for PatientStore {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl PatientStore {
    /// Creates an empty store stamped by the system clock.
    pub fn new(cfg: CoreConfig) -> Self {
        Self::with_clock(cfg, Arc::new(SystemClock))
    }

    /// Creates an empty store that takes timestamps from `clock`.
    pub fn with_clock(cfg: CoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cfg,
            clock,
            state: RwLock::new(StoreState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> String {
        timestamp_now(self.clock.as_ref())
    }

    /// Appends a record, filling in any missing `createdAt`, `lastUpdate` and `id`.
    ///
    /// Caller-supplied values for those fields are kept as they are. A key holding `null` counts
    /// as missing.
    ///
    /// # Returns
    ///
    /// The record as stored.
    pub fn insert(&self, mut record: Record) -> Record {
        if record.is_missing(CREATED_AT_FIELD) {
            record.insert(CREATED_AT_FIELD, self.now());
        }
        if record.is_missing(LAST_UPDATE_FIELD) {
            record.insert(LAST_UPDATE_FIELD, self.now());
        }

        let mut state = self.write();
        if record.is_missing(ID_FIELD) {
            let id = state.next_id(self.cfg.id_policy());
            record.insert(ID_FIELD, id);
        }
        state.observe_id(&record);
        state.records.push(record.clone());

        tracing::debug!(
            id = ?record.get(ID_FIELD),
            total = state.records.len(),
            "patient record inserted"
        );
        record
    }

    /// Parses `body` and inserts it.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidFormat`] if `body` is not a JSON object. The store is not
    /// touched in that case.
    pub fn insert_json(&self, body: &[u8]) -> PatientResult<Record> {
        let record = Record::from_json_slice(body)?;
        Ok(self.insert(record))
    }

    /// Snapshot of every record in insertion order.
    pub fn list(&self) -> Vec<Record> {
        self.read().records.clone()
    }

    /// Number of records currently stored.
    pub fn count(&self) -> usize {
        self.read().records.len()
    }

    /// First record whose `id` equals `id`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record matches.
    pub fn find_by_id(&self, id: i64) -> PatientResult<Record> {
        self.read()
            .records
            .iter()
            .find(|r| r.has_id(id))
            .cloned()
            .ok_or(PatientError::NotFound)
    }

    /// First record whose `requestId` equals `request_id`.
    ///
    /// Records without a string `requestId` never match.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record matches.
    pub fn find_by_request_id(&self, request_id: &str) -> PatientResult<Record> {
        self.read()
            .records
            .iter()
            .find(|r| r.request_id() == Some(request_id))
            .cloned()
            .ok_or(PatientError::NotFound)
    }

    /// Shallow-merges `patch` into the first record with `id`, then restamps `lastUpdate`.
    ///
    /// A `lastUpdate` inside `patch` is always overwritten by the fresh stamp.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record matches; the store is unchanged.
    pub fn update(&self, id: i64, patch: Record) -> PatientResult<Record> {
        self.update_with(id, move || Ok(patch))
    }

    /// Parses `body` as a patch and applies it to the first record with `id`.
    ///
    /// The record is located before the body is parsed, so a missing record wins over a bad body.
    ///
    /// # Errors
    ///
    /// - [`PatientError::NotFound`] if no record matches.
    /// - [`PatientError::InvalidFormat`] if `body` is not a JSON object. Nothing is applied.
    pub fn update_json(&self, id: i64, body: &[u8]) -> PatientResult<Record> {
        self.update_with(id, || Record::from_json_slice(body))
    }

    fn update_with<F>(&self, id: i64, patch: F) -> PatientResult<Record>
    where
        F: FnOnce() -> PatientResult<Record>,
    {
        let mut state = self.write();
        let index = state.position_of(id).ok_or(PatientError::NotFound)?;
        let patch = patch()?;
        let stamp = self.now();

        let record = &mut state.records[index];
        record.merge(patch);
        record.insert(LAST_UPDATE_FIELD, stamp);
        let updated = record.clone();
        state.observe_id(&updated);

        tracing::debug!(id, index, "patient record updated");
        Ok(updated)
    }

    /// Removes the first record with `id`.
    ///
    /// # Returns
    ///
    /// The record as it was at removal.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record matches; the store is unchanged.
    pub fn delete(&self, id: i64) -> PatientResult<Record> {
        let mut state = self.write();
        let index = state.position_of(id).ok_or(PatientError::NotFound)?;
        let removed = state.records.remove(index);

        tracing::debug!(id, index, total = state.records.len(), "patient record deleted");
        Ok(removed)
    }
}
