//! # Query cache: typed keys with a per-kind index
//!
//! Process-wide, in-memory cache of backend query results. It is never
//! authoritative: every mutation invalidates the entity kinds it touches and the
//! affected views refetch.
//!
//! ## Keys
//!
//! A [`QueryKey`] is an ([`EntityKind`], [`Scope`]) pair, e.g.
//! `(TripRequests, Principal("abc"))` or `(DriverLocation, Principal("drv"))`.
//! [`QueryCache::invalidate`] marks every entry of a kind stale by walking the
//! kind index, so there is no string matching on keys.
//!
//! ## Staleness
//!
//! Invalidated entries are kept as *stale*: [`QueryCache::fresh`] skips them
//! (forcing a refetch) while [`QueryCache::last`] still returns them so a view
//! can keep showing the previous data during the refetch. A later
//! [`QueryCache::insert`] always wins, whichever request it came from.
//!
//! Entries also carry the time they were fetched. [`QueryCache::fresh_since`]
//! treats anything fetched before the given instant as missing, which is how
//! callers bound the age of what they read.
//!
//! ## Invalidation table
//!
//! [`invalidations`] maps each [`Mutation`] to the kinds it invalidates.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{Principal, TripId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    CurrentUserProfile,
    AdminStatus,
    ChildProfiles,
    ChildProfile,
    TripRequests,
    AllTripRequests,
    TripStatus,
    DriverLocation,
    Messages,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::CurrentUserProfile,
        EntityKind::AdminStatus,
        EntityKind::ChildProfiles,
        EntityKind::ChildProfile,
        EntityKind::TripRequests,
        EntityKind::AllTripRequests,
        EntityKind::TripStatus,
        EntityKind::DriverLocation,
        EntityKind::Messages,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Principal(Principal),
    Trip(TripId),
    Child(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EntityKind,
    pub scope: Scope,
}

impl QueryKey {
    pub fn global(kind: EntityKind) -> Self {
        Self {
            kind,
            scope: Scope::Global,
        }
    }

    pub fn principal(kind: EntityKind, principal: &Principal) -> Self {
        Self {
            kind,
            scope: Scope::Principal(principal.clone()),
        }
    }

    pub fn trip(kind: EntityKind, trip: &TripId) -> Self {
        Self {
            kind,
            scope: Scope::Trip(trip.clone()),
        }
    }

    pub fn child(kind: EntityKind, child_id: &str) -> Self {
        Self {
            kind,
            scope: Scope::Child(child_id.to_string()),
        }
    }
}

/// Backend mutations, for the invalidation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    SaveCallerUserProfile,
    CreateChildProfile,
    CreateTripRequest,
    UpdateTripStatus,
    UpdateDriverLocation,
    SendMessage,
    TriggerSos,
}

/// Entity kinds a successful mutation invalidates.
pub fn invalidations(mutation: Mutation) -> &'static [EntityKind] {
    match mutation {
        Mutation::SaveCallerUserProfile => &[EntityKind::CurrentUserProfile],
        Mutation::CreateChildProfile => &[EntityKind::ChildProfiles],
        Mutation::CreateTripRequest => &[EntityKind::TripRequests],
        Mutation::UpdateTripStatus => &[
            EntityKind::TripRequests,
            EntityKind::TripStatus,
            EntityKind::AllTripRequests,
        ],
        Mutation::UpdateDriverLocation => &[],
        Mutation::SendMessage => &[EntityKind::Messages],
        Mutation::TriggerSos => &[EntityKind::Messages],
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    stale: bool,
    fetched_at_ms: u64,
}

#[derive(Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    index: HashMap<EntityKind, HashSet<QueryKey>>,
    generations: HashMap<EntityKind, u64>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result for `key`, replacing whatever was there.
    pub fn insert<T: Send + Sync + 'static>(&mut self, key: QueryKey, value: T) {
        self.insert_at(key, value, 0);
    }

    /// Store a result fetched at `fetched_at_ms`.
    pub fn insert_at<T: Send + Sync + 'static>(
        &mut self,
        key: QueryKey,
        value: T,
        fetched_at_ms: u64,
    ) {
        self.index.entry(key.kind).or_default().insert(key.clone());
        self.entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                stale: false,
                fetched_at_ms,
            },
        );
    }

    /// The cached value if present and not invalidated.
    pub fn fresh<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.fresh_since(key, 0)
    }

    /// Like [`QueryCache::fresh`], but only for entries fetched at or after
    /// `since_ms`.
    pub fn fresh_since<T: Clone + 'static>(&self, key: &QueryKey, since_ms: u64) -> Option<T> {
        self.entries
            .get(key)
            .filter(|e| !e.stale && e.fetched_at_ms >= since_ms)
            .and_then(|e| e.value.downcast_ref::<T>())
            .cloned()
    }

    /// The cached value even if stale.
    pub fn last<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|e| e.value.downcast_ref::<T>())
            .cloned()
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).map(|e| e.stale).unwrap_or(true)
    }

    pub fn mark_stale(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    /// Mark every entry of `kind` stale and bump its generation.
    pub fn invalidate(&mut self, kind: EntityKind) {
        if let Some(keys) = self.index.get(&kind) {
            for key in keys {
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.stale = true;
                }
            }
        }
        *self.generations.entry(kind).or_insert(0) += 1;
    }

    pub fn invalidate_all(&mut self, kinds: &[EntityKind]) {
        for kind in kinds {
            self.invalidate(*kind);
        }
    }

    /// How many times `kind` has been invalidated.
    pub fn generation(&self, kind: EntityKind) -> u64 {
        self.generations.get(&kind).copied().unwrap_or(0)
    }

    /// Drop everything (logout). Every kind's generation moves on, so results
    /// still in flight land stale.
    pub fn clear(&mut self) {
        for kind in EntityKind::ALL {
            *self.generations.entry(kind).or_insert(0) += 1;
        }
        self.entries.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(name: &str) -> Principal {
        Principal::new(name)
    }

    #[test]
    fn test_insert_and_fresh() {
        let mut cache = QueryCache::new();
        let key = QueryKey::principal(EntityKind::ChildProfiles, &parent("p1"));
        assert!(cache.fresh::<Vec<String>>(&key).is_none());

        cache.insert(key.clone(), vec!["Ada".to_string()]);
        assert_eq!(cache.fresh::<Vec<String>>(&key), Some(vec!["Ada".to_string()]));
        // Wrong type never matches
        assert!(cache.fresh::<u32>(&key).is_none());
    }

    #[test]
    fn test_invalidate_kind_marks_all_scopes_stale() {
        let mut cache = QueryCache::new();
        let a = QueryKey::principal(EntityKind::TripRequests, &parent("a"));
        let b = QueryKey::principal(EntityKind::TripRequests, &parent("b"));
        let other = QueryKey::principal(EntityKind::ChildProfiles, &parent("a"));
        cache.insert(a.clone(), 1u32);
        cache.insert(b.clone(), 2u32);
        cache.insert(other.clone(), 3u32);

        cache.invalidate(EntityKind::TripRequests);

        assert!(cache.fresh::<u32>(&a).is_none());
        assert!(cache.fresh::<u32>(&b).is_none());
        assert_eq!(cache.fresh::<u32>(&other), Some(3));
        // Stale data stays available for display
        assert_eq!(cache.last::<u32>(&a), Some(1));
        assert_eq!(cache.generation(EntityKind::TripRequests), 1);
        assert_eq!(cache.generation(EntityKind::ChildProfiles), 0);
    }

    #[test]
    fn test_insert_after_invalidate_is_fresh() {
        let mut cache = QueryCache::new();
        let key = QueryKey::global(EntityKind::AllTripRequests);
        cache.insert(key.clone(), 1u32);
        cache.invalidate(EntityKind::AllTripRequests);
        assert!(cache.is_stale(&key));
        cache.insert(key.clone(), 2u32);
        assert_eq!(cache.fresh::<u32>(&key), Some(2));
    }

    #[test]
    fn test_mark_stale_single_key() {
        let mut cache = QueryCache::new();
        let d1 = QueryKey::principal(EntityKind::DriverLocation, &parent("d1"));
        let d2 = QueryKey::principal(EntityKind::DriverLocation, &parent("d2"));
        cache.insert(d1.clone(), 1u8);
        cache.insert(d2.clone(), 2u8);
        cache.mark_stale(&d1);
        assert!(cache.fresh::<u8>(&d1).is_none());
        assert_eq!(cache.fresh::<u8>(&d2), Some(2));
    }

    #[test]
    fn test_update_trip_status_invalidations() {
        let kinds = invalidations(Mutation::UpdateTripStatus);
        assert!(kinds.contains(&EntityKind::TripRequests));
        assert!(kinds.contains(&EntityKind::TripStatus));
        assert!(kinds.contains(&EntityKind::AllTripRequests));
        assert!(invalidations(Mutation::UpdateDriverLocation).is_empty());
        assert_eq!(invalidations(Mutation::TriggerSos), &[EntityKind::Messages]);
    }

    #[test]
    fn test_clear() {
        let mut cache = QueryCache::new();
        cache.insert(QueryKey::global(EntityKind::CurrentUserProfile), 1u8);
        cache.insert(QueryKey::global(EntityKind::AdminStatus), true);
        cache.invalidate(EntityKind::CurrentUserProfile);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.generation(EntityKind::CurrentUserProfile), 2);
        assert_eq!(cache.generation(EntityKind::AdminStatus), 1);
        assert_eq!(cache.generation(EntityKind::Messages), 1);
    }

    #[test]
    fn test_clear_moves_kinds_without_history() {
        let mut cache = QueryCache::new();
        let before = cache.generation(EntityKind::DriverLocation);
        cache.clear();
        assert_ne!(cache.generation(EntityKind::DriverLocation), before);
    }

    #[test]
    fn test_fresh_since_skips_older_entries() {
        let mut cache = QueryCache::new();
        let key = QueryKey::global(EntityKind::AllTripRequests);
        cache.insert_at(key.clone(), 7u32, 1_000);

        assert_eq!(cache.fresh_since::<u32>(&key, 1_000), Some(7));
        assert_eq!(cache.fresh_since::<u32>(&key, 500), Some(7));
        assert!(cache.fresh_since::<u32>(&key, 1_001).is_none());
        // Still there for display
        assert_eq!(cache.last::<u32>(&key), Some(7));
    }
}
