//! # Data access: cached queries and invalidating mutations
//!
//! [`DataAccess`] wraps an [`Actor`] with the process-wide [`QueryCache`]. Every
//! backend read goes through [`DataAccess::query`]:
//!
//! 1. a fresh cache hit returns without an RPC;
//! 2. otherwise the caller takes the key's coalescing lock, re-checks the cache
//!    (a concurrent identical query may have filled it meanwhile) and fetches;
//! 3. the result is inserted. If the kind was invalidated while the fetch was in
//!    flight the entry is stored stale so the next read refetches.
//!
//! Every write goes through [`DataAccess::mutate`]: on success the kinds listed
//! by [`invalidations`] are marked stale, on failure the cache is untouched and
//! the error is logged and returned.
//!
//! A cached result is only "fresh" for `query_max_age_ms` after it was fetched.
//! [`DataAccess::refetching`] tightens that to "fetched after now", which is
//! what a newly mounted view uses so it never starts from another session's
//! leftovers.
//!
//! Queries scoped to the caller's own principal (profile, admin flag, children,
//! trips, messages) return an empty value without an RPC while no identity is
//! set, and are keyed by that principal so a new identity never reads the
//! previous one's results.
//!
//! Polling views call [`DataAccess::refresh`] on each tick with the interval
//! from [`DataAccess::poll_interval`].

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use store::cache::invalidations;
use store::config::PollingConfig;
use store::forms::{NewChildProfile, NewTripRequest};
use store::{
    ChatMessage, ChildProfile, Clock, EntityKind, Location, Mutation, Principal, QueryCache,
    QueryKey, SystemClock, TripId, TripRequest, TripStatus, UserProfile,
};

use crate::actor::{Actor, ActorResult};
use crate::coalesce::QueryCoalescer;

/// Cache keys for each query.
pub mod keys {
    use store::{EntityKind, Principal, QueryKey, TripId};

    pub fn current_user_profile(caller: &Principal) -> QueryKey {
        QueryKey::principal(EntityKind::CurrentUserProfile, caller)
    }

    pub fn admin_status(caller: &Principal) -> QueryKey {
        QueryKey::principal(EntityKind::AdminStatus, caller)
    }

    pub fn child_profiles(parent: &Principal) -> QueryKey {
        QueryKey::principal(EntityKind::ChildProfiles, parent)
    }

    pub fn child_profile(child_id: &str) -> QueryKey {
        QueryKey::child(EntityKind::ChildProfile, child_id)
    }

    pub fn trip_requests(parent: &Principal) -> QueryKey {
        QueryKey::principal(EntityKind::TripRequests, parent)
    }

    pub fn all_trip_requests() -> QueryKey {
        QueryKey::global(EntityKind::AllTripRequests)
    }

    pub fn trip_status(trip: &TripId) -> QueryKey {
        QueryKey::trip(EntityKind::TripStatus, trip)
    }

    pub fn driver_location(driver: &Principal) -> QueryKey {
        QueryKey::principal(EntityKind::DriverLocation, driver)
    }

    pub fn messages(principal: &Principal) -> QueryKey {
        QueryKey::principal(EntityKind::Messages, principal)
    }
}

#[derive(Clone)]
pub struct DataAccess<A> {
    actor: A,
    identity: Option<Principal>,
    cache: Arc<Mutex<QueryCache>>,
    coalescer: Arc<QueryCoalescer>,
    polling: PollingConfig,
    clock: Arc<dyn Clock + Send + Sync>,
    /// Entries fetched before this instant are ignored.
    not_before_ms: u64,
}

impl<A: Actor> DataAccess<A> {
    pub fn new(actor: A, identity: Option<Principal>, polling: PollingConfig) -> Self {
        Self {
            actor,
            identity,
            cache: Arc::new(Mutex::new(QueryCache::new())),
            coalescer: Arc::new(QueryCoalescer::new()),
            polling,
            clock: Arc::new(SystemClock),
            not_before_ms: 0,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Same cache, different actor and identity (sign-in, sign-out).
    pub fn with_actor(&self, actor: A, identity: Option<Principal>) -> Self {
        Self {
            actor,
            identity,
            cache: Arc::clone(&self.cache),
            coalescer: Arc::clone(&self.coalescer),
            polling: self.polling.clone(),
            clock: Arc::clone(&self.clock),
            not_before_ms: 0,
        }
    }

    /// A handle whose reads skip anything cached before now. Concurrent
    /// readers through such handles still share one fetch.
    pub fn refetching(&self) -> Self
    where
        A: Clone,
    {
        Self {
            not_before_ms: self.clock.now_ms(),
            ..self.clone()
        }
    }

    pub fn actor(&self) -> &A {
        &self.actor
    }

    pub fn identity(&self) -> Option<&Principal> {
        self.identity.as_ref()
    }

    fn cache(&self) -> MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let now = self.clock.now_ms();
        let since = now
            .saturating_sub(self.polling.query_max_age_ms)
            .max(self.not_before_ms);
        self.cache().fresh_since(key, since)
    }

    /// Cache-first read of `key`, fetching with `fetch` on a miss.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, fetch: F) -> ActorResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ActorResult<T>>,
    {
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let _guard = self.coalescer.acquire(&key).await;
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let generation = self.cache().generation(key.kind);
        let value = match fetch().await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(?key, "query failed: {e}");
                return Err(e);
            }
        };

        let fetched_at = self.clock.now_ms();
        let mut cache = self.cache();
        cache.insert_at(key.clone(), value.clone(), fetched_at);
        if cache.generation(key.kind) != generation {
            cache.mark_stale(&key);
        }
        Ok(value)
    }

    /// Run a backend write and invalidate what it touched if it succeeded.
    pub async fn mutate<T, Fut>(&self, mutation: Mutation, call: Fut) -> ActorResult<T>
    where
        Fut: Future<Output = ActorResult<T>>,
    {
        match call.await {
            Ok(value) => {
                self.cache().invalidate_all(invalidations(mutation));
                Ok(value)
            }
            Err(e) => {
                tracing::error!(?mutation, "mutation failed: {e}");
                Err(e)
            }
        }
    }

    /// Last result for `key`, fresh or stale.
    pub fn last_known<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.cache().last(key)
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.cache().is_stale(key)
    }

    pub fn generation(&self, kind: EntityKind) -> u64 {
        self.cache().generation(kind)
    }

    /// Force the next read of `key` to refetch.
    pub fn refresh(&self, key: &QueryKey) {
        self.cache().mark_stale(key);
    }

    pub fn poll_interval(&self, kind: EntityKind) -> Option<Duration> {
        let ms = match kind {
            EntityKind::DriverLocation => self.polling.driver_location_ms,
            EntityKind::Messages => self.polling.messages_ms,
            EntityKind::TripStatus => self.polling.trip_status_ms,
            EntityKind::TripRequests | EntityKind::AllTripRequests => {
                self.polling.trip_requests_ms
            }
            _ => return None,
        };
        Some(Duration::from_millis(ms))
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.cache().clear();
    }

    pub async fn caller_user_profile(&self) -> ActorResult<Option<UserProfile>> {
        let Some(me) = self.identity.as_ref() else {
            return Ok(None);
        };
        self.query(keys::current_user_profile(me), || {
            self.actor.get_caller_user_profile()
        })
        .await
    }

    pub async fn save_caller_user_profile(&self, profile: UserProfile) -> ActorResult<()> {
        self.mutate(
            Mutation::SaveCallerUserProfile,
            self.actor.save_caller_user_profile(profile),
        )
        .await
    }

    pub async fn is_caller_admin(&self) -> ActorResult<bool> {
        let Some(me) = self.identity.as_ref() else {
            return Ok(false);
        };
        self.query(keys::admin_status(me), || self.actor.is_caller_admin())
            .await
    }

    pub async fn child_profiles(&self) -> ActorResult<Vec<ChildProfile>> {
        let Some(me) = self.identity.as_ref() else {
            return Ok(Vec::new());
        };
        self.query(keys::child_profiles(me), || self.actor.get_child_profiles(me))
            .await
    }

    pub async fn child_profile(&self, child_id: &str) -> ActorResult<Option<ChildProfile>> {
        self.query(keys::child_profile(child_id), || {
            self.actor.get_child_profile(child_id)
        })
        .await
    }

    /// Returns the new child's id.
    pub async fn create_child_profile(&self, child: NewChildProfile) -> ActorResult<String> {
        self.mutate(
            Mutation::CreateChildProfile,
            self.actor.create_child_profile(
                child.name,
                child.grade,
                child.allergies,
                child.emergency_contact,
            ),
        )
        .await
    }

    pub async fn trip_requests(&self) -> ActorResult<Vec<TripRequest>> {
        let Some(me) = self.identity.as_ref() else {
            return Ok(Vec::new());
        };
        self.query(keys::trip_requests(me), || {
            self.actor.get_trip_requests_by_parent(me)
        })
        .await
    }

    pub async fn create_trip_request(&self, trip: NewTripRequest) -> ActorResult<TripId> {
        self.mutate(
            Mutation::CreateTripRequest,
            self.actor.create_trip_request(
                trip.children_ids,
                trip.pickup_location,
                trip.dropoff_location,
                trip.scheduled_time,
            ),
        )
        .await
    }

    pub async fn all_trip_requests(&self) -> ActorResult<Vec<TripRequest>> {
        self.query(keys::all_trip_requests(), || {
            self.actor.get_all_trip_requests()
        })
        .await
    }

    pub async fn trip_status(&self, trip: &TripId) -> ActorResult<Option<TripStatus>> {
        self.query(keys::trip_status(trip), || self.actor.get_trip_status(trip))
            .await
    }

    pub async fn update_trip_status(&self, trip: &TripId, status: TripStatus) -> ActorResult<()> {
        self.mutate(
            Mutation::UpdateTripStatus,
            self.actor.update_trip_status(trip, status),
        )
        .await
    }

    pub async fn update_driver_location(&self, location: Location) -> ActorResult<()> {
        self.mutate(
            Mutation::UpdateDriverLocation,
            self.actor.update_driver_location(location),
        )
        .await
    }

    pub async fn driver_location(&self, driver: &Principal) -> ActorResult<Option<Location>> {
        self.query(keys::driver_location(driver), || {
            self.actor.get_driver_location(driver)
        })
        .await
    }

    pub async fn messages(&self) -> ActorResult<Vec<ChatMessage>> {
        let Some(me) = self.identity.as_ref() else {
            return Ok(Vec::new());
        };
        self.query(keys::messages(me), || self.actor.get_messages(me))
            .await
    }

    pub async fn send_message(&self, receiver: &Principal, text: String) -> ActorResult<()> {
        self.mutate(Mutation::SendMessage, self.actor.send_message(receiver, text))
            .await
    }

    pub async fn trigger_sos(&self, location: Option<Location>) -> ActorResult<()> {
        self.mutate(Mutation::TriggerSos, self.actor.trigger_sos(location))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::method;
    use crate::error::ActorError;
    use crate::memory::MemoryActor;
    use store::ManualClock;

    fn principal(s: &str) -> Principal {
        Principal::new(s)
    }

    fn access(actor: &MemoryActor) -> DataAccess<MemoryActor> {
        DataAccess::new(
            actor.clone(),
            Some(actor.caller().clone()),
            PollingConfig::default(),
        )
    }

    fn child(name: &str) -> NewChildProfile {
        NewChildProfile {
            name: name.to_string(),
            grade: "2nd".to_string(),
            allergies: None,
            emergency_contact: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_rpc() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);

        assert!(!data.is_caller_admin().await.unwrap());
        assert!(!data.is_caller_admin().await.unwrap());
        assert_eq!(actor.calls(method::IS_CALLER_ADMIN), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries_coalesce() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);

        let (a, b) = tokio::join!(data.child_profiles(), data.child_profiles());
        assert!(a.unwrap().is_empty());
        assert!(b.unwrap().is_empty());
        assert_eq!(actor.calls(method::GET_CHILD_PROFILES), 1);
    }

    #[tokio::test]
    async fn test_mutation_invalidates_matching_kind_only() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);

        assert!(data.child_profiles().await.unwrap().is_empty());
        assert!(data.trip_requests().await.unwrap().is_empty());

        data.create_child_profile(child("Ada")).await.unwrap();

        let children = data.child_profiles().await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(actor.calls(method::GET_CHILD_PROFILES), 2);

        data.trip_requests().await.unwrap();
        assert_eq!(actor.calls(method::GET_TRIP_REQUESTS_BY_PARENT), 1);
    }

    #[tokio::test]
    async fn test_invalidation_spans_every_scope() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);
        let driver = actor.as_caller(principal("driver"));

        let trip = data
            .create_trip_request(NewTripRequest {
                children_ids: vec!["Ada".to_string()],
                pickup_location: Location::new(40.0, -73.0),
                dropoff_location: Location::new(40.1, -73.1),
                scheduled_time: 1,
            })
            .await
            .unwrap();
        actor.assign_driver(&trip, &principal("driver"));

        data.trip_status(&trip).await.unwrap();
        data.all_trip_requests().await.unwrap();
        data.trip_requests().await.unwrap();

        let driver_data = data.with_actor(driver, Some(principal("driver")));
        driver_data
            .update_trip_status(&trip, TripStatus::InProgress)
            .await
            .unwrap();

        assert!(data.is_stale(&keys::trip_status(&trip)));
        assert!(data.is_stale(&keys::all_trip_requests()));
        assert!(data.is_stale(&keys::trip_requests(&principal("parent"))));
        assert_eq!(
            data.trip_status(&trip).await.unwrap(),
            Some(TripStatus::InProgress)
        );
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);

        data.child_profiles().await.unwrap();
        let generation = data.generation(EntityKind::ChildProfiles);
        actor.fail_next(
            method::CREATE_CHILD_PROFILE,
            ActorError::Transport("offline".to_string()),
        );

        assert!(data.create_child_profile(child("Ada")).await.is_err());
        assert_eq!(data.generation(EntityKind::ChildProfiles), generation);
        assert!(!data.is_stale(&keys::child_profiles(&principal("parent"))));
    }

    #[tokio::test]
    async fn test_failed_query_not_cached() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);
        actor.fail_next(
            method::GET_MESSAGES,
            ActorError::Rejected("boom".to_string()),
        );

        assert!(data.messages().await.is_err());
        assert!(data.messages().await.unwrap().is_empty());
        assert_eq!(actor.calls(method::GET_MESSAGES), 2);
    }

    #[tokio::test]
    async fn test_no_identity_returns_empty_without_rpc() {
        let actor = MemoryActor::new(principal("parent"));
        let data = DataAccess::new(actor.clone(), None, PollingConfig::default());

        assert!(data.child_profiles().await.unwrap().is_empty());
        assert!(data.trip_requests().await.unwrap().is_empty());
        assert!(data.messages().await.unwrap().is_empty());
        assert_eq!(actor.calls(method::GET_CHILD_PROFILES), 0);
        assert_eq!(actor.calls(method::GET_TRIP_REQUESTS_BY_PARENT), 0);
        assert_eq!(actor.calls(method::GET_MESSAGES), 0);
    }

    #[tokio::test]
    async fn test_refresh_refetches_and_keeps_last_known() {
        let driver = MemoryActor::new(principal("driver"));
        let parent = driver.as_caller(principal("parent"));
        let data = access(&parent);
        let key = keys::driver_location(&principal("driver"));

        assert_eq!(data.driver_location(&principal("driver")).await.unwrap(), None);
        driver
            .update_driver_location(Location::new(40.0, -73.0))
            .await
            .unwrap();

        // Still cached until the poll tick.
        assert_eq!(data.driver_location(&principal("driver")).await.unwrap(), None);

        data.refresh(&key);
        assert_eq!(data.last_known::<Option<Location>>(&key), Some(None));
        assert_eq!(
            data.driver_location(&principal("driver")).await.unwrap(),
            Some(Location::new(40.0, -73.0))
        );
        assert_eq!(parent.calls(method::GET_DRIVER_LOCATION), 2);
    }

    #[tokio::test]
    async fn test_in_flight_result_stored_stale_after_invalidation() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);
        let key = keys::messages(&principal("parent"));

        let value: Vec<ChatMessage> = data
            .query(key.clone(), || async {
                data.cache().invalidate(EntityKind::Messages);
                Ok(Vec::new())
            })
            .await
            .unwrap();

        assert!(value.is_empty());
        assert!(data.is_stale(&key));
        assert_eq!(data.last_known::<Vec<ChatMessage>>(&key), Some(Vec::new()));
    }

    #[test]
    fn test_poll_intervals() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);
        assert_eq!(
            data.poll_interval(EntityKind::DriverLocation),
            Some(Duration::from_millis(3000))
        );
        assert_eq!(
            data.poll_interval(EntityKind::Messages),
            Some(Duration::from_millis(5000))
        );
        assert_eq!(
            data.poll_interval(EntityKind::TripStatus),
            Some(Duration::from_millis(5000))
        );
        assert_eq!(
            data.poll_interval(EntityKind::AllTripRequests),
            Some(Duration::from_millis(5000))
        );
        assert_eq!(data.poll_interval(EntityKind::ChildProfiles), None);
    }

    #[tokio::test]
    async fn test_identity_switch_does_not_inherit_admin_flag() {
        let admin = MemoryActor::new(principal("admin"));
        admin.grant_admin(&principal("admin"));
        let data = access(&admin);
        assert!(data.is_caller_admin().await.unwrap());
        data.save_caller_user_profile(UserProfile {
            name: "Root".to_string(),
            role: None,
        })
        .await
        .unwrap();
        assert!(data.caller_user_profile().await.unwrap().is_some());

        let parent = admin.as_caller(principal("parent"));
        let data = data.with_actor(parent.clone(), Some(principal("parent")));
        assert!(!data.is_caller_admin().await.unwrap());
        assert_eq!(data.caller_user_profile().await.unwrap(), None);
        assert_eq!(parent.calls(method::IS_CALLER_ADMIN), 2);
    }

    #[tokio::test]
    async fn test_no_identity_profile_and_admin_without_rpc() {
        let actor = MemoryActor::new(principal("parent"));
        let data = DataAccess::new(actor.clone(), None, PollingConfig::default());
        assert_eq!(data.caller_user_profile().await.unwrap(), None);
        assert!(!data.is_caller_admin().await.unwrap());
        assert_eq!(actor.calls(method::IS_CALLER_ADMIN), 0);
    }

    #[tokio::test]
    async fn test_entries_expire_after_max_age() {
        let actor = MemoryActor::new(principal("parent"));
        let clock = ManualClock::starting_at(1_000_000);
        let data = access(&actor).with_clock(clock.clone());
        let max_age = PollingConfig::default().query_max_age_ms;

        data.child_profiles().await.unwrap();
        clock.advance(max_age);
        data.child_profiles().await.unwrap();
        assert_eq!(actor.calls(method::GET_CHILD_PROFILES), 1);

        clock.advance(1);
        data.child_profiles().await.unwrap();
        assert_eq!(actor.calls(method::GET_CHILD_PROFILES), 2);
    }

    #[tokio::test]
    async fn test_refetching_handle_skips_earlier_results() {
        let actor = MemoryActor::new(principal("parent"));
        let clock = ManualClock::starting_at(1_000_000);
        let data = access(&actor).with_clock(clock.clone());

        data.trip_requests().await.unwrap();
        clock.advance(10);

        let mounted = data.refetching();
        mounted.trip_requests().await.unwrap();
        assert_eq!(actor.calls(method::GET_TRIP_REQUESTS_BY_PARENT), 2);

        // A second view mounting at the same instant reuses that fetch.
        data.refetching().trip_requests().await.unwrap();
        data.trip_requests().await.unwrap();
        assert_eq!(actor.calls(method::GET_TRIP_REQUESTS_BY_PARENT), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let actor = MemoryActor::new(principal("parent"));
        let data = access(&actor);
        data.is_caller_admin().await.unwrap();
        data.clear();
        data.is_caller_admin().await.unwrap();
        assert_eq!(actor.calls(method::IS_CALLER_ADMIN), 2);
    }
}
