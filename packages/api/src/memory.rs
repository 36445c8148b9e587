//! # In-process backend actor
//!
//! [`MemoryActor`] keeps the whole backend state behind one `Arc<Mutex<..>>` and
//! hands out one handle per caller ([`MemoryActor::as_caller`]). It follows the
//! backend's observable rules: trips are only moved by their assigned driver
//! and only along driver edges, parents only read their own children and trips
//! unless they are admins.
//!
//! Every call counts itself and yields once before touching state, so tests can
//! observe how many RPCs a workflow issued and interleave concurrent calls.
//! [`MemoryActor::fail_next`] injects a one-shot failure for a method.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use store::models::millis_to_nanos;
use store::{
    lifecycle, ChatMessage, ChildProfile, Clock, Location, Principal, Role, SosAlert,
    SystemClock, TripId, TripRequest, TripStatus, UserProfile,
};

use crate::actor::{method, Actor, ActorResult};
use crate::error::ActorError;

#[derive(Default)]
struct Backend {
    profiles: HashMap<Principal, UserProfile>,
    admins: HashSet<Principal>,
    /// `(owner, child)` in insertion order.
    children: Vec<(Principal, ChildProfile)>,
    trips: Vec<TripRequest>,
    driver_locations: HashMap<Principal, Location>,
    messages: Vec<ChatMessage>,
    sos_alerts: Vec<SosAlert>,
    calls: HashMap<&'static str, usize>,
    failures: HashMap<&'static str, ActorError>,
}

/// Shared in-memory backend seen through one caller's identity.
#[derive(Clone)]
pub struct MemoryActor<C = SystemClock> {
    caller: Principal,
    backend: Arc<Mutex<Backend>>,
    clock: C,
}

impl MemoryActor<SystemClock> {
    pub fn new(caller: Principal) -> Self {
        Self::with_clock(caller, SystemClock)
    }
}

impl<C: Clock + Clone> MemoryActor<C> {
    pub fn with_clock(caller: Principal, clock: C) -> Self {
        Self {
            caller,
            backend: Arc::new(Mutex::new(Backend::default())),
            clock,
        }
    }

    /// Another handle on the same backend, calling as `principal`.
    pub fn as_caller(&self, principal: Principal) -> Self {
        Self {
            caller: principal,
            backend: Arc::clone(&self.backend),
            clock: self.clock.clone(),
        }
    }

    pub fn caller(&self) -> &Principal {
        &self.caller
    }

    pub fn grant_admin(&self, principal: &Principal) {
        self.state().admins.insert(principal.clone());
    }

    /// Assign `driver` to a trip. Returns `false` if the trip does not exist.
    pub fn assign_driver(&self, trip: &TripId, driver: &Principal) -> bool {
        let mut state = self.state();
        match state.trips.iter_mut().find(|t| &t.id == trip) {
            Some(t) => {
                t.driver_id = Some(driver.clone());
                true
            }
            None => false,
        }
    }

    pub fn sos_alerts(&self) -> Vec<SosAlert> {
        self.state().sos_alerts.clone()
    }

    /// Number of calls made to `method` across every handle.
    pub fn calls(&self, method: &str) -> usize {
        self.state().calls.get(method).copied().unwrap_or(0)
    }

    /// Make the next call to `method` fail with `error`.
    pub fn fail_next(&self, method: &'static str, error: ActorError) {
        self.state().failures.insert(method, error);
    }

    fn state(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now_nanos(&self) -> u64 {
        millis_to_nanos(self.clock.now_ms())
    }

    async fn enter(&self, method: &'static str) -> ActorResult<()> {
        let failure = {
            let mut state = self.state();
            *state.calls.entry(method).or_insert(0) += 1;
            state.failures.remove(method)
        };
        YieldNow::default().await;
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn may_read_for(&self, state: &Backend, owner: &Principal) -> bool {
        &self.caller == owner || state.admins.contains(&self.caller)
    }
}

impl<C: Clock + Clone> Actor for MemoryActor<C> {
    async fn get_caller_user_profile(&self) -> ActorResult<Option<UserProfile>> {
        self.enter(method::GET_CALLER_USER_PROFILE).await?;
        Ok(self.state().profiles.get(&self.caller).cloned())
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> ActorResult<()> {
        self.enter(method::SAVE_CALLER_USER_PROFILE).await?;
        let mut state = self.state();
        if profile.role == Some(Role::Admin) && !state.admins.contains(&self.caller) {
            return Err(ActorError::Rejected(
                "Unauthorized: only admins can take the admin role".to_string(),
            ));
        }
        state.profiles.insert(self.caller.clone(), profile);
        Ok(())
    }

    async fn is_caller_admin(&self) -> ActorResult<bool> {
        self.enter(method::IS_CALLER_ADMIN).await?;
        Ok(self.state().admins.contains(&self.caller))
    }

    async fn get_child_profiles(&self, parent: &Principal) -> ActorResult<Vec<ChildProfile>> {
        self.enter(method::GET_CHILD_PROFILES).await?;
        let state = self.state();
        if !self.may_read_for(&state, parent) {
            return Err(ActorError::Rejected(
                "Unauthorized: can only view your own children".to_string(),
            ));
        }
        Ok(state
            .children
            .iter()
            .filter(|(owner, _)| owner == parent)
            .map(|(_, child)| child.clone())
            .collect())
    }

    async fn get_child_profile(&self, child_id: &str) -> ActorResult<Option<ChildProfile>> {
        self.enter(method::GET_CHILD_PROFILE).await?;
        let state = self.state();
        let Some((owner, child)) = state.children.iter().find(|(_, c)| c.id == child_id) else {
            return Ok(None);
        };
        if !self.may_read_for(&state, owner) {
            return Err(ActorError::Rejected(
                "Unauthorized: can only view your own children".to_string(),
            ));
        }
        Ok(Some(child.clone()))
    }

    async fn create_child_profile(
        &self,
        name: String,
        grade: String,
        allergies: Option<String>,
        emergency_contact: String,
    ) -> ActorResult<String> {
        self.enter(method::CREATE_CHILD_PROFILE).await?;
        let id = uuid::Uuid::new_v4().to_string();
        let child = ChildProfile {
            id: id.clone(),
            name,
            grade,
            allergies,
            emergency_contact,
        };
        self.state().children.push((self.caller.clone(), child));
        Ok(id)
    }

    async fn get_trip_requests_by_parent(
        &self,
        parent: &Principal,
    ) -> ActorResult<Vec<TripRequest>> {
        self.enter(method::GET_TRIP_REQUESTS_BY_PARENT).await?;
        let state = self.state();
        if !self.may_read_for(&state, parent) {
            return Err(ActorError::Rejected(
                "Unauthorized: can only view your own trips".to_string(),
            ));
        }
        Ok(state
            .trips
            .iter()
            .filter(|t| &t.parent_id == parent)
            .cloned()
            .collect())
    }

    async fn create_trip_request(
        &self,
        children_ids: Vec<String>,
        pickup: Location,
        dropoff: Location,
        scheduled_time: u64,
    ) -> ActorResult<TripId> {
        self.enter(method::CREATE_TRIP_REQUEST).await?;
        if children_ids.is_empty() {
            return Err(ActorError::Rejected(
                "A trip needs at least one child".to_string(),
            ));
        }
        let id = TripId::new(uuid::Uuid::new_v4().to_string());
        self.state().trips.push(TripRequest {
            id: id.clone(),
            parent_id: self.caller.clone(),
            children_ids,
            pickup_location: pickup,
            dropoff_location: dropoff,
            scheduled_time,
            driver_id: None,
            status: TripStatus::Pending,
        });
        Ok(id)
    }

    async fn get_all_trip_requests(&self) -> ActorResult<Vec<TripRequest>> {
        self.enter(method::GET_ALL_TRIP_REQUESTS).await?;
        Ok(self.state().trips.clone())
    }

    async fn get_trip_status(&self, trip: &TripId) -> ActorResult<Option<TripStatus>> {
        self.enter(method::GET_TRIP_STATUS).await?;
        Ok(self
            .state()
            .trips
            .iter()
            .find(|t| &t.id == trip)
            .map(|t| t.status))
    }

    async fn update_trip_status(&self, trip: &TripId, status: TripStatus) -> ActorResult<()> {
        self.enter(method::UPDATE_TRIP_STATUS).await?;
        let mut state = self.state();
        let Some(entry) = state.trips.iter_mut().find(|t| &t.id == trip) else {
            return Err(ActorError::Rejected(format!("Trip {trip} not found")));
        };
        if entry.driver_id.as_ref() != Some(&self.caller) {
            return Err(ActorError::Rejected(
                "Unauthorized: only the assigned driver can update this trip".to_string(),
            ));
        }
        if !lifecycle::can_transition(Role::Driver, entry.status, status) {
            return Err(ActorError::Rejected(format!(
                "Invalid transition from {} to {status}",
                entry.status
            )));
        }
        entry.status = status;
        Ok(())
    }

    async fn update_driver_location(&self, location: Location) -> ActorResult<()> {
        self.enter(method::UPDATE_DRIVER_LOCATION).await?;
        self.state()
            .driver_locations
            .insert(self.caller.clone(), location);
        Ok(())
    }

    async fn get_driver_location(&self, driver: &Principal) -> ActorResult<Option<Location>> {
        self.enter(method::GET_DRIVER_LOCATION).await?;
        Ok(self.state().driver_locations.get(driver).copied())
    }

    async fn get_messages(&self, principal: &Principal) -> ActorResult<Vec<ChatMessage>> {
        self.enter(method::GET_MESSAGES).await?;
        Ok(self
            .state()
            .messages
            .iter()
            .filter(|m| &m.sender == principal || &m.receiver == principal)
            .cloned()
            .collect())
    }

    async fn send_message(&self, receiver: &Principal, text: String) -> ActorResult<()> {
        self.enter(method::SEND_MESSAGE).await?;
        let timestamp = self.now_nanos();
        self.state().messages.push(ChatMessage {
            sender: self.caller.clone(),
            receiver: receiver.clone(),
            message: text,
            timestamp,
        });
        Ok(())
    }

    async fn trigger_sos(&self, location: Option<Location>) -> ActorResult<()> {
        self.enter(method::TRIGGER_SOS).await?;
        let timestamp = self.now_nanos();
        self.state().sos_alerts.push(SosAlert {
            sender: self.caller.clone(),
            location,
            timestamp,
        });
        Ok(())
    }
}

/// Returns `Pending` once, then completes.
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::ManualClock;

    fn principal(s: &str) -> Principal {
        Principal::new(s)
    }

    async fn book(parent: &MemoryActor) -> TripId {
        parent
            .create_trip_request(
                vec!["Ada".to_string()],
                Location::new(40.0, -73.0),
                Location::new(40.1, -73.1),
                1_700_000_000_000_000_000,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_profile_roundtrip_per_caller() {
        let parent = MemoryActor::new(principal("parent"));
        let driver = parent.as_caller(principal("driver"));

        assert_eq!(parent.get_caller_user_profile().await.unwrap(), None);
        parent
            .save_caller_user_profile(UserProfile {
                name: "Pat".to_string(),
                role: Some(Role::Parent),
            })
            .await
            .unwrap();

        let saved = parent.get_caller_user_profile().await.unwrap().unwrap();
        assert_eq!(saved.name, "Pat");
        assert_eq!(driver.get_caller_user_profile().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_admin_role_requires_grant() {
        let user = MemoryActor::new(principal("user"));
        let admin_profile = UserProfile {
            name: "Root".to_string(),
            role: Some(Role::Admin),
        };
        assert!(user
            .save_caller_user_profile(admin_profile.clone())
            .await
            .is_err());

        user.grant_admin(&principal("user"));
        assert!(user.is_caller_admin().await.unwrap());
        user.save_caller_user_profile(admin_profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_children_scoped_to_owner() {
        let parent = MemoryActor::new(principal("parent"));
        let other = parent.as_caller(principal("other"));

        let id = parent
            .create_child_profile(
                "Ada".to_string(),
                "3rd".to_string(),
                None,
                "555-0100".to_string(),
            )
            .await
            .unwrap();

        let children = parent.get_child_profiles(&principal("parent")).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, id);
        assert!(other.get_child_profiles(&principal("parent")).await.is_err());
        assert!(other.get_child_profile(&id).await.is_err());
        assert_eq!(
            parent.get_child_profile(&id).await.unwrap().unwrap().name,
            "Ada"
        );

        other.grant_admin(&principal("other"));
        assert_eq!(
            other.get_child_profiles(&principal("parent")).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_only_assigned_driver_moves_trip() {
        let parent = MemoryActor::new(principal("parent"));
        let driver = parent.as_caller(principal("driver"));
        let stranger = parent.as_caller(principal("stranger"));
        let trip = book(&parent).await;

        // Unassigned: nobody can start it.
        assert!(driver
            .update_trip_status(&trip, TripStatus::InProgress)
            .await
            .is_err());

        assert!(parent.assign_driver(&trip, &principal("driver")));
        assert!(stranger
            .update_trip_status(&trip, TripStatus::InProgress)
            .await
            .is_err());
        assert!(parent
            .update_trip_status(&trip, TripStatus::InProgress)
            .await
            .is_err());

        driver
            .update_trip_status(&trip, TripStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(
            parent.get_trip_status(&trip).await.unwrap(),
            Some(TripStatus::InProgress)
        );
    }

    #[tokio::test]
    async fn test_invalid_edges_rejected() {
        let parent = MemoryActor::new(principal("parent"));
        let driver = parent.as_caller(principal("driver"));
        let trip = book(&parent).await;
        parent.assign_driver(&trip, &principal("driver"));

        let err = driver
            .update_trip_status(&trip, TripStatus::Completed)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ActorError::Rejected("Invalid transition from pending to completed".to_string())
        );

        driver
            .update_trip_status(&trip, TripStatus::InProgress)
            .await
            .unwrap();
        driver
            .update_trip_status(&trip, TripStatus::Emergency)
            .await
            .unwrap();
        assert!(driver
            .update_trip_status(&trip, TripStatus::Completed)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_unknown_trip() {
        let driver = MemoryActor::new(principal("driver"));
        let missing = TripId::new("missing");
        assert_eq!(driver.get_trip_status(&missing).await.unwrap(), None);
        assert!(driver
            .update_trip_status(&missing, TripStatus::InProgress)
            .await
            .is_err());
        assert!(!driver.assign_driver(&missing, &principal("driver")));
    }

    #[tokio::test]
    async fn test_messages_and_sos_timestamped() {
        let clock = ManualClock::starting_at(1_000);
        let parent = MemoryActor::with_clock(principal("parent"), clock.clone());
        let driver = parent.as_caller(principal("driver"));

        parent
            .send_message(&principal("driver"), "Running late?".to_string())
            .await
            .unwrap();
        clock.advance(500);
        driver
            .send_message(&principal("parent"), "Five minutes".to_string())
            .await
            .unwrap();

        let thread = parent.get_messages(&principal("parent")).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].timestamp, 1_000_000_000);
        assert_eq!(thread[1].sender, principal("driver"));
        assert_eq!(thread[1].timestamp, 1_500_000_000);

        parent.trigger_sos(None).await.unwrap();
        let alerts = parent.sos_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].sender, principal("parent"));
        assert_eq!(alerts[0].location, None);
    }

    #[tokio::test]
    async fn test_driver_location_last_write_wins() {
        let driver = MemoryActor::new(principal("driver"));
        let parent = driver.as_caller(principal("parent"));
        assert_eq!(
            parent.get_driver_location(&principal("driver")).await.unwrap(),
            None
        );
        driver
            .update_driver_location(Location::new(1.0, 2.0))
            .await
            .unwrap();
        driver
            .update_driver_location(Location::new(3.0, 4.0))
            .await
            .unwrap();
        assert_eq!(
            parent.get_driver_location(&principal("driver")).await.unwrap(),
            Some(Location::new(3.0, 4.0))
        );
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot_and_counted() {
        let actor = MemoryActor::new(principal("parent"));
        actor.fail_next(
            method::IS_CALLER_ADMIN,
            ActorError::Transport("offline".to_string()),
        );

        assert_eq!(
            actor.is_caller_admin().await,
            Err(ActorError::Transport("offline".to_string()))
        );
        assert_eq!(actor.is_caller_admin().await, Ok(false));
        assert_eq!(actor.calls(method::IS_CALLER_ADMIN), 2);
        assert_eq!(actor.calls(method::GET_MESSAGES), 0);
    }
}
