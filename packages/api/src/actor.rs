//! # The backend actor's RPC surface
//!
//! [`Actor`] is the client's only view of the backend: every method is one
//! asynchronous remote call that may fail with [`ActorError`]. The backend is the
//! sole arbiter of state; implementations never cache.
//!
//! | Method | Purpose |
//! |--------|---------|
//! | `get_caller_user_profile` | caller's profile, `None` if unset |
//! | `save_caller_user_profile` | create/update caller's profile |
//! | `is_caller_admin` | role check |
//! | `get_child_profiles` / `get_child_profile` | children of a parent / one child |
//! | `create_child_profile` | add a child |
//! | `get_trip_requests_by_parent` / `get_all_trip_requests` | trip lists |
//! | `create_trip_request` | book a trip |
//! | `get_trip_status` / `update_trip_status` | read / transition a trip |
//! | `update_driver_location` / `get_driver_location` | driver position |
//! | `get_messages` / `send_message` | chat |
//! | `trigger_sos` | emergency alert |
//!
//! Implementations: [`crate::HttpActor`] (JSON-RPC over HTTP) and
//! [`crate::MemoryActor`] (in-process, for tests and offline use).

use std::future::Future;

use store::{
    ChatMessage, ChildProfile, Location, Principal, TripId, TripRequest, TripStatus, UserProfile,
};

use crate::error::ActorError;

pub type ActorResult<T> = Result<T, ActorError>;

/// Wire names of the backend methods.
pub mod method {
    pub const GET_CALLER_USER_PROFILE: &str = "getCallerUserProfile";
    pub const SAVE_CALLER_USER_PROFILE: &str = "saveCallerUserProfile";
    pub const IS_CALLER_ADMIN: &str = "isCallerAdmin";
    pub const GET_CHILD_PROFILES: &str = "getChildProfiles";
    pub const GET_CHILD_PROFILE: &str = "getChildProfile";
    pub const CREATE_CHILD_PROFILE: &str = "createChildProfile";
    pub const GET_TRIP_REQUESTS_BY_PARENT: &str = "getTripRequestsByParent";
    pub const CREATE_TRIP_REQUEST: &str = "createTripRequest";
    pub const GET_ALL_TRIP_REQUESTS: &str = "getAllTripRequests";
    pub const GET_TRIP_STATUS: &str = "getTripStatus";
    pub const UPDATE_TRIP_STATUS: &str = "updateTripStatus";
    pub const UPDATE_DRIVER_LOCATION: &str = "updateDriverLocation";
    pub const GET_DRIVER_LOCATION: &str = "getDriverLocation";
    pub const GET_MESSAGES: &str = "getMessages";
    pub const SEND_MESSAGE: &str = "sendMessage";
    pub const TRIGGER_SOS: &str = "triggerSOS";
}

pub trait Actor {
    fn get_caller_user_profile(&self) -> impl Future<Output = ActorResult<Option<UserProfile>>>;

    fn save_caller_user_profile(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = ActorResult<()>>;

    fn is_caller_admin(&self) -> impl Future<Output = ActorResult<bool>>;

    fn get_child_profiles(
        &self,
        parent: &Principal,
    ) -> impl Future<Output = ActorResult<Vec<ChildProfile>>>;

    fn get_child_profile(
        &self,
        child_id: &str,
    ) -> impl Future<Output = ActorResult<Option<ChildProfile>>>;

    /// Returns the new child's id.
    fn create_child_profile(
        &self,
        name: String,
        grade: String,
        allergies: Option<String>,
        emergency_contact: String,
    ) -> impl Future<Output = ActorResult<String>>;

    fn get_trip_requests_by_parent(
        &self,
        parent: &Principal,
    ) -> impl Future<Output = ActorResult<Vec<TripRequest>>>;

    /// `scheduled_time` is in nanoseconds since the Unix epoch.
    fn create_trip_request(
        &self,
        children_ids: Vec<String>,
        pickup: Location,
        dropoff: Location,
        scheduled_time: u64,
    ) -> impl Future<Output = ActorResult<TripId>>;

    fn get_all_trip_requests(&self) -> impl Future<Output = ActorResult<Vec<TripRequest>>>;

    fn get_trip_status(
        &self,
        trip: &TripId,
    ) -> impl Future<Output = ActorResult<Option<TripStatus>>>;

    fn update_trip_status(
        &self,
        trip: &TripId,
        status: TripStatus,
    ) -> impl Future<Output = ActorResult<()>>;

    fn update_driver_location(&self, location: Location) -> impl Future<Output = ActorResult<()>>;

    fn get_driver_location(
        &self,
        driver: &Principal,
    ) -> impl Future<Output = ActorResult<Option<Location>>>;

    fn get_messages(
        &self,
        principal: &Principal,
    ) -> impl Future<Output = ActorResult<Vec<ChatMessage>>>;

    fn send_message(
        &self,
        receiver: &Principal,
        text: String,
    ) -> impl Future<Output = ActorResult<()>>;

    fn trigger_sos(&self, location: Option<Location>) -> impl Future<Output = ActorResult<()>>;
}
