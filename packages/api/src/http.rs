//! # JSON-RPC actor over HTTP
//!
//! Each [`Actor`] method becomes `POST {base}/rpc/{method}` with the positional
//! arguments as a JSON array and the caller's token as a bearer header. The
//! response body is the method's return value as JSON (`null` for unit).
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx | body decoded with serde_json |
//! | 401 | [`ActorError::Unauthorized`] |
//! | other | [`ActorError::Rejected`] with the body text |
//! | no response | [`ActorError::Transport`] |
//!
//! Without an [`Identity`] every call fails with [`ActorError::NotAvailable`]
//! before anything is sent.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use store::{
    ChatMessage, ChildProfile, Location, Principal, TripId, TripRequest, TripStatus, UserProfile,
};

use crate::actor::{method, Actor, ActorResult};
use crate::error::ActorError;
use crate::session::Identity;

#[derive(Clone, Debug)]
pub struct HttpActor {
    client: reqwest::Client,
    base_url: String,
    identity: Option<Identity>,
}

impl HttpActor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/rpc/{}", self.base_url, method)
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, args: Value) -> ActorResult<R> {
        let identity = self.identity.as_ref().ok_or(ActorError::NotAvailable)?;
        tracing::debug!(method, "actor call");

        let response = self
            .client
            .post(self.endpoint(method))
            .bearer_auth(&identity.token)
            .json(&args)
            .send()
            .await
            .map_err(|e| ActorError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ActorError::Unauthorized);
        }
        let body = response
            .text()
            .await
            .map_err(|e| ActorError::Transport(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(method, %status, "actor call rejected");
            return Err(ActorError::Rejected(if body.is_empty() {
                status.to_string()
            } else {
                body
            }));
        }
        decode(&body)
    }
}

fn decode<R: DeserializeOwned>(body: &str) -> ActorResult<R> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ActorError::Decode(e.to_string()))
}

impl Actor for HttpActor {
    async fn get_caller_user_profile(&self) -> ActorResult<Option<UserProfile>> {
        self.call(method::GET_CALLER_USER_PROFILE, json!([])).await
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> ActorResult<()> {
        self.call(method::SAVE_CALLER_USER_PROFILE, json!([profile]))
            .await
    }

    async fn is_caller_admin(&self) -> ActorResult<bool> {
        self.call(method::IS_CALLER_ADMIN, json!([])).await
    }

    async fn get_child_profiles(&self, parent: &Principal) -> ActorResult<Vec<ChildProfile>> {
        self.call(method::GET_CHILD_PROFILES, json!([parent])).await
    }

    async fn get_child_profile(&self, child_id: &str) -> ActorResult<Option<ChildProfile>> {
        self.call(method::GET_CHILD_PROFILE, json!([child_id])).await
    }

    async fn create_child_profile(
        &self,
        name: String,
        grade: String,
        allergies: Option<String>,
        emergency_contact: String,
    ) -> ActorResult<String> {
        self.call(
            method::CREATE_CHILD_PROFILE,
            json!([name, grade, allergies, emergency_contact]),
        )
        .await
    }

    async fn get_trip_requests_by_parent(
        &self,
        parent: &Principal,
    ) -> ActorResult<Vec<TripRequest>> {
        self.call(method::GET_TRIP_REQUESTS_BY_PARENT, json!([parent]))
            .await
    }

    async fn create_trip_request(
        &self,
        children_ids: Vec<String>,
        pickup: Location,
        dropoff: Location,
        scheduled_time: u64,
    ) -> ActorResult<TripId> {
        self.call(
            method::CREATE_TRIP_REQUEST,
            json!([children_ids, pickup, dropoff, scheduled_time]),
        )
        .await
    }

    async fn get_all_trip_requests(&self) -> ActorResult<Vec<TripRequest>> {
        self.call(method::GET_ALL_TRIP_REQUESTS, json!([])).await
    }

    async fn get_trip_status(&self, trip: &TripId) -> ActorResult<Option<TripStatus>> {
        self.call(method::GET_TRIP_STATUS, json!([trip])).await
    }

    async fn update_trip_status(&self, trip: &TripId, status: TripStatus) -> ActorResult<()> {
        self.call(method::UPDATE_TRIP_STATUS, json!([trip, status]))
            .await
    }

    async fn update_driver_location(&self, location: Location) -> ActorResult<()> {
        self.call(method::UPDATE_DRIVER_LOCATION, json!([location]))
            .await
    }

    async fn get_driver_location(&self, driver: &Principal) -> ActorResult<Option<Location>> {
        self.call(method::GET_DRIVER_LOCATION, json!([driver])).await
    }

    async fn get_messages(&self, principal: &Principal) -> ActorResult<Vec<ChatMessage>> {
        self.call(method::GET_MESSAGES, json!([principal])).await
    }

    async fn send_message(&self, receiver: &Principal, text: String) -> ActorResult<()> {
        self.call(method::SEND_MESSAGE, json!([receiver, text])).await
    }

    async fn trigger_sos(&self, location: Option<Location>) -> ActorResult<()> {
        self.call(method::TRIGGER_SOS, json!([location])).await
    }
}
