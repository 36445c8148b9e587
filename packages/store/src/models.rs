//! # Domain models shared by every SafeRide crate
//!
//! These are the entities the client observes through the backend actor. The
//! backend owns them; the client only holds copies in the query cache. All types
//! are `Serialize + Deserialize` so they cross the RPC boundary as JSON.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Principal`] | Opaque caller identity scoping profile, trip and message queries. |
//! | [`TripId`] | Backend-assigned trip identifier, immutable and opaque. |
//! | [`Location`] | Latitude/longitude pair in floating point degrees. |
//! | [`TripStatus`] | `pending`, `inProgress`, `completed`, `canceled`, `emergency`. |
//! | [`TripRequest`] | A booked trip with its children, endpoints, schedule and driver. |
//! | [`ChildProfile`] | A child registered by a parent. |
//! | [`ChatMessage`] | One message of a parent/driver thread. |
//! | [`UserProfile`] | Caller name plus the role chosen at setup. |
//! | [`SosAlert`] | An emergency alert raised by a parent. |
//!
//! Timestamps are nanoseconds since the Unix epoch, as the backend stores them.
//! [`millis_to_nanos`] / [`nanos_to_millis`] convert to and from the millisecond
//! clock the browser exposes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Opaque caller identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Principal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidPrincipal);
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Backend-assigned trip identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A position in floating point degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reject non-finite or out-of-range coordinates.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lng_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lng_ok {
            Ok(self)
        } else {
            Err(ValidationError::MalformedCoordinates)
        }
    }

    /// `"40.0000, -73.0000"` style rendering with a fixed number of decimals.
    pub fn display(&self, precision: usize) -> String {
        format!(
            "{:.prec$}, {:.prec$}",
            self.latitude,
            self.longitude,
            prec = precision
        )
    }
}

/// Trip status as the backend reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TripStatus {
    Pending,
    InProgress,
    Completed,
    Canceled,
    Emergency,
}

impl TripStatus {
    pub const ALL: [TripStatus; 5] = [
        TripStatus::Pending,
        TripStatus::InProgress,
        TripStatus::Completed,
        TripStatus::Canceled,
        TripStatus::Emergency,
    ];

    /// Wire name, e.g. `"inProgress"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "pending",
            TripStatus::InProgress => "inProgress",
            TripStatus::Completed => "completed",
            TripStatus::Canceled => "canceled",
            TripStatus::Emergency => "emergency",
        }
    }

    /// Pending or in progress: the trip can still change under a viewer.
    pub fn is_live(&self) -> bool {
        matches!(self, TripStatus::Pending | TripStatus::InProgress)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub id: TripId,
    pub parent_id: Principal,
    pub children_ids: Vec<String>,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    /// Nanoseconds since the Unix epoch.
    pub scheduled_time: u64,
    pub driver_id: Option<Principal>,
    pub status: TripStatus,
}

impl TripRequest {
    /// First eight characters of the id, for card titles.
    pub fn short_id(&self) -> &str {
        let id = self.id.as_str();
        match id.char_indices().nth(8) {
            Some((idx, _)) => &id[..idx],
            None => id,
        }
    }

    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        nanos_to_datetime(self.scheduled_time)
    }

    /// "1 child" / "3 children" with a caller-chosen noun pair.
    pub fn headcount(&self, singular: &str, plural: &str) -> String {
        let n = self.children_ids.len();
        format!("{n} {}", if n == 1 { singular } else { plural })
    }
}

/// A child registered by a parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub allergies: Option<String>,
    pub emergency_contact: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Principal,
    pub receiver: Principal,
    pub message: String,
    /// Nanoseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Role the caller picked when setting up their profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Parent,
    Driver,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Parent => "Parent",
            Role::Driver => "Driver",
            Role::Admin => "Admin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SosAlert {
    pub sender: Principal,
    pub location: Option<Location>,
    pub timestamp: u64,
}

pub fn millis_to_nanos(millis: u64) -> u64 {
    millis.saturating_mul(NANOS_PER_MILLI)
}

pub fn nanos_to_millis(nanos: u64) -> u64 {
    nanos / NANOS_PER_MILLI
}

pub fn nanos_to_datetime(nanos: u64) -> Option<DateTime<Utc>> {
    let millis = i64::try_from(nanos_to_millis(nanos)).ok()?;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(id: &str, children: usize) -> TripRequest {
        TripRequest {
            id: TripId::new(id),
            parent_id: Principal::new("parent"),
            children_ids: (0..children).map(|i| format!("kid{i}")).collect(),
            pickup_location: Location::new(40.0, -73.0),
            dropoff_location: Location::new(40.1, -73.1),
            scheduled_time: 0,
            driver_id: None,
            status: TripStatus::Pending,
        }
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&TripStatus::InProgress).unwrap();
        assert_eq!(json, "\"inProgress\"");
        let parsed: TripStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(parsed, TripStatus::Canceled);
        for status in TripStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_live_statuses() {
        let live: Vec<TripStatus> = TripStatus::ALL.into_iter().filter(|s| s.is_live()).collect();
        assert_eq!(live, vec![TripStatus::Pending, TripStatus::InProgress]);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(trip("0123456789abcdef", 1).short_id(), "01234567");
        assert_eq!(trip("abc", 1).short_id(), "abc");
    }

    #[test]
    fn test_headcount() {
        assert_eq!(trip("t", 1).headcount("child", "children"), "1 child");
        assert_eq!(trip("t", 3).headcount("child", "children"), "3 children");
    }

    #[test]
    fn test_location_validate() {
        assert!(Location::new(40.0, -73.0).validate().is_ok());
        assert_eq!(
            Location::new(91.0, 0.0).validate(),
            Err(ValidationError::MalformedCoordinates)
        );
        assert!(Location::new(f64::NAN, 0.0).validate().is_err());
        assert!(Location::new(0.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new(40.0, -73.0).display(4), "40.0000, -73.0000");
    }

    #[test]
    fn test_principal_parse() {
        assert_eq!("  abc-123 ".parse::<Principal>().unwrap().as_str(), "abc-123");
        assert!("   ".parse::<Principal>().is_err());
    }

    #[test]
    fn test_nanos_conversion() {
        assert_eq!(millis_to_nanos(1_700_000_000_000), 1_700_000_000_000_000_000);
        assert_eq!(nanos_to_millis(1_500_000), 1);
        let dt = nanos_to_datetime(millis_to_nanos(86_400_000)).unwrap();
        assert_eq!(dt.to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_trip_request_json_shape() {
        let json = serde_json::to_value(trip("t1", 1)).unwrap();
        assert_eq!(json["childrenIds"][0], "kid0");
        assert_eq!(json["pickupLocation"]["latitude"], 40.0);
        assert_eq!(json["status"], "pending");
        assert!(json["driverId"].is_null());
    }
}
