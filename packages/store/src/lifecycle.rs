//! # Trip lifecycle rules
//!
//! Status transitions are driven by the backend, but the client decides which
//! actions to offer. Everything here is a pure function of trip status (and the
//! caller's role), so the views stay thin:
//!
//! - [`driver_actions`]: the buttons a driver sees on a trip card.
//! - [`can_transition`]: the role-gated transition table.
//! - [`assigned_to`]: the driver's own trips, in backend order.
//! - [`partition_for_parent`]: active / past / alert buckets for the parent view.
//! - [`TripStats`]: counts for the admin overview.
//! - [`StatusBadge`]: label and tone used to render a status.

use crate::models::{Principal, Role, TripRequest, TripStatus};

/// A status change a driver can trigger from a trip card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TripAction {
    Start,
    Complete,
    Emergency,
}

impl TripAction {
    pub fn target(&self) -> TripStatus {
        match self {
            TripAction::Start => TripStatus::InProgress,
            TripAction::Complete => TripStatus::Completed,
            TripAction::Emergency => TripStatus::Emergency,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TripAction::Start => "Start Trip",
            TripAction::Complete => "Complete",
            TripAction::Emergency => "Emergency",
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, TripAction::Emergency)
    }
}

/// Actions offered for a trip in the given status.
pub fn driver_actions(status: TripStatus) -> &'static [TripAction] {
    match status {
        TripStatus::Pending => &[TripAction::Start],
        TripStatus::InProgress => &[TripAction::Complete, TripAction::Emergency],
        TripStatus::Completed | TripStatus::Canceled | TripStatus::Emergency => &[],
    }
}

/// Whether `role` may move a trip from `from` to `to`.
///
/// Only drivers progress trips. Parents raise SOS alerts through their own
/// call, which never touches trip status.
pub fn can_transition(role: Role, from: TripStatus, to: TripStatus) -> bool {
    match role {
        Role::Driver => driver_actions(from).iter().any(|a| a.target() == to),
        Role::Parent | Role::Admin => false,
    }
}

/// Trips whose assigned driver is `driver`, preserving backend order.
pub fn assigned_to<'a>(trips: &'a [TripRequest], driver: &Principal) -> Vec<&'a TripRequest> {
    trips
        .iter()
        .filter(|t| t.driver_id.as_ref() == Some(driver))
        .collect()
}

/// Parent view buckets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripPartition {
    /// `pending` and `inProgress`.
    pub active: Vec<TripRequest>,
    /// `completed` and `canceled`.
    pub past: Vec<TripRequest>,
    /// `emergency`; in neither of the other two.
    pub alerts: Vec<TripRequest>,
}

impl TripPartition {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.past.is_empty() && self.alerts.is_empty()
    }
}

pub fn partition_for_parent(trips: &[TripRequest]) -> TripPartition {
    let mut partition = TripPartition::default();
    for trip in trips {
        let bucket = match trip.status {
            TripStatus::Pending | TripStatus::InProgress => &mut partition.active,
            TripStatus::Completed | TripStatus::Canceled => &mut partition.past,
            TripStatus::Emergency => &mut partition.alerts,
        };
        bucket.push(trip.clone());
    }
    partition
}

/// Admin overview counters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub canceled: usize,
    pub emergency: usize,
}

impl TripStats {
    pub fn from_trips(trips: &[TripRequest]) -> Self {
        let mut stats = TripStats {
            total: trips.len(),
            ..Default::default()
        };
        for trip in trips {
            match trip.status {
                TripStatus::Pending => stats.pending += 1,
                TripStatus::InProgress => stats.in_progress += 1,
                TripStatus::Completed => stats.completed += 1,
                TripStatus::Canceled => stats.canceled += 1,
                TripStatus::Emergency => stats.emergency += 1,
            }
        }
        stats
    }

    pub fn count(&self, status: TripStatus) -> usize {
        match status {
            TripStatus::Pending => self.pending,
            TripStatus::InProgress => self.in_progress,
            TripStatus::Completed => self.completed,
            TripStatus::Canceled => self.canceled,
            TripStatus::Emergency => self.emergency,
        }
    }

    /// Percentage of all trips in `status`; 0 when there are none.
    pub fn share(&self, status: TripStatus) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(status) as f64 / self.total as f64 * 100.0
    }
}

/// The first `n` trips, in backend order.
pub fn recent(trips: &[TripRequest], n: usize) -> &[TripRequest] {
    &trips[..trips.len().min(n)]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Destructive,
    Muted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl StatusBadge {
    pub fn for_status(status: TripStatus) -> Self {
        let (label, tone) = match status {
            TripStatus::Pending => ("Pending", BadgeTone::Warning),
            TripStatus::InProgress => ("On the Way", BadgeTone::Success),
            TripStatus::Emergency => ("Emergency Alert", BadgeTone::Destructive),
            TripStatus::Completed => ("Completed", BadgeTone::Muted),
            TripStatus::Canceled => ("Canceled", BadgeTone::Muted),
        };
        Self { label, tone }
    }
}
