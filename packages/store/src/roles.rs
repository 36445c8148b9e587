//! Role resolution and dashboard composition.
//!
//! The caller's role is resolved once per session into a closed [`Role`]
//! variant; the set of dashboard tabs is then a pure function of it.

use crate::models::Role;

/// Roles offered on the selection screen.
pub fn available_roles(is_admin: bool) -> Vec<Role> {
    let mut roles = vec![Role::Parent, Role::Driver];
    if is_admin {
        roles.push(Role::Admin);
    }
    roles
}

/// The resolved session role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub is_admin: bool,
}

impl Session {
    /// `None` when `selected` is not available to this caller.
    pub fn resolve(selected: Role, is_admin: bool) -> Option<Self> {
        if available_roles(is_admin).contains(&selected) {
            Some(Self {
                role: selected,
                is_admin,
            })
        } else {
            None
        }
    }

    pub fn tabs(&self) -> &'static [DashboardTab] {
        dashboard_tabs(self.role)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DashboardTab {
    Children,
    BookTrip,
    TrackTrips,
    Messages,
    Routes,
    Location,
    Overview,
    Users,
    Export,
}

impl DashboardTab {
    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Children => "Children",
            DashboardTab::BookTrip => "Book Trip",
            DashboardTab::TrackTrips => "Track Trips",
            DashboardTab::Messages => "Messages",
            DashboardTab::Routes => "Routes",
            DashboardTab::Location => "Location",
            DashboardTab::Overview => "System Overview",
            DashboardTab::Users => "User Management",
            DashboardTab::Export => "Project Export",
        }
    }
}

/// Tabs for a role; the first one is selected by default.
pub fn dashboard_tabs(role: Role) -> &'static [DashboardTab] {
    match role {
        Role::Parent => &[
            DashboardTab::Children,
            DashboardTab::BookTrip,
            DashboardTab::TrackTrips,
            DashboardTab::Messages,
        ],
        Role::Driver => &[
            DashboardTab::Routes,
            DashboardTab::Location,
            DashboardTab::Messages,
        ],
        Role::Admin => &[
            DashboardTab::Overview,
            DashboardTab::Users,
            DashboardTab::Export,
        ],
    }
}
