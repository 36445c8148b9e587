use dioxus::prelude::*;
use store::roles::{DashboardTab, Session};
use store::Role;

use crate::components::{Alert, Button, ButtonSize, ButtonVariant, TabItem, Tabs};
use crate::icons::FaArrowLeft;
use crate::Icon;

use super::{
    AssignedRoutes, ChildrenManagement, DriverChat, LocationSharingView, ParentChat,
    ProjectExport, SystemOverview, TripBooking, TripTracking, UserManagement,
};

fn heading(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Parent => ("Parent Dashboard", "Manage your children's transportation"),
        Role::Driver => ("Driver Dashboard", "Manage your routes and students"),
        Role::Admin => (
            "Admin Dashboard",
            "Manage system, users, and download project files",
        ),
    }
}

/// Tabbed dashboard for a resolved session. The first tab is selected on entry.
#[component]
pub fn RoleDashboard(session: Session, on_back: EventHandler<()>) -> Element {
    let tabs = session.tabs();
    let mut active = use_signal(|| tabs[0]);
    let (title, subtitle) = heading(session.role);

    let items: Vec<TabItem> = tabs
        .iter()
        .map(|tab| TabItem::new(tab.label(), tab.label()))
        .collect();

    rsx! {
        div { class: "view-page dashboard",
            div { class: "dashboard-header",
                Button {
                    variant: ButtonVariant::Ghost,
                    size: ButtonSize::Small,
                    onclick: move |_| on_back.call(()),
                    Icon { icon: FaArrowLeft, width: 14, height: 14 }
                    " Back"
                }
                div {
                    h2 { class: "view-title", "{title}" }
                    p { class: "view-muted", "{subtitle}" }
                }
            }

            if session.role == Role::Admin {
                Alert { title: "Administrator Access",
                    "You have full administrative privileges. Use these tools responsibly to manage the SafeRide system."
                }
            }

            Tabs {
                items,
                selected: active().label().to_string(),
                on_select: move |label: String| {
                    if let Some(tab) = tabs.iter().find(|t| t.label() == label) {
                        active.set(*tab);
                    }
                },
            }

            div { class: "tab-panel", role: "tabpanel",
                match active() {
                    DashboardTab::Children => rsx! { ChildrenManagement {} },
                    DashboardTab::BookTrip => rsx! { TripBooking {} },
                    DashboardTab::TrackTrips => rsx! { TripTracking {} },
                    DashboardTab::Messages if session.role == Role::Driver => rsx! { DriverChat {} },
                    DashboardTab::Messages => rsx! { ParentChat {} },
                    DashboardTab::Routes => rsx! { AssignedRoutes {} },
                    DashboardTab::Location => rsx! { LocationSharingView {} },
                    DashboardTab::Overview => rsx! { SystemOverview {} },
                    DashboardTab::Users => rsx! { UserManagement {} },
                    DashboardTab::Export => rsx! { ProjectExport {} },
                }
            }
        }
    }
}
