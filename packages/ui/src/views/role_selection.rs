use dioxus::prelude::*;
use store::roles::{available_roles, Session};
use store::Role;

use crate::components::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    Spinner,
};
use crate::icons::{FaBus, FaChildReaching, FaUserShield};
use crate::{use_query, Icon};

use super::RoleDashboard;

struct RoleCard {
    title: &'static str,
    description: &'static str,
    features: &'static [&'static str],
}

fn card_for(role: Role) -> RoleCard {
    match role {
        Role::Parent => RoleCard {
            title: "Parent",
            description: "Book trips and track your children",
            features: &[
                "Book pick-up and drop-off requests",
                "Track driver location in real-time",
                "Manage child profiles",
                "Chat with drivers",
                "Emergency SOS alerts",
            ],
        },
        Role::Driver => RoleCard {
            title: "Driver",
            description: "Manage routes and student pickups",
            features: &[
                "View assigned routes",
                "Update trip status",
                "Share live location",
                "Chat with parents",
            ],
        },
        Role::Admin => RoleCard {
            title: "Admin",
            description: "Manage system and users",
            features: &[
                "Manage user accounts",
                "Monitor all trips",
                "View analytics dashboard",
                "Download project bundle",
            ],
        },
    }
}

/// Role picker; the chosen role is kept for this page session only.
///
/// Admin is offered only when the backend says so. A failed admin check reads
/// as "not an admin".
#[component]
pub fn RoleSelection() -> Element {
    let mut selected = use_signal(|| Option::<Session>::None);
    let admin = use_query(|data| async move { data.is_caller_admin().await });

    let is_admin = match &*admin.read() {
        None => {
            return rsx! {
                div { class: "view-center", Spinner { label: "Checking your access..." } }
            };
        }
        Some(Ok(is_admin)) => *is_admin,
        Some(Err(e)) => {
            tracing::warn!("Admin check failed, continuing without admin role: {e}");
            false
        }
    };

    if let Some(session) = selected() {
        return rsx! {
            RoleDashboard { session, on_back: move |_| selected.set(None) }
        };
    }

    let roles = available_roles(is_admin);
    let grid_class = if roles.len() == 3 { "role-grid three" } else { "role-grid" };

    rsx! {
        div { class: "view-page role-selection",
            div { class: "view-heading",
                h2 { class: "view-title", "Choose Your Role" }
                p { class: "view-muted", "Select how you want to use SafeRide" }
            }
            div { class: grid_class,
                for role in roles {
                    RoleOption {
                        key: "{role.label()}",
                        role,
                        on_pick: move |role: Role| {
                            if let Some(session) = Session::resolve(role, is_admin) {
                                tracing::info!(role = role.label(), "role selected");
                                selected.set(Some(session));
                            }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn RoleOption(role: Role, on_pick: EventHandler<Role>) -> Element {
    let card = card_for(role);
    let variant = if role == Role::Admin {
        ButtonVariant::Secondary
    } else {
        ButtonVariant::Primary
    };

    rsx! {
        div { class: "role-card", onclick: move |_| on_pick.call(role),
            Card {
                CardHeader {
                    span { class: "role-card-icon",
                        match role {
                            Role::Parent => rsx! { Icon { icon: FaChildReaching, width: 48, height: 48 } },
                            Role::Driver => rsx! { Icon { icon: FaBus, width: 48, height: 48 } },
                            Role::Admin => rsx! { Icon { icon: FaUserShield, width: 48, height: 48 } },
                        }
                    }
                    CardTitle { "{card.title}" }
                    CardDescription { "{card.description}" }
                }
                CardContent {
                    ul { class: "role-features",
                        for feature in card.features.iter() {
                            li { "{feature}" }
                        }
                    }
                    Button { variant, size: ButtonSize::Large, class: "w-full",
                        "Continue as {card.title}"
                    }
                }
            }
        }
    }
}
