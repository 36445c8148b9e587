use dioxus::prelude::*;

use crate::components::{Alert, Card, CardContent, CardDescription, CardHeader, CardTitle};

const ROLES: [(&str, &str); 3] = [
    (
        "Admin",
        "Full system access including user management, trip monitoring, and system configuration.",
    ),
    (
        "User (Parent/Driver)",
        "Standard user access for parents to book trips and drivers to manage routes.",
    ),
    (
        "Guest",
        "Limited access for unauthenticated users. Cannot access application features.",
    ),
];

#[component]
pub fn UserManagement() -> Element {
    rsx! {
        div { class: "view-section",
            Card {
                CardHeader {
                    CardTitle { "User Management" }
                    CardDescription { "Manage user accounts, roles, and permissions" }
                }
                CardContent {
                    Alert { title: "Feature In Development",
                        "User management interface is currently under development. Roles are assigned through the backend's role API."
                    }
                }
            }
            Card {
                CardHeader {
                    CardTitle { "Available Roles" }
                    CardDescription { "System roles and their permissions" }
                }
                CardContent { class: "role-list",
                    for (name, text) in ROLES {
                        div { key: "{name}", class: "role-entry",
                            h3 { "{name}" }
                            p { class: "view-muted", "{text}" }
                        }
                    }
                }
            }
        }
    }
}
