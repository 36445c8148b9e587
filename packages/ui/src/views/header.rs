use dioxus::prelude::*;

use crate::components::Avatar;
use crate::icons::{FaBus, FaHeart, FaRightFromBracket};
use crate::{use_auth, use_query, Icon, LogoutButton};

/// App bar: brand, the caller's profile name and logout when signed in.
#[component]
pub fn Header() -> Element {
    let auth = use_auth();
    let profile = use_query(|data| async move { data.caller_user_profile().await });

    let name = match &*profile.read() {
        Some(Ok(Some(p))) => Some(p.name.clone()),
        _ => None,
    };

    rsx! {
        header { class: "app-header",
            div { class: "app-header-brand",
                Icon { icon: FaBus, width: 28, height: 28 }
                h1 { "SafeRide" }
            }
            if auth().is_authenticated() {
                div { class: "app-header-session",
                    if let Some(name) = name {
                        div { class: "app-header-user",
                            Avatar { name: name.clone() }
                            span { "{name}" }
                        }
                    }
                    span { class: "app-header-logout",
                        Icon { icon: FaRightFromBracket, width: 14, height: 14 }
                        LogoutButton { class: "btn btn-outline btn-sm" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn Footer(on_privacy: EventHandler<()>) -> Element {
    rsx! {
        footer { class: "app-footer",
            p {
                "© 2025. Built with "
                span { class: "app-footer-heart", aria_hidden: "true",
                    Icon { icon: FaHeart, width: 12, height: 12 }
                }
                " for safer school runs."
            }
            button {
                class: "link-button",
                onclick: move |_| on_privacy.call(()),
                "Privacy Policy"
            }
        }
    }
}
