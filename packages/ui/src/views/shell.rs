use dioxus::prelude::*;

use crate::components::{Alert, AlertVariant, Button, ButtonVariant, Spinner};
use crate::{use_auth, use_query};

use super::{Footer, Header, LoginScreen, PrivacyNoticeBanner, ProfileSetup, RoleSelection};

/// The whole signed-in/signed-out flow below the router.
///
/// `on_privacy` opens the privacy policy; the platform package decides how.
#[component]
pub fn AppShell(on_privacy: EventHandler<()>) -> Element {
    let auth = use_auth();
    let state = auth();

    rsx! {
        div { class: "app-shell",
            Header {}
            main { class: "app-main",
                if state.loading {
                    div { class: "view-center", Spinner { label: "Loading..." } }
                } else if state.is_authenticated() {
                    SignedIn {}
                } else {
                    LoginScreen { on_privacy }
                }
            }
            Footer { on_privacy }
            PrivacyNoticeBanner {}
        }
    }
}

/// Profile gate: setup until a profile exists, then role selection.
#[component]
fn SignedIn() -> Element {
    let mut profile = use_query(|data| async move { data.caller_user_profile().await });

    let view = match &*profile.read() {
        None => rsx! {
            div { class: "view-center", Spinner { label: "Loading your profile..." } }
        },
        Some(Ok(None)) => rsx! { ProfileSetup {} },
        Some(Ok(Some(_))) => rsx! { RoleSelection {} },
        Some(Err(e)) => rsx! {
            div { class: "view-center",
                Alert { variant: AlertVariant::Destructive, title: "Could not load your profile",
                    "{e}"
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| profile.restart(),
                    "Try again"
                }
            }
        },
    };
    view
}
