//! Authentication context and hooks for the UI.

use std::time::Duration;

use api::{Identity, SessionClient};
use dioxus::prelude::*;

use crate::data::{use_config, use_data};
use crate::platform;

const SESSION_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub identity: Option<Identity>,
    pub loading: bool,
    /// Whether the backend answered the last session check.
    pub online: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            identity: None,
            loading: true,
            online: false,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_session_client() -> SessionClient {
    use_context::<SessionClient>()
}

/// Provider component that manages authentication state.
/// Must be mounted below the config context.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let config = use_config();
    let client = use_context_provider(|| SessionClient::new(config.backend.url.clone()));
    let mut auth_state = use_signal(AuthState::default);

    // Fetch the current identity on mount
    let initial = client.clone();
    let _ = use_resource(move || {
        let client = initial.clone();
        async move {
            match client.current().await {
                Ok(identity) => {
                    tracing::info!(signed_in = identity.is_some(), "session loaded");
                    auth_state.set(AuthState {
                        identity,
                        loading: false,
                        online: true,
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to load session: {e}");
                    auth_state.set(AuthState {
                        identity: None,
                        loading: false,
                        online: false,
                    });
                }
            }
        }
    });

    // Periodic session check (every 30s)
    use_effect(move || {
        let client = client.clone();
        spawn(async move {
            loop {
                platform::sleep(SESSION_CHECK_INTERVAL).await;

                // Don't check while initial load is still in progress
                if auth_state.peek().loading {
                    continue;
                }
                match client.current().await {
                    Ok(identity) => {
                        let current = auth_state.peek().clone();
                        if current.identity != identity || !current.online {
                            tracing::info!(signed_in = identity.is_some(), "session changed");
                            auth_state.set(AuthState {
                                identity,
                                loading: false,
                                online: true,
                            });
                        }
                    }
                    Err(e) => {
                        if auth_state.peek().online {
                            tracing::warn!("Backend unreachable: {e}");
                            let current = auth_state.peek().clone();
                            auth_state.set(AuthState {
                                online: false,
                                ..current
                            });
                        }
                    }
                }
            }
        });
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button that sends the browser to the backend's sign-in page.
#[component]
pub fn LoginButton(
    #[props(default = "Login".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let client = use_session_client();
    let mut loading = use_signal(|| false);

    let onclick = move |_| {
        loading.set(true);
        platform::redirect(&client.login_url());
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            if loading() {
                "Connecting..."
            } else {
                "{label}"
            }
        }
    }
}

/// Button to log out the current user. Drops every cached query.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth_state = use_auth();
    let client = use_session_client();
    let data = use_data();

    let onclick = move |_| {
        let client = client.clone();
        async move {
            if let Err(e) = client.logout().await {
                tracing::error!("Logout failed: {e}");
            }
            data.peek().clear();
            let online = auth_state.peek().online;
            auth_state.set(AuthState {
                identity: None,
                loading: false,
                online,
            });
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
