//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
    pub use dioxus_free_icons::icons::fa_brands_icons::{FaApple, FaGoogle};
}

pub mod platform;

#[cfg(target_arch = "wasm32")]
mod geolocation;
#[cfg(target_arch = "wasm32")]
pub use geolocation::BrowserGeolocation;

pub mod views;

pub const SAFERIDE_CSS: Asset = asset!("/assets/saferide.css");

mod auth;
pub use auth::{use_auth, use_session_client, AuthProvider, AuthState, LoginButton, LogoutButton};

mod data;
pub use data::{
    use_config, use_data, use_poll, use_query, Access, Data, DataProvider, PlatformActor,
};

pub mod notifications;
pub use notifications::{
    notify, use_notifications, use_notifier, NoticeLevel, NotificationProvider, Notifications,
    Notifier,
};

mod format;
pub use format::{format_schedule, format_timestamp};
