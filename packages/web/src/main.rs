use dioxus::prelude::*;

use store::SafeRideConfig;
use ui::{AuthProvider, DataProvider, NotificationProvider};
use views::{Home, Privacy};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/privacy")]
    Privacy {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Built into the bundle; edit and rebuild to point at another backend.
const CONFIG_TOML: &str = include_str!("../saferide.toml");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

fn load_config() -> SafeRideConfig {
    match SafeRideConfig::from_toml(CONFIG_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{} is invalid, using defaults: {e}", SafeRideConfig::filename());
            SafeRideConfig::default()
        }
    }
}

#[component]
fn App() -> Element {
    use_context_provider(load_config);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ui::SAFERIDE_CSS }

        NotificationProvider {
            AuthProvider {
                DataProvider {
                    Router::<Route> {}
                }
            }
        }
    }
}
