//! Landing route: the whole signed-in/signed-out flow.

use dioxus::prelude::*;
use ui::views::AppShell;

use crate::Route;

#[component]
pub fn Home() -> Element {
    let nav = use_navigator();

    rsx! {
        AppShell {
            on_privacy: move |_| {
                nav.push(Route::Privacy {});
            },
        }
    }
}
