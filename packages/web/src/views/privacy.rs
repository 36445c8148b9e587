use dioxus::prelude::*;
use ui::views::PrivacyPolicyView;

use crate::Route;

/// Full privacy policy page. Back returns to the previous page, or home when
/// the policy was opened directly.
#[component]
pub fn Privacy() -> Element {
    let nav = use_navigator();

    rsx! {
        PrivacyPolicyView {
            on_close: move |_| {
                if nav.can_go_back() {
                    nav.go_back();
                } else {
                    nav.replace(Route::Home {});
                }
            },
        }
    }
}
