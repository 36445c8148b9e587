use dioxus::prelude::*;

use crate::icons::{FaChevronDown, FaChevronRight};
use crate::Icon;

#[component]
pub fn Collapsible(
    title: String,
    #[props(default)] open: bool,
    children: Element,
) -> Element {
    let mut expanded = use_signal(|| open);

    rsx! {
        div { class: "collapsible",
            button {
                class: "collapsible-trigger",
                r#type: "button",
                onclick: move |_| expanded.toggle(),
                if expanded() {
                    Icon { icon: FaChevronDown, width: 12, height: 12 }
                } else {
                    Icon { icon: FaChevronRight, width: 12, height: 12 }
                }
                span { "{title}" }
            }
            if expanded() {
                div { class: "collapsible-content", {children} }
            }
        }
    }
}
