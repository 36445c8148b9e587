use dioxus::prelude::*;

#[component]
pub fn Spinner(#[props(default)] label: String) -> Element {
    rsx! {
        div { class: "spinner-wrap",
            span { class: "spinner", aria_hidden: "true" }
            if !label.is_empty() {
                span { class: "spinner-label", "{label}" }
            }
        }
    }
}
