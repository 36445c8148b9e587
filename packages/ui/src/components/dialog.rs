use dioxus::prelude::*;

use crate::icons::FaXmark;
use crate::Icon;

/// A full-screen overlay that centers a titled card.
/// Clicking outside the card or the close button triggers `on_close`.
#[component]
pub fn Dialog(
    title: String,
    #[props(default)] description: String,
    on_close: EventHandler<()>,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "dialog-overlay",
            onclick: move |_| on_close.call(()),
            div {
                class: "dialog",
                role: "dialog",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                div { class: "dialog-header",
                    h2 { class: "dialog-title", "{title}" }
                    button {
                        class: "dialog-close",
                        r#type: "button",
                        title: "Close",
                        onclick: move |_| on_close.call(()),
                        Icon { icon: FaXmark, width: 14, height: 14 }
                    }
                }
                if !description.is_empty() {
                    p { class: "dialog-description", "{description}" }
                }
                {children}
            }
        }
    }
}
