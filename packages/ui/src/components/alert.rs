use dioxus::prelude::*;

use crate::icons::{FaCircleExclamation, FaCircleInfo};
use crate::Icon;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlertVariant {
    #[default]
    Info,
    Destructive,
}

#[component]
pub fn Alert(
    #[props(default)] variant: AlertVariant,
    #[props(default)] title: String,
    children: Element,
) -> Element {
    let class = match variant {
        AlertVariant::Info => "alert alert-info",
        AlertVariant::Destructive => "alert alert-destructive",
    };
    rsx! {
        div { class, role: "alert",
            span { class: "alert-icon",
                match variant {
                    AlertVariant::Info => rsx! { Icon { icon: FaCircleInfo, width: 16, height: 16 } },
                    AlertVariant::Destructive => rsx! { Icon { icon: FaCircleExclamation, width: 16, height: 16 } },
                }
            }
            div { class: "alert-body",
                if !title.is_empty() {
                    p { class: "alert-title", "{title}" }
                }
                div { class: "alert-description", {children} }
            }
        }
    }
}
