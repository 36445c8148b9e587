use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct TabItem {
    pub value: String,
    pub label: String,
}

impl TabItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Tab strip; the caller renders the panel for `selected`.
#[component]
pub fn Tabs(
    items: Vec<TabItem>,
    selected: String,
    on_select: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "tabs-list", role: "tablist",
            for item in items {
                button {
                    key: "{item.value}",
                    class: if item.value == selected { "tab-trigger active" } else { "tab-trigger" },
                    role: "tab",
                    r#type: "button",
                    onclick: {
                        let value = item.value.clone();
                        move |_| on_select.call(value.clone())
                    },
                    "{item.label}"
                }
            }
        }
    }
}
