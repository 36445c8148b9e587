use dioxus::prelude::*;

#[component]
pub fn Input(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default)] step: String,
    #[props(default)] disabled: bool,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        input {
            id: "{id}",
            class: "input {class}",
            r#type: "{r#type}",
            placeholder: "{placeholder}",
            value: "{value}",
            step: "{step}",
            disabled,
            oninput: move |evt| {
                if let Some(handler) = &oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextareaVariant {
    #[default]
    Default,
    Outline,
}

#[component]
pub fn Textarea(
    #[props(default)] id: String,
    #[props(default)] variant: TextareaVariant,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default = 3)] rows: u32,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    let variant_class = match variant {
        TextareaVariant::Default => "textarea",
        TextareaVariant::Outline => "textarea textarea-outline",
    };
    rsx! {
        textarea {
            id: "{id}",
            class: variant_class,
            placeholder: "{placeholder}",
            rows: "{rows}",
            value: "{value}",
            oninput: move |evt| {
                if let Some(handler) = &oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

#[component]
pub fn Label(#[props(default)] html_for: String, children: Element) -> Element {
    rsx! {
        label { class: "label", r#for: "{html_for}", {children} }
    }
}

/// Checkbox with an inline label.
#[component]
pub fn Checkbox(
    id: String,
    checked: bool,
    label: String,
    onchange: EventHandler<bool>,
) -> Element {
    rsx! {
        div { class: "checkbox-row",
            input {
                id: "{id}",
                r#type: "checkbox",
                checked,
                onchange: move |evt: FormEvent| onchange.call(evt.checked()),
            }
            label { r#for: "{id}", "{label}" }
        }
    }
}
