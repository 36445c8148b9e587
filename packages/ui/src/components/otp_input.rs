use dioxus::prelude::*;
use store::otp::{otp_layout, OtpEntry, OtpSlot};

/// Passcode entry: a transparent numeric input laid over one box per digit.
#[component]
pub fn OtpInput(
    entry: OtpEntry,
    on_change: EventHandler<OtpEntry>,
    #[props(default = 3)] separator_every: usize,
) -> Element {
    let slots = otp_layout(entry.len(), separator_every);
    let active = entry.active_index();

    rsx! {
        div { class: "otp",
            input {
                class: "otp-capture",
                r#type: "text",
                inputmode: "numeric",
                autocomplete: "one-time-code",
                maxlength: "{entry.len()}",
                value: "{entry.value()}",
                oninput: {
                    let entry = entry.clone();
                    move |evt: FormEvent| {
                        let mut next = entry.clone();
                        next.set(&evt.value());
                        on_change.call(next);
                    }
                },
            }
            div { class: "otp-slots", aria_hidden: "true",
                for (pos, slot) in slots.into_iter().enumerate() {
                    match slot {
                        OtpSlot::Digit(idx) => rsx! {
                            span {
                                key: "{pos}",
                                class: if active == Some(idx) { "otp-slot active" } else { "otp-slot" },
                                {entry.char_at(idx).map(String::from).unwrap_or_default()}
                            }
                        },
                        OtpSlot::Separator => rsx! {
                            span { key: "{pos}", class: "otp-separator", "-" }
                        },
                    }
                }
            }
        }
    }
}
