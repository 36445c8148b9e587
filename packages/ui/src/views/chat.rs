use api::keys;
use dioxus::prelude::*;
use store::forms::MessageForm;

use crate::components::{
    Button, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Spinner,
};
use crate::icons::{FaComment, FaPaperPlane};
use crate::{format_timestamp, use_data, use_notifier, use_poll, use_query, Icon};

use super::common::{LoadError, Loading};

/// Parent side of the chat: messages go to a driver.
#[component]
pub fn ParentChat() -> Element {
    rsx! {
        ChatView {
            description: "Chat with drivers about trips",
            receiver_placeholder: "Driver Principal ID",
        }
    }
}

/// Driver side of the chat: messages go to a parent.
#[component]
pub fn DriverChat() -> Element {
    rsx! {
        ChatView {
            description: "Chat with parents about trips",
            receiver_placeholder: "Parent Principal ID",
        }
    }
}

/// Message list for the caller, polled while mounted, and a send form.
#[component]
fn ChatView(description: String, receiver_placeholder: String) -> Element {
    let mut data = use_data();
    let mut notifier = use_notifier();
    let messages = use_query(|data| async move { data.messages().await });
    use_poll(messages, |access| access.identity().map(keys::messages));
    let mut form = use_signal(MessageForm::default);
    let mut pending = use_signal(|| false);
    let me = data.identity();

    let send = move |evt: FormEvent| {
        evt.prevent_default();
        if pending() {
            return;
        }
        let (receiver, text) = match form().validate() {
            Ok(valid) => valid,
            Err(e) => {
                notifier.error(&e.to_string());
                return;
            }
        };
        spawn(async move {
            pending.set(true);
            match data.peek().send_message(&receiver, text).await {
                Ok(()) => {
                    tracing::debug!(%receiver, "message sent");
                    form.write().text.clear();
                    notifier.success("Message sent!");
                    data.touch();
                }
                Err(e) => {
                    tracing::error!("Send message error: {e}");
                    notifier.error("Failed to send message");
                }
            }
            pending.set(false);
        });
    };

    let list = match &*messages.read() {
        None => return rsx! { Loading {} },
        Some(Err(e)) => return rsx! { LoadError { what: "messages", error: e.clone() } },
        Some(Ok(list)) => list.clone(),
    };

    rsx! {
        Card {
            CardHeader {
                CardTitle { class: "with-icon",
                    Icon { icon: FaComment, width: 18, height: 18 }
                    "Messages"
                }
                CardDescription { "{description}" }
            }
            CardContent { class: "form-stack",
                div { class: "chat-log",
                    if list.is_empty() {
                        div { class: "chat-empty", "No messages yet" }
                    } else {
                        for (idx, msg) in list.into_iter().enumerate() {
                            div {
                                key: "{idx}",
                                class: "chat-row",
                                class: if me.as_ref() == Some(&msg.sender) { "own" },
                                div { class: "chat-bubble",
                                    p { "{msg.message}" }
                                    p { class: "chat-time", {format_timestamp(msg.timestamp)} }
                                }
                            }
                        }
                    }
                }
                form { class: "form-stack", onsubmit: send,
                    Input {
                        placeholder: receiver_placeholder,
                        value: form().receiver,
                        oninput: move |evt: FormEvent| form.write().receiver = evt.value(),
                    }
                    div { class: "chat-compose",
                        Input {
                            placeholder: "Type your message...",
                            value: form().text,
                            oninput: move |evt: FormEvent| form.write().text = evt.value(),
                        }
                        Button { r#type: "submit", disabled: pending(), title: "Send",
                            if pending() {
                                Spinner {}
                            } else {
                                Icon { icon: FaPaperPlane, width: 14, height: 14 }
                            }
                        }
                    }
                }
            }
        }
    }
}
