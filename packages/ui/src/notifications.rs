//! Transient notifications (toasts) shown for every user-visible outcome.
//!
//! Views call [`notify`] (or the [`Notifier`] shorthands) and
//! [`NotificationStack`] renders whatever is pending, dismissing each entry
//! after [`DISMISS_AFTER`].

use std::time::Duration;

use dioxus::dioxus_core::spawn_forever;
use dioxus::prelude::*;

use crate::icons::FaXmark;
use crate::Icon;

pub const DISMISS_AFTER: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub timestamp: String,
    pub level: NoticeLevel,
    pub message: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Notifications {
    next_id: u64,
    pub entries: Vec<Notice>,
}

impl Notifications {
    /// Queue a notice and return its id.
    pub fn push(&mut self, level: NoticeLevel, message: &str, description: Option<&str>) -> u64 {
        self.next_id += 1;
        self.entries.push(Notice {
            id: self.next_id,
            timestamp: current_time(),
            level,
            message: message.to_string(),
            description: description.map(str::to_string),
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|n| n.id != id);
    }
}

pub fn use_notifications() -> Signal<Notifications> {
    use_context::<Signal<Notifications>>()
}

pub fn notify(notifications: &mut Signal<Notifications>, level: NoticeLevel, message: &str) {
    match level {
        NoticeLevel::Error => tracing::warn!("{message}"),
        _ => tracing::debug!("{message}"),
    }
    let id = notifications.write().push(level, message, None);
    schedule_dismiss(*notifications, id);
}

/// Copyable handle for event handlers.
#[derive(Clone, Copy)]
pub struct Notifier {
    inner: Signal<Notifications>,
}

impl Notifier {
    pub fn info(&mut self, message: &str) {
        notify(&mut self.inner, NoticeLevel::Info, message);
    }

    pub fn success(&mut self, message: &str) {
        notify(&mut self.inner, NoticeLevel::Success, message);
    }

    pub fn warning(&mut self, message: &str) {
        notify(&mut self.inner, NoticeLevel::Warning, message);
    }

    pub fn error(&mut self, message: &str) {
        notify(&mut self.inner, NoticeLevel::Error, message);
    }

    /// A notice with a second line of detail.
    pub fn detailed(&mut self, level: NoticeLevel, message: &str, description: &str) {
        let id = self.inner.write().push(level, message, Some(description));
        schedule_dismiss(self.inner, id);
    }
}

pub fn use_notifier() -> Notifier {
    Notifier {
        inner: use_notifications(),
    }
}

fn schedule_dismiss(mut notifications: Signal<Notifications>, id: u64) {
    // Outlives the view that raised the notice.
    let _ = spawn_forever(async move {
        crate::platform::sleep(DISMISS_AFTER).await;
        notifications.write().dismiss(id);
    });
}

/// Provides the notification context and renders the toast stack above `children`.
#[component]
pub fn NotificationProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(Notifications::default()));

    rsx! {
        {children}
        NotificationStack {}
    }
}

#[component]
pub fn NotificationStack() -> Element {
    let mut notifications = use_notifications();
    let entries = notifications().entries.clone();

    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "toast-stack", role: "status",
            for entry in entries {
                div {
                    key: "{entry.id}",
                    title: "{entry.timestamp}",
                    class: match entry.level {
                        NoticeLevel::Error => "toast error",
                        NoticeLevel::Warning => "toast warning",
                        NoticeLevel::Success => "toast success",
                        NoticeLevel::Info => "toast info",
                    },
                    div { class: "toast-body",
                        span { class: "toast-message", "{entry.message}" }
                        if let Some(description) = &entry.description {
                            span { class: "toast-description", "{description}" }
                        }
                    }
                    button {
                        class: "toast-dismiss",
                        title: "Dismiss",
                        onclick: {
                            let id = entry.id;
                            move |_| notifications.write().dismiss(id)
                        },
                        Icon { icon: FaXmark, width: 12, height: 12 }
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut notes = Notifications::default();
        let a = notes.push(NoticeLevel::Success, "Message sent!", None);
        let b = notes.push(NoticeLevel::Error, "Failed to send message", Some("timeout"));
        assert!(b > a);
        assert_eq!(notes.entries.len(), 2);
        assert_eq!(notes.entries[1].description.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_dismiss_only_removes_matching() {
        let mut notes = Notifications::default();
        let a = notes.push(NoticeLevel::Info, "one", None);
        let b = notes.push(NoticeLevel::Info, "two", None);
        notes.dismiss(a);
        assert_eq!(notes.entries.len(), 1);
        assert_eq!(notes.entries[0].id, b);
        notes.dismiss(a);
        assert_eq!(notes.entries.len(), 1);
    }
}
