use dioxus::prelude::*;
use store::lifecycle::{BadgeTone, StatusBadge};
use store::TripStatus;

pub fn tone_class(tone: BadgeTone) -> &'static str {
    match tone {
        BadgeTone::Success => "badge-success",
        BadgeTone::Warning => "badge-warning",
        BadgeTone::Destructive => "badge-destructive",
        BadgeTone::Muted => "badge-muted",
    }
}

#[component]
pub fn Badge(#[props(default = BadgeTone::Muted)] tone: BadgeTone, children: Element) -> Element {
    rsx! {
        span { class: "badge {tone_class(tone)}", {children} }
    }
}

/// Label and tone for a trip status.
#[component]
pub fn StatusBadgeView(status: TripStatus) -> Element {
    let badge = StatusBadge::for_status(status);
    rsx! {
        Badge { tone: badge.tone, "{badge.label}" }
    }
}
