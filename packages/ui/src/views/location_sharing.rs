use std::cell::RefCell;
use std::rc::Rc;

use api::{LocationSharing, SharingEvent};
use dioxus::prelude::*;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::StreamExt;
use store::lifecycle::BadgeTone;
use store::Location;

use crate::components::{
    Badge, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader,
    CardTitle, Spinner,
};
use crate::icons::{FaLocationArrow, FaLocationDot};
use crate::platform::make_geolocation;
use crate::{use_config, use_data, use_notifier, Icon};

/// Driver location sharing.
///
/// Position callbacks arrive from the platform outside the UI runtime, so they
/// are queued on a channel and handled by a future owned by this component.
/// Leaving the view stops the watch.
#[component]
pub fn LocationSharingView() -> Element {
    let config = use_config();
    let data = use_data();
    let mut notifier = use_notifier();

    let (sharing, events) = use_hook(|| {
        let (tx, rx) = unbounded::<SharingEvent>();
        let sharing = Rc::new(LocationSharing::new(make_geolocation(), &config.location));
        (Rc::new((sharing, tx)), Rc::new(RefCell::new(Some(rx))))
    });

    let mut active = use_signal(|| false);
    let mut current = use_signal(|| Option::<Location>::None);
    let mut forwarding = use_signal(|| false);

    use_future(move || {
        let events: Option<UnboundedReceiver<SharingEvent>> = events.borrow_mut().take();
        async move {
            let Some(mut events) = events else {
                return;
            };
            while let Some(event) = events.next().await {
                match event {
                    SharingEvent::Moved(location) => current.set(Some(location)),
                    SharingEvent::Forward(location) => {
                        spawn(async move {
                            forwarding.set(true);
                            if let Err(e) = data.peek().update_driver_location(location).await {
                                tracing::warn!("Driver location update failed: {e}");
                            }
                            forwarding.set(false);
                        });
                    }
                    SharingEvent::Failed(e) => {
                        tracing::error!("Geolocation error: {e}");
                        notifier.error("Failed to get location");
                        active.set(false);
                    }
                }
            }
        }
    });

    {
        let sharing = Rc::clone(&sharing);
        use_drop(move || sharing.0.stop_sharing());
    }

    let toggle = {
        let sharing = Rc::clone(&sharing);
        move |_| {
            let (controller, tx) = &*sharing;
            if controller.is_sharing() {
                controller.stop_sharing();
                active.set(false);
                notifier.success("Location sharing stopped");
                return;
            }
            let tx = tx.clone();
            match controller.start_sharing(move |event| {
                let _ = tx.unbounded_send(event);
            }) {
                Ok(()) => {
                    active.set(true);
                    notifier.success("Location sharing started");
                }
                Err(e) => {
                    tracing::error!("Could not start location sharing: {e}");
                    notifier.error(&e.to_string());
                    active.set(false);
                }
            }
        }
    };

    let is_active = active();
    let (variant, label) = if is_active {
        (ButtonVariant::Destructive, " Stop Sharing Location")
    } else {
        (ButtonVariant::Primary, " Start Sharing Location")
    };

    rsx! {
        Card {
            CardHeader {
                CardTitle { class: "with-icon",
                    Icon { icon: FaLocationArrow, width: 18, height: 18 }
                    "Location Sharing"
                }
                CardDescription { "Share your real-time location with parents" }
            }
            CardContent { class: "form-stack",
                div { class: "location-status",
                    div { class: "location-status-icon", class: if is_active { "live" },
                        Icon { icon: FaLocationDot, width: 20, height: 20 }
                    }
                    div { class: "location-status-text",
                        p { class: "detail-row-label", "Location Status" }
                        p { class: "view-muted",
                            if is_active { "Sharing location" } else { "Not sharing" }
                        }
                    }
                    if is_active {
                        Badge { tone: BadgeTone::Success, "Active" }
                    } else {
                        Badge { "Inactive" }
                    }
                }
                if let Some(location) = current() {
                    div { class: "location-current",
                        p { class: "detail-row-label", "Current Location" }
                        p { class: "view-muted", {format!("Latitude: {:.6}", location.latitude)} }
                        p { class: "view-muted", {format!("Longitude: {:.6}", location.longitude)} }
                    }
                }
                Button {
                    variant,
                    size: ButtonSize::Large,
                    class: "w-full",
                    disabled: forwarding(),
                    onclick: toggle,
                    if forwarding() {
                        Spinner {}
                    } else {
                        Icon { icon: FaLocationArrow, width: 16, height: 16 }
                    }
                    "{label}"
                }
            }
        }
    }
}
