use api::keys;
use dioxus::prelude::*;
use store::lifecycle::partition_for_parent;
use store::TripRequest;

use crate::components::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    Spinner, StatusBadgeView,
};
use crate::icons::{FaClock, FaLocationArrow, FaLocationDot, FaTriangleExclamation, FaUser};
use crate::{format_schedule, use_data, use_notifier, use_poll, use_query, Icon};

use super::common::{trip_is_live, while_any_live, DetailRow, EmptyState, LoadError, Loading};

/// The parent's trips, grouped into active, emergency and past, with an SOS
/// button.
#[component]
pub fn TripTracking() -> Element {
    let mut data = use_data();
    let mut notifier = use_notifier();
    let trips = use_query(|data| async move { data.trip_requests().await });
    use_poll(trips, |access| {
        let key = keys::trip_requests(access.identity()?);
        while_any_live(access, key)
    });
    let mut sending = use_signal(|| false);

    let sos = move |_| {
        if sending() {
            return;
        }
        spawn(async move {
            sending.set(true);
            match data.peek().trigger_sos(None).await {
                Ok(()) => {
                    tracing::warn!("SOS alert sent");
                    notifier.success("SOS alert sent!");
                    data.touch();
                }
                Err(e) => {
                    tracing::error!("SOS error: {e}");
                    notifier.error("Failed to send SOS alert");
                }
            }
            sending.set(false);
        });
    };

    let body = match &*trips.read() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { LoadError { what: "trips", error: e.clone() } },
        Some(Ok(list)) => {
            let partition = partition_for_parent(list);
            if partition.is_empty() {
                rsx! {
                    EmptyState {
                        title: "No trips found",
                        text: "Book your first trip to get started",
                        Icon { icon: FaLocationDot, width: 40, height: 40 }
                    }
                }
            } else {
                rsx! {
                    TripSection { title: "Active Trips", trips: partition.active }
                    TripSection { title: "Emergency Alerts", trips: partition.alerts }
                    TripSection { title: "Past Trips", trips: partition.past }
                }
            }
        }
    };

    rsx! {
        div { class: "view-section",
            div { class: "section-header",
                div {
                    h3 { class: "view-section-title", "Trip Tracking" }
                    p { class: "view-muted", "Monitor your children's trips in real-time" }
                }
                Button {
                    variant: ButtonVariant::Destructive,
                    size: ButtonSize::Large,
                    disabled: sending(),
                    onclick: sos,
                    if sending() {
                        Spinner {}
                    } else {
                        Icon { icon: FaTriangleExclamation, width: 18, height: 18 }
                    }
                    " SOS Alert"
                }
            }
            {body}
        }
    }
}

#[component]
fn TripSection(title: String, trips: Vec<TripRequest>) -> Element {
    if trips.is_empty() {
        return rsx! {};
    }
    rsx! {
        div { class: "trip-section",
            h4 { class: "trip-section-title", "{title}" }
            for trip in trips {
                TripCard { key: "{trip.id}", trip }
            }
        }
    }
}

/// One trip. While the trip is live its status and the driver's position are
/// polled and the position is shown.
#[component]
fn TripCard(trip: TripRequest) -> Element {
    let listed = trip.status;

    let driver = trip.driver_id.clone().filter(|_| listed.is_live());
    let driver_location = use_query(move |data| {
        let driver = driver.clone();
        async move {
            match driver {
                Some(driver) => data.driver_location(&driver).await,
                None => Ok(None),
            }
        }
    });
    let (id, driver) = (trip.id.clone(), trip.driver_id.clone());
    use_poll(driver_location, move |access| {
        let driver = driver.as_ref().filter(|_| trip_is_live(access, &id, listed))?;
        Some(keys::driver_location(driver))
    });

    let id = trip.id.clone();
    let status = use_query(move |data| {
        let id = id.clone();
        async move { data.trip_status(&id).await }
    });
    let id = trip.id.clone();
    use_poll(status, move |access| {
        trip_is_live(access, &id, listed).then(|| keys::trip_status(&id))
    });

    let current = match &*status.read() {
        Some(Ok(Some(polled))) => *polled,
        _ => listed,
    };
    let driver_at = match &*driver_location.read() {
        Some(Ok(Some(location))) if current.is_live() => Some(*location),
        _ => None,
    };

    rsx! {
        Card {
            CardHeader {
                div { class: "trip-card-header",
                    div {
                        CardTitle { "Trip #{trip.short_id()}" }
                        CardDescription { {trip.headcount("child", "children")} }
                    }
                    StatusBadgeView { status: current }
                }
            }
            CardContent { class: "detail-list",
                DetailRow { label: "Children", value: trip.children_ids.join(", "),
                    Icon { icon: FaUser, width: 14, height: 14 }
                }
                DetailRow { label: "Pickup", value: trip.pickup_location.display(4),
                    Icon { icon: FaLocationDot, width: 14, height: 14 }
                }
                DetailRow { label: "Dropoff", value: trip.dropoff_location.display(4),
                    Icon { icon: FaLocationArrow, width: 14, height: 14 }
                }
                DetailRow { label: "Scheduled", value: format_schedule(trip.scheduled_time),
                    Icon { icon: FaClock, width: 14, height: 14 }
                }
                if let Some(location) = driver_at {
                    div { class: "detail-live",
                        DetailRow { label: "Driver Location", value: location.display(4),
                            Icon { icon: FaLocationDot, width: 14, height: 14 }
                        }
                    }
                }
            }
        }
    }
}
