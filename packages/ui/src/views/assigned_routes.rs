use api::keys;
use dioxus::prelude::*;
use store::lifecycle::{assigned_to, driver_actions, TripAction};
use store::{TripId, TripRequest};

use crate::components::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    StatusBadgeView,
};
use crate::icons::{
    FaCircleCheck, FaCirclePlay, FaCircleXmark, FaClock, FaLocationDot, FaRoute, FaUser,
};
use crate::{format_schedule, use_data, use_notifier, use_poll, use_query, Icon};

use super::common::{while_any_live, DetailRow, EmptyState, LoadError, Loading};

/// Trips assigned to the signed-in driver, with the status actions each one
/// allows. One update at a time: every action button is disabled while a
/// status change is in flight.
#[component]
pub fn AssignedRoutes() -> Element {
    let mut data = use_data();
    let mut notifier = use_notifier();
    let trips = use_query(|data| async move { data.all_trip_requests().await });
    use_poll(trips, |access| while_any_live(access, keys::all_trip_requests()));
    let mut pending = use_signal(|| false);
    let me = data.identity();

    let on_action = move |(trip, action): (TripId, TripAction)| {
        if pending() {
            return;
        }
        spawn(async move {
            pending.set(true);
            let target = action.target();
            match data.peek().update_trip_status(&trip, target).await {
                Ok(()) => {
                    tracing::info!(%trip, status = %target, "trip status updated");
                    notifier.success("Trip status updated!");
                    data.touch();
                }
                Err(e) => {
                    tracing::error!("Update status error: {e}");
                    notifier.error("Failed to update trip status");
                }
            }
            pending.set(false);
        });
    };

    let mine: Vec<TripRequest> = match (&*trips.read(), me.as_ref()) {
        (None, _) => return rsx! { Loading {} },
        (Some(Err(e)), _) => return rsx! { LoadError { what: "routes", error: e.clone() } },
        (Some(Ok(list)), Some(me)) => assigned_to(list, me).into_iter().cloned().collect(),
        (Some(Ok(_)), None) => Vec::new(),
    };

    if mine.is_empty() {
        return rsx! {
            EmptyState {
                title: "No assigned routes",
                text: "You don't have any trips assigned yet",
                Icon { icon: FaRoute, width: 40, height: 40 }
            }
        };
    }

    rsx! {
        div { class: "view-section",
            div {
                h3 { class: "view-section-title", "Assigned Routes" }
                p { class: "view-muted", "Manage your assigned trips and student pickups" }
            }
            div { class: "trip-section",
                for trip in mine {
                    RouteCard {
                        key: "{trip.id}",
                        trip,
                        disabled: pending(),
                        on_action,
                    }
                }
            }
        }
    }
}

fn variant_for(action: TripAction) -> ButtonVariant {
    if action.is_destructive() {
        ButtonVariant::Destructive
    } else {
        ButtonVariant::Primary
    }
}

#[component]
fn RouteCard(
    trip: TripRequest,
    disabled: bool,
    on_action: EventHandler<(TripId, TripAction)>,
) -> Element {
    let actions = driver_actions(trip.status);

    rsx! {
        Card {
            CardHeader {
                div { class: "trip-card-header",
                    div {
                        CardTitle { "Trip #{trip.short_id()}" }
                        CardDescription { {trip.headcount("student", "students")} }
                    }
                    StatusBadgeView { status: trip.status }
                }
            }
            CardContent { class: "detail-list",
                DetailRow { label: "Students", value: trip.children_ids.join(", "),
                    Icon { icon: FaUser, width: 14, height: 14 }
                }
                DetailRow { label: "Pickup", value: trip.pickup_location.display(4),
                    Icon { icon: FaLocationDot, width: 14, height: 14 }
                }
                DetailRow { label: "Dropoff", value: trip.dropoff_location.display(4),
                    Icon { icon: FaLocationDot, width: 14, height: 14 }
                }
                DetailRow { label: "Scheduled", value: format_schedule(trip.scheduled_time),
                    Icon { icon: FaClock, width: 14, height: 14 }
                }
                if !actions.is_empty() {
                    div { class: "route-actions",
                        for action in actions.iter().copied() {
                            Button {
                                key: "{action.label()}",
                                variant: variant_for(action),
                                size: ButtonSize::Large,
                                disabled,
                                onclick: {
                                    let id = trip.id.clone();
                                    move |_| on_action.call((id.clone(), action))
                                },
                                match action {
                                    TripAction::Start => rsx! { Icon { icon: FaCirclePlay, width: 14, height: 14 } },
                                    TripAction::Complete => rsx! { Icon { icon: FaCircleCheck, width: 14, height: 14 } },
                                    TripAction::Emergency => rsx! { Icon { icon: FaCircleXmark, width: 14, height: 14 } },
                                }
                                " {action.label()}"
                            }
                        }
                    }
                }
            }
        }
    }
}
