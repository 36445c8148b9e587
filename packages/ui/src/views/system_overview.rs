use api::keys;
use dioxus::prelude::*;
use store::lifecycle::{recent, StatusBadge, TripStats};
use store::TripStatus;

use crate::components::{Card, CardContent, CardDescription, CardHeader, CardTitle};
use crate::icons::{FaCar, FaCircleCheck, FaTriangleExclamation, FaUsers};
use crate::{use_poll, use_query, Icon};

use super::common::{while_any_live, LoadError, Loading};

const RECENT_TRIPS: usize = 5;

/// Status rows of the distribution card, with their bar colour class.
const DISTRIBUTION: [(TripStatus, &str, &str); 4] = [
    (TripStatus::Completed, "Completed", "bar-success"),
    (TripStatus::InProgress, "In Progress", "bar-info"),
    (TripStatus::Pending, "Pending", "bar-warning"),
    (TripStatus::Emergency, "Emergency", "bar-destructive"),
];

/// Admin dashboard: counters, the latest trips and a status breakdown.
#[component]
pub fn SystemOverview() -> Element {
    let trips = use_query(|data| async move { data.all_trip_requests().await });
    use_poll(trips, |access| while_any_live(access, keys::all_trip_requests()));

    let trips = match &*trips.read() {
        None => return rsx! { Loading {} },
        Some(Err(e)) => return rsx! { LoadError { what: "trips", error: e.clone() } },
        Some(Ok(list)) => list.clone(),
    };
    let stats = TripStats::from_trips(&trips);

    rsx! {
        div { class: "view-section",
            div { class: "stat-grid",
                StatCard { title: "Total Trips", value: stats.total, description: "All time trip requests", tone: "stat-info",
                    Icon { icon: FaCar, width: 16, height: 16 }
                }
                StatCard { title: "Pending Trips", value: stats.pending, description: "Awaiting driver assignment", tone: "stat-warning",
                    Icon { icon: FaUsers, width: 16, height: 16 }
                }
                StatCard { title: "In Progress", value: stats.in_progress, description: "Currently active trips", tone: "stat-success",
                    Icon { icon: FaCircleCheck, width: 16, height: 16 }
                }
                StatCard { title: "Emergency Alerts", value: stats.emergency, description: "Requires immediate attention", tone: "stat-destructive",
                    Icon { icon: FaTriangleExclamation, width: 16, height: 16 }
                }
            }

            Card {
                CardHeader {
                    CardTitle { "Recent Activity" }
                    CardDescription { "Latest trip requests and system events" }
                }
                CardContent {
                    if trips.is_empty() {
                        p { class: "view-muted centered", "No trips recorded yet" }
                    } else {
                        div { class: "activity-list",
                            for trip in recent(&trips, RECENT_TRIPS).iter() {
                                div { key: "{trip.id}", class: "activity-row",
                                    div {
                                        p { class: "detail-row-label", "Trip #{trip.short_id()}..." }
                                        p { class: "view-muted", {trip.headcount("child", "children")} }
                                    }
                                    div { class: "activity-status",
                                        p { class: "detail-row-label", {StatusBadge::for_status(trip.status).label} }
                                        p { class: "view-muted",
                                            if trip.driver_id.is_some() { "Driver assigned" } else { "No driver" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            Card {
                CardHeader {
                    CardTitle { "Trip Status Distribution" }
                    CardDescription { "Overview of all trip statuses" }
                }
                CardContent { class: "distribution",
                    for (status, label, bar) in DISTRIBUTION {
                        div { key: "{label}", class: "distribution-row",
                            span { "{label}" }
                            div { class: "distribution-value",
                                div { class: "distribution-track",
                                    div {
                                        class: "distribution-bar {bar}",
                                        style: format!("width: {:.0}%", stats.share(status)),
                                    }
                                }
                                span { class: "detail-row-label", "{stats.count(status)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCard(
    title: String,
    value: usize,
    description: String,
    tone: String,
    children: Element,
) -> Element {
    rsx! {
        Card {
            CardHeader {
                div { class: "stat-header",
                    CardTitle { class: "stat-title", "{title}" }
                    span { class: "stat-icon {tone}", {children} }
                }
            }
            CardContent {
                div { class: "stat-value", "{value}" }
                p { class: "view-hint", "{description}" }
            }
        }
    }
}
