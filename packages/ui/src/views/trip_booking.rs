use chrono::Local;
use dioxus::prelude::*;
use store::forms::TripBookingForm;

use crate::components::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, Checkbox,
    Input, Label, Spinner,
};
use crate::icons::{FaCalendar, FaLocationDot};
use crate::{use_data, use_notifier, use_query, Icon};

use super::common::{EmptyState, LoadError, Loading};

/// Books a trip for one or more of the parent's children.
///
/// The date and time are read in the browser's time zone and sent as
/// nanoseconds since the epoch.
#[component]
pub fn TripBooking() -> Element {
    let mut data = use_data();
    let mut notifier = use_notifier();
    let children = use_query(|data| async move { data.child_profiles().await });
    let mut form = use_signal(TripBookingForm::default);
    let mut pending = use_signal(|| false);

    let submit = move |_| {
        if pending() {
            return;
        }
        let trip = match form().validate(&Local) {
            Ok(trip) => trip,
            Err(e) => {
                notifier.error(&e.to_string());
                return;
            }
        };
        spawn(async move {
            pending.set(true);
            match data.peek().create_trip_request(trip).await {
                Ok(id) => {
                    tracing::info!(%id, "trip booked");
                    notifier.success("Trip booked successfully!");
                    form.write().clear();
                    data.touch();
                }
                Err(e) => {
                    tracing::error!("Book trip error: {e}");
                    notifier.error("Failed to book trip");
                }
            }
            pending.set(false);
        });
    };

    let list = match &*children.read() {
        None => return rsx! { Loading {} },
        Some(Err(e)) => return rsx! { LoadError { what: "children", error: e.clone() } },
        Some(Ok(list)) => list.clone(),
    };

    if list.is_empty() {
        return rsx! {
            EmptyState {
                title: "No children profiles found",
                text: "Please add children profiles first to book trips",
                Icon { icon: FaLocationDot, width: 40, height: 40 }
            }
        };
    }

    let current = form();

    rsx! {
        Card {
            CardHeader {
                CardTitle { "Book a Trip" }
                CardDescription { "Schedule a pick-up or drop-off for your children" }
            }
            CardContent { class: "form-stack",
                div { class: "form-field",
                    Label { "Select Children" }
                    for child in list {
                        Checkbox {
                            key: "{child.id}",
                            id: "child-{child.id}",
                            checked: current.is_selected(&child.name),
                            label: "{child.name} ({child.grade})",
                            onchange: {
                                let name = child.name.clone();
                                move |_| form.write().toggle_child(&name)
                            },
                        }
                    }
                }
                div { class: "form-grid",
                    div { class: "form-field",
                        Label { "Pickup Location" }
                        Input {
                            r#type: "number",
                            step: "any",
                            placeholder: "Latitude",
                            value: current.pickup_lat.clone(),
                            oninput: move |evt: FormEvent| form.write().pickup_lat = evt.value(),
                        }
                        Input {
                            r#type: "number",
                            step: "any",
                            placeholder: "Longitude",
                            value: current.pickup_lng.clone(),
                            oninput: move |evt: FormEvent| form.write().pickup_lng = evt.value(),
                        }
                    }
                    div { class: "form-field",
                        Label { "Dropoff Location" }
                        Input {
                            r#type: "number",
                            step: "any",
                            placeholder: "Latitude",
                            value: current.dropoff_lat.clone(),
                            oninput: move |evt: FormEvent| form.write().dropoff_lat = evt.value(),
                        }
                        Input {
                            r#type: "number",
                            step: "any",
                            placeholder: "Longitude",
                            value: current.dropoff_lng.clone(),
                            oninput: move |evt: FormEvent| form.write().dropoff_lng = evt.value(),
                        }
                    }
                }
                div { class: "form-grid",
                    div { class: "form-field",
                        Label { html_for: "date", "Date" }
                        Input {
                            id: "date",
                            r#type: "date",
                            value: current.date.clone(),
                            oninput: move |evt: FormEvent| form.write().date = evt.value(),
                        }
                    }
                    div { class: "form-field",
                        Label { html_for: "time", "Time" }
                        Input {
                            id: "time",
                            r#type: "time",
                            value: current.time.clone(),
                            oninput: move |evt: FormEvent| form.write().time = evt.value(),
                        }
                    }
                }
                Button {
                    size: ButtonSize::Large,
                    class: "w-full",
                    disabled: pending(),
                    onclick: submit,
                    if pending() {
                        Spinner {}
                    }
                    Icon { icon: FaCalendar, width: 16, height: 16 }
                    " Book Trip"
                }
            }
        }
    }
}
