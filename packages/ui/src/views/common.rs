use api::{keys, ActorError};
use dioxus::prelude::*;
use store::{QueryKey, TripId, TripRequest, TripStatus};

use crate::components::{Alert, AlertVariant, Card, CardContent, Spinner};
use crate::Access;

/// Poll key for a trip list: `key` while its last known contents still have a
/// live trip, otherwise nothing.
pub fn while_any_live(access: &Access, key: QueryKey) -> Option<QueryKey> {
    let trips = access.last_known::<Vec<TripRequest>>(&key)?;
    trips.iter().any(|t| t.status.is_live()).then_some(key)
}

/// Whether `trip` is live, preferring its polled status over the listed one.
pub fn trip_is_live(access: &Access, trip: &TripId, listed: TripStatus) -> bool {
    match access.last_known::<Option<TripStatus>>(&keys::trip_status(trip)) {
        Some(Some(status)) => status.is_live(),
        _ => listed.is_live(),
    }
}

#[component]
pub fn EmptyState(title: String, text: String, children: Element) -> Element {
    rsx! {
        Card {
            CardContent { class: "empty-state",
                span { class: "empty-state-icon", {children} }
                p { class: "empty-state-title", "{title}" }
                p { class: "view-muted", "{text}" }
            }
        }
    }
}

/// Icon, label and value line used on trip and child cards.
#[component]
pub fn DetailRow(label: String, value: String, children: Element) -> Element {
    rsx! {
        div { class: "detail-row",
            span { class: "detail-row-icon", {children} }
            div {
                p { class: "detail-row-label", "{label}" }
                p { class: "view-muted", "{value}" }
            }
        }
    }
}

#[component]
pub fn Loading() -> Element {
    rsx! {
        div { class: "view-center", Spinner {} }
    }
}

#[component]
pub fn LoadError(what: String, error: ActorError) -> Element {
    rsx! {
        Alert { variant: AlertVariant::Destructive, title: "Could not load {what}",
            "{error}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{DataAccess, HttpActor};
    use futures::executor::block_on;
    use store::config::PollingConfig;
    use store::{Location, Principal};

    fn access() -> Access {
        DataAccess::new(
            HttpActor::new("http://localhost:4943"),
            Some(Principal::new("parent")),
            PollingConfig::default(),
        )
    }

    fn trip(id: &str, status: TripStatus) -> TripRequest {
        TripRequest {
            id: TripId::new(id),
            parent_id: Principal::new("parent"),
            children_ids: vec!["Ada".to_string()],
            pickup_location: Location::new(40.0, -73.0),
            dropoff_location: Location::new(40.1, -73.1),
            scheduled_time: 0,
            driver_id: Some(Principal::new("driver")),
            status,
        }
    }

    fn seed<T: Clone + Send + Sync + 'static>(access: &Access, key: QueryKey, value: T) {
        block_on(access.query(key, move || async move { Ok::<_, ActorError>(value) })).unwrap();
    }

    #[test]
    fn test_polled_status_overrides_listed() {
        let access = access();
        let id = TripId::new("trip-1");
        assert!(trip_is_live(&access, &id, TripStatus::InProgress));

        seed(&access, keys::trip_status(&id), Some(TripStatus::Completed));
        assert!(!trip_is_live(&access, &id, TripStatus::InProgress));
    }

    #[test]
    fn test_past_trip_is_not_live() {
        let access = access();
        assert!(!trip_is_live(&access, &TripId::new("trip-2"), TripStatus::Completed));
        assert!(!trip_is_live(&access, &TripId::new("trip-3"), TripStatus::Canceled));
    }

    #[test]
    fn test_list_polls_only_with_live_trip() {
        let access = access();
        let key = keys::all_trip_requests();
        assert_eq!(while_any_live(&access, key.clone()), None);

        seed(&access, key.clone(), vec![trip("a", TripStatus::Completed)]);
        assert_eq!(while_any_live(&access, key.clone()), None);

        access.refresh(&key);
        seed(
            &access,
            key.clone(),
            vec![trip("a", TripStatus::Completed), trip("b", TripStatus::Pending)],
        );
        assert_eq!(while_any_live(&access, key.clone()), Some(key));
    }
}
