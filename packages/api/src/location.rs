//! # Location sharing
//!
//! [`LocationSharing`] turns a continuous position watch into throttled backend
//! updates. It is `Idle` until [`LocationSharing::start_sharing`] subscribes to
//! the platform [`Geolocation`], and goes back to `Idle` on
//! [`LocationSharing::stop_sharing`], on the first position error, or when the
//! controller is dropped. There are no other states.
//!
//! Every position event updates the displayed location and is reported as
//! [`SharingEvent::Moved`]. It is also reported as [`SharingEvent::Forward`]
//! (the caller pushes it to the backend) when nothing has been forwarded yet or
//! when strictly more than the throttle interval has passed since the last
//! forward. The last-forward time survives stop and restart.
//!
//! A position error clears the watch and reports [`SharingEvent::Failed`].
//! There is no automatic retry.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use store::config::LocationConfig;
use store::{Clock, Location, SystemClock};
use thiserror::Error;

/// Options passed to the platform watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl From<&LocationConfig> for PositionOptions {
    fn from(config: &LocationConfig) -> Self {
        Self {
            enable_high_accuracy: config.high_accuracy,
            timeout_ms: config.timeout_ms,
            maximum_age_ms: config.maximum_age_ms,
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from(&LocationConfig::default())
    }
}

/// Why a position could not be obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PositionError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Other(String),
}

impl PositionError {
    /// Map a `GeolocationPositionError.code`.
    pub fn from_code(code: u16, message: &str) -> Self {
        match code {
            1 => PositionError::PermissionDenied,
            2 => PositionError::PositionUnavailable,
            3 => PositionError::Timeout,
            _ => PositionError::Other(message.to_string()),
        }
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::PermissionDenied => f.write_str("User denied Geolocation"),
            PositionError::PositionUnavailable => f.write_str("Position unavailable"),
            PositionError::Timeout => f.write_str("Timeout expired"),
            PositionError::Other(message) => f.write_str(message),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Geolocation is not supported by your browser")]
    Unavailable,

    #[error("Error getting location: {0}")]
    Position(PositionError),

    #[error("Could not start location watch: {0}")]
    Watch(String),
}

pub type PositionEvent = Result<Location, PositionError>;

/// Platform position watch.
pub trait Geolocation {
    type WatchId: Clone + 'static;

    fn is_available(&self) -> bool;

    /// Subscribe to position changes. `callback` runs for every fix or error
    /// until the watch is cleared.
    fn watch_position(
        &self,
        options: &PositionOptions,
        callback: Box<dyn FnMut(PositionEvent)>,
    ) -> Result<Self::WatchId, LocationError>;

    fn clear_watch(&self, id: &Self::WatchId);
}

/// Platforms without a position sensor.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedGeolocation;

impl Geolocation for UnsupportedGeolocation {
    type WatchId = ();

    fn is_available(&self) -> bool {
        false
    }

    fn watch_position(
        &self,
        _options: &PositionOptions,
        _callback: Box<dyn FnMut(PositionEvent)>,
    ) -> Result<(), LocationError> {
        Err(LocationError::Unavailable)
    }

    fn clear_watch(&self, _id: &()) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum SharingEvent {
    /// New local position, always reported.
    Moved(Location),
    /// Position to push to the backend.
    Forward(Location),
    /// Sharing stopped because of an error.
    Failed(LocationError),
}

struct Inner<W> {
    sharing: bool,
    /// Bumped on every start so callbacks of an earlier watch are ignored.
    session: u64,
    watch: Option<W>,
    current: Option<Location>,
    last_forwarded_ms: Option<u64>,
    last_error: Option<LocationError>,
}

pub struct LocationSharing<G: Geolocation, C = SystemClock> {
    geo: Rc<G>,
    clock: C,
    options: PositionOptions,
    throttle_ms: u64,
    inner: Rc<RefCell<Inner<G::WatchId>>>,
}

impl<G: Geolocation + 'static> LocationSharing<G, SystemClock> {
    pub fn new(geo: G, config: &LocationConfig) -> Self {
        Self::with_clock(geo, config, SystemClock)
    }
}

impl<G: Geolocation + 'static, C: Clock + Clone + 'static> LocationSharing<G, C> {
    pub fn with_clock(geo: G, config: &LocationConfig, clock: C) -> Self {
        Self {
            geo: Rc::new(geo),
            clock,
            options: PositionOptions::from(config),
            throttle_ms: config.throttle_ms,
            inner: Rc::new(RefCell::new(Inner {
                sharing: false,
                session: 0,
                watch: None,
                current: None,
                last_forwarded_ms: None,
                last_error: None,
            })),
        }
    }

    /// Subscribe to position updates. A no-op while already sharing.
    pub fn start_sharing(
        &self,
        on_event: impl FnMut(SharingEvent) + 'static,
    ) -> Result<(), LocationError> {
        if self.inner.borrow().sharing {
            return Ok(());
        }
        if !self.geo.is_available() {
            self.inner.borrow_mut().last_error = Some(LocationError::Unavailable);
            return Err(LocationError::Unavailable);
        }

        let session = {
            let mut inner = self.inner.borrow_mut();
            inner.sharing = true;
            inner.session += 1;
            inner.last_error = None;
            inner.session
        };

        let callback = self.position_callback(session, Box::new(on_event));
        match self.geo.watch_position(&self.options, callback) {
            Ok(id) => {
                let mut inner = self.inner.borrow_mut();
                if inner.sharing && inner.session == session {
                    inner.watch = Some(id);
                } else {
                    // Failed before the watch id came back.
                    drop(inner);
                    self.geo.clear_watch(&id);
                }
                tracing::info!("location sharing started");
                Ok(())
            }
            Err(e) => {
                let mut inner = self.inner.borrow_mut();
                inner.sharing = false;
                inner.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn position_callback(
        &self,
        session: u64,
        mut sink: Box<dyn FnMut(SharingEvent)>,
    ) -> Box<dyn FnMut(PositionEvent)> {
        let inner = Rc::clone(&self.inner);
        let geo = Rc::clone(&self.geo);
        let clock = self.clock.clone();
        let throttle_ms = self.throttle_ms;

        Box::new(move |event| {
            let outcome = {
                let mut state = inner.borrow_mut();
                if !state.sharing || state.session != session {
                    return;
                }
                match event {
                    Ok(location) => {
                        state.current = Some(location);
                        let now = clock.now_ms();
                        let forward = match state.last_forwarded_ms {
                            None => true,
                            Some(last) => now.saturating_sub(last) > throttle_ms,
                        };
                        if forward {
                            state.last_forwarded_ms = Some(now);
                        }
                        Ok((location, forward))
                    }
                    Err(e) => {
                        let error = LocationError::Position(e);
                        state.sharing = false;
                        state.last_error = Some(error.clone());
                        Err((state.watch.take(), error))
                    }
                }
            };

            match outcome {
                Ok((location, forward)) => {
                    sink(SharingEvent::Moved(location));
                    if forward {
                        sink(SharingEvent::Forward(location));
                    }
                }
                Err((watch, error)) => {
                    tracing::warn!("location sharing stopped: {error}");
                    if let Some(id) = watch {
                        geo.clear_watch(&id);
                    }
                    sink(SharingEvent::Failed(error));
                }
            }
        })
    }
}

impl<G: Geolocation, C> LocationSharing<G, C> {
    /// Cancel the watch. A no-op when not sharing.
    pub fn stop_sharing(&self) {
        let watch = {
            let mut inner = self.inner.borrow_mut();
            if !inner.sharing {
                return;
            }
            inner.sharing = false;
            inner.watch.take()
        };
        if let Some(id) = watch {
            self.geo.clear_watch(&id);
        }
        tracing::info!("location sharing stopped");
    }

    pub fn is_sharing(&self) -> bool {
        self.inner.borrow().sharing
    }

    pub fn current_location(&self) -> Option<Location> {
        self.inner.borrow().current
    }

    pub fn last_error(&self) -> Option<LocationError> {
        self.inner.borrow().last_error.clone()
    }
}

impl<G: Geolocation, C> Drop for LocationSharing<G, C> {
    fn drop(&mut self) {
        self.stop_sharing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use store::ManualClock;

    type Callback = Box<dyn FnMut(PositionEvent)>;

    #[derive(Default)]
    struct MockState {
        next_id: u32,
        watches: HashMap<u32, Callback>,
        cleared: Vec<u32>,
        options: Option<PositionOptions>,
    }

    /// Test double; clones share the same watches.
    #[derive(Clone, Default)]
    struct MockGeolocation {
        state: Rc<RefCell<MockState>>,
    }

    impl MockGeolocation {
        fn emit(&self, event: PositionEvent) {
            let ids: Vec<u32> = self.state.borrow().watches.keys().copied().collect();
            for id in ids {
                let callback = self.state.borrow_mut().watches.remove(&id);
                if let Some(mut callback) = callback {
                    callback(event.clone());
                    let mut state = self.state.borrow_mut();
                    if !state.cleared.contains(&id) {
                        state.watches.insert(id, callback);
                    }
                }
            }
        }

        fn fix(&self, lat: f64, lng: f64) {
            self.emit(Ok(Location::new(lat, lng)));
        }

        fn active(&self) -> usize {
            self.state.borrow().watches.len()
        }

        fn cleared(&self) -> Vec<u32> {
            self.state.borrow().cleared.clone()
        }
    }

    impl Geolocation for MockGeolocation {
        type WatchId = u32;

        fn is_available(&self) -> bool {
            true
        }

        fn watch_position(
            &self,
            options: &PositionOptions,
            callback: Callback,
        ) -> Result<u32, LocationError> {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            state.watches.insert(id, callback);
            state.options = Some(*options);
            Ok(id)
        }

        fn clear_watch(&self, id: &u32) {
            let mut state = self.state.borrow_mut();
            state.watches.remove(id);
            state.cleared.push(*id);
        }
    }

    fn controller(
        geo: &MockGeolocation,
        clock: &ManualClock,
    ) -> LocationSharing<MockGeolocation, ManualClock> {
        LocationSharing::with_clock(geo.clone(), &LocationConfig::default(), clock.clone())
    }

    fn recorder() -> (Rc<RefCell<Vec<SharingEvent>>>, impl FnMut(SharingEvent) + 'static) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let events = Rc::clone(&events);
            move |event| events.borrow_mut().push(event)
        };
        (events, sink)
    }

    fn forwarded(events: &RefCell<Vec<SharingEvent>>) -> Vec<Location> {
        events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SharingEvent::Forward(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    fn moved(events: &RefCell<Vec<SharingEvent>>) -> usize {
        events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SharingEvent::Moved(_)))
            .count()
    }

    #[test]
    fn test_throttles_forwarding_but_not_display() {
        let geo = MockGeolocation::default();
        let clock = ManualClock::starting_at(10_000);
        let sharing = controller(&geo, &clock);
        let (events, sink) = recorder();
        sharing.start_sharing(sink).unwrap();

        for i in 0..10 {
            geo.fix(40.0 + i as f64 * 0.001, -73.0);
            clock.advance(1_000);
        }

        // Fixes at t=0,1,..,9s: forwarded at 0s and 6s.
        assert_eq!(moved(&events), 10);
        let sent = forwarded(&events);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], Location::new(40.0, -73.0));
        assert_eq!(sent[1], Location::new(40.006, -73.0));
        assert_eq!(sharing.current_location(), Some(Location::new(40.009, -73.0)));
    }

    #[test]
    fn test_throttle_boundary_is_strict() {
        let geo = MockGeolocation::default();
        let clock = ManualClock::starting_at(0);
        let sharing = controller(&geo, &clock);
        let (events, sink) = recorder();
        sharing.start_sharing(sink).unwrap();

        geo.fix(1.0, 1.0);
        clock.advance(5_000);
        geo.fix(2.0, 2.0);
        clock.advance(1);
        geo.fix(3.0, 3.0);

        assert_eq!(
            forwarded(&events),
            vec![Location::new(1.0, 1.0), Location::new(3.0, 3.0)]
        );
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let geo = MockGeolocation::default();
        let sharing = controller(&geo, &ManualClock::default());
        sharing.stop_sharing();
        sharing.stop_sharing();
        assert!(!sharing.is_sharing());
        assert!(geo.cleared().is_empty());
    }

    #[test]
    fn test_stop_cancels_watch() {
        let geo = MockGeolocation::default();
        let sharing = controller(&geo, &ManualClock::default());
        let (events, sink) = recorder();
        sharing.start_sharing(sink).unwrap();
        assert_eq!(geo.active(), 1);

        sharing.stop_sharing();
        assert_eq!(geo.active(), 0);
        geo.fix(1.0, 1.0);
        assert!(events.borrow().is_empty());
        assert_eq!(sharing.current_location(), None);
    }

    #[test]
    fn test_start_twice_keeps_one_watch() {
        let geo = MockGeolocation::default();
        let sharing = controller(&geo, &ManualClock::default());
        sharing.start_sharing(|_| {}).unwrap();
        sharing.start_sharing(|_| {}).unwrap();
        assert_eq!(geo.active(), 1);
    }

    #[test]
    fn test_watch_options_from_config() {
        let geo = MockGeolocation::default();
        let sharing = controller(&geo, &ManualClock::default());
        sharing.start_sharing(|_| {}).unwrap();
        assert_eq!(
            geo.state.borrow().options,
            Some(PositionOptions {
                enable_high_accuracy: true,
                timeout_ms: 5_000,
                maximum_age_ms: 0,
            })
        );
    }

    #[test]
    fn test_drop_clears_active_watch() {
        let geo = MockGeolocation::default();
        {
            let sharing = controller(&geo, &ManualClock::default());
            sharing.start_sharing(|_| {}).unwrap();
            assert_eq!(geo.active(), 1);
        }
        assert_eq!(geo.active(), 0);
        assert_eq!(geo.cleared(), vec![1]);
    }

    #[test]
    fn test_position_error_stops_sharing() {
        let geo = MockGeolocation::default();
        let sharing = controller(&geo, &ManualClock::default());
        let (events, sink) = recorder();
        sharing.start_sharing(sink).unwrap();

        geo.emit(Err(PositionError::PermissionDenied));

        assert!(!sharing.is_sharing());
        assert_eq!(geo.active(), 0);
        let expected = LocationError::Position(PositionError::PermissionDenied);
        assert_eq!(sharing.last_error(), Some(expected.clone()));
        assert_eq!(events.borrow().as_slice(), &[SharingEvent::Failed(expected)]);

        // No retry: later fixes go nowhere.
        geo.fix(1.0, 1.0);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_restart_keeps_throttle_window() {
        let geo = MockGeolocation::default();
        let clock = ManualClock::starting_at(0);
        let sharing = controller(&geo, &clock);
        let (events, sink) = recorder();
        sharing.start_sharing(sink).unwrap();
        geo.fix(1.0, 1.0);
        sharing.stop_sharing();

        let (restarted, sink) = recorder();
        sharing.start_sharing(sink).unwrap();
        clock.advance(2_000);
        geo.fix(2.0, 2.0);

        assert_eq!(forwarded(&events).len(), 1);
        assert!(forwarded(&restarted).is_empty());
        assert_eq!(moved(&restarted), 1);
    }

    #[test]
    fn test_unsupported_platform_fails_fast() {
        let sharing = LocationSharing::new(UnsupportedGeolocation, &LocationConfig::default());
        assert_eq!(
            sharing.start_sharing(|_| {}),
            Err(LocationError::Unavailable)
        );
        assert!(!sharing.is_sharing());
        assert_eq!(
            sharing.last_error().map(|e| e.to_string()),
            Some("Geolocation is not supported by your browser".to_string())
        );
    }

    #[test]
    fn test_position_error_codes() {
        assert_eq!(PositionError::from_code(1, ""), PositionError::PermissionDenied);
        assert_eq!(PositionError::from_code(3, ""), PositionError::Timeout);
        assert_eq!(
            PositionError::from_code(9, "weird"),
            PositionError::Other("weird".to_string())
        );
    }
}
