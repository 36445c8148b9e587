//! `navigator.geolocation` behind [`api::Geolocation`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use api::{Geolocation, LocationError, PositionError, PositionEvent, PositionOptions};
use store::Location;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{GeolocationPosition, GeolocationPositionError};

type OnFix = Closure<dyn FnMut(GeolocationPosition)>;
type OnError = Closure<dyn FnMut(GeolocationPositionError)>;

/// Browser position watches. JS closures stay alive until their watch is cleared.
#[derive(Clone, Default)]
pub struct BrowserGeolocation {
    watches: Rc<RefCell<HashMap<i32, (OnFix, OnError)>>>,
}

impl BrowserGeolocation {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle() -> Option<web_sys::Geolocation> {
        web_sys::window()?.navigator().geolocation().ok()
    }
}

impl Geolocation for BrowserGeolocation {
    type WatchId = i32;

    fn is_available(&self) -> bool {
        Self::handle().is_some()
    }

    fn watch_position(
        &self,
        options: &PositionOptions,
        callback: Box<dyn FnMut(PositionEvent)>,
    ) -> Result<i32, LocationError> {
        let geo = Self::handle().ok_or(LocationError::Unavailable)?;
        let callback = Rc::new(RefCell::new(callback));

        let on_fix: OnFix = {
            let callback = Rc::clone(&callback);
            Closure::new(move |position: GeolocationPosition| {
                let coords = position.coords();
                let location = Location::new(coords.latitude(), coords.longitude());
                if let Ok(mut cb) = callback.try_borrow_mut() {
                    cb(Ok(location));
                }
            })
        };
        let on_error: OnError = {
            let callback = Rc::clone(&callback);
            Closure::new(move |err: GeolocationPositionError| {
                let error = PositionError::from_code(err.code(), &err.message());
                if let Ok(mut cb) = callback.try_borrow_mut() {
                    cb(Err(error));
                }
            })
        };

        let js_options = web_sys::PositionOptions::new();
        js_options.set_enable_high_accuracy(options.enable_high_accuracy);
        js_options.set_timeout(options.timeout_ms);
        js_options.set_maximum_age(options.maximum_age_ms);

        let id = geo
            .watch_position_with_error_callback_and_options(
                on_fix.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &js_options,
            )
            .map_err(|e| LocationError::Watch(format!("{e:?}")))?;

        tracing::debug!(id, "position watch started");
        self.watches.borrow_mut().insert(id, (on_fix, on_error));
        Ok(id)
    }

    fn clear_watch(&self, id: &i32) {
        if let Some(geo) = Self::handle() {
            geo.clear_watch(*id);
        }
        let removed = self.watches.borrow_mut().remove(id);
        if let Some(closures) = removed {
            tracing::debug!(id, "position watch cleared");
            // Clearing can happen from inside one of these closures, so they
            // are dropped after the current JS callback returns.
            wasm_bindgen_futures::spawn_local(async move {
                drop(closures);
            });
        }
    }
}
