//! # `localStorage` preferences: browser-side persistence
//!
//! [`LocalStoragePreferences`] is the [`Preferences`] implementation used on the
//! web platform. It is a zero-size handle that looks up `window.localStorage` on
//! every call, so it can be cloned freely into event handlers.
//!
//! Errors (no window, storage disabled, quota exceeded) are swallowed: reads
//! return `None`, writes are dropped. The only value stored today is the privacy
//! notice flag, which at worst is shown again.

use crate::prefs::Preferences;

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStoragePreferences;

impl LocalStoragePreferences {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl Preferences for LocalStoragePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}
