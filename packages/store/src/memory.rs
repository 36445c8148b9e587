use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::prefs::Preferences;

/// In-memory preferences for tests and native builds.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{PrivacyNotice, PRIVACY_ACKNOWLEDGMENT_KEY};

    #[test]
    fn test_set_get_remove() {
        let prefs = MemoryPreferences::new();
        assert!(prefs.get("theme").is_none());
        prefs.set("theme", "dark");
        assert_eq!(prefs.get("theme").as_deref(), Some("dark"));
        prefs.remove("theme");
        assert!(prefs.get("theme").is_none());
    }

    #[test]
    fn test_clones_share_values() {
        let prefs = MemoryPreferences::new();
        let other = prefs.clone();
        prefs.set("k", "v");
        assert_eq!(other.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_privacy_notice_acknowledgment() {
        let prefs = MemoryPreferences::new();
        let notice = PrivacyNotice::new(prefs.clone());
        assert!(notice.should_show());

        notice.acknowledge();
        assert!(!notice.should_show());
        assert_eq!(prefs.get(PRIVACY_ACKNOWLEDGMENT_KEY).as_deref(), Some("true"));

        // A fresh handle over the same storage stays acknowledged.
        assert!(!PrivacyNotice::new(prefs).should_show());
    }
}
