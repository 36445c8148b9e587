//! Small persisted key/value preferences (browser `localStorage` on web).

/// Synchronous string preferences.
///
/// Implementations swallow storage errors: an unavailable store reads as empty
/// and drops writes.
pub trait Preferences {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub const PRIVACY_ACKNOWLEDGMENT_KEY: &str = "saferide_privacy_acknowledged";

/// One-time privacy notice acknowledgment.
pub struct PrivacyNotice<P: Preferences> {
    prefs: P,
}

impl<P: Preferences> PrivacyNotice<P> {
    pub fn new(prefs: P) -> Self {
        Self { prefs }
    }

    pub fn should_show(&self) -> bool {
        self.prefs.get(PRIVACY_ACKNOWLEDGMENT_KEY).is_none()
    }

    pub fn acknowledge(&self) {
        self.prefs.set(PRIVACY_ACKNOWLEDGMENT_KEY, "true");
    }
}
