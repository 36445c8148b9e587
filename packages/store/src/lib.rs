pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod forms;
pub mod lifecycle;
pub mod models;
pub mod otp;
pub mod prefs;
pub mod roles;

mod memory;
pub use memory::MemoryPreferences;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStoragePreferences;

pub use cache::{EntityKind, Mutation, QueryCache, QueryKey, Scope};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SafeRideConfig;
pub use error::{ConfigError, ValidationError};
pub use models::{
    ChatMessage, ChildProfile, Location, Principal, Role, SosAlert, TripId, TripRequest,
    TripStatus, UserProfile,
};
pub use prefs::{Preferences, PrivacyNotice};
