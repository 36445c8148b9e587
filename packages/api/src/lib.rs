//! # API crate: the client's side of the SafeRide backend
//!
//! Everything the UI needs to talk to the backend actor, independent of any
//! rendering framework.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actor`] | The [`Actor`] trait: one async method per backend RPC, plus wire method names |
//! | [`http`] | [`HttpActor`]: JSON-RPC over HTTP with a bearer token |
//! | [`memory`] | [`MemoryActor`]: in-process backend for tests and offline use |
//! | [`session`] | [`Identity`] and the sign-in/sign-out endpoints |
//! | [`queries`] | [`DataAccess`]: cache-first queries, coalescing, invalidating mutations |
//! | [`location`] | [`LocationSharing`]: throttled forwarding of a position watch |
//!
//! The query cache itself and every pure helper (validation, trip lifecycle,
//! role dispatch) live in the `store` crate.

pub mod actor;
mod coalesce;
pub mod error;
pub mod http;
pub mod location;
pub mod memory;
pub mod queries;
pub mod session;

pub use actor::{Actor, ActorResult};
pub use coalesce::{InflightGuard, QueryCoalescer};
pub use error::ActorError;
pub use http::HttpActor;
pub use location::{
    Geolocation, LocationError, LocationSharing, PositionError, PositionEvent, PositionOptions,
    SharingEvent, UnsupportedGeolocation,
};
pub use memory::MemoryActor;
pub use queries::{keys, DataAccess};
pub use session::{Identity, SessionClient};

pub use store::SafeRideConfig;
