//! Client-side session state machine for the flight-search frontend.
//!
//! Holds the in-memory session (user id + access token), the durable
//! "remember me" flag, and the one-shot bootstrap procedure that decides
//! on startup whether to silently re-authenticate before anything
//! protected is shown.
//!
//! The session is an explicitly passed context object: components that
//! need it receive a `SessionStore` handle, there is no process-wide
//! singleton.
//!
//! State machine per application load:
//!
//! ```text
//! Idle -> Bootstrapping -> { Authenticated, Unauthenticated }
//! ```
//!
//! `Bootstrapping` is entered only when the persist flag is set and no
//! access token is in memory; otherwise the machine settles directly.
//! After the first settle only explicit login or logout changes the
//! terminal state.

pub mod bootstrap;
pub mod errors;
pub mod gate;
pub mod storage;
pub mod store;

pub use bootstrap::BootstrapState;
pub use bootstrap::Bootstrapper;
pub use bootstrap::HttpRefreshClient;
pub use bootstrap::RefreshApi;
pub use errors::BootstrapError;
pub use errors::RefreshError;
pub use errors::StorageError;
pub use gate::GatePolicy;
pub use gate::RouteDecision;
pub use gate::RouteGate;
pub use storage::FileStorage;
pub use storage::InMemoryStorage;
pub use storage::PersistentStorage;
pub use store::Session;
pub use store::SessionStore;
