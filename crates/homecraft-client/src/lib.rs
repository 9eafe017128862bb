//! # homecraft-client: Stores, Transport and State Container
//!
//! The stateful half of the storefront client. Pure transitions come from
//! `homecraft-core`; this crate adds the network round-trips, durable
//! persistence and the [`Storefront`] container that wires them together.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   view ──dispatch──► Storefront                                        │
//! │                          │                                              │
//! │          ┌───────────────┼───────────────────────┐                      │
//! │          │ local, sync   │                       │ async                │
//! │          ▼               ▼                       ▼                      │
//! │     CartStore       SessionStore.logout    ResourceStore<E>            │
//! │          │                                       │                      │
//! │          ▼                                       │ begin → Ticket       │
//! │    KeyValueStore                                 ▼                      │
//! │    (write-through)                          Transport.execute          │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                         complete(ticket, outcome)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `ClientConfig` (TOML + environment)
//! - [`transport`] - `Transport` trait and the `reqwest` implementation
//! - [`stores`] - Cart, session and resource stores
//! - [`state`] - `Storefront` state container
//! - [`error`] - `ClientError`

pub mod config;
pub mod error;
pub mod state;
pub mod stores;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use state::Storefront;
pub use stores::{
    BookingStore, CartStore, OrderStore, ProductStore, ResourceStore, ServiceStore, SessionStore,
};
pub use transport::{ApiClient, ApiRequest, HttpMethod, Transport};
