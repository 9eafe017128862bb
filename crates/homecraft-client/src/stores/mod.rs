//! # Stores
//!
//! Each store owns one slice of client state behind a `Mutex`. Guards are
//! short-lived and never held across an `.await`.
//!
//! ```text
//! ┌──────────────┬──────────────┬─────────────────────────────────────────┐
//! │ Store        │ Durable keys │ Network                                 │
//! ├──────────────┼──────────────┼─────────────────────────────────────────┤
//! │ CartStore    │ cartItems    │ none                                    │
//! │ SessionStore │ token, user  │ auth/login, auth/register               │
//! │ ProductStore │ none         │ products CRUD                           │
//! │ ServiceStore │ none         │ services CRUD                           │
//! │ BookingStore │ none         │ POST bookings                           │
//! │ OrderStore   │ none         │ POST orders                             │
//! └──────────────┴──────────────┴─────────────────────────────────────────┘
//! ```

pub mod booking;
pub mod cart;
pub mod order;
pub mod resource;
pub mod session;

pub use booking::BookingStore;
pub use cart::CartStore;
pub use order::OrderStore;
pub use resource::{ProductStore, ResourceStore, ServiceStore};
pub use session::SessionStore;
