//! # homecraft-core: Pure State Logic for the Homecraft Storefront
//!
//! This crate is the **heart** of the storefront client. Every state
//! transition the UI can observe is a pure reducer defined here; the I/O
//! (durable storage, HTTP) lives in `homecraft-storage` and
//! `homecraft-client`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Homecraft Client Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 View Layer (CLI / any frontend)                  │   │
//! │  │   Catalog ──► Cart ──► Checkout      Login ──► Admin console    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ dispatch                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              homecraft-client (stores + transport)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ homecraft-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │   cart   │ │ session  │ │  remote  │ │  guard   │          │   │
//! │  │   │  Cart    │ │ Session  │ │ Remote-  │ │ admin_   │          │   │
//! │  │   │ CartItem │ │ Bearer-  │ │Collection│ │  route   │          │   │
//! │  │   │          │ │  Token   │ │  Ticket  │ │          │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE REDUCERS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire entities (Product, Service, Booking, Order, ...)
//! - [`money`] - Integral money with Indian digit grouping
//! - [`cart`] - Cart reducer with full-replace merge semantics
//! - [`session`] - Authentication state machine
//! - [`remote`] - Generic three-phase remote collection lifecycle
//! - [`guard`] - Admin route guard
//! - [`validation`] - Input rules checked before any store is touched
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use homecraft_core::cart::{Cart, CartItem};
//! use homecraft_core::money::Money;
//!
//! let mut cart = Cart::new();
//! let gate = CartItem::new("p1", "Steel Gate", Money::new(12000), 3, 1);
//! cart.add_or_replace(gate).unwrap();
//!
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(cart.subtotal(), Money::new(12000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod guard;
pub mod money;
pub mod remote;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals, DEFAULT_STOCK_HINT};
pub use error::{CoreError, CoreResult, ValidationError};
pub use guard::{admin_route, post_login_destination, GuardDecision, Redirect};
pub use money::Money;
pub use remote::{Completion, Entity, Operation, Phase, RemoteCollection, Ticket};
pub use session::{AuthKind, AuthTicket, BearerToken, Session};
pub use types::*;

// =============================================================================
// Durable Storage Keys
// =============================================================================
// The three keys the storefront persists. Absence of a key means the
// empty/anonymous default.

/// Raw bearer token string.
pub const TOKEN_KEY: &str = "token";

/// JSON-serialized [`UserRecord`].
pub const USER_KEY: &str = "user";

/// JSON-serialized list of [`CartItem`].
pub const CART_KEY: &str = "cartItems";

// =============================================================================
// Navigation Targets
// =============================================================================

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated non-admins are sent.
pub const HOME_PATH: &str = "/";

/// Landing page for admins after login.
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
