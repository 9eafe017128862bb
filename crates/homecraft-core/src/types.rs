//! # Domain Types
//!
//! Wire entities exchanged with the storefront backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Service      │   │   UserRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id? name?      │       │
//! │  │  name           │   │  title          │   │  email?         │       │
//! │  │  price (Money)  │   │  price (Money)  │   │  isAdmin        │       │
//! │  │  countInStock   │   │  unit           │   │  ..extra        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │ BookingRequest  │   │  OrderRequest   │   write-mostly snapshots:    │
//! │  │  serviceId      │   │  orderItems     │   identity + name frozen at  │
//! │  │  serviceName    │   │  totalPrice     │   submission time, never     │
//! │  │  date, address  │   │  paymentMethod  │   synced back to catalog     │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All JSON is camelCase. Missing optional catalog fields decode to their
//! defaults so partial records from the backend still load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::cart::{Cart, CartItem};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::remote::{Entity, Operation};
use crate::validation::{
    validate_email, validate_password, validate_price, validate_required, ValidationResult,
};

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier.
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price.
    pub price: Money,

    /// Image URL or asset reference.
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub category: String,

    /// Units on hand, used as the cart's stock limit hint.
    #[serde(default)]
    pub count_in_stock: i64,
}

impl Entity for Product {
    const KIND: &'static str = "product";
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update payload for a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image: String,
    pub category: String,
    pub count_in_stock: i64,
}

impl ProductDraft {
    /// Checks the admin form rules.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name)?;
        validate_price(self.price)?;
        if self.count_in_stock < 0 {
            return Err(crate::ValidationError::OutOfRange {
                field: "countInStock".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
        Ok(())
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        ProductDraft {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            count_in_stock: product.count_in_stock,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// A bookable service (installation, repair, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(alias = "_id")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Price per `unit`.
    pub price: Money,

    /// Billing unit, e.g. "per sq ft" or "per visit".
    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub image: String,
}

impl Entity for Service {
    const KIND: &'static str = "service";
    const COLLECTION: &'static str = "services";
    // The service detail view edits in place, so an update refreshes it too.
    const SELECT_ON_UPDATE: bool = true;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update payload for a service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub title: String,
    pub description: String,
    pub price: Money,
    pub unit: String,
    pub image: String,
}

impl ServiceDraft {
    /// Checks the admin form rules.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("title", &self.title)?;
        validate_price(self.price)
    }
}

impl From<&Service> for ServiceDraft {
    fn from(service: &Service) -> Self {
        ServiceDraft {
            title: service.title.clone(),
            description: service.description.clone(),
            price: service.price,
            unit: service.unit.clone(),
            image: service.image.clone(),
        }
    }
}

// =============================================================================
// Users & Authentication
// =============================================================================

/// The authenticated user as returned by the backend.
///
/// Only `isAdmin` is interpreted; every other field the server sends is
/// preserved in `extra` so the durable record round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Best human-readable label for the user.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("customer")
    }
}

/// Body of a successful login/register response: user fields plus token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,

    #[serde(flatten)]
    pub user: UserRecord,
}

/// Login form payload.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_email(&self.email)?;
        validate_required("password", &self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form payload.
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Bookings
// =============================================================================

/// Booking submission: a snapshot of the service plus visit details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub service_id: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Snapshots `service` into a booking for `date` at `address`.
    pub fn for_service(
        service: &Service,
        date: NaiveDate,
        address: impl Into<String>,
        notes: Option<String>,
    ) -> CoreResult<Self> {
        let address = address.into();
        validate_required("address", &address)?;

        Ok(BookingRequest {
            service_id: service.id.clone(),
            service_name: service.title.clone(),
            date,
            address,
            notes: notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// A booking as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    pub service_id: String,
    pub service_name: String,
    /// Echoed back as the backend formats it.
    pub date: String,
    pub address: String,
    #[serde(default)]
    pub status: String,
}

impl Entity for Booking {
    const KIND: &'static str = "booking";
    const COLLECTION: &'static str = "bookings";

    fn id(&self) -> &str {
        &self.id
    }

    fn fallback_message(_op: Operation) -> String {
        "Booking failed".to_string()
    }
}

// =============================================================================
// Orders
// =============================================================================

/// How an order is paid. Checkout has no payment gateway, so cash on
/// delivery is the only method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
}

/// Order submission built from the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_items: Vec<CartItem>,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    pub items_price: Money,
    pub tax_price: Money,
    pub shipping_price: Money,
    pub total_price: Money,
}

impl OrderRequest {
    /// Builds a cash-on-delivery order for everything in `cart`.
    ///
    /// Shipping is free and no tax is charged, so the total equals the
    /// cart subtotal.
    pub fn from_cart(cart: &Cart, shipping_address: impl Into<String>) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let shipping_address = shipping_address.into();
        validate_required("shippingAddress", &shipping_address)?;

        let items_price = cart.subtotal();
        Ok(OrderRequest {
            order_items: cart.items().to_vec(),
            shipping_address,
            payment_method: PaymentMethod::CashOnDelivery,
            items_price,
            tax_price: Money::zero(),
            shipping_price: Money::zero(),
            total_price: items_price,
        })
    }
}

/// A placed order. Only the id is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Entity for Order {
    const KIND: &'static str = "order";
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> &str {
        &self.id
    }

    fn fallback_message(_op: Operation) -> String {
        "Order failed".to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
