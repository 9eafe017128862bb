//! # Storefront State Container
//!
//! Owns every store plus the transport and durable storage they share.
//! Built once at startup, passed around by reference, torn down with
//! [`Storefront::shutdown`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Storefront::new(config, transport, storage)                           │
//! │     ├── CartStore::rehydrate     ◄── "cartItems"                       │
//! │     ├── SessionStore::rehydrate  ◄── "token", "user"                   │
//! │     └── empty Product/Service/Booking/Order stores                     │
//! │                                                                         │
//! │  ... view layer dispatches through &Storefront ...                     │
//! │                                                                         │
//! │  storefront.shutdown()                                                 │
//! │     └── nothing left to flush: every durable write already landed      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cross-Store Reads
//! Authorized calls read the bearer token from the session store. No store
//! ever mutates another, except that a successful checkout removes the
//! ordered lines from the cart.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use homecraft_core::{
    Booking, BookingRequest, CartItem, Credentials, Order, OrderRequest, Product, ProductDraft,
    Registration, Service, ServiceDraft,
};
use homecraft_storage::{FileStore, KeyValueStore};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::stores::{
    BookingStore, CartStore, OrderStore, ProductStore, ServiceStore, SessionStore,
};
use crate::transport::{ApiClient, Transport};

/// The client-side state of the storefront.
pub struct Storefront<T> {
    config: ClientConfig,
    transport: T,
    cart: CartStore,
    session: SessionStore,
    products: ProductStore,
    services: ServiceStore,
    bookings: BookingStore,
    orders: OrderStore,
}

impl Storefront<ApiClient> {
    /// Production wiring: `reqwest` transport and a file store in the
    /// configured (or platform default) directory.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let transport = ApiClient::new(&config)?;
        let storage = match config.storage_dir() {
            Some(dir) => FileStore::new(dir.clone()),
            None => FileStore::in_default_location()?,
        };
        debug!(dir = ?storage.base_dir(), "Using file store");
        Ok(Storefront::new(config, transport, Arc::new(storage)))
    }
}

impl<T: Transport> Storefront<T> {
    pub fn new(config: ClientConfig, transport: T, storage: Arc<dyn KeyValueStore>) -> Self {
        let cart = CartStore::rehydrate(Arc::clone(&storage));
        let session = SessionStore::rehydrate(storage);

        info!(
            cart_lines = cart.totals().line_count,
            signed_in = session.is_authenticated(),
            "Storefront initialized"
        );

        Storefront {
            config,
            transport,
            cart,
            session,
            products: ProductStore::new(),
            services: ServiceStore::new(),
            bookings: BookingStore::new(),
            orders: OrderStore::new(),
        }
    }

    /// Explicit teardown.
    pub fn shutdown(self) {
        info!(
            cart_lines = self.cart.totals().line_count,
            signed_in = self.session.is_authenticated(),
            "Storefront shut down"
        );
    }

    // =========================================================================
    // Store Access
    // =========================================================================

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn products(&self) -> &ProductStore {
        &self.products
    }

    pub fn services(&self) -> &ServiceStore {
        &self.services
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.bookings
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<()> {
        self.session.login(&self.transport, credentials).await
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<()> {
        self.session.register(&self.transport, registration).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn load_products(&self) -> ClientResult<Vec<Product>> {
        self.products.list(&self.transport).await
    }

    pub async fn load_product(&self, id: &str) -> ClientResult<Product> {
        self.products.get(&self.transport, id).await
    }

    pub async fn load_services(&self) -> ClientResult<Vec<Service>> {
        self.services.list(&self.transport).await
    }

    pub async fn load_service(&self, id: &str) -> ClientResult<Service> {
        self.services.get(&self.transport, id).await
    }

    /// Fetches a product and puts `quantity` of it in the cart, replacing
    /// any existing line for it.
    pub async fn add_to_cart(&self, product_id: &str, quantity: u32) -> ClientResult<CartItem> {
        let product = self.load_product(product_id).await?;
        let item = CartItem::from_product(&product, quantity);
        self.cart.add_or_replace(item.clone())?;
        Ok(item)
    }

    // =========================================================================
    // Admin Mutations
    // =========================================================================
    // The token comes from the session; without one nothing is sent.

    pub async fn create_product(&self, draft: &ProductDraft) -> ClientResult<Product> {
        draft.validate()?;
        let token = self.session.require_token()?;
        self.products.create(&self.transport, draft, &token).await
    }

    pub async fn update_product(&self, id: &str, draft: &ProductDraft) -> ClientResult<Product> {
        draft.validate()?;
        let token = self.session.require_token()?;
        self.products.update(&self.transport, id, draft, &token).await
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let token = self.session.require_token()?;
        self.products.delete(&self.transport, id, &token).await
    }

    pub async fn create_service(&self, draft: &ServiceDraft) -> ClientResult<Service> {
        draft.validate()?;
        let token = self.session.require_token()?;
        self.services.create(&self.transport, draft, &token).await
    }

    pub async fn update_service(&self, id: &str, draft: &ServiceDraft) -> ClientResult<Service> {
        draft.validate()?;
        let token = self.session.require_token()?;
        self.services.update(&self.transport, id, draft, &token).await
    }

    pub async fn delete_service(&self, id: &str) -> ClientResult<()> {
        let token = self.session.require_token()?;
        self.services.delete(&self.transport, id, &token).await
    }

    // =========================================================================
    // Checkout & Booking
    // =========================================================================

    /// Places a cash-on-delivery order for the whole cart. Once the backend
    /// accepts it, the ordered lines leave the cart; lines added or changed
    /// while the order was in flight stay.
    ///
    /// ## Checks, in order
    /// 1. Signed in, else `NotAuthenticated` (nothing is sent)
    /// 2. Cart not empty and address present, else a validation error
    pub async fn checkout(&self, shipping_address: &str) -> ClientResult<Order> {
        let token = self.session.require_token()?;
        let request = self
            .cart
            .with_cart(|cart| OrderRequest::from_cart(cart, shipping_address))?;

        let order = self.orders.create(&self.transport, &request, &token).await?;
        self.cart.remove_ordered(&request.order_items);
        info!(order_id = %order.id, total = %request.total_price, "Order placed");
        Ok(order)
    }

    /// Books `service` for `date` at `address`.
    pub async fn book_service(
        &self,
        service: &Service,
        date: NaiveDate,
        address: &str,
        notes: Option<String>,
    ) -> ClientResult<Booking> {
        let token = self.session.require_token()?;
        let request = BookingRequest::for_service(service, date, address, notes)?;

        let booking = self.bookings.create(&self.transport, &request, &token).await?;
        info!(booking_id = %booking.id, service = %service.title, "Service booked");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{GatedTransport, ScriptedTransport};
    use homecraft_core::{Money, CART_KEY, TOKEN_KEY, USER_KEY};
    use homecraft_storage::{KeyValueStoreExt, MemoryStore};
    use serde_json::json;

    fn storefront(transport: ScriptedTransport, memory: &MemoryStore) -> Storefront<ScriptedTransport> {
        Storefront::new(ClientConfig::default(), transport, Arc::new(memory.clone()))
    }

    fn signed_in_memory(is_admin: bool) -> MemoryStore {
        MemoryStore::with_values([
            (TOKEN_KEY.to_string(), "jwt-abc".to_string()),
            (USER_KEY.to_string(), json!({"name": "Asha", "isAdmin": is_admin}).to_string()),
        ])
    }

    fn gate(qty: u32) -> CartItem {
        CartItem::new("p1", "Steel Gate", Money::new(12000), 3, qty)
    }

    #[tokio::test]
    async fn test_checkout_requires_session_and_sends_nothing() {
        let memory = MemoryStore::new();
        let app = storefront(ScriptedTransport::new(), &memory);
        app.cart().add_or_replace(gate(1)).unwrap();

        let err = app.checkout("12 MG Road").await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert!(app.transport().requests().is_empty());
        assert!(!app.cart().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_validation_error() {
        let memory = signed_in_memory(false);
        let app = storefront(ScriptedTransport::new(), &memory);

        let err = app.checkout("12 MG Road").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(app.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_success_clears_cart() {
        let memory = signed_in_memory(false);
        let transport = ScriptedTransport::new().reply(json!({"_id": "o1"}));
        let app = storefront(transport, &memory);
        app.cart().add_or_replace(gate(2)).unwrap();

        let order = app.checkout("12 MG Road").await.unwrap();
        assert_eq!(order.id, "o1");
        assert!(app.cart().snapshot().is_empty());
        assert!(!memory.contains(CART_KEY));

        let sent = &app.transport().requests()[0];
        assert_eq!(sent.path, "orders");
        assert_eq!(sent.bearer.as_deref(), Some("jwt-abc"));
        assert_eq!(sent.body.as_ref().unwrap()["itemsPrice"], 24000);
    }

    #[tokio::test]
    async fn test_lines_added_during_checkout_survive() {
        let memory = signed_in_memory(false);
        let (transport, mut gates) = GatedTransport::new(1);
        let accept = gates.remove(0);
        let app = Storefront::new(ClientConfig::default(), transport, Arc::new(memory.clone()));
        app.cart().add_or_replace(gate(1)).unwrap();
        let tiles = CartItem::new("p2", "Tiles", Money::new(40), 100, 10);

        let (order, _) = tokio::join!(app.checkout("12 MG Road"), async {
            app.cart().add_or_replace(tiles.clone()).unwrap();
            accept.send(Ok(json!({"_id": "o1"}))).unwrap();
        });

        assert_eq!(order.unwrap().id, "o1");
        assert_eq!(app.cart().snapshot().items(), &[tiles.clone()]);
        let saved: Vec<CartItem> = memory.get_json(CART_KEY).unwrap().unwrap();
        assert_eq!(saved, vec![tiles]);
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let memory = signed_in_memory(false);
        let transport = ScriptedTransport::new().fail(500, None);
        let app = storefront(transport, &memory);
        app.cart().add_or_replace(gate(1)).unwrap();

        app.checkout("12 MG Road").await.unwrap_err();
        assert_eq!(app.orders().error().as_deref(), Some("Order failed"));
        assert_eq!(app.cart().totals().item_count, 1);
    }

    #[tokio::test]
    async fn test_admin_mutation_without_session() {
        let memory = MemoryStore::new();
        let app = storefront(ScriptedTransport::new(), &memory);

        let err = app.delete_product("p1").await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert!(app.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_admin_mutation_uses_session_token() {
        let memory = signed_in_memory(true);
        let transport = ScriptedTransport::new()
            .reply(json!([{"id": "p1", "name": "Steel Gate", "price": 12000}]))
            .reply(json!({}));
        let app = storefront(transport, &memory);

        app.load_products().await.unwrap();
        app.delete_product("p1").await.unwrap();

        assert!(app.products().items().is_empty());
        let sent = app.transport().requests();
        assert_eq!(sent[1].bearer.as_deref(), Some("jwt-abc"));
    }

    #[tokio::test]
    async fn test_add_to_cart_snapshots_product() {
        let memory = MemoryStore::new();
        let transport = ScriptedTransport::new().reply(json!({
            "id": "p1", "name": "Steel Gate", "price": 12000, "image": "/g.png", "countInStock": 4
        }));
        let app = storefront(transport, &memory);

        let item = app.add_to_cart("p1", 2).await.unwrap();
        assert_eq!(item.count_in_stock, 4);
        assert_eq!(app.cart().snapshot().subtotal(), Money::new(24000));
        assert!(memory.contains(CART_KEY));
    }

    #[tokio::test]
    async fn test_book_service() {
        let memory = signed_in_memory(false);
        let transport = ScriptedTransport::new().reply(json!({
            "_id": "b1", "serviceId": "s1", "serviceName": "Tile fitting",
            "date": "2026-11-02", "address": "12 MG Road"
        }));
        let app = storefront(transport, &memory);
        let service = Service {
            id: "s1".into(),
            title: "Tile fitting".into(),
            description: String::new(),
            price: Money::new(40),
            unit: "per sq ft".into(),
            image: String::new(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();

        let booking = app
            .book_service(&service, date, "12 MG Road", Some("Ring twice".into()))
            .await
            .unwrap();
        assert_eq!(booking.id, "b1");
        assert!(app.bookings().success());

        let body = app.transport().requests()[0].body.clone().unwrap();
        assert_eq!(body["notes"], "Ring twice");
        assert_eq!(body["date"], "2026-11-02");
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let memory = MemoryStore::new();
        let transport = ScriptedTransport::new()
            .reply(json!({"name": "Asha", "isAdmin": true, "token": "jwt-abc"}));
        let app = storefront(transport, &memory);

        app.login(&Credentials::new("asha@example.com", "secret"))
            .await
            .unwrap();
        app.cart().add_or_replace(gate(3)).unwrap();
        app.shutdown();

        let app = storefront(ScriptedTransport::new(), &memory);
        assert!(app.session().is_admin());
        assert_eq!(app.cart().totals().item_count, 3);
        assert_eq!(
            app.session().post_login_destination(Some("/cart")).as_deref(),
            Some("/admin/dashboard")
        );
    }
}
