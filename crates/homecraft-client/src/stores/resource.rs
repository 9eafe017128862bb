//! # Resource Store
//!
//! Async operations over one backend collection, driving a
//! [`RemoteCollection`] through its pending / fulfilled / rejected phases.
//!
//! ## Operation Map
//! ```text
//! ┌────────────┬────────────────────────────┬────────┬──────────────────────┐
//! │ Operation  │ Request                    │ Bearer │ Fallback message     │
//! ├────────────┼────────────────────────────┼────────┼──────────────────────┤
//! │ list       │ GET    {collection}        │   no   │ Failed to fetch {c}  │
//! │ get        │ GET    {collection}/{id}   │   no   │ Failed to fetch {k}  │
//! │ create     │ POST   {collection}        │  yes   │ Failed to create {k} │
//! │ update     │ PUT    {collection}/{id}   │  yes   │ Failed to update {k} │
//! │ delete     │ DELETE {collection}/{id}   │  yes   │ Failed to delete {k} │
//! └────────────┴────────────────────────────┴────────┴──────────────────────┘
//! ```
//!
//! The lock is taken twice per operation, once to begin and once to
//! complete, and is never held while the request is in flight. The token
//! is passed in by the caller; this store does not look at the session.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use homecraft_core::{
    BearerToken, Completion, Entity, Operation, Product, RemoteCollection, Service,
};

use crate::error::{ClientError, ClientResult};
use crate::transport::{decode, ApiRequest, Transport};

/// Catalog products.
pub type ProductStore = ResourceStore<Product>;

/// Bookable services.
pub type ServiceStore = ResourceStore<Service>;

/// In-memory mirror of a backend collection.
pub struct ResourceStore<E> {
    state: Mutex<RemoteCollection<E>>,
}

impl<E: Entity> Default for ResourceStore<E> {
    fn default() -> Self {
        ResourceStore {
            state: Mutex::new(RemoteCollection::new()),
        }
    }
}

impl<E: Entity> ResourceStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RemoteCollection<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", E::COLLECTION, id)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Replaces the item list with the backend's.
    pub async fn list(&self, transport: &impl Transport) -> ClientResult<Vec<E>> {
        self.run(
            Operation::List,
            transport,
            ApiRequest::get(E::COLLECTION),
            |body| {
                let items: Vec<E> = decode(body)?;
                Ok((items.clone(), Completion::Listed(items)))
            },
        )
        .await
    }

    /// Fetches one record into the selection.
    pub async fn get(&self, transport: &impl Transport, id: &str) -> ClientResult<E> {
        self.run(
            Operation::Get,
            transport,
            ApiRequest::get(Self::item_path(id)),
            |body| {
                let entity: E = decode(body)?;
                Ok((entity.clone(), Completion::Fetched(entity)))
            },
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub async fn create<D: Serialize + ?Sized>(
        &self,
        transport: &impl Transport,
        draft: &D,
        token: &BearerToken,
    ) -> ClientResult<E> {
        let request = ApiRequest::post(E::COLLECTION, encode(draft)?).with_bearer(token);
        self.run(Operation::Create, transport, request, |body| {
            let entity: E = decode(body)?;
            Ok((entity.clone(), Completion::Created(entity)))
        })
        .await
    }

    pub async fn update<D: Serialize + ?Sized>(
        &self,
        transport: &impl Transport,
        id: &str,
        draft: &D,
        token: &BearerToken,
    ) -> ClientResult<E> {
        let request = ApiRequest::put(Self::item_path(id), encode(draft)?).with_bearer(token);
        self.run(Operation::Update, transport, request, |body| {
            let entity: E = decode(body)?;
            Ok((entity.clone(), Completion::Updated(entity)))
        })
        .await
    }

    /// Removes every item with `id` once the backend confirms. The response
    /// body is ignored.
    pub async fn delete(
        &self,
        transport: &impl Transport,
        id: &str,
        token: &BearerToken,
    ) -> ClientResult<()> {
        let request = ApiRequest::delete(Self::item_path(id)).with_bearer(token);
        let id = id.to_string();
        self.run(Operation::Delete, transport, request, move |_| {
            Ok(((), Completion::Deleted(id)))
        })
        .await
    }

    /// Runs one operation through the three phases.
    ///
    /// The caller gets the backend's answer even when the completion turns
    /// out to be stale; only the stored state ignores it.
    async fn run<T>(
        &self,
        op: Operation,
        transport: &impl Transport,
        request: ApiRequest,
        fulfil: impl FnOnce(Value) -> ClientResult<(T, Completion<E>)>,
    ) -> ClientResult<T> {
        let ticket = self.lock().begin(op);
        debug!(kind = E::KIND, %op, seq = ticket.seq(), "Request pending");

        let outcome = transport.execute(request).await.and_then(fulfil);

        let (result, completion) = match outcome {
            Ok((value, completion)) => (Ok(value), completion),
            Err(err) => {
                let message = err.rejection_message(&E::fallback_message(op));
                warn!(kind = E::KIND, %op, error = %err, "Request failed");
                (Err(err), Completion::Rejected(message))
            }
        };

        if self.lock().complete(ticket, completion) {
            debug!(kind = E::KIND, %op, seq = ticket.seq(), "Request settled");
        } else {
            debug!(kind = E::KIND, %op, seq = ticket.seq(), "Discarding stale completion");
        }
        result
    }

    // -------------------------------------------------------------------------
    // Sync Operations & Queries
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> RemoteCollection<E> {
        self.lock().clone()
    }

    pub fn items(&self) -> Vec<E> {
        self.lock().items().to_vec()
    }

    pub fn selected(&self) -> Option<E> {
        self.lock().selected().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error().map(String::from)
    }

    pub fn success(&self) -> bool {
        self.lock().success()
    }

    /// Clears the mutation success flag (e.g. after the admin form closes).
    pub fn reset_success(&self) {
        self.lock().reset_success();
    }

    /// Clears success and error.
    pub fn reset_status(&self) {
        self.lock().reset_status();
    }

    pub(crate) fn latest(&self) -> Option<E> {
        self.lock().latest().cloned()
    }

    pub(crate) fn clear_latest(&self) {
        self.lock().clear_latest();
    }
}

fn encode<D: Serialize + ?Sized>(draft: &D) -> ClientResult<Value> {
    serde_json::to_value(draft).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GatedTransport, ScriptedTransport};
    use crate::transport::HttpMethod;
    use homecraft_core::{Money, ProductDraft};
    use serde_json::json;

    fn steel_gate() -> Value {
        json!({"id": "p1", "name": "Steel Gate", "price": 12000, "countInStock": 3})
    }

    fn token() -> BearerToken {
        BearerToken::new("jwt-admin")
    }

    #[tokio::test]
    async fn test_list_then_delete() {
        let products = ProductStore::new();
        let transport = ScriptedTransport::new()
            .reply(json!([steel_gate()]))
            .reply(json!({"message": "Product removed"}));

        products.list(&transport).await.unwrap();
        assert!(!products.is_loading());
        assert_eq!(products.items().len(), 1);
        assert_eq!(products.items()[0].name, "Steel Gate");
        assert_eq!(products.items()[0].price, Money::new(12000));

        products.delete(&transport, "p1", &token()).await.unwrap();
        assert!(products.items().is_empty());
        assert!(products.success());

        let sent = transport.requests();
        assert_eq!(sent[0].path, "products");
        assert_eq!(sent[0].bearer, None);
        assert_eq!(sent[1].method, HttpMethod::Delete);
        assert_eq!(sent[1].path, "products/p1");
        assert_eq!(sent[1].bearer.as_deref(), Some("jwt-admin"));
    }

    #[tokio::test]
    async fn test_list_accepts_fractional_prices() {
        let products = ProductStore::new();
        let transport = ScriptedTransport::new().reply(json!([
            steel_gate(),
            {"id": "p2", "name": "Grout", "price": 49.5}
        ]));

        products.list(&transport).await.unwrap();
        assert_eq!(products.error(), None);
        assert_eq!(products.items().len(), 2);
        assert_eq!(products.items()[1].price, Money::from_major_minor(49, 50));
    }

    #[tokio::test]
    async fn test_list_failure_uses_server_message_or_fallback() {
        let products = ProductStore::new();
        let transport = ScriptedTransport::new()
            .fail(500, Some("Database down"))
            .fail(502, None);

        products.list(&transport).await.unwrap_err();
        assert_eq!(products.error().as_deref(), Some("Database down"));

        products.list(&transport).await.unwrap_err();
        assert_eq!(products.error().as_deref(), Some("Failed to fetch products"));
        assert!(!products.is_loading());
    }

    #[tokio::test]
    async fn test_get_sets_selection() {
        let services = ServiceStore::new();
        let transport = ScriptedTransport::new()
            .reply(json!({"_id": "s1", "title": "Tile fitting", "price": 40}))
            .fail(404, None);

        services.get(&transport, "s1").await.unwrap();
        assert_eq!(services.selected().map(|s| s.title), Some("Tile fitting".into()));

        services.get(&transport, "s9").await.unwrap_err();
        assert_eq!(services.error().as_deref(), Some("Failed to fetch service"));
    }

    #[tokio::test]
    async fn test_create_appends_and_sends_draft() {
        let products = ProductStore::new();
        let transport = ScriptedTransport::new().reply(steel_gate());
        let draft = ProductDraft {
            name: "Steel Gate".into(),
            price: Money::new(12000),
            count_in_stock: 3,
            ..ProductDraft::default()
        };

        let created = products.create(&transport, &draft, &token()).await.unwrap();
        assert_eq!(created.id, "p1");
        assert_eq!(products.items().len(), 1);
        assert!(products.success());

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["countInStock"], 3);

        products.reset_success();
        assert!(!products.success());
    }

    #[tokio::test]
    async fn test_update_miss_leaves_items_but_succeeds() {
        let products = ProductStore::new();
        let transport = ScriptedTransport::new()
            .reply(json!([steel_gate()]))
            .reply(json!({"id": "p404", "name": "Ghost", "price": 1}));

        products.list(&transport).await.unwrap();
        let before = products.items();

        products
            .update(&transport, "p404", &ProductDraft::default(), &token())
            .await
            .unwrap();
        assert_eq!(products.items(), before);
        assert!(products.success());
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_success_off() {
        let products = ProductStore::new();
        let transport = ScriptedTransport::new().fail(403, None);

        let err = products.delete(&transport, "p1", &token()).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!products.success());
        assert_eq!(products.error().as_deref(), Some("Failed to delete product"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_rejected() {
        let products = ProductStore::new();
        let transport = ScriptedTransport::new().reply(json!({"not": "a list"}));

        let err = products.list(&transport).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert_eq!(products.error().as_deref(), Some("Failed to fetch products"));
    }

    #[tokio::test]
    async fn test_out_of_order_completion_is_discarded() {
        let products = ProductStore::new();
        let (transport, mut gates) = GatedTransport::new(2);
        let second_gate = gates.pop().unwrap();
        let first_gate = gates.pop().unwrap();

        // The later request answers first.
        second_gate
            .send(Ok(json!([{"id": "p2", "name": "Fresh", "price": 10}])))
            .unwrap();

        let (first, second, _) = tokio::join!(
            products.list(&transport),
            products.list(&transport),
            async move {
                first_gate
                    .send(Ok(json!([{"id": "p1", "name": "Stale", "price": 10}])))
                    .unwrap();
            }
        );

        // Both callers get their own answer...
        assert_eq!(first.unwrap()[0].name, "Stale");
        assert_eq!(second.unwrap()[0].name, "Fresh");
        // ...but only the latest request shapes the store.
        assert_eq!(products.items()[0].name, "Fresh");
        assert!(!products.is_loading());
    }
}
