//! # Order Store
//!
//! Cash-on-delivery orders placed from the cart. The most recent order is
//! kept as the "current" one for the confirmation view.

use homecraft_core::{BearerToken, Order, OrderRequest};

use crate::error::ClientResult;
use crate::stores::resource::ResourceStore;
use crate::transport::Transport;

#[derive(Default)]
pub struct OrderStore {
    inner: ResourceStore<Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `POST orders`. On failure the stored error is the backend's message
    /// or "Order failed".
    pub async fn create(
        &self,
        transport: &impl Transport,
        request: &OrderRequest,
        token: &BearerToken,
    ) -> ClientResult<Order> {
        self.inner.create(transport, request, token).await
    }

    /// The order returned by the last successful submission.
    pub fn current(&self) -> Option<Order> {
        self.inner.latest()
    }

    /// Clears success, error and the current order.
    pub fn reset(&self) {
        self.inner.reset_status();
        self.inner.clear_latest();
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    pub fn success(&self) -> bool {
        self.inner.success()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.error()
    }
}
