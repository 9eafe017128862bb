//! # Booking Store
//!
//! Service bookings submitted by signed-in customers.

use homecraft_core::{BearerToken, Booking, BookingRequest};

use crate::error::ClientResult;
use crate::stores::resource::ResourceStore;
use crate::transport::Transport;

/// Bookings made in this session.
#[derive(Default)]
pub struct BookingStore {
    inner: ResourceStore<Booking>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `POST bookings`. On failure the stored error is the backend's
    /// message or "Booking failed".
    pub async fn create(
        &self,
        transport: &impl Transport,
        request: &BookingRequest,
        token: &BearerToken,
    ) -> ClientResult<Booking> {
        self.inner.create(transport, request, token).await
    }

    /// Clears success and error, e.g. when the booking dialog closes.
    pub fn reset(&self) {
        self.inner.reset_status();
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.inner.items()
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
