//! Service bookings.

use chrono::NaiveDate;
use homecraft_client::{Storefront, Transport};

use crate::error::{CommandError, CommandResult};

/// Fetches the service so the booking carries its current title, then
/// submits the visit.
pub async fn book<T: Transport>(
    app: &Storefront<T>,
    service_id: &str,
    date: NaiveDate,
    address: &str,
    notes: Option<String>,
) -> CommandResult<()> {
    app.session().require_token()?;

    let service = app
        .load_service(service_id)
        .await
        .map_err(|e| CommandError::rejected(e, app.services().error()))?;

    let booking = app
        .book_service(&service, date, address, notes)
        .await
        .map_err(|e| CommandError::rejected(e, app.bookings().error()))?;

    println!(
        "Booked {} on {} ({}), reference {}",
        booking.service_name, booking.date, booking.status, booking.id
    );
    app.bookings().reset();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{storefront, RecordingTransport};
    use serde_json::json;

    fn visit() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_booking_sends_nothing() {
        let app = storefront(RecordingTransport::new(), None);

        let err = book(&app, "s1", visit(), "12 MG Road", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(app.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_booking_uses_fallback() {
        let transport = RecordingTransport::new()
            .reply(json!({"id": "s1", "title": "Tile fitting", "price": 40, "unit": "per sq ft"}))
            .fail(500, None);
        let app = storefront(transport, Some(false));

        let err = book(&app, "s1", visit(), "12 MG Road", None).await.unwrap_err();
        assert_eq!(err.message, "Booking failed");
    }

    #[tokio::test]
    async fn test_booking_snapshots_service_title() {
        let transport = RecordingTransport::new()
            .reply(json!({"id": "s1", "title": "Tile fitting", "price": 40, "unit": "per sq ft"}))
            .reply(json!({
                "_id": "b1", "serviceId": "s1", "serviceName": "Tile fitting",
                "date": "2026-11-02", "address": "12 MG Road"
            }));
        let app = storefront(transport, Some(false));

        book(&app, "s1", visit(), "12 MG Road", Some("Ring twice".into()))
            .await
            .unwrap();

        let body = app.transport().last_body().unwrap();
        assert_eq!(body["serviceName"], "Tile fitting");
        assert_eq!(body["notes"], "Ring twice");
        assert!(!app.bookings().success());
    }
}
