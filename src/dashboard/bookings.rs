//! CRM workflows: saving bookings, dashboard counters and calendar sync.

use crate::api::{Booking, Calendar, Property, Stats};
use crate::error::ApiError;
use crate::ui::Severity;

use super::{Dashboard, DashboardError};

pub const BOOKING_SAVED: &str = "Booking saved";
pub const CALENDAR_BOUND: &str = "Calendar bound to property";

/// Marker the backend puts in its detail when the dates are taken.
const DATE_CONFLICT_MARKER: &str = "занят";

const CRM_SOURCE: &str = "crm";

/// Whether a failed save was rejected because the dates are taken.
pub fn is_date_conflict(error: &ApiError) -> bool {
    let ApiError::Status { body: Some(body), .. } = error else {
        return false;
    };
    let detail = match body.get("detail").and_then(|d| d.as_str()) {
        Some(detail) => detail.to_string(),
        None => body.to_string(),
    };
    detail.to_lowercase().contains(DATE_CONFLICT_MARKER)
}

impl Dashboard {
    /// Create or update a booking. Date conflicts are reported together
    /// with the bookings already occupying the requested range.
    pub async fn save_booking(&self, booking: &Booking) -> Result<Booking, DashboardError> {
        let mut payload = booking.clone();
        if payload.source.is_empty() {
            payload.source = CRM_SOURCE.to_string();
        }

        let bookings = self.client.bookings();
        let result = match payload.id {
            Some(id) => bookings.update(id, &payload).await,
            None => bookings.create(&payload).await,
        };

        match result {
            Ok(saved) => {
                self.ctx.notifier.notify(BOOKING_SAVED, Severity::Success);
                Ok(saved)
            }
            Err(error) if is_date_conflict(&error) => Err(self.date_conflict(&payload).await),
            Err(error) => {
                self.handler.surface(&error);
                Err(error.into())
            }
        }
    }

    async fn date_conflict(&self, booking: &Booking) -> DashboardError {
        let requested = format!("{} → {}", booking.check_in, booking.check_out);
        let lookup = self
            .client
            .properties()
            .availability(booking.property, &booking.check_in, &booking.check_out)
            .await;

        let booked = match lookup {
            Ok(availability) => availability.booked,
            Err(error) => {
                tracing::warn!(error = %error, property = booking.property, "Availability lookup failed");
                Vec::new()
            }
        };

        let mut message = format!("Dates are already booked: {}", requested);
        if !booked.is_empty() {
            let ranges: Vec<String> = booked.iter().map(ToString::to_string).collect();
            message.push_str(&format!(". Booked in this period: {}", ranges.join(", ")));
        }
        self.ctx.notifier.notify(&message, Severity::Warning);
        tracing::info!(property = booking.property, overlapping = booked.len(), "Booking dates conflict");

        DashboardError::DateConflict { requested, booked }
    }

    /// Dashboard counters.
    pub async fn stats(&self) -> Result<Stats, DashboardError> {
        let client = &self.client;
        Ok(self.handler.handle_request(move || client.stats()).await?)
    }

    /// Calendars of the connected Google account; empty when none is
    /// connected or the listing fails.
    pub async fn google_calendars(&self) -> Vec<Calendar> {
        match self.client.google_calendars().await {
            Ok(list) => list.items,
            Err(error) => {
                tracing::warn!(error = %error, "Calendar listing failed");
                Vec::new()
            }
        }
    }

    /// Where to send the user to connect a Google account.
    pub async fn google_auth_url(&self) -> Result<String, DashboardError> {
        let client = &self.client;
        Ok(self
            .handler
            .handle_request(move || client.google_auth_url())
            .await?)
    }

    pub async fn bind_calendar(&self, property_id: u64, calendar_id: &str) -> Result<Property, DashboardError> {
        let client = &self.client;
        let property = self
            .handler
            .handle_request(move || client.bind_calendar(property_id, calendar_id))
            .await?;
        self.ctx.notifier.notify(CALENDAR_BOUND, Severity::Success);
        Ok(property)
    }
}
