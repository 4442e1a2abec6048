//! Google Calendar integration endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::api::crm::Property;
use crate::error::ApiError;

const CALENDARS_PATH: &str = "/api/integrations/google/calendars/";
const AUTH_START_PATH: &str = "/api/integrations/google/start/";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Calendar {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalendarList {
    #[serde(default)]
    pub items: Vec<Calendar>,
}

#[derive(Debug, Clone, Deserialize)]
struct AuthStart {
    auth_url: String,
}

#[derive(Debug, Serialize)]
struct CalendarBinding<'a> {
    calendar_id: &'a str,
}

impl ApiClient {
    /// Calendars of the connected Google account.
    pub async fn google_calendars(&self) -> Result<CalendarList, ApiError> {
        self.get_json(CALENDARS_PATH).await
    }

    /// URL that starts the Google consent flow.
    pub async fn google_auth_url(&self) -> Result<String, ApiError> {
        let start: AuthStart = self.get_json(AUTH_START_PATH).await?;
        Ok(start.auth_url)
    }

    /// Bind `calendar_id` to a property so its bookings sync there.
    pub async fn bind_calendar(&self, property_id: u64, calendar_id: &str) -> Result<Property, ApiError> {
        self.properties()
            .patch(property_id, &CalendarBinding { calendar_id })
            .await
    }
}
