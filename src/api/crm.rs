//! CRM resources: locations, properties, customers, bookings and tasks.
//!
//! Every resource exposes the same collection routes under `/api/{name}/`.
//! Unknown server fields are kept in `extra` so updates round-trip them.

use std::fmt;
use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::api::page::Page;
use crate::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_one")]
    pub capacity: u32,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub location: Option<u64>,
    /// Bound Google calendar, empty when none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub calendar_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A booked interval returned by the availability lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedRange {
    pub check_in: String,
    pub check_out: String,
    #[serde(default)]
    pub status: BookingStatus,
}

impl BookedRange {
    /// Whether `[check_in, check_out)` intersects this range.
    pub fn overlaps(&self, check_in: &str, check_out: &str) -> bool {
        // ISO dates order lexically.
        self.check_in.as_str() < check_out && self.check_out.as_str() > check_in
    }
}

impl fmt::Display for BookedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.check_in, self.check_out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub property: Option<u64>,
    #[serde(default)]
    pub booked: Vec<BookedRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_vip: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub property: u64,
    pub customer: u64,
    /// `YYYY-MM-DD`
    pub check_in: String,
    pub check_out: String,
    #[serde(default = "default_one")]
    pub guests: u32,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub property: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed handle on one collection endpoint.
pub struct Resource<'a, T> {
    client: &'a ApiClient,
    path: &'static str,
    _item: PhantomData<T>,
}

impl<T> Clone for Resource<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resource<'_, T> {}

impl<'a, T> Resource<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(client: &'a ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _item: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    fn item_path(&self, id: u64) -> String {
        format!("{}{}/", self.path, id)
    }

    pub async fn list(self) -> Result<Vec<T>, ApiError> {
        Ok(self.page().await?.into_items())
    }

    pub async fn page(self) -> Result<Page<T>, ApiError> {
        self.client.get_json(self.path).await
    }

    pub async fn get(self, id: u64) -> Result<T, ApiError> {
        self.client.get_json(&self.item_path(id)).await
    }

    pub async fn create(self, item: &T) -> Result<T, ApiError> {
        self.client.post_json(self.path, item).await
    }

    pub async fn update(self, id: u64, item: &T) -> Result<T, ApiError> {
        let builder = self.client.request(Method::PUT, &self.item_path(id))?.json(item);
        self.client.send_json(builder).await
    }

    /// Change only the fields present in `fields`.
    pub async fn patch<B>(self, id: u64, fields: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.client.request(Method::PATCH, &self.item_path(id))?.json(fields);
        self.client.send_json(builder).await
    }

    /// Delete an item. `hard` asks the backend to skip soft deletion.
    pub async fn delete(self, id: u64, hard: bool) -> Result<(), ApiError> {
        let mut path = self.item_path(id);
        if hard {
            path.push_str("?hard=1");
        }
        let builder = self.client.request(Method::DELETE, &path)?;
        self.client.send(builder).await?;
        Ok(())
    }
}

impl Resource<'_, Property> {
    /// Bookings that intersect `start..end` (`YYYY-MM-DD`) for one property.
    pub async fn availability(self, id: u64, start: &str, end: &str) -> Result<Availability, ApiError> {
        let path = format!("{}availability/", self.item_path(id));
        let builder = self
            .client
            .request(Method::GET, &path)?
            .query(&[("start", start), ("end", end)]);
        self.client.send_json(builder).await
    }
}

impl ApiClient {
    pub fn locations(&self) -> Resource<'_, Location> {
        Resource::new(self, "/api/locations/")
    }

    pub fn properties(&self) -> Resource<'_, Property> {
        Resource::new(self, "/api/properties/")
    }

    pub fn customers(&self) -> Resource<'_, Customer> {
        Resource::new(self, "/api/customers/")
    }

    pub fn bookings(&self) -> Resource<'_, Booking> {
        Resource::new(self, "/api/bookings/")
    }

    pub fn tasks(&self) -> Resource<'_, Task> {
        Resource::new(self, "/api/tasks/")
    }
}
