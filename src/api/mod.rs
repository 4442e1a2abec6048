//! REST client for the dashboard and CRM backends.

pub mod auth;
pub mod chat;
pub mod client;
pub mod crm;
pub mod integrations;
pub mod page;
pub mod speech;
pub mod table;

pub use auth::{Credentials, LoginResponse, Registration, Stats, User};
pub use chat::{ChatMessage, ChatReply, Conversation};
pub use client::{parse_cookie, ApiClient};
pub use crm::{
    Availability, BookedRange, Booking, BookingStatus, Customer, Location, Property,
    PropertyStatus, Resource, Task, TaskStatus,
};
pub use integrations::{Calendar, CalendarList};
pub use page::Page;
pub use speech::{AudioUpload, Transcription, Transfer};
pub use table::{SortOrder, TableState};
