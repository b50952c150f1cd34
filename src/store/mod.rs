//! Data access.
//!
//! Handlers never touch a database directly; they receive a [`Store`]
//! through the router state. [`PgStore`] backs production, [`MemoryStore`]
//! backs development runs without `DATABASE_URL` and the test-suite.

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Event, NewSession, NewUser, ProfileInput, User, VolunteerHistory, VolunteerProfile,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Labels every fresh store starts with.
pub const DEFAULT_SKILLS: [&str; 5] = ["Cooking", "Cleaning", "Driving", "Gardening", "Handyman"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("stored data is invalid: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the API needs from persistence.
///
/// Listing methods return rows in a stable order: events by date, profiles
/// and history by creation time. The matching pool relies on that order for
/// its tie-break.
pub trait Store: Send + Sync + 'static {
    fn create_user(&self, user: NewUser) -> impl Future<Output = StoreResult<User>> + Send;

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn create_session(&self, session: NewSession)
        -> impl Future<Output = StoreResult<()>> + Send;

    /// The user owning an unexpired, unrevoked session.
    fn find_session_user(
        &self,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn revoke_session(&self, token_hash: &[u8]) -> impl Future<Output = StoreResult<()>> + Send;

    fn get_profile(
        &self,
        id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<VolunteerProfile>>> + Send;

    /// Creates or replaces the profile owned by user `id`.
    fn save_profile(
        &self,
        id: Uuid,
        input: ProfileInput,
    ) -> impl Future<Output = StoreResult<VolunteerProfile>> + Send;

    fn list_profiles(&self) -> impl Future<Output = StoreResult<Vec<VolunteerProfile>>> + Send;

    fn list_skills(&self) -> impl Future<Output = StoreResult<Vec<String>>> + Send;

    fn add_skill(&self, name: &str) -> impl Future<Output = StoreResult<()>> + Send;

    fn list_events(&self) -> impl Future<Output = StoreResult<Vec<Event>>> + Send;

    fn get_event(&self, id: Uuid) -> impl Future<Output = StoreResult<Option<Event>>> + Send;

    fn insert_event(&self, event: &Event) -> impl Future<Output = StoreResult<()>> + Send;

    fn update_event(&self, event: &Event) -> impl Future<Output = StoreResult<()>> + Send;

    /// Deletes the event and its history. Returns whether it existed.
    fn delete_event(&self, id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Inserts all records or none.
    fn insert_history(
        &self,
        records: &[VolunteerHistory],
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn list_history(
        &self,
        volunteer_id: Option<Uuid>,
    ) -> impl Future<Output = StoreResult<Vec<VolunteerHistory>>> + Send;
}
