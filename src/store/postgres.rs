use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    Event, NewSession, NewUser, ProfileInput, User, VolunteerHistory, VolunteerProfile,
};

const USER_COLUMNS: &str = "id, email, password_hash, is_admin, created_at, updated_at";

const PROFILE_COLUMNS: &str = "id, full_name, address1, address2, city, state, zip_code, \
     skills, preferences, availability, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, name, description, zip_code, required_skills, urgency, \
     status, date, volunteer_id, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Successfully connected to database");

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;

        tracing::info!("Migrations run successfully");

        Ok(Self { pool })
    }
}

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    name: String,
    description: String,
    zip_code: String,
    required_skills: Vec<String>,
    urgency: String,
    status: String,
    date: DateTime<Utc>,
    volunteer_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: row.id,
            name: row.name,
            description: row.description,
            zip_code: row.zip_code,
            required_skills: row.required_skills,
            urgency: row
                .urgency
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("event {}: {}", row.id, e)))?,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("event {}: {}", row.id, e)))?,
            date: row.date,
            volunteer_id: row.volunteer_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct HistoryRow {
    id: Uuid,
    volunteer_id: Uuid,
    event_id: Uuid,
    status: String,
    participated_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for VolunteerHistory {
    type Error = StoreError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(VolunteerHistory {
            id: row.id,
            volunteer_id: row.volunteer_id,
            event_id: row.event_id,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("history {}: {}", row.id, e)))?,
            participated_at: row.participated_at,
        })
    }
}

fn conflict_on_unique(err: sqlx::Error, what: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(what),
        _ => StoreError::Database(err),
    }
}

fn missing_on_foreign_key(err: sqlx::Error, what: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound(what),
        _ => StoreError::Database(err),
    }
}

impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, format!("User '{}'", user.email)))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_session(&self, session: NewSession) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO sessions (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(session.user_id)
        .bind(session.token_hash)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session_user(
        &self,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.password_hash, u.is_admin, u.created_at, u.updated_at \
             FROM sessions s JOIN users u ON u.id = s.user_id \
             WHERE s.token_hash = $1 AND s.expires_at > $2 AND s.revoked_at IS NULL",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn revoke_session(&self, token_hash: &[u8]) -> StoreResult<()> {
        sqlx::query(
            "UPDATE sessions SET revoked_at = now() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<VolunteerProfile>> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM volunteer_profiles WHERE id = $1");

        Ok(sqlx::query_as::<_, VolunteerProfile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_profile(&self, id: Uuid, input: ProfileInput) -> StoreResult<VolunteerProfile> {
        let query = format!(
            "INSERT INTO volunteer_profiles \
                 (id, full_name, address1, address2, city, state, zip_code, skills, preferences, availability) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
                 full_name = EXCLUDED.full_name, \
                 address1 = EXCLUDED.address1, \
                 address2 = EXCLUDED.address2, \
                 city = EXCLUDED.city, \
                 state = EXCLUDED.state, \
                 zip_code = EXCLUDED.zip_code, \
                 skills = EXCLUDED.skills, \
                 preferences = EXCLUDED.preferences, \
                 availability = EXCLUDED.availability, \
                 updated_at = now() \
             RETURNING {PROFILE_COLUMNS}"
        );

        sqlx::query_as::<_, VolunteerProfile>(&query)
            .bind(id)
            .bind(input.full_name)
            .bind(input.address1)
            .bind(input.address2)
            .bind(input.city)
            .bind(input.state)
            .bind(String::from(input.zip_code))
            .bind(input.skills)
            .bind(input.preferences)
            .bind(input.availability)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| missing_on_foreign_key(e, format!("User '{}'", id)))
    }

    async fn list_profiles(&self) -> StoreResult<Vec<VolunteerProfile>> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM volunteer_profiles ORDER BY created_at, id"
        );

        Ok(sqlx::query_as::<_, VolunteerProfile>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_skills(&self) -> StoreResult<Vec<String>> {
        Ok(sqlx::query_scalar::<_, String>("SELECT name FROM skills ORDER BY name")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn add_skill(&self, name: &str) -> StoreResult<()> {
        sqlx::query("INSERT INTO skills (name) VALUES ($1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, format!("Skill '{}'", name)))?;
        Ok(())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date, created_at");

        sqlx::query_as::<_, EventRow>(&query)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");

        sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        let query = format!(
            "INSERT INTO events ({EVENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        );

        sqlx::query(&query)
            .bind(event.id)
            .bind(&event.name)
            .bind(&event.description)
            .bind(&event.zip_code)
            .bind(&event.required_skills)
            .bind(event.urgency.as_str())
            .bind(event.status.as_str())
            .bind(event.date)
            .bind(event.volunteer_id)
            .bind(event.created_at)
            .bind(event.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, format!("Event '{}'", event.id)))?;
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE events SET name = $2, description = $3, zip_code = $4, \
                 required_skills = $5, urgency = $6, status = $7, date = $8, \
                 volunteer_id = $9, updated_at = $10 \
             WHERE id = $1",
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.zip_code)
        .bind(&event.required_skills)
        .bind(event.urgency.as_str())
        .bind(event.status.as_str())
        .bind(event.date)
        .bind(event.volunteer_id)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            missing_on_foreign_key(e, format!("Volunteer '{:?}'", event.volunteer_id))
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Event '{}'", event.id)));
        }
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        // volunteer_history rows go with the event (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_history(&self, records: &[VolunteerHistory]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                "INSERT INTO volunteer_history (id, volunteer_id, event_id, status, participated_at) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(record.id)
            .bind(record.volunteer_id)
            .bind(record.event_id)
            .bind(record.status.as_str())
            .bind(record.participated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                missing_on_foreign_key(
                    e,
                    format!(
                        "Volunteer '{}' or event '{}'",
                        record.volunteer_id, record.event_id
                    ),
                )
            })?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_history(&self, volunteer_id: Option<Uuid>) -> StoreResult<Vec<VolunteerHistory>> {
        sqlx::query_as::<_, HistoryRow>(
            "SELECT id, volunteer_id, event_id, status, participated_at \
             FROM volunteer_history \
             WHERE $1::uuid IS NULL OR volunteer_id = $1 \
             ORDER BY participated_at, id",
        )
        .bind(volunteer_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(VolunteerHistory::try_from)
        .collect()
    }
}
