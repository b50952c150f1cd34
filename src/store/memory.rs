use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, DEFAULT_SKILLS};
use crate::models::{
    Event, NewSession, NewUser, ProfileInput, User, VolunteerHistory, VolunteerProfile,
};

struct Session {
    user_id: Uuid,
    token_hash: Vec<u8>,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    profiles: Vec<VolunteerProfile>,
    skills: BTreeSet<String>,
    events: Vec<Event>,
    history: Vec<VolunteerHistory>,
}

/// Process-local store. Data lives as long as the value does.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let tables = Tables {
            skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };

        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("User '{}'", user.email)));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_session(&self, session: NewSession) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.sessions.push(Session {
            user_id: session.user_id,
            token_hash: session.token_hash,
            expires_at: session.expires_at,
            revoked: false,
        });
        Ok(())
    }

    async fn find_session_user(
        &self,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        let user = tables
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash && !s.revoked && s.expires_at > now)
            .and_then(|s| tables.users.iter().find(|u| u.id == s.user_id))
            .cloned();
        Ok(user)
    }

    async fn revoke_session(&self, token_hash: &[u8]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        for session in tables
            .sessions
            .iter_mut()
            .filter(|s| s.token_hash == token_hash)
        {
            session.revoked = true;
        }
        Ok(())
    }

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<VolunteerProfile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn save_profile(&self, id: Uuid, input: ProfileInput) -> StoreResult<VolunteerProfile> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == id) {
            return Err(StoreError::NotFound(format!("User '{}'", id)));
        }

        let now = Utc::now();
        let created_at = tables
            .profiles
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.created_at)
            .unwrap_or(now);

        let profile = VolunteerProfile {
            id,
            full_name: input.full_name,
            address1: input.address1,
            address2: input.address2,
            city: input.city,
            state: input.state,
            zip_code: input.zip_code.into(),
            skills: input.skills,
            preferences: input.preferences,
            availability: input.availability,
            created_at,
            updated_at: now,
        };

        match tables.profiles.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = profile.clone(),
            None => tables.profiles.push(profile.clone()),
        }
        Ok(profile)
    }

    async fn list_profiles(&self) -> StoreResult<Vec<VolunteerProfile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.clone())
    }

    async fn list_skills(&self) -> StoreResult<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables.skills.iter().cloned().collect())
    }

    async fn add_skill(&self, name: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.skills.insert(name.to_string()) {
            return Err(StoreError::Conflict(format!("Skill '{}'", name)));
        }
        Ok(())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events = tables.events.clone();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.events.iter().any(|e| e.id == event.id) {
            return Err(StoreError::Conflict(format!("Event '{}'", event.id)));
        }
        tables.events.push(event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => {
                *existing = event.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("Event '{}'", event.id))),
        }
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        let existed = tables.events.len() != before;
        if existed {
            tables.history.retain(|h| h.event_id != id);
        }
        Ok(existed)
    }

    async fn insert_history(&self, records: &[VolunteerHistory]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        for record in records {
            if !tables.profiles.iter().any(|p| p.id == record.volunteer_id) {
                return Err(StoreError::NotFound(format!(
                    "Volunteer '{}'",
                    record.volunteer_id
                )));
            }
            if !tables.events.iter().any(|e| e.id == record.event_id) {
                return Err(StoreError::NotFound(format!("Event '{}'", record.event_id)));
            }
        }
        tables.history.extend_from_slice(records);
        Ok(())
    }

    async fn list_history(&self, volunteer_id: Option<Uuid>) -> StoreResult<Vec<VolunteerHistory>> {
        let tables = self.tables.read().await;
        Ok(tables
            .history
            .iter()
            .filter(|h| volunteer_id.map_or(true, |id| h.volunteer_id == id))
            .cloned()
            .collect())
    }
}
