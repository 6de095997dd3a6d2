use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::application::Application;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub application_id: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub application_id: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

impl Insert {
    /// Snapshot of an approved application as an active member.
    pub fn from_application(app: &Application, joined_at: DateTime<Utc>) -> Self {
        Insert {
            id: Uuid::new_v4(),
            community_id: app.community_id,
            user_id: app.user_id,
            email: app.email.clone(),
            full_name: app.name.clone(),
            phone: app.phone.clone(),
            skills: app.skills.clone(),
            experience: app.experience.clone(),
            role: MemberRole::Member,
            status: MemberStatus::Active,
            application_id: Some(app.id),
            joined_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Query {
    pub role: Option<MemberRole>,
    pub status: Option<MemberStatus>,
    pub search: Option<String>,
}

impl Query {
    /// Search term with surrounding whitespace dropped; blank means no search.
    pub fn search_term(&self) -> Option<String> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase)
    }
}

/// Outcome of a membership delete. Only `active` rows count towards a
/// community's `member_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    pub total: u64,
    pub active: u64,
}

impl Removed {
    pub fn from_statuses(statuses: &[MemberStatus]) -> Self {
        Removed {
            total: statuses.len() as u64,
            active: statuses.iter().filter(|s| **s == MemberStatus::Active).count() as u64,
        }
    }
}

/// How a member is addressed when removing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKey {
    UserId(Uuid),
    Email(String),
}

impl MemberKey {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Uuid::parse_str(raw) {
            Ok(id) => MemberKey::UserId(id),
            Err(_) => MemberKey::Email(raw.to_lowercase()),
        }
    }
}
