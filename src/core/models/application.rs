use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Checks a reviewer decision against the current status.
    ///
    /// Only `pending` may be decided, except that an approved application may
    /// still be rejected, which revokes the membership it produced.
    pub fn transition(self, to: ApplicationStatus) -> Result<Transition, Error> {
        use ApplicationStatus::*;
        match (self, to) {
            (Pending, Approved) => Ok(Transition::Approve),
            (Pending, Rejected) => Ok(Transition::Reject),
            (Approved, Rejected) => Ok(Transition::Revoke),
            (from, to) => Err(Error::Conflict(format!("application is already {}, cannot mark it {}", from.as_str(), to.as_str()))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject,
    Revoke,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub why_join: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
}

/// Applicant-supplied fields of a new application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub why_join: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub why_join: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    pub reviewed_at: DateTime<Utc>,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
}
