//! In-memory store used by the unit and handler tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::core::models::{
    application::{Application, ApplicationStatus, Insert as ApplicationInsert, StatusUpdate},
    community::{Community, CommunityStatus, Insert as CommunityInsert, Query as CommunityQuery},
    membership::{Insert as MembershipInsert, MemberKey, MemberStatus, Membership, Query as MembershipQuery, Removed},
    task::{Insert as TaskInsert, Query as TaskQuery, Task, TaskStatus},
};
use crate::core::ports::repository::{ApplicationCommon, CommunityCommon, Manager, MembershipCommon, TaskCommon};
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub communities: Vec<Community>,
    pub applications: Vec<Application>,
    pub memberships: Vec<Membership>,
    pub tasks: Vec<Task>,
}

#[derive(Clone, Default)]
pub struct MemoryManager {
    state: Arc<Mutex<MemoryState>>,
    acquired: Arc<AtomicUsize>,
    fail_membership_inserts: Arc<AtomicBool>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store handles handed out so far.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn fail_membership_inserts(&self, fail: bool) {
        self.fail_membership_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MemoryState {
        self.state.lock().unwrap().clone()
    }

    pub fn seed_community(&self, name: &str) -> Community {
        let now = Utc::now();
        let community = Community {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            status: CommunityStatus::Active,
            owner_id: Uuid::new_v4(),
            member_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().communities.push(community.clone());
        community
    }

    pub fn member_count(&self, community_id: Uuid) -> i64 {
        self.snapshot().communities.iter().find(|c| c.id == community_id).map(|c| c.member_count).unwrap_or_default()
    }
}

impl Manager for MemoryManager {
    type Store<'m> = MemoryStore;

    async fn db(&self) -> Result<Self::Store<'_>, Error> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryStore {
            state: self.state.clone(),
            fail_membership_inserts: self.fail_membership_inserts.load(Ordering::SeqCst),
        })
    }
}

pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_membership_inserts: bool,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    fn remove_where<F>(&self, matches: F) -> Removed
    where
        F: Fn(&Membership) -> bool,
    {
        let mut state = self.state();
        let statuses: Vec<MemberStatus> = state.memberships.iter().filter(|m| matches(m)).map(|m| m.status).collect();
        state.memberships.retain(|m| !matches(m));
        Removed::from_statuses(&statuses)
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

impl ApplicationCommon for MemoryStore {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<Application, Error> {
        let app = Application {
            id: data.id,
            community_id: data.community_id,
            user_id: data.user_id,
            name: data.name,
            email: data.email,
            phone: data.phone,
            message: data.message,
            why_join: data.why_join,
            skills: data.skills,
            experience: data.experience,
            status: ApplicationStatus::Pending,
            applied_at: data.applied_at,
            reviewed_at: None,
            reviewed_by: None,
            review_notes: None,
        };
        self.state().applications.push(app.clone());
        Ok(app)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Application>, Error> {
        Ok(self.state().applications.iter().find(|a| a.id == id).cloned())
    }

    async fn query_by_community(&mut self, community_id: Uuid, status: Option<ApplicationStatus>) -> Result<Vec<Application>, Error> {
        let mut apps: Vec<Application> = self
            .state()
            .applications
            .iter()
            .filter(|a| a.community_id == community_id && status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        apps.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(apps)
    }

    async fn exists_pending(&mut self, community_id: Uuid, email: &str) -> Result<bool, Error> {
        Ok(self
            .state()
            .applications
            .iter()
            .any(|a| a.community_id == community_id && same_email(&a.email, email) && a.status == ApplicationStatus::Pending))
    }

    async fn update_status(&mut self, id: Uuid, from: ApplicationStatus, update: StatusUpdate) -> Result<Option<Application>, Error> {
        let mut state = self.state();
        let Some(app) = state.applications.iter_mut().find(|a| a.id == id && a.status == from) else {
            return Ok(None);
        };
        app.status = update.status;
        app.reviewed_at = Some(update.reviewed_at);
        app.reviewed_by = update.reviewed_by;
        app.review_notes = update.review_notes;
        Ok(Some(app.clone()))
    }
}

impl MembershipCommon for MemoryStore {
    async fn insert(&mut self, data: MembershipInsert) -> Result<Membership, Error> {
        if self.fail_membership_inserts {
            return Err(Error::DatabaseError(sqlx::Error::Protocol("permission denied for table memberships".into())));
        }
        let mut state = self.state();
        if state.memberships.iter().any(|m| m.community_id == data.community_id && same_email(&m.email, &data.email)) {
            return Err(Error::DatabaseError(sqlx::Error::Protocol("duplicate key value violates unique constraint".into())));
        }
        let membership = Membership {
            id: data.id,
            community_id: data.community_id,
            user_id: data.user_id,
            email: data.email,
            full_name: data.full_name,
            phone: data.phone,
            skills: data.skills,
            experience: data.experience,
            role: data.role,
            status: data.status,
            application_id: data.application_id,
            joined_at: data.joined_at,
        };
        state.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn query_by_community(&mut self, community_id: Uuid, query: &MembershipQuery) -> Result<Vec<Membership>, Error> {
        let search = query.search_term();
        let mut members: Vec<Membership> = self
            .state()
            .memberships
            .iter()
            .filter(|m| m.community_id == community_id)
            .filter(|m| query.role.map_or(true, |r| m.role == r))
            .filter(|m| query.status.map_or(true, |s| m.status == s))
            .filter(|m| {
                search
                    .as_deref()
                    .map_or(true, |term| m.full_name.to_lowercase().contains(term) || m.email.to_lowercase().contains(term))
            })
            .cloned()
            .collect();
        members.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(members)
    }

    async fn exists(&mut self, community_id: Uuid, email: &str) -> Result<bool, Error> {
        Ok(self.state().memberships.iter().any(|m| m.community_id == community_id && same_email(&m.email, email)))
    }

    async fn count_active(&mut self, community_id: Uuid) -> Result<i64, Error> {
        Ok(self
            .state()
            .memberships
            .iter()
            .filter(|m| m.community_id == community_id && m.status == MemberStatus::Active)
            .count() as i64)
    }

    async fn delete_by_key(&mut self, community_id: Uuid, key: &MemberKey) -> Result<Removed, Error> {
        Ok(self.remove_where(|m| {
            m.community_id == community_id
                && match key {
                    MemberKey::UserId(id) => m.user_id == Some(*id),
                    MemberKey::Email(email) => same_email(&m.email, email),
                }
        }))
    }

    async fn delete_by_application(&mut self, application_id: Uuid) -> Result<Removed, Error> {
        Ok(self.remove_where(|m| m.application_id == Some(application_id)))
    }
}

impl CommunityCommon for MemoryStore {
    async fn insert(&mut self, data: CommunityInsert) -> Result<Community, Error> {
        let community = Community {
            id: data.id,
            name: data.name,
            description: data.description,
            status: CommunityStatus::Active,
            owner_id: data.owner_id,
            member_count: 0,
            created_at: data.created_at,
            updated_at: data.created_at,
        };
        self.state().communities.push(community.clone());
        Ok(community)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Community>, Error> {
        Ok(self.state().communities.iter().find(|c| c.id == id).cloned())
    }

    async fn query(&mut self, query: &CommunityQuery) -> Result<Vec<Community>, Error> {
        let mut communities: Vec<Community> = self
            .state()
            .communities
            .iter()
            .filter(|c| query.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        communities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(communities)
    }

    async fn get_member_count(&mut self, id: Uuid) -> Result<Option<i64>, Error> {
        Ok(self.state().communities.iter().find(|c| c.id == id).map(|c| c.member_count))
    }

    async fn set_member_count(&mut self, id: Uuid, count: i64) -> Result<(), Error> {
        let mut state = self.state();
        let community = state.communities.iter_mut().find(|c| c.id == id).ok_or_else(|| Error::NotFound(format!("community {}", id)))?;
        community.member_count = count;
        community.updated_at = Utc::now();
        Ok(())
    }

    async fn adjust_member_count(&mut self, id: Uuid, delta: i64) -> Result<(), Error> {
        let mut state = self.state();
        let community = state.communities.iter_mut().find(|c| c.id == id).ok_or_else(|| Error::NotFound(format!("community {}", id)))?;
        community.member_count = (community.member_count + delta).max(0);
        community.updated_at = Utc::now();
        Ok(())
    }
}

impl TaskCommon for MemoryStore {
    async fn insert(&mut self, data: TaskInsert) -> Result<Task, Error> {
        let task = Task {
            id: data.id,
            community_id: data.community_id,
            title: data.title,
            description: data.description,
            status: data.status,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.created_at,
        };
        self.state().tasks.push(task.clone());
        Ok(task)
    }

    async fn query_by_community(&mut self, community_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, Error> {
        let mut tasks: Vec<Task> = self
            .state()
            .tasks
            .iter()
            .filter(|t| t.community_id == community_id && query.status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn update_status(&mut self, community_id: Uuid, id: Uuid, status: TaskStatus) -> Result<Option<Task>, Error> {
        let mut state = self.state();
        let Some(task) = state.tasks.iter_mut().find(|t| t.id == id && t.community_id == community_id) else {
            return Ok(None);
        };
        task.status = status;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&mut self, community_id: Uuid, id: Uuid) -> Result<u64, Error> {
        let mut state = self.state();
        let before = state.tasks.len();
        state.tasks.retain(|t| !(t.id == id && t.community_id == community_id));
        Ok((before - state.tasks.len()) as u64)
    }
}
