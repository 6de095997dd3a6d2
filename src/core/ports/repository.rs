use crate::core::models::{
    application::{Application, ApplicationStatus, Insert as ApplicationInsert, StatusUpdate},
    community::{Community, Insert as CommunityInsert, Query as CommunityQuery},
    membership::{Insert as MembershipInsert, MemberKey, Membership, Query as MembershipQuery, Removed},
    task::{Insert as TaskInsert, Query as TaskQuery, Task, TaskStatus},
};
use crate::error::Error;
use uuid::Uuid;

pub trait ApplicationCommon {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<Application, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<Application>, Error>;
    /// Newest first. `status` narrows to one status when given.
    async fn query_by_community(&mut self, community_id: Uuid, status: Option<ApplicationStatus>) -> Result<Vec<Application>, Error>;
    /// Pending application with this email (case-insensitive).
    async fn exists_pending(&mut self, community_id: Uuid, email: &str) -> Result<bool, Error>;
    /// Writes the review only while the row still has status `from`; `None`
    /// means the row is gone or someone else decided it first.
    async fn update_status(&mut self, id: Uuid, from: ApplicationStatus, update: StatusUpdate) -> Result<Option<Application>, Error>;
}

pub trait MembershipCommon {
    async fn insert(&mut self, data: MembershipInsert) -> Result<Membership, Error>;
    async fn query_by_community(&mut self, community_id: Uuid, query: &MembershipQuery) -> Result<Vec<Membership>, Error>;
    async fn exists(&mut self, community_id: Uuid, email: &str) -> Result<bool, Error>;
    async fn count_active(&mut self, community_id: Uuid) -> Result<i64, Error>;
    async fn delete_by_key(&mut self, community_id: Uuid, key: &MemberKey) -> Result<Removed, Error>;
    /// Removes only the membership provisioned from this application.
    async fn delete_by_application(&mut self, application_id: Uuid) -> Result<Removed, Error>;
}

pub trait CommunityCommon {
    async fn insert(&mut self, data: CommunityInsert) -> Result<Community, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<Community>, Error>;
    async fn query(&mut self, query: &CommunityQuery) -> Result<Vec<Community>, Error>;
    async fn get_member_count(&mut self, id: Uuid) -> Result<Option<i64>, Error>;
    async fn set_member_count(&mut self, id: Uuid, count: i64) -> Result<(), Error>;
    /// Atomic `member_count + delta`, floored at zero.
    async fn adjust_member_count(&mut self, id: Uuid, delta: i64) -> Result<(), Error>;
}

pub trait TaskCommon {
    async fn insert(&mut self, data: TaskInsert) -> Result<Task, Error>;
    async fn query_by_community(&mut self, community_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, Error>;
    async fn update_status(&mut self, community_id: Uuid, id: Uuid, status: TaskStatus) -> Result<Option<Task>, Error>;
    async fn delete(&mut self, community_id: Uuid, id: Uuid) -> Result<u64, Error>;
}

pub trait Store: ApplicationCommon + MembershipCommon + CommunityCommon + TaskCommon {}

impl<T> Store for T where T: ApplicationCommon + MembershipCommon + CommunityCommon + TaskCommon {}

/// Hands out store handles, one per request.
pub trait Manager: 'static {
    type Store<'m>: Store
    where
        Self: 'm;

    async fn db(&self) -> Result<Self::Store<'_>, Error>;
}
