use std::ops::DerefMut;
use std::time::Duration;

use crate::core::models::{
    application::{Application, ApplicationStatus, Insert as ApplicationInsert, StatusUpdate},
    community::{Community, CommunityStatus, Insert as CommunityInsert, Query as CommunityQuery},
    membership::{Insert as MembershipInsert, MemberKey, MemberStatus, Membership, Query as MembershipQuery, Removed},
    task::{Insert as TaskInsert, Query as TaskQuery, Task, TaskStatus},
};
use crate::core::ports::repository::{ApplicationCommon, CommunityCommon, Manager, MembershipCommon, TaskCommon};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, query_as, query_scalar, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

impl<E> ApplicationCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: ApplicationInsert) -> Result<Application, Error> {
        let app = query_as(
            "INSERT INTO applications (id, community_id, user_id, name, email, phone, message, why_join, skills, experience, status, applied_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *",
        )
        .bind(data.id)
        .bind(data.community_id)
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.message)
        .bind(data.why_join)
        .bind(data.skills)
        .bind(data.experience)
        .bind(ApplicationStatus::Pending)
        .bind(data.applied_at)
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(app)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Application>, Error> {
        let app = query_as("SELECT * FROM applications WHERE id = $1").bind(id).fetch_optional(&mut *self.executor).await?;
        Ok(app)
    }

    async fn query_by_community(&mut self, community_id: Uuid, status: Option<ApplicationStatus>) -> Result<Vec<Application>, Error> {
        let mut stmt = QueryBuilder::<Postgres>::new("SELECT * FROM applications WHERE community_id = ");
        stmt.push_bind(community_id);
        if let Some(status) = status {
            stmt.push(" AND status = ").push_bind(status);
        }
        stmt.push(" ORDER BY applied_at DESC");
        let apps = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(apps)
    }

    async fn exists_pending(&mut self, community_id: Uuid, email: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE community_id = $1 AND lower(email) = lower($2) AND status = $3)")
            .bind(community_id)
            .bind(email)
            .bind(ApplicationStatus::Pending)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(exists)
    }

    async fn update_status(&mut self, id: Uuid, from: ApplicationStatus, update: StatusUpdate) -> Result<Option<Application>, Error> {
        let app = query_as(
            "UPDATE applications
            SET status = $1, reviewed_at = $2, reviewed_by = $3, review_notes = $4
            WHERE id = $5 AND status = $6
            RETURNING *",
        )
        .bind(update.status)
        .bind(update.reviewed_at)
        .bind(update.reviewed_by)
        .bind(update.review_notes)
        .bind(id)
        .bind(from)
        .fetch_optional(&mut *self.executor)
        .await?;
        Ok(app)
    }
}

impl<E> MembershipCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: MembershipInsert) -> Result<Membership, Error> {
        let membership = query_as(
            "INSERT INTO memberships (id, community_id, user_id, email, full_name, phone, skills, experience, role, status, application_id, joined_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *",
        )
        .bind(data.id)
        .bind(data.community_id)
        .bind(data.user_id)
        .bind(data.email)
        .bind(data.full_name)
        .bind(data.phone)
        .bind(data.skills)
        .bind(data.experience)
        .bind(data.role)
        .bind(data.status)
        .bind(data.application_id)
        .bind(data.joined_at)
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(membership)
    }

    async fn query_by_community(&mut self, community_id: Uuid, query: &MembershipQuery) -> Result<Vec<Membership>, Error> {
        let mut stmt = QueryBuilder::<Postgres>::new("SELECT * FROM memberships WHERE community_id = ");
        stmt.push_bind(community_id);
        if let Some(role) = query.role {
            stmt.push(" AND role = ").push_bind(role);
        }
        if let Some(status) = query.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        if let Some(term) = query.search_term() {
            let pattern = like_pattern(&term);
            stmt.push(" AND (lower(full_name) LIKE ").push_bind(pattern.clone());
            stmt.push(" OR lower(email) LIKE ").push_bind(pattern).push(")");
        }
        stmt.push(" ORDER BY joined_at DESC");
        let members = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(members)
    }

    async fn exists(&mut self, community_id: Uuid, email: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM memberships WHERE community_id = $1 AND lower(email) = lower($2))")
            .bind(community_id)
            .bind(email)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(exists)
    }

    async fn count_active(&mut self, community_id: Uuid) -> Result<i64, Error> {
        let count = query_scalar("SELECT COUNT(*) FROM memberships WHERE community_id = $1 AND status = $2")
            .bind(community_id)
            .bind(MemberStatus::Active)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(count)
    }

    async fn delete_by_key(&mut self, community_id: Uuid, key: &MemberKey) -> Result<Removed, Error> {
        let statuses: Vec<MemberStatus> = match key {
            MemberKey::UserId(user_id) => {
                query_scalar("DELETE FROM memberships WHERE community_id = $1 AND user_id = $2 RETURNING status")
                    .bind(community_id)
                    .bind(user_id)
                    .fetch_all(&mut *self.executor)
                    .await?
            }
            MemberKey::Email(email) => {
                query_scalar("DELETE FROM memberships WHERE community_id = $1 AND lower(email) = lower($2) RETURNING status")
                    .bind(community_id)
                    .bind(email)
                    .fetch_all(&mut *self.executor)
                    .await?
            }
        };
        Ok(Removed::from_statuses(&statuses))
    }

    async fn delete_by_application(&mut self, application_id: Uuid) -> Result<Removed, Error> {
        let statuses: Vec<MemberStatus> = query_scalar("DELETE FROM memberships WHERE application_id = $1 RETURNING status")
            .bind(application_id)
            .fetch_all(&mut *self.executor)
            .await?;
        Ok(Removed::from_statuses(&statuses))
    }
}

impl<E> CommunityCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: CommunityInsert) -> Result<Community, Error> {
        let community = query_as(
            "INSERT INTO communities (id, name, description, status, owner_id, member_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $6)
            RETURNING *",
        )
        .bind(data.id)
        .bind(data.name)
        .bind(data.description)
        .bind(CommunityStatus::Active)
        .bind(data.owner_id)
        .bind(data.created_at)
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(community)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Community>, Error> {
        let community = query_as("SELECT * FROM communities WHERE id = $1").bind(id).fetch_optional(&mut *self.executor).await?;
        Ok(community)
    }

    async fn query(&mut self, query: &CommunityQuery) -> Result<Vec<Community>, Error> {
        let mut stmt = QueryBuilder::<Postgres>::new("SELECT * FROM communities WHERE 1 = 1");
        if let Some(status) = query.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        stmt.push(" ORDER BY created_at DESC");
        let communities = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(communities)
    }

    async fn get_member_count(&mut self, id: Uuid) -> Result<Option<i64>, Error> {
        let count = query_scalar("SELECT member_count FROM communities WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(count)
    }

    async fn set_member_count(&mut self, id: Uuid, count: i64) -> Result<(), Error> {
        let result = query("UPDATE communities SET member_count = $1, updated_at = NOW() WHERE id = $2")
            .bind(count)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("community {}", id)));
        }
        Ok(())
    }

    async fn adjust_member_count(&mut self, id: Uuid, delta: i64) -> Result<(), Error> {
        let result = query("UPDATE communities SET member_count = GREATEST(member_count + $1, 0), updated_at = NOW() WHERE id = $2")
            .bind(delta)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("community {}", id)));
        }
        Ok(())
    }
}

impl<E> TaskCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: TaskInsert) -> Result<Task, Error> {
        let task = query_as(
            "INSERT INTO tasks (id, community_id, title, description, status, assigned_to, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *",
        )
        .bind(data.id)
        .bind(data.community_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.assigned_to)
        .bind(data.due_date)
        .bind(data.created_at)
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(task)
    }

    async fn query_by_community(&mut self, community_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, Error> {
        let mut stmt = QueryBuilder::<Postgres>::new("SELECT * FROM tasks WHERE community_id = ");
        stmt.push_bind(community_id);
        if let Some(status) = query.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        stmt.push(" ORDER BY created_at DESC");
        let tasks = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(tasks)
    }

    async fn update_status(&mut self, community_id: Uuid, id: Uuid, status: TaskStatus) -> Result<Option<Task>, Error> {
        let task = query_as("UPDATE tasks SET status = $1, updated_at = NOW() WHERE id = $2 AND community_id = $3 RETURNING *")
            .bind(status)
            .bind(id)
            .bind(community_id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(task)
    }

    async fn delete(&mut self, community_id: Uuid, id: Uuid) -> Result<u64, Error> {
        let result = query("DELETE FROM tasks WHERE id = $1 AND community_id = $2")
            .bind(id)
            .bind(community_id)
            .execute(&mut *self.executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32, acquire_timeout: Duration) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl Manager for PgSqlxManager {
    type Store<'m> = PgSqlx<PoolConnection<Postgres>>;

    async fn db(&self) -> Result<Self::Store<'_>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }
}
