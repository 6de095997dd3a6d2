use chrono::Utc;
use uuid::Uuid;

use crate::core::models::common::{parse_identifier, require_non_blank};
use crate::core::models::task::{Create, Insert, Query, Task, TaskStatus};
use crate::core::ports::repository::{CommunityCommon, Manager, TaskCommon};
use crate::error::Error;

pub async fn list_tasks<M>(manager: &M, community_id: &str, query: Query) -> Result<Vec<Task>, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let mut db = manager.db().await?;
    TaskCommon::query_by_community(&mut db, community_id, &query).await
}

pub async fn create_task<M>(manager: &M, community_id: &str, data: Create) -> Result<Task, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    require_non_blank("title", &data.title)?;
    let mut db = manager.db().await?;
    if CommunityCommon::get(&mut db, community_id).await?.is_none() {
        return Err(Error::NotFound(format!("community {}", community_id)));
    }
    TaskCommon::insert(
        &mut db,
        Insert {
            id: Uuid::new_v4(),
            community_id,
            title: data.title.trim().to_owned(),
            description: data.description,
            status: TaskStatus::Todo,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            created_at: Utc::now(),
        },
    )
    .await
}

pub async fn update_task_status<M>(manager: &M, community_id: &str, task_id: &str, status: TaskStatus) -> Result<Task, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let task_id = parse_identifier("task_id", task_id)?;
    let mut db = manager.db().await?;
    TaskCommon::update_status(&mut db, community_id, task_id, status)
        .await?
        .ok_or_else(|| Error::NotFound(format!("task {}", task_id)))
}

pub async fn delete_task<M>(manager: &M, community_id: &str, task_id: &str) -> Result<(), Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let task_id = parse_identifier("task_id", task_id)?;
    let mut db = manager.db().await?;
    if TaskCommon::delete(&mut db, community_id, task_id).await? == 0 {
        return Err(Error::NotFound(format!("task {}", task_id)));
    }
    Ok(())
}
