use chrono::Utc;
use uuid::Uuid;

use crate::core::models::common::{parse_identifier, require_non_blank};
use crate::core::models::community::{Community, Create, Insert, MemberCountSync, Query};
use crate::core::ports::repository::{CommunityCommon, Manager, MembershipCommon};
use crate::error::Error;

pub async fn create_community<M>(manager: &M, owner_fallback: Option<Uuid>, data: Create) -> Result<Community, Error>
where
    M: Manager,
{
    require_non_blank("name", &data.name)?;
    let owner_id = data
        .owner_id
        .or(owner_fallback)
        .ok_or_else(|| Error::Validation("owner_id is required".into()))?;
    let mut db = manager.db().await?;
    let community = CommunityCommon::insert(
        &mut db,
        Insert {
            id: Uuid::new_v4(),
            name: data.name.trim().to_owned(),
            description: data.description.trim().to_owned(),
            owner_id,
            created_at: Utc::now(),
        },
    )
    .await?;
    log::info!("community {} created by {}", community.id, owner_id);
    Ok(community)
}

pub async fn get_community<M>(manager: &M, community_id: &str) -> Result<Community, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let mut db = manager.db().await?;
    CommunityCommon::get(&mut db, community_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("community {}", community_id)))
}

pub async fn list_communities<M>(manager: &M, query: Query) -> Result<Vec<Community>, Error>
where
    M: Manager,
{
    let mut db = manager.db().await?;
    CommunityCommon::query(&mut db, &query).await
}

/// Recomputes `member_count` from the active memberships.
pub async fn sync_member_count<M>(manager: &M, community_id: &str) -> Result<MemberCountSync, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let mut db = manager.db().await?;
    let previous = CommunityCommon::get_member_count(&mut db, community_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("community {}", community_id)))?;
    let current = MembershipCommon::count_active(&mut db, community_id).await?;
    if previous != current {
        log::warn!("member_count of community {} drifted: stored {}, actual {}", community_id, previous, current);
        CommunityCommon::set_member_count(&mut db, community_id, current).await?;
    }
    Ok(MemberCountSync { previous, current })
}

/// Counter maintenance after a membership change. Failures are logged only.
pub(crate) async fn adjust_member_count<S>(db: &mut S, community_id: Uuid, delta: i64)
where
    S: CommunityCommon,
{
    if let Err(err) = CommunityCommon::adjust_member_count(db, community_id, delta).await {
        log::warn!("failed to adjust member_count of community {} by {}: {}", community_id, delta, err);
    }
}
