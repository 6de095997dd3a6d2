use crate::core::community::adjust_member_count;
use crate::core::models::common::{parse_identifier, reject_placeholder};
use crate::core::models::membership::{MemberKey, Membership, Query};
use crate::core::ports::repository::{Manager, MembershipCommon};
use crate::error::Error;

pub async fn list_members<M>(manager: &M, community_id: &str, query: Query) -> Result<Vec<Membership>, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let mut db = manager.db().await?;
    MembershipCommon::query_by_community(&mut db, community_id, &query).await
}

/// Removes a member addressed by user id or email. Removing nobody is not an
/// error; the returned count says how many rows went away.
pub async fn remove_member<M>(manager: &M, community_id: &str, member_key: &str) -> Result<u64, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let key = MemberKey::parse(reject_placeholder("member_key", member_key)?);
    let mut db = manager.db().await?;
    let removed = MembershipCommon::delete_by_key(&mut db, community_id, &key).await?;
    if removed.total > 0 {
        log::info!("removed {} member(s) {:?} from community {}", removed.total, key, community_id);
    }
    if removed.active > 0 {
        adjust_member_count(&mut db, community_id, -(removed.active as i64)).await;
    }
    Ok(removed.total)
}
