use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};

use crate::{
    core::{membership, models::membership::Query as MembershipQuery, ports::repository::Manager},
    error::Error,
    response::{ok, DeleteResponse, List},
};

pub async fn list<M: Manager>(path: Path<(String,)>, Query(query): Query<MembershipQuery>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id,) = path.into_inner();
    let members = membership::list_members(manager.get_ref(), &community_id, query).await?;
    Ok(ok(List::new(members)))
}

pub async fn remove<M: Manager>(path: Path<(String, String)>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id, member_key) = path.into_inner();
    let deleted = membership::remove_member(manager.get_ref(), &community_id, &member_key).await?;
    Ok(ok(DeleteResponse::new(deleted)))
}
