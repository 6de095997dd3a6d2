use actix_web::{
    http::StatusCode,
    web::{Data, Json, Path, Query},
    HttpResponse,
};

use crate::{
    context::UserInfo,
    core::{
        community,
        models::community::{Create, Query as CommunityQuery},
        ports::repository::Manager,
    },
    error::Error,
    response::{ok, Envelope, List},
};

pub async fn list<M: Manager>(Query(query): Query<CommunityQuery>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let communities = community::list_communities(manager.get_ref(), query).await?;
    Ok(ok(List::new(communities)))
}

pub async fn create<M: Manager>(user_info: UserInfo, Json(data): Json<Create>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let created = community::create_community(manager.get_ref(), user_info.id, data).await?;
    Ok(Envelope::data(created).with_message("community created").respond(StatusCode::CREATED))
}

pub async fn detail<M: Manager>(path: Path<(String,)>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id,) = path.into_inner();
    let found = community::get_community(manager.get_ref(), &community_id).await?;
    Ok(ok(found))
}

pub async fn sync_member_count<M: Manager>(path: Path<(String,)>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id,) = path.into_inner();
    let sync = community::sync_member_count(manager.get_ref(), &community_id).await?;
    Ok(ok(sync))
}
