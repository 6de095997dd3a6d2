use actix_web::{
    http::StatusCode,
    web::{Data, Json, Path, Query},
    HttpResponse,
};

use crate::{
    core::{
        models::task::{Create, Query as TaskQuery, StatusChange},
        ports::repository::Manager,
        task,
    },
    error::Error,
    response::{ok, DeleteResponse, Envelope, List},
};

pub async fn list<M: Manager>(path: Path<(String,)>, Query(query): Query<TaskQuery>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id,) = path.into_inner();
    let tasks = task::list_tasks(manager.get_ref(), &community_id, query).await?;
    Ok(ok(List::new(tasks)))
}

pub async fn create<M: Manager>(path: Path<(String,)>, Json(data): Json<Create>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id,) = path.into_inner();
    let created = task::create_task(manager.get_ref(), &community_id, data).await?;
    Ok(Envelope::data(created).with_message("task created").respond(StatusCode::CREATED))
}

pub async fn update_status<M: Manager>(path: Path<(String, String)>, Json(StatusChange { status }): Json<StatusChange>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id, task_id) = path.into_inner();
    let updated = task::update_task_status(manager.get_ref(), &community_id, &task_id, status).await?;
    Ok(ok(updated))
}

pub async fn delete<M: Manager>(path: Path<(String, String)>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id, task_id) = path.into_inner();
    task::delete_task(manager.get_ref(), &community_id, &task_id).await?;
    Ok(ok(DeleteResponse::new(1)))
}
