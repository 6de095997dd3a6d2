use actix_web::{
    http::StatusCode,
    web::{Bytes, Data, Json, Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    context::UserInfo,
    core::{
        application,
        models::application::{ApplicationStatus, Submission},
        ports::repository::Manager,
    },
    error::Error,
    response::{ok, Envelope, List},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    status: Option<ApplicationStatus>,
}

pub async fn list<M: Manager>(path: Path<(String,)>, Query(ListParams { status }): Query<ListParams>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id,) = path.into_inner();
    let apps = application::list_applications(manager.get_ref(), &community_id, status).await?;
    Ok(ok(List::new(apps)))
}

pub async fn submit<M: Manager>(user_info: UserInfo, path: Path<(String,)>, Json(data): Json<Submission>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id,) = path.into_inner();
    let app = application::submit_application(manager.get_ref(), &community_id, user_info.id, data).await?;
    Ok(Envelope::data(app).with_message("application submitted").respond(StatusCode::CREATED))
}

#[derive(Debug, Default, Deserialize)]
pub struct Review {
    reviewer_id: Option<Uuid>,
    #[serde(alias = "review_notes")]
    notes: Option<String>,
}

impl Review {
    /// An empty body means no review details; anything else must be a valid review.
    fn from_body(body: &Bytes) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Review::default());
        }
        serde_json::from_slice(body).map_err(|err| Error::Validation(format!("invalid review body: {}", err)))
    }
}

pub async fn approve<M: Manager>(user_info: UserInfo, path: Path<(String, String)>, body: Bytes, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id, application_id) = path.into_inner();
    let review = Review::from_body(&body)?;
    let app = application::approve_application(manager.get_ref(), &community_id, &application_id, review.reviewer_id.or(user_info.id)).await?;
    Ok(Envelope::data(app).with_message("application approved").respond(StatusCode::OK))
}

pub async fn reject<M: Manager>(user_info: UserInfo, path: Path<(String, String)>, body: Bytes, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (community_id, application_id) = path.into_inner();
    let review = Review::from_body(&body)?;
    let app = application::reject_application(manager.get_ref(), &community_id, &application_id, review.reviewer_id.or(user_info.id), review.notes).await?;
    Ok(Envelope::data(app).with_message("application rejected").respond(StatusCode::OK))
}
