pub mod application;
pub mod community;
pub mod member;
pub mod task;

use actix_web::web::{delete, get, post, put, scope, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::HttpResponse;
use serde_json::json;

use crate::core::ports::repository::Manager;
use crate::error::Error;
use crate::response::ok;

/// Registers every route against the store manager `M`.
pub fn routes<M: Manager>(cfg: &mut ServiceConfig) {
    cfg.app_data(QueryConfig::default().error_handler(|err, _| Error::Validation(err.to_string()).into()))
        .app_data(JsonConfig::default().error_handler(|err, _| Error::Validation(err.to_string()).into()))
        .app_data(PathConfig::default().error_handler(|err, _| Error::Validation(err.to_string()).into()))
        .route("/health", get().to(health))
        .service(
            scope("api").service(
                scope("communities")
                    .route("", get().to(community::list::<M>))
                    .route("", post().to(community::create::<M>))
                    .service(
                        scope("{community_id}")
                            .route("", get().to(community::detail::<M>))
                            .route("member-count/sync", post().to(community::sync_member_count::<M>))
                            .service(
                                scope("applications")
                                    .route("", get().to(application::list::<M>))
                                    .route("", post().to(application::submit::<M>))
                                    .route("{application_id}/approve", put().to(application::approve::<M>))
                                    .route("{application_id}/reject", put().to(application::reject::<M>)),
                            )
                            .service(
                                scope("members")
                                    .route("", get().to(member::list::<M>))
                                    .route("{member_key}", delete().to(member::remove::<M>)),
                            )
                            .service(
                                scope("tasks")
                                    .route("", get().to(task::list::<M>))
                                    .route("", post().to(task::create::<M>))
                                    .route("{task_id}/status", put().to(task::update_status::<M>))
                                    .route("{task_id}", delete().to(task::delete::<M>)),
                            ),
                    ),
            ),
        );
}

pub async fn health() -> HttpResponse {
    ok(json!({ "status": "ok" }))
}

pub async fn not_found() -> Result<HttpResponse, Error> {
    Err(Error::NotFound("route".into()))
}
