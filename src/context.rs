use crate::actix_web::dev::Payload;
use crate::actix_web::{FromRequest, HttpRequest};
use crate::error::Error;
use std::future::{ready, Ready};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity as forwarded by the frontend. Nothing is enforced with it;
/// it only fills reviewer and applicant ids the body leaves out.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserInfo {
    pub id: Option<Uuid>,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(value) = req.headers().get(USER_ID_HEADER) else {
            return ready(Ok(UserInfo::default()));
        };
        let raw = value.to_str().unwrap_or_default().trim();
        if raw.is_empty() {
            return ready(Ok(UserInfo::default()));
        }
        match Uuid::parse_str(raw) {
            Ok(id) => ready(Ok(UserInfo { id: Some(id) })),
            Err(_) => ready(Err(Error::invalid_identifier(USER_ID_HEADER, raw))),
        }
    }
}
