use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use crate::serde::Serialize;

/// JSON body shared by every endpoint, on success and on failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            hint: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl Envelope<()> {
    pub fn failure(message: &str, error: String, hint: Option<String>) -> Self {
        Envelope {
            success: false,
            data: None,
            message: Some(message.to_owned()),
            error: Some(error),
            hint,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct List<T> {
    list: Vec<T>,
    total: i64,
}

impl<T> List<T> {
    pub fn new(list: Vec<T>) -> Self {
        let total = list.len() as i64;
        List { list, total }
    }
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    Envelope::data(data).respond(StatusCode::OK)
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    deleted: u64,
}

impl DeleteResponse {
    pub fn new(deleted: u64) -> Self {
        DeleteResponse { deleted }
    }
}
