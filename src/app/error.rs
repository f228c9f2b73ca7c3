use actix_web::{
  error::ResponseError,
  http::StatusCode,
  HttpResponse
};
use derive_more::Display;
use eyre::Report;
use log::error;
use crate::db;
use super::dtos::JsonError;

// The full database error only goes to the logs, random
// internet people get "Internal Server Error" and that's
// it. Validation and not found messages are meant for
// the client so they're displayed as-is.
#[derive(Debug, Display)]
pub enum Error {
  #[display(fmt = "Internal Server Error")]
  DatabaseError(String),
  #[display(fmt = "{}", _0)]
  NotFound(String),
  #[display(fmt = "{}", _0)]
  BadRequest(String)
}

// Every error body has the same shape:
// {"error":{"message":"..."}}
impl ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self {
      Error::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code())
      .json(JsonError::new(&self.to_string()))
  }
}

pub fn map_db_error(e: Report) -> Error {
  if db::is_constraint_violation(&e) {
    error!("Database constraint violation - {:?}", e);
  } else {
    error!("Database error - {:?}", e);
  }
  Error::DatabaseError(e.to_string())
}
