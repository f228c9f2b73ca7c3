use serde::de::DeserializeOwned;
use log::debug;
use super::error::Error;

pub const INVALID_JSON: &'static str = "Invalid JSON in request body";

// Canonical path of an article, sent in the Location
// header after a creation.
pub fn article_location(api_prefix: &str, id: i64) -> String {
  format!("{}/articles/{}", api_prefix, id)
}

// Used instead of the Json extractor for every body:
// PUT and PATCH have to say "404" before complaining
// about the body, and a POST without a body (or without
// a JSON content type) has to name the missing field.
// The extractor rejects those before the handler runs.
// An empty body is treated as an empty object.
pub fn parse_json_body<T>(body: &[u8]) -> Result<T, Error>
  where T: DeserializeOwned + Default
{
  if body.iter().all(|b| b.is_ascii_whitespace()) {
    return Ok(T::default());
  }
  serde_json::from_slice(body)
    .map_err(|e| {
      debug!("Could not parse request body - {}", e);
      Error::BadRequest(String::from(INVALID_JSON))
    })
}
