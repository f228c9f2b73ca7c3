// Request bodies come in with every field optional so
// that I can tell the client exactly what's missing
// instead of letting serde fail on the first one.
// Blank strings count as missing: an article with an
// empty title or content is not something we store.
pub fn blank_string_to_none(value: Option<String>) -> Option<String> {
  match value {
    Some(s) => if s.trim().is_empty()
      { None } else { Some(s) },
    None => None
  }
}
