/**
 * Generate the "SET" part of an update query for the
 * given field names, with positional placeholders.
 */
pub fn generate_set_placeholders(fields: &[&str]) -> String {
  fields.iter()
    .map(|name| generate_field_equal_qmark(name))
    .collect::<Vec<String>>()
    .join(", ")
}

pub fn generate_field_equal_qmark(name: &str) -> String {
  format!("{} = ?", name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generate_3_set_placeholders() {
    let fields = ["title", "style", "content"];
    let expected = String::from("title = ?, style = ?, content = ?");
    assert_eq!(generate_set_placeholders(&fields), expected);
  }

  #[test]
  fn generate_single_set_placeholder() {
    assert_eq!(generate_set_placeholders(&["style"]), "style = ?");
  }
}
