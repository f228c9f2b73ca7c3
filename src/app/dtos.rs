use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::db::entities::*;
use crate::utils::{serde_utils::blank_string_to_none, text_utils};

// I'm going to use the From trait to convert
// entities to DTOs and test that.
// The DTO is where sanitization happens, so any
// article leaving the API, alone or in a list, goes
// through the exact same conversion.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleDto {
  pub id: i64,
  pub title: String,
  pub style: String,
  pub content: String,
  pub date_published: DateTime<Utc>
}

impl From<Article> for ArticleDto {
  fn from(article: Article) -> Self {
    Self {
      id: article.id,
      title: text_utils::escape_html(&article.title),
      style: article.style,
      content: text_utils::sanitize_html(&article.content),
      date_published: article.date_published
    }
  }
}

/* --- Request body objects --- */
// Everything is optional so that validation can name
// the missing field. Unknown keys are ignored by serde.
// Same body for POST, PUT and PATCH, only the conversion
// differs: POST and PUT need a NewArticle, PATCH an
// ArticleUpdate.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleForm {
  pub title: Option<String>,
  pub style: Option<String>,
  pub content: Option<String>
}
/* --- End request body objects --- */

fn required(field: &str, value: Option<String>) -> Result<String, String> {
  blank_string_to_none(value)
    .ok_or_else(|| format!("Missing '{}' in request body", field))
}

// The error is the message sent back to the client.
// Fields are checked in the order title, style, content
// and the first missing one wins.
impl TryFrom<ArticleForm> for NewArticle {
  type Error = String;

  fn try_from(form: ArticleForm) -> Result<Self, Self::Error> {
    Ok(Self {
      title: required("title", form.title)?,
      style: required("style", form.style)?,
      content: required("content", form.content)?
    })
  }
}

// Blank values are dropped here, the handler still has
// to check whether anything is left.
impl From<ArticleForm> for ArticleUpdate {
  fn from(form: ArticleForm) -> Self {
    Self {
      title: blank_string_to_none(form.title),
      style: blank_string_to_none(form.style),
      content: blank_string_to_none(form.content)
    }
  }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JsonErrorMessage {
  pub message: String
}

// Body of every error response.
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonError {
  pub error: JsonErrorMessage
}

impl JsonError {
  pub fn new(message: &str) -> Self {
    Self {
      error: JsonErrorMessage {
        message: String::from(message)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(title: Option<&str>, style: Option<&str>, content: Option<&str>) -> ArticleForm {
    ArticleForm {
      title: title.map(String::from),
      style: style.map(String::from),
      content: content.map(String::from)
    }
  }

  #[test]
  fn article_to_dto_sanitizes_title_and_content() {
    let sut = Article {
      id: 911,
      title: r#"Naughty naughty very naughty <script>alert("xss");</script>"#.to_string(),
      style: "How-to".to_string(),
      content: r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#.to_string(),
      date_published: Utc::now()
    };
    let dto: ArticleDto = sut.into();
    assert_eq!(911, dto.id);
    assert_eq!(
      r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#,
      dto.title
    );
    assert_eq!(
      r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#,
      dto.content
    );
    assert_eq!("How-to", dto.style);
  }

  #[test]
  fn complete_form_becomes_new_article() {
    let article = NewArticle::try_from(
      form(Some("Test New Article"), Some("Listicle"), Some("Yay"))
    ).unwrap();
    assert_eq!("Test New Article", article.title);
    assert_eq!("Listicle", article.style);
    assert_eq!("Yay", article.content);
  }

  #[test]
  fn each_missing_field_is_named() {
    assert_eq!(
      Err("Missing 'title' in request body".to_string()),
      NewArticle::try_from(form(None, Some("Listicle"), Some("Yay")))
    );
    assert_eq!(
      Err("Missing 'style' in request body".to_string()),
      NewArticle::try_from(form(Some("T"), None, Some("Yay")))
    );
    assert_eq!(
      Err("Missing 'content' in request body".to_string()),
      NewArticle::try_from(form(Some("T"), Some("Listicle"), None))
    );
  }

  #[test]
  fn title_is_reported_first_when_everything_is_missing() {
    assert_eq!(
      Err("Missing 'title' in request body".to_string()),
      NewArticle::try_from(ArticleForm::default())
    );
  }

  #[test]
  fn blank_field_counts_as_missing() {
    assert_eq!(
      Err("Missing 'style' in request body".to_string()),
      NewArticle::try_from(form(Some("T"), Some("   "), Some("Yay")))
    );
  }

  #[test]
  fn form_ignores_unknown_keys() {
    let form: ArticleForm = serde_json::from_str(
      r#"{"title": "updated article title", "fieldToIgnore": "nope"}"#
    ).unwrap();
    let update = ArticleUpdate::from(form);
    assert_eq!(Some("updated article title".to_string()), update.title);
    assert!(update.style.is_none());
    assert!(update.content.is_none());
  }

  #[test]
  fn form_with_only_blank_values_is_an_empty_update() {
    let form = ArticleForm {
      title: Some(String::new()),
      ..Default::default()
    };
    assert!(ArticleUpdate::from(form).is_empty());
  }

  #[test]
  fn partial_form_is_a_partial_update_but_not_a_new_article() {
    let update = ArticleUpdate::from(form(None, Some("News"), None));
    assert_eq!(Some("News".to_string()), update.style);
    assert!(update.title.is_none());
    assert_eq!(
      Err("Missing 'title' in request body".to_string()),
      NewArticle::try_from(form(None, Some("News"), None))
    );
  }

  #[test]
  fn json_error_shape() {
    let body = serde_json::to_value(JsonError::new("Article doesn't exist")).unwrap();
    assert_eq!(
      serde_json::json!({"error": {"message": "Article doesn't exist"}}),
      body
    );
  }
}
