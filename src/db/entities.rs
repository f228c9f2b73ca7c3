use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// One row of blogful_articles, exactly as stored.
// Sanitization happens when converting to the DTO,
// never in here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
  pub id: i64,
  pub title: String,
  pub style: String,
  pub content: String,
  pub date_published: DateTime<Utc>
}

// What it takes to create an article. The id and
// publication date are the database's business.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
  pub title: String,
  pub style: String,
  pub content: String
}

// Object I use to fit my "update only what's in
// the request body" agenda.
// There is no way to touch the id or the date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleUpdate {
  pub title: Option<String>,
  pub style: Option<String>,
  pub content: Option<String>
}

impl ArticleUpdate {
  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.style.is_none() && self.content.is_none()
  }
}

// A full replace is just an update where every
// field is present.
impl From<NewArticle> for ArticleUpdate {
  fn from(article: NewArticle) -> Self {
    Self {
      title: Some(article.title),
      style: Some(article.style),
      content: Some(article.content)
    }
  }
}
