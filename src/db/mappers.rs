use super::entities::*;
use rusqlite::{Row, Error};

// Column order has to match ARTICLE_COLUMNS in the
// parent module.
pub fn map_article(row: &Row) -> Result<Article, Error> {
  Ok(Article {
    id: row.get(0)?,
    title: row.get(1)?,
    style: row.get(2)?,
    content: row.get(3)?,
    date_published: row.get(4)?
  })
}
