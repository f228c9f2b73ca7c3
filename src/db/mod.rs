use rusqlite::{params, OptionalExtension, Params, Row, ToSql};
use r2d2_sqlite::SqliteConnectionManager;
use std::time::Duration;
pub mod entities;
mod mappers;
mod helpers;
mod migrations;
use eyre::{Report, WrapErr};
use color_eyre::Result;
use crate::utils::time_utils::current_datetime;
use entities::*;
use mappers::map_article;
pub use migrations::migrate;

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<SqliteConnectionManager>;

const ARTICLE_COLUMNS: &'static str =
  "id, title, style, content, date_published";

/*
 * Every function in here issues exactly one statement
 * on a connection borrowed from the pool, nothing is
 * kept around between calls.
 */

pub fn open_pool(db_path: &str, max_size: u32) -> Result<Pool> {
  // Several workers may write at the same time, SQLite
  // should wait a bit for the lock instead of failing
  // right away with SQLITE_BUSY.
  let manager = SqliteConnectionManager::file(db_path)
    .with_init(|c| c.busy_timeout(Duration::from_secs(5)));
  // r2d2 panics on a pool size of 0.
  Pool::builder()
    .max_size(max_size.max(1))
    .build(manager)
    .with_context(|| format!("Open database at {}", db_path))
}

fn select_many<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Vec<T>>
  where
    P: Params,
    F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.get()?;
  let mut stmt = conn.prepare(query)?;
  let rows = stmt.query_map(params, mapper)?
    .collect::<Result<Vec<T>, rusqlite::Error>>()
    .context("Generic select_many query")?;
  Ok(rows)
}

pub fn all_articles(pool: &Pool) -> Result<Vec<Article>> {
  select_many(
    pool,
    &format!("SELECT {} FROM blogful_articles ORDER BY id ASC", ARTICLE_COLUMNS),
    [],
    map_article
  )
}

// Absence is not an error, the caller decides what
// a missing article means.
pub fn article_by_id(pool: &Pool, id: i64) -> Result<Option<Article>> {
  let conn = pool.get()?;
  let article = conn.query_row(
    &format!("SELECT {} FROM blogful_articles WHERE id = ?1", ARTICLE_COLUMNS),
    params![id],
    map_article
  )
    .optional()
    .context("Select article by id")?;
  Ok(article)
}

pub fn insert_article(pool: &Pool, article: &NewArticle) -> Result<Article> {
  let conn = pool.get()?;
  let inserted = conn.query_row(
    &format!(
      "INSERT INTO blogful_articles (title, style, content, date_published) \
      VALUES (?1, ?2, ?3, ?4) RETURNING {}",
      ARTICLE_COLUMNS
    ),
    params![
      article.title,
      article.style,
      article.content,
      current_datetime()
    ],
    map_article
  ).context("Insert article")?;
  Ok(inserted)
}

// Returns the amount of affected rows. Updating an id
// that doesn't exist just affects 0 rows.
pub fn update_article(
  pool: &Pool,
  id: i64,
  update: &ArticleUpdate
) -> Result<usize> {
  let mut fields: Vec<&str> = Vec::with_capacity(3);
  let mut values: Vec<&dyn ToSql> = Vec::with_capacity(4);
  if let Some(title) = &update.title {
    fields.push("title");
    values.push(title);
  }
  if let Some(style) = &update.style {
    fields.push("style");
    values.push(style);
  }
  if let Some(content) = &update.content {
    fields.push("content");
    values.push(content);
  }
  if fields.is_empty() {
    return Ok(0);
  }
  values.push(&id);
  let query = format!(
    "UPDATE blogful_articles SET {} WHERE id = ?",
    helpers::generate_set_placeholders(&fields)
  );
  let conn = pool.get()?;
  conn.execute(&query, &values[..])
    .context("Update article")
}

pub fn delete_article(pool: &Pool, id: i64) -> Result<usize> {
  let conn = pool.get()?;
  conn.execute(
    "DELETE FROM blogful_articles WHERE id = ?1",
    params![id]
  ).context("Delete article")
}

// NOT NULL and friends. The router validates input
// before it gets here so this should be rare, but it
// deserves a different log line than a dead database.
pub fn is_constraint_violation(report: &Report) -> bool {
  match report.downcast_ref::<rusqlite::Error>() {
    Some(rusqlite::Error::SqliteFailure(e, _)) =>
      e.code == rusqlite::ErrorCode::ConstraintViolation,
    _ => false
  }
}

// In-memory database shared by the tests. A single
// connection is mandatory: every new in-memory
// connection is a brand new empty database.
#[cfg(test)]
pub fn memory_pool() -> Pool {
  let pool = Pool::builder()
    .max_size(1)
    .build(SqliteConnectionManager::memory())
    .unwrap();
  migrate(&pool).unwrap();
  pool
}
