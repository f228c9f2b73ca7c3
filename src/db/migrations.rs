use rusqlite::params;
use eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};
use crate::utils::time_utils::current_datetime;
use super::Pool;

// Migration files are numbered like the ones postgrator
// used to run for the old API, and get baked into the
// binary so nothing has to be deployed next to it.
struct Migration {
  version: i64,
  name: &'static str,
  sql: &'static str
}

static MIGRATIONS: [Migration; 1] = [
  Migration {
    version: 1,
    name: "create_blogful_articles",
    sql: include_str!("../../migrations/001.do.create_blogful_articles.sql")
  }
];

/**
 * Applies every migration that isn't recorded in the
 * schema_version table yet, each one in its own
 * transaction. Returns how many were applied.
 */
pub fn migrate(pool: &Pool) -> Result<usize> {
  let mut conn = pool.get()
    .context("Get a connection to run migrations")?;
  conn.execute_batch(
    "CREATE TABLE IF NOT EXISTS schema_version (
      version INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      applied_at TEXT NOT NULL
    )"
  ).context("Create schema_version table")?;
  let current: i64 = conn.query_row(
    "SELECT COALESCE(MAX(version), 0) FROM schema_version",
    [],
    |row| row.get(0)
  ).context("Read current schema version")?;
  debug!("Current schema version: {}", current);

  let mut applied = 0;
  for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
    info!("Applying migration {:03} ({})", migration.version, migration.name);
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)
      .with_context(|| format!("Apply migration {}", migration.name))?;
    tx.execute(
      "INSERT INTO schema_version (version, name, applied_at) VALUES (?1, ?2, ?3)",
      params![migration.version, migration.name, current_datetime()]
    )?;
    tx.commit()?;
    applied += 1;
  }
  Ok(applied)
}
