// The binary only needs the migration part of the db
// module, the rest is shared with the server.
#![allow(dead_code)]
mod config;
mod db;
mod utils;

use std::env;
use color_eyre::Result;
use eyre::WrapErr;
use dotenv::dotenv;
use log::info;
use getopts::Options;
use crate::config::Config;

// Copy pasted this from getopts doc.
fn print_usage(program: &str, opts: Options) {
  let brief = format!("Usage: {} [options]", program);
  print!("{}", opts.usage(&brief));
}

/**
 * Applies the pending migrations to the configured
 * database without starting the server.
 */
fn main() -> Result<()> {
  dotenv().ok();
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("info")
  ).init();
  color_eyre::install()?;

  let args: Vec<String> = env::args().collect();
  let program = args[0].clone();
  let mut opts = Options::new();
  opts.optopt(
    "e",
    "env",
    "Environment to migrate, \"test\" targets test_db_path",
    "ENV"
  );
  opts.optflag("h", "help", "Program usage");
  let opt_matches = opts.parse(&args[1..])?;
  if opt_matches.opt_present("h") {
    print_usage(&program, opts);
    return Ok(());
  }

  let mut config = Config::from_env()
    .context("Configuration (environment or .env file) is missing")?;
  if let Some(app_env) = opt_matches.opt_str("e") {
    config.app_env = app_env;
  }

  let pool = db::open_pool(config.database_path(), 1)?;
  let applied = db::migrate(&pool)?;
  info!(
    "Applied {} migration(s) to {}",
    applied,
    config.database_path()
  );

  Ok(())
}
