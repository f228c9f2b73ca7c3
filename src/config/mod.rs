// Adding the context method to errors:
use eyre::WrapErr;
use color_eyre::Result;
use config::{builder::DefaultState, ConfigBuilder, Environment};
use serde::Deserialize;

// Value of app_env that switches to the test database.
const TEST_ENV: &'static str = "test";

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  // Separate database used when app_env is "test", so
  // running the test suite against a real file never
  // wipes the actual articles.
  pub test_db_path: String,
  pub app_env: String,
  pub bind_address: String,
  // Scope under which the article routes are mounted.
  // Can be empty to serve them at the root.
  pub api_prefix: String,
  pub pool_size: u32,
  // Any origin is allowed when absent.
  pub cors_allowed_origin: Option<String>
}

impl Config {

  pub fn from_env() -> Result<Config> {
    // RUST_LOG is already set in main.rs if it
    // was absent.
    // You have to use lowercase when compared to
    // what's in the .env file.
    Self::with_defaults()?
      .add_source(Environment::default())
      .build()
      .context("Merging configuration sources")?
      // The error has to be given a context for
      // color_eyre to work here:
      .try_deserialize()
      .context("Loading configuration from env")
  }

  fn with_defaults() -> Result<ConfigBuilder<DefaultState>> {
    let builder = config::Config::builder()
      .set_default("db_path", "./blogful.db")?
      .set_default("test_db_path", "./blogful_test.db")?
      .set_default("app_env", "production")?
      .set_default("bind_address", "127.0.0.1:8000")?
      // Should never have a trailing slash or THINGS WILL BREAK.
      .set_default("api_prefix", "/api")?
      .set_default("pool_size", 8i64)?;
    Ok(builder)
  }

  pub fn is_test(&self) -> bool {
    self.app_env.eq_ignore_ascii_case(TEST_ENV)
  }

  pub fn database_path(&self) -> &str {
    if self.is_test() {
      &self.test_db_path
    } else {
      &self.db_path
    }
  }

}
