mod app;
mod config;
mod db;
mod utils;

use color_eyre::Result;
use dotenv::dotenv;
use std::env;

#[actix_web::main]
async fn main() -> Result<()> {
  // The .env file has to be loaded before anything
  // reads the environment, logger included.
  dotenv().ok();
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "actix_web=info,blogful=info");
  }
  env_logger::init();
  color_eyre::install()?;

  app::run().await
}
