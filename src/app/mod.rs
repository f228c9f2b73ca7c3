use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use color_eyre::Result;
use eyre::WrapErr;
use log::{debug, info};
// I think we have to add crate here because
// of the other crate named "config" that we
// use as a dependency.
use crate::config::Config;
use crate::db::{self, Pool};
use error::Error;
mod handlers;
mod dtos;
mod error;
mod helpers;

// Declare app state struct. It's built once in run()
// and never mutated afterwards, every worker gets a
// clone of the web::Data handle.
pub struct AppState {
  pub pool: Pool,
  pub api_prefix: String
}

// Function to start the server.
pub async fn run() -> Result<()> {
  let config = Config::from_env()
    .context("Configuration (environment or .env file) is missing")?;
  debug!("Current config: {:?}", config);

  let pool = db::open_pool(config.database_path(), config.pool_size)
    .context("Database connection failed")?;
  let applied = db::migrate(&pool)?;
  info!(
    "Using database {} ({} new migration(s) applied)",
    config.database_path(),
    applied
  );

  // Got to save these for later because we'll be
  // moving parts of "config" into app_state.
  let bind_address = config.bind_address.clone();
  let cors_origin = config.cors_allowed_origin.clone();
  let api_prefix = config.api_prefix.clone();

  let app_state = web::Data::new(
    AppState {
      pool,
      api_prefix: config.api_prefix
    }
  );

  info!("Starting server on {}", bind_address);
  HttpServer::new(move|| {
    App::new()
      .app_data(app_state.clone())
      .wrap(cors(cors_origin.as_deref()))
      .wrap(middleware::Logger::default())
      .configure(|cfg| api_config(cfg, &api_prefix))
      .default_service(web::route().to(handlers::not_found))
  })
  .bind(bind_address)?
  .run()
  .await
  .context("Start Actix web server")
}

fn cors(allowed_origin: Option<&str>) -> Cors {
  match allowed_origin {
    Some(origin) => Cors::default()
      .allowed_origin(origin)
      .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
      .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
      .expose_headers(vec![header::LOCATION])
      .max_age(3600),
    None => Cors::permissive()
  }
}

// Route configuration, also used by the tests so they
// hit the exact same routes and error handlers.
// Bodies are read as bytes and parsed in the handlers
// (see helpers::parse_json_body), so there is no
// JsonConfig here.
pub fn api_config(cfg: &mut web::ServiceConfig, api_prefix: &str) {
  cfg.app_data(web::PathConfig::default().error_handler(|err, _| {
      debug!("Invalid path arguments - {}", err);
      Error::BadRequest(String::from("Invalid path arguments")).into()
    }))
    .service(
      web::scope(api_prefix)
        .service(
          web::resource("/articles")
            .route(web::get().to(handlers::articles))
            .route(web::post().to(handlers::create_article))
        )
        .service(
          web::resource("/articles/{article_id}")
            .route(web::get().to(handlers::article))
            .route(web::put().to(handlers::replace_article))
            .route(web::patch().to(handlers::update_article))
            .route(web::delete().to(handlers::delete_article))
        )
    );
}
