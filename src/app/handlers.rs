use actix_web::{
  http::header,
  web,
  HttpResponse,
  Result
};
use log::info;
use crate::db::entities::*;
use crate::db;
use super::dtos::*;
use super::error::{Error, map_db_error};
use super::AppState;
use super::helpers;

// Module with all the API handler functions.

const ARTICLE_NOT_FOUND: &'static str = "Article doesn't exist";
const EMPTY_UPDATE: &'static str =
  "Request body must contain either 'title', 'style' or 'content'";

// Default response when no route matched the request:
pub async fn not_found() -> Result<HttpResponse, Error> {
  Err(Error::NotFound(String::from("Endpoint doesn't exist")))
}

// Shared by every route that takes an article id. Has
// to run before anything gets written.
fn existing_article(pool: &db::Pool, article_id: i64) -> Result<Article, Error> {
  db::article_by_id(pool, article_id)
    .map_err(map_db_error)?
    .ok_or_else(|| Error::NotFound(String::from(ARTICLE_NOT_FOUND)))
}

// The row can disappear between the existence check and
// the write, nothing was changed in that case.
fn ensure_written(affected: usize) -> Result<(), Error> {
  if affected == 0 {
    return Err(Error::NotFound(String::from(ARTICLE_NOT_FOUND)));
  }
  Ok(())
}

pub async fn articles(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let articles: Vec<ArticleDto> = db::all_articles(&app_state.pool)
    .map_err(map_db_error)?
    .into_iter()
    .map(ArticleDto::from)
    .collect();
  Ok(HttpResponse::Ok().json(articles))
}

// Path variables have to be in a tuple.
pub async fn article(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let article_id = path.into_inner().0;
  let article = existing_article(&app_state.pool, article_id)?;
  Ok(HttpResponse::Ok().json(ArticleDto::from(article)))
}

pub async fn create_article(
  app_state: web::Data<AppState>,
  body: web::Bytes
) -> Result<HttpResponse, Error> {
  let form: ArticleForm = helpers::parse_json_body(&body)?;
  let new_article = NewArticle::try_from(form)
    .map_err(Error::BadRequest)?;
  let article = db::insert_article(&app_state.pool, &new_article)
    .map_err(map_db_error)?;
  info!("Created article {}", article.id);

  Ok(
    HttpResponse::Created()
      .insert_header((
        header::LOCATION,
        helpers::article_location(&app_state.api_prefix, article.id)
      ))
      .json(ArticleDto::from(article))
  )
}

// Full replace, every field has to be there just like
// for a creation.
pub async fn replace_article(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>,
  body: web::Bytes
) -> Result<HttpResponse, Error> {
  let article_id = path.into_inner().0;
  existing_article(&app_state.pool, article_id)?;
  let form: ArticleForm = helpers::parse_json_body(&body)?;
  let replacement = NewArticle::try_from(form)
    .map_err(Error::BadRequest)?;
  let affected = db::update_article(
    &app_state.pool,
    article_id,
    &ArticleUpdate::from(replacement)
  ).map_err(map_db_error)?;
  ensure_written(affected)?;
  info!("Replaced article {}", article_id);

  Ok(HttpResponse::NoContent().finish())
}

pub async fn update_article(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>,
  body: web::Bytes
) -> Result<HttpResponse, Error> {
  let article_id = path.into_inner().0;
  existing_article(&app_state.pool, article_id)?;
  let form: ArticleForm = helpers::parse_json_body(&body)?;
  let update = ArticleUpdate::from(form);
  if update.is_empty() {
    return Err(Error::BadRequest(String::from(EMPTY_UPDATE)));
  }
  let affected = db::update_article(&app_state.pool, article_id, &update)
    .map_err(map_db_error)?;
  ensure_written(affected)?;
  info!("Updated article {}", article_id);

  Ok(HttpResponse::NoContent().finish())
}

// Deleting twice gives a 404 the second time, the
// existence check takes care of that.
pub async fn delete_article(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let article_id = path.into_inner().0;
  existing_article(&app_state.pool, article_id)?;
  let affected = db::delete_article(&app_state.pool, article_id)
    .map_err(map_db_error)?;
  ensure_written(affected)?;
  info!("Deleted article {}", article_id);

  Ok(HttpResponse::NoContent().finish())
}
